// Admin-panel counters.

use super::HubStore;
use crate::atoms::error::HubResult;
use crate::atoms::types::{CategoryCount, HubStats};
use rusqlite::Connection;

fn count(conn: &Connection, sql: &str) -> HubResult<u64> {
    let n: i64 = conn.query_row(sql, [], |row| row.get(0))?;
    Ok(n.max(0) as u64)
}

impl HubStore {
    pub fn stats(&self) -> HubResult<HubStats> {
        let conn = self.conn.lock();

        let mut stmt = conn.prepare(
            "SELECT c.id, c.name, COUNT(tc.tool_id) FROM categories c
             LEFT JOIN tool_categories tc ON tc.category_id = c.id
             GROUP BY c.id, c.name
             ORDER BY COUNT(tc.tool_id) DESC, c.name COLLATE NOCASE",
        )?;
        let tools_per_category = stmt
            .query_map([], |row| {
                Ok(CategoryCount {
                    category_id: row.get(0)?,
                    name: row.get(1)?,
                    tools: row.get::<_, i64>(2)?.max(0) as u64,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(HubStats {
            tools_total: count(&conn, "SELECT COUNT(*) FROM tools")?,
            tools_approved: count(&conn, "SELECT COUNT(*) FROM tools WHERE is_approved = 1")?,
            tools_pending: count(&conn, "SELECT COUNT(*) FROM tools WHERE is_approved = 0")?,
            users: count(&conn, "SELECT COUNT(*) FROM users")?,
            categories: count(&conn, "SELECT COUNT(*) FROM categories")?,
            roles: count(&conn, "SELECT COUNT(*) FROM roles")?,
            tags: count(&conn, "SELECT COUNT(*) FROM tags")?,
            tools_per_category,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::types::{CategoryInput, ToolInput};

    #[test]
    fn stats_count_approval_and_categories() {
        let store = HubStore::open_in_memory().unwrap();
        let cat = store
            .create_category(&CategoryInput { name: "Code".into(), description: String::new() })
            .unwrap();
        store
            .create_category(&CategoryInput { name: "Empty".into(), description: String::new() })
            .unwrap();

        for (name, approved) in [("A", true), ("B", false), ("C", false)] {
            let input = ToolInput {
                name: name.into(),
                url: "https://x.example".into(),
                category_ids: vec![cat.id.clone()],
                ..Default::default()
            }
            .normalized()
            .unwrap();
            store.create_tool(&input, None, approved).unwrap();
        }

        let s = store.stats().unwrap();
        assert_eq!(s.tools_total, 3);
        assert_eq!(s.tools_approved, 1);
        assert_eq!(s.tools_pending, 2);
        assert_eq!(s.roles, 1);
        assert_eq!(s.categories, 2);
        assert_eq!(s.tools_per_category[0].name, "Code");
        assert_eq!(s.tools_per_category[0].tools, 3);
        assert_eq!(s.tools_per_category[1].tools, 0);
    }
}
