// Tools — CRUD on `tools` plus the `tool_categories`, `tool_roles` and
// `tool_tags` join tables. Associations are always replaced as a set inside
// the same transaction as the row write.

use super::{new_id, row_exists, HubStore};
use crate::atoms::error::{HubError, HubResult};
use crate::atoms::types::{Category, Role, Tag, Tool, ToolInput};
use log::info;
use rusqlite::{params, Connection, OptionalExtension};

const TOOL_COLUMNS: &str =
    "id, name, description, url, icon, status, is_approved, created_by, created_at, updated_at";

impl Tool {
    /// Map a row with TOOL_COLUMNS → Tool (associations populated separately).
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        let status: String = row.get(5)?;
        Ok(Tool {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            url: row.get(3)?,
            icon: row.get(4)?,
            status: status.parse().unwrap_or_default(),
            is_approved: row.get::<_, i32>(6)? != 0,
            created_by: row.get(7)?,
            categories: Vec::new(),
            roles: Vec::new(),
            tags: Vec::new(),
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }
}

/// Populate categories, roles and tags for every tool in `tools`.
/// One prepared statement per association kind, reused across tools.
fn load_associations(conn: &Connection, tools: &mut [Tool]) -> HubResult<()> {
    let mut cat_stmt = conn.prepare(
        "SELECT c.id, c.name, c.description FROM tool_categories tc
         JOIN categories c ON c.id = tc.category_id
         WHERE tc.tool_id = ?1 ORDER BY c.name COLLATE NOCASE",
    )?;
    let mut role_stmt = conn.prepare(
        "SELECT r.id, r.name FROM tool_roles tr
         JOIN roles r ON r.id = tr.role_id
         WHERE tr.tool_id = ?1 ORDER BY r.name COLLATE NOCASE",
    )?;
    let mut tag_stmt = conn.prepare(
        "SELECT t.id, t.name FROM tool_tags tt
         JOIN tags t ON t.id = tt.tag_id
         WHERE tt.tool_id = ?1 ORDER BY t.name COLLATE NOCASE",
    )?;

    for tool in tools.iter_mut() {
        tool.categories = cat_stmt
            .query_map(params![tool.id], |row| {
                Ok(Category { id: row.get(0)?, name: row.get(1)?, description: row.get(2)? })
            })?
            .collect::<rusqlite::Result<_>>()?;
        tool.roles = role_stmt
            .query_map(params![tool.id], |row| Ok(Role { id: row.get(0)?, name: row.get(1)? }))?
            .collect::<rusqlite::Result<_>>()?;
        tool.tags = tag_stmt
            .query_map(params![tool.id], |row| Ok(Tag { id: row.get(0)?, name: row.get(1)? }))?
            .collect::<rusqlite::Result<_>>()?;
    }
    Ok(())
}

fn fetch_tool(conn: &Connection, tool_id: &str) -> HubResult<Tool> {
    let sql = format!("SELECT {TOOL_COLUMNS} FROM tools WHERE id = ?1");
    let tool = conn
        .query_row(&sql, params![tool_id], Tool::from_row)
        .optional()?
        .ok_or_else(|| HubError::not_found("Tool", tool_id))?;
    let mut tools = [tool];
    load_associations(conn, &mut tools)?;
    let [tool] = tools;
    Ok(tool)
}

/// Reject the whole write if any association id is unknown.
fn check_associations(conn: &Connection, input: &ToolInput) -> HubResult<()> {
    let sets = [
        ("categories", "category", &input.category_ids),
        ("roles", "role", &input.role_ids),
        ("tags", "tag", &input.tag_ids),
    ];
    for (table, kind, ids) in sets {
        for id in ids.iter() {
            if !row_exists(conn, table, id)? {
                return Err(HubError::validation(format!("unknown {kind} id '{id}'")));
            }
        }
    }
    Ok(())
}

fn replace_associations(conn: &Connection, tool_id: &str, input: &ToolInput) -> HubResult<()> {
    conn.execute("DELETE FROM tool_categories WHERE tool_id = ?1", params![tool_id])?;
    conn.execute("DELETE FROM tool_roles WHERE tool_id = ?1", params![tool_id])?;
    conn.execute("DELETE FROM tool_tags WHERE tool_id = ?1", params![tool_id])?;

    for id in &input.category_ids {
        conn.execute(
            "INSERT INTO tool_categories (tool_id, category_id) VALUES (?1, ?2)",
            params![tool_id, id],
        )?;
    }
    for id in &input.role_ids {
        conn.execute(
            "INSERT INTO tool_roles (tool_id, role_id) VALUES (?1, ?2)",
            params![tool_id, id],
        )?;
    }
    for id in &input.tag_ids {
        conn.execute(
            "INSERT INTO tool_tags (tool_id, tag_id) VALUES (?1, ?2)",
            params![tool_id, id],
        )?;
    }
    Ok(())
}

impl HubStore {
    // ── Tool CRUD ──────────────────────────────────────────────────────

    /// Every tool with its associations, ordered by name then id.
    /// Visibility is not applied here; see `access::visible_tools`.
    pub fn list_tools(&self) -> HubResult<Vec<Tool>> {
        let conn = self.conn.lock();
        let sql = format!("SELECT {TOOL_COLUMNS} FROM tools ORDER BY name COLLATE NOCASE, id");
        let mut stmt = conn.prepare(&sql)?;
        let mut tools = stmt
            .query_map([], Tool::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        load_associations(&conn, &mut tools)?;
        Ok(tools)
    }

    pub fn get_tool(&self, tool_id: &str) -> HubResult<Tool> {
        let conn = self.conn.lock();
        fetch_tool(&conn, tool_id)
    }

    /// Insert a tool and its associations. `input` must already be normalized.
    pub fn create_tool(
        &self,
        input: &ToolInput,
        created_by: Option<&str>,
        approved: bool,
    ) -> HubResult<Tool> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        check_associations(&tx, input)?;

        let id = new_id();
        tx.execute(
            "INSERT INTO tools (id, name, description, url, icon, status, is_approved, created_by)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                id,
                input.name,
                input.description,
                input.url,
                input.icon,
                input.status.as_str(),
                approved as i32,
                created_by,
            ],
        )?;
        replace_associations(&tx, &id, input)?;
        tx.commit()?;

        info!("[store] Created tool {} ({}) approved={}", input.name, id, approved);
        fetch_tool(&conn, &id)
    }

    /// Overwrite a tool's fields and association sets. Approval and
    /// submitter are left untouched.
    pub fn update_tool(&self, tool_id: &str, input: &ToolInput) -> HubResult<Tool> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        if !row_exists(&tx, "tools", tool_id)? {
            return Err(HubError::not_found("Tool", tool_id));
        }
        check_associations(&tx, input)?;

        tx.execute(
            "UPDATE tools SET name = ?2, description = ?3, url = ?4, icon = ?5, status = ?6,
             updated_at = datetime('now') WHERE id = ?1",
            params![
                tool_id,
                input.name,
                input.description,
                input.url,
                input.icon,
                input.status.as_str(),
            ],
        )?;
        replace_associations(&tx, tool_id, input)?;
        tx.commit()?;

        info!("[store] Updated tool {}", tool_id);
        fetch_tool(&conn, tool_id)
    }

    /// Delete a tool; join rows go with it via ON DELETE CASCADE.
    pub fn delete_tool(&self, tool_id: &str) -> HubResult<()> {
        let conn = self.conn.lock();
        let n = conn.execute("DELETE FROM tools WHERE id = ?1", params![tool_id])?;
        if n == 0 {
            return Err(HubError::not_found("Tool", tool_id));
        }
        info!("[store] Deleted tool {}", tool_id);
        Ok(())
    }

    pub fn set_tool_approval(&self, tool_id: &str, approved: bool) -> HubResult<Tool> {
        let conn = self.conn.lock();
        let n = conn.execute(
            "UPDATE tools SET is_approved = ?2, updated_at = datetime('now') WHERE id = ?1",
            params![tool_id, approved as i32],
        )?;
        if n == 0 {
            return Err(HubError::not_found("Tool", tool_id));
        }
        info!("[store] Tool {} approved={}", tool_id, approved);
        fetch_tool(&conn, tool_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::types::{CategoryInput, NameInput, ToolStatus};

    fn input(name: &str) -> ToolInput {
        ToolInput {
            name: name.into(),
            url: format!("https://{}.example", name.to_lowercase()),
            ..Default::default()
        }
        .normalized()
        .unwrap()
    }

    #[test]
    fn create_and_get_tool_with_associations() {
        let store = HubStore::open_in_memory().unwrap();
        let cat = store
            .create_category(&CategoryInput { name: "Writing".into(), description: String::new() })
            .unwrap();
        let role = store.create_role(&NameInput { name: "Backend Developer".into() }).unwrap();
        let tag = store.create_tag(&NameInput { name: "llm".into() }).unwrap();

        let mut i = input("ChatGPT");
        i.category_ids = vec![cat.id.clone()];
        i.role_ids = vec![role.id.clone()];
        i.tag_ids = vec![tag.id.clone()];
        i.status = ToolStatus::Beta;
        let tool = store.create_tool(&i, None, false).unwrap();

        let got = store.get_tool(&tool.id).unwrap();
        assert_eq!(got.name, "ChatGPT");
        assert_eq!(got.status, ToolStatus::Beta);
        assert!(!got.is_approved);
        assert_eq!(got.categories, vec![cat]);
        assert_eq!(got.roles, vec![role]);
        assert_eq!(got.tags, vec![tag]);
    }

    #[test]
    fn unknown_association_rejects_whole_write() {
        let store = HubStore::open_in_memory().unwrap();
        let mut i = input("Claude");
        i.tag_ids = vec!["nope".into()];
        let err = store.create_tool(&i, None, true).unwrap_err();
        assert!(matches!(err, HubError::Validation(_)));
        assert!(store.list_tools().unwrap().is_empty());
    }

    #[test]
    fn update_replaces_association_sets() {
        let store = HubStore::open_in_memory().unwrap();
        let a = store.create_tag(&NameInput { name: "a".into() }).unwrap();
        let b = store.create_tag(&NameInput { name: "b".into() }).unwrap();

        let mut i = input("Copilot");
        i.tag_ids = vec![a.id.clone()];
        let tool = store.create_tool(&i, None, true).unwrap();

        i.tag_ids = vec![b.id.clone()];
        i.description = "pair programmer".into();
        let updated = store.update_tool(&tool.id, &i).unwrap();
        assert_eq!(updated.tags, vec![b]);
        assert_eq!(updated.description, "pair programmer");
        assert!(updated.is_approved, "update must not touch approval");
    }

    #[test]
    fn tool_names_may_repeat() {
        let store = HubStore::open_in_memory().unwrap();
        let first = store.create_tool(&input("Midjourney"), None, false).unwrap();
        let second = store.create_tool(&input("midjourney"), None, false).unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(store.list_tools().unwrap().len(), 2);
    }

    #[test]
    fn delete_cascades_join_rows() {
        let store = HubStore::open_in_memory().unwrap();
        let tag = store.create_tag(&NameInput { name: "x".into() }).unwrap();
        let mut i = input("Gemini");
        i.tag_ids = vec![tag.id];
        let tool = store.create_tool(&i, None, true).unwrap();

        store.delete_tool(&tool.id).unwrap();
        let conn = store.conn.lock();
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM tool_tags", [], |r| r.get(0)).unwrap();
        assert_eq!(n, 0);
    }

    #[test]
    fn missing_tool_is_not_found() {
        let store = HubStore::open_in_memory().unwrap();
        assert!(matches!(store.get_tool("x"), Err(HubError::NotFound { .. })));
        assert!(matches!(store.delete_tool("x"), Err(HubError::NotFound { .. })));
        assert!(matches!(store.set_tool_approval("x", true), Err(HubError::NotFound { .. })));
        assert!(matches!(store.update_tool("x", &input("X")), Err(HubError::NotFound { .. })));
    }

    #[test]
    fn approval_toggles() {
        let store = HubStore::open_in_memory().unwrap();
        let tool = store.create_tool(&input("Perplexity"), None, false).unwrap();
        assert!(store.set_tool_approval(&tool.id, true).unwrap().is_approved);
        assert!(!store.set_tool_approval(&tool.id, false).unwrap().is_approved);
    }
}
