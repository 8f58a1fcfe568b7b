// Taxonomy — categories, roles and tags.
// Names are unique case-insensitively (COLLATE NOCASE in the schema), so a
// duplicate surfaces as HubError::Conflict from the insert itself.

use super::{new_id, HubStore};
use crate::atoms::constants::OWNER_ROLE_ID;
use crate::atoms::error::{HubError, HubResult};
use crate::atoms::types::{Category, CategoryInput, NameInput, Role, Tag};
use log::info;
use rusqlite::{params, OptionalExtension};

impl HubStore {
    // ── Categories ─────────────────────────────────────────────────────

    pub fn list_categories(&self) -> HubResult<Vec<Category>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, name, description FROM categories ORDER BY name COLLATE NOCASE",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Category { id: row.get(0)?, name: row.get(1)?, description: row.get(2)? })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn get_category(&self, category_id: &str) -> HubResult<Category> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT id, name, description FROM categories WHERE id = ?1",
            params![category_id],
            |row| Ok(Category { id: row.get(0)?, name: row.get(1)?, description: row.get(2)? }),
        )
        .optional()?
        .ok_or_else(|| HubError::not_found("Category", category_id))
    }

    pub fn create_category(&self, input: &CategoryInput) -> HubResult<Category> {
        let category = Category {
            id: new_id(),
            name: input.name.clone(),
            description: input.description.clone(),
        };
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO categories (id, name, description) VALUES (?1, ?2, ?3)",
            params![category.id, category.name, category.description],
        )?;
        info!("[store] Created category {} ({})", category.name, category.id);
        Ok(category)
    }

    pub fn update_category(&self, category_id: &str, input: &CategoryInput) -> HubResult<Category> {
        let conn = self.conn.lock();
        let n = conn.execute(
            "UPDATE categories SET name = ?2, description = ?3 WHERE id = ?1",
            params![category_id, input.name, input.description],
        )?;
        if n == 0 {
            return Err(HubError::not_found("Category", category_id));
        }
        info!("[store] Updated category {}", category_id);
        Ok(Category {
            id: category_id.to_string(),
            name: input.name.clone(),
            description: input.description.clone(),
        })
    }

    pub fn delete_category(&self, category_id: &str) -> HubResult<()> {
        let conn = self.conn.lock();
        let n = conn.execute("DELETE FROM categories WHERE id = ?1", params![category_id])?;
        if n == 0 {
            return Err(HubError::not_found("Category", category_id));
        }
        info!("[store] Deleted category {}", category_id);
        Ok(())
    }

    // ── Roles ──────────────────────────────────────────────────────────

    pub fn list_roles(&self) -> HubResult<Vec<Role>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT id, name FROM roles ORDER BY name COLLATE NOCASE")?;
        let rows = stmt
            .query_map([], |row| Ok(Role { id: row.get(0)?, name: row.get(1)? }))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn get_role(&self, role_id: &str) -> HubResult<Role> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT id, name FROM roles WHERE id = ?1",
            params![role_id],
            |row| Ok(Role { id: row.get(0)?, name: row.get(1)? }),
        )
        .optional()?
        .ok_or_else(|| HubError::not_found("Role", role_id))
    }

    pub fn create_role(&self, input: &NameInput) -> HubResult<Role> {
        let role = Role { id: new_id(), name: input.name.clone() };
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO roles (id, name) VALUES (?1, ?2)",
            params![role.id, role.name],
        )?;
        info!("[store] Created role {} ({})", role.name, role.id);
        Ok(role)
    }

    /// Rename a role. The built-in Owner role is fixed.
    pub fn rename_role(&self, role_id: &str, input: &NameInput) -> HubResult<Role> {
        if role_id == OWNER_ROLE_ID {
            return Err(HubError::forbidden("the Owner role cannot be renamed"));
        }
        let conn = self.conn.lock();
        let n = conn.execute(
            "UPDATE roles SET name = ?2 WHERE id = ?1",
            params![role_id, input.name],
        )?;
        if n == 0 {
            return Err(HubError::not_found("Role", role_id));
        }
        info!("[store] Renamed role {} → {}", role_id, input.name);
        Ok(Role { id: role_id.to_string(), name: input.name.clone() })
    }

    /// Delete a role. Tools lose the role (cascade); users holding it are
    /// left without a role (SET NULL).
    pub fn delete_role(&self, role_id: &str) -> HubResult<()> {
        if role_id == OWNER_ROLE_ID {
            return Err(HubError::forbidden("the Owner role cannot be deleted"));
        }
        let conn = self.conn.lock();
        let n = conn.execute("DELETE FROM roles WHERE id = ?1", params![role_id])?;
        if n == 0 {
            return Err(HubError::not_found("Role", role_id));
        }
        info!("[store] Deleted role {}", role_id);
        Ok(())
    }

    // ── Tags ───────────────────────────────────────────────────────────

    pub fn list_tags(&self) -> HubResult<Vec<Tag>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT id, name FROM tags ORDER BY name COLLATE NOCASE")?;
        let rows = stmt
            .query_map([], |row| Ok(Tag { id: row.get(0)?, name: row.get(1)? }))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn create_tag(&self, input: &NameInput) -> HubResult<Tag> {
        let tag = Tag { id: new_id(), name: input.name.clone() };
        let conn = self.conn.lock();
        conn.execute("INSERT INTO tags (id, name) VALUES (?1, ?2)", params![tag.id, tag.name])?;
        info!("[store] Created tag {} ({})", tag.name, tag.id);
        Ok(tag)
    }

    pub fn get_tag(&self, tag_id: &str) -> HubResult<Tag> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT id, name FROM tags WHERE id = ?1",
            params![tag_id],
            |row| Ok(Tag { id: row.get(0)?, name: row.get(1)? }),
        )
        .optional()?
        .ok_or_else(|| HubError::not_found("Tag", tag_id))
    }

    pub fn rename_tag(&self, tag_id: &str, input: &NameInput) -> HubResult<Tag> {
        let conn = self.conn.lock();
        let n = conn.execute("UPDATE tags SET name = ?2 WHERE id = ?1", params![tag_id, input.name])?;
        if n == 0 {
            return Err(HubError::not_found("Tag", tag_id));
        }
        info!("[store] Renamed tag {} → {}", tag_id, input.name);
        Ok(Tag { id: tag_id.to_string(), name: input.name.clone() })
    }

    pub fn delete_tag(&self, tag_id: &str) -> HubResult<()> {
        let conn = self.conn.lock();
        let n = conn.execute("DELETE FROM tags WHERE id = ?1", params![tag_id])?;
        if n == 0 {
            return Err(HubError::not_found("Tag", tag_id));
        }
        info!("[store] Deleted tag {}", tag_id);
        Ok(())
    }
}
