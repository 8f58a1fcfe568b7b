// Database schema for the catalog store.
// Called once by HubStore::open() after the connection pragmas are set.
// Adding a table or column: append an idempotent CREATE TABLE IF NOT EXISTS
// or ALTER TABLE … ADD COLUMN (errors ignored) at the end of run_migrations().
// Never edit existing DDL in place.

use crate::atoms::constants::{OWNER_ROLE_ID, OWNER_ROLE_NAME};
use crate::atoms::error::HubResult;
use log::info;
use rusqlite::{params, Connection};

pub(crate) fn run_migrations(conn: &Connection) -> HubResult<()> {
    // ── Taxonomy ─────────────────────────────────────────────────────
    conn.execute_batch("
        CREATE TABLE IF NOT EXISTS roles (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL COLLATE NOCASE UNIQUE,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS categories (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL COLLATE NOCASE UNIQUE,
            description TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS tags (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL COLLATE NOCASE UNIQUE,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
    ")?;

    // ── Users ────────────────────────────────────────────────────────
    conn.execute_batch("
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL COLLATE NOCASE UNIQUE,
            name TEXT NOT NULL DEFAULT '',
            role_id TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY (role_id) REFERENCES roles(id) ON DELETE SET NULL
        );

        CREATE INDEX IF NOT EXISTS idx_users_role ON users(role_id);
    ")?;

    // ── Tools + join tables ──────────────────────────────────────────
    conn.execute_batch("
        CREATE TABLE IF NOT EXISTS tools (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL COLLATE NOCASE,
            description TEXT NOT NULL DEFAULT '',
            url TEXT NOT NULL,
            icon TEXT NOT NULL DEFAULT '',
            status TEXT NOT NULL DEFAULT 'active',
            is_approved INTEGER NOT NULL DEFAULT 0,
            created_by TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY (created_by) REFERENCES users(id) ON DELETE SET NULL
        );

        CREATE INDEX IF NOT EXISTS idx_tools_approved ON tools(is_approved);
        CREATE INDEX IF NOT EXISTS idx_tools_created_by ON tools(created_by);

        CREATE TABLE IF NOT EXISTS tool_categories (
            tool_id TEXT NOT NULL,
            category_id TEXT NOT NULL,
            PRIMARY KEY (tool_id, category_id),
            FOREIGN KEY (tool_id) REFERENCES tools(id) ON DELETE CASCADE,
            FOREIGN KEY (category_id) REFERENCES categories(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_tool_categories_category
            ON tool_categories(category_id);

        CREATE TABLE IF NOT EXISTS tool_roles (
            tool_id TEXT NOT NULL,
            role_id TEXT NOT NULL,
            PRIMARY KEY (tool_id, role_id),
            FOREIGN KEY (tool_id) REFERENCES tools(id) ON DELETE CASCADE,
            FOREIGN KEY (role_id) REFERENCES roles(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_tool_roles_role ON tool_roles(role_id);

        CREATE TABLE IF NOT EXISTS tool_tags (
            tool_id TEXT NOT NULL,
            tag_id TEXT NOT NULL,
            PRIMARY KEY (tool_id, tag_id),
            FOREIGN KEY (tool_id) REFERENCES tools(id) ON DELETE CASCADE,
            FOREIGN KEY (tag_id) REFERENCES tags(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_tool_tags_tag ON tool_tags(tag_id);
    ")?;

    // ── Built-in Owner role ──────────────────────────────────────────
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO roles (id, name) VALUES (?1, ?2)",
        params![OWNER_ROLE_ID, OWNER_ROLE_NAME],
    )?;
    if inserted > 0 {
        info!("[store] Created built-in {} role", OWNER_ROLE_NAME);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let owners: i64 = conn
            .query_row("SELECT COUNT(*) FROM roles WHERE id = ?1", params![OWNER_ROLE_ID], |r| r.get(0))
            .unwrap();
        assert_eq!(owners, 1);
    }
}
