// SoftArt AI HUB — Catalog Store
// Stores tools, taxonomy and users in SQLite via rusqlite.
// One connection guarded by a mutex; every public method takes the lock for
// the duration of its statements, so callers never hold it across awaits.
//
// Module layout:
//   schema     — idempotent table setup + built-in Owner role
//   tools      — tool CRUD, association replacement, approval flag
//   taxonomy   — categories, roles, tags
//   users      — user CRUD, role assignment, owner bootstrap
//   stats      — admin-panel counters

use crate::atoms::error::HubResult;
use log::info;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

mod schema;
mod stats;
mod taxonomy;
mod tools;
mod users;

/// Per-user data directory shared by the server and the admin CLI.
pub const APP_DIR: &str = "softart-hub";

/// Default catalog database: `<data_dir>/softart-hub/aihub.db`.
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("aihub.db")
}

/// Thread-safe database wrapper.
pub struct HubStore {
    /// The SQLite connection, protected by a Mutex.
    pub conn: Mutex<Connection>,
}

impl HubStore {
    /// Open (or create) the catalog database at `path` and initialize tables.
    pub fn open(path: &Path) -> HubResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        info!("[store] Opening catalog at {:?}", path);

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;").ok();
        Self::init(conn)
    }

    /// Fresh in-memory database with the full schema. Used by tests.
    pub fn open_in_memory() -> HubResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> HubResult<Self> {
        // Join-table cascades depend on this; it is per-connection in SQLite.
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        schema::run_migrations(&conn)?;
        Ok(HubStore { conn: Mutex::new(conn) })
    }
}

// ── Shared helpers ─────────────────────────────────────────────────────────

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// True when a row with `id` exists in `table`. `table` is always a literal
/// from this crate, never user input.
pub(crate) fn row_exists(conn: &Connection, table: &str, id: &str) -> HubResult<bool> {
    let sql = format!("SELECT 1 FROM {table} WHERE id = ?1");
    Ok(conn
        .query_row(&sql, params![id], |_| Ok(()))
        .optional()?
        .is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_db_path_lives_under_app_dir() {
        let path = default_db_path();
        assert!(path.ends_with(Path::new(APP_DIR).join("aihub.db")), "{path:?}");
    }
}
