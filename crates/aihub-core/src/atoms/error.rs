// ── Hub Atoms: Error Types ─────────────────────────────────────────────────
// Single canonical error enum for the catalog, built with `thiserror`.
//
// Design rules:
//   • Variants are coarse-grained by outcome (not found, forbidden, conflict…)
//     so the HTTP layer can map each one to exactly one status code.
//   • The `#[from]` attribute wires std/external error conversions automatically.
//   • SQLite UNIQUE violations are surfaced as `Conflict`, not `Database`.
//   • No variant carries another user's private data in its message.

use thiserror::Error;

// ── Primary error enum ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum HubError {
    /// Filesystem or OS-level I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization / deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// SQLite / rusqlite database failure.
    #[error("Database error: {0}")]
    Database(rusqlite::Error),

    /// A record does not exist, or the caller is not allowed to know it exists.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Input failed validation (empty name, unknown association id, …).
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Uniqueness violation (duplicate name or email).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// No identity, or an identity that maps to no user.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Identity is known but lacks the role for this action.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Service configuration is invalid or unreadable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catch-all for errors that do not yet have a dedicated variant.
    #[error("{0}")]
    Other(String),
}

// ── Convenience constructors ───────────────────────────────────────────────

impl HubError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound { kind, id: id.into() }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }
}

// ── rusqlite → HubError ────────────────────────────────────────────────────
// UNIQUE constraint failures become `Conflict` so callers see a 409 rather
// than an opaque database error. The SQLite text names tables and columns,
// so it is translated instead of passed through.

impl From<rusqlite::Error> for HubError {
    fn from(e: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(ref err, ref msg) = e {
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
            {
                return HubError::Conflict(unique_violation_message(msg.as_deref()));
            }
        }
        HubError::Database(e)
    }
}

/// "UNIQUE constraint failed: categories.name" → "a category with that name
/// already exists".
fn unique_violation_message(detail: Option<&str>) -> String {
    let table = detail
        .and_then(|m| m.strip_prefix("UNIQUE constraint failed: "))
        .and_then(|target| target.split_once('.'))
        .map(|(table, _)| table);
    let (subject, field) = match table {
        Some("categories") => ("category", "name"),
        Some("roles") => ("role", "name"),
        Some("tags") => ("tag", "name"),
        Some("users") => ("user", "email"),
        _ => return "a matching record already exists".into(),
    };
    format!("a {subject} with that {field} already exists")
}

impl From<String> for HubError {
    fn from(s: String) -> Self {
        HubError::Other(s)
    }
}

impl From<&str> for HubError {
    fn from(s: &str) -> Self {
        HubError::Other(s.to_string())
    }
}

// ── Convenience alias ──────────────────────────────────────────────────────

/// All catalog operations return this type.
pub type HubResult<T> = Result<T, HubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_kind_and_id() {
        let e = HubError::not_found("Tool", "t-1");
        assert_eq!(e.to_string(), "Tool not found: t-1");
    }

    #[test]
    fn unique_violation_maps_to_conflict() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (name TEXT UNIQUE); INSERT INTO t VALUES ('a');")
            .unwrap();
        let err: HubError = conn
            .execute("INSERT INTO t VALUES ('a')", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, HubError::Conflict(_)), "got {err:?}");
    }

    #[test]
    fn unique_violation_message_hides_schema() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE categories (name TEXT UNIQUE); INSERT INTO categories VALUES ('Chat');",
        )
        .unwrap();
        let err: HubError = conn
            .execute("INSERT INTO categories VALUES ('Chat')", [])
            .unwrap_err()
            .into();
        assert_eq!(err.to_string(), "Conflict: a category with that name already exists");

        let err: HubError = conn
            .execute_batch("CREATE TABLE t (x TEXT UNIQUE); INSERT INTO t VALUES ('a'), ('a');")
            .unwrap_err()
            .into();
        assert_eq!(err.to_string(), "Conflict: a matching record already exists");
    }

    #[test]
    fn other_errors_stay_database() {
        let err: HubError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, HubError::Database(_)));
    }
}
