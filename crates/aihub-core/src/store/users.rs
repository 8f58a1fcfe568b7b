// Users — CRUD on `users` and their single role assignment.
// The store refuses to remove the last Owner (delete or demotion) so the
// catalog always keeps someone able to administer it.

use super::{new_id, row_exists, HubStore};
use crate::atoms::constants::OWNER_ROLE_ID;
use crate::atoms::error::{HubError, HubResult};
use crate::atoms::types::{Role, User, UserInput};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

const USER_SELECT: &str = "SELECT u.id, u.email, u.name, u.created_at, r.id, r.name
     FROM users u LEFT JOIN roles r ON r.id = u.role_id";

impl User {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        let role_id: Option<String> = row.get(4)?;
        let role_name: Option<String> = row.get(5)?;
        Ok(User {
            id: row.get(0)?,
            email: row.get(1)?,
            name: row.get(2)?,
            created_at: row.get(3)?,
            role: role_id.zip(role_name).map(|(id, name)| Role { id, name }),
        })
    }
}

fn fetch_user(conn: &Connection, user_id: &str) -> HubResult<User> {
    let sql = format!("{USER_SELECT} WHERE u.id = ?1");
    conn.query_row(&sql, params![user_id], User::from_row)
        .optional()?
        .ok_or_else(|| HubError::not_found("User", user_id))
}

fn owner_count(conn: &Connection) -> HubResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM users WHERE role_id = ?1",
        params![OWNER_ROLE_ID],
        |row| row.get(0),
    )?)
}

fn ensure_not_last_owner(conn: &Connection, user: &User) -> HubResult<()> {
    if user.is_owner() && owner_count(conn)? <= 1 {
        return Err(HubError::Conflict("cannot remove the last Owner".into()));
    }
    Ok(())
}

impl HubStore {
    // ── User CRUD ──────────────────────────────────────────────────────

    pub fn list_users(&self) -> HubResult<Vec<User>> {
        let conn = self.conn.lock();
        let sql = format!("{USER_SELECT} ORDER BY u.email");
        let mut stmt = conn.prepare(&sql)?;
        let users = stmt
            .query_map([], User::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(users)
    }

    pub fn get_user(&self, user_id: &str) -> HubResult<User> {
        let conn = self.conn.lock();
        fetch_user(&conn, user_id)
    }

    /// Look up a user by email, case-insensitively.
    pub fn get_user_by_email(&self, email: &str) -> HubResult<Option<User>> {
        let conn = self.conn.lock();
        let sql = format!("{USER_SELECT} WHERE u.email = ?1");
        Ok(conn
            .query_row(&sql, params![email.trim()], User::from_row)
            .optional()?)
    }

    /// Insert a user. `input` must already be normalized.
    pub fn create_user(&self, input: &UserInput) -> HubResult<User> {
        let conn = self.conn.lock();
        if let Some(role_id) = &input.role_id {
            if !row_exists(&conn, "roles", role_id)? {
                return Err(HubError::validation(format!("unknown role id '{role_id}'")));
            }
        }
        let id = new_id();
        conn.execute(
            "INSERT INTO users (id, email, name, role_id) VALUES (?1, ?2, ?3, ?4)",
            params![id, input.email, input.name, input.role_id],
        )?;
        info!("[store] Created user {} ({})", input.email, id);
        fetch_user(&conn, &id)
    }

    /// Assign (or clear, with `None`) a user's role.
    pub fn set_user_role(&self, user_id: &str, role_id: Option<&str>) -> HubResult<User> {
        let conn = self.conn.lock();
        let user = fetch_user(&conn, user_id)?;
        if let Some(role_id) = role_id {
            if !row_exists(&conn, "roles", role_id)? {
                return Err(HubError::validation(format!("unknown role id '{role_id}'")));
            }
        }
        if role_id != Some(OWNER_ROLE_ID) {
            ensure_not_last_owner(&conn, &user)?;
        }
        conn.execute(
            "UPDATE users SET role_id = ?2 WHERE id = ?1",
            params![user_id, role_id],
        )?;
        info!("[store] User {} role → {}", user_id, role_id.unwrap_or("none"));
        fetch_user(&conn, user_id)
    }

    pub fn delete_user(&self, user_id: &str) -> HubResult<()> {
        let conn = self.conn.lock();
        let user = fetch_user(&conn, user_id)?;
        ensure_not_last_owner(&conn, &user)?;
        conn.execute("DELETE FROM users WHERE id = ?1", params![user_id])?;
        info!("[store] Deleted user {}", user_id);
        Ok(())
    }

    /// Make sure `email` exists and holds the Owner role. Used at startup so
    /// a fresh catalog has an administrator. Lookup and write share one
    /// IMMEDIATE transaction, so concurrent bootstraps cannot both insert.
    pub fn ensure_owner(&self, email: &str, name: &str) -> HubResult<User> {
        let input = UserInput {
            email: email.into(),
            name: name.into(),
            role_id: Some(OWNER_ROLE_ID.into()),
        }
        .normalized()?;

        let mut conn = self.conn.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let sql = format!("{USER_SELECT} WHERE u.email = ?1");
        let existing = tx
            .query_row(&sql, params![input.email], User::from_row)
            .optional()?;

        let owner = match existing {
            Some(user) if user.is_owner() => user,
            Some(user) => {
                tx.execute(
                    "UPDATE users SET role_id = ?2 WHERE id = ?1",
                    params![user.id, OWNER_ROLE_ID],
                )?;
                info!("[store] Promoted {} to Owner", user.email);
                fetch_user(&tx, &user.id)?
            }
            None => {
                let id = new_id();
                tx.execute(
                    "INSERT INTO users (id, email, name, role_id) VALUES (?1, ?2, ?3, ?4)",
                    params![id, input.email, input.name, OWNER_ROLE_ID],
                )?;
                info!("[store] Created Owner {} ({})", input.email, id);
                fetch_user(&tx, &id)?
            }
        };
        tx.commit()?;
        Ok(owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::types::NameInput;

    fn user(email: &str, role_id: Option<&str>) -> UserInput {
        UserInput { email: email.into(), name: "Someone".into(), role_id: role_id.map(Into::into) }
            .normalized()
            .unwrap()
    }

    #[test]
    fn create_and_lookup_by_email() {
        let store = HubStore::open_in_memory().unwrap();
        let created = store.create_user(&user("ana@softart.io", None)).unwrap();
        let found = store.get_user_by_email("ANA@softart.io").unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert!(found.role.is_none());
        assert!(store.get_user_by_email("bob@softart.io").unwrap().is_none());
    }

    #[test]
    fn duplicate_email_is_conflict() {
        let store = HubStore::open_in_memory().unwrap();
        store.create_user(&user("ana@softart.io", None)).unwrap();
        let err = store.create_user(&user("ana@softart.io", None)).unwrap_err();
        assert!(matches!(err, HubError::Conflict(_)));
    }

    #[test]
    fn unknown_role_rejected() {
        let store = HubStore::open_in_memory().unwrap();
        let err = store.create_user(&user("a@softart.io", Some("ghost"))).unwrap_err();
        assert!(matches!(err, HubError::Validation(_)));
    }

    #[test]
    fn set_role_round_trip() {
        let store = HubStore::open_in_memory().unwrap();
        let pm = store.create_role(&NameInput { name: "Project Manager".into() }).unwrap();
        let u = store.create_user(&user("pm@softart.io", None)).unwrap();

        let u = store.set_user_role(&u.id, Some(&pm.id)).unwrap();
        assert_eq!(u.role_id(), Some(pm.id.as_str()));
        let u = store.set_user_role(&u.id, None).unwrap();
        assert!(u.role.is_none());
    }

    #[test]
    fn last_owner_cannot_be_removed() {
        let store = HubStore::open_in_memory().unwrap();
        let owner = store.ensure_owner("boss@softart.io", "Boss").unwrap();
        assert!(owner.is_owner());

        assert!(matches!(store.delete_user(&owner.id), Err(HubError::Conflict(_))));
        assert!(matches!(store.set_user_role(&owner.id, None), Err(HubError::Conflict(_))));

        let second = store.ensure_owner("deputy@softart.io", "Deputy").unwrap();
        store.delete_user(&owner.id).unwrap();
        assert!(store.get_user(&second.id).unwrap().is_owner());
    }

    #[test]
    fn ensure_owner_promotes_existing_user() {
        let store = HubStore::open_in_memory().unwrap();
        let u = store.create_user(&user("lead@softart.io", None)).unwrap();
        let promoted = store.ensure_owner("lead@softart.io", "Lead").unwrap();
        assert_eq!(promoted.id, u.id);
        assert!(promoted.is_owner());
        assert_eq!(store.list_users().unwrap().len(), 1);
    }

    #[test]
    fn concurrent_ensure_owner_yields_one_user() {
        let store = std::sync::Arc::new(HubStore::open_in_memory().unwrap());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = std::sync::Arc::clone(&store);
                std::thread::spawn(move || store.ensure_owner("boss@softart.io", "Boss"))
            })
            .collect();
        let ids: Vec<String> = handles
            .into_iter()
            .map(|h| h.join().unwrap().unwrap().id)
            .collect();
        assert!(ids.iter().all(|id| id == &ids[0]));
        assert_eq!(store.list_users().unwrap().len(), 1);
    }
}
