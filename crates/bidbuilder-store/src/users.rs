//! CRUD operations for [`User`] and role records.

use bidbuilder_shared::{Role, RoleId, UserId};
use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use crate::database::Database;
use crate::error::Result;
use crate::models::User;
use crate::row;

const USER_COLUMNS: &str = "u.id, u.username, u.email, u.hashed_password, u.is_active, r.name, u.created_at
     FROM users u JOIN roles r ON r.id = u.role_id";

impl Database {
    /// Return the id of the role row named after `role`, creating it on
    /// first use.
    pub fn ensure_role(&self, role: Role) -> Result<RoleId> {
        self.conn().execute(
            "INSERT OR IGNORE INTO roles (name) VALUES (?1)",
            params![role.as_str()],
        )?;
        Ok(self.conn().query_row(
            "SELECT id FROM roles WHERE name = ?1",
            params![role.as_str()],
            |row| row.get(0),
        )?)
    }

    /// Insert a new user. Fails with [`StoreError::Conflict`] when the
    /// username or email is already taken.
    ///
    /// [`StoreError::Conflict`]: crate::StoreError::Conflict
    pub fn create_user(
        &self,
        username: &str,
        email: &str,
        hashed_password: &str,
        role: Role,
    ) -> Result<User> {
        let role_id = self.ensure_role(role)?;
        let now = Utc::now();

        self.conn().execute(
            "INSERT INTO users (username, email, hashed_password, is_active, role_id, created_at)
             VALUES (?1, ?2, ?3, 1, ?4, ?5)",
            params![username, email, hashed_password, role_id, now.to_rfc3339()],
        )?;

        self.get_user(self.conn().last_insert_rowid())
    }

    pub fn get_user(&self, id: UserId) -> Result<User> {
        Ok(self.conn().query_row(
            &format!("SELECT {USER_COLUMNS} WHERE u.id = ?1"),
            params![id],
            row_to_user,
        )?)
    }

    pub fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .conn()
            .query_row(
                &format!("SELECT {USER_COLUMNS} WHERE u.username = ?1"),
                params![username],
                row_to_user,
            )
            .optional()?)
    }

    /// True when either the username or the email already belongs to an
    /// account.
    pub fn user_exists(&self, username: &str, email: &str) -> Result<bool> {
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM users WHERE username = ?1 OR email = ?2",
            params![username, email],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// List accounts holding `role`, ordered by username.
    pub fn list_users_with_role(&self, role: Role) -> Result<Vec<User>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {USER_COLUMNS} WHERE r.name = ?1 ORDER BY u.username ASC"
        ))?;
        let rows = stmt.query_map(params![role.as_str()], row_to_user)?;
        Ok(row::collect(rows)?)
    }

    pub fn set_user_active(&self, id: UserId, active: bool) -> Result<bool> {
        let affected = self.conn().execute(
            "UPDATE users SET is_active = ?1 WHERE id = ?2",
            params![active, id],
        )?;
        Ok(affected > 0)
    }
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let role_name: String = row.get(5)?;
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        hashed_password: row.get(3)?,
        is_active: row.get(4)?,
        role: Role::from_name_or_default(Some(&role_name)),
        created_at: row::timestamp(row, 6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StoreError;

    #[test]
    fn create_and_fetch_user() {
        let db = Database::open_in_memory().unwrap();
        let user = db.create_user("alice", "a@x.io", "hash", Role::Manager).unwrap();

        assert_eq!(user.role, Role::Manager);
        assert!(user.is_active);
        assert_eq!(db.get_user(user.id).unwrap(), user);
        assert_eq!(db.find_user_by_username("alice").unwrap(), Some(user));
        assert_eq!(db.find_user_by_username("bob").unwrap(), None);
    }

    #[test]
    fn duplicate_username_or_email_conflicts() {
        let db = Database::open_in_memory().unwrap();
        db.create_user("alice", "a@x.io", "h", Role::User).unwrap();

        let dup_name = db.create_user("alice", "other@x.io", "h", Role::User);
        assert!(matches!(dup_name, Err(StoreError::Conflict(_))));

        let dup_email = db.create_user("bob", "a@x.io", "h", Role::User);
        assert!(matches!(dup_email, Err(StoreError::Conflict(_))));

        assert!(db.user_exists("alice", "nobody@x.io").unwrap());
        assert!(db.user_exists("nobody", "a@x.io").unwrap());
        assert!(!db.user_exists("carol", "c@x.io").unwrap());
    }

    #[test]
    fn roles_are_created_once() {
        let db = Database::open_in_memory().unwrap();
        let a = db.ensure_role(Role::User).unwrap();
        let b = db.ensure_role(Role::User).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn missing_user_is_not_found() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(db.get_user(99), Err(StoreError::NotFound)));
    }

    #[test]
    fn list_by_role() {
        let db = Database::open_in_memory().unwrap();
        db.create_user("zed", "z@x.io", "h", Role::User).unwrap();
        db.create_user("amy", "a@x.io", "h", Role::User).unwrap();
        db.create_user("boss", "b@x.io", "h", Role::Manager).unwrap();

        let names: Vec<_> = db
            .list_users_with_role(Role::User)
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(names, vec!["amy", "zed"]);
    }
}
