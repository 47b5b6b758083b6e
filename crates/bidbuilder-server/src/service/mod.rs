//! Lifecycle operations.
//!
//! Each function takes the store and the authenticated actor, checks the
//! capability through [`crate::policy`], and performs the whole mutation in
//! one transaction. Handlers hold the database lock for the duration of a
//! call, so none of these functions await.

pub mod analytics;
pub mod chat;
pub mod comments;
pub mod identity;
pub mod notifications;
pub mod proposals;
pub mod sections;
pub mod templates;
pub mod users;

use crate::error::ServerError;

/// Trim `value` and reject it if nothing is left.
pub(crate) fn required(value: &str, field: &str) -> Result<String, ServerError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServerError::BadRequest(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
pub(crate) mod testing {
    //! Fixtures shared by the service tests.

    use bidbuilder_shared::Role;
    use bidbuilder_store::{Database, User};

    pub fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    pub fn account(db: &Database, name: &str, role: Role) -> User {
        db.create_user(name, &format!("{name}@example.com"), "not-a-hash", role)
            .unwrap()
    }
}
