//! Account listing for staff.

use bidbuilder_shared::Role;
use bidbuilder_store::{Database, User};

use crate::error::ServerError;
use crate::policy::{self, Action, Resource};

/// Accounts with the `user` role, the only valid reassignment targets.
pub fn list_assignable(db: &Database, actor: &User) -> Result<Vec<User>, ServerError> {
    policy::authorize(actor, Resource::Global, Action::ListUsers)?;
    Ok(db.list_users_with_role(Role::User)?)
}
