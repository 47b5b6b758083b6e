//! Registration, login and bearer-token authentication.

use serde::{Deserialize, Serialize};
use tracing::info;

use bidbuilder_shared::password::{hash_password, verify_password};
use bidbuilder_shared::token::TokenIssuer;
use bidbuilder_shared::Role;
use bidbuilder_store::{Database, StoreError, User};

use crate::error::ServerError;
use crate::service::required;

#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
}

const BAD_CREDENTIALS: &str = "Incorrect username or password";

/// Create an account. Unknown role names become `user`.
pub fn register(db: &Database, form: &Registration) -> Result<User, ServerError> {
    let username = required(&form.username, "username")?;
    let email = required(&form.email, "email")?;
    if form.password.is_empty() {
        return Err(ServerError::BadRequest("password must not be empty".into()));
    }

    if db.user_exists(&username, &email)? {
        return Err(ServerError::Conflict("Username or email already registered".into()));
    }

    let role = Role::from_name_or_default(form.role.as_deref());
    let hash = hash_password(&form.password)?;

    let user = db
        .create_user(&username, &email, &hash, role)
        .map_err(|err| match err {
            StoreError::Conflict(_) => {
                ServerError::Conflict("Username or email already registered".into())
            }
            other => other.into(),
        })?;

    info!(user_id = user.id, %role, "registered user");
    Ok(user)
}

/// Check credentials and issue a bearer token for the account.
pub fn login(
    db: &Database,
    tokens: &TokenIssuer,
    username: &str,
    password: &str,
) -> Result<AccessToken, ServerError> {
    let user = db
        .find_user_by_username(username.trim())?
        .ok_or_else(|| ServerError::Unauthorized(BAD_CREDENTIALS.into()))?;

    if !verify_password(password, &user.hashed_password)? {
        return Err(ServerError::Unauthorized(BAD_CREDENTIALS.into()));
    }

    let access_token = tokens.issue(user.id)?;
    info!(user_id = user.id, "login succeeded");

    Ok(AccessToken {
        access_token,
        token_type: "bearer".into(),
    })
}

/// Resolve a bearer token to the account it was issued for.
pub fn authenticate(db: &Database, tokens: &TokenIssuer, token: &str) -> Result<User, ServerError> {
    let user_id = tokens.verify(token)?;
    db.get_user(user_id).map_err(|err| match err {
        StoreError::NotFound => ServerError::Unauthorized("Could not validate credentials".into()),
        other => other.into(),
    })
}
