//! Bearer-token authentication for handlers.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use bidbuilder_shared::token::bearer_token;
use bidbuilder_store::User;

use crate::api::AppState;
use crate::error::ServerError;
use crate::service::identity;

/// The account behind the request's `Authorization: Bearer` header.
/// Extraction fails with 401 when the header is missing or the token does
/// not resolve to an existing account.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(|| ServerError::Unauthorized("Not authenticated".into()))?;

        let db = state.db()?;
        let user = identity::authenticate(&db, &state.tokens, token)?;
        Ok(CurrentUser(user))
    }
}
