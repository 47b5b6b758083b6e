use axum::{extract::State, http::StatusCode, Form, Json};
use serde::Deserialize;

use bidbuilder_store::User;

use crate::api::AppState;
use crate::auth::CurrentUser;
use crate::error::ServerError;
use crate::service::identity::{self, AccessToken, Registration};
use crate::service::users;

#[derive(Deserialize)]
pub(super) struct LoginForm {
    username: String,
    password: String,
}

pub(super) async fn register(
    State(state): State<AppState>,
    Json(form): Json<Registration>,
) -> Result<(StatusCode, Json<User>), ServerError> {
    let db = state.db()?;
    let user = identity::register(&db, &form)?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Form-encoded, so standard OAuth2 password-flow clients can log in.
pub(super) async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<AccessToken>, ServerError> {
    let db = state.db()?;
    let token = identity::login(&db, &state.tokens, &form.username, &form.password)?;
    Ok(Json(token))
}

pub(super) async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

pub(super) async fn list_users(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<Vec<User>>, ServerError> {
    let db = state.db()?;
    Ok(Json(users::list_assignable(&db, &actor)?))
}
