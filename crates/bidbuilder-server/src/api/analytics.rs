use std::collections::BTreeMap;

use axum::{extract::State, Json};
use serde_json::Value;

use crate::api::AppState;
use crate::auth::CurrentUser;
use crate::error::ServerError;
use crate::service::analytics;

pub(super) async fn fetch(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<BTreeMap<String, Value>>, ServerError> {
    let db = state.db()?;
    Ok(Json(analytics::fetch(&db, &actor)?))
}
