use axum::{
    extract::{Path, State},
    Json,
};

use bidbuilder_shared::NotificationId;
use bidbuilder_store::Notification;

use crate::api::AppState;
use crate::auth::CurrentUser;
use crate::error::ServerError;
use crate::service::notifications;

pub(super) async fn list(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<Vec<Notification>>, ServerError> {
    let db = state.db()?;
    Ok(Json(notifications::list(&db, &actor)?))
}

pub(super) async fn mark_read(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<NotificationId>,
) -> Result<Json<Notification>, ServerError> {
    let db = state.db()?;
    Ok(Json(notifications::mark_read(&db, &actor, id)?))
}
