use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use bidbuilder_shared::TemplateId;
use bidbuilder_store::{NewTemplate, Template};

use crate::api::AppState;
use crate::auth::CurrentUser;
use crate::error::ServerError;
use crate::service::templates;

pub(super) async fn list(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<Vec<Template>>, ServerError> {
    let db = state.db()?;
    Ok(Json(templates::list(&db, &actor)?))
}

pub(super) async fn create(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(body): Json<NewTemplate>,
) -> Result<(StatusCode, Json<Template>), ServerError> {
    let db = state.db()?;
    let template = templates::create(&db, &actor, &body)?;
    Ok((StatusCode::CREATED, Json(template)))
}

pub(super) async fn get(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<TemplateId>,
) -> Result<Json<Template>, ServerError> {
    let db = state.db()?;
    Ok(Json(templates::get(&db, &actor, id)?))
}

pub(super) async fn update(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<TemplateId>,
    Json(body): Json<NewTemplate>,
) -> Result<Json<Template>, ServerError> {
    let db = state.db()?;
    Ok(Json(templates::update(&db, &actor, id, &body)?))
}

pub(super) async fn delete(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<TemplateId>,
) -> Result<StatusCode, ServerError> {
    let db = state.db()?;
    templates::delete(&db, &actor, id)?;
    Ok(StatusCode::NO_CONTENT)
}
