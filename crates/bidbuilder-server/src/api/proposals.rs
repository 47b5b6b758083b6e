use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use bidbuilder_shared::{ProposalId, UserId};
use bidbuilder_store::{ChatMessage, Comment, NewProposal, Proposal, ProposalChanges};

use crate::api::AppState;
use crate::auth::CurrentUser;
use crate::error::ServerError;
use crate::service::chat::{self, NewMessage};
use crate::service::comments::{self, NewComment};
use crate::service::proposals::{self, FromTemplate};

#[derive(Deserialize)]
pub(super) struct SearchQuery {
    #[serde(default)]
    q: String,
}

#[derive(Deserialize)]
pub(super) struct StatusUpdate {
    status: String,
}

#[derive(Deserialize)]
pub(super) struct ReassignRequest {
    user_id: UserId,
}

pub(super) async fn list(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<Vec<Proposal>>, ServerError> {
    let db = state.db()?;
    Ok(Json(proposals::list_own(&db, &actor)?))
}

pub(super) async fn create(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(body): Json<NewProposal>,
) -> Result<(StatusCode, Json<Proposal>), ServerError> {
    let db = state.db()?;
    let proposal = proposals::create(&db, &state.analytics, &actor, &body)?;
    Ok((StatusCode::CREATED, Json(proposal)))
}

pub(super) async fn create_from_template(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(body): Json<FromTemplate>,
) -> Result<(StatusCode, Json<Proposal>), ServerError> {
    let db = state.db()?;
    let proposal = proposals::create_from_template(&db, &state.analytics, &actor, &body)?;
    Ok((StatusCode::CREATED, Json(proposal)))
}

pub(super) async fn search(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Proposal>>, ServerError> {
    let db = state.db()?;
    Ok(Json(proposals::search(&db, &actor, &query.q)?))
}

pub(super) async fn get(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<ProposalId>,
) -> Result<Json<Proposal>, ServerError> {
    let db = state.db()?;
    Ok(Json(proposals::get(&db, &actor, id)?))
}

pub(super) async fn update(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<ProposalId>,
    Json(changes): Json<ProposalChanges>,
) -> Result<Json<Proposal>, ServerError> {
    let db = state.db()?;
    Ok(Json(proposals::update(&db, &actor, id, &changes)?))
}

pub(super) async fn delete(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<ProposalId>,
) -> Result<StatusCode, ServerError> {
    let db = state.db()?;
    proposals::delete(&db, &state.analytics, &actor, id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn update_status(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<ProposalId>,
    Json(body): Json<StatusUpdate>,
) -> Result<Json<Proposal>, ServerError> {
    let db = state.db()?;
    let proposal = proposals::update_status(&db, &state.analytics, &actor, id, &body.status)?;
    Ok(Json(proposal))
}

pub(super) async fn reassign(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<ProposalId>,
    Json(body): Json<ReassignRequest>,
) -> Result<Json<Proposal>, ServerError> {
    let db = state.db()?;
    let proposal = proposals::reassign_to_user(&db, &state.analytics, &actor, id, body.user_id)?;
    Ok(Json(proposal))
}

pub(super) async fn return_to_manager(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<ProposalId>,
) -> Result<Json<Proposal>, ServerError> {
    let db = state.db()?;
    Ok(Json(proposals::return_to_manager(&db, &state.analytics, &actor, id)?))
}

// ─── Comments & chat ───

pub(super) async fn list_comments(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<ProposalId>,
) -> Result<Json<Vec<Comment>>, ServerError> {
    let db = state.db()?;
    Ok(Json(comments::list(&db, &actor, id)?))
}

pub(super) async fn add_comment(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<ProposalId>,
    Json(body): Json<NewComment>,
) -> Result<(StatusCode, Json<Comment>), ServerError> {
    let db = state.db()?;
    let comment = comments::add_to_proposal(&db, &actor, id, &body)?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub(super) async fn list_chat(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<ProposalId>,
) -> Result<Json<Vec<ChatMessage>>, ServerError> {
    let db = state.db()?;
    Ok(Json(chat::list(&db, &actor, id)?))
}

pub(super) async fn send_chat(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<ProposalId>,
    Json(body): Json<NewMessage>,
) -> Result<(StatusCode, Json<ChatMessage>), ServerError> {
    let db = state.db()?;
    let message = chat::send(&db, &actor, id, &body)?;
    Ok((StatusCode::CREATED, Json(message)))
}
