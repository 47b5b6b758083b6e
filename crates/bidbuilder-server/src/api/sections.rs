use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use bidbuilder_shared::{ProposalId, SectionId, UserId};
use bidbuilder_store::{Comment, ProposalSection};

use crate::api::AppState;
use crate::auth::CurrentUser;
use crate::error::ServerError;
use crate::service::comments::{self, NewComment};
use crate::service::sections::{self, NewSection};

#[derive(Deserialize)]
pub(super) struct AssignRequest {
    user_id: UserId,
}

pub(super) async fn list(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(proposal_id): Path<ProposalId>,
) -> Result<Json<Vec<ProposalSection>>, ServerError> {
    let db = state.db()?;
    Ok(Json(sections::list(&db, &actor, proposal_id)?))
}

pub(super) async fn add(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(proposal_id): Path<ProposalId>,
    Json(body): Json<NewSection>,
) -> Result<(StatusCode, Json<ProposalSection>), ServerError> {
    let db = state.db()?;
    let section = sections::add(&db, &actor, proposal_id, &body)?;
    Ok((StatusCode::CREATED, Json(section)))
}

pub(super) async fn fetch(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<SectionId>,
) -> Result<Json<ProposalSection>, ServerError> {
    let db = state.db()?;
    Ok(Json(sections::fetch(&db, &actor, id)?))
}

pub(super) async fn assign(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<SectionId>,
    Json(body): Json<AssignRequest>,
) -> Result<Json<ProposalSection>, ServerError> {
    let db = state.db()?;
    Ok(Json(sections::assign(&db, &actor, id, body.user_id)?))
}

pub(super) async fn comment(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<SectionId>,
    Json(body): Json<NewComment>,
) -> Result<(StatusCode, Json<Comment>), ServerError> {
    let db = state.db()?;
    let comment = comments::add_to_section(&db, &actor, id, &body)?;
    Ok((StatusCode::CREATED, Json(comment)))
}
