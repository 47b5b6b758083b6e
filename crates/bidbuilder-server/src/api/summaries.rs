use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use bidbuilder_shared::ProposalId;
use bidbuilder_summarizer::pdf;

use crate::api::AppState;
use crate::auth::CurrentUser;
use crate::error::ServerError;
use crate::service::proposals;

#[derive(Serialize)]
pub(super) struct SummaryResponse {
    summary: String,
    model: String,
}

pub(super) async fn proposal_summary(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<ProposalId>,
) -> Result<Json<SummaryResponse>, ServerError> {
    let proposal = {
        let db = state.db()?;
        proposals::get(&db, &actor, id)?
    };

    let summary = state
        .summarizer
        .summarize(&proposal.title, &proposal.description)
        .await?;

    Ok(Json(SummaryResponse {
        summary,
        model: state.summarizer.model().to_string(),
    }))
}

/// Multipart upload with a `file` part (the PDF) and an optional
/// `question` part.
pub(super) async fn summarize_pdf(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    mut multipart: Multipart,
) -> Result<Json<SummaryResponse>, ServerError> {
    let mut file = None;
    let mut question = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ServerError::BadRequest(format!("Failed to read file: {e}")))?;
                file = Some(data);
            }
            Some("question") => {
                question = field
                    .text()
                    .await
                    .map_err(|e| ServerError::BadRequest(format!("Failed to read question: {e}")))?;
            }
            _ => {}
        }
    }

    let data = file.ok_or_else(|| {
        ServerError::BadRequest("Missing 'file' field in multipart form".to_string())
    })?;
    let size = data.len();

    let text = tokio::task::spawn_blocking(move || pdf::extract_text(&data))
        .await
        .map_err(|e| ServerError::Internal(format!("PDF extraction task failed: {e}")))??;

    info!(user_id = actor.id, size, chars = text.len(), "summarizing uploaded PDF");

    let summary = state.summarizer.summarize_document(&text, &question).await?;

    Ok(Json(SummaryResponse {
        summary,
        model: state.summarizer.model().to_string(),
    }))
}
