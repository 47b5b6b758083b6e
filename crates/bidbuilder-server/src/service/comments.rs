//! Comments on proposals and on individual sections.

use serde::Deserialize;

use bidbuilder_shared::{ProposalId, SectionId};
use bidbuilder_store::{Comment, Database, User};

use crate::error::ServerError;
use crate::policy::Action;
use crate::service::proposals::load;
use crate::service::required;
use crate::service::sections::load_section;

#[derive(Debug, Clone, Deserialize)]
pub struct NewComment {
    pub content: String,
}

pub fn add_to_proposal(
    db: &Database,
    actor: &User,
    proposal_id: ProposalId,
    comment: &NewComment,
) -> Result<Comment, ServerError> {
    load(db, actor, proposal_id, Action::ViewProposal)?;
    let content = required(&comment.content, "content")?;
    Ok(db.insert_comment(proposal_id, None, actor.id, &content)?)
}

pub fn add_to_section(
    db: &Database,
    actor: &User,
    section_id: SectionId,
    comment: &NewComment,
) -> Result<Comment, ServerError> {
    let (proposal, section) = load_section(db, actor, section_id, Action::CommentOnSection)?;
    let content = required(&comment.content, "content")?;
    Ok(db.insert_comment(proposal.id, Some(section.id), actor.id, &content)?)
}

/// Every comment on the proposal, section comments included, oldest first.
pub fn list(db: &Database, actor: &User, proposal_id: ProposalId) -> Result<Vec<Comment>, ServerError> {
    load(db, actor, proposal_id, Action::ViewProposal)?;
    Ok(db.list_comments(proposal_id)?)
}
