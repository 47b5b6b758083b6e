//! Proposal chat between the current owner and the assigning manager.
//!
//! A message's `visible_to_user` flag is fixed when it is written: true
//! unless the proposal was already approved. The read filter is decided at
//! read time: only when the proposal is approved *now* and the reader is the
//! current owner are hidden messages dropped. A message sent before approval
//! therefore stays visible to the owner after approval, while one sent after
//! approval never is.

use serde::Deserialize;
use tracing::debug;

use bidbuilder_shared::constants::APPROVED_STATUS;
use bidbuilder_shared::ProposalId;
use bidbuilder_store::{ChatMessage, Database, User};

use crate::error::ServerError;
use crate::policy::Action;
use crate::service::proposals::load;
use crate::service::required;

#[derive(Debug, Clone, Deserialize)]
pub struct NewMessage {
    pub content: String,
}

pub fn send(
    db: &Database,
    actor: &User,
    proposal_id: ProposalId,
    message: &NewMessage,
) -> Result<ChatMessage, ServerError> {
    let proposal = load(db, actor, proposal_id, Action::Chat)?;
    let content = required(&message.content, "content")?;
    let visible = proposal.status != APPROVED_STATUS;

    let sent = db.insert_chat_message(proposal_id, actor.id, &content, visible)?;
    debug!(proposal_id, sender_id = actor.id, visible, "chat message stored");
    Ok(sent)
}

pub fn list(
    db: &Database,
    actor: &User,
    proposal_id: ProposalId,
) -> Result<Vec<ChatMessage>, ServerError> {
    let proposal = load(db, actor, proposal_id, Action::Chat)?;
    let only_visible = proposal.status == APPROVED_STATUS && proposal.owner_id == actor.id;
    Ok(db.list_chat_messages(proposal_id, only_visible)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing;
    use bidbuilder_shared::Role;
    use bidbuilder_store::NewProposal;

    fn say(text: &str) -> NewMessage {
        NewMessage { content: text.into() }
    }

    #[test]
    fn approval_hides_later_messages_from_owner_only() {
        let db = testing::db();
        let mgr = testing::account(&db, "mgr", Role::Manager);
        let user = testing::account(&db, "u", Role::User);
        let p = db
            .insert_proposal(mgr.id, &NewProposal { title: "Bid".into(), ..Default::default() }, None)
            .unwrap();
        db.reassign_proposal(p.id, user.id, mgr.id).unwrap();

        let early = send(&db, &mgr, p.id, &say("draft note")).unwrap();
        assert!(early.visible_to_user);

        db.set_proposal_status(p.id, APPROVED_STATUS).unwrap();
        let late = send(&db, &mgr, p.id, &say("internal note")).unwrap();
        assert!(!late.visible_to_user);

        let owner_view: Vec<_> = list(&db, &user, p.id)
            .unwrap()
            .into_iter()
            .map(|m| m.content)
            .collect();
        assert_eq!(owner_view, vec!["draft note"]);

        assert_eq!(list(&db, &mgr, p.id).unwrap().len(), 2);
    }

    #[test]
    fn outsiders_cannot_chat() {
        let db = testing::db();
        let mgr = testing::account(&db, "mgr", Role::Manager);
        let admin = testing::account(&db, "root", Role::Admin);
        let p = db
            .insert_proposal(mgr.id, &NewProposal { title: "Bid".into(), ..Default::default() }, None)
            .unwrap();

        assert!(matches!(
            send(&db, &admin, p.id, &say("hi")),
            Err(ServerError::Forbidden(_))
        ));
        assert!(matches!(list(&db, &admin, p.id), Err(ServerError::Forbidden(_))));
    }
}
