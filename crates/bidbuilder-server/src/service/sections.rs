//! Proposal sections: add, list, fetch, assign.

use serde::Deserialize;
use tracing::info;

use bidbuilder_shared::{ProposalId, SectionId, UserId};
use bidbuilder_store::{Database, Proposal, ProposalSection, User};

use crate::error::{missing, ServerError};
use crate::policy::{self, Action, Resource};
use crate::service::proposals::load;
use crate::service::{notifications, required};

#[derive(Debug, Clone, Deserialize)]
pub struct NewSection {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub is_sensitive: bool,
}

/// Load a section with its proposal and check `action` against both.
pub(crate) fn load_section(
    db: &Database,
    actor: &User,
    id: SectionId,
    action: Action,
) -> Result<(Proposal, ProposalSection), ServerError> {
    let section = db.get_section(id).map_err(missing("Section"))?;
    let proposal = db
        .get_proposal(section.proposal_id)
        .map_err(missing("Proposal"))?;
    policy::authorize(
        actor,
        Resource::Section {
            proposal: &proposal,
            section: &section,
        },
        action,
    )?;
    Ok((proposal, section))
}

pub fn add(
    db: &Database,
    actor: &User,
    proposal_id: ProposalId,
    section: &NewSection,
) -> Result<ProposalSection, ServerError> {
    load(db, actor, proposal_id, Action::ModifyProposal)?;
    let title = required(&section.title, "title")?;
    Ok(db.insert_section(proposal_id, &title, &section.content, section.is_sensitive)?)
}

pub fn list(
    db: &Database,
    actor: &User,
    proposal_id: ProposalId,
) -> Result<Vec<ProposalSection>, ServerError> {
    load(db, actor, proposal_id, Action::ViewProposal)?;
    Ok(db.list_sections(proposal_id)?)
}

pub fn fetch(db: &Database, actor: &User, id: SectionId) -> Result<ProposalSection, ServerError> {
    let (_, section) = load_section(db, actor, id, Action::ViewSection)?;
    Ok(section)
}

/// Point a section at `assignee`. A change of assignee notifies the new
/// assignee in the same transaction; re-assigning the current assignee is a
/// no-op.
pub fn assign(
    db: &Database,
    actor: &User,
    id: SectionId,
    assignee: UserId,
) -> Result<ProposalSection, ServerError> {
    let section = db.get_section(id).map_err(missing("Section"))?;
    load(db, actor, section.proposal_id, Action::ModifyProposal)?;
    db.get_user(assignee).map_err(missing("User"))?;

    if section.assigned_user_id == Some(assignee) {
        return Ok(section);
    }

    let tx = db.transaction()?;
    let section = db.set_section_assignee(id, assignee)?;
    notifications::section_assigned(db, &section, assignee)?;
    tx.commit()?;

    info!(section_id = id, user_id = assignee, by = actor.id, "section assigned");
    Ok(section)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing;
    use bidbuilder_shared::Role;
    use bidbuilder_store::NewProposal;

    struct Fixture {
        db: Database,
        mgr: User,
        alice: User,
        bob: User,
        section: ProposalSection,
    }

    fn fixture() -> Fixture {
        let db = testing::db();
        let mgr = testing::account(&db, "mgr", Role::Manager);
        let alice = testing::account(&db, "alice", Role::User);
        let bob = testing::account(&db, "bob", Role::User);
        let p = db
            .insert_proposal(mgr.id, &NewProposal { title: "Bid".into(), ..Default::default() }, None)
            .unwrap();
        let section = add(
            &db,
            &mgr,
            p.id,
            &NewSection {
                title: "Pricing".into(),
                content: String::new(),
                is_sensitive: true,
            },
        )
        .unwrap();
        Fixture { db, mgr, alice, bob, section }
    }

    #[test]
    fn assignment_notifies_new_assignee_once() {
        let f = fixture();

        assign(&f.db, &f.mgr, f.section.id, f.alice.id).unwrap();
        let inbox = f.db.list_notifications(f.alice.id).unwrap();
        assert_eq!(inbox.len(), 1);
        assert!(!inbox[0].is_read);
        assert!(inbox[0].message.contains("Pricing"));
        assert!(inbox[0].message.contains(&format!("#{}", f.section.proposal_id)));

        // same assignee again: no change, no notice
        assign(&f.db, &f.mgr, f.section.id, f.alice.id).unwrap();
        assert_eq!(f.db.list_notifications(f.alice.id).unwrap().len(), 1);

        assign(&f.db, &f.mgr, f.section.id, f.bob.id).unwrap();
        assert_eq!(f.db.list_notifications(f.bob.id).unwrap().len(), 1);
        assert_eq!(f.db.list_notifications(f.alice.id).unwrap().len(), 1);
    }

    #[test]
    fn outsiders_cannot_assign_or_fetch() {
        let f = fixture();
        assert!(matches!(
            assign(&f.db, &f.alice, f.section.id, f.bob.id),
            Err(ServerError::Forbidden(_))
        ));
        assert!(matches!(
            fetch(&f.db, &f.alice, f.section.id),
            Err(ServerError::Forbidden(_))
        ));
        assert!(f.db.list_notifications(f.bob.id).unwrap().is_empty());
    }

    #[test]
    fn assignee_can_fetch_sensitive_section() {
        let f = fixture();
        assign(&f.db, &f.mgr, f.section.id, f.alice.id).unwrap();
        let s = fetch(&f.db, &f.alice, f.section.id).unwrap();
        assert!(s.is_sensitive);
        assert_eq!(s.assigned_user_id, Some(f.alice.id));
    }

    #[test]
    fn unknown_assignee_is_not_found() {
        let f = fixture();
        assert!(matches!(
            assign(&f.db, &f.mgr, f.section.id, 999),
            Err(ServerError::NotFound(_))
        ));
    }
}
