//! Capability checks.
//!
//! Every endpoint asks [`authorize`] before touching state, so the rules for
//! who may do what live in this one table instead of being repeated per
//! handler.

use bidbuilder_shared::Role;
use bidbuilder_store::{Notification, Proposal, ProposalSection, User};

use crate::error::ServerError;

/// What the action is performed on.
#[derive(Debug, Clone, Copy)]
pub enum Resource<'a> {
    /// Actions that are not tied to an existing record.
    Global,
    Proposal(&'a Proposal),
    Section {
        proposal: &'a Proposal,
        section: &'a ProposalSection,
    },
    Notification(&'a Notification),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateProposal,
    ViewProposal,
    /// Edit fields, set status, delete, add or assign sections.
    ModifyProposal,
    ReassignProposal,
    ReturnProposal,
    Chat,
    ViewSection,
    CommentOnSection,
    ManageTemplates,
    ListUsers,
    ReadNotification,
}

/// Roles allowed to read sections flagged sensitive. Every defined role is
/// listed; access to the parent proposal is still required.
const SENSITIVE_SECTION_ROLES: [Role; 3] = [Role::Admin, Role::Manager, Role::User];

/// Pure capability check. Mismatched action/resource pairs are refused.
pub fn can(actor: &User, resource: Resource<'_>, action: Action) -> bool {
    match (action, resource) {
        (Action::CreateProposal, Resource::Global) => actor.role == Role::Manager,
        (Action::ManageTemplates | Action::ListUsers, Resource::Global) => actor.role.is_staff(),

        (Action::ViewProposal, Resource::Proposal(p)) => can_view(actor, p),
        (Action::ModifyProposal, Resource::Proposal(p)) => is_owner(actor, p) || actor.role.is_staff(),
        (Action::ReassignProposal, Resource::Proposal(p)) => {
            is_owner(actor, p) && actor.role == Role::Manager
        }
        (Action::ReturnProposal, Resource::Proposal(p)) => is_owner(actor, p),
        (Action::Chat, Resource::Proposal(p)) => {
            is_owner(actor, p) || p.assigned_by_manager_id == Some(actor.id)
        }

        (Action::ViewSection | Action::CommentOnSection, Resource::Section { proposal, section }) => {
            let reachable = can_view(actor, proposal) || section.assigned_user_id == Some(actor.id);
            reachable && (!section.is_sensitive || SENSITIVE_SECTION_ROLES.contains(&actor.role))
        }

        (Action::ReadNotification, Resource::Notification(n)) => n.user_id == actor.id,

        _ => false,
    }
}

/// [`can`], surfaced as `Forbidden` on refusal.
pub fn authorize(actor: &User, resource: Resource<'_>, action: Action) -> Result<(), ServerError> {
    if can(actor, resource, action) {
        Ok(())
    } else {
        tracing::debug!(user_id = actor.id, ?action, "capability refused");
        Err(ServerError::Forbidden(refusal(action).to_string()))
    }
}

fn is_owner(actor: &User, proposal: &Proposal) -> bool {
    proposal.owner_id == actor.id
}

fn can_view(actor: &User, proposal: &Proposal) -> bool {
    is_owner(actor, proposal)
        || proposal.assigned_by_manager_id == Some(actor.id)
        || actor.role.is_staff()
}

fn refusal(action: Action) -> &'static str {
    match action {
        Action::CreateProposal => "Only managers can create proposals",
        Action::ViewProposal => "Not allowed to view this proposal",
        Action::ModifyProposal => "Not authorized to modify this proposal",
        Action::ReassignProposal => "Only the owning manager can reassign this proposal",
        Action::ReturnProposal => "Only the current owner can return this proposal",
        Action::Chat => "Not part of this proposal's conversation",
        Action::ViewSection | Action::CommentOnSection => "Not allowed to access this section",
        Action::ManageTemplates => "Only managers and admins can manage templates",
        Action::ListUsers => "Only managers and admins can list users",
        Action::ReadNotification => "Not your notification",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(id: i64, role: Role) -> User {
        User {
            id,
            username: format!("u{id}"),
            email: format!("u{id}@example.com"),
            hashed_password: String::new(),
            is_active: true,
            role,
            created_at: Utc::now(),
        }
    }

    fn proposal(owner_id: i64, assigned_by: Option<i64>) -> Proposal {
        let now = Utc::now();
        Proposal {
            id: 1,
            title: "Bid".into(),
            description: String::new(),
            category: None,
            status: "Draft".into(),
            owner_id,
            assigned_by_manager_id: assigned_by,
            return_to_manager_id: assigned_by,
            template_id: None,
            estimated_value: None,
            timeline: None,
            priority: None,
            requirements: None,
            client_name: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn section(assigned: Option<i64>, is_sensitive: bool) -> ProposalSection {
        ProposalSection {
            id: 7,
            proposal_id: 1,
            title: "Pricing".into(),
            content: String::new(),
            is_sensitive,
            assigned_user_id: assigned,
        }
    }

    #[test]
    fn only_managers_create_proposals() {
        assert!(can(&user(1, Role::Manager), Resource::Global, Action::CreateProposal));
        assert!(!can(&user(1, Role::Admin), Resource::Global, Action::CreateProposal));
        assert!(!can(&user(1, Role::User), Resource::Global, Action::CreateProposal));
    }

    #[test]
    fn modify_allows_owner_and_staff() {
        let p = proposal(5, None);
        assert!(can(&user(5, Role::User), Resource::Proposal(&p), Action::ModifyProposal));
        assert!(can(&user(9, Role::Admin), Resource::Proposal(&p), Action::ModifyProposal));
        assert!(!can(&user(9, Role::User), Resource::Proposal(&p), Action::ModifyProposal));
    }

    #[test]
    fn reassign_requires_owning_manager() {
        let p = proposal(2, None);
        assert!(can(&user(2, Role::Manager), Resource::Proposal(&p), Action::ReassignProposal));
        assert!(!can(&user(3, Role::Manager), Resource::Proposal(&p), Action::ReassignProposal));

        let held = proposal(4, Some(2));
        assert!(!can(&user(4, Role::User), Resource::Proposal(&held), Action::ReassignProposal));
    }

    #[test]
    fn chat_is_owner_and_assigning_manager_only() {
        let p = proposal(4, Some(2));
        assert!(can(&user(4, Role::User), Resource::Proposal(&p), Action::Chat));
        assert!(can(&user(2, Role::Manager), Resource::Proposal(&p), Action::Chat));
        assert!(!can(&user(3, Role::Admin), Resource::Proposal(&p), Action::Chat));
    }

    #[test]
    fn assignee_reaches_section_without_proposal_access() {
        let p = proposal(2, None);
        let s = section(Some(8), true);
        let res = Resource::Section { proposal: &p, section: &s };
        assert!(can(&user(8, Role::User), res, Action::ViewSection));
        assert!(!can(&user(9, Role::User), res, Action::ViewSection));
    }

    #[test]
    fn mismatched_resource_is_refused() {
        let p = proposal(1, None);
        assert!(!can(&user(1, Role::Manager), Resource::Proposal(&p), Action::CreateProposal));
        assert!(!can(&user(1, Role::Admin), Resource::Global, Action::ModifyProposal));
    }

    #[test]
    fn authorize_returns_forbidden() {
        let err = authorize(&user(1, Role::User), Resource::Global, Action::ListUsers).unwrap_err();
        assert!(matches!(err, ServerError::Forbidden(_)));
    }
}
