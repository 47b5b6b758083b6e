//! Proposal lifecycle: creation, edits, status, ownership hand-offs and
//! deletion.
//!
//! Status is a free-text label. Any actor allowed to modify a proposal may
//! set it to any non-empty string; there is no transition graph.

use serde::Deserialize;
use tracing::info;

use bidbuilder_shared::{ProposalId, Role, TemplateId, UserId};
use bidbuilder_store::{Database, NewProposal, Proposal, ProposalChanges, User};

use crate::error::{missing, ServerError};
use crate::policy::{self, Action, Resource};
use crate::service::analytics::Aggregator;
use crate::service::required;

#[derive(Debug, Clone, Deserialize)]
pub struct FromTemplate {
    pub template_id: TemplateId,
    pub title: String,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

/// Load a proposal and check `action` against it.
pub(crate) fn load(
    db: &Database,
    actor: &User,
    id: ProposalId,
    action: Action,
) -> Result<Proposal, ServerError> {
    let proposal = db.get_proposal(id).map_err(missing("Proposal"))?;
    policy::authorize(actor, Resource::Proposal(&proposal), action)?;
    Ok(proposal)
}

pub fn create(
    db: &Database,
    analytics: &Aggregator,
    actor: &User,
    fields: &NewProposal,
) -> Result<Proposal, ServerError> {
    policy::authorize(actor, Resource::Global, Action::CreateProposal)?;
    let fields = NewProposal {
        title: required(&fields.title, "title")?,
        ..fields.clone()
    };

    let tx = db.transaction()?;
    let proposal = db.insert_proposal(actor.id, &fields, None)?;
    analytics.recompute(db)?;
    tx.commit()?;

    info!(proposal_id = proposal.id, user_id = actor.id, "proposal created");
    Ok(proposal)
}

/// Create a proposal seeded from a template: category, description, value
/// and timeline are copied and one empty section is added per template
/// section title. The usage counter moves with the insert.
pub fn create_from_template(
    db: &Database,
    analytics: &Aggregator,
    actor: &User,
    request: &FromTemplate,
) -> Result<Proposal, ServerError> {
    policy::authorize(actor, Resource::Global, Action::CreateProposal)?;
    let title = required(&request.title, "title")?;

    let tx = db.transaction()?;
    let template = db
        .get_template(request.template_id)
        .map_err(missing("Template"))?;

    let fields = NewProposal {
        title,
        description: template.description.clone().unwrap_or_default(),
        category: template.category.clone(),
        estimated_value: template.estimated_value,
        timeline: template.timeline.clone(),
        priority: request.priority.clone(),
        client_name: request.client_name.clone(),
        ..Default::default()
    };
    let proposal = db.insert_proposal(actor.id, &fields, Some(template.id))?;
    for title in &template.sections {
        db.insert_section(proposal.id, title, "", false)?;
    }
    db.increment_template_usage(template.id)?;
    analytics.recompute(db)?;
    tx.commit()?;

    info!(
        proposal_id = proposal.id,
        template_id = template.id,
        sections = template.sections.len(),
        "proposal created from template"
    );
    Ok(proposal)
}

pub fn get(db: &Database, actor: &User, id: ProposalId) -> Result<Proposal, ServerError> {
    load(db, actor, id, Action::ViewProposal)
}

/// Proposals the actor currently owns, newest first.
pub fn list_own(db: &Database, actor: &User) -> Result<Vec<Proposal>, ServerError> {
    Ok(db.list_proposals_owned_by(actor.id)?)
}

/// Case-insensitive substring search over the actor's own proposals,
/// matching the description or any section's content.
pub fn search(db: &Database, actor: &User, query: &str) -> Result<Vec<Proposal>, ServerError> {
    Ok(db.search_proposals_owned_by(actor.id, query.trim())?)
}

pub fn update(
    db: &Database,
    actor: &User,
    id: ProposalId,
    changes: &ProposalChanges,
) -> Result<Proposal, ServerError> {
    load(db, actor, id, Action::ModifyProposal)?;
    let changes = ProposalChanges {
        title: changes.title.as_deref().map(|t| required(t, "title")).transpose()?,
        ..changes.clone()
    };
    Ok(db.update_proposal(id, &changes)?)
}

pub fn update_status(
    db: &Database,
    analytics: &Aggregator,
    actor: &User,
    id: ProposalId,
    status: &str,
) -> Result<Proposal, ServerError> {
    load(db, actor, id, Action::ModifyProposal)?;
    let status = required(status, "status")?;

    let tx = db.transaction()?;
    let proposal = db.set_proposal_status(id, &status)?;
    analytics.recompute(db)?;
    tx.commit()?;

    info!(proposal_id = id, status = %proposal.status, user_id = actor.id, "status updated");
    Ok(proposal)
}

/// Delete a proposal together with its sections, comments and chat.
pub fn delete(
    db: &Database,
    analytics: &Aggregator,
    actor: &User,
    id: ProposalId,
) -> Result<(), ServerError> {
    load(db, actor, id, Action::ModifyProposal)?;

    let tx = db.transaction()?;
    db.delete_proposal(id)?;
    analytics.recompute(db)?;
    tx.commit()?;

    info!(proposal_id = id, user_id = actor.id, "proposal deleted");
    Ok(())
}

/// Hand a proposal from its owning manager to a `user`-role account. The
/// manager is remembered as the return target.
pub fn reassign_to_user(
    db: &Database,
    analytics: &Aggregator,
    actor: &User,
    id: ProposalId,
    target_id: UserId,
) -> Result<Proposal, ServerError> {
    load(db, actor, id, Action::ReassignProposal)?;

    let target = db.get_user(target_id).map_err(missing("User"))?;
    if target.role != Role::User {
        return Err(ServerError::BadRequest(
            "Proposals can only be reassigned to user accounts".into(),
        ));
    }

    let tx = db.transaction()?;
    let proposal = db.reassign_proposal(id, target.id, actor.id)?;
    analytics.recompute(db)?;
    tx.commit()?;

    info!(proposal_id = id, from = actor.id, to = target.id, "proposal reassigned");
    Ok(proposal)
}

/// Give the proposal back to the manager who reassigned it.
pub fn return_to_manager(
    db: &Database,
    analytics: &Aggregator,
    actor: &User,
    id: ProposalId,
) -> Result<Proposal, ServerError> {
    let proposal = load(db, actor, id, Action::ReturnProposal)?;

    let manager_id = proposal.return_to_manager_id.ok_or_else(|| {
        ServerError::BadRequest("Proposal has no manager to return to".into())
    })?;
    let manager = db.get_user(manager_id).map_err(|err| match err {
        bidbuilder_store::StoreError::NotFound => {
            ServerError::BadRequest("Recorded manager no longer exists".into())
        }
        other => other.into(),
    })?;
    if manager.role != Role::Manager || !manager.is_active {
        return Err(ServerError::BadRequest(
            "Recorded manager is not an active manager".into(),
        ));
    }

    let tx = db.transaction()?;
    let proposal = db.return_proposal(id, manager.id)?;
    analytics.recompute(db)?;
    tx.commit()?;

    info!(proposal_id = id, manager_id = manager.id, "proposal returned to manager");
    Ok(proposal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing;
    use bidbuilder_shared::constants::{ANALYTICS_BY_STATUS, ANALYTICS_TEAM};
    use bidbuilder_store::NewTemplate;
    use serde_json::json;

    fn agg() -> Aggregator {
        Aggregator::new(6)
    }

    fn fields(title: &str) -> NewProposal {
        NewProposal {
            title: title.into(),
            description: "Bridge retrofit".into(),
            ..Default::default()
        }
    }

    fn status_counts(db: &Database) -> serde_json::Value {
        db.get_analytics(&[ANALYTICS_BY_STATUS]).unwrap()[ANALYTICS_BY_STATUS].clone()
    }

    #[test]
    fn only_managers_create() {
        let db = testing::db();
        let mgr = testing::account(&db, "mgr", Role::Manager);
        let user = testing::account(&db, "u", Role::User);

        let p = create(&db, &agg(), &mgr, &fields("A")).unwrap();
        assert_eq!(p.owner_id, mgr.id);
        assert_eq!(p.status, "Draft");
        assert_eq!(status_counts(&db), json!([{"name": "Draft", "value": 1}]));

        assert!(matches!(
            create(&db, &agg(), &user, &fields("B")),
            Err(ServerError::Forbidden(_))
        ));
    }

    #[test]
    fn from_template_copies_fields_and_counts_usage() {
        let db = testing::db();
        let mgr = testing::account(&db, "mgr", Role::Manager);
        let t = db
            .insert_template(&NewTemplate {
                name: "T1".into(),
                category: Some("Infrastructure".into()),
                sections: vec!["Exec Summary".into()],
                estimated_value: Some(1000.0),
                timeline: Some("3mo".into()),
                ..Default::default()
            })
            .unwrap();

        let request = FromTemplate {
            template_id: t.id,
            title: "Proposal A".into(),
            client_name: None,
            priority: None,
        };
        let p = create_from_template(&db, &agg(), &mgr, &request).unwrap();

        assert_eq!(p.category.as_deref(), Some("Infrastructure"));
        assert_eq!(p.estimated_value, Some(1000.0));
        assert_eq!(p.timeline.as_deref(), Some("3mo"));
        assert_eq!(p.template_id, Some(t.id));
        assert_eq!(db.get_template(t.id).unwrap().usage_count, 1);

        let sections = db.list_sections(p.id).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Exec Summary");

        create_from_template(&db, &agg(), &mgr, &request).unwrap();
        assert_eq!(db.get_template(t.id).unwrap().usage_count, 2);
    }

    #[test]
    fn missing_template_creates_nothing() {
        let db = testing::db();
        let mgr = testing::account(&db, "mgr", Role::Manager);
        let request = FromTemplate {
            template_id: 404,
            title: "Ghost".into(),
            client_name: None,
            priority: None,
        };

        assert!(matches!(
            create_from_template(&db, &agg(), &mgr, &request),
            Err(ServerError::NotFound(_))
        ));
        assert!(db.list_proposals_owned_by(mgr.id).unwrap().is_empty());
    }

    #[test]
    fn failed_usage_increment_rolls_back_proposal_and_sections() {
        let db = testing::db();
        let mgr = testing::account(&db, "mgr", Role::Manager);
        let t = db
            .insert_template(&NewTemplate {
                name: "T1".into(),
                sections: vec!["Exec Summary".into(), "Pricing".into()],
                ..Default::default()
            })
            .unwrap();
        db.conn()
            .execute_batch(
                "CREATE TRIGGER usage_locked BEFORE UPDATE OF usage_count ON templates
                 BEGIN SELECT RAISE(ABORT, 'usage counter locked'); END;",
            )
            .unwrap();

        let request = FromTemplate {
            template_id: t.id,
            title: "Proposal A".into(),
            client_name: None,
            priority: None,
        };
        assert!(create_from_template(&db, &agg(), &mgr, &request).is_err());

        assert!(db.list_proposals_owned_by(mgr.id).unwrap().is_empty());
        let sections: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM proposal_sections", [], |r| r.get(0))
            .unwrap();
        assert_eq!(sections, 0);
        assert_eq!(db.get_template(t.id).unwrap().usage_count, 0);
    }

    #[test]
    fn reassign_then_return_restores_owner() {
        let db = testing::db();
        let mgr = testing::account(&db, "mgr", Role::Manager);
        let user = testing::account(&db, "u", Role::User);
        let p = create(&db, &agg(), &mgr, &fields("A")).unwrap();

        let held = reassign_to_user(&db, &agg(), &mgr, p.id, user.id).unwrap();
        assert_eq!(held.owner_id, user.id);
        assert_eq!(held.return_to_manager_id, Some(mgr.id));
        assert_eq!(
            db.get_analytics(&[ANALYTICS_TEAM]).unwrap()[ANALYTICS_TEAM],
            json!([{"name": "u", "proposals": 1}])
        );

        let back = return_to_manager(&db, &agg(), &user, p.id).unwrap();
        assert_eq!(back.owner_id, mgr.id);
        assert_eq!(back.return_to_manager_id, None);
        assert_eq!(back.assigned_by_manager_id, Some(mgr.id));
    }

    #[test]
    fn return_without_reassignment_is_bad_request() {
        let db = testing::db();
        let mgr = testing::account(&db, "mgr", Role::Manager);
        let p = create(&db, &agg(), &mgr, &fields("A")).unwrap();

        assert!(matches!(
            return_to_manager(&db, &agg(), &mgr, p.id),
            Err(ServerError::BadRequest(_))
        ));
    }

    #[test]
    fn return_to_inactive_manager_is_bad_request() {
        let db = testing::db();
        let mgr = testing::account(&db, "mgr", Role::Manager);
        let user = testing::account(&db, "u", Role::User);
        let p = create(&db, &agg(), &mgr, &fields("A")).unwrap();
        reassign_to_user(&db, &agg(), &mgr, p.id, user.id).unwrap();
        db.set_user_active(mgr.id, false).unwrap();

        assert!(matches!(
            return_to_manager(&db, &agg(), &user, p.id),
            Err(ServerError::BadRequest(_))
        ));
    }

    #[test]
    fn reassign_rules() {
        let db = testing::db();
        let mgr = testing::account(&db, "mgr", Role::Manager);
        let other = testing::account(&db, "other", Role::Manager);
        let admin = testing::account(&db, "root", Role::Admin);
        let p = create(&db, &agg(), &mgr, &fields("A")).unwrap();

        assert!(matches!(
            reassign_to_user(&db, &agg(), &other, p.id, admin.id),
            Err(ServerError::Forbidden(_))
        ));
        assert!(matches!(
            reassign_to_user(&db, &agg(), &mgr, p.id, admin.id),
            Err(ServerError::BadRequest(_))
        ));
        assert!(matches!(
            reassign_to_user(&db, &agg(), &mgr, p.id, 999),
            Err(ServerError::NotFound(_))
        ));
    }

    #[test]
    fn delete_requires_owner_or_staff_and_recomputes() {
        let db = testing::db();
        let mgr = testing::account(&db, "mgr", Role::Manager);
        let user = testing::account(&db, "u", Role::User);
        let p = create(&db, &agg(), &mgr, &fields("A")).unwrap();
        create(&db, &agg(), &mgr, &fields("B")).unwrap();
        assert_eq!(status_counts(&db), json!([{"name": "Draft", "value": 2}]));

        assert!(matches!(
            delete(&db, &agg(), &user, p.id),
            Err(ServerError::Forbidden(_))
        ));

        delete(&db, &agg(), &mgr, p.id).unwrap();
        assert_eq!(status_counts(&db), json!([{"name": "Draft", "value": 1}]));
        assert!(matches!(get(&db, &mgr, p.id), Err(ServerError::NotFound(_))));
    }

    #[test]
    fn status_is_free_text_but_not_blank() {
        let db = testing::db();
        let mgr = testing::account(&db, "mgr", Role::Manager);
        let p = create(&db, &agg(), &mgr, &fields("A")).unwrap();

        let p = update_status(&db, &agg(), &mgr, p.id, "  Under Review ").unwrap();
        assert_eq!(p.status, "Under Review");
        assert!(matches!(
            update_status(&db, &agg(), &mgr, p.id, "   "),
            Err(ServerError::BadRequest(_))
        ));
    }

    #[test]
    fn search_is_scoped_to_owner() {
        let db = testing::db();
        let mgr = testing::account(&db, "mgr", Role::Manager);
        let other = testing::account(&db, "other", Role::Manager);
        create(&db, &agg(), &mgr, &fields("A")).unwrap();
        create(&db, &agg(), &other, &fields("B")).unwrap();

        let hits = search(&db, &mgr, "BRIDGE").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].owner_id, mgr.id);
    }

    #[test]
    fn update_edits_fields() {
        let db = testing::db();
        let mgr = testing::account(&db, "mgr", Role::Manager);
        let p = create(&db, &agg(), &mgr, &fields("A")).unwrap();

        let changes = ProposalChanges {
            client_name: Some("ACME".into()),
            ..Default::default()
        };
        let p = update(&db, &mgr, p.id, &changes).unwrap();
        assert_eq!(p.client_name.as_deref(), Some("ACME"));
        assert_eq!(p.title, "A");
    }
}
