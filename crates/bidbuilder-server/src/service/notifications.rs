//! Notification fan-out and the recipient's inbox.

use tracing::info;

use bidbuilder_shared::{NotificationId, UserId};
use bidbuilder_store::{Database, Notification, ProposalSection, User};

use crate::error::{missing, ServerError};
use crate::policy::{self, Action, Resource};

/// Tell `assignee` they now own `section`. Called by section assignment
/// inside its transaction, so the notice commits with the assignment.
pub fn section_assigned(
    db: &Database,
    section: &ProposalSection,
    assignee: UserId,
) -> Result<Notification, ServerError> {
    let message = format!(
        "You have been assigned to section '{}' in proposal #{}",
        section.title, section.proposal_id
    );
    let notice = db.insert_notification(assignee, &message)?;
    info!(
        user_id = assignee,
        section_id = section.id,
        proposal_id = section.proposal_id,
        "section assignment notification queued"
    );
    Ok(notice)
}

/// The actor's notifications, newest first.
pub fn list(db: &Database, actor: &User) -> Result<Vec<Notification>, ServerError> {
    Ok(db.list_notifications(actor.id)?)
}

pub fn mark_read(
    db: &Database,
    actor: &User,
    id: NotificationId,
) -> Result<Notification, ServerError> {
    let notice = db.get_notification(id).map_err(missing("Notification"))?;
    policy::authorize(actor, Resource::Notification(&notice), Action::ReadNotification)?;
    Ok(db.mark_notification_read(id)?)
}
