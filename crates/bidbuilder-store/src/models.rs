//! Domain model structs persisted in the SQLite database.
//!
//! Every struct derives `Serialize` so handlers can return it directly as a
//! JSON response body.

use bidbuilder_shared::{
    ChatMessageId, CommentId, NotificationId, ProposalId, Role, SectionId, TemplateId, UserId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string. Never serialized.
    #[serde(skip_serializing, default)]
    pub hashed_password: String,
    pub is_active: bool,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Proposal
// ---------------------------------------------------------------------------

/// A bid document tracked through free-form status labels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Proposal {
    pub id: ProposalId,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub status: String,
    /// Current holder: the creating manager, or a user it was reassigned to.
    pub owner_id: UserId,
    /// Manager who last handed the proposal to a user. Kept after return.
    pub assigned_by_manager_id: Option<UserId>,
    /// Manager to hand the proposal back to. Cleared on return.
    pub return_to_manager_id: Option<UserId>,
    pub template_id: Option<TemplateId>,
    pub estimated_value: Option<f64>,
    pub timeline: Option<String>,
    pub priority: Option<String>,
    pub requirements: Option<String>,
    pub client_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating a proposal.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewProposal {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Option<String>,
    pub status: Option<String>,
    pub estimated_value: Option<f64>,
    pub timeline: Option<String>,
    pub priority: Option<String>,
    pub requirements: Option<String>,
    pub client_name: Option<String>,
}

/// Partial edit of the descriptive proposal fields. `None` leaves a field
/// untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProposalChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub estimated_value: Option<f64>,
    pub timeline: Option<String>,
    pub priority: Option<String>,
    pub requirements: Option<String>,
    pub client_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Sections & comments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProposalSection {
    pub id: SectionId,
    pub proposal_id: ProposalId,
    pub title: String,
    pub content: String,
    pub is_sensitive: bool,
    pub assigned_user_id: Option<UserId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub proposal_id: ProposalId,
    /// Set when the comment was made on a specific section.
    pub section_id: Option<SectionId>,
    pub user_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// A proposal chat message. `visible_to_user` is decided once, when the
/// message is written, and never re-evaluated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: ChatMessageId,
    pub proposal_id: ProposalId,
    pub sender_id: UserId,
    pub content: String,
    pub visible_to_user: bool,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Template
// ---------------------------------------------------------------------------

/// A reusable proposal blueprint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    /// Ordered section titles.
    pub sections: Vec<String>,
    pub estimated_value: Option<f64>,
    pub timeline: Option<String>,
    pub usage_count: i64,
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewTemplate {
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub sections: Vec<String>,
    pub estimated_value: Option<f64>,
    pub timeline: Option<String>,
    pub content: Option<String>,
}

// ---------------------------------------------------------------------------
// Notification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
