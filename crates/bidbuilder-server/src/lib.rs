//! # bidbuilder-server
//!
//! REST backend for BidBuilder.
//!
//! - **Accounts**: registration, form login issuing bearer tokens, role
//!   model of admin / manager / user
//! - **Proposals**: creation (optionally from a template), edits, free-text
//!   status, hand-off between a manager and a user, sections, comments and
//!   a two-party chat
//! - **Notifications** raised when a section changes hands
//! - **Analytics** recomputed after each proposal mutation
//! - **Summaries** of proposals and uploaded PDFs through a local LLM server

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod policy;
pub mod service;

pub use api::{build_router, AppState};
pub use config::ServerConfig;
pub use error::ServerError;
