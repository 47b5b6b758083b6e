//! # bidbuilder-store
//!
//! Relational storage for BidBuilder, backed by SQLite.
//!
//! The crate exposes a synchronous [`Database`] handle that wraps a
//! `rusqlite::Connection`, runs schema migrations on open and provides typed
//! CRUD helpers for every domain model. Multi-statement operations are
//! wrapped in [`Database::transaction`] so they commit or roll back as one.

pub mod analytics;
pub mod chat;
pub mod comments;
pub mod database;
pub mod migrations;
pub mod models;
pub mod notifications;
pub mod proposals;
pub mod sections;
pub mod templates;
pub mod users;

mod error;
mod row;

pub use database::{Database, Tx};
pub use error::{Result, StoreError};
pub use models::*;
