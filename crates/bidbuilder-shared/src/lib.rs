//! # bidbuilder-shared
//!
//! Types and primitives shared by the BidBuilder store and server crates:
//! the role model, well-known constants, password hashing and signed bearer
//! tokens.

pub mod constants;
pub mod error;
pub mod password;
pub mod token;
pub mod types;

pub use error::SharedError;
pub use types::*;
