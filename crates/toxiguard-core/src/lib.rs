//! Toxiguard Core
//!
//! Core types and error handling shared across Toxiguard components.
//!
//! This crate provides:
//! - The persisted [`CommentRecord`] and its [`Label`] / [`CommentStatus`]
//! - Author identity carried from submission to storage
//! - The error taxonomy every workflow step reports through

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{Author, CommentId, CommentRecord, CommentStatus, Label};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{Author, CommentId, CommentRecord, CommentStatus, Label};
}
