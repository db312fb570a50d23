//! Toxiguard Store
//!
//! Persistence for accepted comments.
//!
//! The store is append-only: records are written once, never updated in
//! place and never deleted by the submission workflow. Two backends are
//! provided:
//! - [`MemoryCommentStore`] for tests and ephemeral deployments
//! - [`JsonlCommentStore`], one JSON object per line in a single file

pub mod persistence;
pub mod query;
pub mod store;

pub use persistence::{open_store, JsonlCommentStore, StoreBackend, StoreConfig};
pub use query::CommentQuery;
pub use store::{CommentStore, MemoryCommentStore};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::query::CommentQuery;
    pub use crate::store::{CommentStore, MemoryCommentStore};
}
