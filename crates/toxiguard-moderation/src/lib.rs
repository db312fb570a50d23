//! Toxiguard Moderation
//!
//! The comment submission state machine.
//!
//! ```text
//! Draft --submit--> classify --non_toxic--> AcceptedClean (persisted)
//!                       |
//!                     toxic
//!                       v
//!                  Classified --accept_anyway--> AcceptedAsToxic (persisted)
//!                    |    |
//!                    |    +--edit(text')--> classify text' again
//!                    +--cancel--> discarded
//! ```
//!
//! Only committed decisions reach the store; a flagged draft lives in the
//! in-process [`DraftRegistry`] until the author resolves it.

pub mod drafts;
pub mod profile;
pub mod workflow;

pub use drafts::{DraftId, DraftRegistry, PendingDraft};
pub use profile::{random_author, random_author_with};
pub use workflow::{SubmissionWorkflow, SubmitOutcome, WorkflowConfig};
