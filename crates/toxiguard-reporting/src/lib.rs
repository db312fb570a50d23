//! Toxiguard Reporting
//!
//! Read-only views over the comment store for moderators:
//!
//! - **Overview**: total, toxic and non-toxic counts plus pie-chart slices
//! - **Terms**: word frequencies over toxic comments
//! - **Activity**: per-author comment counts
//! - **Feed**: newest-first comments with relative timestamps
//! - **Export**: CSV, JSON and JSON-lines dumps with every record field

pub mod export;
pub mod reporter;
pub mod stats;
pub mod terms;
pub mod timefmt;

pub use export::{export_records, ExportFormat};
pub use reporter::{FeedEntry, Reporter, DEFAULT_RECENT_LIMIT};
pub use stats::{author_activity, distribution, AuthorActivity, DistributionSlice, Overview};
pub use terms::{term_frequencies, TermFrequency};
pub use timefmt::relative_time;
