//! Structured query over stored comments

use chrono::{DateTime, Utc};
use serde::Deserialize;
use toxiguard_core::{CommentRecord, CommentStatus, Label};

/// Query filter for stored comments.
///
/// All set filters must match. Text matching is a case-insensitive
/// substring test.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentQuery {
    /// Filter by exact author name
    pub author: Option<String>,

    /// Filter by label
    pub label: Option<Label>,

    /// Filter by status
    pub status: Option<CommentStatus>,

    /// Filter by text substring
    pub text_contains: Option<String>,

    /// Start time filter (inclusive)
    pub since: Option<DateTime<Utc>>,

    /// End time filter (inclusive)
    pub until: Option<DateTime<Utc>>,

    /// Maximum results to return
    pub limit: Option<usize>,

    /// Offset for pagination
    pub offset: Option<usize>,
}

impl CommentQuery {
    /// Create a new empty query
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by author
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Filter by label
    pub fn label(mut self, label: Label) -> Self {
        self.label = Some(label);
        self
    }

    /// Filter by status
    pub fn status(mut self, status: CommentStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filter by text substring
    pub fn text_contains(mut self, needle: impl Into<String>) -> Self {
        self.text_contains = Some(needle.into());
        self
    }

    /// Set time range
    pub fn time_range(mut self, since: DateTime<Utc>, until: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self.until = Some(until);
        self
    }

    /// Set limit and offset
    pub fn paginate_with(mut self, limit: usize, offset: usize) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }

    /// Set just limit
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Check if a record matches every filter
    pub fn matches(&self, record: &CommentRecord) -> bool {
        if let Some(ref author) = self.author {
            if &record.author != author {
                return false;
            }
        }

        if let Some(label) = self.label {
            if record.label != label {
                return false;
            }
        }

        if let Some(status) = self.status {
            if record.status != status {
                return false;
            }
        }

        if let Some(ref needle) = self.text_contains {
            if !record.text.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }

        if let Some(since) = self.since {
            if record.created_at < since {
                return false;
            }
        }

        if let Some(until) = self.until {
            if record.created_at > until {
                return false;
            }
        }

        true
    }

    /// Apply offset and limit to an already-filtered sequence
    pub fn paginate(&self, records: Vec<CommentRecord>) -> Vec<CommentRecord> {
        let offset = self.offset.unwrap_or(0);
        let limit = self.limit.unwrap_or(usize::MAX);
        records.into_iter().skip(offset).take(limit).collect()
    }
}
