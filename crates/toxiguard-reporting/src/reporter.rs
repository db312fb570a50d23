//! Store-backed reporting facade

use crate::export::{export_records, ExportFormat};
use crate::stats::{author_activity, distribution, AuthorActivity, DistributionSlice, Overview};
use crate::terms::{term_frequencies, TermFrequency};
use crate::timefmt::relative_time;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::sync::Arc;
use toxiguard_core::{CommentRecord, Result};
use toxiguard_store::{CommentQuery, CommentStore};
use tracing::debug;

/// Default size of the recent-comments view
pub const DEFAULT_RECENT_LIMIT: usize = 100;

/// A comment as shown in the public feed
#[derive(Debug, Clone, Serialize)]
pub struct FeedEntry {
    #[serde(flatten)]
    pub comment: CommentRecord,
    pub relative_time: String,
}

/// Read-only reports over a shared comment store
#[derive(Clone)]
pub struct Reporter {
    store: Arc<dyn CommentStore>,
}

impl Reporter {
    pub fn new(store: Arc<dyn CommentStore>) -> Self {
        Self { store }
    }

    pub fn overview(&self) -> Result<Overview> {
        Ok(Overview::from_records(&self.store.list_all()?))
    }

    pub fn distribution(&self) -> Result<Vec<DistributionSlice>> {
        Ok(distribution(&self.overview()?))
    }

    /// Toxic records in insertion order
    pub fn toxic_comments(&self) -> Result<Vec<CommentRecord>> {
        self.store.filter_by(&|record| record.is_toxic())
    }

    pub fn author_activity(&self) -> Result<Vec<AuthorActivity>> {
        Ok(author_activity(&self.store.list_all()?))
    }

    pub fn top_terms(&self, top: usize) -> Result<Vec<TermFrequency>> {
        let toxic = self.toxic_comments()?;
        Ok(term_frequencies(&toxic, top))
    }

    /// Newest `limit` records, newest first
    pub fn recent(&self, limit: usize) -> Result<Vec<CommentRecord>> {
        let mut records = self.store.list_all()?;
        // Equal timestamps keep the later insertion first
        records.reverse();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit);
        Ok(records)
    }

    /// Newest-first feed with relative timestamps measured from `now`
    pub fn feed(&self, limit: usize, now: DateTime<Utc>) -> Result<Vec<FeedEntry>> {
        Ok(self
            .recent(limit)?
            .into_iter()
            .map(|comment| FeedEntry {
                relative_time: relative_time(comment.created_at, now),
                comment,
            })
            .collect())
    }

    pub fn query(&self, query: &CommentQuery) -> Result<Vec<CommentRecord>> {
        self.store.query(query)
    }

    /// Export records matching `query` in the given format
    pub fn export<W: Write>(&self, query: &CommentQuery, format: ExportFormat, out: W) -> Result<usize> {
        let records = self.store.query(query)?;
        let rows = export_records(&records, format, out)?;
        debug!(rows, format = %format, "Exported comments");
        Ok(rows)
    }

    /// Plain-text summary for terminals
    pub fn render_text(&self, top_terms: usize) -> Result<String> {
        let overview = self.overview()?;
        let report = TextReport {
            slices: distribution(&overview),
            overview,
            activity: self.author_activity()?,
            terms: self.top_terms(top_terms)?,
        };
        Ok(report.to_string())
    }
}

struct TextReport {
    overview: Overview,
    slices: Vec<DistributionSlice>,
    activity: Vec<AuthorActivity>,
    terms: Vec<TermFrequency>,
}

impl fmt::Display for TextReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Comments Overview")?;
        writeln!(f, "  Total Comments:     {}", self.overview.total)?;
        writeln!(f, "  Toxic Comments:     {}", self.overview.toxic)?;
        writeln!(f, "  Non-Toxic Comments: {}", self.overview.non_toxic)?;

        if !self.slices.is_empty() {
            writeln!(f, "\nToxicity Distribution")?;
            for slice in &self.slices {
                writeln!(f, "  {:<20} {:>5.1}%", slice.title, slice.percent)?;
            }
        }

        if !self.activity.is_empty() {
            writeln!(f, "\nUser Activity")?;
            writeln!(f, "  {:<24} {:>6} {:>6}", "Author", "Total", "Toxic")?;
            for row in &self.activity {
                writeln!(
                    f,
                    "  {:<24} {:>6} {:>6}",
                    row.author, row.total_comments, row.toxic_comments
                )?;
            }
        }

        if !self.terms.is_empty() {
            writeln!(f, "\nTop Toxic Terms")?;
            for term in &self.terms {
                writeln!(f, "  {:<24} {:>6}", term.term, term.count)?;
            }
        }

        Ok(())
    }
}
