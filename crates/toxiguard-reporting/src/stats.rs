//! Counts, distribution and per-author activity

use serde::Serialize;
use std::collections::BTreeMap;
use toxiguard_core::{CommentRecord, Label};

const TOXIC_COLOR: &str = "#ff6347";
const NON_TOXIC_COLOR: &str = "#90ee90";

/// Headline counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Overview {
    pub total: usize,
    pub toxic: usize,
    pub non_toxic: usize,
}

impl Overview {
    pub fn from_records(records: &[CommentRecord]) -> Self {
        let toxic = records.iter().filter(|r| r.is_toxic()).count();
        Self {
            total: records.len(),
            toxic,
            non_toxic: records.len() - toxic,
        }
    }

    /// Fraction of comments labelled toxic, `0.0` for an empty store
    pub fn toxic_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.toxic as f64 / self.total as f64
        }
    }
}

/// One slice of the toxicity pie chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionSlice {
    pub label: Label,
    pub title: &'static str,
    pub count: usize,
    /// Share of the total in percent, one decimal place
    pub percent: f64,
    pub color: &'static str,
    /// Radial offset of the slice; the toxic slice is pulled out
    pub explode: f64,
}

/// Pie-chart data set; empty when there is nothing to chart
pub fn distribution(overview: &Overview) -> Vec<DistributionSlice> {
    if overview.total == 0 {
        return Vec::new();
    }

    let percent = |count: usize| (count as f64 * 1000.0 / overview.total as f64).round() / 10.0;

    vec![
        DistributionSlice {
            label: Label::Toxic,
            title: "Toxic Comments",
            count: overview.toxic,
            percent: percent(overview.toxic),
            color: TOXIC_COLOR,
            explode: 0.1,
        },
        DistributionSlice {
            label: Label::NonToxic,
            title: "Non-Toxic Comments",
            count: overview.non_toxic,
            percent: percent(overview.non_toxic),
            color: NON_TOXIC_COLOR,
            explode: 0.0,
        },
    ]
}

/// Per-author activity row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorActivity {
    pub author: String,
    pub total_comments: usize,
    pub toxic_comments: usize,
}

/// Group records by author, sorted by author name
pub fn author_activity(records: &[CommentRecord]) -> Vec<AuthorActivity> {
    let mut grouped: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for record in records {
        let entry = grouped.entry(record.author.as_str()).or_default();
        entry.0 += 1;
        if record.is_toxic() {
            entry.1 += 1;
        }
    }

    grouped
        .into_iter()
        .map(|(author, (total, toxic))| AuthorActivity {
            author: author.to_string(),
            total_comments: total,
            toxic_comments: toxic,
        })
        .collect()
}
