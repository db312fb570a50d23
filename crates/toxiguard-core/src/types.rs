//! Core types for Toxiguard

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier of a persisted comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(Uuid);

impl CommentId {
    /// Generate a fresh random id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CommentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for CommentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Binary toxicity label produced by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Toxic,
    NonToxic,
}

impl Label {
    pub fn is_toxic(&self) -> bool {
        matches!(self, Self::Toxic)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Toxic => "toxic",
            Self::NonToxic => "non_toxic",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "toxic" => Ok(Self::Toxic),
            "non_toxic" | "non-toxic" | "nontoxic" => Ok(Self::NonToxic),
            other => Err(format!("unknown label '{}'", other)),
        }
    }
}

/// Lifecycle status of a comment.
///
/// Pending drafts are `Submitted` after their first toxic classification and
/// `Edited` after a revised text is classified toxic again. Every persisted
/// record is `Accepted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentStatus {
    Submitted,
    Edited,
    Accepted,
}

impl CommentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Edited => "edited",
            Self::Accepted => "accepted",
        }
    }
}

impl fmt::Display for CommentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "submitted" => Ok(Self::Submitted),
            "edited" => Ok(Self::Edited),
            "accepted" => Ok(Self::Accepted),
            other => Err(format!("unknown status '{}'", other)),
        }
    }
}

/// Who submitted a comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Display name
    pub name: String,

    /// Avatar colour, e.g. `rgb(120,180,150)`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_color: Option<String>,
}

impl Author {
    /// Create an author with just a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            profile_color: None,
        }
    }

    /// Set the avatar colour
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.profile_color = Some(color.into());
        self
    }
}

/// A persisted comment.
///
/// Records are only ever created by the submission workflow and are never
/// mutated once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRecord {
    /// Unique identifier
    pub id: CommentId,

    /// Submitter name
    pub author: String,

    /// Comment text, byte-identical to what was classified
    pub text: String,

    /// Classifier verdict at creation time
    pub label: Label,

    /// Lifecycle status
    pub status: CommentStatus,

    /// Creation time (UTC)
    pub created_at: DateTime<Utc>,

    /// Classifier confidence in [0, 1], when the classifier reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,

    /// Avatar colour of the author
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_color: Option<String>,
}

impl CommentRecord {
    /// Build an accepted record for the given author, text and verdict
    pub fn accepted(author: &Author, text: impl Into<String>, label: Label, score: Option<f32>) -> Self {
        Self {
            id: CommentId::new(),
            author: author.name.clone(),
            text: text.into(),
            label,
            status: CommentStatus::Accepted,
            created_at: Utc::now(),
            score,
            profile_color: author.profile_color.clone(),
        }
    }

    pub fn is_toxic(&self) -> bool {
        self.label.is_toxic()
    }
}
