//! Pending drafts awaiting an author decision

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::str::FromStr;
use toxiguard_core::{Author, CommentStatus, Error, Label, Result};
use tracing::debug;
use uuid::Uuid;

const DEFAULT_CAPACITY: usize = 10_000;

/// Identifier handed to the author for a flagged draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DraftId(Uuid);

impl DraftId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DraftId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DraftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for DraftId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| Error::draft_not_found(s))
    }
}

/// A comment classified toxic and not yet persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingDraft {
    pub id: DraftId,
    pub author: Author,
    /// The text that was last classified
    pub text: String,
    pub label: Label,
    pub score: Option<f32>,
    /// `Submitted` until the first toxic re-classification, then `Edited`
    pub status: CommentStatus,
    /// Number of edits classified toxic so far
    pub revisions: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PendingDraft {
    pub fn new(author: Author, text: impl Into<String>, score: Option<f32>) -> Self {
        let now = Utc::now();
        Self {
            id: DraftId::new(),
            author,
            text: text.into(),
            label: Label::Toxic,
            score,
            status: CommentStatus::Submitted,
            revisions: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

struct DraftsInner {
    drafts: HashMap<DraftId, PendingDraft>,
    /// Insertion order for eviction; may hold ids already resolved
    order: VecDeque<DraftId>,
}

/// Bounded in-process registry of pending drafts.
///
/// When full, the oldest pending draft is evicted. Nothing here is
/// persisted: a restart forgets every pending draft.
pub struct DraftRegistry {
    inner: Mutex<DraftsInner>,
    capacity: usize,
}

impl DraftRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(DraftsInner {
                drafts: HashMap::new(),
                order: VecDeque::new(),
            }),
            capacity: capacity.max(1),
        }
    }

    /// Register a draft, evicting the oldest one if the registry is full
    pub fn insert(&self, draft: PendingDraft) {
        let mut inner = self.inner.lock();

        while inner.drafts.len() >= self.capacity {
            match inner.order.pop_front() {
                Some(oldest) => {
                    if inner.drafts.remove(&oldest).is_some() {
                        debug!(draft = %oldest, "Evicted oldest pending draft");
                    }
                }
                None => break,
            }
        }

        if inner.order.len() > self.capacity * 2 {
            let DraftsInner { drafts, order } = &mut *inner;
            order.retain(|id| drafts.contains_key(id));
        }

        inner.order.push_back(draft.id);
        inner.drafts.insert(draft.id, draft);
    }

    /// Snapshot of a pending draft
    pub fn get(&self, id: &DraftId) -> Result<PendingDraft> {
        self.inner
            .lock()
            .drafts
            .get(id)
            .cloned()
            .ok_or_else(|| Error::draft_not_found(id.to_string()))
    }

    /// Remove a draft so exactly one caller can resolve it
    pub fn take(&self, id: &DraftId) -> Result<PendingDraft> {
        self.inner
            .lock()
            .drafts
            .remove(id)
            .ok_or_else(|| Error::draft_not_found(id.to_string()))
    }

    /// Replace the text of a draft whose revision was classified toxic again
    pub fn revise(&self, id: &DraftId, text: &str, score: Option<f32>) -> Result<PendingDraft> {
        let mut inner = self.inner.lock();
        let draft = inner
            .drafts
            .get_mut(id)
            .ok_or_else(|| Error::draft_not_found(id.to_string()))?;

        draft.text = text.to_string();
        draft.score = score;
        draft.status = CommentStatus::Edited;
        draft.revisions += 1;
        draft.updated_at = Utc::now();
        Ok(draft.clone())
    }

    pub fn len(&self) -> usize {
        self.inner.lock().drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DraftRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
