//! Submission workflow
//!
//! Classifies every submission before anything is persisted. Clean text is
//! stored immediately; toxic text becomes a pending draft the author must
//! edit, accept anyway, or cancel.

use crate::drafts::{DraftId, DraftRegistry, PendingDraft};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use toxiguard_classifiers::{ClassificationResult, Classifier};
use toxiguard_core::{Author, CommentRecord, Error, Label, Result};
use toxiguard_store::CommentStore;
use tracing::{debug, info, warn};

/// Workflow tuning
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Upper bound on a single classifier call
    pub classify_timeout: Duration,
    /// Pending drafts kept before the oldest is evicted
    pub max_pending_drafts: usize,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            classify_timeout: Duration::from_millis(2000),
            max_pending_drafts: 10_000,
        }
    }
}

/// Result of a submission or an edit
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// Classified clean and persisted
    Accepted { comment: CommentRecord },
    /// Classified toxic; nothing persisted until the author decides
    Flagged { draft: PendingDraft },
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted { .. })
    }

    pub fn is_flagged(&self) -> bool {
        matches!(self, SubmitOutcome::Flagged { .. })
    }

    pub fn into_comment(self) -> Option<CommentRecord> {
        match self {
            SubmitOutcome::Accepted { comment } => Some(comment),
            SubmitOutcome::Flagged { .. } => None,
        }
    }

    pub fn into_draft(self) -> Option<PendingDraft> {
        match self {
            SubmitOutcome::Flagged { draft } => Some(draft),
            SubmitOutcome::Accepted { .. } => None,
        }
    }
}

/// Drives a comment from submission to a committed decision
pub struct SubmissionWorkflow {
    classifier: Arc<dyn Classifier>,
    store: Arc<dyn CommentStore>,
    drafts: DraftRegistry,
    config: WorkflowConfig,
}

impl SubmissionWorkflow {
    pub fn new(classifier: Arc<dyn Classifier>, store: Arc<dyn CommentStore>) -> Self {
        Self::with_config(classifier, store, WorkflowConfig::default())
    }

    pub fn with_config(
        classifier: Arc<dyn Classifier>,
        store: Arc<dyn CommentStore>,
        config: WorkflowConfig,
    ) -> Self {
        Self {
            classifier,
            store,
            drafts: DraftRegistry::new(config.max_pending_drafts),
            config,
        }
    }

    /// Validate, classify and either persist or hold `text`
    pub async fn submit(&self, author: Author, text: &str) -> Result<SubmitOutcome> {
        validate(text)?;
        let result = self.classify(text).await?;

        if !result.is_toxic() {
            let record = CommentRecord::accepted(&author, text, Label::NonToxic, result.score);
            let record = self.persist(record)?;
            record_outcome("accepted");
            info!(id = %record.id, author = %record.author, "Comment accepted");
            return Ok(SubmitOutcome::Accepted { comment: record });
        }

        let draft = PendingDraft::new(author, text, result.score);
        self.drafts.insert(draft.clone());
        record_outcome("flagged");
        info!(
            draft = %draft.id,
            author = %draft.author.name,
            score = ?draft.score,
            "Comment flagged as toxic"
        );

        Ok(SubmitOutcome::Flagged { draft })
    }

    /// Re-classify a flagged draft with revised text.
    ///
    /// On a validation or classifier error the draft is left unchanged.
    pub async fn edit(&self, id: &DraftId, text: &str) -> Result<SubmitOutcome> {
        self.drafts.get(id)?;
        validate(text)?;
        let result = self.classify(text).await?;

        if result.is_toxic() {
            let draft = self.drafts.revise(id, text, result.score)?;
            record_outcome("still_flagged");
            info!(draft = %draft.id, revisions = draft.revisions, "Edited comment still flagged");
            return Ok(SubmitOutcome::Flagged { draft });
        }

        let draft = self.drafts.take(id)?;
        let record = CommentRecord::accepted(&draft.author, text, Label::NonToxic, result.score);
        let record = self.persist(record).map_err(|e| {
            self.drafts.insert(draft.clone());
            e
        })?;
        record_outcome("accepted");
        info!(id = %record.id, draft = %draft.id, "Edited comment accepted");

        Ok(SubmitOutcome::Accepted { comment: record })
    }

    /// Persist a flagged draft as-is, labelled toxic
    pub async fn accept_anyway(&self, id: &DraftId) -> Result<CommentRecord> {
        let draft = self.drafts.take(id)?;
        let record = CommentRecord::accepted(&draft.author, draft.text.as_str(), Label::Toxic, draft.score);
        let record = self.persist(record).map_err(|e| {
            self.drafts.insert(draft.clone());
            e
        })?;
        record_outcome("accepted_anyway");
        info!(id = %record.id, draft = %draft.id, "Toxic comment accepted by author");

        Ok(record)
    }

    /// Discard a flagged draft without persisting anything
    pub fn cancel(&self, id: &DraftId) -> Result<PendingDraft> {
        let draft = self.drafts.take(id)?;
        record_outcome("cancelled");
        debug!(draft = %draft.id, "Draft cancelled");
        Ok(draft)
    }

    /// Current state of a pending draft
    pub fn draft(&self, id: &DraftId) -> Result<PendingDraft> {
        self.drafts.get(id)
    }

    pub fn pending_count(&self) -> usize {
        self.drafts.len()
    }

    pub fn store(&self) -> &Arc<dyn CommentStore> {
        &self.store
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    async fn classify(&self, text: &str) -> Result<ClassificationResult> {
        let start = Instant::now();
        let outcome =
            tokio::time::timeout(self.config.classify_timeout, self.classifier.classify(text)).await;
        let elapsed = start.elapsed();

        metrics::histogram!(
            "toxiguard_classifier_latency_us",
            "classifier" => self.classifier.name().to_string()
        )
        .record(elapsed.as_micros() as f64);

        match outcome {
            Ok(Ok(result)) => {
                debug!(
                    classifier = self.classifier.name(),
                    label = %result.label,
                    latency_us = elapsed.as_micros() as u64,
                    "Classified comment"
                );
                Ok(result)
            }
            Ok(Err(e)) => {
                warn!(classifier = self.classifier.name(), error = %e, "Classifier failed");
                record_outcome("unavailable");
                Err(Error::classification_unavailable(e.to_string()))
            }
            Err(_) => {
                warn!(
                    classifier = self.classifier.name(),
                    timeout_ms = self.config.classify_timeout.as_millis() as u64,
                    "Classifier timed out"
                );
                record_outcome("unavailable");
                Err(Error::classification_unavailable(format!(
                    "classifier did not answer within {}ms",
                    self.config.classify_timeout.as_millis()
                )))
            }
        }
    }

    fn persist(&self, record: CommentRecord) -> Result<CommentRecord> {
        match self.store.append(record.clone()) {
            Ok(_) => Ok(record),
            Err(e) => {
                warn!(error = %e, "Failed to persist comment");
                record_outcome("store_error");
                Err(match e {
                    Error::StoreWrite(_) => e,
                    other => Error::store_write(other.to_string()),
                })
            }
        }
    }
}

fn validate(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        record_outcome("invalid");
        return Err(Error::validation("comment text must not be empty"));
    }
    Ok(())
}

fn record_outcome(outcome: &'static str) {
    metrics::counter!("toxiguard_submissions_total", "outcome" => outcome).increment(1);
}
