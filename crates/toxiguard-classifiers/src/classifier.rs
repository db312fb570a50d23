//! Classifier trait and common types

use async_trait::async_trait;
use toxiguard_core::{Label, Result};

/// Trait for all classifiers
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify the given text
    async fn classify(&self, text: &str) -> Result<ClassificationResult>;

    /// Get the classifier name
    fn name(&self) -> &str;
}

/// Result of classification
#[derive(Debug, Clone)]
pub struct ClassificationResult {
    /// Binary verdict
    pub label: Label,

    /// Confidence that the text is toxic (0.0-1.0), if the classifier has one
    pub score: Option<f32>,

    /// Additional metadata
    pub metadata: ClassificationMetadata,

    /// Latency in microseconds
    pub latency_us: u64,
}

impl ClassificationResult {
    /// Create a new classification result without a score
    pub fn new(label: Label) -> Self {
        Self {
            label,
            score: None,
            metadata: ClassificationMetadata::default(),
            latency_us: 0,
        }
    }

    /// Attach a confidence score, clamped to [0, 1]
    pub fn with_score(mut self, score: f32) -> Self {
        self.score = Some(score.clamp(0.0, 1.0));
        self
    }

    pub fn is_toxic(&self) -> bool {
        self.label.is_toxic()
    }
}

/// Metadata about classification
#[derive(Debug, Clone, Default)]
pub struct ClassificationMetadata {
    /// Matched byte spans (for lexicon classifiers)
    pub spans: Vec<(usize, usize)>,

    /// Model name or version
    pub model: Option<String>,
}
