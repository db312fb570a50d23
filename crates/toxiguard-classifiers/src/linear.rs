//! Frozen TF-IDF + logistic regression classifier
//!
//! Evaluates a model trained elsewhere and exported as JSON. The artifact
//! carries the fitted vocabulary, the per-column IDF weights, the logistic
//! regression coefficients and intercept, plus the vectoriser settings
//! needed to reproduce feature extraction:
//!
//! ```json
//! {
//!   "name": "toxic-comments-v3",
//!   "vocabulary": { "stupid": 0, "you": 1, "you stupid": 2 },
//!   "idf": [2.1, 1.0, 2.9],
//!   "coefficients": [3.2, 0.1, 1.7],
//!   "intercept": -1.4,
//!   "ngram_range": [1, 2],
//!   "stop_words": ["the", "a"]
//! }
//! ```

use crate::classifier::{ClassificationMetadata, ClassificationResult, Classifier};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::time::Instant;
use toxiguard_core::{Error, Label, Result};
use tracing::info;

/// Default vectoriser token pattern: runs of two or more word characters
const TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// Exported model weights and vectoriser settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModelArtifact {
    /// Human-readable model name or version
    #[serde(default)]
    pub name: Option<String>,

    /// Term to feature column
    pub vocabulary: HashMap<String, usize>,

    /// Inverse document frequency per column
    pub idf: Vec<f32>,

    /// Logistic regression weight per column
    pub coefficients: Vec<f32>,

    /// Logistic regression bias
    pub intercept: f32,

    /// Inclusive n-gram range used at fit time
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),

    /// Lowercase text before tokenising
    #[serde(default = "default_true")]
    pub lowercase: bool,

    /// Tokens dropped before n-grams are formed
    #[serde(default)]
    pub stop_words: Vec<String>,

    /// Use `1 + ln(tf)` instead of raw term counts
    #[serde(default)]
    pub sublinear_tf: bool,

    /// Probability at or above which text is labelled toxic
    #[serde(default = "default_threshold")]
    pub threshold: f32,
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_true() -> bool {
    true
}

fn default_threshold() -> f32 {
    0.5
}

impl LinearModelArtifact {
    /// Load and validate an artifact from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read model artifact {}: {}", path.display(), e))
        })?;
        let artifact: Self = serde_json::from_str(&content).map_err(|e| {
            Error::config(format!("Invalid model artifact {}: {}", path.display(), e))
        })?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Check that weights and vocabulary line up
    pub fn validate(&self) -> Result<()> {
        let columns = self.idf.len();
        if columns == 0 {
            return Err(Error::config("model artifact has no features"));
        }
        if self.coefficients.len() != columns {
            return Err(Error::config(format!(
                "model artifact has {} idf weights but {} coefficients",
                columns,
                self.coefficients.len()
            )));
        }
        if let Some((term, col)) = self.vocabulary.iter().find(|(_, col)| **col >= columns) {
            return Err(Error::config(format!(
                "vocabulary term '{}' maps to column {} of {}",
                term, col, columns
            )));
        }
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(Error::config(format!(
                "invalid ngram_range ({}, {})",
                min_n, max_n
            )));
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(Error::config(format!(
                "threshold {} is outside [0, 1]",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// Classifier evaluating a [`LinearModelArtifact`]
pub struct LinearModelClassifier {
    name: String,
    artifact: LinearModelArtifact,
    stop_words: HashSet<String>,
    token_pattern: Regex,
    threshold: f32,
}

impl LinearModelClassifier {
    /// Build a classifier from an in-memory artifact
    pub fn new(artifact: LinearModelArtifact) -> Result<Self> {
        artifact.validate()?;

        let token_pattern = Regex::new(TOKEN_PATTERN)
            .map_err(|e| Error::classifier(format!("Failed to compile token pattern: {e}")))?;
        let stop_words = artifact
            .stop_words
            .iter()
            .map(|w| w.to_lowercase())
            .collect();

        Ok(Self {
            name: artifact
                .name
                .clone()
                .unwrap_or_else(|| "toxicity-linear".to_string()),
            threshold: artifact.threshold,
            artifact,
            stop_words,
            token_pattern,
        })
    }

    /// Load the artifact from disk and build a classifier
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let artifact = LinearModelArtifact::from_file(path)?;
        info!(
            path = %path.display(),
            features = artifact.idf.len(),
            "Loaded linear model artifact"
        );
        Self::new(artifact)
    }

    /// Override the artifact's decision threshold
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    fn tokens(&self, text: &str) -> Vec<String> {
        let text = if self.artifact.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        self.token_pattern
            .find_iter(&text)
            .map(|m| m.as_str().to_string())
            .filter(|t| !self.stop_words.contains(t))
            .collect()
    }

    /// Sparse, L2-normalised TF-IDF vector as (column, weight) pairs
    pub fn features(&self, text: &str) -> Vec<(usize, f32)> {
        let tokens = self.tokens(text);
        let (min_n, max_n) = self.artifact.ngram_range;

        let mut counts: HashMap<usize, f32> = HashMap::new();
        for n in min_n..=max_n {
            for gram in tokens.windows(n) {
                if let Some(col) = self.artifact.vocabulary.get(&gram.join(" ")) {
                    *counts.entry(*col).or_insert(0.0) += 1.0;
                }
            }
        }

        let mut features: Vec<(usize, f32)> = counts
            .into_iter()
            .map(|(col, tf)| {
                let tf = if self.artifact.sublinear_tf {
                    1.0 + tf.ln()
                } else {
                    tf
                };
                (col, tf * self.artifact.idf[col])
            })
            .collect();

        let norm = features.iter().map(|(_, v)| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for (_, v) in features.iter_mut() {
                *v /= norm;
            }
        }
        features.sort_by_key(|(col, _)| *col);
        features
    }

    /// Probability that the text is toxic
    pub fn probability(&self, text: &str) -> f32 {
        let z = self
            .features(text)
            .iter()
            .map(|(col, v)| v * self.artifact.coefficients[*col])
            .sum::<f32>()
            + self.artifact.intercept;
        sigmoid(z)
    }
}

fn sigmoid(z: f32) -> f32 {
    1.0 / (1.0 + (-z).exp())
}

#[async_trait::async_trait]
impl Classifier for LinearModelClassifier {
    async fn classify(&self, text: &str) -> Result<ClassificationResult> {
        let start = Instant::now();

        let probability = self.probability(text);
        let label = if probability >= self.threshold {
            Label::Toxic
        } else {
            Label::NonToxic
        };

        Ok(ClassificationResult {
            label,
            score: Some(probability),
            metadata: ClassificationMetadata {
                model: Some(self.name.clone()),
                ..Default::default()
            },
            latency_us: start.elapsed().as_micros() as u64,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
