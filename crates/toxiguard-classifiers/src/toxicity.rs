//! Lexicon-based toxicity classifier

use crate::classifier::{ClassificationMetadata, ClassificationResult, Classifier};
use crate::config::LexiconConfig;
use aho_corasick::{AhoCorasick, MatchKind};
use std::collections::HashSet;
use std::time::Instant;
use toxiguard_core::{Label, Result};

/// Score ceiling for a lexicon-only verdict.
const MAX_LEXICON_SCORE: f32 = 0.99;

/// Toxicity classifier matching a term list on word boundaries.
///
/// Used when no trained artifact is configured. Matching is ASCII
/// case-insensitive and a hit only counts when it is not embedded in a
/// longer word, so "hell" does not fire on "hello".
pub struct ToxicityClassifier {
    name: String,
    matcher: AhoCorasick,
    terms: Vec<String>,
    hit_weight: f32,
    threshold: f32,
}

impl ToxicityClassifier {
    /// Create a toxicity classifier with the built-in term list.
    pub fn new() -> Result<Self> {
        Self::from_config(&LexiconConfig::default())
    }

    /// Create a toxicity classifier from lexicon settings.
    pub fn from_config(config: &LexiconConfig) -> Result<Self> {
        let terms = config.all_terms();
        if terms.is_empty() {
            return Err(toxiguard_core::Error::config("lexicon has no terms"));
        }

        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(&terms)
            .map_err(|e| {
                toxiguard_core::Error::classifier(format!("Failed to build lexicon matcher: {e}"))
            })?;

        Ok(Self {
            name: "toxicity-lexicon".to_string(),
            matcher,
            terms,
            hit_weight: config.hit_weight,
            threshold: config.threshold,
        })
    }

    /// Override the decision threshold
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Word-bounded hits as byte spans
    fn find_hits(&self, text: &str) -> Vec<(usize, usize)> {
        self.matcher
            .find_iter(text)
            .filter(|m| is_word_bounded(text, m.start(), m.end()))
            .map(|m| (m.start(), m.end()))
            .collect()
    }

    fn score(&self, text: &str, spans: &[(usize, usize)]) -> f32 {
        let distinct: HashSet<String> = spans
            .iter()
            .map(|(start, end)| text[*start..*end].to_ascii_lowercase())
            .collect();

        (distinct.len() as f32 * self.hit_weight).clamp(0.0, MAX_LEXICON_SCORE)
    }

    /// Number of terms in the lexicon
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }
}

fn is_word_bounded(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

#[async_trait::async_trait]
impl Classifier for ToxicityClassifier {
    async fn classify(&self, text: &str) -> Result<ClassificationResult> {
        let start = Instant::now();

        let spans = self.find_hits(text);
        let score = self.score(text, &spans);
        let label = if score >= self.threshold {
            Label::Toxic
        } else {
            Label::NonToxic
        };

        Ok(ClassificationResult {
            label,
            score: Some(score),
            metadata: ClassificationMetadata {
                spans,
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
