//! Configuration for the toxicity classifier

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which classifier implementation to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierKind {
    /// Word-bounded lexicon matching
    #[default]
    Lexicon,
    /// Frozen TF-IDF + logistic regression artifact
    Linear,
}

/// Classifier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Implementation to use
    #[serde(default)]
    pub kind: ClassifierKind,

    /// Path to the JSON model artifact (required for `linear`)
    #[serde(default)]
    pub model_path: Option<PathBuf>,

    /// Decision threshold override; falls back to the artifact or lexicon value
    #[serde(default)]
    pub threshold: Option<f32>,

    /// Lexicon settings
    #[serde(default)]
    pub lexicon: LexiconConfig,

    /// Upper bound on a single classification call (milliseconds)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            kind: ClassifierKind::default(),
            model_path: None,
            threshold: None,
            lexicon: LexiconConfig::default(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Lexicon classifier settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconConfig {
    /// Base term list; replaces the built-in list when set
    #[serde(default = "default_terms")]
    pub terms: Vec<String>,

    /// Terms added on top of `terms`
    #[serde(default)]
    pub extra_terms: Vec<String>,

    /// Score contributed by each distinct hit
    #[serde(default = "default_hit_weight")]
    pub hit_weight: f32,

    /// Score at or above which text is labelled toxic
    #[serde(default = "default_threshold")]
    pub threshold: f32,
}

impl Default for LexiconConfig {
    fn default() -> Self {
        Self {
            terms: default_terms(),
            extra_terms: Vec::new(),
            hit_weight: default_hit_weight(),
            threshold: default_threshold(),
        }
    }
}

impl LexiconConfig {
    /// All configured terms, lowercased, empty entries dropped
    pub fn all_terms(&self) -> Vec<String> {
        self.terms
            .iter()
            .chain(self.extra_terms.iter())
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

fn default_terms() -> Vec<String> {
    [
        "hate", "stupid", "idiot", "dumb", "kill", "die", "moron", "loser", "sucks", "garbage",
        "trash", "shit", "fuck", "damn", "hell", "asshole", "bastard", "bitch", "pathetic",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_hit_weight() -> f32 {
    0.6
}

fn default_threshold() -> f32 {
    0.5
}

fn default_timeout_ms() -> u64 {
    2_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config: ClassifierConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.kind, ClassifierKind::Lexicon);
        assert_eq!(config.timeout_ms, 2_000);
        assert!(config.lexicon.terms.contains(&"stupid".to_string()));
    }

    #[test]
    fn test_linear_config() {
        let yaml = r#"
kind: linear
model_path: ./models/toxic.json
threshold: 0.7
"#;
        let config: ClassifierConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.kind, ClassifierKind::Linear);
        assert_eq!(config.model_path, Some(PathBuf::from("./models/toxic.json")));
        assert_eq!(config.threshold, Some(0.7));
    }

    #[test]
    fn test_all_terms_merges_and_normalizes() {
        let lexicon = LexiconConfig {
            terms: vec!["Jerk".to_string(), "  ".to_string()],
            extra_terms: vec!["CLOWN ".to_string()],
            ..Default::default()
        };
        assert_eq!(lexicon.all_terms(), vec!["jerk".to_string(), "clown".to_string()]);
    }
}
