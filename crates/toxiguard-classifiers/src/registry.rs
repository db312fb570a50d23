//! Classifier construction from configuration

use crate::{
    linear::LinearModelClassifier, toxicity::ToxicityClassifier, Classifier, ClassifierConfig,
    ClassifierKind,
};
use std::path::Path;
use std::sync::Arc;
use toxiguard_core::{Error, Result};
use tracing::info;

/// Build the configured classifier.
///
/// A `linear` classifier without a loadable artifact is an error: the
/// workflow must not start with a model that cannot classify.
pub fn build_classifier(config: &ClassifierConfig) -> Result<Arc<dyn Classifier>> {
    let classifier: Arc<dyn Classifier> = match config.kind {
        ClassifierKind::Lexicon => {
            let mut classifier = ToxicityClassifier::from_config(&config.lexicon)?;
            if let Some(threshold) = config.threshold {
                classifier = classifier.with_threshold(threshold);
            }
            info!(terms = classifier.term_count(), "Initialized lexicon classifier");
            Arc::new(classifier)
        }
        ClassifierKind::Linear => {
            let path = config
                .model_path
                .as_ref()
                .ok_or_else(|| Error::config("linear classifier requires model_path"))?;
            let mut classifier = LinearModelClassifier::from_file(path)?;
            if let Some(threshold) = config.threshold {
                classifier = classifier.with_threshold(threshold);
            }
            info!(model = classifier.name(), "Initialized linear classifier");
            Arc::new(classifier)
        }
    };

    Ok(classifier)
}

/// Load classifier configuration from a YAML file
pub fn load_config(path: impl AsRef<Path>) -> Result<ClassifierConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&content)
        .map_err(|e| Error::config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Load configuration from a YAML file and build the classifier it describes
pub fn init_classifier_from_file(path: impl AsRef<Path>) -> Result<Arc<dyn Classifier>> {
    let config = load_config(path)?;
    build_classifier(&config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use toxiguard_core::Label;

    #[tokio::test]
    async fn test_build_default_classifier() {
        let classifier = build_classifier(&ClassifierConfig::default()).unwrap();
        assert_eq!(classifier.name(), "toxicity-lexicon");

        let result = classifier.classify("you idiot").await.unwrap();
        assert_eq!(result.label, Label::Toxic);
    }

    #[test]
    fn test_linear_requires_model_path() {
        let config = ClassifierConfig {
            kind: ClassifierKind::Linear,
            ..Default::default()
        };
        let err = build_classifier(&config).err().unwrap();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_linear_with_missing_artifact_fails() {
        let config = ClassifierConfig {
            kind: ClassifierKind::Linear,
            model_path: Some("/nonexistent/model.json".into()),
            ..Default::default()
        };
        assert!(build_classifier(&config).is_err());
    }

    #[tokio::test]
    async fn test_init_from_file_with_extra_terms() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "kind: lexicon\nlexicon:\n  extra_terms: [clown]\n  hit_weight: 0.5"
        )
        .unwrap();

        let classifier = init_classifier_from_file(file.path()).unwrap();
        let result = classifier.classify("what a clown").await.unwrap();
        assert_eq!(result.label, Label::Toxic);
        assert_eq!(result.score, Some(0.5));
    }
}
