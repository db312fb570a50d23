//! Toxiguard Classifiers
//!
//! Implementations of the classifier port used by the submission workflow.
//!
//! Two classifiers are provided:
//! - [`ToxicityClassifier`]: word-bounded lexicon matching, no artifact needed
//! - [`LinearModelClassifier`]: a frozen TF-IDF + logistic regression model
//!   exported to JSON and evaluated here without any training code
//!
//! Both are side-effect free and idempotent for a given input.

pub mod classifier;
pub mod config;
pub mod linear;
pub mod registry;
pub mod toxicity;

pub use classifier::{ClassificationMetadata, ClassificationResult, Classifier};
pub use config::{ClassifierConfig, ClassifierKind, LexiconConfig};
pub use linear::{LinearModelArtifact, LinearModelClassifier};
pub use registry::{build_classifier, init_classifier_from_file, load_config};
pub use toxicity::ToxicityClassifier;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::{ClassificationResult, Classifier};
    pub use crate::linear::LinearModelClassifier;
    pub use crate::toxicity::ToxicityClassifier;
}
