//! Shared application state

use crate::auth::SessionStore;
use crate::config::{AdminConfig, AppConfig};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use toxiguard_classifiers::build_classifier;
use toxiguard_core::Result;
use toxiguard_moderation::{SubmissionWorkflow, WorkflowConfig};
use toxiguard_reporting::Reporter;
use toxiguard_store::open_store;
use tracing::info;

/// State shared by every request handler
#[derive(Clone)]
pub struct AppState {
    pub workflow: Arc<SubmissionWorkflow>,
    pub reporter: Reporter,
    pub sessions: Arc<SessionStore>,
    pub admin: Arc<AdminConfig>,
    pub feed_limit: usize,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Assemble state around an existing workflow
    pub fn new(workflow: SubmissionWorkflow, admin: AdminConfig) -> Self {
        let reporter = Reporter::new(workflow.store().clone());
        Self {
            workflow: Arc::new(workflow),
            reporter,
            sessions: Arc::new(SessionStore::new(admin.session_ttl_secs)),
            admin: Arc::new(admin),
            feed_limit: 50,
            metrics: None,
        }
    }

    pub fn with_feed_limit(mut self, limit: usize) -> Self {
        self.feed_limit = limit;
        self
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Build the classifier, open the store and wire up the workflow
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let workflow = build_workflow(config)?;
        Ok(Self::new(workflow, config.admin.clone()).with_feed_limit(config.server.feed_limit))
    }
}

/// Workflow over the configured classifier and store
pub fn build_workflow(config: &AppConfig) -> Result<SubmissionWorkflow> {
    let classifier = build_classifier(&config.classifier)?;
    let store = open_store(&config.store)?;
    info!(
        classifier = classifier.name(),
        backend = ?config.store.backend,
        "Submission workflow ready"
    );

    Ok(SubmissionWorkflow::with_config(
        classifier,
        store,
        WorkflowConfig {
            classify_timeout: Duration::from_millis(config.classifier.timeout_ms),
            max_pending_drafts: config.drafts.max_pending,
        },
    ))
}
