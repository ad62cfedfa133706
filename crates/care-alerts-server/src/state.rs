//! Shared application state.

use std::sync::Arc;

use care_alerts_core::AdvisoryOrchestrator;

/// State shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    orchestrator: Arc<AdvisoryOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: AdvisoryOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }

    pub fn orchestrator(&self) -> &AdvisoryOrchestrator {
        &self.orchestrator
    }
}
