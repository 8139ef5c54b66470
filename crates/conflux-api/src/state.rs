use crate::config::Config;
use conflux_llm::InferenceClient;
use conflux_retrieval::RetrievalClient;
use std::sync::Arc;

/// Shared application state passed to all handlers
///
/// Collaborators are trait objects behind Arc so requests stay pure functions
/// of their inputs plus what was injected at startup. Retrieval is optional;
/// without it the augmenter is a no-op.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub inference: Arc<dyn InferenceClient>,
    pub retrieval: Option<Arc<dyn RetrievalClient>>,
}

impl AppState {
    pub fn new(
        config: Config,
        inference: Arc<dyn InferenceClient>,
        retrieval: Option<Arc<dyn RetrievalClient>>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            inference,
            retrieval,
        }
    }
}
