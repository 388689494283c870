use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionBackend;
use crate::registry::JobStore;
use crate::retrieval::RetrievalContextBuilder;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Every external collaborator sits behind a trait object so tests (and
/// future backends) swap in without touching handler code.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<dyn JobStore>,
    pub llm: Arc<dyn CompletionBackend>,
    pub retrieval: RetrievalContextBuilder,
    pub config: Config,
}
