use std::sync::Arc;

use crate::config::Config;
use crate::embedding::Embedder;
use crate::extract::TextExtractor;
use crate::llm_client::LlmClient;
use crate::roadmap::catalog::Catalog;
use crate::store::VectorStore;

/// Shared application state injected into all route handlers via Axum
/// extractors. The catalog is read-only after load; everything else is a
/// pooled or cloneable client.
#[derive(Clone)]
pub struct AppState {
    pub store: VectorStore,
    pub llm: LlmClient,
    pub embedder: Arc<dyn Embedder>,
    pub extractor: Arc<dyn TextExtractor>,
    pub catalog: Arc<Catalog>,
    pub config: Config,
}
