use std::sync::Arc;

use crate::config::Config;
use crate::extract::ResumeExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable extractor. Default: KeywordResumeExtractor. Swap via EXTRACTOR_BACKEND.
    pub extractor: Arc<dyn ResumeExtractor>,
}
