//! Resume field extraction: a pluggable, trait-based capability that turns a
//! staged document into a [`FieldMap`].
//!
//! Default: `KeywordResumeExtractor` (local, deterministic, no network).
//! Alternative: `LlmResumeExtractor` (Claude, selected with `EXTRACTOR_BACKEND=llm`).
//!
//! `AppState` holds an `Arc<dyn ResumeExtractor>`, chosen at startup via config.

pub mod field_map;
pub mod format;
pub mod keyword;
pub mod llm;
pub mod prompts;
pub mod text;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{Config, ExtractorBackend};
use crate::llm_client::{LlmClient, LlmError};

pub use field_map::{FieldMap, FieldValue};
pub use format::DocumentFormat;
pub use keyword::KeywordResumeExtractor;
pub use llm::LlmResumeExtractor;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported document format: {0}")]
    UnsupportedFormat(DocumentFormat),

    #[error("PDF text extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX text extraction failed: {0}")]
    Docx(String),

    #[error("LLM extraction failed: {0}")]
    Llm(#[from] LlmError),

    #[error("extraction task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("extractor rejected document: {0}")]
    Rejected(String),
}

/// The extraction capability. Implement this to swap backends without
/// touching the pipeline or handlers.
///
/// The document is always on disk: backends receive a path, never a buffer.
#[async_trait]
pub trait ResumeExtractor: Send + Sync {
    async fn extract(
        &self,
        path: &Path,
        format: DocumentFormat,
    ) -> Result<FieldMap, ExtractionError>;

    /// Short backend label for logs.
    fn backend_name(&self) -> &'static str;
}

/// Builds the extractor selected by `EXTRACTOR_BACKEND`.
pub fn build_extractor(config: &Config) -> anyhow::Result<Arc<dyn ResumeExtractor>> {
    let extractor: Arc<dyn ResumeExtractor> = match config.extractor_backend {
        ExtractorBackend::Keyword => Arc::new(KeywordResumeExtractor::default()),
        ExtractorBackend::Llm => {
            let api_key = config
                .anthropic_api_key
                .clone()
                .ok_or_else(|| anyhow::anyhow!("ANTHROPIC_API_KEY is required for the llm backend"))?;
            let mut client = LlmClient::new(api_key);
            if let Some(model) = &config.llm_model {
                client = client.with_model(model.clone());
            }
            Arc::new(LlmResumeExtractor::new(client))
        }
    };
    Ok(extractor)
}
