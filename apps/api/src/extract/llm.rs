//! LLM-backed extractor: document text goes to Claude, a JSON [`FieldMap`]
//! comes back.

use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use crate::extract::prompts::{build_prompt, system_prompt};
use crate::extract::text::read_document_text;
use crate::extract::{DocumentFormat, ExtractionError, FieldMap, ResumeExtractor};
use crate::llm_client::LlmClient;

pub struct LlmResumeExtractor {
    llm: LlmClient,
    system: String,
}

impl LlmResumeExtractor {
    pub fn new(llm: LlmClient) -> Self {
        Self {
            llm,
            system: system_prompt(),
        }
    }
}

#[async_trait]
impl ResumeExtractor for LlmResumeExtractor {
    async fn extract(
        &self,
        path: &Path,
        format: DocumentFormat,
    ) -> Result<FieldMap, ExtractionError> {
        let text = read_document_text(path, format).await?;
        if text.trim().is_empty() {
            return Err(ExtractionError::Rejected(
                "no text could be read from the document".to_string(),
            ));
        }

        debug!(model = self.llm.model(), chars = text.len(), "Sending resume to LLM");
        let fields = self
            .llm
            .call_json::<FieldMap>(&build_prompt(&text), &self.system)
            .await?;
        Ok(fields)
    }

    fn backend_name(&self) -> &'static str {
        "llm"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_blank_document_is_rejected_before_any_call() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.txt");
        std::fs::write(&path, "  \n ").unwrap();

        let extractor = LlmResumeExtractor::new(LlmClient::new("unused".into()));
        let err = extractor.extract(&path, DocumentFormat::Text).await.unwrap_err();
        assert!(matches!(err, ExtractionError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_unsupported_format_short_circuits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.doc");
        std::fs::write(&path, b"\xD0\xCF\x11\xE0").unwrap();

        let extractor = LlmResumeExtractor::new(LlmClient::new("unused".into()));
        let err = extractor.extract(&path, DocumentFormat::Doc).await.unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::UnsupportedFormat(DocumentFormat::Doc)
        ));
    }
}
