//! Test doubles shared by the batch and route tests.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::extract::{DocumentFormat, ExtractionError, FieldMap, ResumeExtractor};

/// Replays scripted results in call order and records what it was asked to
/// read. Once the script runs out every call returns an empty map.
pub struct ScriptedExtractor {
    script: Mutex<VecDeque<Result<FieldMap, &'static str>>>,
    seen: Mutex<Vec<(String, DocumentFormat)>>,
}

impl ScriptedExtractor {
    pub fn new(script: impl IntoIterator<Item = Result<FieldMap, &'static str>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// `(staged path, format)` for every call so far.
    pub fn seen(&self) -> Vec<(String, DocumentFormat)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResumeExtractor for ScriptedExtractor {
    async fn extract(
        &self,
        path: &Path,
        format: DocumentFormat,
    ) -> Result<FieldMap, ExtractionError> {
        assert!(path.exists(), "staged file missing during extraction");
        self.seen
            .lock()
            .unwrap()
            .push((path.display().to_string(), format));

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Ok(fields)) => Ok(fields),
            Some(Err(reason)) => Err(ExtractionError::Rejected(reason.to_string())),
            None => Ok(FieldMap::default()),
        }
    }

    fn backend_name(&self) -> &'static str {
        "scripted"
    }
}
