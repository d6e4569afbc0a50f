use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::batch::pipeline::FailurePolicy;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Which extraction backend turns a staged document into fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractorBackend {
    Keyword,
    Llm,
}

impl FromStr for ExtractorBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keyword" => Ok(Self::Keyword),
            "llm" => Ok(Self::Llm),
            other => bail!("unknown extractor backend '{other}' (expected 'keyword' or 'llm')"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if a value is present but malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub upload_dir: PathBuf,
    pub extractor_backend: ExtractorBackend,
    pub anthropic_api_key: Option<String>,
    /// Overrides the default Claude model for the `llm` backend.
    pub llm_model: Option<String>,
    pub failure_policy: FailurePolicy,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let extractor_backend: ExtractorBackend = optional_env("EXTRACTOR_BACKEND")
            .unwrap_or_else(|| "keyword".to_string())
            .parse()
            .context("EXTRACTOR_BACKEND is invalid")?;

        let anthropic_api_key = optional_env("ANTHROPIC_API_KEY");
        if extractor_backend == ExtractorBackend::Llm && anthropic_api_key.is_none() {
            bail!("ANTHROPIC_API_KEY must be set when EXTRACTOR_BACKEND=llm");
        }

        Ok(Config {
            port: optional_env("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            upload_dir: optional_env("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("uploads")),
            extractor_backend,
            anthropic_api_key,
            llm_model: optional_env("LLM_MODEL"),
            failure_policy: optional_env("FAILURE_POLICY")
                .unwrap_or_else(|| "fail_fast".to_string())
                .parse()
                .context("FAILURE_POLICY is invalid")?,
            max_upload_bytes: match optional_env("MAX_UPLOAD_BYTES") {
                Some(v) => v
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                None => DEFAULT_MAX_UPLOAD_BYTES,
            },
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            upload_dir: PathBuf::from("uploads"),
            extractor_backend: ExtractorBackend::Keyword,
            anthropic_api_key: None,
            llm_model: None,
            failure_policy: FailurePolicy::FailFast,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Empty values are treated the same as unset ones.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
