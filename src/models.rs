//! Data models and structures
//!
//! Defines the JSON bodies exchanged with HTTP callers and the
//! environment-backed service configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const HEALTH_MESSAGE: &str = "Shoe Analyzer API is running.";

/// Body of a successful `POST /api/analyze-shoe`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyzeResponse {
    pub status: String,
    pub result: String,
}

impl AnalyzeResponse {
    pub fn success(result: String) -> Self {
        Self {
            status: "success".to_string(),
            result,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            message: HEALTH_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub detail: String,
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub host: String,
    pub port: u16,
    pub prompt_file: Option<PathBuf>,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            host: "0.0.0.0".to_string(),
            port: 8000,
            prompt_file: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    ///
    /// Blank values are treated as unset. A missing API key is not an error:
    /// the service starts in the unconfigured mode instead.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            gemini_api_key: var("GEMINI_API_KEY"),
            gemini_model: var("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            host: var("HOST").unwrap_or(defaults.host),
            port: match var("PORT") {
                Some(raw) => parse_number("PORT", &raw)?,
                None => defaults.port,
            },
            prompt_file: var("SHOE_PROMPT_FILE").map(PathBuf::from),
            max_upload_bytes: match var("MAX_UPLOAD_BYTES") {
                Some(raw) => parse_number("MAX_UPLOAD_BYTES", &raw)?,
                None => defaults.max_upload_bytes,
            },
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> crate::Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| crate::Error::Config(format!("{} must be a number, got '{}'", key, raw)))
}
