use anyhow::{bail, Context, Result};

use crate::analysis::analyzer::{AnalysisLimits, DEFAULT_MAX_DOCUMENT_BYTES, DEFAULT_MAX_TEXT_BYTES};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    pub max_document_bytes: usize,
    pub max_text_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_document_bytes: byte_limit("MAX_DOCUMENT_BYTES", DEFAULT_MAX_DOCUMENT_BYTES)?,
            max_text_bytes: byte_limit("MAX_TEXT_BYTES", DEFAULT_MAX_TEXT_BYTES)?,
        })
    }

    pub fn analysis_limits(&self) -> AnalysisLimits {
        AnalysisLimits {
            max_document_bytes: self.max_document_bytes,
            max_text_bytes: self.max_text_bytes,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn byte_limit(key: &str, default: usize) -> Result<usize> {
    match std::env::var(key) {
        Ok(raw) => parse_byte_limit(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_byte_limit(key: &str, raw: &str) -> Result<usize> {
    let value = raw
        .trim()
        .parse::<usize>()
        .with_context(|| format!("{key} must be a positive integer"))?;
    if value == 0 {
        bail!("{key} must be greater than zero");
    }
    Ok(value)
}
