use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;

use crate::providers::document::DEFAULT_MAX_CHARS;
use crate::providers::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::session::DEFAULT_SESSION_CAPACITY;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Gemini API key
    #[arg(short, long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Directory holding the question paper PDFs
    #[arg(long, env = "PAPERS_DIR", default_value = "past_papers")]
    pub papers_dir: PathBuf,

    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Model used when the catalog lookup fails or finds no flash model
    #[arg(long, env = "FALLBACK_MODEL", default_value = DEFAULT_MODEL)]
    pub fallback_model: String,

    /// Maximum characters of paper text sent with a prompt
    #[arg(long, env = "MAX_CHARS", default_value_t = DEFAULT_MAX_CHARS)]
    pub max_chars: usize,

    #[arg(long, env = "SESSION_CAPACITY", default_value_t = DEFAULT_SESSION_CAPACITY)]
    pub session_capacity: usize,

    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value = "8501")]
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub base_url: String,
    pub papers_dir: PathBuf,
    pub fallback_model: String,
    pub max_chars: usize,
    pub session_capacity: usize,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_args(args: Args) -> Result<Self> {
        let api_key = match args.api_key.filter(|key| !key.trim().is_empty()) {
            Some(key) => key,
            None => bail!("API key must be provided via --api-key or GEMINI_API_KEY env var"),
        };
        if args.max_chars == 0 {
            bail!("--max-chars must be >= 1");
        }
        if args.session_capacity == 0 {
            bail!("--session-capacity must be >= 1");
        }

        Ok(Self {
            api_key,
            base_url: args.base_url,
            papers_dir: args.papers_dir,
            fallback_model: args.fallback_model,
            max_chars: args.max_chars,
            session_capacity: args.session_capacity,
            host: args.host,
            port: args.port,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["pyp-extractor", "--api-key", "k", "--papers-dir", "past_papers"]).unwrap();
        let config = AppConfig::from_args(args).unwrap();

        assert_eq!(config.api_key, "k");
        assert_eq!(config.papers_dir, PathBuf::from("past_papers"));
        assert_eq!(config.base_url, "https://generativelanguage.googleapis.com");
        assert!(!config.fallback_model.is_empty());
        assert!(config.max_chars > 0);
    }

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from([
            "pyp-extractor",
            "--api-key",
            "k",
            "--max-chars",
            "500",
            "--fallback-model",
            "gemini-2.0-flash",
            "--host",
            "127.0.0.1",
            "--port",
            "9000",
        ])
        .unwrap();
        let config = AppConfig::from_args(args).unwrap();

        assert_eq!(config.max_chars, 500);
        assert_eq!(config.fallback_model, "gemini-2.0-flash");
        assert_eq!(config.bind_address(), "127.0.0.1:9000");
    }

    #[test]
    fn test_blank_api_key_is_rejected() {
        let args = Args::try_parse_from(["pyp-extractor", "--api-key", "  "]).unwrap();
        assert!(AppConfig::from_args(args).is_err());
    }

    #[test]
    fn test_zero_max_chars_is_rejected() {
        let args = Args::try_parse_from(["pyp-extractor", "--api-key", "k", "--max-chars", "0"]).unwrap();
        assert!(AppConfig::from_args(args).is_err());
    }
}
