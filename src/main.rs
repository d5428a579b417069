use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use dotenv::dotenv;
use log::{info, warn};
use tokio::net::TcpListener;

use crate::commands::ActionHandler;
use crate::config::{AppConfig, Args};
use crate::papers::PaperLocator;
use crate::providers::document::PdfExtractor;
use crate::providers::gemini::GeminiProvider;
use crate::session::SessionStore;

// Module imports
mod api;
mod commands;
mod completion;
mod config;
mod highlight;
mod papers;
mod prompts;
mod providers;
mod session;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = AppConfig::from_args(args)?;

    run_api_server(config).await
}

async fn run_api_server(config: AppConfig) -> anyhow::Result<()> {
    if !config.papers_dir.is_dir() {
        warn!(
            "Papers directory {} does not exist; every search will report a missing file",
            config.papers_dir.display()
        );
    }

    let provider = GeminiProvider::new(config.api_key.clone(), &config.base_url)
        .context("Failed to build Gemini client")?;

    let locator = PaperLocator::new(&config.papers_dir);
    let extractor = PdfExtractor::with_max_chars(config.max_chars);
    info!(
        "Serving papers from {} (text cap {} chars, fallback model {})",
        locator.base_dir().display(),
        extractor.max_chars(),
        config.fallback_model
    );

    let actions = ActionHandler::new(
        Arc::new(provider),
        locator,
        extractor,
        config.fallback_model.clone(),
    );
    let app = api::create_api(actions, SessionStore::new(config.session_capacity))
        .context("Failed to load page templates")?;

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    println!("{} {}", "📂 9618 CS AI Extractor Pro listening on".bright_cyan(), addr.bright_yellow());

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
