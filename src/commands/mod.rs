use std::sync::Arc;
use thiserror::Error;

use crate::completion::{CompletionProvider, ProviderError};
use crate::papers::{PaperLocator, SearchError};
use crate::providers::document::{DocumentError, DocxExporter, PdfExtractor};
use crate::providers::gemini::select_model;

mod answers;
mod export;
mod search;

pub use export::Export;

#[derive(Error, Debug)]
pub enum ActionError {
    #[error("File '{0}' not found.")]
    PaperNotFound(String),

    #[error("{0}")]
    InvalidSearch(#[from] SearchError),

    #[error("Error: {0}")]
    Remote(#[from] ProviderError),

    #[error("Error: {0}")]
    Document(#[from] DocumentError),

    #[error("Search for a paper before generating model answers.")]
    NoQuestions,

    #[error("The questions changed while the mark scheme was being written. Generate it again.")]
    StaleAnswers,

    #[error("Nothing to export yet.")]
    NothingToExport,

    #[error("Error: {0}")]
    Internal(String),
}

/// Runs the user-triggered actions against a session. Each action is one
/// sequential chain of file and network calls; nothing is retried.
pub struct ActionHandler {
    provider: Arc<dyn CompletionProvider>,
    locator: PaperLocator,
    extractor: PdfExtractor,
    exporter: DocxExporter,
    fallback_model: String,
}

impl ActionHandler {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        locator: PaperLocator,
        extractor: PdfExtractor,
        fallback_model: String,
    ) -> Self {
        Self {
            provider,
            locator,
            extractor,
            exporter: DocxExporter::new(),
            fallback_model,
        }
    }

    /// Resolves the model and sends one prompt.
    async fn generate(&self, prompt: &str) -> Result<String, ActionError> {
        let selection = select_model(self.provider.as_ref(), &self.fallback_model).await;
        let text = self.provider.complete(selection.model(), prompt).await?;
        Ok(text)
    }
}
