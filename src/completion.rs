use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Parse(String),

    #[error("response contained no text")]
    EmptyResponse,
}

/// A model advertised by the generative service.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInfo {
    pub name: String,
    pub supported_actions: Vec<String>,
}

impl ModelInfo {
    pub fn supports(&self, action: &str) -> bool {
        self.supported_actions.iter().any(|a| a == action)
    }
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Enumerates the models the service currently offers.
    async fn list_models(&self) -> Result<Vec<ModelInfo>, ProviderError>;

    /// Sends a single prompt to `model` and returns the response text.
    async fn complete(&self, model: &str, prompt: &str) -> Result<String, ProviderError>;
}
