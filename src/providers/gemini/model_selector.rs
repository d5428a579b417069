use log::{info, warn};

use crate::completion::{CompletionProvider, ModelInfo};

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const GENERATE_ACTION: &str = "generateContent";

#[derive(Debug, Clone, PartialEq)]
pub enum ModelSelection {
    Resolved(String),
    FallbackUsed { model: String, reason: String },
}

impl ModelSelection {
    pub fn model(&self) -> &str {
        match self {
            ModelSelection::Resolved(model) => model,
            ModelSelection::FallbackUsed { model, .. } => model,
        }
    }
}

/// First model that can generate content and has "flash" in its name.
pub fn pick_flash_model(models: &[ModelInfo]) -> Option<&ModelInfo> {
    models
        .iter()
        .find(|m| m.supports(GENERATE_ACTION) && m.name.to_lowercase().contains("flash"))
}

/// Asks the service for its catalog on every call. Never fails: any listing
/// error or an empty match falls back to `fallback`.
pub async fn select_model(provider: &dyn CompletionProvider, fallback: &str) -> ModelSelection {
    let reason = match provider.list_models().await {
        Ok(models) => match pick_flash_model(&models) {
            Some(model) => {
                info!("Using model {}", model.name);
                return ModelSelection::Resolved(model.name.clone());
            }
            None => format!("no flash model among {} listed", models.len()),
        },
        Err(e) => format!("model listing failed: {}", e),
    };

    warn!("Falling back to {}: {}", fallback, reason);
    ModelSelection::FallbackUsed {
        model: fallback.to_string(),
        reason,
    }
}
