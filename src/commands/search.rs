use log::{info, warn};

use super::{ActionError, ActionHandler};
use crate::papers::SearchParameters;
use crate::prompts::question_prompt;
use crate::providers::document::DocumentError;
use crate::session::SessionStore;

impl ActionHandler {
    /// Finds the paper, extracts its text and asks the model for the
    /// questions on the chosen topic.
    ///
    /// Answers from the previous cycle are cleared in the store before any
    /// I/O, whatever the outcome. Questions are only replaced on success and
    /// only if no newer search has started on the same session meanwhile.
    pub async fn search(&self, sessions: &SessionStore, sid: &str, params: SearchParameters) -> Result<(), ActionError> {
        let search_id = sessions.update(sid, |s| s.begin_search(params.clone())).await;
        params.validate()?;

        let filename = params.filename();
        let path = self.locator.resolve(&params);
        if !path.exists() {
            warn!("Paper not found: {}", path.display());
            return Err(ActionError::PaperNotFound(filename));
        }

        info!("Extracting {}", path.display());
        let extractor = self.extractor.clone();
        let paper_text = tokio::task::spawn_blocking(move || extractor.extract_text(&path))
            .await
            .map_err(|e| ActionError::Internal(e.to_string()))?
            .map_err(|e| match e {
                DocumentError::FileNotFound(_) => ActionError::PaperNotFound(filename.clone()),
                other => ActionError::Document(other),
            })?;

        let prompt = question_prompt(&params.topic, &paper_text);
        let questions = self.generate(&prompt).await?;
        let chars = questions.len();

        if sessions.update(sid, |s| s.complete_search(search_id, questions)).await {
            info!(
                "Extracted questions on '{}' from {} ({} chars)",
                params.topic, filename, chars
            );
        } else {
            info!("Discarding questions from {}: a newer search started", filename);
        }
        Ok(())
    }
}
