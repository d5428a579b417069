use log::info;

use super::{ActionError, ActionHandler};
use crate::prompts::answer_prompt;
use crate::session::SessionStore;

impl ActionHandler {
    /// Asks for a mark scheme for the stored questions. On failure the
    /// previous answers stay as they were; if the questions change while the
    /// model is working, the result is discarded.
    pub async fn generate_answers(&self, sessions: &SessionStore, sid: &str) -> Result<(), ActionError> {
        let (revision, questions) = sessions
            .update(sid, |s| s.answer_ticket())
            .await
            .ok_or(ActionError::NoQuestions)?;

        let prompt = answer_prompt(&questions);
        let answers = self.generate(&prompt).await?;
        let chars = answers.len();

        if !sessions.update(sid, |s| s.complete_answers(revision, answers)).await {
            return Err(ActionError::StaleAnswers);
        }
        info!("Generated mark scheme ({} chars)", chars);
        Ok(())
    }
}
