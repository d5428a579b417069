use super::{ActionError, ActionHandler};
use crate::providers::document::{ANSWERS_TITLE, QUESTIONS_TITLE};
use crate::session::SessionState;

/// A generated document ready to be downloaded.
pub struct Export {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ActionHandler {
    pub fn export_questions(&self, session: &SessionState) -> Result<Export, ActionError> {
        self.export(&session.question_set, &session.form.topic, QUESTIONS_TITLE)
    }

    pub fn export_answers(&self, session: &SessionState) -> Result<Export, ActionError> {
        self.export(&session.answer_set, &session.form.topic, ANSWERS_TITLE)
    }

    fn export(&self, text: &str, topic: &str, title: &str) -> Result<Export, ActionError> {
        if text.is_empty() {
            return Err(ActionError::NothingToExport);
        }
        let bytes = self.exporter.create_docx(text, topic, title)?;
        Ok(Export {
            filename: format!("{}_{}.docx", topic, title),
            bytes,
        })
    }
}
