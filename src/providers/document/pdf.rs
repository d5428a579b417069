use log::debug;
use lopdf::Document;
use std::path::Path;

use super::error::DocumentError;

/// Upper bound on extracted characters sent to the generative service.
pub const DEFAULT_MAX_CHARS: usize = 20_000;

#[derive(Debug, Clone)]
pub struct PdfExtractor {
    max_chars: usize,
}

impl PdfExtractor {
    pub fn new() -> Self {
        Self::with_max_chars(DEFAULT_MAX_CHARS)
    }

    pub fn with_max_chars(max_chars: usize) -> Self {
        Self { max_chars }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Concatenates the text of every page that has any, in page order,
    /// capped at `max_chars` characters.
    pub fn extract_text<P: AsRef<Path>>(&self, file_path: P) -> Result<String, DocumentError> {
        let path = file_path.as_ref();
        if !path.exists() {
            return Err(DocumentError::FileNotFound(path.to_path_buf()));
        }

        let document = Document::load(path)?;
        let pages = document.get_pages();

        let mut text = String::new();
        let mut skipped = 0usize;
        for page_number in pages.keys() {
            let page_text = document.extract_text(&[*page_number])?;
            if page_text.trim().is_empty() {
                skipped += 1;
                continue;
            }
            text.push_str(&page_text);
        }

        debug!(
            "Extracted {} chars from {} ({} pages, {} without text)",
            text.chars().count(),
            path.display(),
            pages.len(),
            skipped
        );

        Ok(truncate_chars(text, self.max_chars))
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn truncate_chars(mut text: String, max_chars: usize) -> String {
    if let Some((end, _)) = text.char_indices().nth(max_chars) {
        text.truncate(end);
    }
    text
}
