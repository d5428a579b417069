use docx_rs::{
    read_docx, DocumentChild, Docx, Paragraph, ParagraphChild, Run, RunChild, Style, StyleType,
};
use std::io::Cursor;

use super::error::DocumentError;

pub const QUESTIONS_TITLE: &str = "Questions";
pub const ANSWERS_TITLE: &str = "Answers";

const TITLE_STYLE: &str = "Title";

pub struct DocxExporter;

impl DocxExporter {
    pub fn new() -> Self {
        Self
    }

    /// Builds an in-memory .docx: one title heading followed by a paragraph
    /// per non-blank line of `text`.
    pub fn create_docx(&self, text: &str, topic: &str, title_prefix: &str) -> Result<Vec<u8>, DocumentError> {
        let heading = format!("9618 CS {}: {}", title_prefix, topic);

        let mut docx = Docx::new()
            .add_style(
                Style::new(TITLE_STYLE, StyleType::Paragraph)
                    .name(TITLE_STYLE)
                    .size(52)
                    .bold(),
            )
            .add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text(heading))
                    .style(TITLE_STYLE),
            );

        for line in text.split('\n').filter(|line| !line.trim().is_empty()) {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line)));
        }

        let mut buffer = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut buffer)
            .map_err(|e| DocumentError::WordError(e.to_string()))?;
        Ok(buffer.into_inner())
    }

    /// Reads back the text of every paragraph, heading included.
    pub fn read_paragraphs(&self, bytes: &[u8]) -> Result<Vec<String>, DocumentError> {
        let docx = read_docx(bytes).map_err(|e| DocumentError::WordError(e.to_string()))?;

        let paragraphs = docx
            .document
            .children
            .iter()
            .filter_map(|child| match child {
                DocumentChild::Paragraph(para) => Some(
                    para.children
                        .iter()
                        .filter_map(|pc| match pc {
                            ParagraphChild::Run(run) => Some(
                                run.children
                                    .iter()
                                    .filter_map(|rc| match rc {
                                        RunChild::Text(t) => Some(t.text.as_str()),
                                        _ => None,
                                    })
                                    .collect::<String>(),
                            ),
                            _ => None,
                        })
                        .collect::<String>(),
                ),
                _ => None,
            })
            .collect();

        Ok(paragraphs)
    }
}

impl Default for DocxExporter {
    fn default() -> Self {
        Self::new()
    }
}
