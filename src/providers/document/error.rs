use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("PDF extraction error: {0}")]
    PdfError(String),

    #[error("Word export error: {0}")]
    WordError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<lopdf::Error> for DocumentError {
    fn from(err: lopdf::Error) -> Self {
        DocumentError::PdfError(err.to_string())
    }
}
