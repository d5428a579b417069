pub mod pdf;
pub mod word;
pub mod error;


pub use pdf::{PdfExtractor, DEFAULT_MAX_CHARS};
pub use word::{DocxExporter, ANSWERS_TITLE, QUESTIONS_TITLE};
pub use error::DocumentError;
