pub mod gemini;
pub mod model_selector;

pub use gemini::{GeminiProvider, DEFAULT_BASE_URL};
pub use model_selector::{select_model, DEFAULT_MODEL};
