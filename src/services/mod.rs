pub mod classifier;
pub mod extractor;
pub mod mode_selector;
pub mod proof_catalog;
pub mod synthesizer;

pub use classifier::classify;
pub use extractor::extract_numbers;
pub use mode_selector::select_mode;
pub use proof_catalog::proof_expression;
pub use synthesizer::{synthesize, synthesize_with, Synthesis};
