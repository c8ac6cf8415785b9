pub mod format;
pub mod logging;

pub use format::format_number;
pub use logging::truncate_text;
