pub mod toml_loader;

pub use toml_loader::{load_problem_set, parse_problem_set};
