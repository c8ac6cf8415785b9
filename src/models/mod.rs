pub mod loaders;
pub mod problem;
pub mod problem_set;

pub use loaders::{load_problem_set, parse_problem_set};
pub use problem::{ProblemComplexity, ProblemKind, SolveOutcome, SolverConfig, SolverMode};
pub use problem_set::{ProblemEntry, ProblemSet};
