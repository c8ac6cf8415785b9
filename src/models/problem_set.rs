use serde::{Deserialize, Serialize};

use crate::models::problem::ProblemKind;

/// 批量求解文件中的一道题
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemEntry {
    #[serde(default)]
    pub kind: ProblemKind,
    pub text: String,
}

/// 批量求解文件
///
/// ```toml
/// [[problems]]
/// kind = "word"
/// text = "If I have 2 apples and I buy 3 more, how many apples do I have?"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProblemSet {
    #[serde(default)]
    pub problems: Vec<ProblemEntry>,
    #[serde(skip_serializing, skip_deserializing)]
    pub file_path: Option<String>,
}

impl ProblemSet {
    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }
}
