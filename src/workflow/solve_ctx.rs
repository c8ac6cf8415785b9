//! 求解上下文
//!
//! 封装"我正在求解第几题、什么类型"这一信息

use std::fmt::Display;

use crate::models::ProblemKind;

/// 求解上下文（仅用于日志）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolveCtx {
    /// 题目序号（从1开始）
    pub index: usize,
    pub kind: ProblemKind,
}

impl SolveCtx {
    pub fn new(index: usize, kind: ProblemKind) -> Self {
        Self { index, kind }
    }

    /// 单题求解（命令行）使用的上下文
    pub fn single(kind: ProblemKind) -> Self {
        Self::new(1, kind)
    }
}

impl Display for SolveCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[题目 #{} 类型 {}]", self.index, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefix() {
        assert_eq!(
            SolveCtx::new(3, ProblemKind::Word).to_string(),
            "[题目 #3 类型 word]"
        );
        assert_eq!(
            SolveCtx::single(ProblemKind::Proof).to_string(),
            "[题目 #1 类型 proof]"
        );
    }
}
