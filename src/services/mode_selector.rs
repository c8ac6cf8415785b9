//! 模式选择 - 业务能力层
//!
//! 只有"难题"且网络可达时才值得付出远程调用的成本和延迟

use crate::models::{ProblemComplexity, SolverMode};

/// 根据题目类别和网络状态选择求解模式
///
/// | 类别 | 网络可达 | 模式 |
/// |------|----------|------|
/// | 离散数学 / 实分析 / 符号计算 | 是 | Remote |
/// | 其他任意组合 | - | Local |
pub fn select_mode(category: ProblemComplexity, network_reachable: bool) -> SolverMode {
    if network_reachable && category.is_hard() {
        SolverMode::Remote
    } else {
        SolverMode::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbolic_depends_on_network() {
        assert_eq!(
            select_mode(ProblemComplexity::SymbolicComputation, true),
            SolverMode::Remote
        );
        assert_eq!(
            select_mode(ProblemComplexity::SymbolicComputation, false),
            SolverMode::Local
        );
    }

    #[test]
    fn test_simple_categories_stay_local() {
        assert_eq!(
            select_mode(ProblemComplexity::SimpleArithmetic, true),
            SolverMode::Local
        );
        assert_eq!(
            select_mode(ProblemComplexity::WordProblem, true),
            SolverMode::Local
        );
    }

    #[test]
    fn test_full_decision_table() {
        for category in ProblemComplexity::ALL {
            assert_eq!(select_mode(category, false), SolverMode::Local);
            let expected = match category {
                ProblemComplexity::DiscreteMath
                | ProblemComplexity::RealAnalysis
                | ProblemComplexity::SymbolicComputation => SolverMode::Remote,
                _ => SolverMode::Local,
            };
            assert_eq!(select_mode(category, true), expected, "{category}");
        }
    }
}
