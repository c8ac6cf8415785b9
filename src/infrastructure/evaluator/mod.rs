//! 本地求值能力
//!
//! 核心逻辑只通过 [`Evaluator`] 调用求值器，不关心具体算法。
//! 具体实现在启动时根据配置选择：
//! - [`SymbolicEvaluator`] - 解析方括号语法，折叠数值，其余符号形式原样返回
//! - [`ArithmeticOnlyEvaluator`] - 只支持四则运算
//! - [`UnsupportedEvaluator`] - 当前平台没有本地求值能力

pub mod arithmetic;
pub mod parser;
pub mod symbolic;

pub use arithmetic::ArithmeticOnlyEvaluator;
pub use symbolic::SymbolicEvaluator;

use crate::error::{ConfigError, EvalError};

/// 本地求值器
pub trait Evaluator: Send + Sync {
    /// 求值器名称（用于日志）
    fn name(&self) -> &'static str;

    /// 对求值器语法的表达式求值，失败时返回可直接展示的错误
    fn evaluate(&self, expression: &str) -> Result<String, EvalError>;
}

pub const UNSUPPORTED_MESSAGE: &str = "Evaluation is not supported on this platform";

#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedEvaluator;

impl Evaluator for UnsupportedEvaluator {
    fn name(&self) -> &'static str {
        "unsupported"
    }

    fn evaluate(&self, _expression: &str) -> Result<String, EvalError> {
        Err(EvalError::unsupported(UNSUPPORTED_MESSAGE))
    }
}

/// 求值器类型（配置项）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvaluatorKind {
    #[default]
    Symbolic,
    ArithmeticOnly,
    Unsupported,
}

impl EvaluatorKind {
    /// 创建对应的求值器
    pub fn build(self) -> Box<dyn Evaluator> {
        match self {
            EvaluatorKind::Symbolic => Box::new(SymbolicEvaluator::new()),
            EvaluatorKind::ArithmeticOnly => Box::new(ArithmeticOnlyEvaluator::new()),
            EvaluatorKind::Unsupported => Box::new(UnsupportedEvaluator),
        }
    }
}

impl std::str::FromStr for EvaluatorKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "symbolic" => Ok(EvaluatorKind::Symbolic),
            "arithmetic" | "arithmetic_only" => Ok(EvaluatorKind::ArithmeticOnly),
            "unsupported" | "none" => Ok(EvaluatorKind::Unsupported),
            _ => Err(ConfigError::InvalidValue {
                name: "EVALUATOR".to_string(),
                value: s.to_string(),
                expected: "symbolic | arithmetic | unsupported".to_string(),
            }),
        }
    }
}
