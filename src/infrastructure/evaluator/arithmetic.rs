//! 纯算术求值器
//!
//! 只支持数字、`+ - * / ^ %`、括号和一元负号

use super::parser::{parse, BinOp, Expr};
use super::symbolic::simplify;
use super::Evaluator;
use crate::error::EvalError;

pub const ARITHMETIC_ONLY_MESSAGE: &str =
    "Only basic arithmetic operations and numbers are supported";

#[derive(Debug, Default, Clone, Copy)]
pub struct ArithmeticOnlyEvaluator;

impl ArithmeticOnlyEvaluator {
    pub fn new() -> Self {
        Self
    }
}

fn is_arithmetic(expr: &Expr) -> bool {
    match expr {
        Expr::Number(_) => true,
        Expr::Neg(inner) => is_arithmetic(inner),
        Expr::Binary {
            op: BinOp::Pow,
            lhs,
            rhs,
        } => is_arithmetic(lhs) && is_arithmetic(rhs),
        Expr::Binary { .. } => {
            let (base, links) = expr.left_chain();
            is_arithmetic(base) && links.iter().all(|(_, rhs)| is_arithmetic(rhs))
        }
        _ => false,
    }
}

impl Evaluator for ArithmeticOnlyEvaluator {
    fn name(&self) -> &'static str {
        "arithmetic"
    }

    fn evaluate(&self, expression: &str) -> Result<String, EvalError> {
        let expr = parse(expression)?;
        if !is_arithmetic(&expr) {
            return Err(EvalError::unsupported(ARITHMETIC_ONLY_MESSAGE));
        }
        Ok(simplify(&expr)?.to_string())
    }
}
