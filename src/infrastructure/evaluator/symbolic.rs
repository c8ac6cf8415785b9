//! 符号求值器
//!
//! 不是完整的代数引擎：只折叠数值子表达式、计算若干数值函数，
//! 其余符号形式（`D[...]`、`Integrate[...]`、`Union[A, B]` 等）原样输出。

use tracing::debug;

use super::parser::{parse, BinOp, Expr};
use super::Evaluator;
use crate::error::EvalError;

/// 最大可计算的阶乘参数（171! 超出 f64 范围）
const MAX_FACTORIAL: f64 = 170.0;

#[derive(Debug, Default, Clone, Copy)]
pub struct SymbolicEvaluator;

impl SymbolicEvaluator {
    pub fn new() -> Self {
        Self
    }
}

impl Evaluator for SymbolicEvaluator {
    fn name(&self) -> &'static str {
        "symbolic"
    }

    fn evaluate(&self, expression: &str) -> Result<String, EvalError> {
        let expr = parse(expression)?;
        let result = simplify(&expr)?;
        debug!("符号求值: {} => {}", expression, result);
        Ok(result.to_string())
    }
}

/// 化简表达式：能算成数字的部分都算掉
pub fn simplify(expr: &Expr) -> Result<Expr, EvalError> {
    match expr {
        Expr::Number(n) => finite(*n).map(Expr::Number),
        Expr::Symbol(_) => Ok(expr.clone()),
        Expr::List(items) => Ok(Expr::List(simplify_all(items)?)),
        Expr::Rule(lhs, rhs) => Ok(Expr::Rule(
            Box::new(simplify(lhs)?),
            Box::new(simplify(rhs)?),
        )),
        Expr::Neg(inner) => {
            let inner = simplify(inner)?;
            Ok(match inner.as_number() {
                Some(n) => Expr::Number(-n),
                None => Expr::Neg(Box::new(inner)),
            })
        }
        Expr::Binary {
            op: BinOp::Pow,
            lhs,
            rhs,
        } => fold_binary(BinOp::Pow, simplify(lhs)?, simplify(rhs)?),
        // 左结合链按顺序折叠，长求和不递归
        Expr::Binary { .. } => {
            let (base, links) = expr.left_chain();
            let mut acc = simplify(base)?;
            for (op, rhs) in links {
                acc = fold_binary(op, acc, simplify(rhs)?)?;
            }
            Ok(acc)
        }
        Expr::Factorial(inner) => {
            let inner = simplify(inner)?;
            match inner.as_number() {
                Some(n) => factorial(n).map(Expr::Number),
                None => Ok(Expr::Factorial(Box::new(inner))),
            }
        }
        Expr::Apply { head, args } => simplify_apply(head, args),
    }
}

fn fold_binary(op: BinOp, lhs: Expr, rhs: Expr) -> Result<Expr, EvalError> {
    match (lhs.as_number(), rhs.as_number()) {
        (Some(a), Some(b)) => apply_binary(op, a, b).map(Expr::Number),
        _ => Ok(Expr::binary(op, lhs, rhs)),
    }
}

fn simplify_all(items: &[Expr]) -> Result<Vec<Expr>, EvalError> {
    items.iter().map(simplify).collect()
}

fn simplify_apply(head: &str, args: &[Expr]) -> Result<Expr, EvalError> {
    let args = simplify_all(args)?;

    if head == "Limit" {
        if let Some(value) = limit_by_substitution(&args)? {
            return Ok(Expr::Number(value));
        }
    }

    let numbers: Option<Vec<f64>> = args.iter().map(Expr::as_number).collect();
    if let Some(numbers) = numbers {
        if let Some(value) = apply_numeric_head(head, &numbers)? {
            return Ok(Expr::Number(value));
        }
    }

    Ok(Expr::Apply {
        head: head.to_string(),
        args,
    })
}

/// `Limit[f, x->a]`，a 为有限数且代入后可以折叠成数字时直接给出结果
fn limit_by_substitution(args: &[Expr]) -> Result<Option<f64>, EvalError> {
    let [body, Expr::Rule(var, target)] = args else {
        return Ok(None);
    };
    let (Expr::Symbol(name), Some(value)) = (var.as_ref(), target.as_number()) else {
        return Ok(None);
    };

    let substituted = substitute(body, name, value);
    // 代入后出错（如 1/0）说明不能简单代入，保留原式
    match simplify(&substituted) {
        Ok(Expr::Number(n)) => Ok(Some(n)),
        _ => Ok(None),
    }
}

/// 把符号 `name` 替换成数字
pub fn substitute(expr: &Expr, name: &str, value: f64) -> Expr {
    let sub = |e: &Expr| substitute(e, name, value);
    match expr {
        Expr::Symbol(s) if s == name => Expr::Number(value),
        Expr::Number(_) | Expr::Symbol(_) => expr.clone(),
        Expr::Apply { head, args } => Expr::Apply {
            head: head.clone(),
            args: args.iter().map(sub).collect(),
        },
        Expr::List(items) => Expr::List(items.iter().map(sub).collect()),
        Expr::Neg(inner) => Expr::Neg(Box::new(sub(inner))),
        Expr::Binary {
            op: BinOp::Pow,
            lhs,
            rhs,
        } => Expr::binary(BinOp::Pow, sub(lhs), sub(rhs)),
        Expr::Binary { .. } => {
            let (base, links) = expr.left_chain();
            links
                .into_iter()
                .fold(sub(base), |acc, (op, rhs)| Expr::binary(op, acc, sub(rhs)))
        }
        Expr::Factorial(inner) => Expr::Factorial(Box::new(sub(inner))),
        Expr::Rule(lhs, rhs) => Expr::Rule(Box::new(sub(lhs)), Box::new(sub(rhs))),
    }
}

fn finite(value: f64) -> Result<f64, EvalError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::NonFinite)
    }
}

pub(crate) fn apply_binary(op: BinOp, a: f64, b: f64) -> Result<f64, EvalError> {
    let value = match op {
        BinOp::Add => a + b,
        BinOp::Sub => a - b,
        BinOp::Mul => a * b,
        BinOp::Div => {
            if b == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            a / b
        }
        BinOp::Mod => {
            if b == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            a % b
        }
        BinOp::Pow => a.powf(b),
    };
    finite(value)
}

fn non_negative_integer(value: f64) -> Result<u64, EvalError> {
    if value < 0.0 || value.fract() != 0.0 {
        return Err(EvalError::InvalidFactorial {
            value: crate::utils::format_number(value),
        });
    }
    if value > MAX_FACTORIAL {
        return Err(EvalError::NonFinite);
    }
    Ok(value as u64)
}

fn factorial(value: f64) -> Result<f64, EvalError> {
    let n = non_negative_integer(value)?;
    Ok((1..=n).fold(1.0, |acc, k| acc * k as f64))
}

fn permutations(n: f64, r: f64) -> Result<f64, EvalError> {
    let n = non_negative_integer(n)?;
    let r = non_negative_integer(r)?;
    if r > n {
        return Ok(0.0);
    }
    Ok(((n - r + 1)..=n).fold(1.0, |acc, k| acc * k as f64))
}

fn binomial(n: f64, r: f64) -> Result<f64, EvalError> {
    let n = non_negative_integer(n)?;
    let r = non_negative_integer(r)?;
    if r > n {
        return Ok(0.0);
    }
    let r = r.min(n - r);
    let value = (0..r).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64);
    Ok(value.round())
}

/// 数值函数；未知函数或参数个数不对时返回 `None`，保持未求值
fn apply_numeric_head(head: &str, args: &[f64]) -> Result<Option<f64>, EvalError> {
    let value = match (head, args) {
        ("Permutations", [n, r]) => permutations(*n, *r)?,
        ("Binomial", [n, r]) => binomial(*n, *r)?,
        ("Factorial", [n]) => factorial(*n)?,
        ("Sqrt", [x]) => x.sqrt(),
        ("Abs", [x]) => x.abs(),
        ("Exp", [x]) => x.exp(),
        ("Log", [x]) => x.ln(),
        ("Sin", [x]) => x.sin(),
        ("Cos", [x]) => x.cos(),
        ("Tan", [x]) => x.tan(),
        ("Max", [first, rest @ ..]) => rest.iter().copied().fold(*first, f64::max),
        ("Min", [first, rest @ ..]) => rest.iter().copied().fold(*first, f64::min),
        _ => return Ok(None),
    };
    finite(value).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(expr: &str) -> Result<String, EvalError> {
        SymbolicEvaluator::new().evaluate(expr)
    }

    #[test]
    fn test_arithmetic_folding() {
        assert_eq!(eval("2 + 3").unwrap(), "5");
        assert_eq!(eval("10 - 4").unwrap(), "6");
        assert_eq!(eval("20 / 8").unwrap(), "2.5");
        assert_eq!(eval("2^10").unwrap(), "1024");
    }

    #[test]
    fn test_combinatorics() {
        assert_eq!(eval("Permutations[5, 2]").unwrap(), "20");
        assert_eq!(eval("Binomial[10, 3]").unwrap(), "120");
        assert_eq!(eval("Binomial[3, 5]").unwrap(), "0");
        assert_eq!(eval("6!").unwrap(), "720");
        assert_eq!(eval("0!").unwrap(), "1");
    }

    #[test]
    fn test_symbolic_forms_stay_unevaluated() {
        assert_eq!(eval("Permutations[n, r]").unwrap(), "Permutations[n, r]");
        assert_eq!(eval("Union[A, B]").unwrap(), "Union[A, B]");
        assert_eq!(eval("D[x^3, x]").unwrap(), "D[x^3, x]");
        assert_eq!(
            eval("Integrate[2*Pi*rho, {rho, r, R}]").unwrap(),
            "Integrate[2*Pi*rho, {rho, r, R}]"
        );
        assert_eq!(eval("False").unwrap(), "False");
    }

    #[test]
    fn test_partial_folding_inside_symbolic_form() {
        assert_eq!(eval("D[x^(1 + 2), x]").unwrap(), "D[x^3, x]");
        assert_eq!(eval("Max[1, 7, 3]").unwrap(), "7");
        assert_eq!(eval("Max[Set]").unwrap(), "Max[Set]");
    }

    #[test]
    fn test_limit_by_substitution() {
        assert_eq!(eval("Limit[3*x, x->2]").unwrap(), "6");
        assert_eq!(
            eval("Limit[1/n, n->Infinity]").unwrap(),
            "Limit[1/n, n->Infinity]"
        );
        // 代入后分母为零，保留原式
        assert_eq!(eval("Limit[1/x, x->0]").unwrap(), "Limit[1/x, x->0]");
    }

    #[test]
    fn test_errors() {
        assert_eq!(eval("1 / 0"), Err(EvalError::DivisionByZero));
        assert!(matches!(
            eval("(-3)!"),
            Err(EvalError::InvalidFactorial { .. })
        ));
        assert_eq!(eval("200!"), Err(EvalError::NonFinite));
        assert!(matches!(eval("2 +"), Err(EvalError::Parse { .. })));
    }

    #[test]
    fn test_long_sum_folds_without_recursion() {
        let source = (1..=100_000)
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(" + ");
        assert_eq!(eval(&source).unwrap(), "5000050000");

        let product = vec!["1"; 50_000].join(" * ");
        assert_eq!(eval(&product).unwrap(), "1");
    }

    #[test]
    fn test_long_symbolic_chain_keeps_shape() {
        let source = format!("x + {}", vec!["1"; 20_000].join(" - "));
        assert_eq!(eval(&source).unwrap(), format!("x + {}", vec!["1"; 20_000].join(" - ")));

        let expr = parse(&format!("{} + y", vec!["x"; 20_000].join(" + "))).unwrap();
        let substituted = substitute(&expr, "x", 1.0);
        assert_eq!(simplify(&substituted).unwrap().to_string(), "20000 + y");
    }

    #[test]
    fn test_deep_nesting_is_parse_error() {
        let source = format!("{}1{}", "(".repeat(50_000), ")".repeat(50_000));
        assert!(matches!(eval(&source), Err(EvalError::Parse { .. })));
    }

    #[test]
    fn test_substitute() {
        let expr = parse("x^2 + y").unwrap();
        assert_eq!(substitute(&expr, "x", 3.0).to_string(), "3^2 + y");
    }
}
