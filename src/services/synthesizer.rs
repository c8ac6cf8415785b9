//! 表达式合成 - 业务能力层
//!
//! 把应用题文本转换成求值器语法的符号表达式（如 `Permutations[5, 2]`、`D[x^3, x]`）。
//!
//! ## 规则表
//!
//! 规则按顺序匹配，第一个命中的规则负责生成表达式，最后一条规则无条件命中。
//! 任何规则都不会失败：缺少数字或正则捕获不到函数体时，退化为符号占位
//! （`n`、`r`、`a_n`、`x^2` 等），并在 [`Synthesis::degraded`] 中标记。

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::services::extractor::extract_numbers;
use crate::utils::format_number;

/// 合成结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesis {
    /// 求值器语法的表达式，永远非空
    pub expression: String,
    /// 命中的规则名称
    pub rule: &'static str,
    /// 是否用了占位符或默认值代替缺失的数字 / 捕获
    pub degraded: bool,
}

/// 一条合成规则
pub struct SynthesisRule {
    pub name: &'static str,
    /// 参数：(小写文本, 提取的数字)
    trigger: fn(&str, &[f64]) -> bool,
    /// 参数：(原始文本, 提取的数字)，返回 (表达式, 是否退化)
    build: fn(&str, &[f64]) -> (String, bool),
}

impl SynthesisRule {
    pub fn triggers(&self, lower: &str, operands: &[f64]) -> bool {
        (self.trigger)(lower, operands)
    }
}

static SEQUENCE_BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)sequence\s+(.+?)\s+as\s+n").expect("valid regex literal")
});

static SERIES_BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)series\s+(.+?)(?:\s+converge|$)").expect("valid regex literal")
});

static DERIVATIVE_BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)of\s+(.+?)\s+with respect to(?:\s+([A-Za-z][A-Za-z0-9_]*))?")
        .expect("valid regex literal")
});

static INTEGRATE_BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)integrate\s+(.+?)(?:\s+from|\s+with|$)").expect("valid regex literal")
});

static INTEGRATE_BOUNDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bfrom\s+(\S+)\s+to\s+(\S+)").expect("valid regex literal")
});

static RESPECT_TO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)with respect to\s+([A-Za-z][A-Za-z0-9_]*)").expect("valid regex literal")
});

static COMBINE_PHRASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(buys?|bought|more)\b").expect("valid regex literal"));

/// 捕获内容以这些词开头时说明正则越过了函数体，只抓到了句子的其余部分
const STOP_PREFIXES: &[&str] = &["converge", "diverge", "from ", "with "];

/// 清理正则捕获到的函数体；空内容或只是触发词本身时视为没捕获到
fn clean_capture(raw: &str) -> Option<String> {
    let body = raw
        .trim()
        .trim_end_matches(['?', ',', ';', '.'])
        .trim();
    let lower = body.to_lowercase();
    if body.is_empty() || STOP_PREFIXES.iter().any(|p| lower.starts_with(p)) {
        None
    } else {
        Some(body.to_string())
    }
}

fn captured(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| clean_capture(m.as_str()))
}

fn contains_any(lower: &str, words: &[&str]) -> bool {
    words.iter().any(|w| lower.contains(w))
}

fn binary_template(head: &str, operands: &[f64]) -> (String, bool) {
    match operands {
        [a, b, ..] => (
            format!("{}[{}, {}]", head, format_number(*a), format_number(*b)),
            false,
        ),
        _ => (format!("{}[n, r]", head), true),
    }
}

fn build_factorial(_: &str, operands: &[f64]) -> (String, bool) {
    match operands.first() {
        Some(n) => (format!("{}!", format_number(*n)), false),
        None => ("n!".to_string(), true),
    }
}

fn build_sequence_limit(text: &str, _: &[f64]) -> (String, bool) {
    match captured(&SEQUENCE_BODY, text) {
        Some(body) => (format!("Limit[{}, n->Infinity]", body), false),
        None => ("Limit[a_n, n->Infinity]".to_string(), true),
    }
}

fn build_series_sum(text: &str, _: &[f64]) -> (String, bool) {
    match captured(&SERIES_BODY, text) {
        Some(body) => (format!("Sum[{}, {{n, 1, Infinity}}]", body), false),
        None => ("Sum[a_n, {n, 1, Infinity}]".to_string(), true),
    }
}

fn build_combine(_: &str, operands: &[f64]) -> (String, bool) {
    match operands {
        [a, b, ..] => (
            format!("{} + {}", format_number(*a), format_number(*b)),
            false,
        ),
        _ => ("2 + 3".to_string(), true),
    }
}

fn build_derivative(text: &str, _: &[f64]) -> (String, bool) {
    let Some(caps) = DERIVATIVE_BODY.captures(text) else {
        return ("D[x^2, x]".to_string(), true);
    };
    let Some(body) = caps.get(1).and_then(|m| clean_capture(m.as_str())) else {
        return ("D[x^2, x]".to_string(), true);
    };
    let variable = caps
        .get(2)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "x".to_string());
    (format!("D[{}, {}]", body, variable), false)
}

fn build_integral(text: &str, _: &[f64]) -> (String, bool) {
    let Some(body) = captured(&INTEGRATE_BODY, text) else {
        return ("Integrate[x, x]".to_string(), true);
    };
    let variable = RESPECT_TO
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "x".to_string());

    let bounds = INTEGRATE_BOUNDS.captures(text).and_then(|caps| {
        let lower = caps.get(1).and_then(|m| clean_capture(m.as_str()))?;
        let upper = caps.get(2).and_then(|m| clean_capture(m.as_str()))?;
        Some((lower, upper))
    });

    match bounds {
        Some((lower, upper)) => (
            format!("Integrate[{}, {{{}, {}, {}}}]", body, variable, lower, upper),
            false,
        ),
        None => (format!("Integrate[{}, {}]", body, variable), false),
    }
}

/// 算术关键词和对应的运算符，按顺序匹配
const OPERATOR_KEYWORDS: &[(&[&str], &str)] = &[
    (&["sum", "total", "add", "plus"], " + "),
    (&["difference", "subtract"], " - "),
    (&["product", "multiply"], " * "),
    (&["quotient", "divide"], " / "),
];

fn keyword_operator(lower: &str) -> Option<&'static str> {
    OPERATOR_KEYWORDS
        .iter()
        .find(|(words, _)| contains_any(lower, words))
        .map(|(_, operator)| *operator)
}

fn build_arithmetic(text: &str, operands: &[f64]) -> (String, bool) {
    if operands.is_empty() {
        return ("0".to_string(), true);
    }

    let operator = keyword_operator(&text.to_lowercase()).unwrap_or(" + ");

    let joined = operands
        .iter()
        .map(|n| format_number(*n))
        .collect::<Vec<_>>()
        .join(operator);
    (joined, false)
}

/// 合成规则表，顺序即优先级
pub static RULES: &[SynthesisRule] = &[
    SynthesisRule {
        name: "permutation",
        trigger: |t, _| t.contains("permutation"),
        build: |_, ops| binary_template("Permutations", ops),
    },
    SynthesisRule {
        name: "combination",
        trigger: |t, _| t.contains("combination"),
        build: |_, ops| binary_template("Binomial", ops),
    },
    SynthesisRule {
        name: "factorial",
        trigger: |t, _| t.contains("factorial"),
        build: build_factorial,
    },
    SynthesisRule {
        name: "set_union",
        trigger: |t, _| t.contains("set") && t.contains("union"),
        build: |_, _| ("Union[A, B]".to_string(), false),
    },
    SynthesisRule {
        name: "set_intersection",
        trigger: |t, _| t.contains("set") && t.contains("intersection"),
        build: |_, _| ("Intersection[A, B]".to_string(), false),
    },
    SynthesisRule {
        name: "sequence_limit",
        trigger: |t, _| t.contains("sequence") && t.contains("limit"),
        build: build_sequence_limit,
    },
    SynthesisRule {
        name: "series_sum",
        trigger: |t, _| t.contains("series") && t.contains("converge"),
        build: build_series_sum,
    },
    SynthesisRule {
        name: "supremum",
        trigger: |t, _| t.contains("supremum") || t.contains("least upper bound"),
        build: |_, _| ("Max[Set]".to_string(), false),
    },
    SynthesisRule {
        name: "infimum",
        trigger: |t, _| t.contains("infimum") || t.contains("greatest lower bound"),
        build: |_, _| ("Min[Set]".to_string(), false),
    },
    SynthesisRule {
        name: "annulus_area",
        trigger: |t, _| t.contains("annulus") && t.contains("area"),
        build: |_, _| ("Integrate[2*Pi*rho, {rho, r, R}]".to_string(), false),
    },
    SynthesisRule {
        name: "combine",
        trigger: |t, _| t.contains("apples") && t.contains("buy"),
        build: build_combine,
    },
    SynthesisRule {
        name: "derivative",
        trigger: |t, _| t.contains("derivative"),
        build: build_derivative,
    },
    SynthesisRule {
        name: "integral",
        trigger: |t, _| t.contains("integrate"),
        build: build_integral,
    },
    // 泛化的 "buy / more" 说法排在微积分规则之后，且题目里有算术关键词时让给算术规则
    SynthesisRule {
        name: "combine_phrase",
        trigger: |t, ops| {
            ops.len() == 2 && COMBINE_PHRASE.is_match(t) && keyword_operator(t).is_none()
        },
        build: build_combine,
    },
    SynthesisRule {
        name: "arithmetic",
        trigger: |_, _| true,
        build: build_arithmetic,
    },
];

/// 合成表达式（自动提取数字）
pub fn synthesize(text: &str) -> String {
    synthesize_with(text, &extract_numbers(text)).expression
}

/// 用给定的数字合成表达式，返回命中规则和退化标记
pub fn synthesize_with(text: &str, operands: &[f64]) -> Synthesis {
    let lower = text.to_lowercase();
    let rule = RULES
        .iter()
        .find(|rule| rule.triggers(&lower, operands))
        .unwrap_or(&RULES[RULES.len() - 1]);

    let (expression, degraded) = (rule.build)(text, operands);

    if degraded {
        warn!(
            "合成规则 {} 缺少数字或捕获，使用占位表达式: {}",
            rule.name, expression
        );
    } else {
        debug!("合成规则 {} -> {}", rule.name, expression);
    }

    Synthesis {
        expression,
        rule: rule.name,
        degraded,
    }
}
