//! 题目分类 - 业务能力层
//!
//! 按固定优先级的规则表把原始文本归入一个难度类别。
//! 规则从上到下依次匹配，第一个命中的规则生效；都不命中时归为应用题。

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::models::ProblemComplexity;

/// 一条分类规则
pub struct ClassificationRule {
    /// 规则名称（用于日志和测试）
    pub name: &'static str,
    /// 命中后归入的类别
    pub category: ProblemComplexity,
    matcher: fn(&str) -> bool,
}

impl ClassificationRule {
    pub fn matches(&self, text: &str) -> bool {
        (self.matcher)(text)
    }
}

static DISCRETE_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        concat!(
            r"(?i)(permutation|combination|graph|vertex|edge|set theory|logic|propositional",
            r"|truth table|boolean)",
        ),
    )
    .expect("valid regex literal")
});

static ANALYSIS_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        concat!(
            r"(?i)(limit|continuity|convergence|sequence|series|epsilon|delta|supremum",
            r"|infimum|bounded)",
        ),
    )
    .expect("valid regex literal")
});

static SYMBOLIC_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        concat!(
            r"(?i)(integrate|differentiate|derivative|integral|solve|factor|expand|simplify",
            r"|D\[|Integrate\[)",
        ),
    )
    .expect("valid regex literal")
});

static DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex literal"));

static ARITHMETIC_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d+\-*/().\s]+$").expect("valid regex literal"));

fn is_long_text_with_digit(text: &str) -> bool {
    text.split_whitespace().count() > 5 && DIGIT.is_match(text)
}

/// 分类规则表，顺序即优先级
///
/// 关键词规则比"长文本 + 数字"更具体，必须排在前面，否则会被其遮蔽
pub static RULES: &[ClassificationRule] = &[
    ClassificationRule {
        name: "discrete_keywords",
        category: ProblemComplexity::DiscreteMath,
        matcher: |t| DISCRETE_KEYWORDS.is_match(t),
    },
    ClassificationRule {
        name: "analysis_keywords",
        category: ProblemComplexity::RealAnalysis,
        matcher: |t| ANALYSIS_KEYWORDS.is_match(t),
    },
    ClassificationRule {
        name: "symbolic_keywords",
        category: ProblemComplexity::SymbolicComputation,
        matcher: |t| SYMBOLIC_KEYWORDS.is_match(t),
    },
    ClassificationRule {
        name: "long_text_with_digit",
        category: ProblemComplexity::WordProblem,
        matcher: is_long_text_with_digit,
    },
    ClassificationRule {
        name: "arithmetic_only",
        category: ProblemComplexity::SimpleArithmetic,
        matcher: |t| ARITHMETIC_ONLY.is_match(t),
    },
];

/// 默认类别
pub const DEFAULT_CATEGORY: ProblemComplexity = ProblemComplexity::WordProblem;

/// 对题目文本分类
///
/// 纯函数：同样的输入永远得到同样的类别
pub fn classify(text: &str) -> ProblemComplexity {
    match RULES.iter().find(|rule| rule.matches(text)) {
        Some(rule) => {
            debug!("分类规则命中: {} -> {}", rule.name, rule.category);
            rule.category
        }
        None => {
            debug!("无分类规则命中，使用默认类别: {}", DEFAULT_CATEGORY);
            DEFAULT_CATEGORY
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str) -> &'static ClassificationRule {
        RULES.iter().find(|r| r.name == name).unwrap()
    }

    #[test]
    fn test_rule_order_is_documented_precedence() {
        let names: Vec<_> = RULES.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec![
                "discrete_keywords",
                "analysis_keywords",
                "symbolic_keywords",
                "long_text_with_digit",
                "arithmetic_only",
            ]
        );
    }

    #[test]
    fn test_discrete_rule() {
        let r = rule("discrete_keywords");
        assert!(r.matches("How many PERMUTATIONS of 5 items taken 2 at a time?"));
        assert!(r.matches("Build the truth table for p and q"));
        assert!(r.matches("Is this graph bipartite?"));
        assert!(!r.matches("1 + 2"));
    }

    #[test]
    fn test_analysis_rule() {
        let r = rule("analysis_keywords");
        assert!(r.matches("Find the limit of 1/n"));
        assert!(r.matches("Is the sequence bounded?"));
        assert!(!r.matches("Integrate[Sin[x], x]"));
    }

    #[test]
    fn test_symbolic_rule_literal_tokens() {
        let r = rule("symbolic_keywords");
        assert!(r.matches("Integrate[Sin[x], x]"));
        assert!(r.matches("D[x^2, x]"));
        assert!(r.matches("simplify (x+1)^2 - x^2"));
        assert!(!r.matches("2 + 3"));
    }

    #[test]
    fn test_long_text_rule_needs_digit_and_length() {
        let r = rule("long_text_with_digit");
        assert!(r.matches("If I have 2 apples and I buy 3 more"));
        assert!(!r.matches("If I have two apples and buy three more"));
        assert!(!r.matches("what is 2 plus 3"));
    }

    #[test]
    fn test_arithmetic_rule() {
        let r = rule("arithmetic_only");
        assert!(r.matches("(1 + 2) * 3.5 / 4 - 1"));
        assert!(!r.matches("2 ^ 3"));
        assert!(!r.matches(""));
    }

    #[test]
    fn test_classify_each_category() {
        assert_eq!(
            classify("How many combinations of 10 choose 3?"),
            ProblemComplexity::DiscreteMath
        );
        assert_eq!(
            classify("Does the series 1/n^2 converge?"),
            ProblemComplexity::RealAnalysis
        );
        assert_eq!(
            classify("Integrate[Sin[x], x]"),
            ProblemComplexity::SymbolicComputation
        );
        assert_eq!(
            classify("If I have 2 apples and I buy 3 more, how many apples do I have?"),
            ProblemComplexity::WordProblem
        );
        assert_eq!(classify("12 * (3 + 4)"), ProblemComplexity::SimpleArithmetic);
    }

    #[test]
    fn test_classify_default_is_word_problem() {
        assert_eq!(classify(""), ProblemComplexity::WordProblem);
        assert_eq!(classify("hello there"), ProblemComplexity::WordProblem);
        assert_eq!(
            classify("What is the area of an annulus with inner radius r and outer radius R?"),
            ProblemComplexity::WordProblem
        );
    }

    #[test]
    fn test_analysis_beats_long_text_with_digit() {
        let text = "Find the limit of the expression 3 times x as x approaches 2";
        assert!(rule("long_text_with_digit").matches(text));
        assert_eq!(classify(text), ProblemComplexity::RealAnalysis);
    }

    #[test]
    fn test_discrete_beats_analysis() {
        assert_eq!(
            classify("limit of the number of permutations"),
            ProblemComplexity::DiscreteMath
        );
    }

    #[test]
    fn test_classify_is_deterministic() {
        let inputs = [
            "",
            "2+2",
            "derivative of x^3 with respect to x",
            "the supremum of a bounded set",
            "a graph with 4 vertices",
            "I bought 7 pens and 3 pencils at the store today",
        ];
        for input in inputs {
            let first = classify(input);
            for _ in 0..5 {
                assert_eq!(classify(input), first, "input: {input}");
            }
            assert!(ProblemComplexity::ALL.contains(&first));
        }
    }
}
