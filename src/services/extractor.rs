//! 数字提取 - 业务能力层
//!
//! 从原始题目文本中按从左到右的顺序提取所有数字

use regex::Regex;
use std::sync::LazyLock;

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid regex literal"));

/// 提取文本中的所有数字
///
/// 每个匹配是一段最长的数字串（可带小数部分），按十进制解析为 `f64`。
/// 没有数字时返回空列表，不会出错。
pub fn extract_numbers(text: &str) -> Vec<f64> {
    NUMBER
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect()
}
