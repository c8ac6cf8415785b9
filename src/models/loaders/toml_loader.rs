use crate::error::AppError;
use crate::models::problem_set::ProblemSet;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// 从 TOML 文件加载批量求解题目
///
/// 文件不存在或读不出来时返回 [`AppError::File`]
pub async fn load_problem_set(toml_file_path: &Path) -> Result<ProblemSet> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .map_err(|e| AppError::file_read_failed(toml_file_path.display().to_string(), e))?;

    let mut set = parse_problem_set(&content)
        .with_context(|| format!("无法解析TOML文件: {}", toml_file_path.display()))?;

    // 设置文件路径
    set.file_path = Some(toml_file_path.to_string_lossy().to_string());

    tracing::info!(
        "成功加载 {} 道题目: {}",
        set.len(),
        toml_file_path.file_name().unwrap_or_default().to_string_lossy()
    );

    Ok(set)
}

/// 解析 TOML 文本，忽略空白题目
pub fn parse_problem_set(content: &str) -> Result<ProblemSet> {
    let mut set: ProblemSet = toml::from_str(content)?;

    let before = set.problems.len();
    set.problems.retain(|p| !p.text.trim().is_empty());
    if set.problems.len() < before {
        tracing::warn!("跳过 {} 道空白题目", before - set.problems.len());
    }

    Ok(set)
}
