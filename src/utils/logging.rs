/// 日志工具模块
///
/// 提供日志初始化、结果文件写入和统计输出的辅助函数
use std::fs::{self, OpenOptions};
use std::io::Write;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::{AppError, AppResult};

/// 初始化 tracing 订阅器
///
/// 优先使用 `RUST_LOG`，未设置时按 `verbose` 选择 debug 或 info。
/// 重复调用不会报错（测试中会多次调用）
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化结果文件（覆盖旧内容并写入表头）
pub fn init_log_file(log_file_path: &str) -> AppResult<()> {
    let log_header = format!(
        "{}\n求解日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)
        .map_err(|e| AppError::file_write_failed(log_file_path, e))
}

/// 向结果文件追加一段内容
pub fn append_log(log_file_path: &str, content: &str) -> AppResult<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .map_err(|e| AppError::file_write_failed(log_file_path, e))?;

    writeln!(file, "{content}").map_err(|e| AppError::file_write_failed(log_file_path, e))
}

/// 记录程序启动信息
pub fn log_startup(max_concurrent: usize, mode: &str, evaluator: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 批量求解模式");
    info!("📊 最大并发数: {}", max_concurrent);
    info!("🧭 求解模式: {} / 求值器: {}", mode, evaluator);
    info!("{}", "=".repeat(60));
}

/// 记录题目加载信息
pub fn log_problems_loaded(total: usize, max_concurrent: usize) {
    info!("✓ 找到 {} 道待求解的题目", total);
    info!("📋 将以每批 {} 道的方式处理", max_concurrent);
}

/// 记录批次开始信息
pub fn log_batch_start(
    batch_num: usize,
    total_batches: usize,
    start: usize,
    end: usize,
    total: usize,
) {
    info!("{}", "=".repeat(60));
    info!("📦 开始处理第 {}/{} 批", batch_num, total_batches);
    info!("📄 本批题目: {}-{} / 共 {} 道", start, end, total);
}

/// 记录批次完成信息
pub fn log_batch_complete(batch_num: usize, success: usize, total: usize) {
    info!("{}", "─".repeat(60));
    info!("✓ 第 {} 批完成: 成功 {}/{}", batch_num, success, total);
}

/// 打印最终统计信息
pub fn print_final_stats(
    success: usize,
    failed: usize,
    remote: usize,
    total: usize,
    log_file_path: &str,
) {
    info!("{}", "=".repeat(60));
    info!("📊 全部求解完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("✅ 成功: {}/{}", success, total);
    info!("❌ 失败: {}", failed);
    info!("🌐 远程求解: {}", remote);
    info!("{}", "=".repeat(60));
    info!("日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
