//! 批量求解处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量求解和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：初始化结果文件、组装 `SolveDispatcher`
//! 2. **批量加载**：从 TOML 文件加载所有待求解的题目
//! 3. **并发控制**：使用 Semaphore 限制同时求解的数量
//! 4. **分批处理**：每批完成后再开始下一批，结果按题号顺序写入日志
//! 5. **全局统计**：汇总成功、失败和远程求解的数量
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单个题目的细节，全部委托给 `SolveDispatcher`
//! - **并发安全**：调度器通过 `Arc` 在任务间共享，只读
//! - **不中断**：单题失败只计入统计，不影响其他题目

use anyhow::Result;
use futures::future::join_all;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::infrastructure::{OpenAiRemoteClient, RemoteClient};
use crate::models::{load_problem_set, ProblemEntry, ProblemKind, SolveOutcome, SolverMode};
use crate::utils::logging::{
    append_log, init_log_file, log_batch_complete, log_batch_start, log_problems_loaded,
    log_startup, print_final_stats,
};
use crate::workflow::{SolveCtx, SolveDispatcher};

/// 应用主结构
pub struct App<R = OpenAiRemoteClient> {
    config: Config,
    dispatcher: Arc<SolveDispatcher<R>>,
}

impl App<OpenAiRemoteClient> {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        let dispatcher = SolveDispatcher::from_config(&config);
        Self::with_dispatcher(config, dispatcher)
    }
}

impl<R: RemoteClient + 'static> App<R> {
    /// 使用指定的调度器初始化应用
    pub fn with_dispatcher(config: Config, dispatcher: SolveDispatcher<R>) -> Result<Self> {
        // 初始化日志文件
        init_log_file(&config.output_log_file)?;

        log_startup(
            config.max_concurrent_problems,
            config.solver_mode.name(),
            dispatcher.evaluator_name(),
        );

        Ok(Self {
            config,
            dispatcher: Arc::new(dispatcher),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 求解单个题目并写入结果文件
    pub async fn solve_one(&self, kind: ProblemKind, text: &str) -> Result<SolveOutcome> {
        let ctx = SolveCtx::single(kind);
        let outcome = self
            .dispatcher
            .solve(&ctx, text, &self.config.solver_config())
            .await;

        append_log(
            &self.config.output_log_file,
            &format_outcome(&ctx, text, &outcome),
        )?;

        Ok(outcome)
    }

    /// 运行批量求解（使用配置中的题目文件）
    pub async fn run(&self) -> Result<BatchStats> {
        let problems_file = self.config.problems_file.clone();
        self.run_file(Path::new(&problems_file)).await
    }

    /// 运行批量求解
    pub async fn run_file(&self, path: &Path) -> Result<BatchStats> {
        info!("📁 正在加载题目文件: {}", path.display());
        let problem_set = load_problem_set(path).await?;

        if problem_set.is_empty() {
            warn!("⚠️ 没有找到待求解的题目，程序结束");
            return Ok(BatchStats::default());
        }

        log_problems_loaded(problem_set.len(), self.config.max_concurrent_problems);

        let stats = self.process_all_problems(problem_set.problems).await?;

        print_final_stats(
            stats.success,
            stats.failed,
            stats.remote,
            stats.total,
            &self.config.output_log_file,
        );

        Ok(stats)
    }

    /// 分批求解所有题目
    async fn process_all_problems(&self, problems: Vec<ProblemEntry>) -> Result<BatchStats> {
        let batch_size = self.config.max_concurrent_problems.max(1);
        let semaphore = Arc::new(Semaphore::new(batch_size));
        let solver_config = self.config.solver_config();
        let total = problems.len();
        let total_batches = total.div_ceil(batch_size);
        let mut stats = BatchStats {
            total,
            ..Default::default()
        };

        for (batch_index, batch) in problems.chunks(batch_size).enumerate() {
            let batch_start = batch_index * batch_size;
            let batch_num = batch_index + 1;

            log_batch_start(
                batch_num,
                total_batches,
                batch_start + 1,
                batch_start + batch.len(),
                total,
            );

            let mut handles = Vec::with_capacity(batch.len());

            for (offset, entry) in batch.iter().enumerate() {
                let ctx = SolveCtx::new(batch_start + offset + 1, entry.kind);
                let permit = semaphore.clone().acquire_owned().await?;
                let dispatcher = Arc::clone(&self.dispatcher);
                let text = entry.text.clone();
                let config = solver_config.clone();

                handles.push(tokio::spawn(async move {
                    let _permit = permit;
                    let outcome = dispatcher.solve(&ctx, &text, &config).await;
                    (ctx, text, outcome)
                }));
            }

            // 等待本批所有任务完成，按题号顺序记录
            let mut batch_success = 0;
            let batch_len = handles.len();

            for joined in join_all(handles).await {
                match joined {
                    Ok((ctx, text, outcome)) => {
                        stats.record(&outcome);
                        if outcome.succeeded {
                            batch_success += 1;
                        }
                        if let Err(e) = append_log(
                            &self.config.output_log_file,
                            &format_outcome(&ctx, &text, &outcome),
                        ) {
                            warn!("{} 写入结果文件失败: {}", ctx, e);
                        }
                    }
                    Err(e) => {
                        error!("求解任务执行失败: {}", e);
                        stats.failed += 1;
                    }
                }
            }

            log_batch_complete(batch_num, batch_success, batch_len);
        }

        Ok(stats)
    }
}

/// 批量求解统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchStats {
    pub success: usize,
    pub failed: usize,
    /// 由远程端点给出结果的题目数
    pub remote: usize,
    pub total: usize,
}

impl BatchStats {
    fn record(&mut self, outcome: &SolveOutcome) {
        if outcome.succeeded {
            self.success += 1;
        } else {
            self.failed += 1;
        }
        if outcome.mode_used == SolverMode::Remote {
            self.remote += 1;
        }
    }
}

/// 结果文件中的一条记录
fn format_outcome(ctx: &SolveCtx, text: &str, outcome: &SolveOutcome) -> String {
    format!(
        "{} {} ({})\n题目: {}\n{}\n",
        ctx,
        if outcome.succeeded { "✅" } else { "❌" },
        outcome.mode_used,
        text.trim(),
        outcome.text
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_record() {
        let mut stats = BatchStats::default();
        stats.record(&SolveOutcome::success("Solution: 5", SolverMode::Local));
        stats.record(&SolveOutcome::success("x = 4", SolverMode::Remote));
        stats.record(&SolveOutcome::failure("Division by zero", SolverMode::Local));

        assert_eq!(stats.success, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.remote, 1);
    }

    #[test]
    fn test_format_outcome() {
        let ctx = SolveCtx::new(2, ProblemKind::Expression);
        let outcome = SolveOutcome::success("Result: 4", SolverMode::Local);
        assert_eq!(
            format_outcome(&ctx, " 2 + 2 ", &outcome),
            "[题目 #2 类型 expression] ✅ (local)\n题目: 2 + 2\nResult: 4\n"
        );
    }
}
