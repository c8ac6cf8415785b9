//! 求解调度 - 流程层
//!
//! 核心职责：定义"一道题"的完整求解流程
//!
//! 流程顺序：
//! 1. 分类（不会失败）
//! 2. 需要远程时探测网络 → 远程求解（最多一次）
//! 3. 远程失败或不需要远程 → 本地合成表达式 → 本地求值（最多一次）
//!
//! 远程错误不向上传播，只记录原因并附加到最终结果文本中

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::RemoteError;
use crate::infrastructure::{
    Evaluator, NetworkProbe, OpenAiRemoteClient, RemoteClient, RemoteRequest,
};
use crate::models::{ProblemComplexity, ProblemKind, SolveOutcome, SolverConfig, SolverMode};
use crate::services::{classify, extract_numbers, proof_expression, select_mode, synthesize_with};
use crate::utils::truncate_text;
use crate::workflow::solve_ctx::SolveCtx;

/// 求解调度器
///
/// - 只持有不可变的协作者，可以在多个任务间共享 `&self`
/// - 每次调度最多一次远程调用、一次本地求值
/// - 永远返回 `SolveOutcome`，不返回错误
pub struct SolveDispatcher<R> {
    evaluator: Box<dyn Evaluator>,
    remote: R,
    probe: Arc<dyn NetworkProbe>,
}

impl SolveDispatcher<OpenAiRemoteClient> {
    /// 按程序配置组装调度器
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.evaluator.build(),
            OpenAiRemoteClient::new(config.remote_timeout()),
            config.build_probe(),
        )
    }
}

impl<R: RemoteClient> SolveDispatcher<R> {
    pub fn new(evaluator: Box<dyn Evaluator>, remote: R, probe: Box<dyn NetworkProbe>) -> Self {
        Self {
            evaluator,
            remote,
            probe: Arc::from(probe),
        }
    }

    pub fn evaluator_name(&self) -> &'static str {
        self.evaluator.name()
    }

    /// 求解应用题
    pub async fn dispatch(&self, raw: &str, config: &SolverConfig) -> SolveOutcome {
        self.dispatch_kind(ProblemKind::Word, raw, config).await
    }

    /// 按输入类型求解
    pub async fn dispatch_kind(
        &self,
        kind: ProblemKind,
        raw: &str,
        config: &SolverConfig,
    ) -> SolveOutcome {
        self.solve(&SolveCtx::single(kind), raw, config).await
    }

    /// 带上下文求解（批量模式使用，日志带题号前缀）
    pub async fn solve(&self, ctx: &SolveCtx, raw: &str, config: &SolverConfig) -> SolveOutcome {
        let category = classify(raw);
        info!(
            "{} 📝 {} (类别: {})",
            ctx,
            truncate_text(raw.trim(), 60),
            category
        );

        let mut remote_failure = None;

        if wants_remote(category, config) {
            if self.network_reachable().await {
                match self.solve_remotely(ctx, raw, config).await {
                    Ok(text) => {
                        info!("{} ✓ 远程求解成功", ctx);
                        return SolveOutcome::success(text, SolverMode::Remote);
                    }
                    Err(e) => {
                        warn!("{} ⚠️ 远程求解失败，改用本地求解: {}", ctx, e);
                        remote_failure = Some(e);
                    }
                }
            } else if config.mode == SolverMode::Remote {
                warn!("{} ⚠️ 网络不可达，改用本地求解", ctx);
                remote_failure = Some(RemoteError::Unreachable);
            } else {
                debug!("{} 网络不可达，跳过自动远程求解", ctx);
            }
        }

        let mut outcome = self.solve_locally(ctx, raw);

        if let Some(reason) = remote_failure {
            outcome
                .text
                .push_str(&format!("\n(remote solve failed: {reason}; answered offline)"));
        }

        outcome
    }

    /// 探测会阻塞（TCP 连接超时），放到阻塞线程池上执行
    async fn network_reachable(&self) -> bool {
        let probe = Arc::clone(&self.probe);
        match tokio::task::spawn_blocking(move || probe.is_reachable()).await {
            Ok(reachable) => reachable,
            Err(e) => {
                warn!("⚠️ 网络探测任务异常，按不可达处理: {}", e);
                false
            }
        }
    }

    async fn solve_remotely(
        &self,
        ctx: &SolveCtx,
        raw: &str,
        config: &SolverConfig,
    ) -> Result<String, RemoteError> {
        let request = RemoteRequest::new(&remote_prompt(ctx.kind, raw), config);
        info!("{} 🌐 尝试远程求解 (模型: {})", ctx, request.model);
        self.remote.solve(request).await
    }

    fn solve_locally(&self, ctx: &SolveCtx, raw: &str) -> SolveOutcome {
        let expression = local_expression(ctx.kind, raw);
        debug!(
            "{} 本地求值 ({}): {}",
            ctx,
            self.evaluator.name(),
            expression
        );

        match self.evaluator.evaluate(&expression) {
            Ok(value) => {
                info!("{} ✓ 本地求解完成: {}", ctx, value);
                SolveOutcome::success(
                    format!("{}: {}", ctx.kind.report_label(), value),
                    SolverMode::Local,
                )
            }
            Err(e) => {
                warn!("{} ❌ 本地求值失败: {}", ctx, e);
                SolveOutcome::failure(e.to_string(), SolverMode::Local)
            }
        }
    }
}

/// 是否尝试远程：调用方明确要求，或允许自动升级且题目足够难
fn wants_remote(category: ProblemComplexity, config: &SolverConfig) -> bool {
    config.mode == SolverMode::Remote
        || (config.auto_remote && select_mode(category, true) == SolverMode::Remote)
}

/// 发给远程端点的题目正文
fn remote_prompt(kind: ProblemKind, raw: &str) -> String {
    match kind {
        ProblemKind::Proof => format!("Prove: {}", raw.trim()),
        ProblemKind::Expression | ProblemKind::Word => raw.trim().to_string(),
    }
}

/// 本地求值使用的表达式
fn local_expression(kind: ProblemKind, raw: &str) -> String {
    match kind {
        ProblemKind::Expression => raw.trim().to_string(),
        ProblemKind::Proof => proof_expression(raw).to_string(),
        ProblemKind::Word => synthesize_with(raw, &extract_numbers(raw)).expression,
    }
}
