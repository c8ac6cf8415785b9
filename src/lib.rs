//! # Math Router
//!
//! 数学题求解路由：给题目分类，决定本地还是远程求解，
//! 把自然语言题目合成为可求值的表达式，远程失败时回退到本地
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有外部能力，只暴露能力
//! - `Evaluator` - 本地求值（符号 / 仅四则运算 / 不支持）
//! - `RemoteClient` - 兼容 OpenAI 的远程求解
//! - `NetworkProbe` - 网络可达性探测
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 纯函数，只处理单个题目文本
//! - `classify` - 难度分类
//! - `extract_numbers` / `synthesize` - 数字提取与表达式合成
//! - `select_mode` - 模式选择
//! - `proof_expression` - 证明目录
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一道题"的完整求解流程
//! - `SolveCtx` - 上下文封装（题号 + 类型）
//! - `SolveDispatcher` - 流程编排（classify → remote → local → fallback）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量求解处理器，管理并发和统计
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{Evaluator, EvaluatorKind, NetworkProbe, RemoteClient};
pub use models::{ProblemComplexity, ProblemKind, SolveOutcome, SolverConfig, SolverMode};
pub use orchestrator::{App, BatchStats};
pub use services::{
    classify, extract_numbers, proof_expression, select_mode, synthesize, synthesize_with,
    Synthesis,
};
pub use workflow::{SolveCtx, SolveDispatcher};
