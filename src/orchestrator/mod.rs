//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量求解和并发调度，是整个系统的"指挥中心"。
//!
//! ### `batch_processor` - 批量求解处理器
//! - 管理应用生命周期（初始化、运行）
//! - 加载题目文件（Vec<ProblemEntry>）
//! - 控制并发数量（Semaphore）
//! - 输出结果文件和全局统计信息
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<ProblemEntry>)
//!     ↓
//! workflow::SolveDispatcher (处理单个题目)
//!     ↓
//! services (能力层：classify / synthesize / select_mode / proof catalog)
//!     ↓
//! infrastructure (基础设施：Evaluator / RemoteClient / NetworkProbe)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：只做调度和统计，不做具体业务判断
//! 2. **向下依赖**：编排层 → workflow → services → infrastructure

pub mod batch_processor;

// 重新导出主要类型
pub use batch_processor::{App, BatchStats};
