use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use crate::infrastructure::evaluator::EvaluatorKind;
use crate::infrastructure::network_probe::{CachedProbe, NetworkProbe, TcpProbe};
use crate::infrastructure::remote_client::{DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use crate::models::{SolverConfig, SolverMode};

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 同时求解的题目数量
    pub max_concurrent_problems: usize,
    /// 批量题目文件
    pub problems_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    // --- 求解配置 ---
    pub solver_mode: SolverMode,
    pub auto_remote: bool,
    pub evaluator: EvaluatorKind,
    // --- 远程 API 配置 ---
    pub remote_endpoint: String,
    pub remote_api_key: String,
    pub remote_model: String,
    pub remote_timeout_secs: u64,
    // --- 网络探测配置 ---
    pub probe_address: String,
    pub probe_timeout_ms: u64,
    /// 探测结果缓存秒数，0 表示每次求解都重新探测
    pub probe_cache_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_problems: 4,
            problems_file: "problems.toml".to_string(),
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            solver_mode: SolverMode::Local,
            auto_remote: true,
            evaluator: EvaluatorKind::Symbolic,
            remote_endpoint: DEFAULT_ENDPOINT.to_string(),
            remote_api_key: String::new(),
            remote_model: DEFAULT_MODEL.to_string(),
            remote_timeout_secs: DEFAULT_TIMEOUT_SECS,
            probe_address: "8.8.8.8:53".to_string(),
            probe_timeout_ms: 1500,
            probe_cache_secs: 0,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 从任意键值来源读取配置，缺失或无法解析的项使用默认值
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();
        Self {
            max_concurrent_problems: parse_or(
                &lookup,
                "MAX_CONCURRENT_PROBLEMS",
                default.max_concurrent_problems,
            )
            .max(1),
            problems_file: lookup("PROBLEMS_FILE").unwrap_or(default.problems_file),
            verbose_logging: parse_or(&lookup, "VERBOSE_LOGGING", default.verbose_logging),
            output_log_file: lookup("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            solver_mode: parse_or(&lookup, "SOLVER_MODE", default.solver_mode),
            auto_remote: parse_or(&lookup, "AUTO_REMOTE", default.auto_remote),
            evaluator: parse_or(&lookup, "EVALUATOR", default.evaluator),
            remote_endpoint: lookup("REMOTE_ENDPOINT").unwrap_or(default.remote_endpoint),
            remote_api_key: lookup("REMOTE_API_KEY").unwrap_or(default.remote_api_key),
            remote_model: lookup("REMOTE_MODEL").unwrap_or(default.remote_model),
            remote_timeout_secs: parse_or(
                &lookup,
                "REMOTE_TIMEOUT_SECS",
                default.remote_timeout_secs,
            ),
            probe_address: lookup("PROBE_ADDRESS").unwrap_or(default.probe_address),
            probe_timeout_ms: parse_or(&lookup, "PROBE_TIMEOUT_MS", default.probe_timeout_ms),
            probe_cache_secs: parse_or(&lookup, "PROBE_CACHE_SECS", default.probe_cache_secs),
        }
    }

    /// 每次求解传给核心逻辑的配置
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            mode: self.solver_mode,
            remote_endpoint: self.remote_endpoint.clone(),
            remote_key: self.remote_api_key.clone(),
            auto_remote: self.auto_remote,
            remote_model: self.remote_model.clone(),
        }
    }

    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_timeout_secs)
    }

    /// 按配置创建网络探测
    pub fn build_probe(&self) -> Box<dyn NetworkProbe> {
        let probe = TcpProbe::new(
            self.probe_address.clone(),
            Duration::from_millis(self.probe_timeout_ms),
        );
        if self.probe_cache_secs > 0 {
            Box::new(CachedProbe::new(
                probe,
                Duration::from_secs(self.probe_cache_secs),
            ))
        } else {
            Box::new(probe)
        }
    }
}

fn parse_or<T, F>(lookup: &F, name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(e) => {
                warn!("⚠️ 配置项 {} 无法解析 ('{}'): {}，使用默认值", name, raw, e);
                default
            }
        },
    }
}
