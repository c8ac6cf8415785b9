use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 题目难度类别
///
/// 每个输入恰好对应一个类别，由 `services::classifier::classify` 决定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemComplexity {
    /// 纯四则运算
    SimpleArithmetic,
    /// 需要从自然语言中提取数字的应用题
    WordProblem,
    /// 组合、图论、逻辑
    DiscreteMath,
    /// 极限、连续性、数列
    RealAnalysis,
    /// 积分、求导、化简
    SymbolicComputation,
}

impl ProblemComplexity {
    /// 全部类别（按声明顺序）
    pub const ALL: [ProblemComplexity; 5] = [
        ProblemComplexity::SimpleArithmetic,
        ProblemComplexity::WordProblem,
        ProblemComplexity::DiscreteMath,
        ProblemComplexity::RealAnalysis,
        ProblemComplexity::SymbolicComputation,
    ];

    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            ProblemComplexity::SimpleArithmetic => "simple_arithmetic",
            ProblemComplexity::WordProblem => "word_problem",
            ProblemComplexity::DiscreteMath => "discrete_math",
            ProblemComplexity::RealAnalysis => "real_analysis",
            ProblemComplexity::SymbolicComputation => "symbolic_computation",
        }
    }

    /// 是否属于值得调用远程 API 的"难题"类别
    pub fn is_hard(self) -> bool {
        matches!(
            self,
            ProblemComplexity::DiscreteMath
                | ProblemComplexity::RealAnalysis
                | ProblemComplexity::SymbolicComputation
        )
    }
}

impl std::fmt::Display for ProblemComplexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 求解模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverMode {
    /// 本地求值（离线）
    #[default]
    Local,
    /// 远程 chat-completion API（在线）
    Remote,
}

impl SolverMode {
    pub fn name(self) -> &'static str {
        match self {
            SolverMode::Local => "local",
            SolverMode::Remote => "remote",
        }
    }
}

impl std::fmt::Display for SolverMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for SolverMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "offline" => Ok(SolverMode::Local),
            "remote" | "online" => Ok(SolverMode::Remote),
            _ => Err(ConfigError::InvalidValue {
                name: "SOLVER_MODE".to_string(),
                value: s.to_string(),
                expected: "local | remote".to_string(),
            }),
        }
    }
}

/// 题目输入类型（对应三种输入入口）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProblemKind {
    /// 直接输入的表达式，如 `Integrate[Sin[x], x]`
    Expression,
    /// 证明请求
    Proof,
    /// 应用题
    #[default]
    #[serde(alias = "word_problem")]
    Word,
}

impl ProblemKind {
    pub fn name(self) -> &'static str {
        match self {
            ProblemKind::Expression => "expression",
            ProblemKind::Proof => "proof",
            ProblemKind::Word => "word",
        }
    }

    /// 本地求值成功时的结果前缀
    pub fn report_label(self) -> &'static str {
        match self {
            ProblemKind::Expression => "Result",
            ProblemKind::Proof => "Proof result",
            ProblemKind::Word => "Solution",
        }
    }
}

impl std::fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ProblemKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "expression" | "expr" => Ok(ProblemKind::Expression),
            "proof" | "prove" => Ok(ProblemKind::Proof),
            "word" | "word_problem" => Ok(ProblemKind::Word),
            _ => Err(ConfigError::InvalidValue {
                name: "kind".to_string(),
                value: s.to_string(),
                expected: "expression | proof | word".to_string(),
            }),
        }
    }
}

/// 单次求解请求的配置
///
/// 由调用方提供，核心逻辑只读不改
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    /// 调用方期望的模式
    pub mode: SolverMode,
    /// 远程端点，为空时使用默认端点
    pub remote_endpoint: String,
    /// 远程 API 密钥
    pub remote_key: String,
    /// 是否允许按难度自动升级为远程模式
    pub auto_remote: bool,
    /// 远程请求使用的模型
    pub remote_model: String,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            mode: SolverMode::Local,
            remote_endpoint: String::new(),
            remote_key: String::new(),
            auto_remote: true,
            remote_model: String::new(),
        }
    }
}

impl SolverConfig {
    /// 仅本地求值，不自动升级
    pub fn local() -> Self {
        Self {
            auto_remote: false,
            ..Self::default()
        }
    }

    /// 调用方明确要求远程求解
    pub fn remote(endpoint: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            mode: SolverMode::Remote,
            remote_endpoint: endpoint.into(),
            remote_key: key.into(),
            ..Self::default()
        }
    }

    pub fn with_auto_remote(mut self, auto_remote: bool) -> Self {
        self.auto_remote = auto_remote;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.remote_model = model.into();
        self
    }
}

/// 一次求解的对外结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolveOutcome {
    pub succeeded: bool,
    pub text: String,
    /// 实际产出结果的模式（回退后可能与请求的不同）
    pub mode_used: SolverMode,
}

impl SolveOutcome {
    pub fn success(text: impl Into<String>, mode_used: SolverMode) -> Self {
        Self {
            succeeded: true,
            text: text.into(),
            mode_used,
        }
    }

    pub fn failure(text: impl Into<String>, mode_used: SolverMode) -> Self {
        Self {
            succeeded: false,
            text: text.into(),
            mode_used,
        }
    }
}
