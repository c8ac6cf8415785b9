use thiserror::Error;

/// 应用程序错误类型
///
/// 求解本身不返回错误（远程和本地失败都折叠进 `SolveOutcome`），
/// 这里只有文件读写和配置取值两类
#[derive(Debug, Error)]
pub enum AppError {
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 远程求解错误
///
/// 这些错误的文本会被附加到求解结果中展示给用户，因此使用英文
#[derive(Debug, Error)]
pub enum RemoteError {
    /// 构建请求失败
    #[error("could not build request: {source}")]
    BuildRequest {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 网络请求或 API 调用失败（连接、认证、JSON 解析）
    #[error("request to {endpoint} failed: {source}")]
    RequestFailed {
        endpoint: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 请求超时
    #[error("request to {endpoint} timed out after {secs}s")]
    Timeout { endpoint: String, secs: u64 },
    /// `choices` 为空
    #[error("no solution found")]
    NoChoices { endpoint: String },
    /// 第一个 choice 没有内容
    #[error("response from model {model} has no content")]
    EmptyContent { model: String },
    /// 网络不可达，未发起请求
    #[error("network unreachable")]
    Unreachable,
}

/// 本地求值错误
///
/// `Display` 文本会原样作为失败结果返回给调用方
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// 表达式解析失败
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },
    /// 除以零
    #[error("Division by zero")]
    DivisionByZero,
    /// 阶乘参数不是非负整数
    #[error("Factorial is only defined for non-negative integers, got {value}")]
    InvalidFactorial { value: String },
    /// 结果溢出或不是有限数
    #[error("Result is not a finite number")]
    NonFinite,
    /// 当前求值器不支持的结构
    #[error("{reason}")]
    Unsupported { reason: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        source: std::io::Error,
    },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        source: std::io::Error,
    },
}

/// 配置错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// 取值无法解析
    #[error("{name} 的值 '{value}' 无效，可选值: {expected}")]
    InvalidValue {
        name: String,
        value: String,
        expected: String,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }
}

impl RemoteError {
    /// 创建 API 调用失败错误
    pub fn request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        RemoteError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        }
    }
}

impl EvalError {
    pub fn unsupported(reason: impl Into<String>) -> Self {
        EvalError::Unsupported {
            reason: reason.into(),
        }
    }

    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        EvalError::Parse {
            position,
            message: message.into(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
