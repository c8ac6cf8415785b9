//! 远程求解客户端 - 基础设施层
//!
//! 只负责把一个题目发给兼容 OpenAI 的 chat-completions 端点并取回文本，
//! 不关心分类、模式选择或回退
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 构建请求并调用 API
//! - 请求头 `Authorization: Bearer <key>` 与 `Content-Type: application/json` 由客户端设置

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
    },
    Client,
};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::RemoteError;
use crate::models::SolverConfig;

/// 未配置端点时使用的默认端点
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
/// 未配置模型时使用的默认模型
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
/// 默认请求超时（秒）
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const PROMPT_PREFIX: &str = "Solve the following math problem: ";
const MAX_TOKENS: u32 = 100;
const TEMPERATURE: f32 = 0.7;
const COMPLETIONS_PATH: &str = "/chat/completions";

/// 一次远程求解请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRequest {
    /// 完整的 chat-completions 端点
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    /// 发送给模型的完整用户消息
    pub prompt: String,
}

impl RemoteRequest {
    /// 根据题目正文和调用方配置构建请求，空的端点和模型使用默认值
    pub fn new(problem: &str, config: &SolverConfig) -> Self {
        let endpoint = if config.remote_endpoint.trim().is_empty() {
            DEFAULT_ENDPOINT.to_string()
        } else {
            config.remote_endpoint.trim().to_string()
        };
        let model = if config.remote_model.trim().is_empty() {
            DEFAULT_MODEL.to_string()
        } else {
            config.remote_model.trim().to_string()
        };

        Self {
            endpoint,
            api_key: config.remote_key.clone(),
            model,
            prompt: format!("{PROMPT_PREFIX}{problem}"),
        }
    }

    /// `async-openai` 需要的 API base（去掉 `/chat/completions` 后缀）
    pub fn api_base(&self) -> &str {
        let endpoint = self.endpoint.trim_end_matches('/');
        endpoint
            .strip_suffix(COMPLETIONS_PATH)
            .unwrap_or(endpoint)
    }

    /// 构建 chat-completions 请求体
    pub fn to_chat_request(&self) -> Result<CreateChatCompletionRequest, RemoteError> {
        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(self.prompt.as_str())
            .build()
            .map_err(|e| RemoteError::BuildRequest {
                source: Box::new(e),
            })?;

        CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![ChatCompletionRequestMessage::User(user_msg)])
            .temperature(TEMPERATURE)
            .max_tokens(MAX_TOKENS)
            .build()
            .map_err(|e| RemoteError::BuildRequest {
                source: Box::new(e),
            })
    }
}

/// 远程求解能力
///
/// 返回的 future 必须是 `Send`，以便在多线程运行时上并发求解
pub trait RemoteClient: Send + Sync {
    fn solve(
        &self,
        request: RemoteRequest,
    ) -> impl Future<Output = Result<String, RemoteError>> + Send;
}

/// 基于 `async-openai` 的远程客户端
#[derive(Debug, Clone)]
pub struct OpenAiRemoteClient {
    timeout: Duration,
}

impl Default for OpenAiRemoteClient {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

impl OpenAiRemoteClient {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl RemoteClient for OpenAiRemoteClient {
    fn solve(
        &self,
        request: RemoteRequest,
    ) -> impl Future<Output = Result<String, RemoteError>> + Send {
        let timeout = self.timeout;
        async move {
            debug!("调用远程求解，端点: {}, 模型: {}", request.endpoint, request.model);

            let chat_request = request.to_chat_request()?;

            // 每次请求使用调用方提供的端点和密钥
            let openai_config = OpenAIConfig::new()
                .with_api_key(&request.api_key)
                .with_api_base(request.api_base());
            let client = Client::with_config(openai_config);

            let response = tokio::time::timeout(timeout, client.chat().create(chat_request))
                .await
                .map_err(|_| {
                    warn!("远程求解超时: {}", request.endpoint);
                    RemoteError::Timeout {
                        endpoint: request.endpoint.clone(),
                        secs: timeout.as_secs(),
                    }
                })?
                .map_err(|e| {
                    warn!("远程 API 调用失败: {}", e);
                    RemoteError::request_failed(&request.endpoint, e)
                })?;

            let choice = response.choices.first().ok_or_else(|| RemoteError::NoChoices {
                endpoint: request.endpoint.clone(),
            })?;

            let content = choice
                .message
                .content
                .as_deref()
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .ok_or_else(|| RemoteError::EmptyContent {
                    model: request.model.clone(),
                })?;

            debug!("远程求解成功，响应长度: {} 字符", content.len());
            Ok(content.to_string())
        }
    }
}
