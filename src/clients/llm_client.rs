/// LLM API 客户端
///
/// 封装所有与生成式模型 API 相关的调用逻辑。
/// 凭证不持有在客户端内：每次调用由上层传入本次抽中的 key，
/// 失败不重试，换 key 只发生在下一次独立调用。
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::LlmError;

/// LLM 客户端
pub struct LlmClient {
    api_base_url: String,
    model_name: String,
    temperature: f32,
}

impl LlmClient {
    /// 创建新的 LLM 客户端
    pub fn new(config: &Config) -> Self {
        Self {
            api_base_url: config.llm_api_base_url.clone(),
            model_name: config.llm_model_name.clone(),
            temperature: config.llm_temperature,
        }
    }

    /// 发送生成请求，要求模型以 JSON 格式回复
    ///
    /// # 参数
    /// - `api_key`: 本次调用使用的凭证（由上层从凭证池抽取）
    /// - `prompt`: 完整的用户提示词
    ///
    /// # 返回
    /// 返回模型回复的原始文本（期望是一个 JSON 数组）
    pub async fn generate_json(&self, api_key: &str, prompt: &str) -> Result<String, LlmError> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("提示词长度: {} 字符", prompt.chars().count());

        // 每次调用用抽中的 key 构建一个客户端
        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(&self.api_base_url);

        let client = Client::with_config(openai_config);

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| LlmError::InvalidRequest {
                detail: e.to_string(),
            })?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![ChatCompletionRequestMessage::User(user_msg)])
            .response_format(ResponseFormat::JsonObject)
            .temperature(self.temperature)
            .build()
            .map_err(|e| LlmError::InvalidRequest {
                detail: e.to_string(),
            })?;

        // 调用 API（单次往返，无流式、无多轮状态）
        let response = client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            classify_provider_error(&e.to_string())
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| LlmError::EmptyContent {
                model: self.model_name.clone(),
            })?;

        Ok(content.trim().to_string())
    }

    /// 当前配置的模型名称
    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// 把服务端错误文本归一化为固定分类
///
/// 与原始实现保持一致：对错误消息做子串匹配，
/// 不区分传输层/SDK 层的具体错误类型。
pub fn classify_provider_error(message: &str) -> LlmError {
    let lower = message.to_lowercase();

    if lower.contains("400") || lower.contains("invalid_argument") {
        return LlmError::InvalidRequest {
            detail: message.to_string(),
        };
    }
    if lower.contains("403") || lower.contains("permission_denied") || lower.contains("key") {
        return LlmError::AuthRejected {
            detail: message.to_string(),
        };
    }
    if lower.contains("429") || lower.contains("resource_exhausted") {
        return LlmError::QuotaExhausted {
            detail: message.to_string(),
        };
    }
    if lower.contains("500") || lower.contains("internal") {
        return LlmError::ProviderInternal {
            detail: message.to_string(),
        };
    }
    if lower.contains("connect") || lower.contains("network") || lower.contains("timed out") {
        return LlmError::Transport {
            detail: message.to_string(),
        };
    }

    // 未知错误按传输错误兜底处理
    LlmError::Transport {
        detail: message.to_string(),
    }
}
