//! HTTP 执行器 - 基础设施层
//!
//! 持有唯一的 HTTP 客户端资源，只暴露"发送 JSON 请求"的能力

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::config::Config;
use crate::error::ApiError;

/// HTTP 执行器
///
/// 职责：
/// - 持有唯一的 reqwest Client
/// - 有 token 时附加 `Authorization: Bearer <token>`，没有时不带该头
/// - 把非 2xx 响应和解析失败统一转换为 [`ApiError`]
/// - 不认识 Question / Session
/// - 不自动重试
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: Client,
    base_url: String,
}

impl HttpExecutor {
    /// 创建新的 HTTP 执行器
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|source| ApiError::ClientBuild { source })?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 发送 GET 请求并反序列化响应
    pub async fn get_json<R: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<R, ApiError> {
        let request = self.client.get(self.url(path));
        self.execute(path, request, token).await
    }

    /// 发送 POST 请求（JSON 请求体）并反序列化响应
    pub async fn post_json<B, R>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = self.client.post(self.url(path)).json(body);
        self.execute(path, request, token).await
    }

    async fn execute<R: DeserializeOwned>(
        &self,
        path: &str,
        request: RequestBuilder,
        token: Option<&str>,
    ) -> Result<R, ApiError> {
        let request = match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        debug!("请求 {}{} (token: {})", self.base_url, path, token.is_some());

        let response = request
            .send()
            .await
            .map_err(|source| ApiError::RequestFailed {
                endpoint: path.to_string(),
                source,
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| ApiError::RequestFailed {
                endpoint: path.to_string(),
                source,
            })?;

        if !status.is_success() {
            debug!("{} 返回 {}", path, status);
            return Err(ApiError::BadStatus {
                endpoint: path.to_string(),
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        serde_json::from_slice(&body).map_err(|source| ApiError::JsonParseFailed {
            endpoint: path.to_string(),
            source,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// 从错误响应体中提取可读信息
///
/// 兼容 `{"detail": "..."}`、`{"detail": {"message": ...}}` 和 `{"error": ..., "message": ...}`
pub fn error_message(body: &[u8]) -> Option<String> {
    let value: JsonValue = serde_json::from_slice(body).ok()?;

    fn pick(value: &JsonValue) -> Option<String> {
        match value {
            JsonValue::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            JsonValue::Object(map) => ["message", "error", "detail"]
                .iter()
                .find_map(|key| map.get(*key).and_then(pick)),
            // 参数校验失败时 detail 是数组，取第一条的 msg
            JsonValue::Array(items) => items
                .first()
                .and_then(|item| item.get("msg").or(Some(item)))
                .and_then(pick),
            _ => None,
        }
    }

    match value.get("detail") {
        Some(detail) => pick(detail),
        None => pick(&value),
    }
}
