use thiserror::Error;

use crate::models::Stage;

/// 应用程序错误类型
///
/// 所有错误都是局部、可恢复的：界面在触发它的控件旁边显示文本，用户重试即可
#[derive(Debug, Error)]
pub enum AppError {
    /// 网络请求失败（请求被拒绝或非 2xx 状态）
    #[error("网络错误: {0}")]
    Network(#[from] ApiError),
    /// 本地校验失败，请求不会发出
    #[error("校验错误: {0}")]
    Validation(#[from] ValidationError),
    /// 阶段切换被拒绝
    #[error("导航错误: {0}")]
    Navigation(#[from] NavigationError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 无法构建 HTTP 客户端
    #[error("无法构建 HTTP 客户端: {source}")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// API 返回错误响应
    #[error("API返回错误响应 ({endpoint}): status={status}, message={message:?}")]
    BadStatus {
        endpoint: String,
        status: u16,
        message: Option<String>,
    },
    /// JSON 解析失败
    #[error("JSON解析失败 ({endpoint}): {source}")]
    JsonParseFailed {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    /// API 返回空结果
    #[error("API返回空结果: {endpoint}")]
    EmptyResponse { endpoint: String },
}

impl ApiError {
    /// 适合直接显示在控件旁边的简短文本
    pub fn inline_message(&self) -> String {
        match self {
            ApiError::BadStatus {
                message: Some(message),
                ..
            } => message.clone(),
            ApiError::BadStatus { status, .. } => format!("请求失败 (HTTP {})", status),
            ApiError::EmptyResponse { .. } => "服务返回了空内容，请重试".to_string(),
            other => other.to_string(),
        }
    }

    /// 出错的接口路径
    pub fn endpoint(&self) -> &str {
        match self {
            ApiError::ClientBuild { .. } => "",
            ApiError::RequestFailed { endpoint, .. }
            | ApiError::BadStatus { endpoint, .. }
            | ApiError::JsonParseFailed { endpoint, .. }
            | ApiError::EmptyResponse { endpoint } => endpoint,
        }
    }
}

/// 本地校验错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// 澄清、暴力解法、代码三项全部为空
    #[error("请至少填写澄清、暴力解法或代码中的一项再提交评审")]
    EmptyReviewInputs,
    /// 阶段输入为空
    #[error("{stage} 阶段的输入不能为空")]
    EmptyStageInput { stage: Stage },
    /// 输入超长
    #[error("{field} 长度 {len} 超过上限 {max}")]
    InputTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
    /// 尚未选择题目
    #[error("尚未开始会话，请先选择题目")]
    NoActiveSession,
}

/// 阶段导航错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// 阶段尚未解锁
    #[error("{stage} 阶段尚未解锁")]
    Locked { stage: Stage },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置文件读取失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 是否为本地校验错误（校验错误不会产生任何网络请求）
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }

    /// 适合直接显示在控件旁边的简短文本
    pub fn inline_message(&self) -> String {
        match self {
            AppError::Network(e) => e.inline_message(),
            AppError::Validation(e) => e.to_string(),
            AppError::Navigation(e) => e.to_string(),
            AppError::Config(e) => e.to_string(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
