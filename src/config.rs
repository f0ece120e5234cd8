use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

use crate::error::ConfigError;
use crate::models::Language;

/// 同一阶段多次提交时，哪个响应生效
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseOrdering {
    /// 只接受最近一次发出的请求的响应，较早的响应直接丢弃
    #[default]
    LatestDispatch,
    /// 谁最后返回谁生效（旧行为）
    LastSettled,
}

impl std::str::FromStr for ResponseOrdering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latest_dispatch" => Ok(ResponseOrdering::LatestDispatch),
            "last_settled" => Ok(ResponseOrdering::LastSettled),
            other => Err(format!("未知的响应顺序策略: {}", other)),
        }
    }
}

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 反馈服务地址
    pub api_base_url: String,
    /// 面试时长（秒）
    pub time_budget_secs: u64,
    /// 默认编程语言
    pub default_language: Language,
    /// 单个请求超时（秒）
    pub request_timeout_secs: u64,
    /// 同一阶段重复提交时的响应策略
    pub response_ordering: ResponseOrdering,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 日志过滤规则（RUST_LOG 优先）
    pub log_filter: String,
    // --- 认证 ---
    /// 登录后拿到的 bearer token，匿名访问时为空
    pub auth_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            time_budget_secs: 45 * 60,
            default_language: Language::Python,
            request_timeout_secs: 30,
            response_ordering: ResponseOrdering::LatestDispatch,
            verbose_logging: false,
            log_filter: "info".to_string(),
            auth_token: None,
        }
    }
}

impl Config {
    /// 默认值 → 配置文件（INTERVIEW_CONFIG）→ 环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var("INTERVIEW_CONFIG") {
            Ok(path) if !path.trim().is_empty() => Self::from_file(Path::new(&path))?,
            _ => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    /// 从 TOML 文件加载，缺省字段使用默认值
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn with_env_overrides(self) -> Self {
        Self {
            api_base_url: std::env::var("INTERVIEW_API_BASE_URL").unwrap_or(self.api_base_url),
            time_budget_secs: env_parse("INTERVIEW_TIME_BUDGET_SECS", "u64")
                .unwrap_or(self.time_budget_secs),
            default_language: env_parse("INTERVIEW_LANGUAGE", "Language")
                .unwrap_or(self.default_language),
            request_timeout_secs: env_parse("INTERVIEW_REQUEST_TIMEOUT_SECS", "u64")
                .unwrap_or(self.request_timeout_secs),
            response_ordering: env_parse("INTERVIEW_RESPONSE_ORDERING", "ResponseOrdering")
                .unwrap_or(self.response_ordering),
            verbose_logging: env_parse("VERBOSE_LOGGING", "bool").unwrap_or(self.verbose_logging),
            log_filter: std::env::var("LOG_FILTER").unwrap_or(self.log_filter),
            auth_token: std::env::var("INTERVIEW_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty())
                .or(self.auth_token),
        }
    }

    pub fn time_budget(&self) -> Duration {
        Duration::from_secs(self.time_budget_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// 解析失败时记录告警并回退到下一层配置
fn env_parse<T: std::str::FromStr>(var_name: &str, expected_type: &str) -> Option<T> {
    let value = std::env::var(var_name).ok()?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            let err = ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            };
            warn!("⚠️ {}，使用默认值", err);
            None
        }
    }
}
