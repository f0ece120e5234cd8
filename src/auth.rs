//! 认证边界
//!
//! 登录/注册（含验证码）由外部协作方负责，这里只消费一个不透明的 bearer token。
//! token 过期或无效不在这里处理，请求会以网络错误的形式失败。

use std::sync::{Arc, PoisonError, RwLock};

/// 提供当前 bearer token
pub trait AuthGate: Send + Sync {
    fn current_token(&self) -> Option<String>;
}

/// 匿名访问，从不携带 token
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl AuthGate for Anonymous {
    fn current_token(&self) -> Option<String> {
        None
    }
}

/// 固定 token（通常来自配置）
#[derive(Debug, Clone, Default)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    pub fn new(token: Option<String>) -> Self {
        Self(token.filter(|t| !t.trim().is_empty()))
    }
}

impl AuthGate for StaticToken {
    fn current_token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// 可在运行期更新的 token，登录流程登录/登出时写入
#[derive(Debug, Clone, Default)]
pub struct SharedToken {
    inner: Arc<RwLock<Option<String>>>,
}

impl SharedToken {
    pub fn new() -> Self {
        Self::default()
    }

    // 锁中毒时仍然写入，保证登录/登出不会被静默丢弃
    pub fn set(&self, token: impl Into<String>) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(token.into());
    }

    pub fn clear(&self) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl AuthGate for SharedToken {
    fn current_token(&self) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
