//! # Interview Coach
//!
//! 模拟算法面试的会话核心：选题、澄清、暴力解法、优化、编码、评审。
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有 HTTP 连接池，只暴露能力
//! - `HttpExecutor` - 唯一的 reqwest::Client owner，负责认证头、状态码、JSON 解码
//!
//! ### ② 客户端层（Clients）
//! - `clients/` - 描述"远端能做什么"，每个方法对应一个接口
//! - `InterviewApi` - 面试服务接口（可替换为测试替身）
//! - `InterviewClient` - 基于 HTTP 的实现
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次会话"的状态和规则
//! - `Session` - 会话聚合（各阶段槽位、代码、评审请求状态）
//! - `StageNavigator` - 已解锁阶段集合与切换
//! - `TimerController` - 倒计时
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/session_orchestrator` - 请求生命周期与过期响应丢弃
//! - `orchestrator/runtime` - 事件循环，对外发布 `SessionView`
//!
//! ## 模块结构

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use auth::{Anonymous, AuthGate, SharedToken, StaticToken};
pub use clients::{InterviewApi, InterviewClient};
pub use config::{Config, ResponseOrdering};
pub use error::{ApiError, AppError, AppResult, ValidationError};
pub use models::{Complexity, FeedbackStage, Language, Question, Review, Stage};
pub use orchestrator::{Command, RuntimeHandle, SessionOrchestrator, SessionRuntime, SessionView};
pub use workflow::{Session, SessionCtx, StageNavigator, TimerController};
