//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 持有会话身份和全部会话状态，是唯一会修改状态的地方。
//!
//! ## 模块划分
//!
//! ### `session_orchestrator` - 会话编排器
//! - 选题、各阶段提交、切换语言、运行代码、评审
//! - 每个请求拆成 dispatch / send / apply 三步
//! - 按轮次和序号丢弃过期响应
//! - restart 清空本轮全部状态
//!
//! ### `runtime` - 会话运行时
//! - 把编排器放进独立任务，用一个事件循环串行处理命令、请求完成、计时滴答
//! - 通过 `watch` 通道对外发布 [`SessionView`]
//!
//! ## 层次关系
//!
//! ```text
//! runtime (事件循环)
//!     ↓
//! session_orchestrator (会话状态)
//!     ↓
//! workflow (Session / StageNavigator / TimerController)
//!     ↓
//! clients (InterviewApi)
//!     ↓
//! infrastructure (HttpExecutor)
//! ```

pub mod runtime;
pub mod session_orchestrator;
pub mod view;

pub use runtime::{Command, RuntimeHandle, SessionRuntime};
pub use session_orchestrator::{
    ApiCall, ApplyOutcome, Outcome, SessionOrchestrator, Settled, Ticket, MAX_CODE_LEN,
};
pub use view::SessionView;
