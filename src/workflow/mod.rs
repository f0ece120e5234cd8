pub mod navigator;
pub mod session;
pub mod session_ctx;
pub mod timer;

pub use navigator::{StageNavigator, StageTransition};
pub use session::{CodeState, ReviewState, Session, StageFeedback, StageState};
pub use session_ctx::SessionCtx;
pub use timer::{TickOutcome, TimerController, TimerSnapshot, TimerState, TimerTick};
