//! 面试倒计时
//!
//! 倒计时本身是纯状态；可选地挂一个 tokio 任务，每秒往通道里发一个 [`TimerTick`]，
//! 由事件循环调用 [`TimerController::on_tick`] 扣减。

use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// 计时器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// 未开始（或已重置）
    Idle,
    /// 正在倒计时
    Running,
    /// 已手动停止（评审完成）
    Stopped,
    /// 时间耗尽，直到 reset 前不再变化
    Expired,
}

/// 由后台任务发出的一次滴答
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTick {
    pub generation: u64,
}

/// 一次滴答的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// 计时器不在运行，或滴答来自已取消的任务
    Ignored,
    Ticked { remaining: u64 },
    /// 本次滴答把剩余时间扣到 0；每轮只会出现一次
    Expired,
}

/// 计时器快照（给界面用）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSnapshot {
    pub budget_secs: u64,
    pub remaining_secs: u64,
    pub state: TimerState,
}

impl TimerSnapshot {
    pub fn is_active(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn is_expired(&self) -> bool {
        self.state == TimerState::Expired
    }
}

/// 倒计时控制器
///
/// 任意时刻最多只有一个后台滴答任务：重复 start 不会再开新任务，
/// reset / 过期 / stop / drop 都会取消任务。
pub struct TimerController {
    budget_secs: u64,
    remaining_secs: u64,
    state: TimerState,
    generation: u64,
    sink: Option<UnboundedSender<TimerTick>>,
    ticker: Option<JoinHandle<()>>,
}

impl TimerController {
    /// 无后台任务的计时器，需要手动调用 [`tick`](Self::tick)
    pub fn new(budget: Duration) -> Self {
        Self {
            budget_secs: budget.as_secs(),
            remaining_secs: budget.as_secs(),
            state: TimerState::Idle,
            generation: 0,
            sink: None,
            ticker: None,
        }
    }

    /// 带后台滴答任务的计时器（需要在 tokio 运行时内 start）
    pub fn with_ticker(budget: Duration, sink: UnboundedSender<TimerTick>) -> Self {
        let mut timer = Self::new(budget);
        timer.sink = Some(sink);
        timer
    }

    /// 开始倒计时
    ///
    /// 只在 Idle 状态下生效；运行中、已停止、已过期时调用都是空操作。
    /// 返回是否真正开始。
    pub fn start(&mut self, duration: Duration) -> bool {
        if self.state != TimerState::Idle {
            debug!("计时器已处于 {:?}，忽略 start", self.state);
            return false;
        }

        self.remaining_secs = duration.as_secs();
        if self.remaining_secs == 0 {
            self.state = TimerState::Expired;
            return true;
        }

        self.state = TimerState::Running;
        self.generation += 1;
        self.spawn_ticker();
        info!("⏱️ 计时开始: {} 秒", self.remaining_secs);
        true
    }

    /// 以配置的完整时长开始
    pub fn start_full(&mut self) -> bool {
        self.start(Duration::from_secs(self.budget_secs))
    }

    /// 扣减一秒
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != TimerState::Running {
            return TickOutcome::Ignored;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.state = TimerState::Expired;
            self.cancel_ticker();
            info!("⏰ 面试时间已到");
            TickOutcome::Expired
        } else {
            TickOutcome::Ticked {
                remaining: self.remaining_secs,
            }
        }
    }

    /// 处理后台任务发来的滴答，来自旧任务的滴答直接忽略
    pub fn on_tick(&mut self, tick: TimerTick) -> TickOutcome {
        if tick.generation != self.generation {
            return TickOutcome::Ignored;
        }
        self.tick()
    }

    /// 停止倒计时（保留剩余时间，不算过期）
    pub fn stop(&mut self) {
        if self.state == TimerState::Running {
            self.state = TimerState::Stopped;
            self.cancel_ticker();
            info!("⏹️ 计时停止，剩余 {} 秒", self.remaining_secs);
        }
    }

    /// 取消滴答并恢复到完整时长、未开始、未过期
    pub fn reset(&mut self) {
        self.cancel_ticker();
        self.generation += 1;
        self.remaining_secs = self.budget_secs;
        self.state = TimerState::Idle;
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            budget_secs: self.budget_secs,
            remaining_secs: self.remaining_secs,
            state: self.state,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn budget_secs(&self) -> u64 {
        self.budget_secs
    }

    pub fn is_expired(&self) -> bool {
        self.state == TimerState::Expired
    }

    /// 是否有后台滴答任务在跑
    pub fn has_ticker(&self) -> bool {
        self.ticker
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    fn spawn_ticker(&mut self) {
        let Some(sink) = self.sink.clone() else {
            return;
        };
        self.cancel_ticker();

        let generation = self.generation;
        self.ticker = Some(tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if sink.send(TimerTick { generation }).is_err() {
                    break;
                }
            }
        }));
    }

    fn cancel_ticker(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }
}

impl Drop for TimerController {
    fn drop(&mut self) {
        self.cancel_ticker();
    }
}

impl std::fmt::Debug for TimerController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerController")
            .field("budget_secs", &self.budget_secs)
            .field("remaining_secs", &self.remaining_secs)
            .field("state", &self.state)
            .field("generation", &self.generation)
            .field("ticking", &self.ticker.is_some())
            .finish()
    }
}
