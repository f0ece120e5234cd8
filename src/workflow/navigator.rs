//! 阶段导航
//!
//! 不是严格的线性状态机：会话开始后，所有已解锁阶段之间可以任意前后跳转。

use std::collections::BTreeSet;

use crate::error::NavigationError;
use crate::models::Stage;

/// 一次阶段切换
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTransition {
    pub from: Stage,
    pub to: Stage,
    /// 题目 → 澄清 时开始计时
    pub starts_timer: bool,
}

/// 阶段导航器
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageNavigator {
    active: Stage,
    unlocked: BTreeSet<Stage>,
}

impl StageNavigator {
    pub fn new() -> Self {
        Self {
            active: Stage::Question,
            unlocked: BTreeSet::from([Stage::Question]),
        }
    }

    pub fn active(&self) -> Stage {
        self.active
    }

    pub fn unlocked(&self) -> &BTreeSet<Stage> {
        &self.unlocked
    }

    pub fn is_unlocked(&self, stage: Stage) -> bool {
        self.unlocked.contains(&stage)
    }

    /// 会话开始：解锁全部阶段
    ///
    /// 评审阶段在评审结果到达前也可进入，只是没有内容
    pub fn open_session(&mut self) {
        self.unlocked.extend(Stage::ALL);
    }

    /// 评审结果已到：切换到评审阶段
    pub fn enter_review(&mut self) -> StageTransition {
        self.unlocked.insert(Stage::Review);
        let from = self.active;
        self.active = Stage::Review;
        StageTransition {
            from,
            to: Stage::Review,
            starts_timer: false,
        }
    }

    /// 切换到指定阶段
    pub fn select(&mut self, stage: Stage) -> Result<StageTransition, NavigationError> {
        if !self.is_unlocked(stage) {
            return Err(NavigationError::Locked { stage });
        }

        let from = self.active;
        self.active = stage;
        Ok(StageTransition {
            from,
            to: stage,
            starts_timer: from == Stage::Question && stage == Stage::Clarify,
        })
    }

    /// 回到初始状态：只有题目阶段可用
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for StageNavigator {
    fn default() -> Self {
        Self::new()
    }
}
