//! 会话日志上下文
//!
//! 封装"这是第几轮会话、在做哪道题"这一信息，只用于日志前缀

use std::fmt::Display;

use crate::models::QuestionId;

/// 会话上下文
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionCtx {
    /// 会话轮次（每次 restart 递增）
    pub epoch: u64,

    /// 当前题目，未选题时为空
    pub question_id: Option<QuestionId>,
}

impl SessionCtx {
    pub fn new(epoch: u64, question_id: Option<QuestionId>) -> Self {
        Self { epoch, question_id }
    }
}

impl Display for SessionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.question_id {
            Some(id) => write!(f, "[会话 #{} 题目#{}]", self.epoch, id),
            None => write!(f, "[会话 #{}]", self.epoch),
        }
    }
}
