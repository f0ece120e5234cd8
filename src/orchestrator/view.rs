//! 展示层快照

use crate::models::{FeedbackStage, Language, Question, QuestionSummary, Review, Stage};
use crate::workflow::{Session, StageFeedback, TimerSnapshot};

/// 某一时刻的完整会话状态，只读
#[derive(Debug, Clone)]
pub struct SessionView {
    pub epoch: u64,
    pub active_stage: Stage,
    pub unlocked: Vec<Stage>,
    pub questions: Vec<QuestionSummary>,
    pub questions_loading: bool,
    pub questions_error: Option<String>,
    pub question: Option<Question>,
    pub question_loading: bool,
    pub question_error: Option<String>,
    pub language: Language,
    pub session: Option<Session>,
    pub review: Option<Review>,
    pub timer: TimerSnapshot,
    /// 最近一次命令被拒绝或请求失败的提示
    pub notice: Option<String>,
}

impl SessionView {
    pub fn feedback(&self, stage: FeedbackStage) -> Option<&StageFeedback> {
        self.session.as_ref().map(|s| &s.stage(stage).feedback)
    }

    pub fn is_unlocked(&self, stage: Stage) -> bool {
        self.unlocked.contains(&stage)
    }

    /// 是否还有请求在路上
    pub fn is_busy(&self) -> bool {
        if self.questions_loading || self.question_loading {
            return true;
        }
        self.session.as_ref().is_some_and(|session| {
            FeedbackStage::ALL
                .iter()
                .any(|stage| session.stage(*stage).feedback.loading)
                || session.code.skeleton_loading
                || session.code.running()
                || session.review.loading
        })
    }
}
