//! 会话聚合
//!
//! 一个 [`Session`] 绑定一道题，从选题开始到 restart 结束。
//! 每个阶段槽位都通过纯函数（`dispatched` / `settled`）生成新值后整体替换，
//! 不做逐字段修改。

use chrono::{DateTime, Local};
use std::time::Duration;

use crate::config::ResponseOrdering;
use crate::models::{Complexity, FeedbackStage, Language, QuestionId};

/// 阶段反馈
///
/// `shown` 只会在成功响应生效后为 true，加载中永远为 false
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageFeedback {
    pub text: String,
    pub loading: bool,
    pub shown: bool,
}

impl StageFeedback {
    /// shown 蕴含 未加载 且 文本非空
    pub fn is_consistent(&self) -> bool {
        !self.shown || (!self.loading && !self.text.trim().is_empty())
    }
}

/// 一个反馈阶段的全部状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageState {
    pub input: String,
    pub complexity: Complexity,
    pub feedback: StageFeedback,
    /// 最近一次失败的提示，下次提交时清空
    pub error: Option<String>,
    latest_seq: u64,
}

impl StageState {
    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    /// 用户编辑输入，不发请求
    pub fn edited(&self, input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            ..self.clone()
        }
    }

    pub fn with_complexity(&self, complexity: Complexity) -> Self {
        Self {
            complexity,
            ..self.clone()
        }
    }

    /// 本地校验未通过：保留输入，记录提示，不进入加载中
    pub fn rejected(&self, input: impl Into<String>, message: String) -> Self {
        Self {
            input: input.into(),
            error: Some(message),
            ..self.clone()
        }
    }

    /// 请求已发出：记录输入，进入加载中
    pub fn dispatched(&self, input: String, complexity: Complexity, seq: u64) -> Self {
        Self {
            input,
            complexity,
            feedback: StageFeedback {
                text: self.feedback.text.clone(),
                loading: true,
                shown: false,
            },
            error: None,
            latest_seq: seq,
        }
    }

    /// 响应返回；返回 `None` 表示这是过期响应，应丢弃
    ///
    /// 失败时保留输入和上一次成功的反馈文本
    pub fn settled(
        &self,
        seq: u64,
        result: Result<String, String>,
        ordering: ResponseOrdering,
    ) -> Option<Self> {
        if !accepts(self.latest_seq, seq, ordering) {
            return None;
        }

        let next = match result {
            Ok(text) => Self {
                feedback: StageFeedback {
                    text,
                    loading: false,
                    shown: true,
                },
                error: None,
                ..self.clone()
            },
            Err(message) => Self {
                feedback: StageFeedback {
                    text: self.feedback.text.clone(),
                    loading: false,
                    shown: !self.feedback.text.trim().is_empty(),
                },
                error: Some(message),
                ..self.clone()
            },
        };
        Some(next)
    }
}

/// 编码阶段状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeState {
    pub code: String,
    pub language: Language,
    /// 当前语言的函数骨架
    pub skeleton: Option<String>,
    pub skeleton_loading: bool,
    pub skeleton_error: Option<String>,
    /// 最近一次运行的输出（失败时是错误文本）
    pub last_output: Option<String>,
    runs_in_flight: u32,
    skeleton_seq: u64,
}

impl CodeState {
    pub fn new(language: Language) -> Self {
        Self {
            code: String::new(),
            language,
            skeleton: None,
            skeleton_loading: false,
            skeleton_error: None,
            last_output: None,
            runs_in_flight: 0,
            skeleton_seq: 0,
        }
    }

    pub fn running(&self) -> bool {
        self.runs_in_flight > 0
    }

    pub fn skeleton_seq(&self) -> u64 {
        self.skeleton_seq
    }

    pub fn edited(&self, code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..self.clone()
        }
    }

    pub fn skeleton_dispatched(&self, language: Language, seq: u64) -> Self {
        Self {
            language,
            skeleton_loading: true,
            skeleton_error: None,
            skeleton_seq: seq,
            ..self.clone()
        }
    }

    /// 骨架返回，总是只接受最近一次请求（语言切换必须以最后一次为准）
    ///
    /// 编辑器为空或仍是旧骨架时才用新骨架替换代码
    pub fn skeleton_settled(&self, seq: u64, result: Result<String, String>) -> Option<Self> {
        if seq != self.skeleton_seq {
            return None;
        }

        let next = match result {
            Ok(skeleton) => {
                let untouched = self.code.trim().is_empty()
                    || self.skeleton.as_deref().map(str::trim) == Some(self.code.trim());
                Self {
                    code: if untouched {
                        skeleton.clone()
                    } else {
                        self.code.clone()
                    },
                    skeleton: Some(skeleton),
                    skeleton_loading: false,
                    skeleton_error: None,
                    ..self.clone()
                }
            }
            Err(message) => Self {
                skeleton_loading: false,
                skeleton_error: Some(message),
                ..self.clone()
            },
        };
        Some(next)
    }

    pub fn run_dispatched(&self, code: String) -> Self {
        Self {
            code,
            runs_in_flight: self.runs_in_flight + 1,
            ..self.clone()
        }
    }

    /// 运行结果：谁后返回谁覆盖输出槽
    pub fn run_settled(&self, output: String) -> Self {
        Self {
            last_output: Some(output),
            runs_in_flight: self.runs_in_flight.saturating_sub(1),
            ..self.clone()
        }
    }
}

/// 评审请求状态（评审结果本身由编排器单独持有）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewState {
    pub loading: bool,
    pub error: Option<String>,
    latest_seq: u64,
}

impl ReviewState {
    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    pub fn rejected(&self, message: String) -> Self {
        Self {
            loading: false,
            error: Some(message),
            latest_seq: self.latest_seq,
        }
    }

    pub fn dispatched(&self, seq: u64) -> Self {
        Self {
            loading: true,
            error: None,
            latest_seq: seq,
        }
    }

    pub fn settled(
        &self,
        seq: u64,
        error: Option<String>,
        ordering: ResponseOrdering,
    ) -> Option<Self> {
        if !accepts(self.latest_seq, seq, ordering) {
            return None;
        }
        Some(Self {
            loading: false,
            error,
            latest_seq: self.latest_seq,
        })
    }
}

/// 会话
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub question_id: QuestionId,
    pub clarify: StageState,
    pub brute_force: StageState,
    pub optimize: StageState,
    pub code: CodeState,
    pub review: ReviewState,
    pub started_at: DateTime<Local>,
    pub time_budget: Duration,
    pub expired: bool,
}

impl Session {
    pub fn new(question_id: QuestionId, language: Language, time_budget: Duration) -> Self {
        Self {
            question_id,
            clarify: StageState::default(),
            brute_force: StageState::default(),
            optimize: StageState::default(),
            code: CodeState::new(language),
            review: ReviewState::default(),
            started_at: Local::now(),
            time_budget,
            expired: false,
        }
    }

    pub fn stage(&self, stage: FeedbackStage) -> &StageState {
        match stage {
            FeedbackStage::Clarify => &self.clarify,
            FeedbackStage::BruteForce => &self.brute_force,
            FeedbackStage::Optimize => &self.optimize,
        }
    }

    /// 整体替换某个阶段槽位
    pub fn replace_stage(&mut self, stage: FeedbackStage, next: StageState) {
        match stage {
            FeedbackStage::Clarify => self.clarify = next,
            FeedbackStage::BruteForce => self.brute_force = next,
            FeedbackStage::Optimize => self.optimize = next,
        }
    }

    /// 评审至少需要澄清、暴力解法、代码中的一项
    pub fn has_reviewable_input(&self) -> bool {
        [
            self.clarify.input.as_str(),
            self.brute_force.input.as_str(),
            self.code.code.as_str(),
        ]
        .iter()
        .any(|text| !text.trim().is_empty())
    }
}

fn accepts(latest_seq: u64, seq: u64, ordering: ResponseOrdering) -> bool {
    match ordering {
        ResponseOrdering::LatestDispatch => seq == latest_seq,
        ResponseOrdering::LastSettled => true,
    }
}
