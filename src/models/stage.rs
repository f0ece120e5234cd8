//! 面试阶段定义

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 面试阶段（按界面展示顺序排列）
///
/// 顺序只是建议，会话开始后可以在已解锁的阶段之间任意跳转
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Question,
    Clarify,
    BruteForce,
    Optimize,
    Code,
    Review,
}

impl Stage {
    /// 全部阶段，按顺序
    pub const ALL: [Stage; 6] = [
        Stage::Question,
        Stage::Clarify,
        Stage::BruteForce,
        Stage::Optimize,
        Stage::Code,
        Stage::Review,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Stage::Question => "题目",
            Stage::Clarify => "澄清",
            Stage::BruteForce => "暴力解法",
            Stage::Optimize => "优化",
            Stage::Code => "编码",
            Stage::Review => "评审",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "question" => Ok(Stage::Question),
            "clarify" => Ok(Stage::Clarify),
            "brute" | "brute_force" | "brute-force" => Ok(Stage::BruteForce),
            "optimize" => Ok(Stage::Optimize),
            "code" => Ok(Stage::Code),
            "review" => Ok(Stage::Review),
            other => Err(format!("未知阶段: {}", other)),
        }
    }
}

/// 会产生文字反馈的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedbackStage {
    Clarify,
    BruteForce,
    Optimize,
}

impl FeedbackStage {
    pub const ALL: [FeedbackStage; 3] = [
        FeedbackStage::Clarify,
        FeedbackStage::BruteForce,
        FeedbackStage::Optimize,
    ];

    pub fn stage(self) -> Stage {
        match self {
            FeedbackStage::Clarify => Stage::Clarify,
            FeedbackStage::BruteForce => Stage::BruteForce,
            FeedbackStage::Optimize => Stage::Optimize,
        }
    }

    /// 对应的接口路径
    pub fn endpoint(self) -> &'static str {
        match self {
            FeedbackStage::Clarify => "/api/clarify",
            FeedbackStage::BruteForce => "/api/brute-force",
            FeedbackStage::Optimize => "/api/optimize",
        }
    }

    /// 输入长度上限（与反馈服务的校验保持一致）
    pub fn max_input_len(self) -> usize {
        match self {
            FeedbackStage::Clarify => 1000,
            FeedbackStage::BruteForce | FeedbackStage::Optimize => 2000,
        }
    }
}

impl fmt::Display for FeedbackStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.stage().fmt(f)
    }
}

/// 用户声明的时间/空间复杂度，原样透传，不做解析
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Complexity {
    pub time: String,
    pub space: String,
}

impl Complexity {
    pub fn new(time: impl Into<String>, space: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            space: space.into(),
        }
    }
}
