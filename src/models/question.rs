use serde::{Deserialize, Serialize};

/// 题目 ID
pub type QuestionId = u32;

/// 题目（会话开始时获取一次，之后不再变化）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub examples: Vec<QuestionExample>,
    #[serde(default)]
    pub constraints: Vec<String>,
}

/// 题目示例
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionExample {
    pub input: String,
    pub output: String,
}

/// 题目列表中的一项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionSummary {
    pub id: QuestionId,
    pub title: String,
}
