//! 接口请求/响应体
//!
//! 字段名与反馈服务保持一致（snake_case）

use serde::{Deserialize, Serialize};

use super::language::Language;
use super::question::{Question, QuestionId};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartSessionRequest {
    pub question_id: QuestionId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StartSessionResponse {
    pub question: Question,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDefinitionRequest {
    pub question_id: QuestionId,
    pub language: Language,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FunctionDefinitionResponse {
    pub function_definition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClarifyRequest {
    pub user_input: String,
    pub question_id: QuestionId,
}

/// 暴力解法 / 优化阶段共用的请求体
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdeaRequest {
    pub user_idea: String,
    pub time_complexity: String,
    pub space_complexity: String,
    pub question_id: QuestionId,
}

/// 各反馈阶段的响应体（`agent` 字段忽略）
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackResponse {
    pub response: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunCodeRequest {
    pub code: String,
    pub language: Language,
    pub question_id: QuestionId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunCodeResponse {
    #[serde(default)]
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeReviewRequest {
    pub clarification: String,
    pub brute_force: String,
    pub code: String,
    pub language: Language,
    pub brute_force_time_complexity: String,
    pub brute_force_space_complexity: String,
    pub optimize_time_complexity: String,
    pub optimize_space_complexity: String,
    pub question_id: QuestionId,
}
