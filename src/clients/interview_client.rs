/// 面试反馈服务客户端
///
/// 封装所有与反馈服务、代码运行服务相关的调用逻辑
use async_trait::async_trait;
use tracing::debug;

use crate::config::Config;
use crate::error::ApiError;
use crate::infrastructure::HttpExecutor;
use crate::models::review::CodeReviewResponse;
use crate::models::wire::{
    ClarifyRequest, CodeReviewRequest, FeedbackResponse, FunctionDefinitionRequest,
    FunctionDefinitionResponse, IdeaRequest, RunCodeRequest, RunCodeResponse,
    StartSessionRequest, StartSessionResponse,
};
use crate::models::{FeedbackStage, Question, QuestionSummary, Review};

/// 面试服务接口
///
/// 每个方法对应一个远端接口。`token` 为 `None` 时不带认证头。
#[async_trait]
pub trait InterviewApi: Send + Sync {
    /// GET /api/questions
    async fn list_questions(&self, token: Option<&str>) -> Result<Vec<QuestionSummary>, ApiError>;

    /// POST /api/start-session
    async fn start_session(
        &self,
        request: &StartSessionRequest,
        token: Option<&str>,
    ) -> Result<Question, ApiError>;

    /// POST /api/function-definition
    async fn function_definition(
        &self,
        request: &FunctionDefinitionRequest,
        token: Option<&str>,
    ) -> Result<String, ApiError>;

    /// POST /api/clarify
    async fn clarify(&self, request: &ClarifyRequest, token: Option<&str>)
        -> Result<String, ApiError>;

    /// POST /api/brute-force
    async fn brute_force(&self, request: &IdeaRequest, token: Option<&str>)
        -> Result<String, ApiError>;

    /// POST /api/optimize
    async fn optimize(&self, request: &IdeaRequest, token: Option<&str>)
        -> Result<String, ApiError>;

    /// POST /api/run-code
    async fn run_code(&self, request: &RunCodeRequest, token: Option<&str>)
        -> Result<String, ApiError>;

    /// POST /api/code-review
    async fn code_review(
        &self,
        request: &CodeReviewRequest,
        token: Option<&str>,
    ) -> Result<Review, ApiError>;
}

/// 基于 HTTP 的面试服务客户端
pub struct InterviewClient {
    executor: HttpExecutor,
}

impl InterviewClient {
    /// 创建新的客户端
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        Ok(Self {
            executor: HttpExecutor::new(config)?,
        })
    }

    async fn feedback<B: serde::Serialize + Sync>(
        &self,
        stage: FeedbackStage,
        body: &B,
        token: Option<&str>,
    ) -> Result<String, ApiError> {
        let endpoint = stage.endpoint();
        let response: FeedbackResponse = self.executor.post_json(endpoint, body, token).await?;
        non_empty(endpoint, response.response)
    }
}

#[async_trait]
impl InterviewApi for InterviewClient {
    async fn list_questions(&self, token: Option<&str>) -> Result<Vec<QuestionSummary>, ApiError> {
        let questions: Vec<QuestionSummary> =
            self.executor.get_json("/api/questions", token).await?;
        debug!("题目列表: {} 道", questions.len());
        Ok(questions)
    }

    async fn start_session(
        &self,
        request: &StartSessionRequest,
        token: Option<&str>,
    ) -> Result<Question, ApiError> {
        let response: StartSessionResponse = self
            .executor
            .post_json("/api/start-session", request, token)
            .await?;
        Ok(response.question)
    }

    async fn function_definition(
        &self,
        request: &FunctionDefinitionRequest,
        token: Option<&str>,
    ) -> Result<String, ApiError> {
        let endpoint = "/api/function-definition";
        let response: FunctionDefinitionResponse =
            self.executor.post_json(endpoint, request, token).await?;
        non_empty(endpoint, response.function_definition)
    }

    async fn clarify(
        &self,
        request: &ClarifyRequest,
        token: Option<&str>,
    ) -> Result<String, ApiError> {
        self.feedback(FeedbackStage::Clarify, request, token).await
    }

    async fn brute_force(
        &self,
        request: &IdeaRequest,
        token: Option<&str>,
    ) -> Result<String, ApiError> {
        self.feedback(FeedbackStage::BruteForce, request, token).await
    }

    async fn optimize(
        &self,
        request: &IdeaRequest,
        token: Option<&str>,
    ) -> Result<String, ApiError> {
        self.feedback(FeedbackStage::Optimize, request, token).await
    }

    async fn run_code(
        &self,
        request: &RunCodeRequest,
        token: Option<&str>,
    ) -> Result<String, ApiError> {
        let response: RunCodeResponse = self
            .executor
            .post_json("/api/run-code", request, token)
            .await?;
        Ok(response.output)
    }

    async fn code_review(
        &self,
        request: &CodeReviewRequest,
        token: Option<&str>,
    ) -> Result<Review, ApiError> {
        let response: CodeReviewResponse = self
            .executor
            .post_json("/api/code-review", request, token)
            .await?;
        Ok(response.into_review())
    }
}

fn non_empty(endpoint: &str, text: String) -> Result<String, ApiError> {
    if text.trim().is_empty() {
        Err(ApiError::EmptyResponse {
            endpoint: endpoint.to_string(),
        })
    } else {
        Ok(text)
    }
}
