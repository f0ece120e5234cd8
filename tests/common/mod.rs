#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use interview_coach::error::ApiError;
use interview_coach::models::wire::{
    ClarifyRequest, CodeReviewRequest, FunctionDefinitionRequest, IdeaRequest, RunCodeRequest,
    StartSessionRequest,
};
use interview_coach::models::{
    CodeReviewResponse, Language, Question, QuestionId, QuestionSummary, Review,
};
use interview_coach::orchestrator::ApiCall;
use interview_coach::{Anonymous, AuthGate, Config, InterviewApi, SessionOrchestrator};

/// 记录所有调用的面试服务替身
#[derive(Default)]
pub struct FakeApi {
    calls: Mutex<Vec<(ApiCall, Option<String>)>>,
    failing: Mutex<HashSet<&'static str>>,
    delays: Mutex<HashMap<&'static str, Duration>>,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// 让某个接口返回 500
    pub fn fail(&self, endpoint: &'static str) {
        self.failing.lock().unwrap().insert(endpoint);
    }

    pub fn recover(&self, endpoint: &'static str) {
        self.failing.lock().unwrap().remove(endpoint);
    }

    pub fn delay(&self, endpoint: &'static str, delay: Duration) {
        self.delays.lock().unwrap().insert(endpoint, delay);
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(call, _)| call.clone())
            .collect()
    }

    pub fn tokens(&self) -> Vec<Option<String>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, token)| token.clone())
            .collect()
    }

    pub fn count(&self, endpoint: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(call, _)| call.endpoint() == endpoint)
            .count()
    }

    async fn record(&self, call: ApiCall, token: Option<&str>) -> Result<(), ApiError> {
        let endpoint = call.endpoint();
        self.calls
            .lock()
            .unwrap()
            .push((call, token.map(str::to_string)));

        let delay = self.delays.lock().unwrap().get(endpoint).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.lock().unwrap().contains(endpoint) {
            return Err(ApiError::BadStatus {
                endpoint: endpoint.to_string(),
                status: 500,
                message: Some(format!("{} unavailable", endpoint)),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl InterviewApi for FakeApi {
    async fn list_questions(&self, token: Option<&str>) -> Result<Vec<QuestionSummary>, ApiError> {
        self.record(ApiCall::ListQuestions, token).await?;
        Ok(vec![
            QuestionSummary {
                id: 1,
                title: "Two Sum".to_string(),
            },
            QuestionSummary {
                id: 42,
                title: "Merge Intervals".to_string(),
            },
        ])
    }

    async fn start_session(
        &self,
        request: &StartSessionRequest,
        token: Option<&str>,
    ) -> Result<Question, ApiError> {
        self.record(ApiCall::StartSession(request.clone()), token)
            .await?;
        Ok(question(request.question_id))
    }

    async fn function_definition(
        &self,
        request: &FunctionDefinitionRequest,
        token: Option<&str>,
    ) -> Result<String, ApiError> {
        self.record(ApiCall::FunctionDefinition(request.clone()), token)
            .await?;
        Ok(skeleton(request.question_id, request.language))
    }

    async fn clarify(
        &self,
        request: &ClarifyRequest,
        token: Option<&str>,
    ) -> Result<String, ApiError> {
        self.record(ApiCall::Clarify(request.clone()), token).await?;
        Ok(format!("clarify: {}", request.user_input))
    }

    async fn brute_force(
        &self,
        request: &IdeaRequest,
        token: Option<&str>,
    ) -> Result<String, ApiError> {
        self.record(ApiCall::BruteForce(request.clone()), token)
            .await?;
        Ok(format!("brute force: {}", request.user_idea))
    }

    async fn optimize(
        &self,
        request: &IdeaRequest,
        token: Option<&str>,
    ) -> Result<String, ApiError> {
        self.record(ApiCall::Optimize(request.clone()), token).await?;
        Ok(format!("optimize: {}", request.user_idea))
    }

    async fn run_code(
        &self,
        request: &RunCodeRequest,
        token: Option<&str>,
    ) -> Result<String, ApiError> {
        self.record(ApiCall::RunCode(request.clone()), token).await?;
        Ok(format!("ran {} lines", request.code.lines().count()))
    }

    async fn code_review(
        &self,
        request: &CodeReviewRequest,
        token: Option<&str>,
    ) -> Result<Review, ApiError> {
        self.record(ApiCall::CodeReview(request.clone()), token)
            .await?;
        Ok(sample_review())
    }
}

pub fn question(id: QuestionId) -> Question {
    Question {
        id,
        title: format!("Question {}", id),
        description: "Given an array of intervals, merge all overlapping intervals.".to_string(),
        examples: Vec::new(),
        constraints: vec!["1 <= n <= 10^4".to_string()],
    }
}

pub fn skeleton(id: QuestionId, language: Language) -> String {
    format!("// {} skeleton for #{}", language, id)
}

pub fn sample_review() -> Review {
    let response: CodeReviewResponse = serde_json::from_value(json!({
        "review": {
            "clarification": {"grade": 8, "feedback": "Good questions"},
            "brute_force": {"grade": "7", "feedback": "Correct idea"},
            "coding": {
                "grade": 6.5,
                "feedback": "Minor bugs",
                "line_by_line": [{"line": 3, "issue": "off by one", "suggestion": "use <="}]
            },
            "total": 21.5,
            "key_pointers": ["Sort first", "Merge in one pass"]
        },
        "actual_solution": "def merge(intervals): ..."
    }))
    .unwrap();
    response.into_review()
}

pub fn config() -> Config {
    Config {
        time_budget_secs: 5,
        ..Config::default()
    }
}

pub fn orchestrator(api: Arc<FakeApi>) -> SessionOrchestrator {
    orchestrator_with(api, config(), Arc::new(Anonymous))
}

pub fn orchestrator_with(
    api: Arc<FakeApi>,
    config: Config,
    auth: Arc<dyn AuthGate>,
) -> SessionOrchestrator {
    SessionOrchestrator::new(&config, api, auth)
}

/// 已经开始题目 42 的编排器
pub async fn started(api: Arc<FakeApi>) -> SessionOrchestrator {
    let mut orchestrator = orchestrator(api);
    orchestrator.start_session(42).await.unwrap();
    orchestrator
}
