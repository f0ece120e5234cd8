//! 会话编排器 - 编排层
//!
//! ## 职责
//!
//! 持有会话身份（当前题目），负责每一个阶段请求和最终评审请求的完整生命周期。
//!
//! ## 请求生命周期
//!
//! 每个网络操作都拆成三步：
//!
//! ```text
//! dispatch_*(&mut self) -> Ticket      同步：置 loading、分配序号、捕获 token
//!     ↓
//! Ticket::send(api)     -> Settled     异步：只做网络往返，不碰状态
//!     ↓
//! apply(&mut self, Settled)            同步：按轮次和序号决定是否生效
//! ```
//!
//! 这样事件循环可以同时挂着多个请求，完成顺序任意，状态只在 `apply` 中被修改。
//! `start_session` / `submit_stage` 等异步方法只是把三步串起来。
//!
//! ## 过期响应
//!
//! - 轮次（epoch）：每次 restart 递增，旧轮次的响应一律丢弃
//! - 序号（seq）：单调递增，同一阶段只接受最近一次请求的响应
//!   （`ResponseOrdering::LastSettled` 时退回"谁后返回谁生效"）

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::auth::AuthGate;
use crate::clients::InterviewApi;
use crate::config::{Config, ResponseOrdering};
use crate::error::{ApiError, AppError, AppResult, ValidationError};
use crate::models::wire::{
    ClarifyRequest, CodeReviewRequest, FunctionDefinitionRequest, IdeaRequest, RunCodeRequest,
    StartSessionRequest,
};
use crate::models::{
    Complexity, FeedbackStage, Language, Question, QuestionId, QuestionSummary, Review, Stage,
};
use crate::orchestrator::view::SessionView;
use crate::utils::truncate_text;
use crate::workflow::{
    Session, SessionCtx, StageFeedback, StageNavigator, StageTransition, TickOutcome,
    TimerController, TimerSnapshot, TimerTick,
};

/// 代码长度上限（与反馈服务的校验保持一致）
pub const MAX_CODE_LEN: usize = 10_000;

/// 一次远端调用
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    ListQuestions,
    StartSession(StartSessionRequest),
    FunctionDefinition(FunctionDefinitionRequest),
    Clarify(ClarifyRequest),
    BruteForce(IdeaRequest),
    Optimize(IdeaRequest),
    RunCode(RunCodeRequest),
    CodeReview(CodeReviewRequest),
}

impl ApiCall {
    pub fn endpoint(&self) -> &'static str {
        match self {
            ApiCall::ListQuestions => "/api/questions",
            ApiCall::StartSession(_) => "/api/start-session",
            ApiCall::FunctionDefinition(_) => "/api/function-definition",
            ApiCall::Clarify(_) => FeedbackStage::Clarify.endpoint(),
            ApiCall::BruteForce(_) => FeedbackStage::BruteForce.endpoint(),
            ApiCall::Optimize(_) => FeedbackStage::Optimize.endpoint(),
            ApiCall::RunCode(_) => "/api/run-code",
            ApiCall::CodeReview(_) => "/api/code-review",
        }
    }
}

/// 已发出的请求
///
/// 发出时就捕获 token，之后登录状态变化不影响这次请求
#[derive(Debug, Clone)]
pub struct Ticket {
    epoch: u64,
    seq: u64,
    token: Option<String>,
    call: ApiCall,
}

impl Ticket {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn call(&self) -> &ApiCall {
        &self.call
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// 执行网络往返，不修改任何会话状态
    pub async fn send(self, api: &dyn InterviewApi) -> Settled {
        let token = self.token.as_deref();
        let outcome = match &self.call {
            ApiCall::ListQuestions => Outcome::Questions(api.list_questions(token).await),
            ApiCall::StartSession(request) => {
                Outcome::Question(api.start_session(request, token).await)
            }
            ApiCall::FunctionDefinition(request) => {
                Outcome::Skeleton(api.function_definition(request, token).await)
            }
            ApiCall::Clarify(request) => Outcome::Feedback {
                stage: FeedbackStage::Clarify,
                result: api.clarify(request, token).await,
            },
            ApiCall::BruteForce(request) => Outcome::Feedback {
                stage: FeedbackStage::BruteForce,
                result: api.brute_force(request, token).await,
            },
            ApiCall::Optimize(request) => Outcome::Feedback {
                stage: FeedbackStage::Optimize,
                result: api.optimize(request, token).await,
            },
            ApiCall::RunCode(request) => Outcome::RunOutput(api.run_code(request, token).await),
            ApiCall::CodeReview(request) => {
                Outcome::Review(api.code_review(request, token).await)
            }
        };

        Settled {
            epoch: self.epoch,
            seq: self.seq,
            outcome,
        }
    }
}

/// 请求完成
#[derive(Debug)]
pub struct Settled {
    pub epoch: u64,
    pub seq: u64,
    pub outcome: Outcome,
}

/// 请求结果
#[derive(Debug)]
pub enum Outcome {
    Questions(Result<Vec<QuestionSummary>, ApiError>),
    Question(Result<Question, ApiError>),
    Skeleton(Result<String, ApiError>),
    Feedback {
        stage: FeedbackStage,
        result: Result<String, ApiError>,
    },
    RunOutput(Result<String, ApiError>),
    Review(Result<Review, ApiError>),
}

/// apply 的结果
#[derive(Debug)]
pub enum ApplyOutcome {
    /// 成功响应已生效
    Applied,
    /// 失败已记录为行内提示
    Failed(ApiError),
    /// 过期响应（旧轮次或被更新的请求取代），已丢弃
    Stale,
}

impl ApplyOutcome {
    pub fn is_stale(&self) -> bool {
        matches!(self, ApplyOutcome::Stale)
    }
}

/// 会话编排器
pub struct SessionOrchestrator {
    api: Arc<dyn InterviewApi>,
    auth: Arc<dyn AuthGate>,
    ordering: ResponseOrdering,
    time_budget: Duration,
    default_language: Language,
    verbose_logging: bool,

    epoch: u64,
    next_seq: u64,

    questions: Vec<QuestionSummary>,
    questions_loading: bool,
    questions_error: Option<String>,
    questions_seq: u64,

    question: Option<Question>,
    question_loading: bool,
    question_error: Option<String>,
    pending_question: Option<u64>,

    language: Language,
    session: Option<Session>,
    review: Option<Review>,
    navigator: StageNavigator,
    timer: TimerController,
}

impl SessionOrchestrator {
    /// 创建编排器（计时器需要手动 tick）
    pub fn new(config: &Config, api: Arc<dyn InterviewApi>, auth: Arc<dyn AuthGate>) -> Self {
        Self {
            api,
            auth,
            ordering: config.response_ordering,
            time_budget: config.time_budget(),
            default_language: config.default_language,
            verbose_logging: config.verbose_logging,
            epoch: 1,
            next_seq: 0,
            questions: Vec::new(),
            questions_loading: false,
            questions_error: None,
            questions_seq: 0,
            question: None,
            question_loading: false,
            question_error: None,
            pending_question: None,
            language: config.default_language,
            session: None,
            review: None,
            navigator: StageNavigator::new(),
            timer: TimerController::new(config.time_budget()),
        }
    }

    /// 让计时器在后台每秒往 `sink` 发滴答
    pub fn with_tick_sink(
        mut self,
        sink: tokio::sync::mpsc::UnboundedSender<TimerTick>,
    ) -> Self {
        self.timer = TimerController::with_ticker(self.time_budget, sink);
        self
    }

    // ========== 状态读取 ==========

    pub fn ctx(&self) -> SessionCtx {
        SessionCtx::new(self.epoch, self.question.as_ref().map(|q| q.id))
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn questions(&self) -> &[QuestionSummary] {
        &self.questions
    }

    pub fn question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    pub fn question_error(&self) -> Option<&str> {
        self.question_error.as_deref()
    }

    pub fn is_question_loading(&self) -> bool {
        self.question_loading
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn review(&self) -> Option<&Review> {
        self.review.as_ref()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn active_stage(&self) -> Stage {
        self.navigator.active()
    }

    pub fn navigator(&self) -> &StageNavigator {
        &self.navigator
    }

    pub fn timer(&self) -> TimerSnapshot {
        self.timer.snapshot()
    }

    pub fn feedback(&self, stage: FeedbackStage) -> Option<&StageFeedback> {
        self.session.as_ref().map(|s| &s.stage(stage).feedback)
    }

    /// 给展示层的快照
    pub fn view(&self) -> SessionView {
        SessionView {
            epoch: self.epoch,
            active_stage: self.navigator.active(),
            unlocked: self.navigator.unlocked().iter().copied().collect(),
            questions: self.questions.clone(),
            questions_loading: self.questions_loading,
            questions_error: self.questions_error.clone(),
            question: self.question.clone(),
            question_loading: self.question_loading,
            question_error: self.question_error.clone(),
            language: self.language,
            session: self.session.clone(),
            review: self.review.clone(),
            timer: self.timer.snapshot(),
            notice: None,
        }
    }

    // ========== 同步操作 ==========

    /// 切换阶段；题目 → 澄清 时以完整时长开始计时
    pub fn select_stage(&mut self, stage: Stage) -> AppResult<StageTransition> {
        let transition = self.navigator.select(stage)?;
        if transition.starts_timer {
            self.timer.start(self.time_budget);
        }
        debug!("{} 阶段: {} → {}", self.ctx(), transition.from, transition.to);
        Ok(transition)
    }

    /// 编辑阶段输入（不发请求）
    pub fn set_input(&mut self, stage: FeedbackStage, text: impl Into<String>) -> AppResult<()> {
        let session = self.session_mut()?;
        let next = session.stage(stage).edited(text);
        session.replace_stage(stage, next);
        Ok(())
    }

    /// 编辑复杂度声明（不发请求）
    pub fn set_complexity(&mut self, stage: FeedbackStage, complexity: Complexity) -> AppResult<()> {
        let session = self.session_mut()?;
        let next = session.stage(stage).with_complexity(complexity);
        session.replace_stage(stage, next);
        Ok(())
    }

    /// 编辑代码（不发请求）
    pub fn set_code(&mut self, code: impl Into<String>) -> AppResult<()> {
        let session = self.session_mut()?;
        session.code = session.code.edited(code);
        Ok(())
    }

    /// 处理后台滴答
    pub fn on_tick(&mut self, tick: TimerTick) -> TickOutcome {
        let outcome = self.timer.on_tick(tick);
        self.after_tick(outcome)
    }

    /// 手动扣减一秒（无后台任务时使用）
    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self.timer.tick();
        self.after_tick(outcome)
    }

    fn after_tick(&mut self, outcome: TickOutcome) -> TickOutcome {
        if outcome == TickOutcome::Expired {
            if let Some(session) = self.session.as_mut() {
                session.expired = true;
            }
            warn!("{} ⏰ 时间已到，仍可提交评审", self.ctx());
        }
        outcome
    }

    /// 清空本轮会话的全部状态
    ///
    /// 题目、会话、评审、各阶段输入与反馈、计时器全部回到初始值；
    /// 还在路上的请求因轮次变化会在返回时被丢弃
    pub fn restart(&mut self) {
        info!("{} 🔄 重新开始", self.ctx());
        self.epoch += 1;
        self.question = None;
        self.question_loading = false;
        self.question_error = None;
        self.pending_question = None;
        self.session = None;
        self.review = None;
        self.language = self.default_language;
        self.navigator.reset();
        self.timer.reset();
    }

    /// 关闭：取消计时任务
    pub fn shutdown(&mut self) {
        self.timer.reset();
    }

    // ========== dispatch ==========

    pub fn dispatch_list_questions(&mut self) -> Ticket {
        let seq = self.bump_seq();
        self.questions_loading = true;
        self.questions_error = None;
        self.questions_seq = seq;
        self.ticket(seq, ApiCall::ListQuestions)
    }

    /// 选题；已有会话时先 restart
    pub fn dispatch_start_session(&mut self, question_id: QuestionId) -> Ticket {
        if self.question.is_some() || self.session.is_some() {
            self.restart();
        }

        let seq = self.bump_seq();
        self.question_loading = true;
        self.question_error = None;
        self.pending_question = Some(seq);
        info!("[会话 #{}] 📥 加载题目 #{}", self.epoch, question_id);
        self.ticket(seq, ApiCall::StartSession(StartSessionRequest { question_id }))
    }

    /// 提交某个阶段的输入以获取反馈
    ///
    /// 复杂度只对暴力解法/优化阶段有意义，传 `None` 时沿用已填写的值
    pub fn dispatch_stage(
        &mut self,
        stage: FeedbackStage,
        input: impl Into<String>,
        complexity: Option<Complexity>,
    ) -> AppResult<Ticket> {
        let input = input.into();
        let ctx = self.ctx();
        let session = self.session_mut()?;
        let slot = session.stage(stage).clone();

        if let Err(err) = validate_stage_input(stage, &input) {
            // 校验失败也保留用户输入
            session.replace_stage(stage, slot.rejected(input, err.to_string()));
            return Err(err.into());
        }

        let complexity = match stage {
            FeedbackStage::Clarify => Complexity::default(),
            _ => complexity.unwrap_or_else(|| slot.complexity.clone()),
        };
        let question_id = session.question_id;

        let seq = self.bump_seq();
        let session = self.session_mut()?;
        let next = session
            .stage(stage)
            .dispatched(input.clone(), complexity.clone(), seq);
        session.replace_stage(stage, next);

        let call = match stage {
            FeedbackStage::Clarify => ApiCall::Clarify(ClarifyRequest {
                user_input: input.clone(),
                question_id,
            }),
            FeedbackStage::BruteForce => ApiCall::BruteForce(IdeaRequest {
                user_idea: input.clone(),
                time_complexity: complexity.time,
                space_complexity: complexity.space,
                question_id,
            }),
            FeedbackStage::Optimize => ApiCall::Optimize(IdeaRequest {
                user_idea: input.clone(),
                time_complexity: complexity.time,
                space_complexity: complexity.space,
                question_id,
            }),
        };

        info!(
            "{} 📤 提交{}阶段 (seq {}): {}",
            ctx,
            stage,
            seq,
            truncate_text(&input, if self.verbose_logging { 200 } else { 40 })
        );
        Ok(self.ticket(seq, call))
    }

    /// 切换语言；有会话时拉取对应的函数骨架
    pub fn dispatch_language(&mut self, language: Language) -> Option<Ticket> {
        self.language = language;
        self.dispatch_skeleton()
    }

    /// 按当前题目和语言拉取函数骨架
    pub fn dispatch_skeleton(&mut self) -> Option<Ticket> {
        let language = self.language;
        let seq = self.bump_seq();
        let session = self.session.as_mut()?;
        session.code = session.code.skeleton_dispatched(language, seq);
        let question_id = session.question_id;

        debug!("{} 拉取 {} 函数骨架", self.ctx(), language);
        Some(self.ticket(
            seq,
            ApiCall::FunctionDefinition(FunctionDefinitionRequest {
                question_id,
                language,
            }),
        ))
    }

    /// 运行代码
    pub fn dispatch_run_code(&mut self, code: impl Into<String>) -> AppResult<Ticket> {
        let code = code.into();
        check_len("代码", &code, MAX_CODE_LEN)?;

        let language = self.language;
        let seq = self.bump_seq();
        let session = self.session_mut()?;
        session.code = session.code.run_dispatched(code.clone());
        let question_id = session.question_id;

        info!("{} ▶️ 运行代码 ({})", self.ctx(), language);
        Ok(self.ticket(
            seq,
            ApiCall::RunCode(RunCodeRequest {
                code,
                language,
                question_id,
            }),
        ))
    }

    /// 提交最终评审
    ///
    /// 澄清、暴力解法、代码全部为空时直接拒绝，不发任何请求。
    /// 时间耗尽不影响提交。
    pub fn dispatch_review(&mut self) -> AppResult<Ticket> {
        let language = self.language;
        let session = self.session_mut()?;

        let rejection = if !session.has_reviewable_input() {
            Some(ValidationError::EmptyReviewInputs)
        } else {
            check_len("代码", &session.code.code, MAX_CODE_LEN).err()
        };
        if let Some(err) = rejection {
            session.review = session.review.rejected(err.to_string());
            return Err(err.into());
        }

        let request = CodeReviewRequest {
            clarification: session.clarify.input.clone(),
            brute_force: session.brute_force.input.clone(),
            code: session.code.code.clone(),
            language,
            brute_force_time_complexity: session.brute_force.complexity.time.clone(),
            brute_force_space_complexity: session.brute_force.complexity.space.clone(),
            optimize_time_complexity: session.optimize.complexity.time.clone(),
            optimize_space_complexity: session.optimize.complexity.space.clone(),
            question_id: session.question_id,
        };

        let seq = self.bump_seq();
        let session = self.session_mut()?;
        session.review = session.review.dispatched(seq);

        info!("{} 📝 提交评审 (seq {})", self.ctx(), seq);
        Ok(self.ticket(seq, ApiCall::CodeReview(request)))
    }

    // ========== apply ==========

    /// 应用一次请求结果
    pub fn apply(&mut self, settled: Settled) -> ApplyOutcome {
        let Settled {
            epoch,
            seq,
            outcome,
        } = settled;

        let applied = match outcome {
            // 题目列表不属于任何一轮会话
            Outcome::Questions(result) => return self.apply_questions(seq, result),
            _ if epoch != self.epoch => {
                debug!(
                    "{} 丢弃上一轮会话的响应 (epoch {}, seq {})",
                    self.ctx(),
                    epoch,
                    seq
                );
                return ApplyOutcome::Stale;
            }
            Outcome::Question(result) => self.apply_question(seq, result),
            Outcome::Skeleton(result) => self.apply_skeleton(seq, result),
            Outcome::Feedback { stage, result } => self.apply_feedback(stage, seq, result),
            Outcome::RunOutput(result) => self.apply_run_output(result),
            Outcome::Review(result) => self.apply_review(seq, result),
        };

        match &applied {
            ApplyOutcome::Stale => debug!("{} 丢弃过期响应 (seq {})", self.ctx(), seq),
            ApplyOutcome::Failed(err) => warn!("{} ⚠️ 请求失败: {}", self.ctx(), err),
            ApplyOutcome::Applied => {}
        }
        applied
    }

    fn apply_questions(
        &mut self,
        seq: u64,
        result: Result<Vec<QuestionSummary>, ApiError>,
    ) -> ApplyOutcome {
        if seq != self.questions_seq {
            return ApplyOutcome::Stale;
        }
        self.questions_loading = false;
        match result {
            Ok(questions) => {
                info!("✓ 题目列表加载完成，共 {} 道", questions.len());
                self.questions = questions;
                ApplyOutcome::Applied
            }
            Err(err) => {
                warn!("⚠️ 题目列表加载失败: {}", err);
                self.questions_error = Some(err.inline_message());
                ApplyOutcome::Failed(err)
            }
        }
    }

    fn apply_question(&mut self, seq: u64, result: Result<Question, ApiError>) -> ApplyOutcome {
        if self.pending_question != Some(seq) {
            return ApplyOutcome::Stale;
        }
        self.pending_question = None;
        self.question_loading = false;

        match result {
            Ok(question) => {
                self.session = Some(Session::new(question.id, self.language, self.time_budget));
                self.question = Some(question);
                self.navigator.open_session();
                info!(
                    "{} ✓ 题目已加载: {}",
                    self.ctx(),
                    self.question.as_ref().map(|q| q.title.as_str()).unwrap_or("")
                );
                ApplyOutcome::Applied
            }
            Err(err) => {
                self.question_error = Some(format!("题目加载失败: {}", err.inline_message()));
                ApplyOutcome::Failed(err)
            }
        }
    }

    fn apply_feedback(
        &mut self,
        stage: FeedbackStage,
        seq: u64,
        result: Result<String, ApiError>,
    ) -> ApplyOutcome {
        let ordering = self.ordering;
        let Some(session) = self.session.as_mut() else {
            return ApplyOutcome::Stale;
        };

        let summary = result.as_ref().map(Clone::clone).map_err(ApiError::inline_message);
        let Some(next) = session.stage(stage).settled(seq, summary, ordering) else {
            return ApplyOutcome::Stale;
        };
        session.replace_stage(stage, next);

        match result {
            Ok(_) => {
                info!("{} ✓ {}阶段反馈已更新 (seq {})", self.ctx(), stage, seq);
                ApplyOutcome::Applied
            }
            Err(err) => ApplyOutcome::Failed(err),
        }
    }

    fn apply_skeleton(&mut self, seq: u64, result: Result<String, ApiError>) -> ApplyOutcome {
        let Some(session) = self.session.as_mut() else {
            return ApplyOutcome::Stale;
        };

        let summary = result.as_ref().map(Clone::clone).map_err(ApiError::inline_message);
        let Some(next) = session.code.skeleton_settled(seq, summary) else {
            return ApplyOutcome::Stale;
        };
        session.code = next;

        match result {
            Ok(_) => ApplyOutcome::Applied,
            Err(err) => ApplyOutcome::Failed(err),
        }
    }

    // 运行失败只变成输出槽里的错误文本
    fn apply_run_output(&mut self, result: Result<String, ApiError>) -> ApplyOutcome {
        let Some(session) = self.session.as_mut() else {
            return ApplyOutcome::Stale;
        };

        let output = match &result {
            Ok(output) => output.clone(),
            Err(err) => format!("Error: {}", err.inline_message()),
        };
        session.code = session.code.run_settled(output);

        match result {
            Ok(_) => ApplyOutcome::Applied,
            Err(err) => ApplyOutcome::Failed(err),
        }
    }

    fn apply_review(&mut self, seq: u64, result: Result<Review, ApiError>) -> ApplyOutcome {
        let ordering = self.ordering;
        let Some(session) = self.session.as_mut() else {
            return ApplyOutcome::Stale;
        };

        let error = result.as_ref().err().map(ApiError::inline_message);
        let Some(next) = session.review.settled(seq, error, ordering) else {
            return ApplyOutcome::Stale;
        };
        session.review = next;

        match result {
            Ok(review) => {
                self.timer.stop();
                self.review = Some(review);
                self.navigator.enter_review();
                if let Some(review) = self.review.as_ref() {
                    info!("{} ✓ 评审完成，总分 {}", self.ctx(), review.total_score);
                }
                ApplyOutcome::Applied
            }
            Err(err) => ApplyOutcome::Failed(err),
        }
    }

    // ========== 串起 dispatch → send → apply 的异步方法 ==========

    /// 加载题目列表
    pub async fn load_questions(&mut self) -> AppResult<Vec<QuestionSummary>> {
        let ticket = self.dispatch_list_questions();
        match self.round_trip(ticket).await {
            ApplyOutcome::Failed(err) => Err(err.into()),
            _ => Ok(self.questions.clone()),
        }
    }

    /// 选题并开始会话
    pub async fn start_session(&mut self, question_id: QuestionId) -> AppResult<Question> {
        let ticket = self.dispatch_start_session(question_id);
        match self.round_trip(ticket).await {
            ApplyOutcome::Failed(err) => Err(err.into()),
            _ => self
                .question
                .clone()
                .ok_or(AppError::Validation(ValidationError::NoActiveSession)),
        }
    }

    /// 提交阶段输入并等待反馈，返回反馈文本
    pub async fn submit_stage(
        &mut self,
        stage: FeedbackStage,
        input: impl Into<String>,
        complexity: Option<Complexity>,
    ) -> AppResult<String> {
        let ticket = self.dispatch_stage(stage, input, complexity)?;
        match self.round_trip(ticket).await {
            ApplyOutcome::Failed(err) => Err(err.into()),
            _ => Ok(self
                .feedback(stage)
                .map(|feedback| feedback.text.clone())
                .unwrap_or_default()),
        }
    }

    /// 切换语言并等待函数骨架（无会话时返回 `None`）
    pub async fn select_language(&mut self, language: Language) -> AppResult<Option<String>> {
        let Some(ticket) = self.dispatch_language(language) else {
            return Ok(None);
        };
        match self.round_trip(ticket).await {
            ApplyOutcome::Failed(err) => Err(err.into()),
            _ => Ok(self
                .session
                .as_ref()
                .and_then(|session| session.code.skeleton.clone())),
        }
    }

    /// 运行代码，返回输出；网络失败时返回错误文本而不是错误
    pub async fn run_code(&mut self, code: impl Into<String>) -> AppResult<String> {
        let ticket = self.dispatch_run_code(code)?;
        self.round_trip(ticket).await;
        Ok(self
            .session
            .as_ref()
            .and_then(|session| session.code.last_output.clone())
            .unwrap_or_default())
    }

    /// 提交评审并等待结果
    pub async fn submit_review(&mut self) -> AppResult<Review> {
        let ticket = self.dispatch_review()?;
        match self.round_trip(ticket).await {
            ApplyOutcome::Failed(err) => Err(err.into()),
            _ => self
                .review
                .clone()
                .ok_or(AppError::Validation(ValidationError::NoActiveSession)),
        }
    }

    async fn round_trip(&mut self, ticket: Ticket) -> ApplyOutcome {
        let api = Arc::clone(&self.api);
        let settled = ticket.send(api.as_ref()).await;
        self.apply(settled)
    }

    // ========== 内部工具 ==========

    fn ticket(&self, seq: u64, call: ApiCall) -> Ticket {
        Ticket {
            epoch: self.epoch,
            seq,
            token: self.auth.current_token(),
            call,
        }
    }

    fn bump_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn session_mut(&mut self) -> AppResult<&mut Session> {
        self.session
            .as_mut()
            .ok_or(AppError::Validation(ValidationError::NoActiveSession))
    }
}

fn validate_stage_input(stage: FeedbackStage, input: &str) -> Result<(), ValidationError> {
    if input.trim().is_empty() {
        return Err(ValidationError::EmptyStageInput {
            stage: stage.stage(),
        });
    }
    check_len(stage_field(stage), input, stage.max_input_len())
}

fn stage_field(stage: FeedbackStage) -> &'static str {
    match stage {
        FeedbackStage::Clarify => "澄清问题",
        FeedbackStage::BruteForce => "暴力解法思路",
        FeedbackStage::Optimize => "优化思路",
    }
}

fn check_len(field: &'static str, text: &str, max: usize) -> Result<(), ValidationError> {
    let len = text.chars().count();
    if len > max {
        Err(ValidationError::InputTooLong { field, len, max })
    } else {
        Ok(())
    }
}
