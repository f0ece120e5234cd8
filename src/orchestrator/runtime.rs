//! 会话运行时 - 编排层
//!
//! ## 职责
//!
//! 把 [`SessionOrchestrator`] 放进一个独立的 tokio 任务，用一个事件循环同时处理：
//!
//! 1. **用户命令**：来自 [`RuntimeHandle::send`] 或 [`RuntimeHandle::request`]
//! 2. **请求完成**：每个 [`Ticket`] 各自 spawn，完成后把 [`Settled`] 送回循环
//! 3. **计时器滴答**：由计时器后台任务每秒发送
//!
//! 每处理完一个事件，就通过 `watch` 通道发布一次新的 [`SessionView`]。
//! 会话状态只在这个循环里被修改。

use anyhow::{anyhow, Result};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::auth::AuthGate;
use crate::clients::InterviewApi;
use crate::config::Config;
use crate::error::{AppResult, ValidationError};
use crate::models::{Complexity, FeedbackStage, Language, QuestionId, Stage};
use crate::orchestrator::session_orchestrator::{
    ApplyOutcome, Outcome, SessionOrchestrator, Settled, Ticket,
};
use crate::orchestrator::view::SessionView;
use crate::utils::logging::log_review;
use crate::workflow::{TickOutcome, TimerTick};

const COMMAND_BUFFER: usize = 64;

/// 用户命令
#[derive(Debug, Clone)]
pub enum Command {
    LoadQuestions,
    StartSession(QuestionId),
    SelectStage(Stage),
    SetInput(FeedbackStage, String),
    SetComplexity(FeedbackStage, Complexity),
    SubmitStage {
        stage: FeedbackStage,
        input: String,
        complexity: Option<Complexity>,
    },
    SelectLanguage(Language),
    SetCode(String),
    /// 运行编辑器里的当前代码
    RunCode,
    SubmitReview,
    Restart,
    /// 取消计时并退出循环
    Shutdown,
}

/// 命令及可选的处理回执
struct Envelope {
    command: Command,
    ack: Option<oneshot::Sender<()>>,
}

/// 运行时句柄
pub struct RuntimeHandle {
    commands: mpsc::Sender<Envelope>,
    view: watch::Receiver<SessionView>,
    task: JoinHandle<()>,
}

impl RuntimeHandle {
    pub async fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(Envelope { command, ack: None })
            .await
            .map_err(|_| anyhow!("会话运行时已关闭"))
    }

    /// 发送命令，等运行时处理并发布快照后返回该快照
    ///
    /// 返回的快照一定已经反映了这条命令，不会是计时器滴答等更早的事件
    pub async fn request(&self, command: Command) -> Result<SessionView> {
        let (ack, handled) = oneshot::channel();
        self.commands
            .send(Envelope {
                command,
                ack: Some(ack),
            })
            .await
            .map_err(|_| anyhow!("会话运行时已关闭"))?;
        handled.await.map_err(|_| anyhow!("会话运行时已关闭"))?;
        Ok(self.view())
    }

    /// 当前快照
    pub fn view(&self) -> SessionView {
        self.view.borrow().clone()
    }

    /// 等待直到快照满足条件
    pub async fn wait_for(
        &mut self,
        predicate: impl FnMut(&SessionView) -> bool,
    ) -> Result<SessionView> {
        let view = self
            .view
            .wait_for(predicate)
            .await
            .map_err(|_| anyhow!("会话运行时已关闭"))?;
        Ok(view.clone())
    }

    /// 通知运行时退出并等待任务结束
    pub async fn shutdown(self) -> Result<()> {
        // 循环已退出时发送会失败，直接等待任务即可
        let _ = self.send(Command::Shutdown).await;
        self.task.await?;
        Ok(())
    }
}

/// 会话运行时
pub struct SessionRuntime {
    orchestrator: SessionOrchestrator,
    api: Arc<dyn InterviewApi>,
    commands: mpsc::Receiver<Envelope>,
    settled_tx: mpsc::UnboundedSender<Settled>,
    settled_rx: mpsc::UnboundedReceiver<Settled>,
    ticks: mpsc::UnboundedReceiver<TimerTick>,
    view: watch::Sender<SessionView>,
    notice: Option<String>,
}

impl SessionRuntime {
    /// 创建运行时并在后台启动事件循环
    pub fn spawn(
        config: &Config,
        api: Arc<dyn InterviewApi>,
        auth: Arc<dyn AuthGate>,
    ) -> RuntimeHandle {
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();

        let orchestrator =
            SessionOrchestrator::new(config, Arc::clone(&api), auth).with_tick_sink(tick_tx);
        let (view_tx, view_rx) = watch::channel(orchestrator.view());

        let runtime = Self {
            orchestrator,
            api,
            commands: command_rx,
            settled_tx,
            settled_rx,
            ticks: tick_rx,
            view: view_tx,
            notice: None,
        };
        let task = tokio::spawn(runtime.run());

        RuntimeHandle {
            commands: command_tx,
            view: view_rx,
            task,
        }
    }

    async fn run(mut self) {
        info!("🚀 会话运行时已启动");

        loop {
            let mut ack = None;
            tokio::select! {
                envelope = self.commands.recv() => match envelope {
                    Some(Envelope { command: Command::Shutdown, .. }) | None => break,
                    Some(envelope) => {
                        self.handle(envelope.command);
                        ack = envelope.ack;
                    }
                },
                Some(settled) = self.settled_rx.recv() => self.on_settled(settled),
                Some(tick) = self.ticks.recv() => self.on_tick(tick),
            }
            self.publish();
            if let Some(ack) = ack {
                let _ = ack.send(());
            }
        }

        self.orchestrator.shutdown();
        self.publish();
        info!("🛑 会话运行时已退出");
    }

    fn handle(&mut self, command: Command) {
        debug!("{} 收到命令: {:?}", self.orchestrator.ctx(), command);
        self.notice = None;

        let orchestrator = &mut self.orchestrator;
        let result: AppResult<Option<Ticket>> = match command {
            Command::LoadQuestions => Ok(Some(orchestrator.dispatch_list_questions())),
            Command::StartSession(question_id) => {
                Ok(Some(orchestrator.dispatch_start_session(question_id)))
            }
            Command::SelectStage(stage) => orchestrator.select_stage(stage).map(|_| None),
            Command::SetInput(stage, text) => orchestrator.set_input(stage, text).map(|_| None),
            Command::SetComplexity(stage, complexity) => orchestrator
                .set_complexity(stage, complexity)
                .map(|_| None),
            Command::SubmitStage {
                stage,
                input,
                complexity,
            } => orchestrator.dispatch_stage(stage, input, complexity).map(Some),
            Command::SelectLanguage(language) => Ok(orchestrator.dispatch_language(language)),
            Command::SetCode(code) => orchestrator.set_code(code).map(|_| None),
            Command::RunCode => match orchestrator.session().map(|s| s.code.code.clone()) {
                Some(code) => orchestrator.dispatch_run_code(code).map(Some),
                None => Err(ValidationError::NoActiveSession.into()),
            },
            Command::SubmitReview => orchestrator.dispatch_review().map(Some),
            Command::Restart => {
                orchestrator.restart();
                Ok(None)
            }
            Command::Shutdown => Ok(None),
        };

        match result {
            Ok(Some(ticket)) => self.spawn_ticket(ticket),
            Ok(None) => {}
            Err(err) => {
                warn!("{} ⚠️ {}", self.orchestrator.ctx(), err);
                self.notice = Some(err.inline_message());
            }
        }
    }

    fn on_settled(&mut self, settled: Settled) {
        let loaded_question = matches!(settled.outcome, Outcome::Question(Ok(_)));
        let reviewed = matches!(settled.outcome, Outcome::Review(Ok(_)));

        match self.orchestrator.apply(settled) {
            ApplyOutcome::Applied => {
                // 题目到达后按当前语言拉取骨架
                if loaded_question {
                    if let Some(ticket) = self.orchestrator.dispatch_skeleton() {
                        self.spawn_ticket(ticket);
                    }
                }
                if reviewed {
                    if let Some(review) = self.orchestrator.review() {
                        log_review(review);
                    }
                }
            }
            ApplyOutcome::Failed(err) => self.notice = Some(err.inline_message()),
            ApplyOutcome::Stale => {}
        }
    }

    fn on_tick(&mut self, tick: TimerTick) {
        if self.orchestrator.on_tick(tick) == TickOutcome::Expired {
            self.notice = Some("面试时间已到，仍可提交评审".to_string());
        }
    }

    fn spawn_ticket(&self, ticket: Ticket) {
        let api = Arc::clone(&self.api);
        let settled_tx = self.settled_tx.clone();
        tokio::spawn(async move {
            let settled = ticket.send(api.as_ref()).await;
            // 循环已退出时结果直接丢弃
            let _ = settled_tx.send(settled);
        });
    }

    fn publish(&self) {
        let mut view = self.orchestrator.view();
        view.notice = self.notice.clone();
        self.view.send_replace(view);
    }
}
