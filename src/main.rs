use anyhow::Result;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use interview_coach::models::{Complexity, FeedbackStage, ReviewCategory, Stage};
use interview_coach::utils::{logging, truncate_text};
use interview_coach::{
    Command, Config, InterviewClient, RuntimeHandle, SessionRuntime, SessionView, StaticToken,
};

const HELP: &str = "\
命令:
  list                          加载题目列表
  start <id>                    选题开始会话
  go <stage>                    切换阶段 (question/clarify/brute/optimize/code/review)
  clarify <text>                提交澄清问题
  brute <time>;<space>;<idea>   提交暴力解法
  optimize <time>;<space>;<idea> 提交优化思路
  lang <language>               切换语言
  code <text>                   写入代码 (\\n 表示换行)
  run                           运行当前代码
  review                        提交评审
  restart                       重新开始
  quit                          退出";

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logging::init(&config.log_filter);
    logging::log_startup(&config);

    let api = Arc::new(InterviewClient::new(&config)?);
    let auth = Arc::new(StaticToken::new(config.auth_token.clone()));
    let mut handle = SessionRuntime::spawn(&config, api, auth);

    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let command = match parse_command(line) {
            Ok(Some(command)) => command,
            Ok(None) => break,
            Err(message) => {
                println!("⚠️ {}", message);
                println!("{}", HELP);
                continue;
            }
        };

        let view = execute(&mut handle, command).await?;
        print_view(&view);
    }

    handle.shutdown().await?;
    Ok(())
}

/// 发送命令并等待所有请求落定
async fn execute(handle: &mut RuntimeHandle, command: Command) -> Result<SessionView> {
    let view = handle.request(command).await?;
    if !view.is_busy() {
        return Ok(view);
    }
    handle.wait_for(|view| !view.is_busy()).await
}

/// 解析一行输入；`quit` 返回 `None`
fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    let command = match head {
        "quit" | "exit" => return Ok(None),
        "list" => Command::LoadQuestions,
        "start" => Command::StartSession(
            rest.parse()
                .map_err(|_| format!("无效的题目编号: {}", rest))?,
        ),
        "go" => Command::SelectStage(rest.parse()?),
        "clarify" => Command::SubmitStage {
            stage: FeedbackStage::Clarify,
            input: rest.to_string(),
            complexity: None,
        },
        "brute" => idea_command(FeedbackStage::BruteForce, rest)?,
        "optimize" => idea_command(FeedbackStage::Optimize, rest)?,
        "lang" => Command::SelectLanguage(rest.parse()?),
        "code" => Command::SetCode(rest.replace("\\n", "\n")),
        "run" => Command::RunCode,
        "review" => Command::SubmitReview,
        "restart" => Command::Restart,
        other => return Err(format!("未知命令: {}", other)),
    };
    Ok(Some(command))
}

fn idea_command(stage: FeedbackStage, rest: &str) -> Result<Command, String> {
    let mut parts = rest.splitn(3, ';').map(str::trim);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(time), Some(space), Some(idea)) => Ok(Command::SubmitStage {
            stage,
            input: idea.to_string(),
            complexity: Some(Complexity::new(time, space)),
        }),
        _ => Err("格式: <time>;<space>;<idea>".to_string()),
    }
}

fn print_view(view: &SessionView) {
    println!("{}", "-".repeat(60));
    println!(
        "阶段: {} | 语言: {} | 剩余: {}s ({:?})",
        view.active_stage, view.language, view.timer.remaining_secs, view.timer.state
    );

    if let Some(notice) = &view.notice {
        println!("⚠️ {}", notice);
    }

    if view.question.is_none() && !view.questions.is_empty() {
        for summary in &view.questions {
            println!("  #{} {}", summary.id, summary.title);
        }
    }
    if let Some(error) = &view.question_error {
        println!("❌ {}", error);
    }

    let Some(session) = &view.session else {
        return;
    };
    if let Some(question) = &view.question {
        println!("📖 #{} {}", question.id, question.title);
    }

    for stage in FeedbackStage::ALL {
        let slot = session.stage(stage);
        if slot.feedback.shown {
            println!("💬 {}: {}", stage, truncate_text(&slot.feedback.text, 300));
        }
        if let Some(error) = &slot.error {
            println!("❌ {}: {}", stage, error);
        }
    }

    if !session.code.code.is_empty() {
        println!("💻 代码:\n{}", session.code.code);
    }
    if let Some(output) = &session.code.last_output {
        println!("▶️ 输出:\n{}", output);
    }
    if let Some(error) = &session.review.error {
        println!("❌ 评审: {}", error);
    }

    if view.active_stage == Stage::Review && view.review.is_none() {
        println!("📊 暂无评审");
    }
    if let Some(review) = &view.review {
        for category in ReviewCategory::ALL {
            println!(
                "📊 {}: {} | {}",
                category,
                review.score(category),
                review.feedback(category)
            );
        }
        println!("✅ 总分: {}", review.total_score);
        for takeaway in &review.key_takeaways {
            println!("  • {}", takeaway);
        }
    }
}
