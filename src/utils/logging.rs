/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::models::{Review, ReviewCategory};

/// 初始化日志
///
/// `RUST_LOG` 存在时优先使用，否则使用传入的过滤规则。重复调用不会报错。
///
/// # 参数
/// - `default_filter`: 默认过滤规则，例如 `info` 或 `interview_coach=debug`
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 模拟面试会话启动");
    info!("🌐 服务地址: {}", config.api_base_url);
    info!(
        "⏱️ 面试时长: {} 分钟 | 默认语言: {}",
        config.time_budget_secs / 60,
        config.default_language
    );
    info!("{}", "=".repeat(60));
}

/// 打印评审结果
pub fn log_review(review: &Review) {
    info!("\n{}", "=".repeat(60));
    info!("📊 面试评审");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    for category in ReviewCategory::ALL {
        info!(
            "{}: {} 分 | {}",
            category,
            review.score(category),
            truncate_text(review.feedback(category), 60)
        );
    }
    info!("✅ 总分: {}", review.total_score);
    info!("📝 逐行问题: {} 条", review.line_issues.len());
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
