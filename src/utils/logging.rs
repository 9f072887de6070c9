/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use crate::config::Config;
use crate::models::QuizResult;
use crate::workflow::QuizCtx;
use tracing::info;

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 知识问答");
    info!("🌐 题库地址: {}", config.api_base_url);
    info!("💾 排行榜文件: {}", config.scores_file);
    info!("{}", "=".repeat(60));
}

/// 记录测验开始信息
///
/// # 参数
/// - `ctx`: 测验上下文
/// - `total`: 题目总数
pub fn log_quiz_start(ctx: &QuizCtx, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📝 {} 开始测验", ctx);
    info!("📄 共 {} 道题，每题限时 {} 秒", total, crate::workflow::TIMER_SECONDS);
    info!("{}", "=".repeat(60));
}

/// 记录测验结果
///
/// # 参数
/// - `ctx`: 测验上下文
/// - `result`: 测验结果
pub fn log_quiz_result(ctx: &QuizCtx, result: &QuizResult) {
    info!("\n{}", "─".repeat(60));
    info!("📊 {} 测验完成", ctx);
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    match result.percentage() {
        Some(p) => info!("✅ 得分: {}/{} ({}%)", result.score, result.total, p),
        None => info!("⚠️ 本次测验没有题目"),
    }
    let timed_out = result.answers.iter().filter(|a| a.timed_out()).count();
    if timed_out > 0 {
        info!("⏰ 超时未作答: {}", timed_out);
    }
    info!("{}", "─".repeat(60));
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
