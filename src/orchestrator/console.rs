//! 终端界面
//!
//! 订阅会话事件并打印题目、倒计时和作答结果；读取玩家的键盘输入

use crate::models::{QuizResult, ScoreEntry};
use crate::orchestrator::quiz_runner::PlayerInput;
use crate::utils::decode_html;
use crate::workflow::{QuizCtx, SessionEvent};
use std::io::BufRead;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// 需要提示剩余时间的秒数
const COUNTDOWN_MARKS: [u32; 5] = [20, 10, 5, 3, 1];

/// 启动渲染任务，会话被丢弃后任务结束
pub fn spawn_renderer(mut events: mpsc::UnboundedReceiver<SessionEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            render_event(&event);
        }
    })
}

/// 打印单个会话事件
pub fn render_event(event: &SessionEvent) {
    match event {
        SessionEvent::Presented {
            index,
            total,
            question,
            options,
            seconds_remaining,
        } => {
            println!();
            println!("{}", "─".repeat(60));
            println!(
                "第 {}/{} 题  [{} · {}]  ⏱ {} 秒",
                index + 1,
                total,
                decode_html(&question.category),
                question.difficulty,
                seconds_remaining
            );
            println!("{}", question.prompt_text());
            for (i, option) in options.iter().enumerate() {
                println!("  {}. {}", i + 1, decode_html(option));
            }
            println!("输入选项序号作答，输入 q 退出");
        }
        SessionEvent::Ticked {
            seconds_remaining, ..
        } => {
            if COUNTDOWN_MARKS.contains(seconds_remaining) {
                println!("⏰ 剩余 {} 秒", seconds_remaining);
            }
        }
        SessionEvent::Resolved { answer, score, .. } => {
            match (&answer.chosen_answer, answer.is_correct) {
                (None, _) => println!(
                    "⌛ 时间到！正确答案: {}",
                    decode_html(&answer.correct_answer)
                ),
                (Some(_), true) => println!("✅ 回答正确！当前得分: {}", score),
                (Some(chosen), false) => println!(
                    "❌ 回答错误: {}，正确答案: {}",
                    decode_html(chosen),
                    decode_html(&answer.correct_answer)
                ),
            }
        }
        SessionEvent::Finished(_) => {
            println!("{}", "─".repeat(60));
        }
    }
}

/// 打印测验结果与每题回顾
pub fn print_result(ctx: &QuizCtx, result: &QuizResult) {
    println!();
    println!("{}", "=".repeat(60));
    println!("📊 {} 的测验结果", ctx.player);
    println!("分类: {}  难度: {}", ctx.category_label(), ctx.difficulty_label());

    let (percentage, performance) = match (result.percentage(), result.performance()) {
        (Some(p), Some(perf)) => (p, perf),
        _ => {
            println!("⚠️ 没有可用的题目，请稍后再试");
            println!("{}", "=".repeat(60));
            return;
        }
    };

    println!(
        "得分: {}/{} ({}%)  {}",
        result.score,
        result.total,
        percentage,
        performance.message()
    );
    println!("{}", "=".repeat(60));

    for (i, answer) in result.answers.iter().enumerate() {
        let mark = if answer.is_correct { "✅" } else { "❌" };
        println!("{} {}. {}", mark, i + 1, decode_html(&answer.question_prompt));
        let chosen = answer
            .chosen_answer
            .as_deref()
            .map(decode_html)
            .unwrap_or_else(|| "未作答".to_string());
        println!("     你的答案: {}", chosen);
        if !answer.is_correct {
            println!("     正确答案: {}", decode_html(&answer.correct_answer));
        }
    }
}

/// 打印排行榜，第一名高亮
pub fn print_leaderboard(entries: &[ScoreEntry]) {
    println!();
    println!("{}", "=".repeat(60));
    println!("🏆 排行榜");
    println!("{}", "=".repeat(60));

    if entries.is_empty() {
        println!("暂无成绩");
        return;
    }

    for entry in entries {
        let marker = if entry.rank == 1 { "👑" } else { "  " };
        println!(
            "{} #{:<3} {:<16} {:>6} {:>4}%  {} · {}  {}",
            marker,
            entry.rank,
            entry.player,
            entry.score_text,
            entry.percentage,
            entry.category,
            entry.difficulty,
            entry.date
        );
    }
}

/// 解析一行输入：数字为选项（从 1 开始），q 为退出
pub fn parse_input(line: &str) -> Option<PlayerInput> {
    let line = line.trim();
    if line.eq_ignore_ascii_case("q") {
        return Some(PlayerInput::Quit);
    }
    match line.parse::<usize>() {
        Ok(n) if n >= 1 => Some(PlayerInput::Choice(n - 1)),
        _ => None,
    }
}

/// 在独立线程中读取标准输入
///
/// 交互式输入使用阻塞读取，不占用运行时的阻塞线程池
pub fn spawn_stdin_reader(tx: mpsc::Sender<PlayerInput>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match parse_input(&line) {
                Some(input) => {
                    let quit = input == PlayerInput::Quit;
                    if tx.blocking_send(input).is_err() || quit {
                        break;
                    }
                }
                None => println!("请输入选项序号，或输入 q 退出"),
            }
        }
    });
}
