//! 测验驱动器 - 编排层
//!
//! ## 职责
//!
//! 把计时器、玩家输入和自动进入下一题串行化到同一个 `select!` 循环中驱动 `QuizSession`：
//!
//! 1. **计时**：展示题目时每秒调用一次 `tick()`，进入新题目时重新计时
//! 2. **作答**：把玩家输入的选项序号转换为选项文本后提交
//! 3. **前进**：作答后等待 `advance_delay` 再调用 `advance()`
//! 4. **取消**：作用域被取消或玩家退出时放弃本次测验

use crate::config::Config;
use crate::models::QuizResult;
use crate::orchestrator::scope::ScopeHandle;
use crate::utils::truncate_text;
use crate::workflow::{QuizSession, SessionState};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval_at, sleep_until, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// 玩家输入
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerInput {
    /// 选择第 n 个选项（从 0 开始）
    Choice(usize),
    /// 放弃本次测验
    Quit,
}

/// 测验驱动器
pub struct QuizRunner {
    tick_interval: Duration,
    advance_delay: Duration,
}

impl QuizRunner {
    pub fn new(config: &Config) -> Self {
        Self::with_timing(
            Duration::from_secs(1),
            Duration::from_millis(config.advance_delay_ms),
        )
    }

    pub fn with_timing(tick_interval: Duration, advance_delay: Duration) -> Self {
        Self {
            tick_interval,
            advance_delay,
        }
    }

    /// 驱动会话直到结束
    ///
    /// # 参数
    /// - `session`: 测验会话
    /// - `input`: 玩家输入通道
    /// - `scope`: 生命周期作用域
    ///
    /// # 返回
    /// 正常结束返回测验结果；被取消或玩家退出返回 None
    pub async fn run(
        &self,
        session: &mut QuizSession,
        input: &mut mpsc::Receiver<PlayerInput>,
        scope: &ScopeHandle,
    ) -> Option<QuizResult> {
        let mut input_open = true;

        loop {
            match session.state() {
                SessionState::Finished => return session.result().cloned(),
                SessionState::Presenting(index) => {
                    if !self
                        .present(session, index, input, &mut input_open, scope)
                        .await
                    {
                        return None;
                    }
                }
                SessionState::Resolved(_) => {
                    if !self.wait_and_advance(session, input, &mut input_open, scope).await {
                        return None;
                    }
                }
            }
        }
    }

    /// 展示第 index 题直到作答或超时，返回 false 表示中止
    async fn present(
        &self,
        session: &mut QuizSession,
        index: usize,
        input: &mut mpsc::Receiver<PlayerInput>,
        input_open: &mut bool,
        scope: &ScopeHandle,
    ) -> bool {
        let mut ticker = interval_at(Instant::now() + self.tick_interval, self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while session.state() == SessionState::Presenting(index) {
            tokio::select! {
                biased;
                _ = scope.cancelled() => {
                    info!("测验已取消");
                    return false;
                }
                received = input.recv(), if *input_open => match received {
                    Some(PlayerInput::Choice(choice)) => {
                        match session.option(choice).map(str::to_string) {
                            Some(answer) => {
                                debug!("第 {} 题选择: {}", index + 1, truncate_text(&answer, 40));
                                session.submit_answer(Some(&answer));
                            }
                            None => debug!("无效选项: {}", choice + 1),
                        }
                    }
                    Some(PlayerInput::Quit) => {
                        info!("玩家放弃了测验");
                        return false;
                    }
                    None => *input_open = false,
                },
                _ = ticker.tick() => {
                    session.tick();
                }
            }
        }
        true
    }

    /// 作答后等待一段时间再进入下一题，返回 false 表示中止
    async fn wait_and_advance(
        &self,
        session: &mut QuizSession,
        input: &mut mpsc::Receiver<PlayerInput>,
        input_open: &mut bool,
        scope: &ScopeHandle,
    ) -> bool {
        let deadline = Instant::now() + self.advance_delay;

        loop {
            tokio::select! {
                biased;
                _ = scope.cancelled() => return false,
                received = input.recv(), if *input_open => match received {
                    // 已作答，丢弃多余的输入
                    Some(PlayerInput::Choice(choice)) => {
                        debug!("已作答，忽略选项: {}", choice + 1);
                    }
                    Some(PlayerInput::Quit) => return false,
                    None => *input_open = false,
                },
                _ = sleep_until(deadline) => {
                    session.advance();
                    return true;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, Question};
    use crate::orchestrator::scope::Scope;
    use crate::workflow::TIMER_SECONDS;

    fn question(correct: &str) -> Question {
        Question {
            category: "Geography".to_string(),
            kind: "multiple".to_string(),
            difficulty: Difficulty::Easy,
            prompt_html: format!("Answer is {}", correct),
            correct_answer: correct.to_string(),
            incorrect_answers: vec!["x".to_string(), "y".to_string(), "z".to_string()],
        }
    }

    fn runner() -> QuizRunner {
        QuizRunner::with_timing(Duration::from_secs(1), Duration::from_millis(1500))
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_when_no_input() {
        let mut session = QuizSession::with_seed(vec![question("a")], 1);
        let (_tx, mut rx) = mpsc::channel(8);
        let scope = Scope::new();

        let start = Instant::now();
        let result = runner().run(&mut session, &mut rx, &scope.handle()).await.unwrap();

        assert_eq!(result.score, 0);
        assert_eq!(result.answers[0].chosen_answer, None);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(TIMER_SECONDS as u64));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_choice_is_ignored() {
        let mut session = QuizSession::with_seed(vec![question("a")], 1);
        let correct = session
            .current_options()
            .unwrap()
            .iter()
            .position(|o| o == "a")
            .unwrap();

        let (tx, mut rx) = mpsc::channel(8);
        tx.send(PlayerInput::Choice(17)).await.unwrap();
        tx.send(PlayerInput::Choice(correct)).await.unwrap();
        drop(tx);

        let scope = Scope::new();
        let result = runner().run(&mut session, &mut rx, &scope.handle()).await.unwrap();
        assert_eq!(result.score, 1);
        assert_eq!(result.answers.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quit_abandons_session() {
        let mut session = QuizSession::with_seed(vec![question("a"), question("b")], 1);
        let (tx, mut rx) = mpsc::channel(8);
        tx.send(PlayerInput::Quit).await.unwrap();

        let scope = Scope::new();
        assert!(runner().run(&mut session, &mut rx, &scope.handle()).await.is_none());
        assert!(!session.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_scope_discards_session() {
        let mut session = QuizSession::with_seed(vec![question("a")], 1);
        let (_tx, mut rx) = mpsc::channel(8);
        let scope = Scope::new();
        let handle = scope.handle();
        scope.cancel();

        assert!(runner().run(&mut session, &mut rx, &handle).await.is_none());
        assert!(session.answers().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_extra_choice_after_answer_is_dropped() {
        let mut session = QuizSession::with_seed(vec![question("a"), question("b")], 1);
        let wrong = session
            .current_options()
            .unwrap()
            .iter()
            .position(|o| o != "a")
            .unwrap();

        let (tx, mut rx) = mpsc::channel(8);
        tx.send(PlayerInput::Choice(wrong)).await.unwrap();
        // 第一题作答后等待期间到达，不能被带到第二题
        tx.send(PlayerInput::Choice(0)).await.unwrap();

        let scope = Scope::new();
        let result = runner().run(&mut session, &mut rx, &scope.handle()).await.unwrap();
        assert_eq!(result.answers.len(), 2);
        assert!(!result.answers[0].is_correct);
        assert!(result.answers[1].timed_out());
    }
}
