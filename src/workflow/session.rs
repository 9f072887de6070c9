//! 测验会话 - 流程层
//!
//! 核心职责：定义"一次测验"的状态流转
//!
//! ```text
//! Presenting(i) --submit/超时--> Resolved(i) --advance--> Presenting(i+1)
//!                                            \--advance--> Finished
//! ```
//!
//! 会话只有一个所有者，所有变更都通过 `&mut self` 串行进行。
//! 非法的状态转换不会报错，只返回 `Transition::Ignored`，
//! 这样计时器和手动提交同时到达时不会重复计分。

use crate::models::{AnsweredQuestion, Question, QuizResult};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tracing::debug;

/// 每题限时（秒）
pub const TIMER_SECONDS: u32 = 30;

/// 会话状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// 正在展示第 i 题，等待作答
    Presenting(usize),
    /// 第 i 题已作答（手动或超时），等待进入下一题
    Resolved(usize),
    /// 测验结束
    Finished,
}

/// 被忽略的状态转换
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidTransition {
    #[error("题目 {index} 已作答")]
    AlreadyResolved { index: usize },
    #[error("题目 {index} 尚未作答")]
    NotResolved { index: usize },
    #[error("测验已结束")]
    Finished,
}

/// 一次调用产生的状态转换
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// 计时器减少一秒
    Ticked { seconds_remaining: u32 },
    /// 当前题目已作答
    Resolved(AnsweredQuestion),
    /// 进入下一题
    Presented { index: usize },
    /// 测验结束，只会出现一次
    Finished(QuizResult),
    /// 当前状态不允许该操作，状态未改变
    Ignored(InvalidTransition),
}

impl Transition {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Transition::Ignored(_))
    }
}

/// 推送给订阅者的会话事件，顺序与状态转换顺序一致
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Presented {
        index: usize,
        total: usize,
        question: Question,
        options: Vec<String>,
        seconds_remaining: u32,
    },
    Ticked {
        index: usize,
        seconds_remaining: u32,
    },
    Resolved {
        index: usize,
        answer: AnsweredQuestion,
        score: u32,
    },
    Finished(QuizResult),
}

/// 测验会话
pub struct QuizSession {
    questions: Vec<Question>,
    state: SessionState,
    answers: Vec<AnsweredQuestion>,
    score: u32,
    seconds_remaining: u32,
    /// 每题的选项顺序，按题目索引存放，进入该题时生成一次
    options: Vec<Option<Vec<String>>>,
    result: Option<QuizResult>,
    rng: StdRng,
    subscribers: Vec<mpsc::UnboundedSender<SessionEvent>>,
}

impl QuizSession {
    /// 创建新的测验会话
    pub fn new(questions: Vec<Question>) -> Self {
        Self::with_rng(questions, StdRng::from_entropy())
    }

    /// 使用固定种子创建（选项顺序可复现）
    pub fn with_seed(questions: Vec<Question>, seed: u64) -> Self {
        Self::with_rng(questions, StdRng::seed_from_u64(seed))
    }

    fn with_rng(questions: Vec<Question>, rng: StdRng) -> Self {
        let total = questions.len();
        let mut session = Self {
            questions,
            state: SessionState::Finished,
            answers: Vec::with_capacity(total),
            score: 0,
            seconds_remaining: 0,
            options: vec![None; total],
            result: None,
            rng,
            subscribers: Vec::new(),
        };

        if total == 0 {
            // 没有题目：直接结束
            session.result = Some(QuizResult {
                score: 0,
                total: 0,
                answers: Vec::new(),
            });
        } else {
            session.enter(0);
        }
        session
    }

    // ========== 只读状态 ==========

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// 当前题目索引，结束后等于题目总数
    pub fn current_index(&self) -> usize {
        match self.state {
            SessionState::Presenting(i) | SessionState::Resolved(i) => i,
            SessionState::Finished => self.questions.len(),
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.state {
            SessionState::Presenting(i) | SessionState::Resolved(i) => self.questions.get(i),
            SessionState::Finished => None,
        }
    }

    /// 当前题目的选项（顺序固定）
    pub fn current_options(&self) -> Option<&[String]> {
        match self.state {
            SessionState::Presenting(i) | SessionState::Resolved(i) => {
                self.options.get(i).and_then(|o| o.as_deref())
            }
            SessionState::Finished => None,
        }
    }

    /// 按显示序号取选项
    pub fn option(&self, choice: usize) -> Option<&str> {
        self.current_options()
            .and_then(|opts| opts.get(choice))
            .map(String::as_str)
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.state, SessionState::Resolved(_))
    }

    pub fn is_finished(&self) -> bool {
        self.state == SessionState::Finished
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn answers(&self) -> &[AnsweredQuestion] {
        &self.answers
    }

    /// 测验结果，结束前为 None
    pub fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }

    pub fn into_result(self) -> Option<QuizResult> {
        self.result
    }

    // ========== 订阅 ==========

    /// 订阅会话事件
    ///
    /// 订阅时会先收到当前状态的快照事件
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<SessionEvent> {
        let (tx, rx) = mpsc::unbounded_channel();

        match self.state {
            SessionState::Presenting(i) => {
                let _ = tx.send(self.presented_event(i));
            }
            SessionState::Resolved(i) => {
                let _ = tx.send(self.presented_event(i));
                if let Some(answer) = self.answers.last() {
                    let _ = tx.send(SessionEvent::Resolved {
                        index: i,
                        answer: answer.clone(),
                        score: self.score,
                    });
                }
            }
            SessionState::Finished => {
                if let Some(result) = &self.result {
                    let _ = tx.send(SessionEvent::Finished(result.clone()));
                }
            }
        }

        self.subscribers.push(tx);
        rx
    }

    fn emit(&mut self, event: SessionEvent) {
        // 丢弃已关闭的订阅
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn presented_event(&self, index: usize) -> SessionEvent {
        SessionEvent::Presented {
            index,
            total: self.questions.len(),
            question: self.questions[index].clone(),
            options: self.options[index].clone().unwrap_or_default(),
            seconds_remaining: self.seconds_remaining,
        }
    }

    // ========== 状态转换 ==========

    /// 进入第 index 题：重置计时器，首次进入时生成选项顺序
    fn enter(&mut self, index: usize) {
        self.state = SessionState::Presenting(index);
        self.seconds_remaining = TIMER_SECONDS;

        if self.options[index].is_none() {
            let mut answers = self.questions[index].all_answers();
            answers.shuffle(&mut self.rng);
            self.options[index] = Some(answers);
        }

        let event = self.presented_event(index);
        self.emit(event);
    }

    /// 计时器前进一秒，归零时按超时提交
    pub fn tick(&mut self) -> Transition {
        let index = match self.state {
            SessionState::Presenting(i) => i,
            SessionState::Resolved(i) => {
                return self.ignore(InvalidTransition::AlreadyResolved { index: i })
            }
            SessionState::Finished => return self.ignore(InvalidTransition::Finished),
        };

        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        self.emit(SessionEvent::Ticked {
            index,
            seconds_remaining: self.seconds_remaining,
        });

        if self.seconds_remaining == 0 {
            debug!("题目 {} 超时", index + 1);
            return self.submit_answer(None);
        }

        Transition::Ticked {
            seconds_remaining: self.seconds_remaining,
        }
    }

    /// 提交答案，None 表示超时
    ///
    /// 已作答或已结束时不做任何改变
    pub fn submit_answer(&mut self, answer: Option<&str>) -> Transition {
        let index = match self.state {
            SessionState::Presenting(i) => i,
            SessionState::Resolved(i) => {
                return self.ignore(InvalidTransition::AlreadyResolved { index: i })
            }
            SessionState::Finished => return self.ignore(InvalidTransition::Finished),
        };

        let question = &self.questions[index];
        let is_correct = answer.map_or(false, |a| question.is_correct(a));
        let answered = AnsweredQuestion {
            question_prompt: question.prompt_html.clone(),
            chosen_answer: answer.map(str::to_string),
            correct_answer: question.correct_answer.clone(),
            is_correct,
        };

        self.answers.push(answered.clone());
        if is_correct {
            self.score += 1;
        }
        self.state = SessionState::Resolved(index);

        debug!(
            "题目 {} 作答: {:?} ({})",
            index + 1,
            answered.chosen_answer,
            if is_correct { "正确" } else { "错误" }
        );

        self.emit(SessionEvent::Resolved {
            index,
            answer: answered.clone(),
            score: self.score,
        });
        Transition::Resolved(answered)
    }

    /// 进入下一题，最后一题之后结束测验
    pub fn advance(&mut self) -> Transition {
        let index = match self.state {
            SessionState::Resolved(i) => i,
            SessionState::Presenting(i) => {
                return self.ignore(InvalidTransition::NotResolved { index: i })
            }
            SessionState::Finished => return self.ignore(InvalidTransition::Finished),
        };

        let next = index + 1;
        if next < self.questions.len() {
            self.enter(next);
            return Transition::Presented { index: next };
        }

        let result = QuizResult {
            score: self.score,
            total: self.questions.len() as u32,
            answers: self.answers.clone(),
        };
        self.state = SessionState::Finished;
        self.seconds_remaining = 0;
        self.result = Some(result.clone());

        self.emit(SessionEvent::Finished(result.clone()));
        Transition::Finished(result)
    }

    fn ignore(&self, reason: InvalidTransition) -> Transition {
        debug!("忽略状态转换: {}", reason);
        Transition::Ignored(reason)
    }
}
