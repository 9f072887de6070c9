use crate::utils::html::decode_html;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 未选择难度时的显示名称
pub const ANY_DIFFICULTY_LABEL: &str = "Any";

/// 题目难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// API 查询参数值
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// 获取难度的显示名称，未选择时为 "Any"
    pub fn label(difficulty: Option<Difficulty>) -> String {
        difficulty
            .map(|d| d.display_name().to_string())
            .unwrap_or_else(|| ANY_DIFFICULTY_LABEL.to_string())
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// 选择题
///
/// 字段与 Open Trivia DB 的 `results` 元素一一对应，题干和选项都是 HTML 编码的原文
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub category: String,
    #[serde(rename = "type", default = "default_question_type")]
    pub kind: String,
    pub difficulty: Difficulty,
    #[serde(rename = "question")]
    pub prompt_html: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

fn default_question_type() -> String {
    "multiple".to_string()
}

impl Question {
    /// 解码后的题干，用于显示
    pub fn prompt_text(&self) -> String {
        decode_html(&self.prompt_html)
    }

    /// 全部选项（未打乱）：错误选项在前，正确答案在最后
    pub fn all_answers(&self) -> Vec<String> {
        let mut answers: Vec<String> = self
            .incorrect_answers
            .iter()
            .filter(|a| **a != self.correct_answer)
            .cloned()
            .collect();
        answers.push(self.correct_answer.clone());
        answers
    }

    pub fn is_correct(&self, answer: &str) -> bool {
        answer == self.correct_answer
    }
}

/// `api.php` 的响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionResponse {
    pub response_code: i64,
    #[serde(default)]
    pub results: Vec<Question>,
}

impl QuestionResponse {
    pub fn is_ok(&self) -> bool {
        self.response_code == 0
    }
}

/// 已作答的题目
///
/// `chosen_answer` 为 None 表示超时未作答
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnsweredQuestion {
    pub question_prompt: String,
    pub chosen_answer: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
}

impl AnsweredQuestion {
    pub fn timed_out(&self) -> bool {
        self.chosen_answer.is_none()
    }
}
