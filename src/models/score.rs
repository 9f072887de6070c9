use crate::models::question::AnsweredQuestion;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// 排行榜日期显示格式
pub const DATE_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// 计算百分比（向下取整），总题数为 0 时为 0
pub fn percentage(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    // 防止 correct > total 时超过 100
    ((correct.min(total) as u64 * 100) / total as u64) as u32
}

/// 成绩文本，如 "8/10"
pub fn score_text(correct: u32, total: u32) -> String {
    format!("{}/{}", correct, total)
}

/// 一次测验的最终结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub score: u32,
    pub total: u32,
    pub answers: Vec<AnsweredQuestion>,
}

impl QuizResult {
    /// 空测验（0 题）没有百分比
    pub fn percentage(&self) -> Option<u32> {
        (self.total > 0).then(|| percentage(self.score, self.total))
    }

    pub fn performance(&self) -> Option<Performance> {
        self.percentage().map(Performance::from_percentage)
    }
}

/// 成绩评价
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Performance {
    /// 低于 40%
    KeepPracticing,
    /// 40% 到 69%
    GoodEffort,
    /// 70% 及以上
    GreatJob,
}

impl Performance {
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            p if p < 40 => Performance::KeepPracticing,
            p if p < 70 => Performance::GoodEffort,
            _ => Performance::GreatJob,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Performance::KeepPracticing => "继续加油！",
            Performance::GoodEffort => "表现不错！",
            Performance::GreatJob => "太棒了！",
        }
    }
}

/// 持久化的成绩记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub player: String,
    pub category: String,
    pub difficulty: String,
    pub score_text: String,
    pub percentage: u32,
    pub timestamp: DateTime<Utc>,
}

impl ScoreRecord {
    pub fn new(
        player: impl Into<String>,
        category: impl Into<String>,
        difficulty: impl Into<String>,
        correct: u32,
        total: u32,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            player: player.into(),
            category: category.into(),
            difficulty: difficulty.into(),
            score_text: score_text(correct, total),
            percentage: percentage(correct, total),
            timestamp,
        }
    }
}

/// 排行榜中的一行（只用于显示，不持久化）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreEntry {
    pub rank: usize,
    pub player: String,
    pub category: String,
    pub difficulty: String,
    pub score_text: String,
    pub percentage: u32,
    pub date: String,
}

impl ScoreEntry {
    pub fn from_record(rank: usize, record: &ScoreRecord) -> Self {
        Self {
            rank,
            player: record.player.clone(),
            category: record.category.clone(),
            difficulty: record.difficulty.clone(),
            score_text: record.score_text.clone(),
            percentage: record.percentage,
            date: record
                .timestamp
                .with_timezone(&Local)
                .format(DATE_FORMAT)
                .to_string(),
        }
    }
}
