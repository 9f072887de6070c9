//! 测验上下文
//!
//! 封装"谁在答哪个分类、哪个难度的题"这一信息

use crate::error::{AppResult, BusinessError};
use crate::models::{category_label, Category, Difficulty};
use std::fmt::Display;

/// 测验上下文
#[derive(Debug, Clone)]
pub struct QuizCtx {
    /// 玩家名称（已去除首尾空白）
    pub player: String,

    /// 选择的分类（None 表示任意分类）
    pub category: Option<Category>,

    /// 选择的难度（None 表示任意难度）
    pub difficulty: Option<Difficulty>,
}

impl QuizCtx {
    /// 创建新的测验上下文，玩家名称不能为空
    pub fn new(
        player: &str,
        category: Option<Category>,
        difficulty: Option<Difficulty>,
    ) -> AppResult<Self> {
        let player = player.trim();
        if player.is_empty() {
            return Err(BusinessError::EmptyPlayerName.into());
        }

        Ok(Self {
            player: player.to_string(),
            category,
            difficulty,
        })
    }

    /// 分类显示名称，记录到排行榜
    pub fn category_label(&self) -> String {
        category_label(self.category.as_ref())
    }

    /// 难度显示名称，记录到排行榜
    pub fn difficulty_label(&self) -> String {
        Difficulty::label(self.difficulty)
    }
}

impl Display for QuizCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[玩家 {} 分类#{} 难度#{}]",
            self.player,
            self.category_label(),
            self.difficulty_label()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_player_rejected() {
        assert!(QuizCtx::new("   ", None, None).is_err());
    }

    #[test]
    fn test_labels() {
        let ctx = QuizCtx::new(
            " Ann ",
            Some(Category {
                id: 17,
                name: "Science & Nature".to_string(),
            }),
            None,
        )
        .unwrap();
        assert_eq!(ctx.player, "Ann");
        assert_eq!(ctx.category_label(), "Science & Nature");
        assert_eq!(ctx.difficulty_label(), "Any");
        assert_eq!(ctx.to_string(), "[玩家 Ann 分类#Science & Nature 难度#Any]");
    }
}
