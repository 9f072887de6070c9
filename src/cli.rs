use crate::models::Difficulty;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "trivial-quiz")]
#[command(about = "Timed trivia quizzes with a local leaderboard", long_about = None)]
pub struct Cli {
    /// TOML 配置文件
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// 开始一次测验
    Play {
        /// 玩家名称
        #[arg(long)]
        player: String,
        /// 分类 ID（见 categories 命令）
        #[arg(long)]
        category: Option<u32>,
        #[arg(long, value_enum)]
        difficulty: Option<Difficulty>,
        /// 题目数量，默认取配置
        #[arg(long)]
        amount: Option<u32>,
    },
    /// 列出全部分类
    Categories,
    /// 查看排行榜
    Leaderboard {
        /// 按分类名称筛选
        #[arg(long)]
        category: Option<String>,
        /// 按难度名称筛选（Easy / Medium / Hard / Any）
        #[arg(long)]
        difficulty: Option<String>,
    },
    /// 清空排行榜
    Clear,
}
