//! # Trivial Quiz
//!
//! 一个带倒计时的终端知识问答程序，题目来自 Open Trivia DB，成绩保存在本地排行榜
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Clients）
//! - `clients/` - 与外部题库通信
//! - `TriviaClient` - 获取分类和题目的 HTTP 客户端
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `QuestionSource` - 取题能力，失败时回退为不带筛选条件的查询
//! - `ScoreStore` - 成绩持久化能力
//! - `LeaderboardEngine` - 排序与编号能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次测验"的完整状态机
//! - `QuizCtx` - 上下文封装（玩家 + 分类 + 难度）
//! - `QuizSession` - 展示 → 作答/超时 → 下一题 → 结束
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 组装依赖并分发命令
//! - `orchestrator/quiz_runner` - 驱动计时器和玩家输入
//!
//! ## 模块结构

pub mod cli;
pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{Category, Difficulty, Question, QuizResult, ScoreEntry, ScoreRecord};
pub use orchestrator::{App, PlayOptions, PlayerInput};
pub use services::{LeaderboardEngine, QuestionSource, ScoreStore};
pub use workflow::{QuizCtx, QuizSession, SessionEvent, SessionState, Transition};
