//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责组装依赖并分发命令。
//!
//! ## 核心功能
//!
//! 1. **依赖组装**：根据配置创建题库客户端、成绩存储和排行榜，显式注入而不是使用全局单例
//! 2. **测验流程**：取题 → 驱动会话 → 记录成绩 → 展示排行榜
//! 3. **生命周期**：所有异步请求和写入都在 `Scope` 内执行，应用关闭后结果被丢弃
//! 4. **错误吸收**：取题失败显示"无数据"，存储失败只给出提示，不中断程序

use crate::cli::Commands;
use crate::clients::{QuestionQuery, TriviaClient};
use crate::config::Config;
use crate::error::{AppError, BusinessError};
use crate::models::{Category, Difficulty, QuizResult, ScoreEntry};
use crate::orchestrator::console;
use crate::orchestrator::quiz_runner::{PlayerInput, QuizRunner};
use crate::orchestrator::scope::Scope;
use crate::services::leaderboard::{filter_by_category, filter_by_difficulty};
use crate::services::{
    JsonFileScoreStore, LeaderboardEngine, QuestionSource, ScoreStore, TriviaRepository,
};
use crate::utils::logging::{log_quiz_result, log_quiz_start};
use crate::workflow::{QuizCtx, QuizSession};
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// 一次测验的选项
#[derive(Debug, Clone, Default)]
pub struct PlayOptions {
    pub player: String,
    pub category: Option<u32>,
    pub difficulty: Option<Difficulty>,
    pub amount: Option<u32>,
}

/// 应用主结构
pub struct App {
    config: Config,
    source: Arc<dyn QuestionSource>,
    leaderboard: LeaderboardEngine,
    scope: Scope,
}

impl App {
    /// 根据配置初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        let client = TriviaClient::new(&config)?;
        let source: Arc<dyn QuestionSource> = Arc::new(TriviaRepository::new(client));
        let store: Arc<dyn ScoreStore> = Arc::new(JsonFileScoreStore::with_path(&config.scores_file));

        Ok(Self::with_components(config, source, store))
    }

    /// 使用外部提供的题目来源和成绩存储
    pub fn with_components(
        config: Config,
        source: Arc<dyn QuestionSource>,
        store: Arc<dyn ScoreStore>,
    ) -> Self {
        Self {
            config,
            source,
            leaderboard: LeaderboardEngine::new(store),
            scope: Scope::new(),
        }
    }

    pub fn leaderboard(&self) -> &LeaderboardEngine {
        &self.leaderboard
    }

    /// 关闭应用，丢弃所有未完成的请求和写入
    pub fn shutdown(&self) {
        self.scope.cancel();
    }

    /// 执行命令行命令
    pub async fn run(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Play {
                player,
                category,
                difficulty,
                amount,
            } => {
                let (tx, rx) = mpsc::channel(16);
                console::spawn_stdin_reader(tx);
                let options = PlayOptions {
                    player,
                    category,
                    difficulty,
                    amount,
                };
                if self.play(options, rx).await?.is_some() {
                    console::print_leaderboard(&self.leaderboard.current());
                }
            }
            Commands::Categories => {
                let categories = self.categories().await;
                if categories.is_empty() {
                    println!("⚠️ 暂时无法获取分类，请稍后再试");
                }
                for category in categories {
                    println!("{:>4}  {}", category.id, category.name);
                }
            }
            Commands::Leaderboard {
                category,
                difficulty,
            } => {
                self.show_leaderboard(category.as_deref(), difficulty.as_deref())
                    .await?;
            }
            Commands::Clear => {
                self.leaderboard.clear_all().await?;
                println!("🧹 排行榜已清空");
            }
        }
        Ok(())
    }

    /// 获取分类，失败时为空
    pub async fn categories(&self) -> Vec<Category> {
        self.scope
            .handle()
            .run(self.source.fetch_categories())
            .await
            .unwrap_or_default()
    }

    /// 进行一次测验
    ///
    /// # 参数
    /// - `options`: 玩家、分类、难度和题目数量
    /// - `input`: 玩家输入通道
    ///
    /// # 返回
    /// 完成时返回测验结果；被取消或玩家退出时返回 None
    pub async fn play(
        &self,
        options: PlayOptions,
        mut input: mpsc::Receiver<PlayerInput>,
    ) -> Result<Option<QuizResult>> {
        let scope = self.scope.handle();
        // 先校验玩家名称，避免无效输入触发网络请求
        QuizCtx::new(&options.player, None, None)?;
        let category = self.resolve_category(options.category).await?;
        let ctx = QuizCtx::new(&options.player, category, options.difficulty)?;

        // ========== 取题 ==========
        let mut query = QuestionQuery::from_config(&self.config)
            .with_category(ctx.category.as_ref().map(|c| c.id))
            .with_difficulty(ctx.difficulty);
        if let Some(amount) = options.amount {
            query.amount = amount;
        }

        info!("{} 🔍 正在获取题目...", ctx);
        let Some(questions) = scope.run(self.source.fetch_questions(&query)).await else {
            info!("取题已取消");
            return Ok(None);
        };

        if questions.is_empty() {
            warn!("⚠️ {}", BusinessError::NoQuestions);
        }

        // ========== 答题 ==========
        log_quiz_start(&ctx, questions.len());
        let mut session = QuizSession::new(questions);
        let renderer = console::spawn_renderer(session.subscribe());

        let runner = QuizRunner::new(&self.config);
        let outcome = runner.run(&mut session, &mut input, &scope).await;

        // 丢弃会话后渲染任务自然结束
        drop(session);
        let _ = renderer.await;

        let Some(result) = outcome else {
            info!("{} 测验未完成，不记录成绩", ctx);
            return Ok(None);
        };

        log_quiz_result(&ctx, &result);
        console::print_result(&ctx, &result);

        // ========== 记录成绩 ==========
        if result.total == 0 {
            info!("没有题目，不记录成绩");
        } else if !self.record_score(&ctx, &result).await? {
            return Ok(Some(result));
        }

        // 未记录或保存失败时，排行榜仍需反映存储中已有的成绩
        self.load_leaderboard().await;
        Ok(Some(result))
    }

    /// 保存成绩，返回 false 表示写入已被取消
    async fn record_score(&self, ctx: &QuizCtx, result: &QuizResult) -> Result<bool> {
        let category = ctx.category_label();
        let difficulty = ctx.difficulty_label();
        let write = self.leaderboard.add_score(
            &ctx.player,
            &category,
            &difficulty,
            result.score,
            result.total,
        );
        match self.scope.handle().run(write).await {
            Some(Ok(_)) => Ok(true),
            Some(Err(e)) if e.is_persistence_failure() => {
                warn!("⚠️ 成绩保存失败（不影响本次结果）: {}", e);
                println!("⚠️ 成绩保存失败: {}", e);
                Ok(true)
            }
            Some(Err(e)) => Err(e.into()),
            None => {
                info!("写入已取消，丢弃本次成绩");
                Ok(false)
            }
        }
    }

    /// 从存储重新加载排行榜，读取失败时保留当前视图
    pub async fn load_leaderboard(&self) -> Vec<ScoreEntry> {
        match self.scope.handle().run(self.leaderboard.refresh()).await {
            Some(Ok(entries)) => entries,
            Some(Err(e)) => {
                warn!("⚠️ 读取排行榜失败: {}", e);
                self.leaderboard.current()
            }
            None => self.leaderboard.current(),
        }
    }

    /// 查看排行榜
    pub async fn show_leaderboard(
        &self,
        category: Option<&str>,
        difficulty: Option<&str>,
    ) -> Result<()> {
        let ranked = self.leaderboard.list_ranked().await?;
        let entries = filter_by_difficulty(&filter_by_category(&ranked, category), difficulty);
        console::print_leaderboard(&entries);
        Ok(())
    }

    /// 把分类 ID 转换为分类
    ///
    /// 分类列表获取失败时使用 ID 作为名称，仍然按该分类取题
    async fn resolve_category(&self, id: Option<u32>) -> Result<Option<Category>> {
        let Some(id) = id else {
            return Ok(None);
        };

        let categories = self.categories().await;
        if categories.is_empty() {
            warn!("⚠️ 无法获取分类列表，使用分类 ID {}", id);
            return Ok(Some(Category {
                id,
                name: format!("Category {}", id),
            }));
        }

        categories
            .into_iter()
            .find(|c| c.id == id)
            .map(Some)
            .ok_or_else(|| AppError::from(BusinessError::UnknownCategory { id }).into())
    }
}
