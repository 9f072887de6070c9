//! 排行榜服务
//!
//! 持有全部成绩记录的排序视图。每次写入成功后重新读取存储、排序、编号，
//! 并通过 `watch` 通道推送最新的排行榜

use crate::error::AppResult;
use crate::models::{ScoreEntry, ScoreRecord};
use crate::services::score_store::ScoreStore;
use chrono::Utc;
use std::cmp::Ordering;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// 排序规则：百分比降序，相同时时间较新的在前
fn compare_records(a: &ScoreRecord, b: &ScoreRecord) -> Ordering {
    b.percentage
        .cmp(&a.percentage)
        .then_with(|| b.timestamp.cmp(&a.timestamp))
}

/// 对记录排序并编号，排名从 1 开始且连续
pub fn rank_records(mut records: Vec<ScoreRecord>) -> Vec<ScoreEntry> {
    // 稳定排序，完全相同的键保持插入顺序
    records.sort_by(compare_records);
    records
        .iter()
        .enumerate()
        .map(|(index, record)| ScoreEntry::from_record(index + 1, record))
        .collect()
}

/// 按分类筛选，保留原排名
pub fn filter_by_category(entries: &[ScoreEntry], category: Option<&str>) -> Vec<ScoreEntry> {
    match category {
        None => entries.to_vec(),
        Some(c) => entries.iter().filter(|e| e.category == c).cloned().collect(),
    }
}

/// 按难度筛选，保留原排名
pub fn filter_by_difficulty(entries: &[ScoreEntry], difficulty: Option<&str>) -> Vec<ScoreEntry> {
    match difficulty {
        None => entries.to_vec(),
        Some(d) => entries.iter().filter(|e| e.difficulty == d).cloned().collect(),
    }
}

/// 排行榜引擎
pub struct LeaderboardEngine {
    store: Arc<dyn ScoreStore>,
    entries: watch::Sender<Vec<ScoreEntry>>,
}

impl LeaderboardEngine {
    /// 创建排行榜，初始视图为空，需调用 `refresh` 或 `list_ranked` 加载
    pub fn new(store: Arc<dyn ScoreStore>) -> Self {
        let (entries, _) = watch::channel(Vec::new());
        Self { store, entries }
    }

    /// 订阅排行榜变化
    pub fn subscribe(&self) -> watch::Receiver<Vec<ScoreEntry>> {
        self.entries.subscribe()
    }

    /// 当前排行榜快照（不访问存储）
    pub fn current(&self) -> Vec<ScoreEntry> {
        self.entries.borrow().clone()
    }

    /// 添加一条成绩
    ///
    /// # 参数
    /// - `player`: 玩家名称
    /// - `category`: 分类名称
    /// - `difficulty`: 难度名称
    /// - `correct_answers`: 答对数量
    /// - `total_questions`: 题目总数
    ///
    /// # 返回
    /// 存储确认后返回写入的记录；存储失败时视图不变
    pub async fn add_score(
        &self,
        player: &str,
        category: &str,
        difficulty: &str,
        correct_answers: u32,
        total_questions: u32,
    ) -> AppResult<ScoreRecord> {
        let record = ScoreRecord::new(
            player,
            category,
            difficulty,
            correct_answers,
            total_questions,
            Utc::now(),
        );

        self.store.insert(record.clone()).await?;
        info!(
            "🏆 已记录成绩: {} {} ({}%)",
            record.player, record.score_text, record.percentage
        );

        // 记录已经写入，刷新失败只影响显示
        if let Err(e) = self.refresh().await {
            warn!("⚠️ 成绩已保存，但刷新排行榜失败: {}", e);
        }
        Ok(record)
    }

    /// 读取全部记录并重新排名
    pub async fn list_ranked(&self) -> AppResult<Vec<ScoreEntry>> {
        self.refresh().await
    }

    /// 清空排行榜
    pub async fn clear_all(&self) -> AppResult<()> {
        self.store.clear().await?;
        info!("🧹 排行榜已清空");
        self.refresh().await?;
        Ok(())
    }

    /// 在当前排行榜上按分类筛选
    pub fn filter_by_category(&self, category: Option<&str>) -> Vec<ScoreEntry> {
        filter_by_category(&self.entries.borrow(), category)
    }

    /// 在当前排行榜上按难度筛选
    pub fn filter_by_difficulty(&self, difficulty: Option<&str>) -> Vec<ScoreEntry> {
        filter_by_difficulty(&self.entries.borrow(), difficulty)
    }

    /// 从存储重新加载并推送给订阅者
    pub async fn refresh(&self) -> AppResult<Vec<ScoreEntry>> {
        let records = self.store.list_all().await?;
        let ranked = rank_records(records);
        debug!("排行榜共 {} 条记录", ranked.len());
        // 内容未变化时不通知订阅者
        self.entries.send_if_modified(|current| {
            if *current == ranked {
                false
            } else {
                *current = ranked.clone();
                true
            }
        });
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::score_store::MemoryScoreStore;
    use chrono::{Duration, TimeZone};

    fn record_at(player: &str, correct: u32, minute: i64) -> ScoreRecord {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        ScoreRecord::new(player, "Science", "Easy", correct, 10, base + Duration::minutes(minute))
    }

    #[test]
    fn test_rank_by_percentage_then_recent() {
        let ranked = rank_records(vec![
            record_at("old70", 7, 0),
            record_at("top", 9, 1),
            record_at("new70", 7, 5),
            record_at("low", 2, 3),
        ]);
        let players: Vec<&str> = ranked.iter().map(|e| e.player.as_str()).collect();
        assert_eq!(players, vec!["top", "new70", "old70", "low"]);
        let ranks: Vec<usize> = ranked.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_filters_keep_rank() {
        let mut records = vec![record_at("a", 9, 0), record_at("b", 8, 0)];
        records[0].category = "History".to_string();
        let ranked = rank_records(records);

        let science = filter_by_category(&ranked, Some("Science"));
        assert_eq!(science.len(), 1);
        assert_eq!(science[0].player, "b");
        assert_eq!(science[0].rank, 2);

        assert_eq!(filter_by_category(&ranked, None).len(), 2);
        assert_eq!(filter_by_difficulty(&ranked, Some("Hard")).len(), 0);
    }

    #[tokio::test]
    async fn test_add_score_updates_stream() {
        let engine = LeaderboardEngine::new(Arc::new(MemoryScoreStore::new()));
        let mut rx = engine.subscribe();

        engine.add_score("Ann", "Science", "easy", 8, 10).await.unwrap();
        assert!(rx.has_changed().unwrap());
        let entries = rx.borrow_and_update().clone();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].percentage, 80);
        assert_eq!(entries[0].score_text, "8/10");

        engine.clear_all().await.unwrap();
        assert!(rx.borrow_and_update().is_empty());
    }

    /// 写入成功但读取总是失败的存储
    struct UnreadableStore {
        inner: MemoryScoreStore,
    }

    #[async_trait::async_trait]
    impl ScoreStore for UnreadableStore {
        async fn insert(&self, record: ScoreRecord) -> AppResult<()> {
            self.inner.insert(record).await
        }

        async fn list_all(&self) -> AppResult<Vec<ScoreRecord>> {
            let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
            Err(crate::error::AppError::store_read_failed("scores.json", io))
        }

        async fn clear(&self) -> AppResult<()> {
            self.inner.clear().await
        }
    }

    #[tokio::test]
    async fn test_add_score_succeeds_when_refresh_fails() {
        let store = Arc::new(UnreadableStore {
            inner: MemoryScoreStore::new(),
        });
        let engine = LeaderboardEngine::new(store.clone());

        let record = engine.add_score("Ann", "Science", "easy", 8, 10).await.unwrap();
        assert_eq!(record.score_text, "8/10");
        assert_eq!(store.inner.list_all().await.unwrap().len(), 1);
        assert!(engine.current().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_without_changes_does_not_notify() {
        let store = Arc::new(MemoryScoreStore::new());
        store.insert(record_at("Ann", 8, 0)).await.unwrap();
        let engine = LeaderboardEngine::new(store);
        let mut rx = engine.subscribe();

        engine.refresh().await.unwrap();
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();

        engine.refresh().await.unwrap();
        assert!(!rx.has_changed().unwrap());
    }
}
