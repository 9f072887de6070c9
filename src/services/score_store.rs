//! 成绩存储服务 - 业务能力层
//!
//! 只负责"保存成绩"能力：追加、读取全部、清空。排序由排行榜负责

use crate::error::{AppError, AppResult, StoreError};
use crate::models::ScoreRecord;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

/// 成绩存储能力
#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// 追加一条记录
    async fn insert(&self, record: ScoreRecord) -> AppResult<()>;

    /// 读取全部记录（按插入顺序）
    async fn list_all(&self) -> AppResult<Vec<ScoreRecord>>;

    /// 删除全部记录
    async fn clear(&self) -> AppResult<()>;
}

/// 内存存储，用于测试和临时会话
#[derive(Default)]
pub struct MemoryScoreStore {
    records: Mutex<Vec<ScoreRecord>>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScoreStore for MemoryScoreStore {
    async fn insert(&self, record: ScoreRecord) -> AppResult<()> {
        self.records.lock().await.push(record);
        Ok(())
    }

    async fn list_all(&self) -> AppResult<Vec<ScoreRecord>> {
        Ok(self.records.lock().await.clone())
    }

    async fn clear(&self) -> AppResult<()> {
        self.records.lock().await.clear();
        Ok(())
    }
}

/// JSON 文件存储
///
/// 职责：
/// - 记录以 JSON 数组保存在单个文件中
/// - 每次写入先写临时文件再重命名，读者不会看到写了一半的文件
/// - 进程内的读写通过互斥锁串行化
pub struct JsonFileScoreStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileScoreStore {
    /// 使用指定文件路径创建
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn path_str(&self) -> String {
        self.path.display().to_string()
    }

    /// 读取文件，文件不存在时视为空表
    async fn read_records(&self) -> AppResult<Vec<ScoreRecord>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(AppError::store_read_failed(self.path_str(), e)),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            AppError::Store(StoreError::Corrupted {
                path: self.path_str(),
                source: Box::new(e),
            })
        })
    }

    /// 原子写入全部记录
    async fn write_records(&self, records: &[ScoreRecord]) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| AppError::store_write_failed(self.path_str(), e))?;
            }
        }

        let content = serde_json::to_string_pretty(records)
            .map_err(|e| AppError::store_write_failed(self.path_str(), e))?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content)
            .await
            .map_err(|e| AppError::store_write_failed(tmp_path.display().to_string(), e))?;
        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| AppError::store_write_failed(self.path_str(), e))?;

        debug!("写入 {} 条成绩记录到 {}", records.len(), self.path_str());
        Ok(())
    }
}

#[async_trait]
impl ScoreStore for JsonFileScoreStore {
    async fn insert(&self, record: ScoreRecord) -> AppResult<()> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_records().await?;
        records.push(record);
        self.write_records(&records).await
    }

    async fn list_all(&self) -> AppResult<Vec<ScoreRecord>> {
        let _guard = self.lock.lock().await;
        self.read_records().await
    }

    async fn clear(&self) -> AppResult<()> {
        let _guard = self.lock.lock().await;
        self.write_records(&[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(player: &str, correct: u32) -> ScoreRecord {
        ScoreRecord::new(player, "Science", "Easy", correct, 10, Utc::now())
    }

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("trivial_quiz_{}.json", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_memory_store_keeps_insertion_order() {
        let store = MemoryScoreStore::new();
        store.insert(record("a", 1)).await.unwrap();
        store.insert(record("b", 2)).await.unwrap();
        let all = store.list_all().await.unwrap();
        assert_eq!(all[0].player, "a");
        assert_eq!(all[1].player, "b");

        store.clear().await.unwrap();
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_store_missing_file_is_empty() {
        let store = JsonFileScoreStore::with_path(temp_path());
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_store_persists_across_instances() {
        let path = temp_path();
        {
            let store = JsonFileScoreStore::with_path(&path);
            store.insert(record("Ann", 8)).await.unwrap();
            store.insert(record("Bob", 5)).await.unwrap();
        }

        let reopened = JsonFileScoreStore::with_path(&path);
        let all = reopened.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].player, "Ann");
        assert_eq!(all[0].percentage, 80);

        reopened.clear().await.unwrap();
        assert!(reopened.list_all().await.unwrap().is_empty());
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_file_store_corrupted_file() {
        let path = temp_path();
        std::fs::write(&path, "not json").unwrap();
        let store = JsonFileScoreStore::with_path(&path);
        let err = store.list_all().await.unwrap_err();
        assert!(err.is_persistence_failure());
        let _ = std::fs::remove_file(&path);
    }
}
