//! 题目来源服务 - 业务能力层
//!
//! 只负责"取题"能力：失败或空结果时降级为空列表，不向上抛错

use crate::clients::{QuestionQuery, TriviaApi};
use crate::error::{ApiError, AppError, AppResult};
use crate::models::{Category, Question};
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// 题目来源能力
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// 获取分类列表，任何错误都返回空列表
    async fn fetch_categories(&self) -> Vec<Category>;

    /// 获取题目，带筛选条件失败时无筛选重试一次，仍失败返回空列表
    async fn fetch_questions(&self, query: &QuestionQuery) -> Vec<Question>;
}

/// 基于题库 API 的题目仓库
///
/// 职责：
/// - 调用 API 并吸收网络/解析错误
/// - 执行一次无筛选兜底查询
/// - 不关心测验流程
pub struct TriviaRepository<A: TriviaApi> {
    api: A,
}

impl<A: TriviaApi> TriviaRepository<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// 单次查询，response_code 非 0 视为失败
    async fn query_once(&self, query: &QuestionQuery) -> AppResult<Vec<Question>> {
        let response = self.api.get_questions(query).await?;
        if !response.is_ok() {
            return Err(AppError::Api(ApiError::ResponseCode {
                endpoint: "api.php".to_string(),
                code: response.response_code,
            }));
        }
        Ok(response.results)
    }
}

#[async_trait]
impl<A: TriviaApi> QuestionSource for TriviaRepository<A> {
    async fn fetch_categories(&self) -> Vec<Category> {
        match self.api.get_categories().await {
            Ok(response) => {
                debug!("获取到 {} 个分类", response.categories.len());
                response.categories
            }
            Err(e) => {
                warn!("⚠️ 获取分类失败: {}", e);
                Vec::new()
            }
        }
    }

    async fn fetch_questions(&self, query: &QuestionQuery) -> Vec<Question> {
        match self.query_once(query).await {
            Ok(questions) if !questions.is_empty() => {
                info!("✓ 获取到 {} 道题目", questions.len());
                return questions;
            }
            Ok(_) => warn!("⚠️ 查询结果为空: {:?}", query),
            Err(e) => warn!("⚠️ 查询题目失败: {}", e),
        }

        if !query.has_filters() {
            return Vec::new();
        }

        // 兜底：去掉筛选条件只重试一次
        info!("🔁 去掉分类/难度筛选后重试一次");
        match self.query_once(&query.unfiltered()).await {
            Ok(questions) => {
                info!("✓ 兜底查询获取到 {} 道题目", questions.len());
                questions
            }
            Err(e) => {
                warn!("⚠️ 兜底查询失败: {}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryResponse, Difficulty, QuestionResponse};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// 按顺序返回预设响应，并记录每次请求
    struct ScriptedApi {
        responses: Mutex<VecDeque<AppResult<QuestionResponse>>>,
        calls: Mutex<Vec<QuestionQuery>>,
    }

    impl ScriptedApi {
        fn new(responses: Vec<AppResult<QuestionResponse>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TriviaApi for ScriptedApi {
        async fn get_categories(&self) -> AppResult<CategoryResponse> {
            Err(AppError::Other("offline".to_string()))
        }

        async fn get_questions(&self, query: &QuestionQuery) -> AppResult<QuestionResponse> {
            self.calls.lock().unwrap().push(query.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(AppError::Other("no more responses".to_string())))
        }
    }

    fn question(correct: &str) -> Question {
        Question {
            category: "General".to_string(),
            kind: "multiple".to_string(),
            difficulty: Difficulty::Easy,
            prompt_html: "?".to_string(),
            correct_answer: correct.to_string(),
            incorrect_answers: vec!["x".to_string(), "y".to_string(), "z".to_string()],
        }
    }

    fn ok(results: Vec<Question>) -> AppResult<QuestionResponse> {
        Ok(QuestionResponse {
            response_code: 0,
            results,
        })
    }

    fn filtered() -> QuestionQuery {
        QuestionQuery::default()
            .with_category(Some(9))
            .with_difficulty(Some(Difficulty::Hard))
    }

    #[tokio::test]
    async fn test_categories_fail_soft() {
        let repo = TriviaRepository::new(ScriptedApi::new(vec![]));
        assert!(repo.fetch_categories().await.is_empty());
    }

    #[tokio::test]
    async fn test_success_does_not_retry() {
        let repo = TriviaRepository::new(ScriptedApi::new(vec![ok(vec![question("a")])]));
        let questions = repo.fetch_questions(&filtered()).await;
        assert_eq!(questions.len(), 1);
        assert_eq!(repo.api.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_bad_response_code_falls_back_once() {
        let repo = TriviaRepository::new(ScriptedApi::new(vec![
            Ok(QuestionResponse {
                response_code: 1,
                results: vec![],
            }),
            ok(vec![question("a"), question("b")]),
        ]));
        let questions = repo.fetch_questions(&filtered()).await;
        assert_eq!(questions.len(), 2);

        let calls = repo.api.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].has_filters());
        assert!(!calls[1].has_filters());
    }

    #[tokio::test]
    async fn test_empty_result_falls_back() {
        let repo = TriviaRepository::new(ScriptedApi::new(vec![ok(vec![]), ok(vec![question("a")])]));
        assert_eq!(repo.fetch_questions(&filtered()).await.len(), 1);
    }

    #[tokio::test]
    async fn test_repeated_failure_returns_empty() {
        let repo = TriviaRepository::new(ScriptedApi::new(vec![
            Err(AppError::Other("timeout".to_string())),
            Err(AppError::Other("timeout".to_string())),
            ok(vec![question("never")]),
        ]));
        assert!(repo.fetch_questions(&filtered()).await.is_empty());
        // 只重试一次
        assert_eq!(repo.api.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unfiltered_failure_does_not_retry() {
        let repo = TriviaRepository::new(ScriptedApi::new(vec![
            Err(AppError::Other("timeout".to_string())),
            ok(vec![question("a")]),
        ]));
        assert!(repo.fetch_questions(&QuestionQuery::default()).await.is_empty());
        assert_eq!(repo.api.calls.lock().unwrap().len(), 1);
    }
}
