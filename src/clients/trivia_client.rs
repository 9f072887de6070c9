/// 题库 API 客户端
///
/// 封装所有与 Open Trivia DB 相关的 HTTP 调用
use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};
use crate::models::{CategoryResponse, Difficulty, QuestionResponse};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

const CATEGORY_ENDPOINT: &str = "api_category.php";
const QUESTION_ENDPOINT: &str = "api.php";

/// 题目查询条件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionQuery {
    /// 题目数量
    pub amount: u32,
    /// 题目类型
    pub kind: String,
    /// 分类 ID（可选）
    pub category: Option<u32>,
    /// 难度（可选）
    pub difficulty: Option<Difficulty>,
}

impl Default for QuestionQuery {
    fn default() -> Self {
        Self {
            amount: 10,
            kind: "multiple".to_string(),
            category: None,
            difficulty: None,
        }
    }
}

impl QuestionQuery {
    pub fn from_config(config: &Config) -> Self {
        Self {
            amount: config.question_amount,
            kind: config.question_type.clone(),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: Option<u32>) -> Self {
        self.category = category;
        self
    }

    pub fn with_difficulty(mut self, difficulty: Option<Difficulty>) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// 是否带有筛选条件
    pub fn has_filters(&self) -> bool {
        self.category.is_some() || self.difficulty.is_some()
    }

    /// 去掉筛选条件，保留数量和类型
    pub fn unfiltered(&self) -> Self {
        Self {
            amount: self.amount,
            kind: self.kind.clone(),
            category: None,
            difficulty: None,
        }
    }

    /// 构建查询参数
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("amount", self.amount.to_string()),
            ("type", self.kind.clone()),
        ];
        if let Some(category) = self.category {
            params.push(("category", category.to_string()));
        }
        if let Some(difficulty) = self.difficulty {
            params.push(("difficulty", difficulty.as_str().to_string()));
        }
        params
    }
}

/// 题库 API 能力
///
/// 只负责一次请求，不做重试和兜底
#[async_trait]
pub trait TriviaApi: Send + Sync {
    /// 获取分类列表
    async fn get_categories(&self) -> AppResult<CategoryResponse>;

    /// 获取题目
    async fn get_questions(&self, query: &QuestionQuery) -> AppResult<QuestionResponse>;
}

/// 基于 reqwest 的题库客户端
pub struct TriviaClient {
    http: reqwest::Client,
    base_url: String,
}

impl TriviaClient {
    /// 创建新的题库客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::api_request_failed("client", e))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    /// 发送 GET 请求并解析 JSON
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&'static str, String)],
    ) -> AppResult<T> {
        let url = self.endpoint_url(endpoint);
        debug!("请求 {} 参数: {:?}", url, params);

        let response = self
            .http
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Api(ApiError::BadResponse {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            }));
        }

        let body = response.json::<T>().await?;
        Ok(body)
    }
}

#[async_trait]
impl TriviaApi for TriviaClient {
    async fn get_categories(&self) -> AppResult<CategoryResponse> {
        self.get_json(CATEGORY_ENDPOINT, &[]).await
    }

    async fn get_questions(&self, query: &QuestionQuery) -> AppResult<QuestionResponse> {
        let response: QuestionResponse = self.get_json(QUESTION_ENDPOINT, &query.to_params()).await?;
        debug!(
            "题目响应: response_code={}, 数量={}",
            response.response_code,
            response.results.len()
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_without_filters() {
        let query = QuestionQuery::default();
        assert!(!query.has_filters());
        assert_eq!(
            query.to_params(),
            vec![("amount", "10".to_string()), ("type", "multiple".to_string())]
        );
    }

    #[test]
    fn test_params_with_filters() {
        let query = QuestionQuery::default()
            .with_category(Some(17))
            .with_difficulty(Some(Difficulty::Hard));
        assert!(query.has_filters());
        let params = query.to_params();
        assert!(params.contains(&("category", "17".to_string())));
        assert!(params.contains(&("difficulty", "hard".to_string())));

        let plain = query.unfiltered();
        assert!(!plain.has_filters());
        assert_eq!(plain.amount, 10);
    }

    #[test]
    fn test_endpoint_url_trims_slash() {
        let config = Config {
            api_base_url: "https://opentdb.com/".to_string(),
            ..Config::default()
        };
        let client = TriviaClient::new(&config).unwrap();
        assert_eq!(client.endpoint_url("api.php"), "https://opentdb.com/api.php");
    }
}
