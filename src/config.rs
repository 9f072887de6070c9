use crate::error::{AppError, AppResult, ConfigError};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 题库 API 根地址
    pub api_base_url: String,
    /// 每次测验的题目数量
    pub question_amount: u32,
    /// 题目类型（选择题为 multiple）
    pub question_type: String,
    /// HTTP 请求超时（秒）
    pub request_timeout_secs: u64,
    /// 排行榜记录文件
    pub scores_file: String,
    /// 答题后自动进入下一题的等待时间（毫秒）
    pub advance_delay_ms: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "https://opentdb.com".to_string(),
            question_amount: 10,
            question_type: "multiple".to_string(),
            request_timeout_secs: 10,
            scores_file: "scores.json".to_string(),
            advance_delay_ms: 1500,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量覆盖默认配置
    pub fn from_env() -> AppResult<Self> {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件加载配置，缺失的字段使用默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(ConfigError::FileReadFailed {
                path: path.display().to_string(),
                source: Box::new(e),
            })
        })?;

        toml::from_str(&content).map_err(|e| {
            AppError::Config(ConfigError::TomlParseFailed {
                path: path.display().to_string(),
                source: Box::new(e),
            })
        })
    }

    /// 先读配置文件（如果提供），再用环境变量覆盖
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let base = match path {
            Some(p) => Self::from_toml_file(p)?,
            None => Self::default(),
        };
        base.with_env_overrides()
    }

    fn with_env_overrides(self) -> AppResult<Self> {
        Ok(Self {
            api_base_url: std::env::var("TRIVIA_API_BASE_URL").unwrap_or(self.api_base_url),
            question_amount: env_parse("QUESTION_AMOUNT", self.question_amount, "u32")?,
            question_type: std::env::var("QUESTION_TYPE").unwrap_or(self.question_type),
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS", self.request_timeout_secs, "u64")?,
            scores_file: std::env::var("SCORES_FILE").unwrap_or(self.scores_file),
            advance_delay_ms: env_parse("ADVANCE_DELAY_MS", self.advance_delay_ms, "u64")?,
            verbose_logging: env_parse("VERBOSE_LOGGING", self.verbose_logging, "bool")?,
        })
    }
}

/// 读取并解析环境变量，未设置时使用 `current`
fn env_parse<T: FromStr>(var_name: &str, current: T, expected_type: &str) -> AppResult<T> {
    match std::env::var(var_name) {
        Ok(value) => value.trim().parse().map_err(|_| {
            AppError::Config(ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            })
        }),
        Err(_) => Ok(current),
    }
}
