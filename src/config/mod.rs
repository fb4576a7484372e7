#[cfg(feature = "cli")]
pub mod cli;

use crate::core::Limits;
use crate::utils::error::{BoardError, Result};
use crate::utils::validation::{validate_one_of, validate_path, validate_positive_number, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

const BACKENDS: [&str; 2] = ["memory", "file"];
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// `memory` or `file`
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(default = "default_store_path")]
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_title_max_chars")]
    pub title_max_chars: usize,
    #[serde(default = "default_content_max_chars")]
    pub content_max_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_backend() -> String {
    "file".to_string()
}

fn default_store_path() -> String {
    "./board-data".to_string()
}

fn default_title_max_chars() -> usize {
    Limits::default().title_max_chars
}

fn default_content_max_chars() -> usize {
    Limits::default().content_max_chars
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            path: default_store_path(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            title_max_chars: default_title_max_chars(),
            content_max_chars: default_content_max_chars(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| BoardError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BoardError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${BOARD_DATA_DIR})；未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BoardError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn limits(&self) -> Limits {
        Limits {
            title_max_chars: self.limits.title_max_chars,
            content_max_chars: self.limits.content_max_chars,
        }
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_one_of("store.backend", &self.store.backend, &BACKENDS)?;
        if self.store.backend == "file" {
            validate_path("store.path", &self.store.path)?;
        }
        validate_positive_number("limits.title_max_chars", self.limits.title_max_chars, 1)?;
        validate_positive_number("limits.content_max_chars", self.limits.content_max_chars, 1)?;
        validate_one_of("logging.level", &self.logging.level, &LOG_LEVELS)?;
        Ok(())
    }
}
