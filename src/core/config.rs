//! 客户端配置

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 产品管理客户端配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// 后端 API 配置
    #[serde(default)]
    pub api: ApiConfig,
    /// 界面配置
    #[serde(default)]
    pub ui: UiConfig,
    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 后端 API 配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// 服务根地址
    pub base_url: String,
    /// 产品资源路径
    pub endpoint: String,
    /// 请求超时（秒），不设置则使用传输层默认值
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
}

/// 横幅显示时长
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub error_banner_seconds: u64,
    pub success_banner_seconds: u64,
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别 (trace, debug, info, warn, error)
    pub level: String,
    /// 是否输出到控制台（stderr）
    pub console_output: bool,
    /// 日志文件目录，设置后按天滚动写入
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
    /// 日志文件名前缀
    pub file_prefix: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            endpoint: "/api/products".to_string(),
            timeout_seconds: None,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            error_banner_seconds: 5,
            success_banner_seconds: 3,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console_output: true,
            log_dir: None,
            file_prefix: "product-admin".to_string(),
        }
    }
}

impl ApiConfig {
    /// 完整的产品资源地址，例如 `http://host/api/products`
    pub fn products_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.endpoint.trim_end_matches('/')
        )
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

impl UiConfig {
    pub fn error_banner_duration(&self) -> Duration {
        Duration::from_secs(self.error_banner_seconds)
    }

    pub fn success_banner_duration(&self) -> Duration {
        Duration::from_secs(self.success_banner_seconds)
    }
}

impl ClientConfig {
    /// 从配置文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::FileRead(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;

        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::FileWrite(e.to_string()))?;
            }
        }

        fs::write(path.as_ref(), content).map_err(|e| ConfigError::FileWrite(e.to_string()))?;

        Ok(())
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.is_empty() {
            return Err(ConfigError::Validation("base_url 不能为空".to_string()));
        }
        if !(self.api.base_url.starts_with("http://") || self.api.base_url.starts_with("https://"))
        {
            return Err(ConfigError::Validation(format!(
                "base_url 必须以 http:// 或 https:// 开头: {}",
                self.api.base_url
            )));
        }
        if !self.api.endpoint.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "endpoint 必须以 / 开头: {}",
                self.api.endpoint
            )));
        }
        if self.api.timeout_seconds == Some(0) {
            return Err(ConfigError::Validation("timeout_seconds 必须大于0".to_string()));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "无效的日志级别: {}，有效值: {:?}",
                self.logging.level, valid_levels
            )));
        }

        Ok(())
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("文件读取错误: {0}")]
    FileRead(String),
    #[error("文件写入错误: {0}")]
    FileWrite(String),
    #[error("配置解析错误: {0}")]
    Parse(String),
    #[error("配置序列化错误: {0}")]
    Serialize(String),
    #[error("配置验证错误: {0}")]
    Validation(String),
}

/// 按默认路径查找配置文件，找不到时使用默认配置
pub fn load_config() -> Result<ClientConfig, ConfigError> {
    let config_paths = ["product-admin.toml", "./config/product-admin.toml"];

    for path in &config_paths {
        if Path::new(path).exists() {
            tracing::debug!("从配置文件加载: {}", path);
            return ClientConfig::load_from_file(path);
        }
    }

    Ok(ClientConfig::default())
}
