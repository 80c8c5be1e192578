//! 配置模块
//!
//! 支持从 JSON 文件加载系统配置

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// 配置文件查找顺序
const CONFIG_PATHS: [&str; 2] = ["config.json", "config/config.json"];

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
    /// 工作线程数（0 表示使用 CPU 核心数）
    #[serde(default)]
    pub workers: usize,
}

/// API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API Key（为空则不启用认证）
    #[serde(default)]
    pub api_key: String,
    /// 请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// 连接超时时间（秒）
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

/// 行情数据源配置（Yahoo Finance）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// quoteSummary 接口根地址
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// crumb 获取地址
    #[serde(default = "default_crumb_url")]
    pub crumb_url: String,
    /// 用于建立会话 Cookie 的地址
    #[serde(default = "default_cookie_url")]
    pub cookie_url: String,
    /// 请求使用的 User-Agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 日志级别: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// API 配置
    #[serde(default)]
    pub api: ApiConfig,
    /// 数据源配置
    #[serde(default)]
    pub provider: ProviderConfig,
    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 配置来源，日志系统初始化后再输出
#[derive(Debug)]
pub enum ConfigOrigin {
    /// 从文件加载成功
    File(&'static str),
    /// 文件存在但解析失败，已回退到默认配置
    Invalid(&'static str, String),
    /// 未找到配置文件
    Default,
}

// 默认值函数
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_timeout() -> u64 { 30 }
fn default_connect_timeout() -> u64 { 10 }
fn default_base_url() -> String { "https://query1.finance.yahoo.com".to_string() }
fn default_crumb_url() -> String { "https://query1.finance.yahoo.com/v1/test/getcrumb".to_string() }
fn default_cookie_url() -> String { "https://fc.yahoo.com".to_string() }
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string()
}
fn default_log_level() -> String { "info".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            crumb_url: default_crumb_url(),
            cookie_url: default_cookie_url(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// 从 JSON 字符串解析配置，缺省字段使用默认值
    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let config: AppConfig = serde_json::from_str(content)?;
        Ok(config)
    }

    /// 加载配置，优先从文件，失败则使用默认值
    pub fn load() -> (Self, ConfigOrigin) {
        for path in CONFIG_PATHS {
            if Path::new(path).exists() {
                return match Self::from_file(path) {
                    Ok(config) => (config, ConfigOrigin::File(path)),
                    Err(e) => (Self::default(), ConfigOrigin::Invalid(path, e.to_string())),
                };
            }
        }

        (Self::default(), ConfigOrigin::Default)
    }

    /// 用环境变量覆盖配置项
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("API_KEY") {
            self.api.api_key = key;
        }
    }

    /// 获取服务器绑定地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl ProviderConfig {
    /// 解析并校验 quoteSummary 根地址
    pub fn base_url(&self) -> anyhow::Result<Url> {
        let url = Url::parse(&self.base_url)?;
        if url.cannot_be_a_base() {
            anyhow::bail!("base_url 不是合法的根地址: {}", self.base_url);
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert!(config.api.api_key.is_empty());
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
        assert_eq!(config.log.level, "info");
        assert!(config.provider.base_url().is_ok());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = AppConfig::from_json(
            r#"{ "server": { "port": 9000 }, "api": { "api_key": "secret" } }"#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.api.api_key, "secret");
        assert_eq!(config.api.connect_timeout_secs, 10);
        assert_eq!(config.provider.cookie_url, "https://fc.yahoo.com");
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(AppConfig::from_json(r#"{ "server": { "port": "abc" } }"#).is_err());
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let provider = ProviderConfig {
            base_url: "not a url".to_string(),
            ..ProviderConfig::default()
        };
        assert!(provider.base_url().is_err());

        let provider = ProviderConfig {
            base_url: "mailto:someone@example.com".to_string(),
            ..ProviderConfig::default()
        };
        assert!(provider.base_url().is_err());
    }
}
