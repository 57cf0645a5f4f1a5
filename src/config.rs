//! 配置模块
//!
//! 支持从 JSON 文件加载系统配置，OpenAI API Key 可由环境变量覆盖

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

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

/// 上游接口配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// 请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// 连接超时时间（秒）
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

/// OpenAI 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// API Key（为空则解读生成直接走本地模板）
    #[serde(default)]
    pub api_key: String,
    /// 模型名称
    #[serde(default = "default_model")]
    pub model: String,
    /// 生成内容的最大 token 数
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// 采样温度
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 日志级别: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// 上游接口配置
    #[serde(default)]
    pub api: ApiConfig,
    /// OpenAI 配置
    #[serde(default)]
    pub openai: OpenAiConfig,
    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

// 默认值函数
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 5001 }
fn default_timeout() -> u64 { 30 }
fn default_connect_timeout() -> u64 { 10 }
fn default_model() -> String { "gpt-4".to_string() }
fn default_max_tokens() -> u32 { 500 }
fn default_temperature() -> f64 { 0.7 }
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
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
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

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            api: ApiConfig::default(),
            openai: OpenAiConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl AppConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// 加载配置，优先从文件，失败则使用默认值
    ///
    /// 环境变量 OPENAI_API_KEY 始终优先于文件中的配置
    pub fn load() -> Self {
        let config_paths = ["config.json", "config/config.json"];

        let mut config = Self::default();
        for path in config_paths {
            if Path::new(path).exists() {
                match Self::from_file(path) {
                    Ok(loaded) => {
                        log::info!("从 {} 加载配置成功", path);
                        config = loaded;
                        break;
                    }
                    Err(e) => {
                        log::warn!("加载配置文件 {} 失败: {}", path, e);
                    }
                }
            }
        }

        if let Ok(key) = env::var("OPENAI_API_KEY") {
            if !key.is_empty() {
                config.openai.api_key = key;
            }
        }

        if config.openai.api_key.is_empty() {
            log::warn!("未配置 OPENAI_API_KEY，解读生成将使用本地模板");
        }

        config
    }

    /// 获取服务器绑定地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 测试空 JSON 全部使用默认值
    #[test]
    fn test_defaults_from_empty_json() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();

        assert_eq!(config.server.port, 5001);
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.openai.model, "gpt-4");
        assert_eq!(config.openai.max_tokens, 500);
        assert_eq!(config.openai.temperature, 0.7);
        assert_eq!(config.log.level, "info");
    }

    /// 测试部分字段覆盖，其余保持默认
    #[test]
    fn test_partial_override() {
        let config: AppConfig = serde_json::from_str(
            r#"{ "server": { "port": 8080 }, "openai": { "model": "gpt-4o" } }"#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.openai.model, "gpt-4o");
        assert_eq!(config.openai.max_tokens, 500);
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }
}
