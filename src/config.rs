//! 配置模块
//!
//! 支持从 JSON 文件加载系统配置
//! Token 解析顺序：配置文件 > 环境变量 > 内置兜底值

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// 内置兜底 Tushare Token（历史部署遗留，仅在文件和环境变量都未配置时使用）
const FALLBACK_TUSHARE_TOKEN: &str = "cd0342a926136018b801150b53f040b5175b7f785c0c0f092fc0c013";

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
    /// Tushare Token（为空则从环境变量 TUSHARE_TOKEN 读取）
    #[serde(default)]
    pub tushare_token: String,
    /// 请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// 连接超时时间（秒）
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

/// 数据获取配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// 利润表回溯年数
    #[serde(default = "default_income_years")]
    pub income_years: u32,
    /// 历史行情回溯天数
    #[serde(default = "default_price_days")]
    pub price_days: i64,
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
    /// API 配置
    #[serde(default)]
    pub api: ApiConfig,
    /// 数据获取配置
    #[serde(default)]
    pub data: DataConfig,
    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

// 默认值函数
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 5001 }
fn default_timeout() -> u64 { 30 }
fn default_connect_timeout() -> u64 { 10 }
fn default_income_years() -> u32 { 3 }
fn default_price_days() -> i64 { 365 }
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
            tushare_token: String::new(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            income_years: default_income_years(),
            price_days: default_price_days(),
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
            data: DataConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl ApiConfig {
    /// 解析实际使用的 Token
    ///
    /// 配置文件中的值优先；其次读取 TUSHARE_TOKEN 环境变量；
    /// 两者都没有时回退到内置 Token
    pub fn resolve_token(&self) -> String {
        if !self.tushare_token.is_empty() {
            return self.tushare_token.clone();
        }
        match env::var("TUSHARE_TOKEN") {
            Ok(token) if !token.is_empty() => token,
            _ => {
                log::warn!("未配置 Tushare Token，使用内置兜底 Token");
                FALLBACK_TUSHARE_TOKEN.to_string()
            }
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
    pub fn load() -> Self {
        let config_paths = ["config.json", "config/config.json"];

        for path in config_paths {
            if Path::new(path).exists() {
                match Self::from_file(path) {
                    Ok(config) => {
                        log::info!("从 {} 加载配置成功", path);
                        return config;
                    }
                    Err(e) => {
                        log::warn!("加载配置文件 {} 失败: {}", path, e);
                    }
                }
            }
        }

        log::info!("使用默认配置");
        Self::default()
    }

    /// 获取服务器绑定地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 测试默认配置值
    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5001);
        assert_eq!(config.data.income_years, 3);
        assert_eq!(config.data.price_days, 365);
        assert_eq!(config.log.level, "info");
    }

    /// 测试配置文件中的 Token 优先于其他来源
    #[test]
    fn test_resolve_token_prefers_config_file() {
        let api = ApiConfig {
            tushare_token: "token-from-file".to_string(),
            ..ApiConfig::default()
        };
        assert_eq!(api.resolve_token(), "token-from-file");
    }

    /// 测试部分字段缺失时使用 serde 默认值
    #[test]
    fn test_partial_config_json() {
        let json = r#"{"server": {"port": 9000}, "api": {"tushare_token": "abc"}}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.api.tushare_token, "abc");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.data.income_years, 3);
    }
}
