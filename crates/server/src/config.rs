/// 配置管理

use common::models::constants;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server_port: u16,
    pub exporter_url: String,
    pub fetch_timeout_secs: u64,
    pub log_level: String,
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> anyhow::Result<Self> {
        let server_port = std::env::var("SERVER_PORT")
            .unwrap_or_else(|_| constants::DEFAULT_SERVER_PORT.to_string())
            .parse()?;

        let exporter_url = std::env::var("NODE_EXPORTER_URL")
            .unwrap_or_else(|_| constants::DEFAULT_EXPORTER_URL.to_string());

        let fetch_timeout_secs = std::env::var("FETCH_TIMEOUT_SECS")
            .unwrap_or_else(|_| constants::DEFAULT_FETCH_TIMEOUT_SECS.to_string())
            .parse()?;

        let log_level = std::env::var("LOG_LEVEL")
            .unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            server_port,
            exporter_url,
            fetch_timeout_secs,
            log_level,
        })
    }
}
