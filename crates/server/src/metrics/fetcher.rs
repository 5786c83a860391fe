/// 指标抓取客户端
///
/// 通过 HTTP 拉取上游 node_exporter 的暴露文本

use std::time::Duration;

use chrono::{DateTime, Utc};
use ureq::Agent;

use common::{Error, Result};

/// 一次抓取得到的原始样本
#[derive(Debug, Clone)]
pub struct RawSample {
    /// 暴露格式原始文本
    pub text: String,
    /// 抓取时刻
    pub fetched_at: DateTime<Utc>,
}

/// 上游 node_exporter 客户端
#[derive(Clone)]
pub struct ExporterClient {
    agent: Agent,
    base_url: String,
}

impl ExporterClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(timeout_secs)))
            .build();

        Self {
            agent: Agent::new_with_config(config),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// 抓取 /metrics 暴露文本
    ///
    /// 网络不可达、超时、非 2xx 状态统一归为 Transport 错误，不做重试
    pub async fn fetch_raw(&self) -> Result<RawSample> {
        let agent = self.agent.clone();
        let url = self.metrics_url();

        let text = tokio::task::spawn_blocking(move || -> Result<String> {
            let mut response = agent
                .get(&url)
                .call()
                .map_err(|e| Error::Transport(e.to_string()))?;
            response
                .body_mut()
                .read_to_string()
                .map_err(|e| Error::Transport(e.to_string()))
        })
        .await
        .map_err(|e| Error::Internal(e.to_string()))??;

        Ok(RawSample {
            text,
            fetched_at: Utc::now(),
        })
    }

    fn metrics_url(&self) -> String {
        format!("{}/metrics", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_url() {
        let client = ExporterClient::new("http://localhost:9100", 10);
        assert_eq!(client.metrics_url(), "http://localhost:9100/metrics");
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = ExporterClient::new("http://192.168.0.100:9100/", 10);
        assert_eq!(client.metrics_url(), "http://192.168.0.100:9100/metrics");
    }
}
