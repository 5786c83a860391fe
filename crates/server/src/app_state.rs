/// 应用全局状态

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::metrics::{ExporterClient, Sampler};

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    /// 上游 node_exporter 客户端
    pub exporter: ExporterClient,
    /// 采样器（持有上一次样本，读-算-写必须整体互斥）
    pub sampler: Arc<Mutex<Sampler>>,
}

impl AppState {
    pub fn new(exporter: ExporterClient) -> Self {
        Self {
            exporter,
            sampler: Arc::new(Mutex::new(Sampler::new())),
        }
    }

    /// 获取上游客户端（克隆）
    pub fn exporter(&self) -> ExporterClient {
        self.exporter.clone()
    }
}
