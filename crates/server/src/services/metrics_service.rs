/// 指标采集服务
///
/// 串联抓取、解析、计算三步，对外提供一次完整的采样

use tracing::debug;

use common::models::UtilizationResult;
use common::utils::format_bytes;

use crate::app_state::AppState;
use crate::metrics::parse_exposition;

pub struct MetricsService {
    state: AppState,
}

impl MetricsService {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// 采集一次利用率
    ///
    /// 抓取失败直接返回错误，不改动已有的采样基线；
    /// 读基线、算差值、写回基线整个序列在锁内完成
    pub async fn collect(&self) -> anyhow::Result<UtilizationResult> {
        let sample = self.state.exporter().fetch_raw().await?;
        let snapshot = parse_exposition(&sample.text);

        debug!(
            "解析到 {} 个核的 CPU 计数器，可用内存 {}",
            snapshot.cpu.len(),
            format_bytes(snapshot.mem_available_bytes as u64),
        );

        let mut sampler = self.state.sampler.lock().await;
        Ok(sampler.ingest(snapshot, sample.fetched_at))
    }
}
