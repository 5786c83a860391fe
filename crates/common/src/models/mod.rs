/// 共享数据模型
///
/// 定义 API 对外暴露的数据结构

use serde::{Deserialize, Serialize};

/// 一次采样计算得到的利用率结果
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilizationResult {
    /// CPU 使用率（百分比，保留两位小数）
    pub cpu_usage: f64,

    /// 内存使用率（百分比，保留两位小数）
    ///
    /// 上游缺少内存总量时为 None，序列化为 null，
    /// 不能用 0 冒充「内存全部可用」
    pub memory_usage: Option<f64>,
}

/// 常量定义
pub mod constants {
    /// 默认 Server 端口
    pub const DEFAULT_SERVER_PORT: u16 = 5000;

    /// 默认 node_exporter 地址
    pub const DEFAULT_EXPORTER_URL: &str = "http://localhost:9100";

    /// 默认抓取超时（秒）
    pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
}
