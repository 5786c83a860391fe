/// 利用率计算
///
/// CPU 使用率基于前后两次计数器样本的差值：计数器是开机以来的累计值，
/// 单个样本看不出瞬时负载，必须与上一次样本求差。
/// 内存使用率是无状态的单样本计算。

use chrono::{DateTime, Utc};
use tracing::debug;

use common::models::UtilizationResult;

use super::parser::{CpuCounterTable, MetricsSnapshot};

/// 上一次样本
#[derive(Debug, Clone)]
struct PreviousSample {
    cpu: CpuCounterTable,
    taken_at: DateTime<Utc>,
}

/// 采样器：持有上一次样本，负责差值计算
///
/// 进程启动时没有基线，首次计算的 CPU 使用率定义为 0；
/// 之后每次计算结束都会覆盖基线，基线在进程生命周期内不会被清除
#[derive(Debug, Default)]
pub struct Sampler {
    prev: Option<PreviousSample>,
}

impl Sampler {
    pub fn new() -> Self {
        Self { prev: None }
    }

    /// 用当前快照计算利用率，并把快照存为下一次的基线
    pub fn ingest(
        &mut self,
        snapshot: MetricsSnapshot,
        taken_at: DateTime<Utc>,
    ) -> UtilizationResult {
        let cpu_usage = match &self.prev {
            Some(prev) => {
                let elapsed = taken_at - prev.taken_at;
                debug!("距上次采样 {} ms，按差值计算 CPU 使用率", elapsed.num_milliseconds());
                cpu_usage_between(&prev.cpu, &snapshot.cpu)
            }
            None => {
                debug!("没有历史样本，本次记为基线，CPU 使用率为 0");
                0.0
            }
        };

        let memory_usage = memory_usage(snapshot.mem_available_bytes, snapshot.mem_total_bytes);

        self.prev = Some(PreviousSample {
            cpu: snapshot.cpu,
            taken_at,
        });

        UtilizationResult {
            cpu_usage: round2(cpu_usage),
            memory_usage,
        }
    }
}

/// 基于前后两个计数器表计算整机 CPU 使用率
///
/// 只统计两个样本中都出现的核；totalDiff <= 0 的核
/// （计数器重置或没有新增工作量）不参与平均，避免除零和负使用率
fn cpu_usage_between(prev: &CpuCounterTable, current: &CpuCounterTable) -> f64 {
    let mut contributing = 0usize;
    let mut usage_sum = 0.0;

    for (core, modes) in current {
        let Some(prev_modes) = prev.get(core) else {
            continue;
        };

        let current_total: f64 = modes.values().sum();
        let prev_total: f64 = prev_modes.values().sum();
        let total_diff = current_total - prev_total;
        if total_diff <= 0.0 {
            continue;
        }

        // idle 以外的模式都算繁忙
        let current_idle = modes.get("idle").copied().unwrap_or(0.0);
        let prev_idle = prev_modes.get("idle").copied().unwrap_or(0.0);
        let idle_diff = current_idle - prev_idle;

        usage_sum += ((total_diff - idle_diff) / total_diff) * 100.0;
        contributing += 1;
    }

    if contributing == 0 {
        0.0
    } else {
        usage_sum / contributing as f64
    }
}

/// 内存使用率，总量未知或为 0 时返回 None
fn memory_usage(available: f64, total: Option<f64>) -> Option<f64> {
    match total {
        Some(total) if total > 0.0 => Some(round2((1.0 - available / total) * 100.0)),
        _ => None,
    }
}

/// 保留两位小数
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
