/// 暴露文本解析
///
/// 逐行扫描 node_exporter 的暴露格式文本，提取 CPU 与内存计数器。
/// 不匹配的行（注释、HELP/TYPE、其他指标）一律跳过，解析本身永不失败。

use std::collections::HashMap;

/// CPU 计数器表：核编号 -> 模式 -> 累计秒数
pub type CpuCounterTable = HashMap<u32, HashMap<String, f64>>;

/// 一次解析得到的计数器快照
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    /// 各核各模式的累计 CPU 秒数
    pub cpu: CpuCounterTable,
    /// 可用内存字节数（行缺失时为 0）
    pub mem_available_bytes: f64,
    /// 内存总量字节数（行缺失时未知）
    pub mem_total_bytes: Option<f64>,
}

/// 解析暴露文本
///
/// 内存指标取最后一次出现的值
pub fn parse_exposition(text: &str) -> MetricsSnapshot {
    let mut snapshot = MetricsSnapshot::default();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(rest) = line.strip_prefix("node_cpu_seconds_total{") {
            if let Some((core, mode, value)) = parse_cpu_line(rest) {
                snapshot.cpu.entry(core).or_default().insert(mode, value);
            }
        } else if let Some(rest) = line.strip_prefix("node_memory_MemAvailable_bytes") {
            if let Some(value) = parse_unlabeled_value(rest) {
                snapshot.mem_available_bytes = value;
            }
        } else if let Some(rest) = line.strip_prefix("node_memory_MemTotal_bytes") {
            if let Some(value) = parse_unlabeled_value(rest) {
                snapshot.mem_total_bytes = Some(value);
            }
        }
    }

    snapshot
}

/// 解析一行 CPU 计数器（`{` 之后的部分）
///
/// 标签顺序任意、允许额外标签；cpu 必须是整数、mode 必须存在，
/// 否则整行跳过
fn parse_cpu_line(rest: &str) -> Option<(u32, String, f64)> {
    let (labels, value_part) = split_labels(rest)?;

    let mut core = None;
    let mut mode = None;
    for (key, value) in labels {
        match key.as_str() {
            "cpu" => core = value.parse::<u32>().ok(),
            "mode" => mode = Some(value),
            _ => {}
        }
    }

    let value = parse_sample_value(value_part)?;
    Some((core?, mode?, value))
}

/// 扫描标签集，返回键值对列表和 `}` 之后的剩余文本
///
/// 标签值必须带引号，值内允许反斜杠转义和逗号
fn split_labels(rest: &str) -> Option<(Vec<(String, String)>, &str)> {
    let bytes = rest.as_bytes();
    let mut labels = Vec::new();
    let mut i = 0;

    loop {
        // 跳过分隔符
        while i < bytes.len() && (bytes[i] == b',' || bytes[i] == b' ') {
            i += 1;
        }
        if i >= bytes.len() {
            return None;
        }
        if bytes[i] == b'}' {
            return Some((labels, &rest[i + 1..]));
        }

        // 键名（到 '=' 为止）
        let key_start = i;
        while i < bytes.len() && bytes[i] != b'=' {
            i += 1;
        }
        if i >= bytes.len() {
            return None;
        }
        let key = rest[key_start..i].trim().to_string();
        i += 1;

        // 带引号的值
        if !rest[i..].starts_with('"') {
            return None;
        }
        i += 1;
        let mut value = String::new();
        let mut escaped = false;
        let mut closed = false;
        for c in rest[i..].chars() {
            i += c.len_utf8();
            if escaped {
                value.push(c);
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                closed = true;
                break;
            } else {
                value.push(c);
            }
        }
        if !closed {
            return None;
        }
        labels.push((key, value));
    }
}

/// 解析无标签样本行（指标名之后的部分）
///
/// 指标名和值之间必须有空白，避免错把更长的指标名当成前缀匹配
fn parse_unlabeled_value(rest: &str) -> Option<f64> {
    if !rest.starts_with(' ') && !rest.starts_with('\t') {
        return None;
    }
    parse_sample_value(rest)
}

/// 解析样本值
///
/// 值后可能跟暴露格式的时间戳，忽略；计数器值必须是非负有限数
fn parse_sample_value(rest: &str) -> Option<f64> {
    let token = rest.split_whitespace().next()?;
    let value = token.parse::<f64>().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(value)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# HELP node_cpu_seconds_total Seconds the CPUs spent in each mode.
# TYPE node_cpu_seconds_total counter
node_cpu_seconds_total{cpu=\"0\",mode=\"idle\"} 100.5
node_cpu_seconds_total{cpu=\"0\",mode=\"user\"} 25.25
node_cpu_seconds_total{cpu=\"1\",mode=\"idle\"} 98.0
node_cpu_seconds_total{cpu=\"1\",mode=\"user\"} 30.0
# HELP node_memory_MemAvailable_bytes Memory information field MemAvailable_bytes.
node_memory_MemAvailable_bytes 250
node_memory_MemTotal_bytes 1000
node_load1 0.52
";

    #[test]
    fn test_parse_cpu_counters() {
        let snapshot = parse_exposition(SAMPLE);
        assert_eq!(snapshot.cpu.len(), 2);
        assert_eq!(snapshot.cpu[&0]["idle"], 100.5);
        assert_eq!(snapshot.cpu[&0]["user"], 25.25);
        assert_eq!(snapshot.cpu[&1]["idle"], 98.0);
        assert_eq!(snapshot.cpu[&1]["user"], 30.0);
    }

    #[test]
    fn test_parse_memory_counters() {
        let snapshot = parse_exposition(SAMPLE);
        assert_eq!(snapshot.mem_available_bytes, 250.0);
        assert_eq!(snapshot.mem_total_bytes, Some(1000.0));
    }

    #[test]
    fn test_label_order_and_extra_labels() {
        let text = "node_cpu_seconds_total{mode=\"steal\",instance=\"host:9100\",cpu=\"3\"} 1.5\n";
        let snapshot = parse_exposition(text);
        // 未知模式也按原样记录，由聚合层决定怎么用
        assert_eq!(snapshot.cpu[&3]["steal"], 1.5);
    }

    #[test]
    fn test_escaped_quote_in_label_value() {
        let text = "node_cpu_seconds_total{note=\"a\\\"b,c\",cpu=\"0\",mode=\"idle\"} 2.0\n";
        let snapshot = parse_exposition(text);
        assert_eq!(snapshot.cpu[&0]["idle"], 2.0);
    }

    #[test]
    fn test_scientific_notation_memory_value() {
        let text = "node_memory_MemTotal_bytes 1.6509968384e+10\n";
        let snapshot = parse_exposition(text);
        assert_eq!(snapshot.mem_total_bytes, Some(1.6509968384e10));
    }

    #[test]
    fn test_trailing_timestamp_ignored() {
        let text = "node_memory_MemAvailable_bytes 4096 1395066363000\n";
        let snapshot = parse_exposition(text);
        assert_eq!(snapshot.mem_available_bytes, 4096.0);
    }

    #[test]
    fn test_last_memory_sample_wins() {
        let text = "node_memory_MemAvailable_bytes 100\nnode_memory_MemAvailable_bytes 200\n";
        let snapshot = parse_exposition(text);
        assert_eq!(snapshot.mem_available_bytes, 200.0);
    }

    #[test]
    fn test_longer_metric_name_not_matched() {
        let text = "node_memory_MemTotal_bytes_extra 1234\n";
        let snapshot = parse_exposition(text);
        assert_eq!(snapshot.mem_total_bytes, None);
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let text = "\
node_cpu_seconds_total{cpu=\"abc\",mode=\"idle\"} 1.0
node_cpu_seconds_total{cpu=\"0\"} 1.0
node_cpu_seconds_total{cpu=\"0\",mode=\"idle\"} not-a-number
node_cpu_seconds_total{cpu=\"0\",mode=\"idle\"} -1.0
node_cpu_seconds_total{cpu=\"0\",mode=\"idle\"
random garbage
";
        let snapshot = parse_exposition(text);
        assert!(snapshot.cpu.is_empty());
    }

    #[test]
    fn test_empty_body() {
        let snapshot = parse_exposition("");
        assert!(snapshot.cpu.is_empty());
        assert_eq!(snapshot.mem_available_bytes, 0.0);
        assert_eq!(snapshot.mem_total_bytes, None);
    }
}
