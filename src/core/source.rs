/// Raw metric sources
///
/// `MetricSource` is the query interface the sampler pulls from. The
/// production implementation reads the kernel tick counters and the thermal
/// zone directly and asks `sysinfo` for memory, disks, interfaces and hostname.

use std::fs;
use std::net::IpAddr;
use std::path::PathBuf;

use sysinfo::{Disks, Networks, System};

use crate::core::error::MetricsError;
use crate::utils::{DEFAULT_THERMAL_ZONE, PROC_STAT};

/// Aggregate CPU time counters, in kernel ticks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuTicks {
    pub busy: u64,
    pub idle: u64,
}

impl CpuTicks {
    pub fn total(&self) -> u64 {
        self.busy + self.idle
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MemoryInfo {
    pub total_bytes: u64,
    pub available_bytes: u64,
    pub used_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskPartition {
    pub mountpoint: String,
    pub used_bytes: u64,
    pub total_bytes: u64,
}

/// Point-in-time system readings
#[cfg_attr(test, mockall::automock)]
pub trait MetricSource {
    fn cpu_ticks(&mut self) -> Result<CpuTicks, MetricsError>;

    fn memory(&mut self) -> MemoryInfo;

    fn disk_partitions(&mut self) -> Vec<DiskPartition>;

    /// Address of `name`, possibly carrying a `/prefix` suffix
    fn interface_address(&mut self, name: &str) -> Option<String>;

    fn hostname(&mut self) -> Option<String>;

    fn thermal_millidegrees(&mut self) -> Result<i64, MetricsError>;
}

/// Parse the aggregate `cpu` line of /proc/stat
///
/// busy = user + nice + system; iowait and the later columns are not counted.
pub fn parse_proc_stat(contents: &str) -> Result<CpuTicks, MetricsError> {
    let line = contents
        .lines()
        .find(|line| line.split_whitespace().next() == Some("cpu"))
        .ok_or_else(|| MetricsError::CpuCounters("no aggregate cpu line".to_string()))?;

    let fields: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .take(4)
        .map(|field| field.parse::<u64>())
        .collect::<Result<_, _>>()
        .map_err(|e| MetricsError::CpuCounters(e.to_string()))?;

    if fields.len() < 4 {
        return Err(MetricsError::CpuCounters(format!(
            "expected 4 counters, found {}",
            fields.len()
        )));
    }

    Ok(CpuTicks {
        busy: fields[0] + fields[1] + fields[2],
        idle: fields[3],
    })
}

/// Metric source backed by procfs, sysfs and `sysinfo`
pub struct SysinfoSource {
    system: System,
    proc_stat: PathBuf,
    thermal_zone: PathBuf,
}

impl Default for SysinfoSource {
    fn default() -> Self {
        Self::new(DEFAULT_THERMAL_ZONE)
    }
}

impl SysinfoSource {
    pub fn new(thermal_zone: impl Into<PathBuf>) -> Self {
        Self {
            system: System::new(),
            proc_stat: PathBuf::from(PROC_STAT),
            thermal_zone: thermal_zone.into(),
        }
    }
}

impl MetricSource for SysinfoSource {
    fn cpu_ticks(&mut self) -> Result<CpuTicks, MetricsError> {
        let contents = fs::read_to_string(&self.proc_stat)
            .map_err(|e| MetricsError::CpuCounters(e.to_string()))?;
        parse_proc_stat(&contents)
    }

    fn memory(&mut self) -> MemoryInfo {
        self.system.refresh_memory();

        let total_bytes = self.system.total_memory();
        let available_bytes = self.system.available_memory();
        let used_percent = if total_bytes > 0 {
            total_bytes.saturating_sub(available_bytes) as f64 / total_bytes as f64 * 100.0
        } else {
            0.0
        };

        MemoryInfo {
            total_bytes,
            available_bytes,
            used_percent,
        }
    }

    fn disk_partitions(&mut self) -> Vec<DiskPartition> {
        let disks = Disks::new_with_refreshed_list();

        disks
            .list()
            .iter()
            .map(|disk| DiskPartition {
                mountpoint: disk.mount_point().to_string_lossy().to_string(),
                used_bytes: disk.total_space().saturating_sub(disk.available_space()),
                total_bytes: disk.total_space(),
            })
            .collect()
    }

    fn interface_address(&mut self, name: &str) -> Option<String> {
        let networks = Networks::new_with_refreshed_list();
        let (_, data) = networks.iter().find(|(iface, _)| iface.as_str() == name)?;

        // Prefer IPv4, as that is what fits on the panel
        let mut addrs: Vec<_> = data.ip_networks().iter().collect();
        addrs.sort_by_key(|net| !matches!(net.addr, IpAddr::V4(_)));

        addrs
            .first()
            .map(|net| format!("{}/{}", net.addr, net.prefix))
    }

    fn hostname(&mut self) -> Option<String> {
        System::host_name()
    }

    fn thermal_millidegrees(&mut self) -> Result<i64, MetricsError> {
        let unavailable = |reason: String| MetricsError::SensorUnavailable {
            path: self.thermal_zone.display().to_string(),
            reason,
        };

        let raw = fs::read_to_string(&self.thermal_zone).map_err(|e| unavailable(e.to_string()))?;
        raw.trim()
            .parse::<i64>()
            .map_err(|e| unavailable(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const PROC_STAT_SAMPLE: &str = "\
cpu  10132153 290696 3084719 46828483 16683 0 25195 0 0 0
cpu0 1393280 32966 572056 13343292 6130 0 17875 0 0 0
intr 199292 0 0 0
ctxt 1990473
";

    #[test]
    fn test_parse_proc_stat_aggregate_line() {
        let ticks = parse_proc_stat(PROC_STAT_SAMPLE).unwrap();
        assert_eq!(ticks.busy, 10132153 + 290696 + 3084719);
        assert_eq!(ticks.idle, 46828483);
        assert_eq!(ticks.total(), ticks.busy + ticks.idle);
    }

    #[test]
    fn test_parse_proc_stat_rejects_garbage() {
        assert!(parse_proc_stat("").is_err());
        assert!(parse_proc_stat("cpu0 1 2 3 4\n").is_err());
        assert!(parse_proc_stat("cpu 1 2\n").is_err());
        assert!(parse_proc_stat("cpu a b c d\n").is_err());
    }

    #[test]
    fn test_thermal_zone_reading() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("temp");
        fs::write(&path, "48312\n").unwrap();

        let mut source = SysinfoSource::new(&path);
        assert_eq!(source.thermal_millidegrees().unwrap(), 48312);
    }

    #[test]
    fn test_missing_thermal_zone_is_sensor_unavailable() {
        let tmp = tempdir().unwrap();
        let mut source = SysinfoSource::new(tmp.path().join("missing"));

        match source.thermal_millidegrees() {
            Err(MetricsError::SensorUnavailable { path, .. }) => assert!(path.ends_with("missing")),
            other => panic!("expected SensorUnavailable, got {:?}", other),
        }
    }
}
