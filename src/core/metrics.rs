/// Metrics sampling for the OLED dashboard
///
/// `MetricsSampler` owns the current `Stats` snapshot and overwrites it in
/// place on every tick. Each field is refreshed independently: a failed read
/// is logged and leaves the previous value untouched, so one broken sensor
/// never stops the rest of the panel from updating.
///
/// CPU usage is a delta of the kernel tick counters between two readings.
/// Which two readings is decided by an explicit `CpuMode`:
/// - `Seed` takes a baseline, blocks for the full interval and reads again
/// - `Delta` waits out whatever is left of the interval since the previous
///   reading, then compares against it
///
/// The wait in `Delta` mode is what paces the main loop. It is measured from
/// the last counter read attempt, successful or not, and `Seed` sleeps even
/// when its first read fails, so an unreadable counter never unpaces the loop.

use std::sync::LazyLock;
use std::thread;
use std::time::{Duration, Instant};

use regex::Regex;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::core::error::MetricsError;
use crate::core::source::{CpuTicks, MetricSource};
use crate::utils::{bytes_to_gib, UNKNOWN_HOSTNAME};

static CIDR_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\d+").expect("static regex is valid"));

/// Current system snapshot shown on the panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    pub hostname: String,
    pub ip: String,
    pub temperature_c: f64,
    pub cpu_percent: f64,
    pub used_mem_gib: f64,
    pub total_mem_gib: f64,
    pub used_mem_percent: f64,
    /// Summed over every mounted partition, overlapping mounts included
    pub disk_used_gib: f64,
    pub disk_total_gib: f64,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            hostname: UNKNOWN_HOSTNAME.to_string(),
            ip: String::new(),
            temperature_c: 0.0,
            cpu_percent: 0.0,
            used_mem_gib: 0.0,
            total_mem_gib: 0.0,
            used_mem_percent: 0.0,
            disk_used_gib: 0.0,
            disk_total_gib: 0.0,
        }
    }
}

/// How the next CPU reading is taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuMode {
    /// Blocking sample over a full interval; establishes a fresh baseline
    Seed,
    /// Difference against the counters recorded on the previous reading
    Delta,
}

/// Percentage of busy ticks between two readings
///
/// Defined as 0 when no ticks elapsed. Counters that went backwards are
/// treated as zero progress.
pub fn cpu_percent(prev: CpuTicks, cur: CpuTicks) -> f64 {
    let busy = cur.busy.saturating_sub(prev.busy);
    let idle = cur.idle.saturating_sub(prev.idle);
    let total = busy + idle;

    if total == 0 {
        return 0.0;
    }

    (100.0 * busy as f64 / total as f64).clamp(0.0, 100.0)
}

/// Remove a `/<prefix>` suffix from an interface address
pub fn strip_cidr(addr: &str) -> String {
    CIDR_SUFFIX.replace_all(addr, "").to_string()
}

pub struct MetricsSampler<S: MetricSource> {
    source: S,
    stats: Stats,
    interval: Duration,
    interface: String,
    baseline: Option<CpuTicks>,
    last_attempt: Option<Instant>,
}

impl<S: MetricSource> MetricsSampler<S> {
    /// Create a sampler and fill every field, blocking for one full CPU interval
    pub fn new(source: S, interval: Duration, interface: impl Into<String>) -> Self {
        let mut sampler = Self {
            source,
            stats: Stats::default(),
            interval,
            interface: interface.into(),
            baseline: None,
            last_attempt: None,
        };
        sampler.refresh_force();
        sampler
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Periodic refresh; CPU is measured against the previous reading
    pub fn refresh(&mut self) {
        self.update(CpuMode::Delta);
    }

    /// Full refresh with a blocking CPU sample
    pub fn refresh_force(&mut self) {
        self.update(CpuMode::Seed);
    }

    fn update(&mut self, mode: CpuMode) {
        self.update_ip();
        self.update_cpu(mode);
        self.update_temp();
        self.update_mem();
        self.update_disk();
        self.update_hostname();
        trace!(?mode, stats = ?self.stats, "Stats refreshed");
    }

    fn update_ip(&mut self) {
        match self.source.interface_address(&self.interface) {
            Some(addr) => self.stats.ip = strip_cidr(&addr),
            None => {
                debug!("{}", MetricsError::InterfaceNotFound(self.interface.clone()));
                self.stats.ip.clear();
            }
        }
    }

    fn update_cpu(&mut self, mode: CpuMode) {
        match self.sample_cpu(mode) {
            Ok(percent) => self.stats.cpu_percent = percent,
            Err(e) => warn!("Keeping previous CPU value: {}", e),
        }
    }

    fn sample_cpu(&mut self, mode: CpuMode) -> Result<f64, MetricsError> {
        let (start, end) = match (mode, self.baseline) {
            (CpuMode::Seed, _) => self.seed_cpu()?,
            (CpuMode::Delta, Some(baseline)) => {
                self.wait_for_next_reading();
                (baseline, self.read_cpu_ticks()?)
            }
            (CpuMode::Delta, None) => {
                debug!("No CPU baseline recorded yet, taking a blocking sample");
                self.seed_cpu()?
            }
        };

        Ok(cpu_percent(start, end))
    }

    fn seed_cpu(&mut self) -> Result<(CpuTicks, CpuTicks), MetricsError> {
        let start = self.read_cpu_ticks();
        thread::sleep(self.interval);
        let start = start?;
        let end = self.read_cpu_ticks()?;
        Ok((start, end))
    }

    /// Sleep until `interval` has passed since the last read attempt
    fn wait_for_next_reading(&self) {
        if let Some(last) = self.last_attempt {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                thread::sleep(self.interval - elapsed);
            }
        }
    }

    fn read_cpu_ticks(&mut self) -> Result<CpuTicks, MetricsError> {
        let result = self.source.cpu_ticks();
        self.last_attempt = Some(Instant::now());

        let ticks = result?;
        self.baseline = Some(ticks);
        Ok(ticks)
    }

    fn update_temp(&mut self) {
        match self.source.thermal_millidegrees() {
            Ok(millidegrees) => self.stats.temperature_c = millidegrees as f64 / 1000.0,
            Err(e) => warn!("Keeping previous temperature: {}", e),
        }
    }

    fn update_mem(&mut self) {
        let mem = self.source.memory();
        self.stats.used_mem_percent = mem.used_percent;
        self.stats.used_mem_gib = bytes_to_gib(mem.total_bytes.saturating_sub(mem.available_bytes));
        self.stats.total_mem_gib = bytes_to_gib(mem.total_bytes);
    }

    fn update_disk(&mut self) {
        let partitions = self.source.disk_partitions();
        let used: u64 = partitions.iter().map(|p| p.used_bytes).sum();
        let total: u64 = partitions.iter().map(|p| p.total_bytes).sum();

        self.stats.disk_used_gib = bytes_to_gib(used);
        self.stats.disk_total_gib = bytes_to_gib(total);
    }

    fn update_hostname(&mut self) {
        match self.source.hostname() {
            Some(name) if !name.is_empty() => self.stats.hostname = name,
            _ => debug!("Hostname unavailable, keeping '{}'", self.stats.hostname),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::source::{DiskPartition, MemoryInfo, MockMetricSource};

    const GIB: u64 = 1024 * 1024 * 1024;

    fn ticks(busy: u64, idle: u64) -> CpuTicks {
        CpuTicks { busy, idle }
    }

    /// Mock with steady readings for everything except CPU and temperature
    fn steady_source() -> MockMetricSource {
        let mut source = MockMetricSource::new();
        source
            .expect_interface_address()
            .returning(|_| Some("192.168.1.123/24".to_string()));
        source.expect_memory().returning(|| MemoryInfo {
            total_bytes: 4 * GIB,
            available_bytes: 3 * GIB,
            used_percent: 25.0,
        });
        source.expect_disk_partitions().returning(|| {
            vec![
                DiskPartition {
                    mountpoint: "/".to_string(),
                    used_bytes: 6 * GIB,
                    total_bytes: 28 * GIB,
                },
                DiskPartition {
                    mountpoint: "/boot/firmware".to_string(),
                    used_bytes: GIB / 2,
                    total_bytes: GIB / 2,
                },
            ]
        });
        source
            .expect_hostname()
            .returning(|| Some("raspberrypi".to_string()));
        source
    }

    fn with_cpu_sequence(source: &mut MockMetricSource, readings: Vec<CpuTicks>) {
        let mut readings = readings.into_iter();
        source
            .expect_cpu_ticks()
            .returning(move || Ok(readings.next().unwrap_or_default()));
    }

    #[test]
    fn test_cpu_percent_from_tick_delta() {
        assert_eq!(cpu_percent(ticks(100, 900), ticks(150, 950)), 50.0);
        assert_eq!(cpu_percent(ticks(0, 0), ticks(100, 0)), 100.0);
        assert_eq!(cpu_percent(ticks(0, 0), ticks(0, 100)), 0.0);
    }

    #[test]
    fn test_cpu_percent_zero_elapsed_ticks() {
        assert_eq!(cpu_percent(ticks(500, 500), ticks(500, 500)), 0.0);
    }

    #[test]
    fn test_cpu_percent_counter_regression() {
        let percent = cpu_percent(ticks(500, 500), ticks(400, 600));
        assert_eq!(percent, 0.0);
        let percent = cpu_percent(ticks(500, 500), ticks(600, 100));
        assert_eq!(percent, 100.0);
    }

    #[test]
    fn test_strip_cidr() {
        assert_eq!(strip_cidr("192.168.1.123/24"), "192.168.1.123");
        assert_eq!(strip_cidr("10.0.0.1"), "10.0.0.1");
        assert_eq!(strip_cidr("fe80::1/64"), "fe80::1");
    }

    #[test]
    fn test_new_seeds_cpu_with_blocking_sample() {
        let mut source = steady_source();
        with_cpu_sequence(&mut source, vec![ticks(100, 900), ticks(150, 950)]);
        source.expect_thermal_millidegrees().returning(|| Ok(48312));

        let sampler = MetricsSampler::new(source, Duration::ZERO, "wlan0");
        let stats = sampler.stats();

        assert_eq!(stats.cpu_percent, 50.0);
        assert_eq!(stats.ip, "192.168.1.123");
        assert_eq!(stats.hostname, "raspberrypi");
        assert!((stats.temperature_c - 48.312).abs() < 1e-9);
        assert_eq!(stats.total_mem_gib, 4.0);
        assert_eq!(stats.used_mem_gib, 1.0);
        assert_eq!(stats.used_mem_percent, 25.0);
        assert_eq!(stats.disk_used_gib, 6.5);
        assert_eq!(stats.disk_total_gib, 28.5);
    }

    #[test]
    fn test_refresh_uses_previous_reading_as_baseline() {
        let mut source = steady_source();
        with_cpu_sequence(
            &mut source,
            vec![ticks(100, 900), ticks(150, 950), ticks(240, 960)],
        );
        source.expect_thermal_millidegrees().returning(|| Ok(40000));

        let mut sampler = MetricsSampler::new(source, Duration::ZERO, "wlan0");
        sampler.refresh();

        // (240 - 150) / ((240 - 150) + (960 - 950))
        assert_eq!(sampler.stats().cpu_percent, 90.0);
    }

    #[test]
    fn test_refresh_force_takes_two_fresh_readings() {
        let mut source = steady_source();
        with_cpu_sequence(
            &mut source,
            vec![
                ticks(100, 900),
                ticks(150, 950),
                ticks(1000, 1000),
                ticks(1010, 1090),
            ],
        );
        source.expect_thermal_millidegrees().returning(|| Ok(40000));

        let mut sampler = MetricsSampler::new(source, Duration::ZERO, "wlan0");
        sampler.refresh_force();

        assert_eq!(sampler.stats().cpu_percent, 10.0);
    }

    #[test]
    fn test_delta_refresh_waits_out_the_interval() {
        let interval = Duration::from_millis(60);
        let mut source = steady_source();
        with_cpu_sequence(
            &mut source,
            vec![ticks(0, 0), ticks(10, 10), ticks(20, 20)],
        );
        source.expect_thermal_millidegrees().returning(|| Ok(40000));

        let mut sampler = MetricsSampler::new(source, interval, "wlan0");
        let started = Instant::now();
        sampler.refresh();

        assert!(started.elapsed() >= Duration::from_millis(50));
        assert_eq!(sampler.stats().cpu_percent, 50.0);
    }

    #[test]
    fn test_failed_cpu_read_keeps_previous_value() {
        let mut source = steady_source();
        let mut calls = 0;
        source.expect_cpu_ticks().returning(move || {
            calls += 1;
            match calls {
                1 => Ok(ticks(100, 900)),
                2 => Ok(ticks(150, 950)),
                _ => Err(MetricsError::CpuCounters("gone".to_string())),
            }
        });
        source.expect_thermal_millidegrees().returning(|| Ok(40000));

        let mut sampler = MetricsSampler::new(source, Duration::ZERO, "wlan0");
        sampler.refresh();

        assert_eq!(sampler.stats().cpu_percent, 50.0);
    }

    #[test]
    fn test_unreadable_counters_still_pace_refresh() {
        let interval = Duration::from_millis(30);
        let mut source = steady_source();
        source
            .expect_cpu_ticks()
            .returning(|| Err(MetricsError::CpuCounters("permission denied".to_string())));
        source.expect_thermal_millidegrees().returning(|| Ok(40000));

        let started = Instant::now();
        let mut sampler = MetricsSampler::new(source, interval, "wlan0");
        for _ in 0..3 {
            sampler.refresh();
        }

        assert!(started.elapsed() >= interval * 4);
        assert_eq!(sampler.stats().cpu_percent, 0.0);
        assert_eq!(sampler.stats().ip, "192.168.1.123");
    }

    #[test]
    fn test_failed_delta_read_still_waits_for_interval() {
        let interval = Duration::from_millis(40);
        let mut source = steady_source();
        let mut calls = 0;
        source.expect_cpu_ticks().returning(move || {
            calls += 1;
            match calls {
                1 => Ok(ticks(100, 900)),
                2 => Ok(ticks(150, 950)),
                _ => Err(MetricsError::CpuCounters("gone".to_string())),
            }
        });
        source.expect_thermal_millidegrees().returning(|| Ok(40000));

        let mut sampler = MetricsSampler::new(source, interval, "wlan0");
        let started = Instant::now();
        sampler.refresh();
        sampler.refresh();

        // The first refresh may start slightly after the last read in `new`
        assert!(started.elapsed() >= interval * 2 - Duration::from_millis(10));
        assert_eq!(sampler.stats().cpu_percent, 50.0);
    }

    #[test]
    fn test_unavailable_sensor_keeps_previous_temperature() {
        let mut source = MockMetricSource::new();
        with_cpu_sequence(&mut source, vec![ticks(0, 0), ticks(10, 90)]);
        source
            .expect_interface_address()
            .returning(|_| Some("10.0.0.2/8".to_string()));
        source
            .expect_hostname()
            .returning(|| Some("pi".to_string()));
        source.expect_disk_partitions().returning(Vec::new);

        let mut temps = vec![
            Ok(51000),
            Err(MetricsError::SensorUnavailable {
                path: "/sys/class/thermal/thermal_zone0/temp".to_string(),
                reason: "No such file or directory".to_string(),
            }),
        ]
        .into_iter();
        source
            .expect_thermal_millidegrees()
            .returning(move || temps.next().unwrap_or(Ok(0)));

        let mut mem = vec![10.0, 20.0].into_iter();
        source.expect_memory().returning(move || MemoryInfo {
            total_bytes: 2 * GIB,
            available_bytes: GIB,
            used_percent: mem.next().unwrap_or(0.0),
        });

        let mut sampler = MetricsSampler::new(source, Duration::ZERO, "eth0");
        assert_eq!(sampler.stats().temperature_c, 51.0);
        assert_eq!(sampler.stats().used_mem_percent, 10.0);

        sampler.refresh();
        assert_eq!(sampler.stats().temperature_c, 51.0);
        assert_eq!(sampler.stats().used_mem_percent, 20.0);
        assert_eq!(sampler.stats().ip, "10.0.0.2");
    }

    #[test]
    fn test_missing_interface_and_hostname() {
        let mut source = MockMetricSource::new();
        with_cpu_sequence(&mut source, vec![ticks(0, 0), ticks(0, 0)]);
        source.expect_interface_address().returning(|_| None);
        source.expect_hostname().returning(|| None);
        source.expect_memory().returning(MemoryInfo::default);
        source.expect_disk_partitions().returning(Vec::new);
        source.expect_thermal_millidegrees().returning(|| Ok(0));

        let sampler = MetricsSampler::new(source, Duration::ZERO, "wlan0");
        let stats = sampler.stats();

        assert_eq!(stats.ip, "");
        assert_eq!(stats.hostname, "unknown");
        assert_eq!(stats.cpu_percent, 0.0);
        assert_eq!(stats.disk_total_gib, 0.0);
    }
}
