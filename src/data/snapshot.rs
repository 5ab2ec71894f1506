use crate::error::CollectorError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorScheme {
    Default,
    Dark,
    Nord,
    Adrenaline,
}

pub const UNKNOWN_GPU: &str = "Unknown GPU";
pub const UNKNOWN_CPU: &str = "Unknown CPU";
pub const NOT_AVAILABLE: &str = "N/A";
pub const UNKNOWN: &str = "Unknown";
pub const MESA_NOT_FOUND: &str = "Mesa not found";

/// Every metric a collector can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MetricKind {
    SmartAccessMemory,
    PerformanceOverride,
    GpuName,
    GpuTemperature,
    GpuFanSpeed,
    CpuName,
    CpuTemperature,
    CpuFrequency,
    Memory,
    KernelRelease,
    MesaVersion,
}

impl MetricKind {
    pub const ALL: [MetricKind; 11] = [
        MetricKind::SmartAccessMemory,
        MetricKind::PerformanceOverride,
        MetricKind::GpuName,
        MetricKind::GpuTemperature,
        MetricKind::GpuFanSpeed,
        MetricKind::CpuName,
        MetricKind::CpuTemperature,
        MetricKind::CpuFrequency,
        MetricKind::Memory,
        MetricKind::KernelRelease,
        MetricKind::MesaVersion,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MetricKind::SmartAccessMemory => "Smart Access Memory",
            MetricKind::PerformanceOverride => "Performance Override",
            MetricKind::GpuName => "GPU model",
            MetricKind::GpuTemperature => "GPU temperature",
            MetricKind::GpuFanSpeed => "GPU fan speed",
            MetricKind::CpuName => "CPU model",
            MetricKind::CpuTemperature => "CPU temperature",
            MetricKind::CpuFrequency => "CPU frequency",
            MetricKind::Memory => "Memory",
            MetricKind::KernelRelease => "Kernel",
            MetricKind::MesaVersion => "Mesa version",
        }
    }

    /// Value shown when the metric could not be determined.
    pub fn sentinel(self, reason: &CollectorError) -> MetricSample {
        match self {
            MetricKind::SmartAccessMemory | MetricKind::PerformanceOverride => {
                MetricSample::Status(false)
            }
            MetricKind::GpuName => MetricSample::Label(UNKNOWN_GPU.to_string()),
            MetricKind::CpuName => MetricSample::Label(UNKNOWN_CPU.to_string()),
            MetricKind::GpuTemperature | MetricKind::CpuTemperature => {
                MetricSample::Temperature(NOT_AVAILABLE.to_string())
            }
            MetricKind::GpuFanSpeed => MetricSample::FanSpeed(NOT_AVAILABLE.to_string()),
            MetricKind::CpuFrequency => MetricSample::Frequency(NOT_AVAILABLE.to_string()),
            MetricKind::Memory => MetricSample::Memory(MemoryUsage::default()),
            MetricKind::KernelRelease => MetricSample::Label(UNKNOWN.to_string()),
            MetricKind::MesaVersion if reason.is_tool_not_found() => {
                MetricSample::Label(MESA_NOT_FOUND.to_string())
            }
            MetricKind::MesaVersion => MetricSample::Label(UNKNOWN.to_string()),
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryUsage {
    pub used_mb: u64,
    pub total_mb: u64,
}

impl MemoryUsage {
    pub fn ratio(&self) -> f64 {
        if self.total_mb == 0 {
            0.0
        } else {
            (self.used_mb as f64 / self.total_mb as f64).clamp(0.0, 1.0)
        }
    }
}

/// One normalized reading. Temperatures, fan speed and frequency keep the
/// text the source reported, unit suffix included.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MetricSample {
    Status(bool),
    Label(String),
    Temperature(String),
    FanSpeed(String),
    Frequency(String),
    Memory(MemoryUsage),
}

impl fmt::Display for MetricSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricSample::Status(true) => f.write_str("Enabled"),
            MetricSample::Status(false) => f.write_str("Disabled"),
            MetricSample::Label(text)
            | MetricSample::Temperature(text)
            | MetricSample::FanSpeed(text)
            | MetricSample::Frequency(text) => f.write_str(text),
            MetricSample::Memory(mem) => write!(f, "{}MB / {}MB", mem.used_mb, mem.total_mb),
        }
    }
}

/// A sample together with the metric it belongs to. A failed collection
/// keeps its reason; [`CollectorResult::sample`] collapses it to the sentinel.
#[derive(Debug)]
pub struct CollectorResult {
    pub kind: MetricKind,
    pub outcome: Result<MetricSample, CollectorError>,
}

impl CollectorResult {
    pub fn sample(&self) -> MetricSample {
        match &self.outcome {
            Ok(sample) => sample.clone(),
            Err(reason) => self.kind.sentinel(reason),
        }
    }

    pub fn reason(&self) -> Option<&CollectorError> {
        self.outcome.as_ref().err()
    }

    pub fn is_available(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn status(&self) -> bool {
        matches!(self.outcome, Ok(MetricSample::Status(true)))
    }

    pub fn memory(&self) -> MemoryUsage {
        match &self.outcome {
            Ok(MetricSample::Memory(mem)) => *mem,
            _ => MemoryUsage::default(),
        }
    }

    pub fn text(&self) -> String {
        self.sample().to_string()
    }
}

/// The volatile GPU values recomputed on every refresh.
#[derive(Debug)]
pub struct GpuReport {
    pub name: CollectorResult,
    pub temperature: CollectorResult,
    pub fan_speed: CollectorResult,
}

impl GpuReport {
    pub fn results(&self) -> [&CollectorResult; 3] {
        [&self.name, &self.temperature, &self.fan_speed]
    }
}

impl fmt::Display for GpuReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Model: {}", self.name.sample())?;
        writeln!(f, "Temperature: {}", self.temperature.sample())?;
        write!(f, "Fan Speed: {}", self.fan_speed.sample())
    }
}

/// One scheduler refresh, as delivered to the display.
#[derive(Debug)]
pub struct RefreshTick {
    pub tick: u64,
    pub report: GpuReport,
}

/// Metrics sampled once when the Home view is built.
#[derive(Debug)]
pub struct SystemOverview {
    pub version: String,
    pub started: String,
    pub kernel: CollectorResult,
    pub mesa: CollectorResult,
    pub smart_access_memory: CollectorResult,
    pub performance_override: CollectorResult,
}

/// Metrics sampled once when the Performance view is built.
#[derive(Debug)]
pub struct CpuReport {
    pub name: CollectorResult,
    pub temperature: CollectorResult,
    pub frequency: CollectorResult,
}

#[derive(Debug)]
pub struct PerformanceSnapshot {
    pub gpu: GpuReport,
    pub cpu: CpuReport,
    pub memory: CollectorResult,
}
