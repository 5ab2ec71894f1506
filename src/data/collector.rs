use crate::data::snapshot::{
    CollectorResult, CpuReport, GpuReport, MemoryUsage, MetricKind, MetricSample,
    PerformanceSnapshot, SystemOverview,
};
use crate::data::source::{
    CommandRunner, CommandSpec, FileReader, SourceConfig, SystemCommandRunner, SystemFileReader,
};
use crate::error::CollectorError;
use std::path::Path;
use tracing::{debug, instrument};

const VRAM_MARKER: &str = "[drm] Detected VRAM RAM=";
const BAR_PREFIX: &str = "BAR=";
/// BAR size the amdgpu driver reports when resizable BAR is off.
const DEFAULT_BAR_MB: u64 = 256;
const OVERRIDE_FLAG: &str = "amdgpu.ppfeaturemask=0xffffffff";
const VGA_CLASS: &str = "VGA compatible controller";
const AMD_VENDOR: &str = "AMD";
const RADEON_FAMILY: &str = "Radeon";
const EDGE_SENSOR: &str = "edge:";
const CPU_SENSORS: [&str; 2] = ["Tdie:", "Tctl:"];
const GL_VERSION: &str = "OpenGL version string";

const KERNEL_LOG: &str = "kernel log";
const PCI_LIST: &str = "PCI device list";
const SENSORS: &str = "sensors output";
const CPU_INFO: &str = "cpuinfo";
const MEM_INFO: &str = "meminfo";
const GL_INFO: &str = "glxinfo output";
const UNAME: &str = "uname output";

/// Reads every metric from its external source.
///
/// Holds no state between calls beyond its sources, so calling any method
/// twice against unchanged sources gives the same answer.
pub struct Collector<R = SystemCommandRunner, F = SystemFileReader> {
    runner: R,
    reader: F,
    sources: SourceConfig,
}

impl Collector {
    pub fn system(sources: SourceConfig) -> Self {
        Self::new(SystemCommandRunner, SystemFileReader, sources)
    }
}

impl<R: CommandRunner, F: FileReader> Collector<R, F> {
    pub fn new(runner: R, reader: F, sources: SourceConfig) -> Self {
        Self {
            runner,
            reader,
            sources,
        }
    }

    pub fn sources(&self) -> &SourceConfig {
        &self.sources
    }

    /// Collect one metric, keeping the failure reason if there is one.
    #[instrument(skip(self), fields(metric = %kind))]
    pub fn collect(&self, kind: MetricKind) -> CollectorResult {
        let outcome = match kind {
            MetricKind::SmartAccessMemory => {
                self.try_smart_access_memory().map(MetricSample::Status)
            }
            MetricKind::PerformanceOverride => {
                self.try_performance_override().map(MetricSample::Status)
            }
            MetricKind::GpuName => self.try_gpu_name().map(MetricSample::Label),
            MetricKind::GpuTemperature => {
                self.try_gpu_temperature().map(MetricSample::Temperature)
            }
            MetricKind::GpuFanSpeed => self.try_gpu_fan_speed().map(MetricSample::FanSpeed),
            MetricKind::CpuName => self.try_cpu_name().map(MetricSample::Label),
            MetricKind::CpuTemperature => {
                self.try_cpu_temperature().map(MetricSample::Temperature)
            }
            MetricKind::CpuFrequency => self.try_cpu_frequency().map(MetricSample::Frequency),
            MetricKind::Memory => self.try_memory_usage().map(MetricSample::Memory),
            MetricKind::KernelRelease => self.try_kernel_release().map(MetricSample::Label),
            MetricKind::MesaVersion => self.try_mesa_version().map(MetricSample::Label),
        };
        if let Err(reason) = &outcome {
            debug!(error = %reason, "metric unavailable, using sentinel");
        }
        CollectorResult { kind, outcome }
    }

    pub fn gpu_report(&self) -> GpuReport {
        GpuReport {
            name: self.collect(MetricKind::GpuName),
            temperature: self.collect(MetricKind::GpuTemperature),
            fan_speed: self.collect(MetricKind::GpuFanSpeed),
        }
    }

    pub fn cpu_report(&self) -> CpuReport {
        CpuReport {
            name: self.collect(MetricKind::CpuName),
            temperature: self.collect(MetricKind::CpuTemperature),
            frequency: self.collect(MetricKind::CpuFrequency),
        }
    }

    pub fn performance(&self) -> PerformanceSnapshot {
        PerformanceSnapshot {
            gpu: self.gpu_report(),
            cpu: self.cpu_report(),
            memory: self.collect(MetricKind::Memory),
        }
    }

    pub fn overview(&self) -> SystemOverview {
        SystemOverview {
            version: env!("CARGO_PKG_VERSION").to_string(),
            started: chrono::Local::now().format("%Y-%m-%d").to_string(),
            kernel: self.collect(MetricKind::KernelRelease),
            mesa: self.collect(MetricKind::MesaVersion),
            smart_access_memory: self.collect(MetricKind::SmartAccessMemory),
            performance_override: self.collect(MetricKind::PerformanceOverride),
        }
    }

    // Sentinel API: failures collapse to the value the dashboard shows.

    pub fn smart_access_memory_enabled(&self) -> bool {
        self.collect(MetricKind::SmartAccessMemory).status()
    }

    pub fn performance_override_enabled(&self) -> bool {
        self.collect(MetricKind::PerformanceOverride).status()
    }

    pub fn gpu_name(&self) -> String {
        self.collect(MetricKind::GpuName).text()
    }

    pub fn gpu_temperature(&self) -> String {
        self.collect(MetricKind::GpuTemperature).text()
    }

    pub fn gpu_fan_speed(&self) -> String {
        self.collect(MetricKind::GpuFanSpeed).text()
    }

    pub fn cpu_name(&self) -> String {
        self.collect(MetricKind::CpuName).text()
    }

    pub fn cpu_temperature(&self) -> String {
        self.collect(MetricKind::CpuTemperature).text()
    }

    pub fn cpu_frequency(&self) -> String {
        self.collect(MetricKind::CpuFrequency).text()
    }

    /// `(used_mb, total_mb)`, or `(0, 0)` when meminfo is unusable.
    pub fn memory_usage(&self) -> (u64, u64) {
        let mem = self.collect(MetricKind::Memory).memory();
        (mem.used_mb, mem.total_mb)
    }

    pub fn kernel_release(&self) -> String {
        self.collect(MetricKind::KernelRelease).text()
    }

    pub fn mesa_version(&self) -> String {
        self.collect(MetricKind::MesaVersion).text()
    }

    // Typed API: the value or the reason it is missing.

    pub fn try_smart_access_memory(&self) -> Result<bool, CollectorError> {
        let log = self.command_stdout(&self.sources.kernel_log)?;
        parse_sam_status(&log)
    }

    pub fn try_performance_override(&self) -> Result<bool, CollectorError> {
        let cmdline = self.read_file(&self.sources.boot_cmdline)?;
        Ok(has_performance_override(&cmdline))
    }

    pub fn try_gpu_name(&self) -> Result<String, CollectorError> {
        let devices = self.command_stdout(&self.sources.pci_devices)?;
        parse_gpu_name(&devices)
    }

    pub fn try_gpu_temperature(&self) -> Result<String, CollectorError> {
        let dump = self.command_stdout(&self.sources.sensors)?;
        parse_gpu_temperature(&dump)
    }

    pub fn try_gpu_fan_speed(&self) -> Result<String, CollectorError> {
        let dump = self.command_stdout(&self.sources.sensors)?;
        parse_gpu_fan_speed(&dump)
    }

    pub fn try_cpu_name(&self) -> Result<String, CollectorError> {
        let cpuinfo = self.read_file(&self.sources.cpu_info)?;
        parse_cpu_name(&cpuinfo)
    }

    pub fn try_cpu_temperature(&self) -> Result<String, CollectorError> {
        let dump = self.command_stdout(&self.sources.sensors)?;
        parse_cpu_temperature(&dump)
    }

    /// Reads cpuinfo fresh on every call; the clock moves.
    pub fn try_cpu_frequency(&self) -> Result<String, CollectorError> {
        let cpuinfo = self.read_file(&self.sources.cpu_info)?;
        parse_cpu_frequency(&cpuinfo)
    }

    pub fn try_memory_usage(&self) -> Result<MemoryUsage, CollectorError> {
        let meminfo = self.read_file(&self.sources.mem_info)?;
        parse_memory_usage(&meminfo)
    }

    pub fn try_kernel_release(&self) -> Result<String, CollectorError> {
        let release = self.command_stdout(&self.sources.kernel_release)?;
        let release = release.trim();
        if release.is_empty() {
            return Err(CollectorError::malformed(UNAME, ""));
        }
        Ok(release.to_string())
    }

    pub fn try_mesa_version(&self) -> Result<String, CollectorError> {
        let info = self.command_stdout(&self.sources.gl_info)?;
        parse_gl_version(&info)
    }

    /// Run a command and return its stdout.
    ///
    /// A non-zero exit is only an error when it produced nothing to parse;
    /// several of these tools print usable output and still exit non-zero.
    fn command_stdout(&self, spec: &CommandSpec) -> Result<String, CollectorError> {
        let output = self
            .runner
            .run(&spec.program, &spec.args)
            .map_err(|err| CollectorError::from_spawn(&spec.program, err))?;

        if !output.success && output.stdout.trim().is_empty() {
            let stderr = output.stderr.to_lowercase();
            if stderr.contains("permission")
                || stderr.contains("not permitted")
                || stderr.contains("password")
            {
                return Err(CollectorError::PermissionDenied {
                    origin: spec.to_string(),
                });
            }
            return Err(CollectorError::CommandFailed {
                program: spec.to_string(),
                status: output.status,
            });
        }
        Ok(output.stdout)
    }

    fn read_file(&self, path: &Path) -> Result<String, CollectorError> {
        self.reader
            .read_to_string(path)
            .map_err(|err| CollectorError::from_read(path, err))
    }
}

/// Decide Smart Access Memory from the amdgpu VRAM detection line.
///
/// `BAR=256M` means the CPU only sees the default window, so SAM is off.
/// Anything larger means resizable BAR is active.
pub fn parse_sam_status(log: &str) -> Result<bool, CollectorError> {
    let mut seen_bar = false;
    let mut malformed = None;

    for line in log.lines().filter(|line| line.contains(VRAM_MARKER)) {
        if line.contains("BAR=256M") {
            return Ok(false);
        }
        let Some((_, after)) = line.split_once(BAR_PREFIX) else {
            continue;
        };
        let Some((size, _)) = after.split_once('M') else {
            continue;
        };
        match size.trim().parse::<u64>() {
            Ok(mb) if mb > DEFAULT_BAR_MB => return Ok(true),
            Ok(_) => seen_bar = true,
            Err(_) => malformed = Some(size.trim().to_string()),
        }
    }

    if seen_bar {
        return Ok(false);
    }
    match malformed {
        Some(value) => Err(CollectorError::malformed(KERNEL_LOG, value)),
        None => Err(CollectorError::parse_miss(KERNEL_LOG, VRAM_MARKER)),
    }
}

/// Exact, case-sensitive match on the full overdrive mask.
pub fn has_performance_override(cmdline: &str) -> bool {
    cmdline.contains(OVERRIDE_FLAG)
}

pub fn parse_gpu_name(devices: &str) -> Result<String, CollectorError> {
    let line = devices
        .lines()
        .find(|line| line.contains(VGA_CLASS) && line.contains(AMD_VENDOR))
        .ok_or_else(|| CollectorError::parse_miss(PCI_LIST, VGA_CLASS))?;

    let descriptor = line.rsplit(": ").next().unwrap_or(line);
    match descriptor.rsplit_once(RADEON_FAMILY) {
        Some((_, model)) => Ok(format!("AMD {}", model.trim())),
        None => Ok(descriptor.to_string()),
    }
}

pub fn parse_gpu_temperature(dump: &str) -> Result<String, CollectorError> {
    let line = first_line(dump, |line| line.contains(EDGE_SENSOR))
        .ok_or_else(|| CollectorError::parse_miss(SENSORS, EDGE_SENSOR))?;
    second_token(line, SENSORS).map(str::to_string)
}

pub fn parse_gpu_fan_speed(dump: &str) -> Result<String, CollectorError> {
    let line = first_line(dump, |line| line.contains("fan") && line.contains("RPM"))
        .ok_or_else(|| CollectorError::parse_miss(SENSORS, "fan ... RPM"))?;
    second_token(line, SENSORS).map(|rpm| format!("{} RPM", rpm))
}

pub fn parse_cpu_temperature(dump: &str) -> Result<String, CollectorError> {
    let line = first_line(dump, |line| CPU_SENSORS.iter().any(|s| line.contains(s)))
        .ok_or_else(|| CollectorError::parse_miss(SENSORS, "Tdie:/Tctl:"))?;
    second_token(line, SENSORS).map(|temp| temp.trim_matches('+').to_string())
}

pub fn parse_cpu_name(cpuinfo: &str) -> Result<String, CollectorError> {
    let line = first_line(cpuinfo, |line| line.contains("model name"))
        .ok_or_else(|| CollectorError::parse_miss(CPU_INFO, "model name"))?;
    Ok(line.rsplit(": ").next().unwrap_or(line).trim().to_string())
}

pub fn parse_cpu_frequency(cpuinfo: &str) -> Result<String, CollectorError> {
    let line = first_line(cpuinfo, |line| line.contains("MHz"))
        .ok_or_else(|| CollectorError::parse_miss(CPU_INFO, "MHz"))?;
    let value = line
        .split(':')
        .nth(1)
        .map(str::trim)
        .ok_or_else(|| CollectorError::malformed(CPU_INFO, line))?;
    Ok(format!("{} MHz", value))
}

/// Used and total memory in whole megabytes, from kB meminfo entries.
pub fn parse_memory_usage(meminfo: &str) -> Result<MemoryUsage, CollectorError> {
    let total_kb = meminfo_kb(meminfo, "MemTotal")?;
    let available_kb = meminfo_kb(meminfo, "MemAvailable")?;
    let used_kb = total_kb.saturating_sub(available_kb);
    Ok(MemoryUsage {
        used_mb: used_kb / 1024,
        total_mb: total_kb / 1024,
    })
}

pub fn parse_gl_version(info: &str) -> Result<String, CollectorError> {
    let line = first_line(info, |line| line.contains(GL_VERSION))
        .ok_or_else(|| CollectorError::parse_miss(GL_INFO, GL_VERSION))?;
    line.split(": ")
        .nth(1)
        .map(str::to_string)
        .ok_or_else(|| CollectorError::malformed(GL_INFO, line))
}

fn meminfo_kb(meminfo: &str, key: &str) -> Result<u64, CollectorError> {
    // Format example: "MemTotal:       32229848 kB"
    let line = first_line(meminfo, |line| line.contains(key))
        .ok_or_else(|| CollectorError::parse_miss(MEM_INFO, key))?;
    let value = second_token(line, MEM_INFO)?;
    value
        .parse::<u64>()
        .map_err(|_| CollectorError::malformed(MEM_INFO, value))
}

fn first_line<'a>(text: &'a str, pred: impl Fn(&str) -> bool) -> Option<&'a str> {
    text.lines().find(|line| pred(line))
}

fn second_token<'a>(line: &'a str, origin: &str) -> Result<&'a str, CollectorError> {
    line.split_whitespace()
        .nth(1)
        .ok_or_else(|| CollectorError::malformed(origin, line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::source::fake::{FakeReader, FakeRunner};
    use std::io;
    use std::sync::Arc;

    const LSPCI_RX6800: &str = "\
00:00.0 Host bridge: Advanced Micro Devices, Inc. [AMD] Starship/Matisse Root Complex
0b:00.0 PCI bridge: Advanced Micro Devices, Inc. [AMD/ATI] Navi 10 XL Upstream Port of PCI Express Switch (rev c1)
0d:00.0 VGA compatible controller: AMD Radeon RX 6800
0d:00.1 Audio device: Advanced Micro Devices, Inc. [AMD/ATI] Navi 21/23 HDMI/DP Audio Controller";

    const SENSORS_DUMP: &str = "\
amdgpu-pci-0d00
Adapter: PCI adapter
vddgfx:      806.00 mV
fan1:        1180 RPM  (min =    0 RPM, max = 3300 RPM)
edge:         +45.0°C  (crit = +100.0°C, hyst = -273.1°C)
junction:     +48.0°C  (crit = +110.0°C, hyst = -273.1°C)

k10temp-pci-00c3
Adapter: PCI adapter
Tctl:         +52.5°C
Tdie:         +42.5°C";

    const CPUINFO: &str = "\
processor\t: 0
vendor_id\t: AuthenticAMD
model name\t: AMD Ryzen 7 5800X 8-Core Processor
cpu MHz\t\t: 3792.861
cache size\t: 512 KB";

    const MEMINFO: &str = "\
MemTotal:       16384000 kB
MemFree:         1024000 kB
MemAvailable:    8192000 kB
Buffers:          204800 kB";

    fn collector(runner: FakeRunner, reader: FakeReader) -> Collector<FakeRunner, FakeReader> {
        Collector::new(runner, reader, SourceConfig::default())
    }

    fn empty_collector() -> Collector<FakeRunner, FakeReader> {
        collector(FakeRunner::new(), FakeReader::new())
    }

    #[test]
    fn sam_default_bar_is_disabled() {
        let log = "[    3.1] [drm] Detected VRAM RAM=16368M, BAR=256M\n";
        assert!(!parse_sam_status(log).unwrap());
    }

    #[test]
    fn sam_large_bar_is_enabled() {
        let log = "[    3.1] amdgpu 0000:0d:00.0: [drm] Detected VRAM RAM=16368M, BAR=512M\n";
        assert!(parse_sam_status(log).unwrap());

        let full = "[drm] Detected VRAM RAM=16368M, BAR=16384M";
        assert!(parse_sam_status(full).unwrap());
    }

    #[test]
    fn sam_without_vram_line_is_a_parse_miss() {
        let err = parse_sam_status("[    0.0] Linux version 6.8.0\n").unwrap_err();
        assert!(matches!(err, CollectorError::ParseMiss { .. }));
    }

    #[test]
    fn sam_unparseable_bar_is_malformed() {
        let err = parse_sam_status("[drm] Detected VRAM RAM=8192M, BAR=bigM").unwrap_err();
        assert!(matches!(err, CollectorError::Malformed { ref value, .. } if value == "big"));
    }

    #[test]
    fn sam_keeps_scanning_past_small_bars() {
        let log = "\
[drm] Detected VRAM RAM=512M, BAR=128M
[drm] Detected VRAM RAM=16368M, BAR=16384M";
        assert!(parse_sam_status(log).unwrap());
        assert!(!parse_sam_status("[drm] Detected VRAM RAM=512M, BAR=128M").unwrap());
    }

    #[test]
    fn sam_collector_degrades_to_false() {
        let denied = collector(
            FakeRunner::new().with_failure("sudo", "sudo: a password is required"),
            FakeReader::new(),
        );
        assert!(matches!(
            denied.try_smart_access_memory(),
            Err(CollectorError::PermissionDenied { .. })
        ));
        assert!(!denied.smart_access_memory_enabled());
        assert!(!empty_collector().smart_access_memory_enabled());

        let enabled = collector(
            FakeRunner::new().with_stdout("sudo", "[drm] Detected VRAM RAM=16368M, BAR=16384M\n"),
            FakeReader::new(),
        );
        assert!(enabled.smart_access_memory_enabled());
    }

    #[test]
    fn performance_override_needs_exact_flag() {
        assert!(has_performance_override(
            "BOOT_IMAGE=/vmlinuz root=/dev/nvme0n1p2 amdgpu.ppfeaturemask=0xffffffff quiet"
        ));
        assert!(!has_performance_override("quiet splash"));
        assert!(!has_performance_override("amdgpu.ppfeaturemask=0xfff7ffff"));
        assert!(!has_performance_override("AMDGPU.PPFEATUREMASK=0XFFFFFFFF"));
    }

    #[test]
    fn performance_override_missing_file_is_false() {
        let c = empty_collector();
        assert!(matches!(
            c.try_performance_override(),
            Err(CollectorError::SourceMissing { .. })
        ));
        assert!(!c.performance_override_enabled());

        let on = collector(
            FakeRunner::new(),
            FakeReader::new().with_file("/proc/cmdline", "quiet amdgpu.ppfeaturemask=0xffffffff\n"),
        );
        assert!(on.performance_override_enabled());
    }

    #[test]
    fn gpu_name_reformats_radeon_models() {
        assert_eq!(parse_gpu_name(LSPCI_RX6800).unwrap(), "AMD RX 6800");
    }

    #[test]
    fn gpu_name_without_family_is_verbatim() {
        let lspci = "06:00.0 VGA compatible controller: AMD Instinct MI100";
        assert_eq!(parse_gpu_name(lspci).unwrap(), "AMD Instinct MI100");
    }

    #[test]
    fn gpu_name_uses_text_after_last_radeon() {
        let lspci = "0d:00.0 VGA compatible controller: Advanced Micro Devices, Inc. [AMD/ATI] Navi 21 [Radeon RX 6800/6800 XT / 6900 XT] (rev c1)";
        assert_eq!(
            parse_gpu_name(lspci).unwrap(),
            "AMD RX 6800/6800 XT / 6900 XT] (rev c1)"
        );
    }

    #[test]
    fn gpu_name_ignores_other_vendors() {
        let lspci = "01:00.0 VGA compatible controller: NVIDIA Corporation GA104 [GeForce RTX 3070]";
        assert!(parse_gpu_name(lspci).is_err());
        let c = collector(FakeRunner::new().with_stdout("lspci", lspci), FakeReader::new());
        assert_eq!(c.gpu_name(), "Unknown GPU");
        assert_eq!(empty_collector().gpu_name(), "Unknown GPU");
    }

    #[test]
    fn gpu_temperature_keeps_source_units() {
        assert_eq!(parse_gpu_temperature(SENSORS_DUMP).unwrap(), "+45.0°C");
    }

    #[test]
    fn gpu_fan_speed_appends_rpm() {
        assert_eq!(parse_gpu_fan_speed(SENSORS_DUMP).unwrap(), "1180 RPM");
    }

    #[test]
    fn gpu_sensors_missing_is_na() {
        let c = empty_collector();
        assert_eq!(c.gpu_temperature(), "N/A");
        assert_eq!(c.gpu_fan_speed(), "N/A");
        assert!(matches!(
            c.try_gpu_temperature(),
            Err(CollectorError::ToolNotFound { ref program }) if program == "sensors"
        ));
    }

    #[test]
    fn sensor_line_without_value_is_malformed() {
        let err = parse_gpu_temperature("edge:\n").unwrap_err();
        assert!(matches!(err, CollectorError::Malformed { .. }));
        assert!(parse_gpu_fan_speed("no fans here\n").is_err());
    }

    #[test]
    fn cpu_temperature_strips_plus_and_takes_first_match() {
        assert_eq!(parse_cpu_temperature(SENSORS_DUMP).unwrap(), "52.5°C");
        assert_eq!(parse_cpu_temperature("Tdie:  +38.1°C\n").unwrap(), "38.1°C");
        assert!(parse_cpu_temperature("coretemp-isa-0000\n").is_err());
    }

    #[test]
    fn cpu_name_and_frequency_from_cpuinfo() {
        assert_eq!(
            parse_cpu_name(CPUINFO).unwrap(),
            "AMD Ryzen 7 5800X 8-Core Processor"
        );
        assert_eq!(parse_cpu_frequency(CPUINFO).unwrap(), "3792.861 MHz");
    }

    #[test]
    fn cpu_collectors_degrade_without_cpuinfo() {
        let c = empty_collector();
        assert_eq!(c.cpu_name(), "Unknown CPU");
        assert_eq!(c.cpu_frequency(), "N/A");
        assert_eq!(c.cpu_temperature(), "N/A");
    }

    #[test]
    fn memory_usage_floors_to_megabytes() {
        let mem = parse_memory_usage(MEMINFO).unwrap();
        assert_eq!(mem.used_mb, 8000);
        assert_eq!(mem.total_mb, 16000);

        let odd = "MemTotal: 2047 kB\nMemAvailable: 1500 kB\n";
        let mem = parse_memory_usage(odd).unwrap();
        assert_eq!((mem.used_mb, mem.total_mb), (0, 1));
    }

    #[test]
    fn memory_usage_failures_are_zero_pair() {
        assert_eq!(empty_collector().memory_usage(), (0, 0));

        let missing_available = collector(
            FakeRunner::new(),
            FakeReader::new().with_file("/proc/meminfo", "MemTotal: 16384000 kB\n"),
        );
        assert_eq!(missing_available.memory_usage(), (0, 0));

        let garbage = collector(
            FakeRunner::new(),
            FakeReader::new().with_file("/proc/meminfo", "MemTotal: lots kB\nMemAvailable: 1 kB\n"),
        );
        assert!(matches!(
            garbage.try_memory_usage(),
            Err(CollectorError::Malformed { .. })
        ));
        assert_eq!(garbage.memory_usage(), (0, 0));

        let denied = collector(FakeRunner::new(), FakeReader::new().with_denied("/proc/meminfo"));
        assert!(matches!(
            denied.try_memory_usage(),
            Err(CollectorError::PermissionDenied { .. })
        ));
    }

    #[test]
    fn kernel_and_mesa_versions() {
        let c = collector(
            FakeRunner::new()
                .with_stdout("uname", "6.8.0-45-generic\n")
                .with_stdout(
                    "glxinfo",
                    "OpenGL vendor string: AMD\nOpenGL version string: 4.6 (Compatibility Profile) Mesa 24.0.9\n",
                ),
            FakeReader::new(),
        );
        assert_eq!(c.kernel_release(), "6.8.0-45-generic");
        assert_eq!(c.mesa_version(), "4.6 (Compatibility Profile) Mesa 24.0.9");

        let bare = empty_collector();
        assert_eq!(bare.kernel_release(), "Unknown");
        assert_eq!(bare.mesa_version(), "Mesa not found");

        let no_gl = collector(
            FakeRunner::new().with_stdout("glxinfo", "name of display: :0\n"),
            FakeReader::new(),
        );
        assert_eq!(no_gl.mesa_version(), "Unknown");
    }

    #[test]
    fn failed_command_with_no_output_is_command_failed() {
        let c = collector(
            FakeRunner::new().with_failure("sensors", "No sensors found!"),
            FakeReader::new(),
        );
        assert!(matches!(
            c.try_gpu_temperature(),
            Err(CollectorError::CommandFailed { .. })
        ));
        let spawn_denied = collector(
            FakeRunner::new().with_spawn_error("lspci", io::ErrorKind::PermissionDenied),
            FakeReader::new(),
        );
        assert!(matches!(
            spawn_denied.try_gpu_name(),
            Err(CollectorError::PermissionDenied { .. })
        ));
    }

    #[test]
    fn collectors_are_idempotent() {
        let c = collector(
            FakeRunner::new()
                .with_stdout("lspci", LSPCI_RX6800)
                .with_stdout("sensors", SENSORS_DUMP),
            FakeReader::new()
                .with_file("/proc/cpuinfo", CPUINFO)
                .with_file("/proc/meminfo", MEMINFO),
        );
        let first = c.performance();
        let second = c.performance();
        assert_eq!(first.gpu.to_string(), second.gpu.to_string());
        assert_eq!(first.cpu.frequency.sample(), second.cpu.frequency.sample());
        assert_eq!(first.memory.memory(), second.memory.memory());
        assert_eq!(c.memory_usage(), c.memory_usage());
    }

    #[test]
    fn cpu_frequency_follows_cpuinfo_between_calls() {
        let reader = Arc::new(FakeReader::new().with_file("/proc/cpuinfo", CPUINFO));
        let c = Collector::new(
            FakeRunner::new(),
            Arc::clone(&reader),
            SourceConfig::default(),
        );
        assert_eq!(c.cpu_frequency(), "3792.861 MHz");

        reader.set_file("/proc/cpuinfo", &CPUINFO.replace("3792.861", "2200.000"));
        assert_eq!(c.cpu_frequency(), "2200.000 MHz");
    }

    #[test]
    fn gpu_report_runs_each_gpu_source() {
        let c = collector(
            FakeRunner::new()
                .with_stdout("lspci", LSPCI_RX6800)
                .with_stdout("sensors", SENSORS_DUMP),
            FakeReader::new(),
        );
        let report = c.gpu_report();
        assert_eq!(
            report.to_string(),
            "Model: AMD RX 6800\nTemperature: +45.0°C\nFan Speed: 1180 RPM"
        );
        assert_eq!(c.runner.calls(), 3);
    }
}
