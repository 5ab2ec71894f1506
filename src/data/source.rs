//! External information sources the collectors read from.
//!
//! Collectors never touch `std::process` or `std::fs` directly. They go
//! through [`CommandRunner`] and [`FileReader`] so tests can swap in fakes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Captured result of a finished subprocess.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub status: String,
    pub stdout: String,
    pub stderr: String,
}

pub trait CommandRunner: Send + Sync {
    /// Run `program` to completion and capture its output.
    ///
    /// Implementations must wait for the child before returning, whatever
    /// its exit status.
    fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput>;
}

pub trait FileReader: Send + Sync {
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput> {
        // `output()` waits on the child and closes its pipes on every path.
        let output = Command::new(program).args(args).output()?;
        Ok(CommandOutput {
            success: output.status.success(),
            status: output.status.to_string(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemFileReader;

impl FileReader for SystemFileReader {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// A program plus its arguments, stored in config as a plain argv array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl TryFrom<Vec<String>> for CommandSpec {
    type Error = String;

    fn try_from(mut argv: Vec<String>) -> Result<Self, Self::Error> {
        if argv.is_empty() || argv[0].trim().is_empty() {
            return Err("command must name a program".to_string());
        }
        let program = argv.remove(0);
        Ok(Self {
            program,
            args: argv,
        })
    }
}

impl From<CommandSpec> for Vec<String> {
    fn from(spec: CommandSpec) -> Self {
        let mut argv = Vec::with_capacity(spec.args.len() + 1);
        argv.push(spec.program);
        argv.extend(spec.args);
        argv
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Where each collector gets its text from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Privileged kernel ring buffer dump. `-n` keeps sudo from prompting
    /// for a password while the terminal is in raw mode.
    pub kernel_log: CommandSpec,
    pub pci_devices: CommandSpec,
    pub sensors: CommandSpec,
    pub kernel_release: CommandSpec,
    pub gl_info: CommandSpec,
    pub boot_cmdline: PathBuf,
    pub cpu_info: PathBuf,
    pub mem_info: PathBuf,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kernel_log: CommandSpec::new("sudo", &["-n", "dmesg"]),
            pci_devices: CommandSpec::new("lspci", &[]),
            sensors: CommandSpec::new("sensors", &[]),
            kernel_release: CommandSpec::new("uname", &["-r"]),
            gl_info: CommandSpec::new("glxinfo", &[]),
            boot_cmdline: PathBuf::from("/proc/cmdline"),
            cpu_info: PathBuf::from("/proc/cpuinfo"),
            mem_info: PathBuf::from("/proc/meminfo"),
        }
    }
}

#[cfg(test)]
pub mod fake {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Canned command outputs keyed by program name. Unknown programs fail
    /// with `NotFound`, like a missing binary.
    #[derive(Default)]
    pub struct FakeRunner {
        outputs: HashMap<String, io::Result<CommandOutput>>,
        calls: AtomicUsize,
    }

    impl FakeRunner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_stdout(mut self, program: &str, stdout: &str) -> Self {
            self.outputs.insert(
                program.to_string(),
                Ok(CommandOutput {
                    success: true,
                    status: "exit status: 0".to_string(),
                    stdout: stdout.to_string(),
                    stderr: String::new(),
                }),
            );
            self
        }

        pub fn with_failure(mut self, program: &str, stderr: &str) -> Self {
            self.outputs.insert(
                program.to_string(),
                Ok(CommandOutput {
                    success: false,
                    status: "exit status: 1".to_string(),
                    stdout: String::new(),
                    stderr: stderr.to_string(),
                }),
            );
            self
        }

        pub fn with_spawn_error(mut self, program: &str, kind: io::ErrorKind) -> Self {
            self.outputs
                .insert(program.to_string(), Err(io::Error::from(kind)));
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl CommandRunner for FakeRunner {
        fn run(&self, program: &str, _args: &[String]) -> io::Result<CommandOutput> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.outputs.get(program) {
                Some(Ok(output)) => Ok(output.clone()),
                Some(Err(err)) => Err(io::Error::new(err.kind(), err.to_string())),
                None => Err(io::Error::from(io::ErrorKind::NotFound)),
            }
        }
    }

    /// In-memory files. Anything not registered is `NotFound`.
    #[derive(Default)]
    pub struct FakeReader {
        files: Mutex<HashMap<PathBuf, String>>,
        denied: Vec<PathBuf>,
    }

    impl FakeReader {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_file(self, path: &str, content: &str) -> Self {
            self.set_file(path, content);
            self
        }

        /// Replace a file's contents, as the kernel does between reads.
        pub fn set_file(&self, path: &str, content: &str) {
            self.files
                .lock()
                .unwrap()
                .insert(PathBuf::from(path), content.to_string());
        }

        pub fn with_denied(mut self, path: &str) -> Self {
            self.denied.push(PathBuf::from(path));
            self
        }
    }

    impl FileReader for FakeReader {
        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            if self.denied.iter().any(|p| p == path) {
                return Err(io::Error::from(io::ErrorKind::PermissionDenied));
            }
            self.files
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
        }
    }

    impl FileReader for Arc<FakeReader> {
        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            self.as_ref().read_to_string(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_spec_round_trips_through_argv() {
        let spec = CommandSpec::new("sudo", &["-n", "dmesg"]);
        let argv: Vec<String> = spec.clone().into();
        assert_eq!(argv, vec!["sudo", "-n", "dmesg"]);
        assert_eq!(CommandSpec::try_from(argv).unwrap(), spec);
        assert_eq!(spec.to_string(), "sudo -n dmesg");
    }

    #[test]
    fn empty_argv_is_rejected() {
        assert!(CommandSpec::try_from(Vec::new()).is_err());
        assert!(CommandSpec::try_from(vec![" ".to_string()]).is_err());
    }

    #[test]
    fn system_runner_reports_missing_binary() {
        let err = SystemCommandRunner
            .run("pulsetool-definitely-not-a-real-binary", &[])
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
