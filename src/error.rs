use std::io;
use std::path::Path;
use thiserror::Error;

/// Why a collector could not produce a value.
///
/// Collectors never hand these to the scheduler or the UI directly; they are
/// carried inside a [`CollectorResult`](crate::data::snapshot::CollectorResult)
/// so the presentation layer can decide whether to show the reason or just
/// the sentinel.
#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("{program} not found - is it installed?")]
    ToolNotFound { program: String },

    #[error("permission denied reading {origin}")]
    PermissionDenied { origin: String },

    #[error("{origin} does not exist")]
    SourceMissing { origin: String },

    #[error("no line matching {pattern:?} in {origin}")]
    ParseMiss { origin: String, pattern: String },

    #[error("unexpected value {value:?} in {origin}")]
    Malformed { origin: String, value: String },

    #[error("{program} exited with {status}")]
    CommandFailed { program: String, status: String },

    #[error("failed to read {origin}: {error}")]
    Io {
        origin: String,
        #[source]
        error: io::Error,
    },
}

impl CollectorError {
    pub fn parse_miss(origin: &str, pattern: &str) -> Self {
        Self::ParseMiss {
            origin: origin.to_string(),
            pattern: pattern.to_string(),
        }
    }

    pub fn malformed(origin: &str, value: impl Into<String>) -> Self {
        Self::Malformed {
            origin: origin.to_string(),
            value: value.into(),
        }
    }

    /// Map a failure to spawn `program`.
    pub fn from_spawn(program: &str, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::ToolNotFound {
                program: program.to_string(),
            },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                origin: program.to_string(),
            },
            _ => Self::Io {
                origin: program.to_string(),
                error,
            },
        }
    }

    /// Map a failure to read the file at `path`.
    pub fn from_read(path: &Path, error: io::Error) -> Self {
        let origin = path.display().to_string();
        match error.kind() {
            io::ErrorKind::NotFound => Self::SourceMissing { origin },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { origin },
            _ => Self::Io { origin, error },
        }
    }

    pub fn is_tool_not_found(&self) -> bool {
        matches!(self, Self::ToolNotFound { .. })
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config directory not available")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
