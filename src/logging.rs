use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE: &str = "pulsetool.log";

/// Where the log file goes. The terminal belongs to the UI, so nothing is
/// written to stdout.
pub fn log_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("pulsetool")
}

/// Open `pulsetool.log` in `dir` for appending, never rotated.
pub fn open_log_file(dir: &Path) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE)
        .build(dir)
}

/// Install the global subscriber. Keep the returned guard alive for the
/// whole run or buffered lines are lost on exit.
///
/// Returns `None` if logging could not be set up; the app runs without it.
pub fn init() -> Option<WorkerGuard> {
    let dir = log_dir();
    if let Err(err) = std::fs::create_dir_all(&dir) {
        eprintln!("Warning: cannot create log directory {}: {}", dir.display(), err);
        return None;
    }

    let file_appender = match open_log_file(&dir) {
        Ok(appender) => appender,
        Err(err) => {
            eprintln!(
                "Warning: cannot open log file in {}: {}",
                dir.display(),
                err
            );
            return None;
        }
    };
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let result = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pulsetool=info")))
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .try_init();

    match result {
        Ok(()) => Some(guard),
        Err(err) => {
            eprintln!("Warning: logging disabled: {}", err);
            None
        }
    }
}
