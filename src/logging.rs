use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "keyhit.log";

/// Keeps the background log writer alive. Dropping it flushes pending lines.
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

/// Where logs go. stdout and stderr belong to the terminal being polled,
/// so logging always goes to a file.
pub fn log_dir_from(lookup: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    if let Some(dir) = lookup("KEYHIT_LOG_DIR").filter(|d| !d.is_empty()) {
        return Some(PathBuf::from(dir));
    }

    #[cfg(target_os = "macos")]
    {
        return lookup("HOME").map(|home| PathBuf::from(home).join("Library/Logs/keyhit"));
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    {
        if let Some(state) = lookup("XDG_STATE_HOME").filter(|d| !d.is_empty()) {
            return Some(PathBuf::from(state).join("keyhit").join("logs"));
        }
        return lookup("HOME").map(|home| PathBuf::from(home).join(".local/state/keyhit/logs"));
    }

    #[cfg(windows)]
    {
        return lookup("LOCALAPPDATA").map(|local| PathBuf::from(local).join("keyhit").join("logs"));
    }

    #[cfg(not(any(unix, windows)))]
    {
        None
    }
}

pub fn ensure_log_dir(preferred: Option<PathBuf>) -> std::io::Result<PathBuf> {
    if let Some(dir) = preferred {
        if std::fs::create_dir_all(&dir).is_ok() {
            return Ok(dir);
        }
    }
    let dir = std::env::temp_dir().join("keyhit").join("logs");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

pub fn init() -> Option<LoggingGuard> {
    let log_dir = ensure_log_dir(log_dir_from(|var| std::env::var(var).ok())).ok()?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("keyhit=info"));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true),
    );

    if subscriber.try_init().is_err() {
        return None;
    }

    std::panic::set_hook(Box::new(|panic_info| {
        tracing::error!(panic = %panic_info, "panic");
    }));

    tracing::info!(log_dir = %log_dir.display(), "tracing initialized");

    Some(LoggingGuard { _guard: guard })
}

#[cfg(test)]
#[path = "../tests/unit/logging.rs"]
mod tests;
