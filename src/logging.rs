// Conditional logging macros - only active in debug builds

#[cfg(debug_assertions)]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        log::debug!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {{}};
}

#[cfg(debug_assertions)]
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        log::info!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {{}};
}

use log::LevelFilter;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;

/// Where log records go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Appended to; the full-screen interface owns the terminal.
    File(PathBuf),
}

/// `<data dir>/hangman/hangman.log`, if the platform has a data directory.
#[must_use]
pub fn default_log_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("hangman").join("hangman.log"))
}

/// Picks where logs go. The player's terminal only receives records when
/// line mode was started with `-v`; otherwise they go to the log file.
#[must_use]
pub fn log_target_for(tui: bool, verbose: u8) -> Option<LogTarget> {
    if !tui && verbose > 0 {
        Some(LogTarget::Stderr)
    } else {
        default_log_path().map(LogTarget::File)
    }
}

#[must_use]
pub fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

/// Installs the global logger. `RUST_LOG` overrides the verbosity level.
pub fn init_logger(target: &LogTarget, verbose: u8) -> io::Result<()> {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level_for(verbose))
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        });

    if let LogTarget::File(path) = target {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.try_init().map_err(io::Error::other)
}
