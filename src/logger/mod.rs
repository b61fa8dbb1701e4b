//! Leveled logging for the gradeplan library and CLI
//!
//! `error!` and `warn!` always reach stderr. `info!` and `debug!` go to stdout
//! when their feature (`log-info`, `log-debug`) is compiled in and the runtime
//! level lets them through; `debug!` additionally needs [`enable_debug`].
//! `verbose!` is user-facing progress output behind the `verbose` feature and
//! never reaches the log file.
//!
//! Once [`init_file_logging`] succeeds, leveled lines are appended to the file
//! instead of the console, each prefixed with a local timestamp.

use std::fmt::{self, Arguments};
use std::path::Path;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

#[cfg(feature = "file-logging")]
use std::{
    fs::{File, OpenOptions},
    io::Write,
    sync::Mutex,
};

/// Severity of a log line, most severe first
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Failures the user must see
    Error = 1,
    /// Recoverable problems
    Warn = 2,
    /// Progress of gradebook operations (`log-info` feature)
    Info = 3,
    /// Internals such as parse decisions and store paths (`log-debug` feature)
    Debug = 4,
}

impl Level {
    /// Lowercase name, as stored in the config file
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }

    const fn tag(self) -> &'static str {
        match self {
            Self::Error => "[ERROR]",
            Self::Warn => "[WARN]",
            Self::Info => "[INFO]",
            Self::Debug => "[DEBUG]",
        }
    }

    const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Error,
            2 => Self::Warn,
            3 => Self::Info,
            _ => Self::Debug,
        }
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" | "err" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            _ => Err(format!(
                "Unknown log level: '{s}' (expected error, warn, info or debug)"
            )),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const DEFAULT_LEVEL: Level = if cfg!(feature = "log-debug") {
    Level::Debug
} else if cfg!(feature = "log-info") {
    Level::Info
} else {
    Level::Warn
};

static LEVEL: AtomicU8 = AtomicU8::new(DEFAULT_LEVEL as u8);
static DEBUG: AtomicBool = AtomicBool::new(false);
static VERBOSE: AtomicBool = AtomicBool::new(false);

#[cfg(feature = "file-logging")]
static LOG_FILE: Mutex<Option<File>> = Mutex::new(None);

/// Set the most verbose level that is emitted
pub fn set_level(level: Level) {
    LEVEL.store(level as u8, Ordering::Relaxed);
}

/// Current runtime level
#[must_use]
pub fn level() -> Level {
    Level::from_u8(LEVEL.load(Ordering::Relaxed))
}

/// Let `debug!` lines through (no effect without `log-debug`)
pub fn enable_debug() {
    DEBUG.store(true, Ordering::Relaxed);
}

/// Whether `debug!` lines can be emitted at all
#[must_use]
pub fn is_debug_enabled() -> bool {
    cfg!(feature = "log-debug") && DEBUG.load(Ordering::Relaxed)
}

/// Turn on `verbose!` output (no effect without `verbose`)
pub fn enable_verbose() {
    VERBOSE.store(true, Ordering::Relaxed);
}

/// Whether `verbose!` prints
#[must_use]
pub fn is_verbose_enabled() -> bool {
    cfg!(feature = "verbose") && VERBOSE.load(Ordering::Relaxed)
}

/// Append leveled lines to `path` from now on. Returns `true` on success.
#[cfg(feature = "file-logging")]
#[must_use]
pub fn init_file_logging(path: &Path) -> bool {
    let Ok(file) = OpenOptions::new().create(true).append(true).open(path) else {
        return false;
    };
    LOG_FILE.lock().is_ok_and(|mut slot| {
        *slot = Some(file);
        true
    })
}

/// Always `false`: the `file-logging` feature is disabled.
#[cfg(not(feature = "file-logging"))]
#[must_use]
pub fn init_file_logging(_path: &Path) -> bool {
    false
}

/// Write to the log file if one is open; `false` means nothing was written
#[cfg(feature = "file-logging")]
fn write_to_file(level: Level, message: &str) -> bool {
    let Ok(mut slot) = LOG_FILE.lock() else {
        return false;
    };
    let Some(file) = slot.as_mut() else {
        return false;
    };
    let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    let _ = writeln!(file, "{stamp} {} {message}", level.tag());
    let _ = file.flush();
    true
}

#[cfg(not(feature = "file-logging"))]
const fn write_to_file(_level: Level, _message: &str) -> bool {
    false
}

fn enabled(level: Level) -> bool {
    let compiled_in = match level {
        Level::Error | Level::Warn => true,
        Level::Info => cfg!(feature = "log-info"),
        Level::Debug => is_debug_enabled(),
    };
    compiled_in && level <= self::level()
}

/// Dispatcher behind the logging macros
#[doc(hidden)]
pub fn log_impl(level: Level, args: Arguments) {
    if !enabled(level) {
        return;
    }
    let message = args.to_string();
    if write_to_file(level, &message) {
        return;
    }
    match level {
        Level::Error | Level::Warn => eprintln!("{} {message}", level.tag()),
        Level::Info | Level::Debug => println!("{} {message}", level.tag()),
    }
}

/// Log at [`Level::Error`]
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::logger::log_impl($crate::logger::Level::Error, format_args!($($arg)*))
    };
}

/// Log at [`Level::Warn`]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::logger::log_impl($crate::logger::Level::Warn, format_args!($($arg)*))
    };
}

/// Log at [`Level::Info`]
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::logger::log_impl($crate::logger::Level::Info, format_args!($($arg)*))
    };
}

/// Log at [`Level::Debug`]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::logger::log_impl($crate::logger::Level::Debug, format_args!($($arg)*))
    };
}

/// Print to stdout when verbose output is on; never written to the log file
#[macro_export]
macro_rules! verbose {
    ($($arg:tt)*) => {
        if $crate::logger::is_verbose_enabled() {
            println!($($arg)*);
        }
    };
}
