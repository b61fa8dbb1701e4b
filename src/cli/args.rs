//! CLI argument definitions for `gradeplan`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use gradeplan::config::ConfigOverrides;
use gradeplan::core::organizer::SummerPlacement;
use gradeplan::core::parser::ParseMode;
use gradeplan::logger::Level;

/// CLI log level argument
///
/// Represents log levels that can be passed via CLI arguments. Converts to lowercase
/// strings for config storage and to `logger::Level` for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

/// CLI parse mode argument
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum ParseModeArg {
    /// Line-by-line scan of portal text
    Heuristic,
    /// Four-line blocks: ID, title, grade, credits
    Template,
}

impl From<ParseModeArg> for ParseMode {
    fn from(arg: ParseModeArg) -> Self {
        match arg {
            ParseModeArg::Heuristic => Self::Heuristic,
            ParseModeArg::Template => Self::Template,
        }
    }
}

/// CLI summer placement argument
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum SummerPlacementArg {
    /// Each summer follows the academic year it closes
    Interleaved,
    /// All summers after the last academic year
    After,
}

impl From<SummerPlacementArg> for SummerPlacement {
    fn from(arg: SummerPlacementArg) -> Self {
        match arg {
            SummerPlacementArg::Interleaved => Self::Interleaved,
            SummerPlacementArg::After => Self::AfterAcademicYears,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `data_file`, `parse_mode`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum SemesterSubcommand {
    /// Add a semester, optionally filled from pasted course text.
    Add {
        /// Semester name, e.g. "Fall 2024" (defaults to "New Semester")
        #[arg(value_name = "NAME")]
        name: Option<String>,

        /// Read course text from a file (`-` for stdin)
        #[arg(long = "from", value_name = "FILE")]
        from: Option<PathBuf>,
    },
    /// List semesters grouped by academic year.
    List,
    /// Remove a semester and its courses.
    Remove {
        /// Semester id or name
        #[arg(value_name = "SEMESTER")]
        semester: String,
    },
    /// Rename a semester.
    Rename {
        /// Semester id or name
        #[arg(value_name = "SEMESTER")]
        semester: String,

        /// New name
        #[arg(value_name = "NAME")]
        name: String,

        /// Infer the term again from the new name
        #[arg(long)]
        retag: bool,
    },
    /// Move a semester to another position (1-based).
    Move {
        /// Current position
        #[arg(value_name = "FROM")]
        from: usize,
        /// New position
        #[arg(value_name = "TO")]
        to: usize,
    },
    /// Set or clear the term used for ordering.
    Term {
        /// Semester id or name
        #[arg(value_name = "SEMESTER")]
        semester: String,

        /// Term such as "Fall 2024"
        #[arg(value_name = "TERM", required_unless_present = "clear")]
        term: Option<String>,

        /// Remove the term; the semester is listed under Miscellaneous
        #[arg(long, conflicts_with = "term")]
        clear: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum CourseSubcommand {
    /// Add courses from pasted text, or one blank course.
    Add {
        /// Semester id or name
        #[arg(value_name = "SEMESTER")]
        semester: String,

        /// Read course text from a file (`-` for stdin)
        #[arg(long = "from", value_name = "FILE")]
        from: Option<PathBuf>,
    },
    /// Edit one field of a course.
    Edit {
        /// Semester id or name
        #[arg(value_name = "SEMESTER")]
        semester: String,

        /// Course position (1-based)
        #[arg(value_name = "INDEX")]
        index: usize,

        /// Field: id, title, grade or credits
        #[arg(value_name = "FIELD")]
        field: String,

        /// New value
        #[arg(value_name = "VALUE", allow_hyphen_values = true)]
        value: String,
    },
    /// Remove a course.
    Remove {
        /// Semester id or name
        #[arg(value_name = "SEMESTER")]
        semester: String,

        /// Course position (1-based)
        #[arg(value_name = "INDEX")]
        index: usize,
    },
    /// Move a course within its semester (1-based positions).
    Move {
        /// Semester id or name
        #[arg(value_name = "SEMESTER")]
        semester: String,
        /// Current position
        #[arg(value_name = "FROM")]
        from: usize,
        /// New position
        #[arg(value_name = "TO")]
        to: usize,
    },
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Parse pasted course text and print the recovered courses.
    ///
    /// Nothing is saved.
    Parse {
        /// Text file to parse (`-` for stdin)
        #[arg(value_name = "FILE")]
        input_file: PathBuf,

        /// Parse mode (falls back to config `parse_mode`)
        #[arg(long, value_enum)]
        mode: Option<ParseModeArg>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Manage semesters.
    Semester {
        #[command(subcommand)]
        subcommand: SemesterSubcommand,
    },
    /// Manage courses inside a semester.
    Course {
        #[command(subcommand)]
        subcommand: CourseSubcommand,
    },
    /// Show overall credits, grade points and GPA.
    Summary,
    /// Project GPA ranges for the remaining terms.
    Forecast {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Generate a transcript report.
    Report {
        /// Output file path (optional; defaults to config `reports_dir`)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Report format: markdown (md) or html
        #[arg(short, long, value_name = "FORMAT", default_value = "markdown")]
        format: String,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "gradeplan",
    about = "Track semester grades, GPA and academic years from pasted course lists",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level (stored in config file)
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override the semester data file
    #[arg(long = "data-file", value_name = "PATH")]
    pub data_file: Option<PathBuf>,

    /// Override the reports output directory
    #[arg(long = "reports-dir", value_name = "DIR")]
    pub reports_dir: Option<PathBuf>,

    /// Override the parse mode
    #[arg(long = "parse-mode", value_enum)]
    pub parse_mode: Option<ParseModeArg>,

    /// Override where summer sections are placed
    #[arg(long = "summer-placement", value_enum)]
    pub summer_placement: Option<SummerPlacementArg>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// `None` means the config file value is kept.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string().to_lowercase()),
            file: self
                .config_log_file
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            verbose: self.config_verbose,
            data_file: self
                .data_file
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            reports_dir: self
                .reports_dir
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            parse_mode: self.parse_mode.map(Into::into),
            summer_placement: self.summer_placement.map(Into::into),
        }
    }
}
