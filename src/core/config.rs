//! Configuration module for `gradeplan`

use crate::core::grades::{GradeScale, DEFAULT_GRADE_POINT, MAX_GPA};
use crate::core::organizer::{Organizer, SummerPlacement};
use crate::core::parser::{CourseParser, ParseMode, DEFAULT_CREDITS};
use crate::logger::Level;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Variable expanded to the config directory in path values
const DIR_VARIABLE: &str = "$GRADEPLAN";

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Paths configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// JSON file holding the semester collection
    #[serde(default)]
    pub data_file: String,
    /// Directory for report output files
    #[serde(default)]
    pub reports_dir: String,
}

/// Grading and parsing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingConfig {
    /// Credits given to parsed courses without a numeric token
    #[serde(default = "default_credits")]
    pub default_credits: f64,
    /// Point value of unrecognized grades
    #[serde(default = "default_grade_point")]
    pub default_grade_point: f64,
    /// Layout expected from pasted course text
    #[serde(default)]
    pub parse_mode: ParseMode,
    /// Where summer sections go in the organized view
    #[serde(default)]
    pub summer_placement: SummerPlacement,
}

const fn default_credits() -> f64 {
    DEFAULT_CREDITS
}

const fn default_grade_point() -> f64 {
    DEFAULT_GRADE_POINT
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            default_credits: DEFAULT_CREDITS,
            default_grade_point: DEFAULT_GRADE_POINT,
            parse_mode: ParseMode::default(),
            summer_placement: SummerPlacement::default(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
    /// Grading settings
    #[serde(default)]
    pub grading: GradingConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override the data file
    pub data_file: Option<String>,
    /// Override reports output directory
    pub reports_dir: Option<String>,
    /// Override the parse mode
    pub parse_mode: Option<ParseMode>,
    /// Override the summer placement
    pub summer_placement: Option<SummerPlacement>,
}

impl Config {
    /// Get the `$GRADEPLAN` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/gradeplan`
    /// - macOS: `~/Library/Application Support/gradeplan`
    /// - Windows: `%APPDATA%\gradeplan`
    #[must_use]
    pub fn get_gradeplan_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gradeplan")
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Used when loading so that fields added in a newer release are populated.
    /// Only string fields that are empty here and non-empty in `defaults` are
    /// updated; grading values already fall back through serde defaults.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added/changed, `false` otherwise
    #[allow(clippy::useless_let_if_seq)]
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let mut changed = false;

        if self.logging.level.is_empty() && !defaults.logging.level.is_empty() {
            self.logging.level.clone_from(&defaults.logging.level);
            changed = true;
        }
        if self.logging.file.is_empty() && !defaults.logging.file.is_empty() {
            self.logging.file.clone_from(&defaults.logging.file);
            changed = true;
        }

        if self.paths.data_file.is_empty() && !defaults.paths.data_file.is_empty() {
            self.paths.data_file.clone_from(&defaults.paths.data_file);
            changed = true;
        }
        if self.paths.reports_dir.is_empty() && !defaults.paths.reports_dir.is_empty() {
            self.paths
                .reports_dir
                .clone_from(&defaults.paths.reports_dir);
            changed = true;
        }

        changed
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// Command-line values win over the file for this run only; the
    /// persistent configuration is not modified. `None` fields are ignored.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let mut config = Config::load();
    /// let overrides = ConfigOverrides {
    ///     parse_mode: Some(ParseMode::Template),
    ///     ..Default::default()
    /// };
    /// config.apply_overrides(&overrides);
    /// ```
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }

        if let Some(data_file) = &overrides.data_file {
            self.paths.data_file.clone_from(data_file);
        }
        if let Some(reports_dir) = &overrides.reports_dir {
            self.paths.reports_dir.clone_from(reports_dir);
        }

        if let Some(parse_mode) = overrides.parse_mode {
            self.grading.parse_mode = parse_mode;
        }
        if let Some(summer_placement) = overrides.summer_placement {
            self.grading.summer_placement = summer_placement;
        }
    }

    /// Get the user config file path
    ///
    /// `config.toml` for release builds, `dconfig.toml` for debug builds, in
    /// the directory returned by [`get_gradeplan_dir`].
    ///
    /// [`get_gradeplan_dir`]: Self::get_gradeplan_dir
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_gradeplan_dir().join(CONFIG_FILE_NAME)
    }

    /// Expand `$GRADEPLAN` in a string to the config directory
    #[must_use]
    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let dir = Self::get_gradeplan_dir();
            value.replace(DIR_VARIABLE, dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Parses a TOML configuration string and expands any `$GRADEPLAN`
    /// variables in path values. Missing fields use their serde defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let config = Config::from_toml(r#"
    /// [logging]
    /// level = "info"
    /// file = "$GRADEPLAN/logs/gradeplan.log"
    /// "#)?;
    /// ```
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.paths.data_file = Self::expand_variables(&config.paths.data_file);
        config.paths.reports_dir = Self::expand_variables(&config.paths.reports_dir);

        Ok(config)
    }

    /// Load configuration from embedded defaults
    ///
    /// The defaults differ between debug (`DefaultCLIConfigDebug.toml`) and
    /// release (`DefaultCLIConfigRelease.toml`) builds.
    ///
    /// # Panics
    /// Panics if the embedded default configuration is invalid TOML. The
    /// defaults are compiled into the binary and covered by tests.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("Failed to parse compiled-in default configuration")
    }

    /// Load configuration from file, or create from defaults if not found
    ///
    /// - If the config file exists: load it, merge missing fields from
    ///   defaults and save the result when something was added
    /// - On first run: create the config directory and save the defaults
    ///
    /// Falls back to defaults if the file cannot be read or parsed.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if config_file.exists() {
            if let Ok(content) = fs::read_to_string(&config_file) {
                if let Ok(mut config) = Self::from_toml(&content) {
                    if config.merge_defaults(&defaults) {
                        let _ = config.save();
                    }
                    return config;
                }
            }
        } else {
            if let Some(parent) = config_file.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = defaults.save();

            return defaults;
        }

        defaults
    }

    /// Save configuration to file
    ///
    /// Serializes the configuration to TOML and writes it to the
    /// platform-specific config file, creating the directory if needed:
    /// ```toml
    /// [logging]
    /// level = "info"
    /// file = "$GRADEPLAN/logs/gradeplan.log"
    /// verbose = false
    ///
    /// [paths]
    /// data_file = "$GRADEPLAN/semesters.json"
    /// reports_dir = "$GRADEPLAN/reports"
    ///
    /// [grading]
    /// default_credits = 3.0
    /// default_grade_point = 2.0
    /// parse_mode = "heuristic"
    /// summer_placement = "interleaved"
    /// ```
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized, the directory
    /// cannot be created or the file cannot be written
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&config_file, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key
    ///
    /// Supported keys:
    /// - `level`, `file`, `verbose`: logging
    /// - `data_file`, `reports_dir`: paths
    /// - `default_credits`, `default_grade_point`, `parse_mode`,
    ///   `summer_placement`: grading
    ///
    /// Dashed spellings (`data-file`) are accepted too.
    ///
    /// # Returns
    /// - `Some(String)`: The configuration value as a string
    /// - `None`: If the key is not recognized
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "data_file" | "data-file" => Some(self.paths.data_file.clone()),
            "reports_dir" | "reports-dir" => Some(self.paths.reports_dir.clone()),
            "default_credits" | "default-credits" => {
                Some(self.grading.default_credits.to_string())
            }
            "default_grade_point" | "default-grade-point" => {
                Some(self.grading.default_grade_point.to_string())
            }
            "parse_mode" | "parse-mode" => Some(self.grading.parse_mode.to_string()),
            "summer_placement" | "summer-placement" => {
                Some(self.grading.summer_placement.to_string())
            }
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// Values are validated and converted to the field type:
    /// - `verbose`: `true` or `false`
    /// - `default_credits`: non-negative number
    /// - `default_grade_point`: number between 0 and 4
    /// - `parse_mode`: `heuristic` or `template`
    /// - `summer_placement`: `interleaved` or `after_academic_years`
    ///
    /// Updates the in-memory config only; call [`save()`](Config::save) to
    /// persist.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized or the value is invalid
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "level" => self.logging.level = value.parse::<Level>()?.as_str().to_string(),
            "file" => self.logging.file = value.to_string(),
            "verbose" => {
                self.logging.verbose = value
                    .parse::<bool>()
                    .map_err(|_| format!("Invalid boolean value for 'verbose': '{value}'"))?;
            }
            "data_file" | "data-file" => self.paths.data_file = value.to_string(),
            "reports_dir" | "reports-dir" => self.paths.reports_dir = value.to_string(),
            "default_credits" | "default-credits" => {
                self.grading.default_credits = value
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|credits| credits.is_finite() && *credits >= 0.0)
                    .ok_or_else(|| {
                        format!("Invalid value for 'default_credits': '{value}' (expected a non-negative number)")
                    })?;
            }
            "default_grade_point" | "default-grade-point" => {
                self.grading.default_grade_point = value
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|point| (0.0..=MAX_GPA).contains(point))
                    .ok_or_else(|| {
                        format!("Invalid value for 'default_grade_point': '{value}' (expected 0 to 4)")
                    })?;
            }
            "parse_mode" | "parse-mode" => self.grading.parse_mode = value.parse()?,
            "summer_placement" | "summer-placement" => {
                self.grading.summer_placement = value.parse()?;
            }
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Unset a configuration value by key (reset to default)
    ///
    /// The default value is taken from `defaults` (typically
    /// [`from_defaults()`](Config::from_defaults)). Updates the in-memory
    /// config only.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match key {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "data_file" | "data-file" => self.paths.data_file.clone_from(&defaults.paths.data_file),
            "reports_dir" | "reports-dir" => self
                .paths
                .reports_dir
                .clone_from(&defaults.paths.reports_dir),
            "default_credits" | "default-credits" => {
                self.grading.default_credits = defaults.grading.default_credits;
            }
            "default_grade_point" | "default-grade-point" => {
                self.grading.default_grade_point = defaults.grading.default_grade_point;
            }
            "parse_mode" | "parse-mode" => self.grading.parse_mode = defaults.grading.parse_mode,
            "summer_placement" | "summer-placement" => {
                self.grading.summer_placement = defaults.grading.summer_placement;
            }
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset all configuration to defaults
    ///
    /// Deletes the configuration file so the next [`load()`](Config::load)
    /// recreates it. Succeeds if the file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be deleted
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }

    /// Path of the semester data file
    #[must_use]
    pub fn data_file_path(&self) -> PathBuf {
        if self.paths.data_file.is_empty() {
            Self::get_gradeplan_dir().join("semesters.json")
        } else {
            PathBuf::from(&self.paths.data_file)
        }
    }

    /// Grade scale with the configured default point
    #[must_use]
    pub const fn grade_scale(&self) -> GradeScale {
        GradeScale::with_default_point(self.grading.default_grade_point)
    }

    /// Course parser built from the grading settings
    #[must_use]
    pub const fn course_parser(&self) -> CourseParser {
        CourseParser::new(
            self.grading.parse_mode,
            self.grade_scale(),
            self.grading.default_credits,
        )
    }

    /// Organizer built from the grading settings
    #[must_use]
    pub const fn organizer(&self) -> Organizer {
        Organizer::new(self.grading.summer_placement)
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  data_file = \"{}\"", self.paths.data_file)?;
        writeln!(f, "  reports_dir = \"{}\"", self.paths.reports_dir)?;

        writeln!(f, "\n[grading]")?;
        writeln!(f, "  default_credits = {}", self.grading.default_credits)?;
        writeln!(
            f,
            "  default_grade_point = {}",
            self.grading.default_grade_point
        )?;
        writeln!(f, "  parse_mode = \"{}\"", self.grading.parse_mode)?;
        writeln!(
            f,
            "  summer_placement = \"{}\"",
            self.grading.summer_placement
        )?;

        Ok(())
    }
}
