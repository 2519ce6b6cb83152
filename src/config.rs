//! Configuration loading and management
//!
//! Handles parsing of the optional `mytasks.toml` file kept in the data
//! directory, and resolution of the data directory itself.

use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::{TaskPriority, TaskStatus};

/// File name of the configuration file inside the data directory
pub const CONFIG_FILE: &str = "mytasks.toml";

/// Environment variable that overrides the data directory
pub const DATA_DIR_ENV: &str = "MYTASKS_DATA_DIR";

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Author recorded on comments when none is given
    #[serde(default = "default_author")]
    pub author: String,

    /// Alarm configuration
    #[serde(default)]
    pub alarms: AlarmConfig,

    /// Task defaults
    #[serde(default)]
    pub tasks: TasksConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            author: default_author(),
            alarms: AlarmConfig::default(),
            tasks: TasksConfig::default(),
        }
    }
}

fn default_author() -> String {
    "CurrentUser".to_string()
}

/// Alarm-related configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AlarmConfig {
    /// How far ahead of a due time an alarm fires
    #[serde(default = "default_lead_time")]
    pub lead_time: String,

    /// How often `alarms --watch` rescans
    #[serde(default = "default_check_interval")]
    pub check_interval: String,
}

fn default_lead_time() -> String {
    "12h".to_string()
}

fn default_check_interval() -> String {
    "5m".to_string()
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            lead_time: default_lead_time(),
            check_interval: default_check_interval(),
        }
    }
}

impl AlarmConfig {
    pub fn lead_time(&self) -> Result<Duration> {
        parse_duration(&self.lead_time)
    }

    pub fn check_interval(&self) -> Result<Duration> {
        parse_duration(&self.check_interval)
    }

    fn validate(&self) -> Result<()> {
        let lead = self
            .lead_time()
            .map_err(|err| Error::InvalidConfig(format!("alarms.lead_time: {err}")))?;
        if lead <= Duration::zero() {
            return Err(Error::InvalidConfig(
                "alarms.lead_time must be > 0".to_string(),
            ));
        }
        let interval = self
            .check_interval()
            .map_err(|err| Error::InvalidConfig(format!("alarms.check_interval: {err}")))?;
        if interval < Duration::seconds(1) {
            return Err(Error::InvalidConfig(
                "alarms.check_interval must be at least 1s".to_string(),
            ));
        }
        Ok(())
    }
}

/// Task defaults
#[derive(Debug, Clone, Deserialize)]
pub struct TasksConfig {
    /// Priority for new tasks when none is given
    #[serde(default = "default_task_priority")]
    pub default_priority: String,

    /// Status for new tasks when none is given
    #[serde(default = "default_task_status")]
    pub default_status: String,
}

fn default_task_priority() -> String {
    "medium".to_string()
}

fn default_task_status() -> String {
    "pending".to_string()
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            default_priority: default_task_priority(),
            default_status: default_task_status(),
        }
    }
}

impl TasksConfig {
    pub fn default_priority(&self) -> Result<TaskPriority> {
        self.default_priority.parse().map_err(|_| {
            Error::InvalidConfig(format!(
                "tasks.default_priority: invalid priority '{}' (expected low|medium|high)",
                self.default_priority
            ))
        })
    }

    pub fn default_status(&self) -> Result<TaskStatus> {
        self.default_status.parse().map_err(|_| {
            Error::InvalidConfig(format!(
                "tasks.default_status: invalid status '{}' (expected pending|done|question)",
                self.default_status
            ))
        })
    }

    fn validate(&self) -> Result<()> {
        self.default_priority()?;
        self.default_status()?;
        Ok(())
    }
}

impl Config {
    /// Load configuration from a `mytasks.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a data directory, or return defaults
    pub fn load_from_dir(data_dir: &Path) -> Self {
        let config_path = data_dir.join(CONFIG_FILE);
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load(&config_path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(
                    path = %config_path.display(),
                    error = %err,
                    "ignoring invalid config, using defaults"
                );
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.author.trim().is_empty() {
            return Err(Error::InvalidConfig("author cannot be empty".to_string()));
        }
        self.alarms.validate()?;
        self.tasks.validate()?;
        Ok(())
    }
}

/// Resolve the data directory.
///
/// Order: explicit flag, `MYTASKS_DATA_DIR`, the platform data directory,
/// then `./data`.
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir;
    }
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        let dir = PathBuf::from(dir);
        if !dir.as_os_str().is_empty() {
            return dir;
        }
    }
    directories::ProjectDirs::from("", "", "mytasks")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("data"))
}

/// Parse a duration string like "30m", "12h" or "2d"
///
/// A bare number is read as minutes.
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();

    if s.is_empty() {
        return Err(Error::InvalidArgument("Duration cannot be empty".to_string()));
    }

    let (num_str, unit) = if let Some(pos) = s.find(|c: char| !c.is_ascii_digit()) {
        (&s[..pos], &s[pos..])
    } else {
        (s, "m")
    };

    let num: i64 = num_str.parse().map_err(|_| {
        Error::InvalidArgument(format!("Invalid duration number: {}", num_str))
    })?;

    let duration = match unit.trim().to_lowercase().as_str() {
        "s" | "sec" | "second" | "seconds" => Duration::try_seconds(num),
        "m" | "min" | "minute" | "minutes" => Duration::try_minutes(num),
        "h" | "hr" | "hour" | "hours" => Duration::try_hours(num),
        "d" | "day" | "days" => Duration::try_days(num),
        "w" | "week" | "weeks" => Duration::try_weeks(num),
        _ => {
            return Err(Error::InvalidArgument(format!(
                "Invalid duration unit '{}'. Expected: s, m, h, d, w",
                unit
            )));
        }
    };

    duration.ok_or_else(|| Error::InvalidArgument(format!("Duration out of range: {}", s)))
}

/// Render a duration the way config values are written ("12 hours")
pub fn describe_duration(duration: Duration) -> String {
    let secs = duration.num_seconds();
    let (value, unit) = if secs % 604_800 == 0 && secs >= 604_800 {
        (secs / 604_800, "week")
    } else if secs % 86_400 == 0 && secs >= 86_400 {
        (secs / 86_400, "day")
    } else if secs % 3_600 == 0 && secs >= 3_600 {
        (secs / 3_600, "hour")
    } else if secs % 60 == 0 && secs >= 60 {
        (secs / 60, "minute")
    } else {
        (secs, "second")
    };
    if value == 1 {
        format!("{value} {unit}")
    } else {
        format!("{value} {unit}s")
    }
}
