//! Core records: tasks, task lists, workspaces, comments and attachments.
//!
//! Timestamps are local wall-clock times without an offset, written as
//! `YYYY-MM-DDTHH:MM:SS[.ffffff]`. Enum values are written as upper-case
//! names (`"PENDING"`, `"HIGH"`) and read back case-insensitively.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::error::{Error, Result};

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current local time, truncated to whole microseconds so values survive a
/// write/read cycle unchanged.
pub fn now_local() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond((now.nanosecond() / 1_000) * 1_000)
        .unwrap_or(now)
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    #[default]
    Pending,
    Done,
    Question,
}

impl TaskStatus {
    /// Name used in the data files
    pub fn as_name(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Done => "DONE",
            Self::Question => "QUESTION",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Done => write!(f, "Done"),
            Self::Question => write!(f, "Question"),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "DONE" => Ok(Self::Done),
            "QUESTION" => Ok(Self::Question),
            _ => Err(Error::InvalidArgument(format!(
                "invalid status '{}': must be pending, done, or question",
                s
            ))),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High];

    /// Sort rank, lowest first: High = 0, Medium = 1, Low = 2
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    pub fn as_name(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

impl FromStr for TaskPriority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" => Ok(Self::Low),
            "MEDIUM" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            _ => Err(Error::InvalidArgument(format!(
                "invalid priority '{}': must be low, medium, or high",
                s
            ))),
        }
    }
}

macro_rules! name_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_name())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

name_serde!(TaskStatus);
name_serde!(TaskPriority);

/// Lenient timestamp parsing for records written by older versions
pub mod timestamp {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer};

    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(value) = raw.parse::<NaiveDateTime>() {
            return Some(value);
        }
        if let Ok(value) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
            return Some(value);
        }
        if let Ok(value) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M") {
            return Some(value);
        }
        if let Ok(value) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M") {
            return Some(value);
        }
        if let Ok(value) = DateTime::parse_from_rfc3339(raw) {
            return Some(value.naive_local());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'")))
    }

    pub fn deserialize_opt<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
    pub author: String,
    #[serde(default = "now_local", deserialize_with = "timestamp::deserialize")]
    pub timestamp: NaiveDateTime,
}

impl Comment {
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
            timestamp: now_local(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub path: String,
    pub name: String,
    #[serde(default = "now_local", deserialize_with = "timestamp::deserialize")]
    pub added_at: NaiveDateTime,
}

impl Attachment {
    /// Reference a file on disk. `name` defaults to the path's file name.
    pub fn new(path: impl Into<String>, name: Option<String>) -> Self {
        let path = path.into();
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| {
                Path::new(&path)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.clone())
            });
        Self {
            path,
            name,
            added_at: now_local(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default = "now_local", deserialize_with = "timestamp::deserialize")]
    pub created_at: NaiveDateTime,
    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub start_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub due_at: Option<NaiveDateTime>,
    /// Owning task list id; `None` once the list is deleted
    #[serde(default)]
    pub assigned_to: Option<String>,
}

impl Task {
    pub fn new(description: impl Into<String>, assigned_to: Option<String>) -> Self {
        Self {
            id: new_id(),
            description: description.into(),
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            comments: Vec::new(),
            attachments: Vec::new(),
            pinned: false,
            created_at: now_local(),
            start_at: None,
            due_at: None,
            assigned_to,
        }
    }

    /// Reject a start that falls after the due time
    pub fn validate_schedule(&self) -> Result<()> {
        validate_schedule(self.start_at, self.due_at)
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }
}

pub fn validate_schedule(start: Option<NaiveDateTime>, due: Option<NaiveDateTime>) -> Result<()> {
    if let (Some(start), Some(due)) = (start, due) {
        if start > due {
            return Err(Error::InvalidSchedule {
                start: start.format("%Y-%m-%d %H:%M").to_string(),
                due: due.format("%Y-%m-%d %H:%M").to_string(),
            });
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    pub id: String,
    pub name: String,
    /// Workspace this list is grouped under, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,
}

impl TaskList {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            workspace: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: String,
    pub name: String,
    #[serde(default = "now_local", deserialize_with = "timestamp::deserialize")]
    pub created_at: NaiveDateTime,
}

impl Workspace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            created_at: now_local(),
        }
    }
}
