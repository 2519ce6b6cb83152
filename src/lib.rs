//! mytasks - local task lists with a daily agenda
//!
//! # Core Concepts
//!
//! - **Task lists**: named containers for tasks, unique by name
//! - **Workspaces**: optional groups of task lists
//! - **Agenda**: the tasks of one list whose schedule covers a given day
//! - **Alarms**: open tasks due within a lead time, reported once each
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `mytasks.toml`
//! - `error`: Error types and result aliases
//! - `model`: Tasks, lists, workspaces, comments, attachments
//! - `schedule`: Date filtering, view ordering, and labels
//! - `storage`: Data directory layout and JSON file I/O
//! - `store`: In-memory task store with persisted mutations
//! - `alarm`: Due-soon scanning
//! - `lock`: File locking and atomic writes

pub mod alarm;
pub mod cli;
pub mod config;
pub mod error;
pub mod lock;
pub mod model;
pub mod output;
pub mod schedule;
pub mod storage;
pub mod store;

pub use error::{Error, Result};
pub use store::{NewTask, TaskStore};
