//! Command-line interface for mytasks
//!
//! This module defines the CLI structure using clap derive macros.
//! Each command group is implemented in its own submodule.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{resolve_data_dir, Config};
use crate::error::Result;
use crate::output::OutputOptions;
use crate::storage::Storage;
use crate::store::TaskStore;

mod agenda;
mod alarms;
mod list;
mod task;
mod workspace;

/// mytasks - local task lists with a daily agenda
///
/// Tasks live in named lists, optionally grouped into workspaces, and are
/// stored as plain JSON in a data directory.
#[derive(Parser, Debug)]
#[command(name = "mytasks")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data directory (defaults to the platform data directory)
    #[arg(long, global = true, env = "MYTASKS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Task list management
    #[command(subcommand)]
    List(ListCommands),

    /// Workspace management (groups of task lists)
    #[command(subcommand)]
    Workspace(WorkspaceCommands),

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Show the daily view for a task list
    Agenda {
        /// Task list id, id prefix, or name
        list: String,

        /// Day to show (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Show every list with its tasks, then unassigned tasks
    Overview,

    /// Report tasks due soon
    Alarms {
        /// Keep running and rescan on the configured interval
        #[arg(long)]
        watch: bool,
    },
}

/// Task list subcommands
#[derive(Subcommand, Debug)]
pub enum ListCommands {
    /// Create a task list
    New {
        /// List name (unique, case-insensitive)
        name: String,

        /// Workspace to group the list under
        #[arg(long)]
        workspace: Option<String>,
    },

    /// List task lists
    Ls,

    /// Rename a task list
    Rename {
        /// Task list id, id prefix, or name
        list: String,

        /// New name
        name: String,
    },

    /// Delete a task list (its tasks become unassigned)
    Rm {
        /// Task list id, id prefix, or name
        list: String,
    },

    /// Move a task list into a workspace, or out of one
    Move {
        /// Task list id, id prefix, or name
        list: String,

        /// Target workspace (omit to ungroup)
        #[arg(long)]
        workspace: Option<String>,
    },
}

/// Workspace subcommands
#[derive(Subcommand, Debug)]
pub enum WorkspaceCommands {
    /// Create a workspace
    New {
        /// Workspace name (unique, case-insensitive)
        name: String,
    },

    /// List workspaces
    Ls,

    /// Rename a workspace
    Rename {
        /// Workspace id, id prefix, or name
        workspace: String,

        /// New name
        name: String,
    },

    /// Delete a workspace (its lists are ungrouped)
    Rm {
        /// Workspace id, id prefix, or name
        workspace: String,
    },
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Create a task in a list
    New {
        /// Task list id, id prefix, or name
        list: String,

        /// Task description
        description: String,

        /// Priority: low, medium, high
        #[arg(long)]
        priority: Option<String>,

        /// Status: pending, done, question
        #[arg(long)]
        status: Option<String>,

        /// Start time (YYYY-MM-DD [HH:MM])
        #[arg(long)]
        start: Option<String>,

        /// Due time (YYYY-MM-DD [HH:MM])
        #[arg(long)]
        due: Option<String>,
    },

    /// Show task details, comments, and attachments
    Show {
        /// Task id or id prefix
        task: String,
    },

    /// Edit description, schedule, or owning list
    Edit {
        /// Task id or id prefix
        task: String,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New start time
        #[arg(long, conflicts_with = "clear_start")]
        start: Option<String>,

        /// New due time
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,

        /// Remove the start time
        #[arg(long)]
        clear_start: bool,

        /// Remove the due time
        #[arg(long)]
        clear_due: bool,

        /// Move the task to another list
        #[arg(long)]
        list: Option<String>,
    },

    /// Set task status
    Status {
        /// Task id or id prefix
        task: String,

        /// pending, done, or question
        status: String,
    },

    /// Set task priority
    Priority {
        /// Task id or id prefix
        task: String,

        /// low, medium, or high
        priority: String,
    },

    /// Pin a task to the top of the daily view
    Pin {
        /// Task id or id prefix
        task: String,
    },

    /// Unpin a task
    Unpin {
        /// Task id or id prefix
        task: String,
    },

    /// Add a comment to a task
    Comment {
        /// Task id or id prefix
        task: String,

        /// Comment text
        text: String,

        /// Comment author (defaults to the configured author)
        #[arg(long)]
        author: Option<String>,
    },

    /// Attach a file reference to a task
    Attach {
        /// Task id or id prefix
        task: String,

        /// Path to the file
        path: String,

        /// Display name (defaults to the file name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Remove an attachment by index (as shown by `task show`)
    Detach {
        /// Task id or id prefix
        task: String,

        /// Attachment index
        index: usize,
    },

    /// Delete a task permanently
    Rm {
        /// Task id or id prefix
        task: String,
    },
}

/// Flags shared by every command
#[derive(Debug, Clone)]
pub struct CommonOptions {
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

impl CommonOptions {
    pub fn output(&self) -> OutputOptions {
        OutputOptions {
            json: self.json,
            quiet: self.quiet,
        }
    }

    /// Resolve the data directory, load its config, and open the store
    pub fn open_store(&self) -> Result<TaskStore> {
        let data_dir = resolve_data_dir(self.data_dir.clone());
        let config = Config::load_from_dir(&data_dir);
        tracing::debug!(data_dir = %data_dir.display(), "opening task store");
        TaskStore::open(Storage::new(data_dir), config)
    }
}

/// First eight characters of an id, for human output
pub(crate) fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let common = CommonOptions {
            data_dir: self.data_dir,
            json: self.json,
            quiet: self.quiet,
        };

        match self.command {
            Commands::List(cmd) => match cmd {
                ListCommands::New { name, workspace } => {
                    list::run_new(list::NewOptions {
                        name,
                        workspace,
                        common,
                    })
                }
                ListCommands::Ls => list::run_ls(common),
                ListCommands::Rename { list, name } => {
                    list::run_rename(list::RenameOptions { list, name, common })
                }
                ListCommands::Rm { list } => list::run_rm(list::RmOptions { list, common }),
                ListCommands::Move { list, workspace } => {
                    list::run_move(list::MoveOptions {
                        list,
                        workspace,
                        common,
                    })
                }
            },
            Commands::Workspace(cmd) => match cmd {
                WorkspaceCommands::New { name } => {
                    workspace::run_new(workspace::NewOptions { name, common })
                }
                WorkspaceCommands::Ls => workspace::run_ls(common),
                WorkspaceCommands::Rename { workspace, name } => {
                    workspace::run_rename(workspace::RenameOptions {
                        workspace,
                        name,
                        common,
                    })
                }
                WorkspaceCommands::Rm { workspace } => {
                    workspace::run_rm(workspace::RmOptions { workspace, common })
                }
            },
            Commands::Task(cmd) => match cmd {
                TaskCommands::New {
                    list,
                    description,
                    priority,
                    status,
                    start,
                    due,
                } => task::run_new(task::NewOptions {
                    list,
                    description,
                    priority,
                    status,
                    start,
                    due,
                    common,
                }),
                TaskCommands::Show { task } => task::run_show(task::ShowOptions { task, common }),
                TaskCommands::Edit {
                    task,
                    description,
                    start,
                    due,
                    clear_start,
                    clear_due,
                    list,
                } => task::run_edit(task::EditOptions {
                    task,
                    description,
                    start,
                    due,
                    clear_start,
                    clear_due,
                    list,
                    common,
                }),
                TaskCommands::Status { task, status } => {
                    task::run_status(task::StatusOptions {
                        task,
                        status,
                        common,
                    })
                }
                TaskCommands::Priority { task, priority } => {
                    task::run_priority(task::PriorityOptions {
                        task,
                        priority,
                        common,
                    })
                }
                TaskCommands::Pin { task } => task::run_pin(task::PinOptions {
                    task,
                    pinned: true,
                    common,
                }),
                TaskCommands::Unpin { task } => task::run_pin(task::PinOptions {
                    task,
                    pinned: false,
                    common,
                }),
                TaskCommands::Comment { task, text, author } => {
                    task::run_comment(task::CommentOptions {
                        task,
                        text,
                        author,
                        common,
                    })
                }
                TaskCommands::Attach { task, path, name } => {
                    task::run_attach(task::AttachOptions {
                        task,
                        path,
                        name,
                        common,
                    })
                }
                TaskCommands::Detach { task, index } => {
                    task::run_detach(task::DetachOptions {
                        task,
                        index,
                        common,
                    })
                }
                TaskCommands::Rm { task } => task::run_rm(task::RmOptions { task, common }),
            },
            Commands::Agenda { list, date } => {
                agenda::run_agenda(agenda::AgendaOptions { list, date, common })
            }
            Commands::Overview => agenda::run_overview(common),
            Commands::Alarms { watch } => alarms::run(alarms::AlarmsOptions { watch, common }),
        }
    }
}
