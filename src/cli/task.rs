//! mytasks task command implementation
//!
//! Create, inspect, edit, comment on, and delete tasks.

use serde::Serialize;

use super::{short_id, CommonOptions};
use crate::error::Result;
use crate::model::{Attachment, Comment, Task, TaskPriority, TaskStatus};
use crate::output::{emit_success, HumanOutput};
use crate::schedule::{format_due, parse_datetime, schedule_label};
use crate::store::{NewTask, TaskStore};

/// Options for `mytasks task new`
pub struct NewOptions {
    pub list: String,
    pub description: String,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub start: Option<String>,
    pub due: Option<String>,
    pub common: CommonOptions,
}

/// Options for `mytasks task show`
pub struct ShowOptions {
    pub task: String,
    pub common: CommonOptions,
}

/// Options for `mytasks task edit`
pub struct EditOptions {
    pub task: String,
    pub description: Option<String>,
    pub start: Option<String>,
    pub due: Option<String>,
    pub clear_start: bool,
    pub clear_due: bool,
    pub list: Option<String>,
    pub common: CommonOptions,
}

/// Options for `mytasks task status`
pub struct StatusOptions {
    pub task: String,
    pub status: String,
    pub common: CommonOptions,
}

/// Options for `mytasks task priority`
pub struct PriorityOptions {
    pub task: String,
    pub priority: String,
    pub common: CommonOptions,
}

/// Options for `mytasks task pin` and `mytasks task unpin`
pub struct PinOptions {
    pub task: String,
    pub pinned: bool,
    pub common: CommonOptions,
}

/// Options for `mytasks task comment`
pub struct CommentOptions {
    pub task: String,
    pub text: String,
    pub author: Option<String>,
    pub common: CommonOptions,
}

/// Options for `mytasks task attach`
pub struct AttachOptions {
    pub task: String,
    pub path: String,
    pub name: Option<String>,
    pub common: CommonOptions,
}

/// Options for `mytasks task detach`
pub struct DetachOptions {
    pub task: String,
    pub index: usize,
    pub common: CommonOptions,
}

/// Options for `mytasks task rm`
pub struct RmOptions {
    pub task: String,
    pub common: CommonOptions,
}

#[derive(Serialize)]
struct TaskReport {
    #[serde(flatten)]
    task: Task,
    list_name: Option<String>,
}

#[derive(Serialize)]
struct CommentReport {
    task_id: String,
    comment: Comment,
}

#[derive(Serialize)]
struct AttachmentReport {
    task_id: String,
    index: usize,
    attachment: Attachment,
}

fn list_name(store: &TaskStore, task: &Task) -> Option<String> {
    task.assigned_to
        .as_deref()
        .and_then(|id| store.task_list(id))
        .map(|list| list.name.clone())
}

fn report(store: &TaskStore, task: Task) -> TaskReport {
    TaskReport {
        list_name: list_name(store, &task),
        task,
    }
}

fn parse_optional(value: Option<&str>) -> Result<Option<chrono::NaiveDateTime>> {
    value.map(parse_datetime).transpose()
}

/// Summary rows shared by every command that prints a task
fn push_task_summary(human: &mut HumanOutput, task: &Task, list_name: Option<&str>) {
    human.push_summary("id", task.id.clone());
    human.push_summary("list", list_name.unwrap_or("(unassigned)").to_string());
    human.push_summary("status", task.status.to_string());
    human.push_summary("priority", task.priority.to_string());
    if task.start_at.is_some() {
        human.push_summary("start", format_due(task.start_at));
    }
    human.push_summary("due", format_due(task.due_at));
    if task.pinned {
        human.push_summary("pinned", "yes");
    }
}

pub fn run_new(options: NewOptions) -> Result<()> {
    let mut store = options.common.open_store()?;
    let list_id = store.find_task_list(&options.list)?.id.clone();

    let mut new = NewTask::new(list_id, options.description);
    new.priority = options
        .priority
        .as_deref()
        .map(str::parse::<TaskPriority>)
        .transpose()?;
    new.status = options
        .status
        .as_deref()
        .map(str::parse::<TaskStatus>)
        .transpose()?;
    new.start_at = parse_optional(options.start.as_deref())?;
    new.due_at = parse_optional(options.due.as_deref())?;

    let task = store.add_task(new)?;
    let report = report(&store, task);

    let mut human = HumanOutput::new(format!("mytasks task new: {}", report.task.description));
    push_task_summary(&mut human, &report.task, report.list_name.as_deref());
    human.push_next_step(format!("mytasks task show {}", short_id(&report.task.id)));

    emit_success(options.common.output(), "task new", &report, Some(&human))?;
    Ok(())
}

pub fn run_show(options: ShowOptions) -> Result<()> {
    let store = options.common.open_store()?;
    let task = store.find_task(&options.task)?.clone();
    let report = report(&store, task);
    let task = &report.task;

    let mut human = HumanOutput::new(format!(
        "{}{}",
        task.description,
        schedule_label(task)
    ));
    push_task_summary(&mut human, task, report.list_name.as_deref());
    human.push_summary("created", task.created_at.format("%Y-%m-%d %H:%M").to_string());
    for comment in &task.comments {
        human.push_detail(format!(
            "{} at {}: {}",
            comment.author,
            comment.timestamp.format("%Y-%m-%d %H:%M"),
            comment.text
        ));
    }
    for (index, attachment) in task.attachments.iter().enumerate() {
        human.push_detail(format!(
            "attachment [{index}] {} ({})",
            attachment.name, attachment.path
        ));
    }

    emit_success(options.common.output(), "task show", &report, Some(&human))?;
    Ok(())
}

pub fn run_edit(options: EditOptions) -> Result<()> {
    let mut store = options.common.open_store()?;
    let mut task = store.find_task(&options.task)?.clone();

    if let Some(description) = options.description {
        task.description = description;
    }
    if options.clear_start {
        task.start_at = None;
    } else if let Some(start) = parse_optional(options.start.as_deref())? {
        task.start_at = Some(start);
    }
    if options.clear_due {
        task.due_at = None;
    } else if let Some(due) = parse_optional(options.due.as_deref())? {
        task.due_at = Some(due);
    }
    if let Some(list) = options.list.as_deref() {
        task.assigned_to = Some(store.find_task_list(list)?.id.clone());
    }

    store.update_task(task.clone())?;
    let report = report(&store, task);

    let mut human = HumanOutput::new(format!("mytasks task edit: {}", report.task.description));
    push_task_summary(&mut human, &report.task, report.list_name.as_deref());

    emit_success(options.common.output(), "task edit", &report, Some(&human))?;
    Ok(())
}

pub fn run_status(options: StatusOptions) -> Result<()> {
    let status: TaskStatus = options.status.parse()?;
    let mut store = options.common.open_store()?;
    let id = store.find_task(&options.task)?.id.clone();
    let task = store.set_status(&id, status)?;
    let report = report(&store, task);

    let mut human = HumanOutput::new(format!(
        "mytasks task status: {} -> {}",
        report.task.description, report.task.status
    ));
    human.push_summary("id", report.task.id.clone());

    emit_success(options.common.output(), "task status", &report, Some(&human))?;
    Ok(())
}

pub fn run_priority(options: PriorityOptions) -> Result<()> {
    let priority: TaskPriority = options.priority.parse()?;
    let mut store = options.common.open_store()?;
    let id = store.find_task(&options.task)?.id.clone();
    let task = store.set_priority(&id, priority)?;
    let report = report(&store, task);

    let mut human = HumanOutput::new(format!(
        "mytasks task priority: {} -> {}",
        report.task.description, report.task.priority
    ));
    human.push_summary("id", report.task.id.clone());

    emit_success(options.common.output(), "task priority", &report, Some(&human))?;
    Ok(())
}

pub fn run_pin(options: PinOptions) -> Result<()> {
    let mut store = options.common.open_store()?;
    let id = store.find_task(&options.task)?.id.clone();
    let task = store.set_pinned(&id, options.pinned)?;
    let report = report(&store, task);

    let (command, verb) = if options.pinned {
        ("task pin", "pinned")
    } else {
        ("task unpin", "unpinned")
    };
    let mut human = HumanOutput::new(format!("mytasks {command}: {} {verb}", report.task.description));
    human.push_summary("id", report.task.id.clone());

    emit_success(options.common.output(), command, &report, Some(&human))?;
    Ok(())
}

pub fn run_comment(options: CommentOptions) -> Result<()> {
    let mut store = options.common.open_store()?;
    let id = store.find_task(&options.task)?.id.clone();
    let comment = store.add_comment(&id, &options.text, options.author.as_deref())?;

    let mut human = HumanOutput::new("mytasks task comment: added");
    human.push_summary("task", id.clone());
    human.push_summary("author", comment.author.clone());

    let report = CommentReport {
        task_id: id,
        comment,
    };
    emit_success(options.common.output(), "task comment", &report, Some(&human))?;
    Ok(())
}

pub fn run_attach(options: AttachOptions) -> Result<()> {
    let mut store = options.common.open_store()?;
    let id = store.find_task(&options.task)?.id.clone();
    let attachment = store.add_attachment(&id, &options.path, options.name)?;
    let index = store
        .task(&id)
        .map(|task| task.attachments.len().saturating_sub(1))
        .unwrap_or_default();

    let mut human = HumanOutput::new(format!("mytasks task attach: {}", attachment.name));
    human.push_summary("task", id.clone());
    human.push_summary("index", index.to_string());
    human.push_summary("path", attachment.path.clone());
    if !std::path::Path::new(&attachment.path).exists() {
        human.push_warning(format!("{} does not exist yet", attachment.path));
    }

    let report = AttachmentReport {
        task_id: id,
        index,
        attachment,
    };
    emit_success(options.common.output(), "task attach", &report, Some(&human))?;
    Ok(())
}

pub fn run_detach(options: DetachOptions) -> Result<()> {
    let mut store = options.common.open_store()?;
    let id = store.find_task(&options.task)?.id.clone();
    let attachment = store.remove_attachment(&id, options.index)?;

    let mut human = HumanOutput::new(format!("mytasks task detach: {}", attachment.name));
    human.push_summary("task", id.clone());

    let report = AttachmentReport {
        task_id: id,
        index: options.index,
        attachment,
    };
    emit_success(options.common.output(), "task detach", &report, Some(&human))?;
    Ok(())
}

pub fn run_rm(options: RmOptions) -> Result<()> {
    let mut store = options.common.open_store()?;
    let id = store.find_task(&options.task)?.id.clone();
    let list_name = store.task(&id).and_then(|task| list_name(&store, task));
    let task = store.delete_task(&id)?;

    let mut human = HumanOutput::new(format!("mytasks task rm: {}", task.description));
    human.push_summary("id", task.id.clone());

    let report = TaskReport { task, list_name };
    emit_success(options.common.output(), "task rm", &report, Some(&human))?;
    Ok(())
}
