//! mytasks list command implementation
//!
//! Create, rename, delete, and group task lists.

use serde::Serialize;

use super::{short_id, CommonOptions};
use crate::error::Result;
use crate::model::TaskList;
use crate::output::{emit_success, HumanOutput};
use crate::store::TaskStore;

/// Options for `mytasks list new`
pub struct NewOptions {
    pub name: String,
    pub workspace: Option<String>,
    pub common: CommonOptions,
}

/// Options for `mytasks list rename`
pub struct RenameOptions {
    pub list: String,
    pub name: String,
    pub common: CommonOptions,
}

/// Options for `mytasks list rm`
pub struct RmOptions {
    pub list: String,
    pub common: CommonOptions,
}

/// Options for `mytasks list move`
pub struct MoveOptions {
    pub list: String,
    pub workspace: Option<String>,
    pub common: CommonOptions,
}

#[derive(Serialize)]
struct ListSummary {
    id: String,
    name: String,
    workspace: Option<String>,
    workspace_name: Option<String>,
    task_count: usize,
}

#[derive(Serialize)]
struct ListsReport {
    lists: Vec<ListSummary>,
}

#[derive(Serialize)]
struct RemoveReport {
    id: String,
    name: String,
    unassigned_tasks: usize,
}

fn summarize(store: &TaskStore, list: &TaskList) -> ListSummary {
    ListSummary {
        id: list.id.clone(),
        name: list.name.clone(),
        workspace: list.workspace.clone(),
        workspace_name: list
            .workspace
            .as_deref()
            .and_then(|id| store.workspace(id))
            .map(|ws| ws.name.clone()),
        task_count: store.tasks_for_task_list(&list.id).len(),
    }
}

fn resolve_workspace(store: &TaskStore, key: Option<&str>) -> Result<Option<String>> {
    key.map(|key| store.find_workspace(key).map(|ws| ws.id.clone()))
        .transpose()
}

pub fn run_new(options: NewOptions) -> Result<()> {
    let mut store = options.common.open_store()?;
    let workspace = resolve_workspace(&store, options.workspace.as_deref())?;
    let list = store.add_task_list(&options.name, workspace.as_deref())?;
    let report = summarize(&store, &list);

    let mut human = HumanOutput::new(format!("mytasks list new: {}", list.name));
    human.push_summary("id", list.id.clone());
    if let Some(name) = &report.workspace_name {
        human.push_summary("workspace", name.clone());
    }
    human.push_next_step(format!("mytasks task new \"{}\" \"<description>\"", list.name));

    emit_success(options.common.output(), "list new", &report, Some(&human))?;
    Ok(())
}

pub fn run_ls(common: CommonOptions) -> Result<()> {
    let store = common.open_store()?;
    let lists: Vec<ListSummary> = store
        .task_lists()
        .iter()
        .map(|list| summarize(&store, list))
        .collect();

    let mut human = HumanOutput::new(format!("mytasks lists ({})", lists.len()));
    for list in &lists {
        let group = list
            .workspace_name
            .as_deref()
            .map(|name| format!(" [{name}]"))
            .unwrap_or_default();
        human.push_detail(format!(
            "{} {}{} ({} tasks)",
            short_id(&list.id),
            list.name,
            group,
            list.task_count
        ));
    }
    if lists.is_empty() {
        human.push_next_step("mytasks list new <name>");
    }

    emit_success(common.output(), "list ls", &ListsReport { lists }, Some(&human))?;
    Ok(())
}

pub fn run_rename(options: RenameOptions) -> Result<()> {
    let mut store = options.common.open_store()?;
    let id = store.find_task_list(&options.list)?.id.clone();
    let old_name = store.task_list(&id).map(|l| l.name.clone()).unwrap_or_default();
    let list = store.rename_task_list(&id, &options.name)?;
    let report = summarize(&store, &list);

    let mut human = HumanOutput::new(format!("mytasks list rename: {}", list.name));
    human.push_summary("id", list.id.clone());
    human.push_summary("previous name", old_name);

    emit_success(options.common.output(), "list rename", &report, Some(&human))?;
    Ok(())
}

pub fn run_rm(options: RmOptions) -> Result<()> {
    let mut store = options.common.open_store()?;
    let list = store.find_task_list(&options.list)?.clone();
    let unassigned = store.delete_task_list(&list.id)?;

    let report = RemoveReport {
        id: list.id.clone(),
        name: list.name.clone(),
        unassigned_tasks: unassigned,
    };

    let mut human = HumanOutput::new(format!("mytasks list rm: {}", list.name));
    human.push_summary("id", list.id);
    if unassigned > 0 {
        human.push_warning(format!("{unassigned} task(s) are now unassigned"));
        human.push_next_step("mytasks overview");
    }

    emit_success(options.common.output(), "list rm", &report, Some(&human))?;
    Ok(())
}

pub fn run_move(options: MoveOptions) -> Result<()> {
    let mut store = options.common.open_store()?;
    let id = store.find_task_list(&options.list)?.id.clone();
    let workspace = resolve_workspace(&store, options.workspace.as_deref())?;
    let list = store.move_task_list(&id, workspace.as_deref())?;
    let report = summarize(&store, &list);

    let header = match &report.workspace_name {
        Some(name) => format!("mytasks list move: {} -> {}", list.name, name),
        None => format!("mytasks list move: {} ungrouped", list.name),
    };
    let mut human = HumanOutput::new(header);
    human.push_summary("id", list.id.clone());

    emit_success(options.common.output(), "list move", &report, Some(&human))?;
    Ok(())
}
