//! mytasks workspace command implementation

use serde::Serialize;

use super::{short_id, CommonOptions};
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};

/// Options for `mytasks workspace new`
pub struct NewOptions {
    pub name: String,
    pub common: CommonOptions,
}

/// Options for `mytasks workspace rename`
pub struct RenameOptions {
    pub workspace: String,
    pub name: String,
    pub common: CommonOptions,
}

/// Options for `mytasks workspace rm`
pub struct RmOptions {
    pub workspace: String,
    pub common: CommonOptions,
}

#[derive(Serialize)]
struct WorkspaceSummary {
    id: String,
    name: String,
    lists: Vec<String>,
}

#[derive(Serialize)]
struct WorkspacesReport {
    workspaces: Vec<WorkspaceSummary>,
}

#[derive(Serialize)]
struct RemoveReport {
    id: String,
    name: String,
    ungrouped_lists: usize,
}

pub fn run_new(options: NewOptions) -> Result<()> {
    let mut store = options.common.open_store()?;
    let workspace = store.add_workspace(&options.name)?;

    let mut human = HumanOutput::new(format!("mytasks workspace new: {}", workspace.name));
    human.push_summary("id", workspace.id.clone());
    human.push_next_step(format!(
        "mytasks list new <name> --workspace \"{}\"",
        workspace.name
    ));

    emit_success(options.common.output(), "workspace new", &workspace, Some(&human))?;
    Ok(())
}

pub fn run_ls(common: CommonOptions) -> Result<()> {
    let store = common.open_store()?;
    let mut workspaces = Vec::new();
    for workspace in store.workspaces() {
        let lists = store
            .task_lists_in_workspace(&workspace.id)?
            .into_iter()
            .map(|list| list.name)
            .collect();
        workspaces.push(WorkspaceSummary {
            id: workspace.id,
            name: workspace.name,
            lists,
        });
    }

    let mut human = HumanOutput::new(format!("mytasks workspaces ({})", workspaces.len()));
    for ws in &workspaces {
        if ws.lists.is_empty() {
            human.push_detail(format!("{} {} (no lists)", short_id(&ws.id), ws.name));
        } else {
            human.push_detail(format!(
                "{} {}: {}",
                short_id(&ws.id),
                ws.name,
                ws.lists.join(", ")
            ));
        }
    }

    emit_success(
        common.output(),
        "workspace ls",
        &WorkspacesReport { workspaces },
        Some(&human),
    )?;
    Ok(())
}

pub fn run_rename(options: RenameOptions) -> Result<()> {
    let mut store = options.common.open_store()?;
    let id = store.find_workspace(&options.workspace)?.id.clone();
    let workspace = store.rename_workspace(&id, &options.name)?;

    let mut human = HumanOutput::new(format!("mytasks workspace rename: {}", workspace.name));
    human.push_summary("id", workspace.id.clone());

    emit_success(options.common.output(), "workspace rename", &workspace, Some(&human))?;
    Ok(())
}

pub fn run_rm(options: RmOptions) -> Result<()> {
    let mut store = options.common.open_store()?;
    let workspace = store.find_workspace(&options.workspace)?.clone();
    let ungrouped = store.delete_workspace(&workspace.id)?;

    let report = RemoveReport {
        id: workspace.id.clone(),
        name: workspace.name.clone(),
        ungrouped_lists: ungrouped,
    };

    let mut human = HumanOutput::new(format!("mytasks workspace rm: {}", workspace.name));
    human.push_summary("id", workspace.id);
    if ungrouped > 0 {
        human.push_summary("ungrouped lists", ungrouped.to_string());
    }

    emit_success(options.common.output(), "workspace rm", &report, Some(&human))?;
    Ok(())
}
