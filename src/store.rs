//! In-memory task store backed by the JSON data files
//!
//! `TaskStore` keeps every record in memory keyed by id and rewrites the
//! file(s) a mutation touches before returning. Validation happens before
//! anything changes, and a failed rewrite restores the previous in-memory
//! state, so callers never observe a half-applied mutation.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{
    validate_schedule, Attachment, Comment, Task, TaskList, TaskPriority, TaskStatus, Workspace,
};
use crate::schedule;
use crate::storage::Storage;

/// Parameters for [`TaskStore::add_task`]
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub task_list_id: String,
    pub description: String,
    /// Falls back to `[tasks] default_status`
    pub status: Option<TaskStatus>,
    /// Falls back to `[tasks] default_priority`
    pub priority: Option<TaskPriority>,
    pub start_at: Option<NaiveDateTime>,
    pub due_at: Option<NaiveDateTime>,
    pub pinned: bool,
}

impl NewTask {
    pub fn new(task_list_id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            task_list_id: task_list_id.into(),
            description: description.into(),
            ..Self::default()
        }
    }
}

pub struct TaskStore {
    storage: Storage,
    config: Config,
    task_lists: HashMap<String, TaskList>,
    tasks: HashMap<String, Task>,
    workspaces: HashMap<String, Workspace>,
}

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

fn clean_name(kind: &str, name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidArgument(format!("{kind} name cannot be empty")));
    }
    Ok(name.to_string())
}

fn clean_description(description: &str) -> Result<String> {
    let description = description.trim();
    if description.is_empty() {
        return Err(Error::InvalidArgument(
            "task description cannot be empty".to_string(),
        ));
    }
    Ok(description.to_string())
}

/// Resolve `key` against ids, then case-insensitive names, then unique id
/// prefixes.
fn resolve<'a, T>(
    kind: &'static str,
    key: &str,
    records: impl Iterator<Item = &'a T> + Clone,
    id: impl Fn(&T) -> &str,
    name: impl Fn(&T) -> Option<&str>,
) -> std::result::Result<&'a T, Option<Error>>
where
    T: 'a,
{
    let key = key.trim();
    if key.is_empty() {
        return Err(None);
    }
    if let Some(found) = records.clone().find(|r| id(*r) == key) {
        return Ok(found);
    }
    let wanted = name_key(key);
    if let Some(found) = records
        .clone()
        .find(|r| name(*r).map(name_key).as_deref() == Some(wanted.as_str()))
    {
        return Ok(found);
    }
    let mut prefixed: Vec<&T> = records.filter(|r| id(*r).starts_with(key)).collect();
    match prefixed.len() {
        0 => Err(None),
        1 => Ok(prefixed.remove(0)),
        _ => {
            let mut ids: Vec<&str> = prefixed.iter().map(|r| id(*r)).collect();
            ids.sort_unstable();
            Err(Some(Error::Ambiguous {
                kind,
                input: key.to_string(),
                matches: ids.join(", "),
            }))
        }
    }
}

impl TaskStore {
    /// Ensure the data directory exists and load every data file
    pub fn open(storage: Storage, config: Config) -> Result<Self> {
        storage.init()?;
        let mut store = Self {
            storage,
            config,
            task_lists: HashMap::new(),
            tasks: HashMap::new(),
            workspaces: HashMap::new(),
        };
        store.load()?;
        Ok(store)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Replace the in-memory state with what is on disk
    pub fn load(&mut self) -> Result<()> {
        self.task_lists.clear();
        self.tasks.clear();
        self.workspaces.clear();

        let workspaces = self
            .storage
            .read_json_array::<Workspace>(&self.storage.workspaces_file())?;
        for workspace in workspaces.records {
            if workspace.id.trim().is_empty() || workspace.name.trim().is_empty() {
                tracing::warn!("skipping workspace without id or name");
                continue;
            }
            self.workspaces.insert(workspace.id.clone(), workspace);
        }

        let lists = self
            .storage
            .read_json_array::<TaskList>(&self.storage.task_lists_file())?;
        for list in lists.records {
            if list.id.trim().is_empty() || list.name.trim().is_empty() {
                tracing::warn!("skipping task list without id or name");
                continue;
            }
            if let Some(ws) = list.workspace.as_deref() {
                if !self.workspaces.contains_key(ws) {
                    tracing::warn!(id = %list.id, workspace = ws, "task list workspace no longer exists");
                }
            }
            self.task_lists.insert(list.id.clone(), list);
        }

        let tasks = self
            .storage
            .read_json_array::<Task>(&self.storage.tasks_file())?;
        for task in tasks.records {
            if task.id.trim().is_empty() || task.description.trim().is_empty() {
                tracing::warn!("skipping task without id or description");
                continue;
            }
            if let Some(list_id) = task.assigned_to.as_deref() {
                if !self.task_lists.contains_key(list_id) {
                    tracing::warn!(id = %task.id, list = list_id, "task owner no longer exists, treating as unassigned");
                }
            }
            if let Err(err) = task.validate_schedule() {
                tracing::warn!(id = %task.id, error = %err, "task has an inverted schedule");
            }
            self.tasks.insert(task.id.clone(), task);
        }

        tracing::debug!(
            workspaces = self.workspaces.len(),
            task_lists = self.task_lists.len(),
            tasks = self.tasks.len(),
            skipped = workspaces.skipped + lists.skipped + tasks.skipped,
            "loaded data directory"
        );
        Ok(())
    }

    /// Rewrite every data file
    pub fn save(&self) -> Result<()> {
        self.save_workspaces()?;
        self.save_task_lists()?;
        self.save_tasks()
    }

    fn save_task_lists(&self) -> Result<()> {
        let mut lists: Vec<&TaskList> = self.task_lists.values().collect();
        lists.sort_by(|a, b| name_key(&a.name).cmp(&name_key(&b.name)).then_with(|| a.id.cmp(&b.id)));
        self.storage
            .write_json(&self.storage.task_lists_file(), &lists)
    }

    fn save_tasks(&self) -> Result<()> {
        let mut tasks: Vec<&Task> = self.tasks.values().collect();
        tasks.sort_by(|a, b| schedule::created_cmp(a, b));
        self.storage.write_json(&self.storage.tasks_file(), &tasks)
    }

    fn save_workspaces(&self) -> Result<()> {
        let mut workspaces: Vec<&Workspace> = self.workspaces.values().collect();
        workspaces.sort_by(|a, b| name_key(&a.name).cmp(&name_key(&b.name)).then_with(|| a.id.cmp(&b.id)));
        self.storage
            .write_json(&self.storage.workspaces_file(), &workspaces)
    }

    /// Insert or replace a task, rewrite `tasks.json`, and roll back on failure
    fn commit_task(&mut self, task: Task) -> Result<()> {
        let id = task.id.clone();
        let previous = self.tasks.insert(id.clone(), task);
        if let Err(err) = self.save_tasks() {
            match previous {
                Some(previous) => self.tasks.insert(id, previous),
                None => self.tasks.remove(&id),
            };
            return Err(err);
        }
        Ok(())
    }

    fn commit_task_list(&mut self, list: TaskList) -> Result<()> {
        let id = list.id.clone();
        let previous = self.task_lists.insert(id.clone(), list);
        if let Err(err) = self.save_task_lists() {
            match previous {
                Some(previous) => self.task_lists.insert(id, previous),
                None => self.task_lists.remove(&id),
            };
            return Err(err);
        }
        Ok(())
    }

    fn commit_workspace(&mut self, workspace: Workspace) -> Result<()> {
        let id = workspace.id.clone();
        let previous = self.workspaces.insert(id.clone(), workspace);
        if let Err(err) = self.save_workspaces() {
            match previous {
                Some(previous) => self.workspaces.insert(id, previous),
                None => self.workspaces.remove(&id),
            };
            return Err(err);
        }
        Ok(())
    }

    // =========================================================================
    // Task lists
    // =========================================================================

    fn ensure_unique_list_name(&self, name: &str, except: Option<&str>) -> Result<()> {
        let wanted = name_key(name);
        let clash = self
            .task_lists
            .values()
            .any(|list| Some(list.id.as_str()) != except && name_key(&list.name) == wanted);
        if clash {
            return Err(Error::DuplicateName {
                kind: "task list",
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn ensure_workspace(&self, workspace: Option<&str>) -> Result<()> {
        if let Some(id) = workspace {
            if !self.workspaces.contains_key(id) {
                return Err(Error::WorkspaceNotFound(id.to_string()));
            }
        }
        Ok(())
    }

    /// Create a list; names are unique ignoring case
    pub fn add_task_list(&mut self, name: &str, workspace: Option<&str>) -> Result<TaskList> {
        let name = clean_name("task list", name)?;
        self.ensure_unique_list_name(&name, None)?;
        self.ensure_workspace(workspace)?;

        let mut list = TaskList::new(name);
        list.workspace = workspace.map(str::to_string);
        self.commit_task_list(list.clone())?;
        tracing::info!(id = %list.id, name = %list.name, "added task list");
        Ok(list)
    }

    pub fn task_list(&self, id: &str) -> Option<&TaskList> {
        self.task_lists.get(id)
    }

    /// All lists, sorted by name
    pub fn task_lists(&self) -> Vec<TaskList> {
        let mut lists: Vec<TaskList> = self.task_lists.values().cloned().collect();
        lists.sort_by(|a, b| name_key(&a.name).cmp(&name_key(&b.name)).then_with(|| a.id.cmp(&b.id)));
        lists
    }

    /// Look up a list by id, name, or unique id prefix
    pub fn find_task_list(&self, key: &str) -> Result<&TaskList> {
        resolve(
            "task list",
            key,
            self.task_lists.values(),
            |l| l.id.as_str(),
            |l| Some(l.name.as_str()),
        )
        .map_err(|err| err.unwrap_or_else(|| Error::TaskListNotFound(key.to_string())))
    }

    /// Replace a stored list with `list`
    ///
    /// The workspace is only checked when it changes.
    pub fn update_task_list(&mut self, list: TaskList) -> Result<()> {
        let workspace_changed = match self.task_lists.get(&list.id) {
            Some(stored) => stored.workspace != list.workspace,
            None => return Err(Error::TaskListNotFound(list.id)),
        };
        let name = clean_name("task list", &list.name)?;
        self.ensure_unique_list_name(&name, Some(&list.id))?;
        if workspace_changed {
            self.ensure_workspace(list.workspace.as_deref())?;
        }

        let list = TaskList { name, ..list };
        self.commit_task_list(list)
    }

    pub fn rename_task_list(&mut self, id: &str, new_name: &str) -> Result<TaskList> {
        let mut list = self
            .task_list(id)
            .cloned()
            .ok_or_else(|| Error::TaskListNotFound(id.to_string()))?;
        list.name = new_name.to_string();
        self.update_task_list(list)?;
        self.task_list(id)
            .cloned()
            .ok_or_else(|| Error::TaskListNotFound(id.to_string()))
    }

    /// Put a list into a workspace, or ungroup it with `None`
    pub fn move_task_list(&mut self, id: &str, workspace: Option<&str>) -> Result<TaskList> {
        let mut list = self
            .task_list(id)
            .cloned()
            .ok_or_else(|| Error::TaskListNotFound(id.to_string()))?;
        list.workspace = workspace.map(str::to_string);
        self.update_task_list(list.clone())?;
        Ok(list)
    }

    /// Delete a list. Its tasks are kept and become unassigned.
    ///
    /// Returns how many tasks were unassigned.
    pub fn delete_task_list(&mut self, id: &str) -> Result<usize> {
        let removed = self
            .task_lists
            .remove(id)
            .ok_or_else(|| Error::TaskListNotFound(id.to_string()))?;

        let mut unassigned = Vec::new();
        for task in self.tasks.values_mut() {
            if task.assigned_to.as_deref() == Some(id) {
                task.assigned_to = None;
                unassigned.push(task.id.clone());
            }
        }

        // Tasks first: a failed second write leaves an empty list, not orphans
        let result = self.save_tasks().and_then(|_| self.save_task_lists());
        if let Err(err) = result {
            for task_id in &unassigned {
                if let Some(task) = self.tasks.get_mut(task_id) {
                    task.assigned_to = Some(id.to_string());
                }
            }
            self.task_lists.insert(removed.id.clone(), removed);
            return Err(err);
        }

        tracing::info!(id, name = %removed.name, unassigned = unassigned.len(), "deleted task list");
        Ok(unassigned.len())
    }

    // =========================================================================
    // Workspaces
    // =========================================================================

    fn ensure_unique_workspace_name(&self, name: &str, except: Option<&str>) -> Result<()> {
        let wanted = name_key(name);
        let clash = self
            .workspaces
            .values()
            .any(|ws| Some(ws.id.as_str()) != except && name_key(&ws.name) == wanted);
        if clash {
            return Err(Error::DuplicateName {
                kind: "workspace",
                name: name.to_string(),
            });
        }
        Ok(())
    }

    pub fn add_workspace(&mut self, name: &str) -> Result<Workspace> {
        let name = clean_name("workspace", name)?;
        self.ensure_unique_workspace_name(&name, None)?;

        let workspace = Workspace::new(name);
        self.commit_workspace(workspace.clone())?;
        tracing::info!(id = %workspace.id, name = %workspace.name, "added workspace");
        Ok(workspace)
    }

    pub fn workspace(&self, id: &str) -> Option<&Workspace> {
        self.workspaces.get(id)
    }

    pub fn workspaces(&self) -> Vec<Workspace> {
        let mut workspaces: Vec<Workspace> = self.workspaces.values().cloned().collect();
        workspaces.sort_by(|a, b| name_key(&a.name).cmp(&name_key(&b.name)).then_with(|| a.id.cmp(&b.id)));
        workspaces
    }

    pub fn find_workspace(&self, key: &str) -> Result<&Workspace> {
        resolve(
            "workspace",
            key,
            self.workspaces.values(),
            |w| w.id.as_str(),
            |w| Some(w.name.as_str()),
        )
        .map_err(|err| err.unwrap_or_else(|| Error::WorkspaceNotFound(key.to_string())))
    }

    pub fn rename_workspace(&mut self, id: &str, new_name: &str) -> Result<Workspace> {
        let mut workspace = self
            .workspace(id)
            .cloned()
            .ok_or_else(|| Error::WorkspaceNotFound(id.to_string()))?;
        let name = clean_name("workspace", new_name)?;
        self.ensure_unique_workspace_name(&name, Some(id))?;
        workspace.name = name;
        self.commit_workspace(workspace.clone())?;
        Ok(workspace)
    }

    /// Delete a workspace and ungroup its lists.
    ///
    /// Returns how many lists were ungrouped.
    pub fn delete_workspace(&mut self, id: &str) -> Result<usize> {
        let removed = self
            .workspaces
            .remove(id)
            .ok_or_else(|| Error::WorkspaceNotFound(id.to_string()))?;

        let mut ungrouped = Vec::new();
        for list in self.task_lists.values_mut() {
            if list.workspace.as_deref() == Some(id) {
                list.workspace = None;
                ungrouped.push(list.id.clone());
            }
        }

        let result = self.save_task_lists().and_then(|_| self.save_workspaces());
        if let Err(err) = result {
            for list_id in &ungrouped {
                if let Some(list) = self.task_lists.get_mut(list_id) {
                    list.workspace = Some(id.to_string());
                }
            }
            self.workspaces.insert(removed.id.clone(), removed);
            return Err(err);
        }

        tracing::info!(id, name = %removed.name, ungrouped = ungrouped.len(), "deleted workspace");
        Ok(ungrouped.len())
    }

    /// Lists grouped under a workspace, sorted by name
    pub fn task_lists_in_workspace(&self, id: &str) -> Result<Vec<TaskList>> {
        if !self.workspaces.contains_key(id) {
            return Err(Error::WorkspaceNotFound(id.to_string()));
        }
        Ok(self
            .task_lists()
            .into_iter()
            .filter(|list| list.workspace.as_deref() == Some(id))
            .collect())
    }

    // =========================================================================
    // Tasks
    // =========================================================================

    pub fn add_task(&mut self, new: NewTask) -> Result<Task> {
        if !self.task_lists.contains_key(&new.task_list_id) {
            return Err(Error::TaskListNotFound(new.task_list_id));
        }
        let description = clean_description(&new.description)?;
        validate_schedule(new.start_at, new.due_at)?;

        let mut task = Task::new(description, Some(new.task_list_id));
        task.status = match new.status {
            Some(status) => status,
            None => self.config.tasks.default_status()?,
        };
        task.priority = match new.priority {
            Some(priority) => priority,
            None => self.config.tasks.default_priority()?,
        };
        task.start_at = new.start_at;
        task.due_at = new.due_at;
        task.pinned = new.pinned;

        self.commit_task(task.clone())?;
        tracing::info!(id = %task.id, list = ?task.assigned_to, "added task");
        Ok(task)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// Look up a task by id or unique id prefix
    pub fn find_task(&self, key: &str) -> Result<&Task> {
        resolve(
            "task",
            key,
            self.tasks.values(),
            |t| t.id.as_str(),
            |_| None,
        )
        .map_err(|err| err.unwrap_or_else(|| Error::TaskNotFound(key.to_string())))
    }

    /// All tasks in creation order
    pub fn tasks(&self) -> Vec<Task> {
        let mut tasks: Vec<Task> = self.tasks.values().cloned().collect();
        tasks.sort_by(schedule::created_cmp);
        tasks
    }

    /// Tasks owned by a list, in creation order
    pub fn tasks_for_task_list(&self, list_id: &str) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .tasks
            .values()
            .filter(|task| task.assigned_to.as_deref() == Some(list_id))
            .cloned()
            .collect();
        tasks.sort_by(schedule::created_cmp);
        tasks
    }

    /// Tasks with no owner, or whose owner no longer exists
    pub fn unassigned_tasks(&self) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .tasks
            .values()
            .filter(|task| match task.assigned_to.as_deref() {
                Some(list_id) => !self.task_lists.contains_key(list_id),
                None => true,
            })
            .cloned()
            .collect();
        tasks.sort_by(schedule::created_cmp);
        tasks
    }

    /// Tasks of a list whose schedule covers `date`, in creation order
    pub fn tasks_for_task_list_on_date(&self, list_id: &str, date: NaiveDate) -> Vec<Task> {
        self.tasks_for_task_list(list_id)
            .into_iter()
            .filter(|task| schedule::is_active_on(task, date))
            .collect()
    }

    /// The daily view for a list: active tasks in agenda order
    pub fn agenda(&self, list_id: &str, date: NaiveDate) -> Vec<Task> {
        let mut tasks = self.tasks_for_task_list_on_date(list_id, date);
        schedule::sort_agenda(&mut tasks);
        tasks
    }

    /// Replace a stored task with `task` after validating it
    ///
    /// The owner and the schedule are only checked when they change, so a
    /// task loaded with a dangling owner can still be edited.
    pub fn update_task(&mut self, task: Task) -> Result<()> {
        let (owner_changed, schedule_changed) = match self.tasks.get(&task.id) {
            Some(stored) => (
                stored.assigned_to != task.assigned_to,
                (stored.start_at, stored.due_at) != (task.start_at, task.due_at),
            ),
            None => return Err(Error::TaskNotFound(task.id)),
        };
        let description = clean_description(&task.description)?;
        if schedule_changed {
            task.validate_schedule()?;
        }
        if owner_changed {
            if let Some(list_id) = task.assigned_to.as_deref() {
                if !self.task_lists.contains_key(list_id) {
                    return Err(Error::TaskListNotFound(list_id.to_string()));
                }
            }
        }

        let task = Task {
            description,
            ..task
        };
        self.commit_task(task)
    }

    fn modify_task(&mut self, id: &str, apply: impl FnOnce(&mut Task)) -> Result<Task> {
        let mut task = self
            .task(id)
            .cloned()
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
        apply(&mut task);
        self.update_task(task.clone())?;
        Ok(task)
    }

    pub fn set_status(&mut self, id: &str, status: TaskStatus) -> Result<Task> {
        self.modify_task(id, |task| task.status = status)
    }

    pub fn set_priority(&mut self, id: &str, priority: TaskPriority) -> Result<Task> {
        self.modify_task(id, |task| task.priority = priority)
    }

    pub fn set_pinned(&mut self, id: &str, pinned: bool) -> Result<Task> {
        self.modify_task(id, |task| task.pinned = pinned)
    }

    /// Replace both schedule fields at once
    pub fn reschedule(
        &mut self,
        id: &str,
        start_at: Option<NaiveDateTime>,
        due_at: Option<NaiveDateTime>,
    ) -> Result<Task> {
        self.modify_task(id, |task| {
            task.start_at = start_at;
            task.due_at = due_at;
        })
    }

    /// Append a comment. `author` falls back to the configured author.
    pub fn add_comment(&mut self, task_id: &str, text: &str, author: Option<&str>) -> Result<Comment> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::InvalidArgument("comment text cannot be empty".to_string()));
        }
        let author = author
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(&self.config.author)
            .to_string();

        let comment = Comment::new(text, author);
        let added = comment.clone();
        self.modify_task(task_id, |task| task.comments.push(comment))?;
        Ok(added)
    }

    pub fn add_attachment(&mut self, task_id: &str, path: &str, name: Option<String>) -> Result<Attachment> {
        let path = path.trim();
        if path.is_empty() {
            return Err(Error::InvalidArgument("attachment path cannot be empty".to_string()));
        }
        let attachment = Attachment::new(path, name);
        let added = attachment.clone();
        self.modify_task(task_id, |task| task.attachments.push(attachment))?;
        Ok(added)
    }

    /// Remove the attachment at `index` (zero-based)
    pub fn remove_attachment(&mut self, task_id: &str, index: usize) -> Result<Attachment> {
        let task = self
            .task(task_id)
            .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))?;
        let removed = task.attachments.get(index).cloned().ok_or_else(|| {
            Error::InvalidArgument(format!(
                "attachment index {} out of range ({} attachments)",
                index,
                task.attachments.len()
            ))
        })?;
        self.modify_task(task_id, |task| {
            task.attachments.remove(index);
        })?;
        Ok(removed)
    }

    /// Delete a task permanently
    pub fn delete_task(&mut self, id: &str) -> Result<Task> {
        let removed = self
            .tasks
            .remove(id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
        if let Err(err) = self.save_tasks() {
            self.tasks.insert(removed.id.clone(), removed);
            return Err(err);
        }
        tracing::info!(id, "deleted task");
        Ok(removed)
    }
}
