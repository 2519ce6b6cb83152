//! mytasks agenda and overview commands
//!
//! `agenda` is the daily view of one list. `overview` prints every list with
//! its tasks, followed by tasks whose list is gone.

use chrono::NaiveDate;
use serde::Serialize;

use super::{short_id, CommonOptions};
use crate::error::Result;
use crate::model::{now_local, Task, TaskList};
use crate::output::emit_success;
use crate::schedule::{format_due, parse_date, sort_overview, task_line, week_header};

/// Options for `mytasks agenda`
pub struct AgendaOptions {
    pub list: String,
    pub date: Option<String>,
    pub common: CommonOptions,
}

#[derive(Serialize)]
struct AgendaReport {
    list: TaskList,
    date: NaiveDate,
    tasks: Vec<Task>,
}

#[derive(Serialize)]
struct OverviewList {
    #[serde(flatten)]
    list: TaskList,
    tasks: Vec<Task>,
}

#[derive(Serialize)]
struct OverviewReport {
    lists: Vec<OverviewList>,
    unassigned: Vec<Task>,
}

fn render_agenda(report: &AgendaReport, header: &str) -> String {
    let mut lines = vec![
        header.to_string(),
        String::new(),
        format!("{} for {}", report.list.name, report.date.format("%A, %B %-d, %Y")),
    ];
    if report.tasks.is_empty() {
        lines.push("  No tasks scheduled for this day.".to_string());
    }
    for task in &report.tasks {
        lines.push(format!("  {}  [{}]", task_line(task), short_id(&task.id)));
        for comment in &task.comments {
            lines.push(format!("    └─ {}: {}", comment.author, comment.text));
        }
    }
    lines.join("\n")
}

fn overview_row(task: &Task) -> String {
    format!(
        "  {:<8} {:<8} {:<16} {}  [{}]",
        task.status.to_string(),
        task.priority.to_string(),
        format_due(task.due_at),
        task.description,
        short_id(&task.id)
    )
}

fn render_overview(report: &OverviewReport, workspace_name: impl Fn(&str) -> Option<String>) -> String {
    let mut lines = Vec::new();
    if report.lists.is_empty() {
        lines.push("No task lists found. Add one with `mytasks list new <name>`.".to_string());
    }
    for entry in &report.lists {
        let group = entry
            .list
            .workspace
            .as_deref()
            .and_then(&workspace_name)
            .map(|name| format!(" [{name}]"))
            .unwrap_or_default();
        lines.push(format!("{}{}", entry.list.name, group));
        if entry.tasks.is_empty() {
            lines.push("  No tasks in this list.".to_string());
        }
        for task in &entry.tasks {
            lines.push(overview_row(task));
        }
    }
    if !report.unassigned.is_empty() {
        lines.push("Unassigned".to_string());
        for task in &report.unassigned {
            lines.push(overview_row(task));
        }
    }
    lines.join("\n")
}

pub fn run_agenda(options: AgendaOptions) -> Result<()> {
    let now = now_local();
    let date = match options.date.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => now.date(),
    };

    let store = options.common.open_store()?;
    let list = store.find_task_list(&options.list)?.clone();
    let tasks = store.agenda(&list.id, date);
    let report = AgendaReport { list, date, tasks };

    let output = options.common.output();
    emit_success(output, "agenda", &report, None)?;
    if !output.json && !output.quiet {
        println!("{}", render_agenda(&report, &week_header(now)));
    }
    Ok(())
}

pub fn run_overview(common: CommonOptions) -> Result<()> {
    let store = common.open_store()?;

    let lists = store
        .task_lists()
        .into_iter()
        .map(|list| {
            let mut tasks = store.tasks_for_task_list(&list.id);
            sort_overview(&mut tasks);
            OverviewList { list, tasks }
        })
        .collect();
    let mut unassigned = store.unassigned_tasks();
    sort_overview(&mut unassigned);
    let report = OverviewReport { lists, unassigned };

    let output = common.output();
    emit_success(output, "overview", &report, None)?;
    if !output.json && !output.quiet {
        let text = render_overview(&report, |id| store.workspace(id).map(|ws| ws.name.clone()));
        println!("{text}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskStatus;

    fn due_task(desc: &str) -> Task {
        let mut task = Task::new(desc, None);
        task.due_at = NaiveDate::from_ymd_opt(2024, 6, 5)
            .unwrap()
            .and_hms_opt(14, 0, 0);
        task
    }

    #[test]
    fn agenda_render_shows_comments_under_task() {
        let mut task = due_task("Call plumber");
        task.comments.push(crate::model::Comment::new("Ask about Friday", "Sam"));
        let report = AgendaReport {
            list: TaskList::new("Home"),
            date: NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(),
            tasks: vec![task],
        };

        let text = render_agenda(&report, "HEADER");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "HEADER");
        assert_eq!(lines[2], "Home for Wednesday, June 5, 2024");
        assert!(lines[3].starts_with("  Pending - Call plumber (Due: Jun 05 14:00)"));
        assert_eq!(lines[4], "    └─ Sam: Ask about Friday");
    }

    #[test]
    fn empty_agenda_says_so() {
        let report = AgendaReport {
            list: TaskList::new("Home"),
            date: NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(),
            tasks: Vec::new(),
        };
        assert!(render_agenda(&report, "H").contains("No tasks scheduled"));
    }

    #[test]
    fn overview_render_lists_and_unassigned() {
        let mut done = due_task("Done thing");
        done.status = TaskStatus::Done;
        let mut list = TaskList::new("Alice");
        list.workspace = Some("ws-1".to_string());
        let report = OverviewReport {
            lists: vec![
                OverviewList {
                    list,
                    tasks: vec![done],
                },
                OverviewList {
                    list: TaskList::new("Bob"),
                    tasks: Vec::new(),
                },
            ],
            unassigned: vec![Task::new("Loose end", None)],
        };

        let text = render_overview(&report, |id| (id == "ws-1").then(|| "Family".to_string()));
        assert!(text.contains("Alice [Family]"));
        assert!(text.contains("2024-06-05 14:00"));
        assert!(text.contains("Bob\n  No tasks in this list."));
        assert!(text.contains("Unassigned"));
        assert!(text.contains("N/A"));
    }
}
