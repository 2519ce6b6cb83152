//! Due-soon alarms
//!
//! A scanner remembers which tasks it already alerted on, so a long-running
//! watcher reports each task at most once per session.

use std::collections::HashSet;

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use crate::config::describe_duration;
use crate::schedule::format_due;
use crate::store::TaskStore;

/// Owner label used when a task's list is gone
pub const UNASSIGNED_LABEL: &str = "an unassigned list";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alarm {
    pub task_id: String,
    pub description: String,
    pub list_name: String,
    pub due_at: NaiveDateTime,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct AlarmScanner {
    lead: Duration,
    triggered: HashSet<String>,
}

impl AlarmScanner {
    pub fn new(lead: Duration) -> Self {
        Self {
            lead,
            triggered: HashSet::new(),
        }
    }

    pub fn lead(&self) -> Duration {
        self.lead
    }

    pub fn triggered_count(&self) -> usize {
        self.triggered.len()
    }

    /// Collect alarms for open tasks due within the lead time.
    ///
    /// Tasks already past due, or due exactly now, do not fire.
    pub fn scan(&mut self, store: &TaskStore, now: NaiveDateTime) -> Vec<Alarm> {
        let lead_text = describe_duration(self.lead);
        let mut alarms = Vec::new();

        for task in store.tasks() {
            if task.is_done() || self.triggered.contains(&task.id) {
                continue;
            }
            let Some(due) = task.due_at else {
                continue;
            };
            let remaining = due - now;
            if remaining <= Duration::zero() || remaining > self.lead {
                continue;
            }

            let list_name = task
                .assigned_to
                .as_deref()
                .and_then(|id| store.task_list(id))
                .map(|list| list.name.clone())
                .unwrap_or_else(|| UNASSIGNED_LABEL.to_string());
            let message = format!(
                "Task '{}' assigned to {} is due within {} ({}).",
                task.description,
                list_name,
                lead_text,
                format_due(Some(due))
            );

            tracing::info!(task = %task.id, due = %due, "alarm triggered");
            self.triggered.insert(task.id.clone());
            alarms.push(Alarm {
                task_id: task.id,
                description: task.description,
                list_name,
                due_at: due,
                message,
            });
        }

        alarms.sort_by(|a, b| a.due_at.cmp(&b.due_at).then_with(|| a.task_id.cmp(&b.task_id)));
        alarms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::model::TaskStatus;
    use crate::storage::Storage;
    use crate::store::NewTask;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 5)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn store_with(dir: &TempDir, dues: &[(&str, Option<NaiveDateTime>)]) -> TaskStore {
        let mut store = TaskStore::open(Storage::new(dir.path()), Config::default()).unwrap();
        let list = store.add_task_list("Alice", None).unwrap();
        for (desc, due) in dues {
            let mut new = NewTask::new(&list.id, *desc);
            new.due_at = *due;
            store.add_task(new).unwrap();
        }
        store
    }

    #[test]
    fn fires_only_inside_window() {
        let dir = TempDir::new().unwrap();
        let store = store_with(
            &dir,
            &[
                ("soon", Some(now() + Duration::hours(2))),
                ("edge", Some(now() + Duration::hours(12))),
                ("later", Some(now() + Duration::hours(13))),
                ("overdue", Some(now() - Duration::minutes(1))),
                ("right now", Some(now())),
                ("undated", None),
            ],
        );

        let mut scanner = AlarmScanner::new(Duration::hours(12));
        let fired: Vec<_> = scanner
            .scan(&store, now())
            .into_iter()
            .map(|a| a.description)
            .collect();
        assert_eq!(fired, vec!["soon", "edge"]);
    }

    #[test]
    fn each_task_fires_once() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, &[("soon", Some(now() + Duration::hours(1)))]);

        let mut scanner = AlarmScanner::new(Duration::hours(12));
        assert_eq!(scanner.scan(&store, now()).len(), 1);
        assert!(scanner.scan(&store, now()).is_empty());
        assert_eq!(scanner.triggered_count(), 1);
    }

    #[test]
    fn done_tasks_are_silent() {
        let dir = TempDir::new().unwrap();
        let mut store = store_with(&dir, &[("soon", Some(now() + Duration::hours(1)))]);
        let id = store.tasks()[0].id.clone();
        store.set_status(&id, TaskStatus::Done).unwrap();

        let mut scanner = AlarmScanner::new(Duration::hours(12));
        assert!(scanner.scan(&store, now()).is_empty());
    }

    #[test]
    fn message_names_list_or_unassigned() {
        let dir = TempDir::new().unwrap();
        let mut store = store_with(&dir, &[("Pay rent", Some(now() + Duration::hours(3)))]);

        let mut scanner = AlarmScanner::new(Duration::hours(12));
        let alarm = scanner.scan(&store, now()).remove(0);
        assert_eq!(
            alarm.message,
            "Task 'Pay rent' assigned to Alice is due within 12 hours (2024-06-05 11:00)."
        );

        let list_id = store.task_lists()[0].id.clone();
        store.delete_task_list(&list_id).unwrap();
        let mut fresh = AlarmScanner::new(Duration::hours(12));
        let alarm = fresh.scan(&store, now()).remove(0);
        assert_eq!(alarm.list_name, UNASSIGNED_LABEL);
        assert!(alarm.message.contains("assigned to an unassigned list"));
    }
}
