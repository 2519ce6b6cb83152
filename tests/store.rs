use std::fs;

use chrono::NaiveDate;
use mytasks::config::Config;
use mytasks::model::{TaskPriority, TaskStatus};
use mytasks::storage::Storage;
use mytasks::{Error, NewTask, TaskStore};

fn open(dir: &tempfile::TempDir) -> TaskStore {
    TaskStore::open(Storage::new(dir.path()), Config::default()).expect("open store")
}

#[test]
fn reads_files_written_by_older_versions() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("task_lists.json"),
        r#"[{"id": "l-1", "name": "Alice"}, {"id": "l-2", "name": "Bob"}]"#,
    )
    .expect("write lists");
    fs::write(
        dir.path().join("tasks.json"),
        r#"[
            {"id": "t-1", "description": "Draft", "assigned_to": "l-1",
             "status": "pending", "priority": "HIGH",
             "created_at": "2024-06-01T08:00:00.250000",
             "due_at": "2024-06-05T17:00:00",
             "comments": [{"text": "ok", "author": "Ann", "timestamp": "2024-06-01T09:00:00"}]},
            {"id": "t-2", "description": "Legacy", "assigned_to": "l-2"}
        ]"#,
    )
    .expect("write tasks");

    let store = open(&dir);
    assert_eq!(store.task_lists().len(), 2);
    assert!(store.workspaces().is_empty());

    let draft = store.task("t-1").expect("t-1");
    assert_eq!(draft.priority, TaskPriority::High);
    assert_eq!(draft.status, TaskStatus::Pending);
    assert_eq!(draft.comments[0].author, "Ann");

    let legacy = store.task("t-2").expect("t-2");
    assert_eq!(legacy.priority, TaskPriority::Medium);
    assert!(legacy.attachments.is_empty());

    let day = NaiveDate::from_ymd_opt(2024, 6, 5).expect("date");
    assert_eq!(store.agenda("l-1", day).len(), 1);
    assert!(store.agenda("l-2", day).is_empty());
}

#[test]
fn corrupt_tasks_file_loads_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("tasks.json"), "{ truncated").expect("write tasks");

    let store = open(&dir);
    assert!(store.tasks().is_empty());
}

#[test]
fn save_and_reload_round_trip_keeps_everything() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open(&dir);
    let ws = store.add_workspace("Family").expect("workspace");
    let list = store.add_task_list("Kids", Some(&ws.id)).expect("list");
    let task = store
        .add_task(NewTask::new(&list.id, "Pack lunches"))
        .expect("task");
    store.set_pinned(&task.id, true).expect("pin");
    store.add_comment(&task.id, "Sandwiches", None).expect("comment");
    store.save().expect("save");

    let reloaded = open(&dir);
    assert_eq!(reloaded.find_workspace("family").expect("ws").id, ws.id);
    assert_eq!(reloaded.task_list(&list.id).expect("list").workspace, Some(ws.id));
    let reloaded_task = reloaded.task(&task.id).expect("task");
    assert!(reloaded_task.pinned);
    assert_eq!(reloaded_task.comments.len(), 1);
    assert_eq!(reloaded_task.created_at, task.created_at);
}

#[test]
fn load_discards_unsaved_memory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut first = open(&dir);
    let mut second = open(&dir);

    let list = first.add_task_list("Shared", None).expect("list");
    assert!(second.task_list(&list.id).is_none());
    second.load().expect("reload");
    assert!(second.task_list(&list.id).is_some());
}

#[test]
fn ambiguous_prefix_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("task_lists.json"),
        r#"[{"id": "abc-1", "name": "One"}, {"id": "abc-2", "name": "Two"}]"#,
    )
    .expect("write lists");

    let store = open(&dir);
    match store.find_task_list("abc") {
        Err(Error::Ambiguous { kind, matches, .. }) => {
            assert_eq!(kind, "task list");
            assert_eq!(matches, "abc-1, abc-2");
        }
        other => panic!("unexpected result: {:?}", other.map(|l| l.id.clone())),
    }
    assert_eq!(store.find_task_list("abc-2").expect("exact").name, "Two");
}

#[test]
fn update_task_rejects_unknown_owner() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open(&dir);
    let list = store.add_task_list("Work", None).expect("list");
    let mut task = store.add_task(NewTask::new(&list.id, "Move me")).expect("task");

    task.assigned_to = Some("missing".to_string());
    assert!(matches!(
        store.update_task(task.clone()),
        Err(Error::TaskListNotFound(_))
    ));
    assert_eq!(
        store.task(&task.id).expect("task").assigned_to.as_deref(),
        Some(list.id.as_str())
    );
}
