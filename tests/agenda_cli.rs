mod support;

use predicates::prelude::*;

use support::TestData;

fn descriptions(value: &serde_json::Value) -> Vec<String> {
    value
        .as_array()
        .expect("task array")
        .iter()
        .filter_map(|t| t["description"].as_str().map(str::to_string))
        .collect()
}

#[test]
fn agenda_filters_by_date_and_orders() {
    let data = TestData::new();
    data.new_list("Alice");
    data.new_task("Alice", "low early", &["--priority", "low", "--due", "2024-06-05 08:00"]);
    data.new_task(
        "Alice",
        "high span",
        &["--priority", "high", "--start", "2024-06-04 09:00", "--due", "2024-06-06 09:00"],
    );
    let pinned = data.new_task("Alice", "pinned", &["--priority", "low", "--due", "2024-06-05 20:00"]);
    data.json(&["task", "pin", &pinned]);
    data.new_task("Alice", "tomorrow", &["--due", "2024-06-06 12:00"]);
    data.new_task("Alice", "undated", &[]);

    let value = data.json(&["agenda", "alice", "--date", "2024-06-05"]);
    assert_eq!(value["command"], "agenda");
    assert_eq!(value["data"]["date"], "2024-06-05");
    assert_eq!(value["data"]["list"]["name"], "Alice");
    assert_eq!(
        descriptions(&value["data"]["tasks"]),
        vec!["pinned", "high span", "low early"]
    );

    let value = data.json(&["agenda", "Alice", "--date", "2024-06-06"]);
    assert_eq!(
        descriptions(&value["data"]["tasks"]),
        vec!["high span", "tomorrow"]
    );
}

#[test]
fn agenda_rejects_bad_date() {
    let data = TestData::new();
    data.new_list("Alice");
    data.json_err(&["agenda", "Alice", "--date", "June 5"], 2);
}

#[test]
fn agenda_human_view_shows_labels_and_comments() {
    let data = TestData::new();
    data.new_list("Home");
    let id = data.new_task(
        "Home",
        "Fix sink",
        &["--start", "2024-06-05 09:00", "--due", "2024-06-05 10:30"],
    );
    data.json(&["task", "comment", &id, "Bring wrench", "--author", "Max"]);

    data.cmd()
        .args(["agenda", "Home", "--date", "2024-06-05"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(Week "))
        .stdout(predicate::str::contains("Home for Wednesday, June 5, 2024"))
        .stdout(predicate::str::contains("Pending - Fix sink (09:00 - 10:30)"))
        .stdout(predicate::str::contains("└─ Max: Bring wrench"));
}

#[test]
fn overview_sorts_lists_and_tasks() {
    let data = TestData::new();
    data.new_list("Zed");
    data.new_list("alpha");
    data.new_task("Zed", "later", &["--due", "2024-07-01 09:00"]);
    data.new_task("Zed", "no due", &["--priority", "high"]);
    data.new_task("Zed", "sooner low", &["--priority", "low", "--due", "2024-06-01 09:00"]);
    data.new_task("Zed", "sooner high", &["--priority", "high", "--due", "2024-06-01 09:00"]);

    let value = data.json(&["overview"]);
    let lists = value["data"]["lists"].as_array().expect("lists");
    assert_eq!(lists[0]["name"], "alpha");
    assert_eq!(lists[1]["name"], "Zed");
    assert_eq!(lists[0]["tasks"].as_array().map(Vec::len), Some(0));
    assert_eq!(
        descriptions(&lists[1]["tasks"]),
        vec!["sooner high", "sooner low", "later", "no due"]
    );
    assert_eq!(value["data"]["unassigned"].as_array().map(Vec::len), Some(0));
}

#[test]
fn overview_human_marks_empty_lists() {
    let data = TestData::new();
    data.new_list("Empty");

    data.cmd()
        .arg("overview")
        .assert()
        .success()
        .stdout(predicate::str::contains("Empty\n  No tasks in this list."));
}
