mod support;

use predicates::prelude::*;

use support::TestData;

fn new_workspace(data: &TestData, name: &str) -> String {
    let value = data.json(&["workspace", "new", name]);
    value["data"]["id"].as_str().expect("workspace id").to_string()
}

#[test]
fn workspace_ls_shows_grouped_lists() {
    let data = TestData::new();
    let family = new_workspace(&data, "Family");
    new_workspace(&data, "attic");
    data.json(&["list", "new", "Kids", "--workspace", "Family"]);
    data.json(&["list", "new", "Groceries", "--workspace", &family]);
    data.new_list("Loose");

    let value = data.json(&["workspace", "ls"]);
    assert_eq!(value["command"], "workspace ls");
    let workspaces = value["data"]["workspaces"].as_array().expect("workspaces");
    let names: Vec<&str> = workspaces.iter().filter_map(|w| w["name"].as_str()).collect();
    assert_eq!(names, vec!["attic", "Family"]);
    assert_eq!(workspaces[0]["lists"].as_array().map(Vec::len), Some(0));
    assert_eq!(workspaces[1]["id"], family.as_str());
    assert_eq!(workspaces[1]["lists"][0], "Groceries");
    assert_eq!(workspaces[1]["lists"][1], "Kids");
}

#[test]
fn workspace_ls_human_output() {
    let data = TestData::new();
    new_workspace(&data, "Family");

    data.cmd()
        .args(["workspace", "ls"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mytasks workspaces (1)"))
        .stdout(predicate::str::contains("Family (no lists)"));
}

#[test]
fn workspace_rename_by_name() {
    let data = TestData::new();
    let id = new_workspace(&data, "Family");
    new_workspace(&data, "Work");

    let value = data.json(&["workspace", "rename", "family", "Home"]);
    assert_eq!(value["command"], "workspace rename");
    assert_eq!(value["data"]["id"], id.as_str());
    assert_eq!(value["data"]["name"], "Home");

    let clash = data.json_err(&["workspace", "rename", "Home", "WORK"], 2);
    assert_eq!(clash["error"]["kind"], "user_error");
    assert_eq!(clash["error"]["details"]["kind"], "workspace");

    data.json_err(&["workspace", "rename", "Home", "  "], 2);

    let stored = data.read_json("workspaces.json");
    let names: Vec<&str> = stored
        .as_array()
        .expect("workspaces array")
        .iter()
        .filter_map(|w| w["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Home", "Work"]);
}

#[test]
fn workspace_rm_ungroups_lists() {
    let data = TestData::new();
    new_workspace(&data, "Family");
    let kids = data.json(&["list", "new", "Kids", "--workspace", "Family"]);
    let kids_id = kids["data"]["id"].as_str().expect("list id").to_string();

    let value = data.json(&["workspace", "rm", "Family"]);
    assert_eq!(value["command"], "workspace rm");
    assert_eq!(value["data"]["ungrouped_lists"], 1);

    let lists = data.read_json("task_lists.json");
    assert_eq!(lists[0]["id"], kids_id.as_str());
    assert!(lists[0].get("workspace").is_none());

    let listed = data.json(&["workspace", "ls"]);
    assert_eq!(listed["data"]["workspaces"].as_array().map(Vec::len), Some(0));
}

#[test]
fn unknown_workspace_suggests_ls() {
    let data = TestData::new();
    let value = data.json_err(&["workspace", "rm", "ghost"], 2);
    assert_eq!(value["command"], "workspace rm");
    assert_eq!(value["next_steps"][0], "mytasks workspace ls");
}
