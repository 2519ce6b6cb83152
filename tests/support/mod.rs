#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// A throwaway data directory for driving the binary
pub struct TestData {
    dir: TempDir,
}

impl TestData {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create tempdir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.file(name);
        fs::write(&path, contents).expect("write data file");
        path
    }

    pub fn read_json(&self, name: &str) -> Value {
        let raw = fs::read_to_string(self.file(name)).expect("read data file");
        serde_json::from_str(&raw).expect("data file json")
    }

    /// Command with the data directory pinned and logging silenced
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("mytasks").expect("binary");
        cmd.env("MYTASKS_DATA_DIR", self.dir.path());
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Run with `--json`, assert success, and return the envelope
    pub fn json(&self, args: &[&str]) -> Value {
        let output = self
            .cmd()
            .args(args)
            .arg("--json")
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&output).expect("json envelope")
    }

    /// Run with `--json`, assert the given exit code, and return the envelope
    pub fn json_err(&self, args: &[&str], code: i32) -> Value {
        let output = self
            .cmd()
            .args(args)
            .arg("--json")
            .assert()
            .code(code)
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&output).expect("json error envelope")
    }

    pub fn new_list(&self, name: &str) -> String {
        let value = self.json(&["list", "new", name]);
        value["data"]["id"].as_str().expect("list id").to_string()
    }

    pub fn new_task(&self, list: &str, description: &str, extra: &[&str]) -> String {
        let mut args = vec!["task", "new", list, description];
        args.extend_from_slice(extra);
        let value = self.json(&args);
        value["data"]["id"].as_str().expect("task id").to_string()
    }
}
