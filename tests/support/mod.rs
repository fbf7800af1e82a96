#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use assert_cmd::Command;
use chrono::{DateTime, Utc};
use taskflow::category::{Category, CategoryStore};
use taskflow::clock::ManualClock;
use taskflow::latency::NoLatency;
use taskflow::store::StoreRuntime;
use taskflow::task::{NewTask, Priority, Task, TaskStore};
use taskflow::view::parse_due_date;
use tempfile::TempDir;

pub fn at(text: &str) -> DateTime<Utc> {
    parse_due_date(text).expect("valid test date")
}

/// Fresh zero-latency stores sharing one manual clock.
pub struct Fixture {
    pub clock: Arc<ManualClock>,
    pub runtime: StoreRuntime,
    pub tasks: TaskStore,
    pub categories: CategoryStore,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_records(Vec::new(), Vec::new())
    }

    pub fn with_records(tasks: Vec<Task>, categories: Vec<Category>) -> Self {
        let clock = Arc::new(ManualClock::new(at("2024-01-10T09:00:00Z")));
        let runtime = StoreRuntime::new(Arc::new(NoLatency), clock.clone());
        Self {
            tasks: TaskStore::with_records(runtime.clone(), tasks),
            categories: CategoryStore::with_records(runtime.clone(), categories),
            clock,
            runtime,
        }
    }
}

pub fn new_task(title: &str, category: &str, priority: Priority, due: &str) -> NewTask {
    NewTask::new(title, category, priority, at(due))
}

pub fn task(id: &str, title: &str, category: &str, priority: Priority, due: &str) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        category: category.to_string(),
        priority,
        due_date: at(due),
        completed: false,
        created_at: at("2024-01-01T00:00:00Z"),
    }
}

pub fn category(id: &str, name: &str) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
    }
}

/// Scratch directory for CLI runs, with an optional seed file.
pub struct TestDir {
    dir: TempDir,
}

impl TestDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create tempdir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_file(&self, rel_path: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(rel_path);
        fs::write(&path, contents).expect("write test file");
        path
    }

    pub fn write_seed(&self) -> PathBuf {
        self.write_file("seed.json", SEED_JSON)
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("taskflow").expect("binary");
        cmd.current_dir(self.path());
        cmd.env_remove("TASKFLOW_CONFIG");
        cmd.env_remove("RUST_LOG");
        cmd
    }
}

pub const SEED_JSON: &str = r#"{
  "categories": [
    {"id": "work", "name": "Work"},
    {"id": "personal", "name": "Personal"},
    {"id": "urgent", "name": "Urgent"}
  ],
  "tasks": [
    {"id": "t1", "title": "Write report", "category": "Work", "priority": "high",
     "dueDate": "2024-01-09", "createdAt": "2024-01-05T10:00:00Z"},
    {"id": "t2", "title": "buy groceries", "category": "Personal", "priority": "low",
     "dueDate": "2024-01-12", "createdAt": "2024-01-06T10:00:00Z"},
    {"id": "t3", "title": "Call plumber", "category": "Urgent", "priority": "medium",
     "dueDate": "2024-01-10", "completed": true, "createdAt": "2024-01-07T10:00:00Z"}
  ]
}"#;
