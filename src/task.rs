//! Task records and the in-memory task store.
//!
//! New tasks are prepended, so the store's natural order is newest first.
//! `category` links to a [`Category`](crate::category::Category) by name only;
//! the store tolerates dangling names unless it was built with a category
//! guard (see [`TaskStore::with_category_guard`]).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use ulid::Ulid;

use crate::category::CategoryStore;
use crate::due::{deserialize_due_date, deserialize_opt_due_date};
use crate::error::{Error, Result};
use crate::latency::StoreOp;
use crate::store::{Position, Record, StoreRuntime, Table};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Sort weight: high=3, medium=2, low=1.
    pub fn weight(self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(Error::InvalidArgument(format!(
                "unknown priority '{other}' (expected low|medium|high)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub category: String,
    pub priority: Priority,
    pub due_date: DateTime<Utc>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Record for Task {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Task {
    /// Shallow merge: only the fields present in `patch` change.
    pub fn apply(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
    }
}

/// Caller-supplied fields for a new task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(deserialize_with = "deserialize_due_date")]
    pub due_date: DateTime<Utc>,
}

impl NewTask {
    pub fn new(
        title: impl Into<String>,
        category: impl Into<String>,
        priority: Priority,
        due_date: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            category: category.into(),
            priority,
            due_date,
        }
    }
}

/// Partial update. `id` and `createdAt` are not patchable; unknown keys are
/// rejected when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_opt_due_date"
    )]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &TaskPatch::default()
    }
}

/// Handle to the task collection. Clones share the same rows.
#[derive(Debug, Clone)]
pub struct TaskStore {
    table: Table<Task>,
    runtime: StoreRuntime,
    category_guard: Option<CategoryStore>,
}

impl TaskStore {
    pub fn new(runtime: StoreRuntime) -> Self {
        Self::with_records(runtime, Vec::new())
    }

    /// Start from preloaded rows, kept in the given order.
    pub fn with_records(runtime: StoreRuntime, tasks: Vec<Task>) -> Self {
        Self {
            table: Table::new(tasks),
            runtime,
            category_guard: None,
        }
    }

    /// Reject creates and updates whose category names no live category.
    pub fn with_category_guard(mut self, categories: CategoryStore) -> Self {
        self.category_guard = Some(categories);
        self
    }

    pub fn is_strict(&self) -> bool {
        self.category_guard.is_some()
    }

    pub async fn get_all(&self) -> Result<Vec<Task>> {
        self.runtime
            .run(StoreOp::TaskGetAll, async {
                let tasks = self.table.snapshot().await;
                debug!(count = tasks.len(), "loaded tasks");
                Ok(tasks)
            })
            .await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Task> {
        self.runtime
            .run(StoreOp::TaskGetById, async {
                self.table.find(id).await.ok_or_else(|| not_found(id))
            })
            .await
    }

    pub async fn create(&self, new: NewTask) -> Result<Task> {
        self.runtime
            .run(StoreOp::TaskCreate, async move {
                self.check_category(&new.category).await?;
                let now = self.runtime.clock().now();
                let task = self
                    .table
                    .insert_with(Position::Front, |existing| {
                        // createdAt never runs backwards relative to earlier rows.
                        let floor = existing.iter().map(|task| task.created_at).max();
                        Task {
                            id: Ulid::new().to_string(),
                            title: new.title,
                            category: new.category,
                            priority: new.priority,
                            due_date: new.due_date,
                            completed: false,
                            created_at: floor.map_or(now, |floor| floor.max(now)),
                        }
                    })
                    .await;
                info!(task_id = %task.id, category = %task.category, "task created");
                Ok(task)
            })
            .await
    }

    pub async fn update(&self, id: &str, patch: TaskPatch) -> Result<Task> {
        self.runtime
            .run(StoreOp::TaskUpdate, async move {
                // An unknown id wins over an unknown category.
                if self.table.find(id).await.is_none() {
                    return Err(not_found(id));
                }
                if let Some(category) = patch.category.as_deref() {
                    self.check_category(category).await?;
                }
                let task = self
                    .table
                    .modify(id, |task| task.apply(patch))
                    .await
                    .ok_or_else(|| not_found(id))?;
                info!(task_id = %task.id, completed = task.completed, "task updated");
                Ok(task)
            })
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        self.runtime
            .run(StoreOp::TaskDelete, async {
                self.table.remove(id).await.ok_or_else(|| not_found(id))?;
                info!(task_id = %id, "task deleted");
                Ok(true)
            })
            .await
    }

    /// Row count without simulated latency.
    pub async fn len(&self) -> usize {
        self.table.len().await
    }

    pub async fn is_empty(&self) -> bool {
        self.table.is_empty().await
    }

    async fn check_category(&self, name: &str) -> Result<()> {
        let Some(categories) = &self.category_guard else {
            return Ok(());
        };
        if categories.has_name(name).await {
            Ok(())
        } else {
            warn!(category = %name, "rejecting task with unknown category");
            Err(Error::InvalidCategory(name.to_string()))
        }
    }
}

fn not_found(id: &str) -> Error {
    warn!(task_id = %id, "task not found");
    Error::TaskNotFound(id.to_string())
}
