//! Initial store contents.
//!
//! Seed records go straight into the stores, without simulated latency, the
//! way mock fixtures are preloaded before the first request.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::category::Category;
use crate::due::deserialize_due_date;
use crate::error::{Error, Result};
use crate::task::{Priority, Task};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub categories: Vec<SeedCategory>,
    #[serde(default)]
    pub tasks: Vec<SeedTask>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedCategory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedTask {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(deserialize_with = "deserialize_due_date")]
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Seed {
    /// Read a JSON seed file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let seed: Seed = serde_json::from_str(&content)?;
        Ok(seed)
    }

    /// Small demo board with due dates placed around `now`.
    pub fn builtin(now: DateTime<Utc>) -> Self {
        let categories = ["Work", "Personal", "Urgent"]
            .into_iter()
            .map(|name| SeedCategory {
                id: None,
                name: name.to_string(),
            })
            .collect();

        let entry = |title: &str,
                     category: &str,
                     priority: Priority,
                     due_in_days: i64,
                     completed: bool,
                     age_hours: i64| SeedTask {
            id: None,
            title: title.to_string(),
            category: category.to_string(),
            priority,
            due_date: now + Duration::days(due_in_days),
            completed,
            created_at: Some(now - Duration::hours(age_hours)),
        };

        let tasks = vec![
            entry("Finish quarterly report", "Work", Priority::High, -1, false, 1),
            entry("Renew passport", "Urgent", Priority::High, 1, false, 2),
            entry("Book dentist appointment", "Personal", Priority::Medium, 2, false, 3),
            entry("Review pull requests", "Work", Priority::Medium, 0, true, 4),
            entry("Plan weekend hike", "Personal", Priority::Low, 6, false, 5),
        ];

        Self { categories, tasks }
    }

    /// Turn the seed into store rows, generating missing ids.
    ///
    /// Tasks without `createdAt` get `now`. Duplicate explicit ids are rejected.
    pub fn into_records(self, now: DateTime<Utc>) -> Result<(Vec<Task>, Vec<Category>)> {
        let mut seen = HashSet::new();
        let mut categories = Vec::with_capacity(self.categories.len());
        for entry in self.categories {
            let id = entry.id.unwrap_or_else(|| Ulid::new().to_string());
            if !seen.insert(id.clone()) {
                return Err(Error::InvalidArgument(format!(
                    "duplicate category id in seed: {id}"
                )));
            }
            categories.push(Category {
                id,
                name: entry.name,
            });
        }

        seen.clear();
        let mut tasks = Vec::with_capacity(self.tasks.len());
        for entry in self.tasks {
            let id = entry.id.unwrap_or_else(|| Ulid::new().to_string());
            if !seen.insert(id.clone()) {
                return Err(Error::InvalidArgument(format!(
                    "duplicate task id in seed: {id}"
                )));
            }
            tasks.push(Task {
                id,
                title: entry.title,
                category: entry.category,
                priority: entry.priority,
                due_date: entry.due_date,
                completed: entry.completed,
                created_at: entry.created_at.unwrap_or(now),
            });
        }

        Ok((tasks, categories))
    }
}
