//! Category records and the in-memory category store.
//!
//! Categories carry no task count. Counts depend on the live task set and are
//! computed on demand by [`crate::view::category_counts`].

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use ulid::Ulid;

use crate::error::{Error, Result};
use crate::latency::StoreOp;
use crate::store::{Position, Record, StoreRuntime, Table};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

impl Record for Category {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
}

impl NewCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl CategoryPatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Handle to the category collection. New categories are appended.
#[derive(Debug, Clone)]
pub struct CategoryStore {
    table: Table<Category>,
    runtime: StoreRuntime,
}

impl CategoryStore {
    pub fn new(runtime: StoreRuntime) -> Self {
        Self::with_records(runtime, Vec::new())
    }

    pub fn with_records(runtime: StoreRuntime, categories: Vec<Category>) -> Self {
        Self {
            table: Table::new(categories),
            runtime,
        }
    }

    pub async fn get_all(&self) -> Result<Vec<Category>> {
        self.runtime
            .run(StoreOp::CategoryGetAll, async {
                let categories = self.table.snapshot().await;
                debug!(count = categories.len(), "loaded categories");
                Ok(categories)
            })
            .await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Category> {
        self.runtime
            .run(StoreOp::CategoryGetById, async {
                self.table.find(id).await.ok_or_else(|| not_found(id))
            })
            .await
    }

    pub async fn create(&self, new: NewCategory) -> Result<Category> {
        self.runtime
            .run(StoreOp::CategoryCreate, async move {
                let category = self
                    .table
                    .insert_with(Position::Back, |_| Category {
                        id: Ulid::new().to_string(),
                        name: new.name,
                    })
                    .await;
                info!(category_id = %category.id, name = %category.name, "category created");
                Ok(category)
            })
            .await
    }

    pub async fn update(&self, id: &str, patch: CategoryPatch) -> Result<Category> {
        self.runtime
            .run(StoreOp::CategoryUpdate, async move {
                let category = self
                    .table
                    .modify(id, |category| {
                        if let Some(name) = patch.name {
                            category.name = name;
                        }
                    })
                    .await
                    .ok_or_else(|| not_found(id))?;
                info!(category_id = %category.id, name = %category.name, "category updated");
                Ok(category)
            })
            .await
    }

    /// Remove a category. Tasks that name it are left untouched.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        self.runtime
            .run(StoreOp::CategoryDelete, async {
                let removed = self.table.remove(id).await.ok_or_else(|| not_found(id))?;
                info!(category_id = %id, name = %removed.name, "category deleted");
                Ok(true)
            })
            .await
    }

    /// Exact, case-sensitive name lookup without simulated latency.
    pub async fn has_name(&self, name: &str) -> bool {
        self.table.contains_where(|category| category.name == name).await
    }

    pub async fn len(&self) -> usize {
        self.table.len().await
    }

    pub async fn is_empty(&self) -> bool {
        self.table.is_empty().await
    }
}

fn not_found(id: &str) -> Error {
    warn!(category_id = %id, "category not found");
    Error::CategoryNotFound(id.to_string())
}
