//! Live board state.
//!
//! A [`Board`] is what a front end renders from: it owns the store handles,
//! the last task and category lists it fetched, and the active
//! category/search/sort selection. User intents go to the stores first; the
//! returned records are then folded into the cached lists, and [`Board::view`]
//! derives everything shown on screen from those lists.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::category::{Category, CategoryPatch, CategoryStore, NewCategory};
use crate::clock::Clock;
use crate::config::{Config, ViewConfig};
use crate::due::{classify_due_within, DueStatus};
use crate::error::{Error, Result};
use crate::seed::Seed;
use crate::store::StoreRuntime;
use crate::task::{NewTask, Priority, Task, TaskPatch, TaskStore};
use crate::view::{
    category_counts, completion_stats, filter_sort, CategoryCount, CategoryFilter,
    CompletionStats, SortMode,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub category: CategoryFilter,
    pub search: String,
    pub sort: SortMode,
}

impl ViewState {
    pub fn new(sort: SortMode) -> Self {
        Self {
            category: CategoryFilter::All,
            search: String::new(),
            sort,
        }
    }
}

/// One visible task with its due-date flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRow {
    #[serde(flatten)]
    pub task: Task,
    pub due: DueStatus,
    /// High priority and overdue.
    pub urgent: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardView {
    pub state: ViewState,
    /// Over all tasks, not just the visible ones.
    pub stats: CompletionStats,
    pub all_count: usize,
    pub categories: Vec<CategoryCount>,
    pub tasks: Vec<TaskRow>,
}

/// High-priority tasks that are overdue get extra emphasis.
pub fn is_urgent_overdue(task: &Task, due: DueStatus) -> bool {
    task.priority == Priority::High && due.overdue
}

#[derive(Debug)]
pub struct Board {
    tasks: TaskStore,
    categories: CategoryStore,
    task_list: Vec<Task>,
    category_list: Vec<Category>,
    state: ViewState,
    due_soon_days: u32,
}

impl Board {
    pub fn new(tasks: TaskStore, categories: CategoryStore, view: &ViewConfig) -> Self {
        Self {
            tasks,
            categories,
            task_list: Vec::new(),
            category_list: Vec::new(),
            state: ViewState::new(view.default_sort),
            due_soon_days: view.due_soon_days,
        }
    }

    /// Wire stores from `config`, preload them with `seed`, and return an
    /// unloaded board. Call [`Board::load`] before reading the view.
    pub fn from_config(config: &Config, seed: Seed, clock: Arc<dyn Clock>) -> Result<Self> {
        let (task_rows, category_rows) = seed.into_records(clock.now())?;
        let runtime = StoreRuntime::from_config(&config.store, clock);
        let categories = CategoryStore::with_records(runtime.clone(), category_rows);
        let mut tasks = TaskStore::with_records(runtime, task_rows);
        if config.store.strict_categories {
            tasks = tasks.with_category_guard(categories.clone());
        }
        Ok(Self::new(tasks, categories, &config.view))
    }

    pub fn task_store(&self) -> &TaskStore {
        &self.tasks
    }

    pub fn category_store(&self) -> &CategoryStore {
        &self.categories
    }

    pub fn tasks(&self) -> &[Task] {
        &self.task_list
    }

    pub fn categories(&self) -> &[Category] {
        &self.category_list
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Fetch tasks and categories concurrently and replace the cached lists.
    pub async fn load(&mut self) -> Result<()> {
        let (tasks, categories) =
            tokio::try_join!(self.tasks.get_all(), self.categories.get_all())?;
        debug!(
            tasks = tasks.len(),
            categories = categories.len(),
            "board loaded"
        );
        self.task_list = tasks;
        self.category_list = categories;
        Ok(())
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.state.category = category;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.state.search = search.into();
    }

    pub fn set_sort(&mut self, sort: SortMode) {
        self.state.sort = sort;
    }

    pub fn view(&self, now: DateTime<Utc>) -> BoardView {
        let visible = filter_sort(
            &self.task_list,
            &self.state.category,
            &self.state.search,
            self.state.sort,
        );
        let rows = visible
            .into_iter()
            .map(|task| {
                let due = classify_due_within(task.due_date, now, self.due_soon_days);
                TaskRow {
                    urgent: is_urgent_overdue(&task, due),
                    task,
                    due,
                }
            })
            .collect();

        BoardView {
            state: self.state.clone(),
            stats: completion_stats(&self.task_list),
            all_count: self.task_list.len(),
            categories: category_counts(&self.task_list, &self.category_list),
            tasks: rows,
        }
    }

    pub async fn get_task(&self, id: &str) -> Result<Task> {
        self.tasks.get_by_id(id).await
    }

    pub async fn add_task(&mut self, new: NewTask) -> Result<Task> {
        let task = self.tasks.create(new).await?;
        self.task_list.insert(0, task.clone());
        Ok(task)
    }

    /// Flip completion based on the cached state of the task.
    pub async fn toggle_complete(&mut self, id: &str) -> Result<Task> {
        let completed = self
            .task_list
            .iter()
            .find(|task| task.id == id)
            .map(|task| task.completed)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
        let task = self
            .tasks
            .update(id, TaskPatch::default().completed(!completed))
            .await?;
        info!(task_id = %id, completed = task.completed, "toggled task");
        self.replace_task(task.clone());
        Ok(task)
    }

    pub async fn edit_task(&mut self, id: &str, patch: TaskPatch) -> Result<Task> {
        let task = self.tasks.update(id, patch).await?;
        self.replace_task(task.clone());
        Ok(task)
    }

    pub async fn delete_task(&mut self, id: &str) -> Result<()> {
        self.tasks.delete(id).await?;
        self.task_list.retain(|task| task.id != id);
        Ok(())
    }

    pub async fn add_category(&mut self, new: NewCategory) -> Result<Category> {
        let category = self.categories.create(new).await?;
        self.category_list.push(category.clone());
        Ok(category)
    }

    /// Rename a category. Tasks keep the old name; nothing is relinked.
    pub async fn rename_category(&mut self, id: &str, name: impl Into<String>) -> Result<Category> {
        let category = self
            .categories
            .update(id, CategoryPatch::default().name(name))
            .await?;
        if let Some(slot) = self.category_list.iter_mut().find(|c| c.id == category.id) {
            *slot = category.clone();
        }
        Ok(category)
    }

    /// Delete a category. Tasks that reference it are kept as they are.
    pub async fn remove_category(&mut self, id: &str) -> Result<()> {
        self.categories.delete(id).await?;
        self.category_list.retain(|category| category.id != id);
        Ok(())
    }

    fn replace_task(&mut self, task: Task) {
        if let Some(slot) = self.task_list.iter_mut().find(|t| t.id == task.id) {
            *slot = task;
        }
    }
}
