//! Derived views over the task list.
//!
//! Everything here is pure and synchronous: callers hand in the current tasks
//! and categories and get fresh derived data back. Nothing is cached between
//! calls.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use icu_collator::{Collator, CollatorOptions};
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::error::{Error, Result};
use crate::task::Task;

pub use crate::due::{classify_due, classify_due_within, parse_due_date, DueStatus};

/// The keyword that selects every category.
pub const ALL_CATEGORIES: &str = "all";

/// Active category tab.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    pub fn named(name: impl Into<String>) -> Self {
        CategoryFilter::Named(name.into())
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Named(name) => task.category == *name,
        }
    }
}

impl From<String> for CategoryFilter {
    fn from(value: String) -> Self {
        if value == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Named(value)
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        CategoryFilter::from(value.to_string())
    }
}

impl From<CategoryFilter> for String {
    fn from(value: CategoryFilter) -> Self {
        match value {
            CategoryFilter::All => ALL_CATEGORIES.to_string(),
            CategoryFilter::Named(name) => name,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(ALL_CATEGORIES),
            CategoryFilter::Named(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Earliest due date first.
    Date,
    /// High, then medium, then low.
    Priority,
    /// Title order, ignoring case.
    Alphabetical,
    /// Newest first. Used whenever no other mode is selected.
    #[default]
    Created,
}

impl SortMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::Date => "date",
            SortMode::Priority => "priority",
            SortMode::Alphabetical => "alphabetical",
            SortMode::Created => "created",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(SortMode::Date),
            "priority" => Ok(SortMode::Priority),
            "alphabetical" => Ok(SortMode::Alphabetical),
            "created" => Ok(SortMode::Created),
            other => Err(Error::InvalidArgument(format!(
                "unknown sort mode '{other}' (expected date|priority|alphabetical|created)"
            ))),
        }
    }
}

/// Keep tasks in the active category whose title contains `search`, ignoring case.
pub fn filter(tasks: &[Task], category: &CategoryFilter, search: &str) -> Vec<Task> {
    let needle = search.to_lowercase();
    tasks
        .iter()
        .filter(|task| category.matches(task))
        .filter(|task| needle.is_empty() || task.title.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Stable in-place sort.
pub fn sort(tasks: &mut [Task], mode: SortMode) {
    match mode {
        SortMode::Priority => {
            tasks.sort_by(|left, right| right.priority.weight().cmp(&left.priority.weight()))
        }
        SortMode::Date => tasks.sort_by(|left, right| left.due_date.cmp(&right.due_date)),
        SortMode::Alphabetical => tasks.sort_by(|left, right| compare_titles(&left.title, &right.title)),
        SortMode::Created => tasks.sort_by(|left, right| right.created_at.cmp(&left.created_at)),
    }
}

/// Filter, then sort.
pub fn filter_sort(
    tasks: &[Task],
    category: &CategoryFilter,
    search: &str,
    mode: SortMode,
) -> Vec<Task> {
    let mut visible = filter(tasks, category, search);
    sort(&mut visible, mode);
    visible
}

thread_local! {
    static TITLE_COLLATOR: Option<Collator> =
        Collator::try_new(&Default::default(), CollatorOptions::new()).ok();
}

/// Dictionary-style title order using root-locale Unicode collation.
///
/// Accented letters sort with their base letter ("éclair" < "fig"),
/// punctuation and digits sort before letters, and on a tie lowercase sorts
/// before uppercase ("apple" < "Apple").
pub fn compare_titles(left: &str, right: &str) -> Ordering {
    TITLE_COLLATOR
        .with(|collator| {
            collator
                .as_ref()
                .map(|collator| collator.compare(left, right))
        })
        .unwrap_or_else(|| compare_titles_folded(left, right))
        .then_with(|| left.cmp(right))
}

/// Case-folded code point order, used when no collation data is available.
fn compare_titles_folded(left: &str, right: &str) -> Ordering {
    let folded = left
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(right.chars().flat_map(char::to_lowercase));
    folded
        .then_with(|| {
            left.chars()
                .zip(right.chars())
                .map(|(l, r)| case_rank(l).cmp(&case_rank(r)))
                .find(|ordering| ordering.is_ne())
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| left.cmp(right))
}

fn case_rank(ch: char) -> u8 {
    u8::from(ch.is_uppercase())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionStats {
    pub completed: usize,
    pub total: usize,
    /// Percentage, rounded half-up.
    pub rate: u32,
}

pub fn completion_stats(tasks: &[Task]) -> CompletionStats {
    let total = tasks.len();
    let completed = tasks.iter().filter(|task| task.completed).count();
    let rate = if total == 0 {
        0
    } else {
        // Integer half-up rounding of completed / total * 100.
        let scaled = (completed as u64 * 200 + total as u64) / (total as u64 * 2);
        u32::try_from(scaled).unwrap_or(100)
    };
    CompletionStats {
        completed,
        total,
        rate,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    #[serde(flatten)]
    pub category: Category,
    pub task_count: usize,
}

/// Live task count per category, by exact name match, in category order.
pub fn category_counts(tasks: &[Task], categories: &[Category]) -> Vec<CategoryCount> {
    categories
        .iter()
        .map(|category| CategoryCount {
            category: category.clone(),
            task_count: tasks
                .iter()
                .filter(|task| task.category == category.name)
                .count(),
        })
        .collect()
}
