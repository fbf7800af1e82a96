//! taskflow view command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;

use crate::board::{Board, BoardView, TaskRow};
use crate::clock::SystemClock;
use crate::config::Config;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::view::{parse_due_date, CategoryFilter, SortMode};

pub struct ViewOptions {
    pub config: Config,
    pub seed: Option<PathBuf>,
    pub category: String,
    pub search: String,
    pub sort: Option<String>,
    pub now: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

pub async fn run(options: ViewOptions) -> Result<()> {
    let now = match options.now.as_deref() {
        Some(raw) => parse_due_date(raw)?,
        None => Utc::now(),
    };
    let sort = options
        .sort
        .as_deref()
        .map(|raw| raw.parse::<SortMode>())
        .transpose()?;

    let seed = super::load_seed(options.seed.as_deref(), now)?;
    let mut board = Board::from_config(&options.config, seed, Arc::new(SystemClock))?;
    board.load().await?;
    board.set_category(CategoryFilter::from(options.category));
    board.set_search(options.search);
    if let Some(sort) = sort {
        board.set_sort(sort);
    }

    let view = board.view(now);
    let human = render(&view);
    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "view",
        &view,
        Some(&human),
    )
}

fn render(view: &BoardView) -> HumanOutput {
    let mut human = HumanOutput::new("TaskFlow");
    human.push_summary(
        "Completed",
        format!(
            "{} of {} tasks ({}%)",
            view.stats.completed, view.stats.total, view.stats.rate
        ),
    );

    let mut tabs = vec![format!("All Tasks ({})", view.all_count)];
    tabs.extend(
        view.categories
            .iter()
            .map(|entry| format!("{} ({})", entry.category.name, entry.task_count)),
    );
    human.push_summary("Categories", tabs.join(", "));
    human.push_summary("Showing", view.state.category.to_string());
    if !view.state.search.is_empty() {
        human.push_summary("Search", view.state.search.clone());
    }
    human.push_summary("Sort", view.state.sort.to_string());

    for row in &view.tasks {
        human.push_detail(render_row(row));
    }
    if view.tasks.is_empty() {
        human.push_warning("no tasks match the current filter");
    }
    human
}

fn render_row(row: &TaskRow) -> String {
    let task = &row.task;
    let check = if task.completed { "[x]" } else { "[ ]" };
    let mut line = format!(
        "{check} {} · {} · {} priority · {}",
        task.title,
        task.category,
        task.priority,
        task.due_date.format("%b %-d, %Y")
    );
    if row.due.overdue {
        line.push_str(" (Overdue)");
    } else if row.due.due_soon {
        line.push_str(" (Due Soon)");
    }
    if row.urgent {
        line.push_str(" !");
    }
    line.push_str(&format!("  [{}]", task.id));
    line
}
