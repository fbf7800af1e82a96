mod support;

use std::sync::Arc;
use std::time::Duration;

use support::{at, new_task, SEED_JSON};
use taskflow::board::Board;
use taskflow::category::NewCategory;
use taskflow::clock::ManualClock;
use taskflow::config::Config;
use taskflow::seed::Seed;
use taskflow::task::{Priority, TaskPatch};
use taskflow::view::{CategoryFilter, SortMode};
use taskflow::Error;

fn seed() -> Seed {
    serde_json::from_str(SEED_JSON).expect("seed json")
}

fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(at("2024-01-10T09:00:00Z")))
}

fn quiet_config() -> Config {
    let mut config = Config::default();
    config.store.latency.enabled = false;
    config
}

async fn loaded_board(config: &Config) -> Board {
    let mut board = Board::from_config(config, seed(), clock()).expect("board");
    board.load().await.expect("load");
    board
}

fn visible_ids(board: &Board) -> Vec<String> {
    board
        .view(at("2024-01-10T09:00:00Z"))
        .tasks
        .into_iter()
        .map(|row| row.task.id)
        .collect()
}

#[tokio::test(start_paused = true)]
async fn load_fetches_both_stores_concurrently() {
    let mut board = Board::from_config(&Config::default(), seed(), clock()).expect("board");
    assert!(board.tasks().is_empty());

    let start = tokio::time::Instant::now();
    board.load().await.expect("load");
    let elapsed = start.elapsed();

    // task.get_all (300ms) and category.get_all (200ms) overlap.
    assert!(elapsed >= Duration::from_millis(300));
    assert!(elapsed < Duration::from_millis(500));
    assert_eq!(board.tasks().len(), 3);
    assert_eq!(board.categories().len(), 3);
}

#[tokio::test]
async fn view_reports_stats_counts_and_due_flags() {
    let board = loaded_board(&quiet_config()).await;
    let view = board.view(at("2024-01-10T09:00:00Z"));

    assert_eq!(view.stats.completed, 1);
    assert_eq!(view.stats.total, 3);
    assert_eq!(view.stats.rate, 33);
    assert_eq!(view.all_count, 3);

    let counts: Vec<(String, usize)> = view
        .categories
        .iter()
        .map(|entry| (entry.category.name.clone(), entry.task_count))
        .collect();
    assert_eq!(
        counts,
        vec![
            ("Work".to_string(), 1),
            ("Personal".to_string(), 1),
            ("Urgent".to_string(), 1)
        ]
    );

    // Default sort is by due date.
    let ids: Vec<&str> = view.tasks.iter().map(|row| row.task.id.as_str()).collect();
    assert_eq!(ids, vec!["t1", "t3", "t2"]);

    let report = &view.tasks[0];
    assert!(report.due.overdue);
    assert!(report.urgent);

    let plumber = &view.tasks[1];
    assert!(!plumber.due.overdue);
    assert!(!plumber.due.due_soon);

    let groceries = &view.tasks[2];
    assert!(groceries.due.due_soon);
    assert!(!groceries.urgent);
}

#[tokio::test]
async fn filter_search_and_sort_shape_visible_tasks_only() {
    let mut board = loaded_board(&quiet_config()).await;

    board.set_category(CategoryFilter::named("Work"));
    assert_eq!(visible_ids(&board), vec!["t1"]);

    board.set_category(CategoryFilter::named("work"));
    assert!(visible_ids(&board).is_empty());

    board.set_category(CategoryFilter::All);
    board.set_search("PLUMB");
    assert_eq!(visible_ids(&board), vec!["t3"]);

    board.set_search("");
    board.set_sort(SortMode::Priority);
    assert_eq!(visible_ids(&board), vec!["t1", "t3", "t2"]);

    board.set_sort(SortMode::Alphabetical);
    assert_eq!(visible_ids(&board), vec!["t2", "t3", "t1"]);

    board.set_sort(SortMode::Created);
    assert_eq!(visible_ids(&board), vec!["t3", "t2", "t1"]);

    // Stats ignore the filter.
    board.set_category(CategoryFilter::named("Personal"));
    let view = board.view(at("2024-01-10T09:00:00Z"));
    assert_eq!(view.tasks.len(), 1);
    assert_eq!(view.stats.total, 3);
}

#[tokio::test]
async fn add_task_lands_in_store_and_cache() {
    let mut board = loaded_board(&quiet_config()).await;

    let created = board
        .add_task(new_task("Pay rent", "Personal", Priority::High, "2024-01-11"))
        .await
        .expect("add");
    assert_eq!(board.tasks()[0].id, created.id);
    assert_eq!(board.tasks().len(), 4);

    let stored = board.get_task(&created.id).await.expect("get");
    assert_eq!(stored, created);
    assert_eq!(board.view(at("2024-01-10T09:00:00Z")).categories[1].task_count, 2);
}

#[tokio::test]
async fn toggle_flips_completion_both_ways() {
    let mut board = loaded_board(&quiet_config()).await;

    let done = board.toggle_complete("t1").await.expect("toggle on");
    assert!(done.completed);
    assert_eq!(board.view(at("2024-01-10T09:00:00Z")).stats.rate, 67);

    let undone = board.toggle_complete("t1").await.expect("toggle off");
    assert!(!undone.completed);
    let stored = board.task_store().get_by_id("t1").await.expect("get");
    assert!(!stored.completed);
}

#[tokio::test]
async fn toggle_unknown_task_is_not_found() {
    let mut board = loaded_board(&quiet_config()).await;
    let err = board.toggle_complete("missing").await.unwrap_err();
    assert!(matches!(err, Error::TaskNotFound(_)));
}

#[tokio::test]
async fn edit_and_delete_update_cache() {
    let mut board = loaded_board(&quiet_config()).await;

    let edited = board
        .edit_task("t2", TaskPatch::default().title("Buy groceries and milk"))
        .await
        .expect("edit");
    assert_eq!(edited.title, "Buy groceries and milk");
    let cached = board
        .tasks()
        .iter()
        .find(|task| task.id == "t2")
        .expect("cached");
    assert_eq!(cached.title, "Buy groceries and milk");

    board.delete_task("t2").await.expect("delete");
    assert!(board.tasks().iter().all(|task| task.id != "t2"));
    assert!(board
        .task_store()
        .get_by_id("t2")
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn category_changes_leave_tasks_alone() {
    let mut board = loaded_board(&quiet_config()).await;

    let renamed = board.rename_category("work", "Office").await.expect("rename");
    assert_eq!(renamed.name, "Office");
    let view = board.view(at("2024-01-10T09:00:00Z"));
    assert_eq!(view.categories[0].category.name, "Office");
    assert_eq!(view.categories[0].task_count, 0);
    assert!(board.tasks().iter().any(|task| task.category == "Work"));

    let stored = board
        .category_store()
        .get_by_id("work")
        .await
        .expect("stored category");
    assert_eq!(stored.name, "Office");

    board.remove_category("urgent").await.expect("remove");
    assert!(board
        .category_store()
        .get_by_id("urgent")
        .await
        .unwrap_err()
        .is_not_found());
    let view = board.view(at("2024-01-10T09:00:00Z"));
    assert_eq!(view.categories.len(), 2);
    assert_eq!(view.all_count, 3);

    let added = board
        .add_category(NewCategory::new("Work"))
        .await
        .expect("add");
    let view = board.view(at("2024-01-10T09:00:00Z"));
    let last = view.categories.last().expect("last");
    assert_eq!(last.category.id, added.id);
    assert_eq!(last.task_count, 1);
}

#[tokio::test]
async fn strict_config_guards_task_categories() {
    let mut config = quiet_config();
    config.store.strict_categories = true;
    let mut board = loaded_board(&config).await;
    assert!(board.task_store().is_strict());

    let err = board
        .add_task(new_task("x", "Hobbies", Priority::Low, "2024-01-11"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidCategory(_)));
    assert_eq!(board.tasks().len(), 3);

    board
        .add_category(NewCategory::new("Hobbies"))
        .await
        .expect("add category");
    board
        .add_task(new_task("x", "Hobbies", Priority::Low, "2024-01-11"))
        .await
        .expect("add task");
}

#[tokio::test]
async fn one_day_window_disables_due_soon() {
    let mut config = quiet_config();
    config.view.due_soon_days = 1;
    let board = loaded_board(&config).await;
    let view = board.view(at("2024-01-10T09:00:00Z"));
    assert!(view.tasks.iter().all(|row| !row.due.due_soon));
}
