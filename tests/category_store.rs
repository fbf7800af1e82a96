mod support;

use support::{category, task, Fixture};
use taskflow::category::{CategoryPatch, NewCategory};
use taskflow::task::Priority;
use taskflow::view::category_counts;
use taskflow::Error;

#[tokio::test]
async fn created_categories_are_appended() {
    let fx = Fixture::with_records(Vec::new(), vec![category("work", "Work")]);

    let errands = fx
        .categories
        .create(NewCategory::new("Errands"))
        .await
        .expect("create");
    assert!(!errands.id.is_empty());

    let names: Vec<String> = fx
        .categories
        .get_all()
        .await
        .expect("get all")
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Work", "Errands"]);
}

#[tokio::test]
async fn get_update_delete_round_trip() {
    let fx = Fixture::with_records(Vec::new(), vec![category("work", "Work")]);

    let fetched = fx.categories.get_by_id("work").await.expect("get");
    assert_eq!(fetched.name, "Work");

    let renamed = fx
        .categories
        .update("work", CategoryPatch::default().name("Office"))
        .await
        .expect("update");
    assert_eq!(renamed.id, "work");
    assert_eq!(renamed.name, "Office");
    assert!(fx.categories.has_name("Office").await);
    assert!(!fx.categories.has_name("Work").await);

    assert!(fx.categories.delete("work").await.expect("delete"));
    assert!(fx.categories.is_empty().await);
}

#[tokio::test]
async fn unknown_category_ids_are_not_found() {
    let fx = Fixture::new();

    let err = fx.categories.get_by_id("nope").await.unwrap_err();
    assert!(matches!(err, Error::CategoryNotFound(ref id) if id == "nope"));

    let err = fx
        .categories
        .update("nope", CategoryPatch::default().name("x"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let err = fx.categories.delete("nope").await.unwrap_err();
    assert!(matches!(err, Error::CategoryNotFound(_)));
}

#[tokio::test]
async fn name_lookup_is_case_sensitive() {
    let fx = Fixture::with_records(Vec::new(), vec![category("work", "Work")]);
    assert!(fx.categories.has_name("Work").await);
    assert!(!fx.categories.has_name("work").await);
}

#[tokio::test]
async fn deleting_category_keeps_its_tasks() {
    let fx = Fixture::with_records(
        vec![
            task("t1", "one", "Work", Priority::High, "2024-01-09"),
            task("t2", "two", "Personal", Priority::Low, "2024-01-09"),
        ],
        vec![category("work", "Work"), category("personal", "Personal")],
    );

    fx.categories.delete("work").await.expect("delete");

    let tasks = fx.tasks.get_all().await.expect("tasks");
    assert_eq!(tasks.len(), 2);
    assert!(tasks.iter().any(|t| t.category == "Work"));

    let categories = fx.categories.get_all().await.expect("categories");
    let counts = category_counts(&tasks, &categories);
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].category.name, "Personal");
    assert_eq!(counts[0].task_count, 1);
}

#[test]
fn category_patch_rejects_unknown_fields() {
    assert!(serde_json::from_str::<CategoryPatch>(r#"{"id":"x"}"#).is_err());
    let patch: CategoryPatch = serde_json::from_str(r#"{"name":"Home"}"#).expect("parse");
    assert_eq!(patch.name.as_deref(), Some("Home"));
}
