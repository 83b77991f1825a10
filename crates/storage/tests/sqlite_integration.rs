use chrono::Duration;
use planner_core::model::Difficulty;
use planner_core::time::fixed_today;
use storage::repository::{SubjectRecord, SubjectStore, SUBJECTS_KEY};
use storage::sqlite::SqliteRepository;

fn record(name: &str, days_out: i64, difficulty: Difficulty) -> SubjectRecord {
    SubjectRecord {
        name: name.to_owned(),
        exam_date: fixed_today() + Duration::days(days_out),
        difficulty,
    }
}

#[tokio::test]
async fn sqlite_round_trips_the_subject_list() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let subjects = vec![
        record("Math", 5, Difficulty::Medium),
        record("Bio", 3, Difficulty::Easy),
        record("Chem", 10, Difficulty::Hard),
    ];
    repo.save_subjects(&subjects).await.unwrap();

    let loaded = repo.load_subjects().await.unwrap();
    assert_eq!(loaded, subjects);
}

#[tokio::test]
async fn sqlite_missing_entry_loads_as_empty_list() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_missing?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert!(repo.load_subjects().await.unwrap().is_empty());
}

#[tokio::test]
async fn sqlite_save_replaces_previous_entry() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_replace?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.save_subjects(&[record("Math", 5, Difficulty::Medium)])
        .await
        .unwrap();
    repo.save_subjects(&[record("Physics", 7, Difficulty::Hard)])
        .await
        .unwrap();

    let loaded = repo.load_subjects().await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].name, "Physics");
}

#[tokio::test]
async fn sqlite_connections_carry_the_configured_pragmas() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_pragmas?mode=memory&cache=shared")
        .await
        .expect("connect");

    let foreign_keys: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
        .fetch_one(repo.pool())
        .await
        .expect("foreign_keys");
    assert_eq!(foreign_keys, 1);

    let busy_timeout: i64 = sqlx::query_scalar("PRAGMA busy_timeout")
        .fetch_one(repo.pool())
        .await
        .expect("busy_timeout");
    assert_eq!(busy_timeout, 5000);
}

#[tokio::test]
async fn sqlite_malformed_entry_loads_as_empty_list() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_malformed?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.save_subjects(&[record("Math", 5, Difficulty::Medium)])
        .await
        .unwrap();

    // Corrupt the stored payload behind the store's back via a raw pool on
    // the same shared in-memory database.
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .connect("sqlite:file:memdb_malformed?mode=memory&cache=shared")
        .await
        .expect("connect raw");
    sqlx::query("UPDATE planner_kv SET value = ?1 WHERE key = ?2")
        .bind("{not json")
        .bind(SUBJECTS_KEY)
        .execute(&pool)
        .await
        .expect("corrupt");

    let storage = repo.into_storage();
    assert!(storage.subjects.load_subjects().await.unwrap().is_empty());
}
