use serde_json::{Value, json};

use crate::helpers::{completed_book, delete, get, put_json, shelf_book, spawn_app};

#[tokio::test]
async fn put_books_creates_library() {
    let app = spawn_app().await;

    let books = json!([completed_book("1", 300, "2024-03-10", None)]);
    let response = put_json(&app, "/libraries/alice/books", &books).await;

    assert_eq!(response.status(), 200);
    let summary: Value = response.json().await.unwrap();
    assert_eq!(summary["library_id"], "alice");
    assert_eq!(summary["books"], 1);
    assert!(summary["revision"].as_u64().unwrap() > 0);

    let ids: Value = get(&app, "/libraries").await.json().await.unwrap();
    assert_eq!(ids, json!(["alice"]));
}

#[tokio::test]
async fn get_books_returns_stored_records() {
    let app = spawn_app().await;
    let books = json!([completed_book("1", 300, "2024-03-10", None)]);
    put_json(&app, "/libraries/alice/books", &books).await;

    let response = get(&app, "/libraries/alice/books").await;

    assert_eq!(response.status(), 200);
    let stored: Value = response.json().await.unwrap();
    assert_eq!(stored[0]["title"], "Book 1");
    assert_eq!(stored[0]["numberOfPages"], 300);
}

#[tokio::test]
async fn unknown_library_is_404() {
    let app = spawn_app().await;

    for path in [
        "/libraries/nobody/books",
        "/libraries/nobody/preferences",
        "/libraries/nobody/stats",
        "/libraries/nobody/years",
    ] {
        let response = get(&app, path).await;
        assert_eq!(response.status(), 404, "GET {path}");
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["message"], "not found");
    }

    assert_eq!(delete(&app, "/libraries/nobody").await.status(), 404);
}

#[tokio::test]
async fn invalid_library_id_is_400() {
    let app = spawn_app().await;
    let too_long = "x".repeat(65);

    let response = get(&app, &format!("/libraries/{too_long}/stats")).await;
    assert_eq!(response.status(), 400);

    let response = get(&app, "/libraries/bad.id/stats").await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn new_library_has_default_preferences() {
    let app = spawn_app().await;
    put_json(&app, "/libraries/alice/books", &json!([])).await;

    let prefs: Value = get(&app, "/libraries/alice/preferences")
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(prefs["reading_speed"], 30);
    assert_eq!(prefs["yearly_goal"], 50);
    assert_eq!(prefs["monthly_goal"], 4);
    assert_eq!(prefs["purchase_scope"], "to-read");
}

#[tokio::test]
async fn preferences_round_trip_and_validate() {
    let app = spawn_app().await;

    let response = put_json(
        &app,
        "/libraries/alice/preferences",
        &json!({ "reading_speed": 60, "yearly_goal": 12 }),
    )
    .await;
    assert_eq!(response.status(), 200);
    let saved: Value = response.json().await.unwrap();
    assert_eq!(saved["reading_speed"], 60);
    assert_eq!(saved["yearly_goal"], 12);
    assert_eq!(saved["monthly_goal"], 4);

    let rejected = put_json(
        &app,
        "/libraries/alice/preferences",
        &json!({ "monthly_goal": 0 }),
    )
    .await;
    assert_eq!(rejected.status(), 400);

    let current: Value = get(&app, "/libraries/alice/preferences")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(current["reading_speed"], 60);
}

#[tokio::test]
async fn library_stats_are_memoized_until_books_change() {
    let app = spawn_app().await;
    put_json(
        &app,
        "/libraries/alice/books",
        &json!([completed_book("1", 300, "2024-03-10", None)]),
    )
    .await;

    let first: Value = get(&app, "/libraries/alice/stats").await.json().await.unwrap();
    let second: Value = get(&app, "/libraries/alice/stats").await.json().await.unwrap();
    assert_eq!(first["computed_at"], second["computed_at"]);
    assert_eq!(first["stats"]["total_pages"], 300);
    assert_eq!(first["year"], Value::Null);

    put_json(
        &app,
        "/libraries/alice/books",
        &json!([
            completed_book("1", 300, "2024-03-10", None),
            completed_book("2", 150, "2024-04-10", None),
        ]),
    )
    .await;

    let third: Value = get(&app, "/libraries/alice/stats").await.json().await.unwrap();
    assert_eq!(third["stats"]["total_pages"], 450);
    assert!(third["revision"].as_u64() > first["revision"].as_u64());
}

#[tokio::test]
async fn preference_change_recomputes_stats() {
    let app = spawn_app().await;
    put_json(
        &app,
        "/libraries/alice/books",
        &json!([completed_book("1", 300, "2024-03-10", None)]),
    )
    .await;

    let before: Value = get(&app, "/libraries/alice/stats").await.json().await.unwrap();
    put_json(
        &app,
        "/libraries/alice/preferences",
        &json!({ "reading_speed": 60 }),
    )
    .await;
    let after: Value = get(&app, "/libraries/alice/stats").await.json().await.unwrap();

    assert_eq!(before["stats"]["total_reading_time_hours"], "10.0");
    assert_eq!(after["stats"]["total_reading_time_hours"], "5.0");
}

#[tokio::test]
async fn library_stats_year_filter() {
    let app = spawn_app().await;
    put_json(
        &app,
        "/libraries/alice/books",
        &json!([
            completed_book("1", 100, "2022-01-05", None),
            completed_book("2", 200, "2023-07-01", None),
        ]),
    )
    .await;

    let filtered: Value = get(&app, "/libraries/alice/stats?year=2022")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(filtered["year"], 2022);
    assert_eq!(filtered["stats"]["total_pages"], 100);

    let all: Value = get(&app, "/libraries/alice/stats?year=all")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(all["year"], Value::Null);
    assert_eq!(all["stats"]["total_pages"], 300);

    let bad = get(&app, "/libraries/alice/stats?year=someday").await;
    assert_eq!(bad.status(), 400);
}

#[tokio::test]
async fn years_lists_completion_years_newest_first() {
    let app = spawn_app().await;
    put_json(
        &app,
        "/libraries/alice/books",
        &json!([
            completed_book("1", 100, "2022-01-05", None),
            completed_book("2", 200, "2024-07-01", None),
            completed_book("3", 200, "2022-09-01", None),
            shelf_book("4", "reading", None),
        ]),
    )
    .await;

    let years: Value = get(&app, "/libraries/alice/years").await.json().await.unwrap();

    assert_eq!(years, json!([2024, 2022]));
}

#[tokio::test]
async fn delete_removes_library_and_cached_stats() {
    let app = spawn_app().await;
    put_json(
        &app,
        "/libraries/alice/books",
        &json!([completed_book("1", 100, "2024-01-05", None)]),
    )
    .await;
    get(&app, "/libraries/alice/stats").await;
    assert_eq!(app.stats_service.cached_entries().await, 1);

    let response = delete(&app, "/libraries/alice").await;

    assert_eq!(response.status(), 204);
    assert_eq!(app.stats_service.cached_entries().await, 0);
    assert_eq!(get(&app, "/libraries/alice/stats").await.status(), 404);
}
