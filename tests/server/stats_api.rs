use serde_json::{Value, json};

use crate::helpers::{completed_book, get, post_json, shelf_book, spawn_app};

#[tokio::test]
async fn health_reports_ok() {
    let app = spawn_app().await;

    let response = get(&app, "/health").await;

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn stateless_stats_for_single_book() {
    let app = spawn_app().await;

    let payload = json!({
        "books": [completed_book("1", 300, "2024-03-10", None)],
        "preferences": { "reading_speed": 30 },
    });
    let response = post_json(&app, "/stats", &payload).await;

    assert_eq!(response.status(), 200);
    let stats: Value = response.json().await.unwrap();
    assert_eq!(stats["total_books"], 1);
    assert_eq!(stats["total_pages"], 300);
    assert_eq!(stats["avg_pages_per_book"], 300);
    assert_eq!(stats["total_reading_time_hours"], "10.0");
    assert_eq!(stats["top_authors"][0]["name"], "Ursula K. Le Guin");
}

#[tokio::test]
async fn stateless_stats_with_empty_library() {
    let app = spawn_app().await;

    let response = post_json(&app, "/stats", &json!({ "books": [] })).await;

    assert_eq!(response.status(), 200);
    let stats: Value = response.json().await.unwrap();
    assert_eq!(stats["total_books"], 0);
    assert_eq!(stats["total_reading_time_hours"], "0.0");
    assert_eq!(stats["average_reading_time"], "0");
    assert_eq!(stats["has_reading_time_data"], false);
    assert_eq!(stats["monthly"], json!([]));
    assert_eq!(stats["reading_time_distribution"], json!([]));
}

#[tokio::test]
async fn stateless_stats_honours_year_filter() {
    let app = spawn_app().await;

    let payload = json!({
        "books": [
            completed_book("1", 100, "2023-05-01", None),
            completed_book("2", 200, "2024-05-01", None),
        ],
        "year": 2023,
    });
    let response = post_json(&app, "/stats", &payload).await;

    assert_eq!(response.status(), 200);
    let stats: Value = response.json().await.unwrap();
    assert_eq!(stats["total_books"], 1);
    assert_eq!(stats["total_pages"], 100);
}

#[tokio::test]
async fn stateless_stats_counts_purchases_by_scope() {
    let app = spawn_app().await;
    let books = json!([
        shelf_book("1", "to-read", Some(true)),
        shelf_book("2", "to-read", Some(false)),
        shelf_book("3", "reading", None),
    ]);

    let to_read: Value = post_json(&app, "/stats", &json!({ "books": books }))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(to_read["purchased_books"], 1);
    assert_eq!(to_read["to_buy_books"], 1);

    let all_shelves: Value = post_json(
        &app,
        "/stats",
        &json!({ "books": books, "preferences": { "purchase_scope": "all-shelves" } }),
    )
    .await
    .json()
    .await
    .unwrap();
    assert_eq!(all_shelves["purchased_books"], 2);
    assert_eq!(all_shelves["to_buy_books"], 1);
}

#[tokio::test]
async fn stateless_stats_rejects_invalid_preferences() {
    let app = spawn_app().await;

    let payload = json!({ "books": [], "preferences": { "reading_speed": 0 } });
    let response = post_json(&app, "/stats", &payload).await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("reading speed"));
}

#[tokio::test]
async fn stateless_stats_rejects_out_of_range_year() {
    let app = spawn_app().await;

    let response = post_json(&app, "/stats", &json!({ "books": [], "year": 1200 })).await;

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let app = spawn_app().await;

    let response = reqwest::Client::new()
        .post(app.api_url("/stats"))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .starts_with("invalid JSON payload")
    );
}

#[tokio::test]
async fn lenient_fields_do_not_fail_the_request() {
    let app = spawn_app().await;

    let payload = json!({
        "books": [{
            "id": 7,
            "title": "Odd Record",
            "status": "completed",
            "numberOfPages": "lots",
            "completionDate": "not a date",
        }],
    });
    let response = post_json(&app, "/stats", &payload).await;

    assert_eq!(response.status(), 200);
    let stats: Value = response.json().await.unwrap();
    assert_eq!(stats["total_books"], 1);
    assert_eq!(stats["total_pages"], 0);
    assert_eq!(stats["monthly"], json!([]));
}

#[tokio::test]
async fn stateless_stats_treats_null_fields_as_absent() {
    let app = spawn_app().await;

    let mut completed = completed_book("1", 200, "2024-05-02", None);
    completed["author"] = Value::Null;
    completed["subjects"] = Value::Null;
    let mut unsorted = shelf_book("2", "to-read", None);
    unsorted["status"] = Value::Null;

    let payload = json!({ "books": [completed, unsorted] });
    let response = post_json(&app, "/stats", &payload).await;

    assert_eq!(response.status(), 200);
    let stats: Value = response.json().await.unwrap();
    assert_eq!(stats["total_books"], 1);
    assert_eq!(stats["total_pages"], 200);
    assert_eq!(stats["to_read_books"], 1);
    assert_eq!(stats["top_authors"], json!([]));
    assert_eq!(stats["top_genres"], json!([]));
}
