use readlog::domain::books::{BookRecord, ReadingStatus};
use readlog::domain::ids::LibraryId;
use readlog::domain::preferences::{PurchaseScope, ReadingPreferences};
use readlog::infrastructure::client::ReadlogClient;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::helpers::spawn_app;

fn finished(id: &str, on: &str, pages: u32) -> BookRecord {
    let mut book = BookRecord::new(id, format!("Book {id}"));
    book.status = ReadingStatus::Completed;
    book.completion_date = Some(on.to_string());
    book.number_of_pages = Some(pages);
    book
}

#[tokio::test]
async fn client_manages_a_library_end_to_end() {
    let app = spawn_app().await;
    let client = app.client();
    let libraries = client.libraries();
    let id = LibraryId::parse("shelf-1").unwrap();

    let summary = libraries
        .push_books(&id, &[finished("1", "2024-02-01", 240)])
        .await
        .unwrap();
    assert_eq!(summary.library_id, id);
    assert_eq!(summary.books, 1);

    let prefs = ReadingPreferences::default().with_overrides(
        Some(40),
        None,
        None,
        Some(PurchaseScope::AllShelves),
    );
    let saved = libraries.set_preferences(&id, &prefs).await.unwrap();
    assert_eq!(saved, prefs);
    assert_eq!(libraries.preferences(&id).await.unwrap(), prefs);

    let cached = libraries.stats(&id, Some(2024)).await.unwrap();
    assert_eq!(cached.year, Some(2024));
    assert_eq!(cached.stats.total_pages, 240);
    assert_eq!(cached.stats.total_reading_time_hours, "6.0");

    assert_eq!(libraries.years(&id).await.unwrap(), vec![2024]);
    assert_eq!(libraries.list().await.unwrap(), vec![id.clone()]);

    libraries.delete(&id).await.unwrap();
    assert!(libraries.find_preferences(&id).await.unwrap().is_none());
}

#[tokio::test]
async fn client_computes_stateless_stats() {
    let app = spawn_app().await;
    let client = app.client();

    let stats = client
        .stats()
        .compute(
            &[finished("1", "2024-02-01", 300), finished("2", "2023-02-01", 100)],
            &ReadingPreferences::default(),
            Some(2024),
        )
        .await
        .unwrap();

    assert_eq!(stats.total_books, 1);
    assert_eq!(stats.total_pages, 300);

    let health = client.stats().health().await.unwrap();
    assert_eq!(health["status"], "ok");
}

#[tokio::test]
async fn client_surfaces_server_error_message() {
    let app = spawn_app().await;
    let client = app.client();
    let id = LibraryId::parse("ghost").unwrap();

    let err = client.libraries().stats(&id, None).await.unwrap_err();

    assert_eq!(err.to_string(), "request failed (404 Not Found): not found");
}

#[tokio::test]
async fn client_reports_non_json_error_bodies() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/libraries"))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream unavailable"))
        .mount(&mock_server)
        .await;

    let client = ReadlogClient::from_base_url(&mock_server.uri()).unwrap();
    let err = client.libraries().list().await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "request failed (502 Bad Gateway): upstream unavailable"
    );
}

#[tokio::test]
async fn client_respects_base_path() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/readlog/api/v1/libraries/alice/years"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![2021, 2020]))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ReadlogClient::from_base_url(&format!("{}/readlog", mock_server.uri())).unwrap();
    let years = client
        .libraries()
        .years(&LibraryId::parse("alice").unwrap())
        .await
        .unwrap();

    assert_eq!(years, vec![2021, 2020]);
}
