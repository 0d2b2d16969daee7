use anyhow::Result;
use serde::Serialize;

use super::ReadlogClient;
use crate::domain::books::BookRecord;
use crate::domain::preferences::ReadingPreferences;
use crate::domain::stats::StatsBundle;

#[derive(Serialize)]
struct StatsPayload<'a> {
    books: &'a [BookRecord],
    preferences: &'a ReadingPreferences,
    #[serde(skip_serializing_if = "Option::is_none")]
    year: Option<i32>,
}

/// One-off statistics computed by the server without storing the books.
pub struct StatsClient<'a> {
    client: &'a ReadlogClient,
}

impl<'a> StatsClient<'a> {
    pub fn new(client: &'a ReadlogClient) -> Self {
        Self { client }
    }

    pub async fn compute(
        &self,
        books: &[BookRecord],
        preferences: &ReadingPreferences,
        year: Option<i32>,
    ) -> Result<StatsBundle> {
        let url = self.client.endpoint("api/v1/stats")?;
        let response = self
            .client
            .request(reqwest::Method::POST, url)
            .json(&StatsPayload {
                books,
                preferences,
                year,
            })
            .send()
            .await?;
        self.client.handle_response(response).await
    }

    pub async fn health(&self) -> Result<serde_json::Value> {
        let url = self.client.endpoint("api/v1/health")?;
        let response = self
            .client
            .request(reqwest::Method::GET, url)
            .send()
            .await?;
        self.client.handle_response(response).await
    }
}
