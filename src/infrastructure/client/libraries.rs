use anyhow::Result;

use super::ReadlogClient;
use crate::application::services::CachedStats;
use crate::domain::books::BookRecord;
use crate::domain::ids::LibraryId;
use crate::domain::preferences::ReadingPreferences;
use crate::domain::repositories::LibrarySummary;

pub struct LibrariesClient<'a> {
    client: &'a ReadlogClient,
}

impl<'a> LibrariesClient<'a> {
    pub fn new(client: &'a ReadlogClient) -> Self {
        Self { client }
    }

    fn library_path(id: &LibraryId, suffix: &str) -> String {
        if suffix.is_empty() {
            format!("api/v1/libraries/{id}")
        } else {
            format!("api/v1/libraries/{id}/{suffix}")
        }
    }

    pub async fn list(&self) -> Result<Vec<LibraryId>> {
        let url = self.client.endpoint("api/v1/libraries")?;
        let response = self
            .client
            .request(reqwest::Method::GET, url)
            .send()
            .await?;
        self.client.handle_response(response).await
    }

    pub async fn push_books(&self, id: &LibraryId, books: &[BookRecord]) -> Result<LibrarySummary> {
        let url = self.client.endpoint(&Self::library_path(id, "books"))?;
        let response = self
            .client
            .request(reqwest::Method::PUT, url)
            .json(books)
            .send()
            .await?;
        self.client.handle_response(response).await
    }

    pub async fn books(&self, id: &LibraryId) -> Result<Vec<BookRecord>> {
        let url = self.client.endpoint(&Self::library_path(id, "books"))?;
        let response = self
            .client
            .request(reqwest::Method::GET, url)
            .send()
            .await?;
        self.client.handle_response(response).await
    }

    pub async fn preferences(&self, id: &LibraryId) -> Result<ReadingPreferences> {
        let url = self.client.endpoint(&Self::library_path(id, "preferences"))?;
        let response = self
            .client
            .request(reqwest::Method::GET, url)
            .send()
            .await?;
        self.client.handle_response(response).await
    }

    /// Like `preferences`, but an unknown library is `None` rather than an
    /// error.
    pub async fn find_preferences(&self, id: &LibraryId) -> Result<Option<ReadingPreferences>> {
        let url = self.client.endpoint(&Self::library_path(id, "preferences"))?;
        let response = self
            .client
            .request(reqwest::Method::GET, url)
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        self.client.handle_response(response).await.map(Some)
    }

    pub async fn set_preferences(
        &self,
        id: &LibraryId,
        preferences: &ReadingPreferences,
    ) -> Result<ReadingPreferences> {
        let url = self.client.endpoint(&Self::library_path(id, "preferences"))?;
        let response = self
            .client
            .request(reqwest::Method::PUT, url)
            .json(preferences)
            .send()
            .await?;
        self.client.handle_response(response).await
    }

    pub async fn stats(&self, id: &LibraryId, year: Option<i32>) -> Result<CachedStats> {
        let mut url = self.client.endpoint(&Self::library_path(id, "stats"))?;
        if let Some(year) = year {
            url.query_pairs_mut().append_pair("year", &year.to_string());
        }
        let response = self
            .client
            .request(reqwest::Method::GET, url)
            .send()
            .await?;
        self.client.handle_response(response).await
    }

    pub async fn years(&self, id: &LibraryId) -> Result<Vec<i32>> {
        let url = self.client.endpoint(&Self::library_path(id, "years"))?;
        let response = self
            .client
            .request(reqwest::Method::GET, url)
            .send()
            .await?;
        self.client.handle_response(response).await
    }

    pub async fn delete(&self, id: &LibraryId) -> Result<()> {
        let url = self.client.endpoint(&Self::library_path(id, ""))?;
        let response = self
            .client
            .request(reqwest::Method::DELETE, url)
            .send()
            .await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(self.client.response_error(response).await)
        }
    }
}
