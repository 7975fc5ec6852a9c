//! REST adapter for a hosted forms endpoint.
//!
//! Criteria, sorting and paging travel as JSON-encoded query parameters;
//! authentication is a per-request API-key header. The adapter does one
//! round-trip per call and maps HTTP outcomes onto [`StoreError`] without
//! retrying.

use super::{FormsApi, StoreError};
use crate::entry::{Entry, EntryId, FormId};
use crate::repository::{Paging, SearchCriteria, Sorting};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

/// Header carrying the store API key.
pub const STORE_API_KEY_HEADER: &str = "X-Api-Key";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Response from the entry-create endpoint.
#[derive(Debug, Deserialize)]
struct CreateResponse {
    id: EntryId,
}

/// Response from the entry-query endpoint.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    total_count: u64,
    #[serde(default)]
    entries: Vec<Entry>,
}

/// [`FormsApi`] implementation backed by a forms REST endpoint.
pub struct RestFormsApi {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestFormsApi {
    /// Build an adapter for `base_url` (no trailing slash needed).
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Map a non-success response to a [`StoreError`], distinguishing 404.
    async fn check(
        response: reqwest::Response,
        entry_id: Option<EntryId>,
    ) -> Result<reqwest::Response, StoreError> {
        if response.status() == StatusCode::NOT_FOUND {
            if let Some(id) = entry_id {
                return Err(StoreError::NotFound(id));
            }
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Backend(format!("{status}: {body}")));
        }
        Ok(response)
    }
}

#[async_trait]
impl FormsApi for RestFormsApi {
    async fn add_entry(&self, entry: &Entry) -> Result<EntryId, StoreError> {
        let Some(form_id) = entry.form_id() else {
            return Err(StoreError::InvalidEntry(
                "entry is missing a form id".to_string(),
            ));
        };
        let response = self
            .client
            .post(self.url(&format!("forms/{form_id}/entries")))
            .header(STORE_API_KEY_HEADER, &self.api_key)
            .json(entry)
            .send()
            .await?;
        let response = Self::check(response, None).await?;
        let created: CreateResponse = response.json().await?;
        Ok(created.id)
    }

    async fn update_entry(&self, entry: &Entry) -> Result<(), StoreError> {
        let Some(id) = entry.id() else {
            return Err(StoreError::InvalidEntry(
                "entry is missing an id".to_string(),
            ));
        };
        let response = self
            .client
            .put(self.url(&format!("entries/{id}")))
            .header(STORE_API_KEY_HEADER, &self.api_key)
            .json(entry)
            .send()
            .await?;
        Self::check(response, Some(id)).await?;
        Ok(())
    }

    async fn delete_entry(&self, entry_id: EntryId) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(self.url(&format!("entries/{entry_id}")))
            .header(STORE_API_KEY_HEADER, &self.api_key)
            .send()
            .await?;
        Self::check(response, Some(entry_id)).await?;
        Ok(())
    }

    async fn get_entries(
        &self,
        form_id: FormId,
        criteria: &SearchCriteria,
        sorting: &Sorting,
        paging: &Paging,
    ) -> Result<Vec<Entry>, StoreError> {
        let response = self
            .client
            .get(self.url(&format!("forms/{form_id}/entries")))
            .header(STORE_API_KEY_HEADER, &self.api_key)
            .query(&[
                ("search", serde_json::to_string(criteria)?),
                ("sorting", serde_json::to_string(sorting)?),
                ("paging", serde_json::to_string(paging)?),
            ])
            .send()
            .await?;
        let response = Self::check(response, None).await?;
        let query: QueryResponse = response.json().await?;
        Ok(query.entries)
    }

    async fn count_entries(
        &self,
        form_id: FormId,
        criteria: &SearchCriteria,
    ) -> Result<u64, StoreError> {
        // Minimal page; the count comes from the response envelope.
        let response = self
            .client
            .get(self.url(&format!("forms/{form_id}/entries")))
            .header(STORE_API_KEY_HEADER, &self.api_key)
            .query(&[
                ("search", serde_json::to_string(criteria)?),
                ("paging", serde_json::to_string(&Paging::new(0, 1))?),
            ])
            .send()
            .await?;
        let response = Self::check(response, None).await?;
        let query: QueryResponse = response.json().await?;
        Ok(query.total_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let api = RestFormsApi::new("https://forms.example.com/api/", "key").unwrap();
        assert_eq!(
            api.url("forms/3/entries"),
            "https://forms.example.com/api/forms/3/entries"
        );
    }

    #[test]
    fn test_query_response_defaults_entries() {
        let parsed: QueryResponse = serde_json::from_str(r#"{"total_count": 12}"#).unwrap();
        assert_eq!(parsed.total_count, 12);
        assert!(parsed.entries.is_empty());
    }
}
