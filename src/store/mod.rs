pub mod auth;
pub mod storage;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use uuid::Uuid;

use crate::config::StoreConfig;

/// Errors surfaced by calls to the external content store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request to the content store failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("content store returned {status}: {message}")]
    Rejected { status: StatusCode, message: String },
    #[error("failed to decode content store response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("content store reply was missing the affected row")]
    MissingRow,
}

/// HTTP client for the external data/storage service. Explicitly constructed
/// at startup and carried in the application state; handlers borrow it rather
/// than reaching for a process-wide singleton.
#[derive(Clone)]
pub struct StoreClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl StoreClient {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            http: Client::new(),
            base_url: config.url,
            api_key: config.service_key,
        }
    }

    /// Start a row query against a table.
    pub fn rows<'a>(&'a self, table: &'a str) -> RowQuery<'a> {
        RowQuery {
            client: self,
            table,
            params: vec![("select".to_string(), "*".to_string())],
        }
    }

    /// Insert a single row and return the stored representation.
    pub async fn insert_row<T, P>(&self, table: &str, payload: &P) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let response = self
            .authed(self.http.post(self.rest_url(table)))
            .header("Prefer", "return=representation")
            .json(&[payload])
            .send()
            .await?;

        first_row(read_rows(response).await?)
    }

    /// Apply a partial update to the row with the given id and return the
    /// updated representation. A missing row is an error, not a no-op.
    pub async fn update_row<T, P>(&self, table: &str, id: Uuid, patch: &P) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let response = self
            .authed(self.http.patch(self.rest_url(table)))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await?;

        first_row(read_rows(response).await?)
    }

    pub async fn delete_row(&self, table: &str, id: Uuid) -> Result<(), StoreError> {
        let response = self
            .authed(self.http.delete(self.rest_url(table)))
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await?;

        expect_success(response).await
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

/// Builder for filtered, ordered row reads. Filters use the store's query
/// operators (`eq.{value}`, `order={column}.{direction}`).
pub struct RowQuery<'a> {
    client: &'a StoreClient,
    table: &'a str,
    params: Vec<(String, String)>,
}

impl<'a> RowQuery<'a> {
    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.params.push((column.to_string(), format!("eq.{value}")));
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.params
            .push(("order".to_string(), format!("{column}.{direction}")));
        self
    }

    pub async fn fetch_all<T: DeserializeOwned>(self) -> Result<Vec<T>, StoreError> {
        let response = self
            .client
            .authed(self.client.http.get(self.client.rest_url(self.table)))
            .query(&self.params)
            .send()
            .await?;

        read_rows(response).await
    }

    pub async fn fetch_optional<T: DeserializeOwned>(self) -> Result<Option<T>, StoreError> {
        Ok(self.fetch_all().await?.into_iter().next())
    }

    #[cfg(test)]
    fn query_pairs(&self) -> &[(String, String)] {
        &self.params
    }
}

async fn read_rows<T: DeserializeOwned>(response: Response) -> Result<Vec<T>, StoreError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(StoreError::Rejected {
            status,
            message: truncate_body(&body),
        });
    }

    Ok(serde_json::from_str(&body)?)
}

async fn expect_success(response: Response) -> Result<(), StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Rejected {
        status,
        message: truncate_body(&body),
    })
}

fn first_row<T>(rows: Vec<T>) -> Result<T, StoreError> {
    rows.into_iter().next().ok_or(StoreError::MissingRow)
}

// Store error bodies can carry whole HTML pages; keep logs readable.
fn truncate_body(body: &str) -> String {
    const MAX: usize = 500;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> StoreClient {
        StoreClient::new(StoreConfig {
            url: "https://store.example.com".to_string(),
            service_key: "test-key".to_string(),
        })
    }

    #[test]
    fn row_query_builds_filter_pairs() {
        let store = client();
        let query = store
            .rows("exhibits")
            .eq("published", "true")
            .eq("category", "Paintings")
            .order("created_at", false);

        assert_eq!(
            query.query_pairs(),
            &[
                ("select".to_string(), "*".to_string()),
                ("published".to_string(), "eq.true".to_string()),
                ("category".to_string(), "eq.Paintings".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
            ]
        );
    }

    #[test]
    fn order_ascending_uses_asc_suffix() {
        let store = client();
        let query = store.rows("workshops").order("order", true);
        assert_eq!(
            query.query_pairs().last().unwrap(),
            &("order".to_string(), "order.asc".to_string())
        );
    }

    #[test]
    fn truncate_body_preserves_short_bodies() {
        assert_eq!(truncate_body("bad request"), "bad request");
        let long = "x".repeat(600);
        let truncated = truncate_body(&long);
        assert_eq!(truncated.len(), 503);
        assert!(truncated.ends_with("..."));
    }
}
