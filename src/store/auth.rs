use reqwest::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

use super::{StoreClient, StoreError, truncate_body};

/// Session issued by the store's password-grant endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

impl StoreClient {
    /// Exchange credentials for a session. Credential checks are entirely the
    /// store's concern; a rejected login comes back as [`StoreError::Rejected`]
    /// with a 4xx status.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, StoreError> {
        let url = format!("{}/auth/v1/token", self.base_url);
        let response = self
            .authed(self.http.post(url))
            .query(&[("grant_type", "password")])
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

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

    /// Resolve an access token to its user. Expired or invalid tokens resolve
    /// to `None`; anything else from the store is an error.
    pub async fn user_for_token(&self, token: &str) -> Result<Option<StoreUser>, StoreError> {
        let url = format!("{}/auth/v1/user", self.base_url);
        let response = self
            .http
            .get(url)
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Ok(None);
        }

        let body = response.text().await?;
        if !status.is_success() {
            return Err(StoreError::Rejected {
                status,
                message: truncate_body(&body),
            });
        }

        Ok(Some(serde_json::from_str(&body)?))
    }

    /// Revoke a session token.
    pub async fn sign_out(&self, token: &str) -> Result<(), StoreError> {
        let url = format!("{}/auth/v1/logout", self.base_url);
        let response = self
            .http
            .post(url)
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .send()
            .await?;

        super::expect_success(response).await
    }
}
