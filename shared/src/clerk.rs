use serde_json::json;
use std::time::Duration;

use crate::error::SyncError;

pub const DEFAULT_API_URL: &str = "https://api.clerk.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin client for the identity provider's backend API.
pub struct ClerkClient {
    http: reqwest::Client,
    api_url: String,
    secret_key: String,
}

impl ClerkClient {
    pub fn new(api_url: String, secret_key: String) -> Result<Self, SyncError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SyncError::Provider(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_url,
            secret_key,
        })
    }

    /// Attach the locally generated record id to the provider-side user
    /// as public metadata.
    pub async fn update_user_metadata(
        &self,
        clerk_id: &str,
        user_id: &str,
    ) -> Result<(), SyncError> {
        let url = format!("{}/v1/users/{}/metadata", self.api_url, clerk_id);
        let response = self
            .http
            .patch(&url)
            .bearer_auth(&self.secret_key)
            .json(&json!({ "public_metadata": { "userId": user_id } }))
            .send()
            .await
            .map_err(|e| SyncError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SyncError::Provider(format!(
                "metadata update for {} returned {}",
                clerk_id,
                response.status()
            )));
        }
        Ok(())
    }

    /// Delete the user's account at the provider.
    pub async fn delete_user(&self, clerk_id: &str) -> Result<(), SyncError> {
        let url = format!("{}/v1/users/{}", self.api_url, clerk_id);
        let response = self
            .http
            .delete(&url)
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| SyncError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SyncError::Provider(format!(
                "account deletion for {} returned {}",
                clerk_id,
                response.status()
            )));
        }
        Ok(())
    }
}
