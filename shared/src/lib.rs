pub mod accounts;
pub mod clerk;
pub mod error;
pub mod mapper;
pub mod sync;
pub mod types;
pub mod users;
pub mod webhook;

use aws_sdk_dynamodb::Client as DynamoClient;
use std::sync::Arc;

use crate::clerk::ClerkClient;
use crate::error::SyncError;
use crate::webhook::WebhookVerifier;

/// Configuration read once at startup. A missing signing secret or
/// provider key is fatal before any request is served.
pub struct Config {
    pub table_name: String,
    pub webhook_secret: String,
    pub clerk_secret_key: String,
    pub clerk_api_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, SyncError> {
        Ok(Self {
            table_name: std::env::var("TABLE_NAME").unwrap_or_else(|_| "usersync".to_string()),
            webhook_secret: std::env::var("CLERK_WEBHOOK_SECRET")
                .map_err(|_| SyncError::Config("CLERK_WEBHOOK_SECRET"))?,
            clerk_secret_key: std::env::var("CLERK_SECRET_KEY")
                .map_err(|_| SyncError::Config("CLERK_SECRET_KEY"))?,
            clerk_api_url: std::env::var("CLERK_API_URL")
                .unwrap_or_else(|_| clerk::DEFAULT_API_URL.to_string()),
        })
    }
}

/// Shared application state
pub struct AppState {
    pub dynamo_client: DynamoClient,
    pub clerk_client: ClerkClient,
    pub verifier: WebhookVerifier,
    pub table_name: String,
}

impl AppState {
    pub fn new(
        dynamo_client: DynamoClient,
        clerk_client: ClerkClient,
        verifier: WebhookVerifier,
        table_name: String,
    ) -> Arc<Self> {
        Arc::new(Self {
            dynamo_client,
            clerk_client,
            verifier,
            table_name,
        })
    }
}
