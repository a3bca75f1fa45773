use lambda_http::{http::StatusCode, Body, Error, Response};
use serde::Serialize;

/// Error variants for the synchronization pipeline.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Missing {0} environment variable")]
    Config(&'static str),

    #[error("Missing Svix signature headers")]
    MissingHeaders,

    #[error("Webhook signature verification failed")]
    InvalidSignature,

    #[error("Unhandled event type: {0}")]
    UnhandledEventType(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("User with clerkId {0} not found")]
    NotFound(String),

    #[error("User with clerkId {0} already exists")]
    DuplicateKey(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Identity provider error: {0}")]
    Provider(String),
}

/// JSON error body returned to the webhook caller.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl SyncError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SyncError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SyncError::MissingHeaders => StatusCode::BAD_REQUEST,
            SyncError::InvalidSignature => StatusCode::BAD_REQUEST,
            SyncError::UnhandledEventType(_) => StatusCode::BAD_REQUEST,
            SyncError::Unauthorized => StatusCode::UNAUTHORIZED,
            SyncError::NotFound(_) => StatusCode::NOT_FOUND,
            SyncError::DuplicateKey(_) => StatusCode::CONFLICT,
            SyncError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SyncError::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            SyncError::Config(_) => "ConfigurationError",
            SyncError::MissingHeaders => "MissingHeaders",
            SyncError::InvalidSignature => "InvalidSignature",
            SyncError::UnhandledEventType(_) => "UnhandledEventType",
            SyncError::Unauthorized => "Unauthorized",
            SyncError::NotFound(_) => "NotFound",
            SyncError::DuplicateKey(_) => "DuplicateKey",
            SyncError::Store(_) => "StoreError",
            SyncError::Provider(_) => "ProviderError",
        }
    }

    pub fn to_response(&self) -> Result<Response<Body>, Error> {
        let error = ErrorResponse {
            error: self.error_code().to_string(),
            message: self.to_string(),
        };
        Ok(Response::builder()
            .status(self.status_code())
            .header("Content-Type", "application/json")
            .header("Access-Control-Allow-Origin", "*")
            .body(serde_json::to_string(&error)?.into())
            .map_err(Box::new)?)
    }
}
