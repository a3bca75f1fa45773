use lambda_http::{http::StatusCode, Body, Error, Response};

use crate::error::SyncError;
use crate::users;
use crate::AppState;

/// Self-service account deletion: remove the account at the provider,
/// then remove the local record.
///
/// Provider deletion comes first; a failure leaves both sides intact.
pub async fn delete_account(state: &AppState, clerk_id: &str) -> Result<Response<Body>, Error> {
    if let Err(e) = state.clerk_client.delete_user(clerk_id).await {
        tracing::error!("Failed to delete provider account {}: {}", clerk_id, e);
        return e.to_response();
    }

    match users::find_and_delete_user(&state.dynamo_client, &state.table_name, clerk_id).await {
        Ok(Some(_)) => Ok(Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "application/json")
            .header("Access-Control-Allow-Origin", "*")
            .body(
                serde_json::json!({"message": "User deleted successfully"})
                    .to_string()
                    .into(),
            )
            .map_err(Box::new)?),
        Ok(None) => SyncError::NotFound(clerk_id.to_string()).to_response(),
        Err(e) => {
            tracing::error!("Failed to delete record for {}: {}", clerk_id, e);
            e.to_response()
        }
    }
}
