use lambda_http::{http::StatusCode, Body, Error, Request, Response};

use crate::error::SyncError;
use crate::mapper;
use crate::types::{SyncResponse, UserPayload, UserRecord};
use crate::users;
use crate::webhook;
use crate::AppState;

/// Webhook entry point: verify the event, branch on its type, mutate the
/// store, then best-effort write the generated id back to the provider.
pub async fn handle_webhook(state: &AppState, event: &Request) -> Result<Response<Body>, Error> {
    let headers = event.headers();
    let svix_id = headers
        .get(webhook::HEADER_ID)
        .and_then(|v| v.to_str().ok());
    let svix_timestamp = headers
        .get(webhook::HEADER_TIMESTAMP)
        .and_then(|v| v.to_str().ok());
    let svix_signature = headers
        .get(webhook::HEADER_SIGNATURE)
        .and_then(|v| v.to_str().ok());

    let (Some(svix_id), Some(svix_timestamp), Some(svix_signature)) =
        (svix_id, svix_timestamp, svix_signature)
    else {
        return SyncError::MissingHeaders.to_response();
    };

    let body = match event.body() {
        Body::Text(text) => text.as_bytes(),
        Body::Binary(bytes) => bytes.as_slice(),
        Body::Empty => &[],
    };

    let parsed = match state
        .verifier
        .verify(svix_id, svix_timestamp, svix_signature, body)
    {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::error!("Webhook verification failed: {}", e);
            return e.to_response();
        }
    };

    tracing::info!(
        "📥 Webhook received - Type: {} Id: {}",
        parsed.event_type,
        parsed.data.id
    );

    let outcome = match parsed.event_type.as_str() {
        "user.created" => handle_created(state, &parsed.data).await,
        "user.updated" => handle_updated(state, &parsed.data).await,
        "user.deleted" => handle_deleted(state, &parsed.data).await,
        other => Err(SyncError::UnhandledEventType(other.to_string())),
    };

    match outcome {
        Ok((status, response)) => Ok(Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .header("Access-Control-Allow-Origin", "*")
            .body(serde_json::to_string(&response)?.into())
            .map_err(Box::new)?),
        Err(e) => {
            tracing::error!("Error handling {} event: {}", parsed.event_type, e);
            e.to_response()
        }
    }
}

async fn handle_created(
    state: &AppState,
    payload: &UserPayload,
) -> Result<(StatusCode, SyncResponse), SyncError> {
    let mapped = mapper::map_user(payload);

    let (record, status, message) =
        match users::create_user(&state.dynamo_client, &state.table_name, &mapped).await {
            Ok(record) => (record, StatusCode::CREATED, "New user created"),
            // Redelivered create: overwrite the existing record instead,
            // keeping its original userId.
            Err(SyncError::DuplicateKey(_)) => {
                let record = users::find_and_update_user(
                    &state.dynamo_client,
                    &state.table_name,
                    &mapped.clerk_id,
                    &mapped,
                )
                .await?
                .ok_or_else(|| {
                    SyncError::Store(format!(
                        "record for clerkId {} disappeared during create",
                        mapped.clerk_id
                    ))
                })?;
                (record, StatusCode::OK, "User already exists")
            }
            Err(e) => return Err(e),
        };

    write_back_metadata(state, &record).await;

    Ok((
        status,
        SyncResponse {
            message: message.to_string(),
            user: Some(record),
        },
    ))
}

async fn handle_updated(
    state: &AppState,
    payload: &UserPayload,
) -> Result<(StatusCode, SyncResponse), SyncError> {
    let mapped = mapper::map_user(payload);

    let record = match users::find_and_update_user(
        &state.dynamo_client,
        &state.table_name,
        &mapped.clerk_id,
        &mapped,
    )
    .await?
    {
        Some(record) => record,
        // Update for a user we never stored: upsert rather than drop
        // the event.
        None => {
            tracing::warn!(
                "Update for unknown clerkId {}, creating record",
                mapped.clerk_id
            );
            users::create_user(&state.dynamo_client, &state.table_name, &mapped).await?
        }
    };

    write_back_metadata(state, &record).await;

    Ok((
        StatusCode::OK,
        SyncResponse {
            message: "User updated".to_string(),
            user: Some(record),
        },
    ))
}

async fn handle_deleted(
    state: &AppState,
    payload: &UserPayload,
) -> Result<(StatusCode, SyncResponse), SyncError> {
    match users::find_and_delete_user(&state.dynamo_client, &state.table_name, &payload.id).await? {
        Some(record) => Ok((
            StatusCode::OK,
            SyncResponse {
                message: "User deleted".to_string(),
                user: Some(record),
            },
        )),
        None => Err(SyncError::NotFound(payload.id.clone())),
    }
}

/// Store the generated record id in the provider's per-user metadata.
///
/// The primary mutation has already succeeded, so a failure here is
/// logged and does not change the response.
async fn write_back_metadata(state: &AppState, record: &UserRecord) {
    if let Err(e) = state
        .clerk_client
        .update_user_metadata(&record.clerk_id, &record.user_id)
        .await
    {
        tracing::error!(
            "Failed to write userId back to provider metadata for {}: {}",
            record.clerk_id,
            e
        );
    }
}
