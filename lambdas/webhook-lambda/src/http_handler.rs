use lambda_http::{
    http::{Method, StatusCode},
    Body, Error, Request, RequestExt, Response,
};
use std::sync::Arc;
use usersync_shared::error::SyncError;
use usersync_shared::{accounts, sync, AppState};

/// Main Lambda handler - routes requests to the webhook and account endpoints
pub(crate) async fn function_handler(
    event: Request,
    state: Arc<AppState>,
) -> Result<Response<Body>, Error> {
    let method = event.method();
    let path = event.uri().path();
    tracing::info!("🚀 Sync Lambda invoked - Method: {} Path: {}", method, path);

    // Handle CORS preflight
    if method == "OPTIONS" {
        return Ok(Response::builder()
            .status(StatusCode::OK)
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "POST,DELETE,OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type,Authorization,X-User-Id")
            .body(Body::Empty)
            .map_err(Box::new)?);
    }

    match (method, path) {
        (&Method::POST, "/webhooks/clerk") => sync::handle_webhook(&state, &event).await,
        (&Method::DELETE, "/users/me") => {
            // Caller identity from the API Gateway JWT authorizer; the
            // X-User-Id header overrides it in local development.
            let clerk_id = event
                .headers()
                .get("X-User-Id")
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string())
                .or_else(|| {
                    event
                        .request_context_ref()
                        .and_then(|ctx| ctx.authorizer())
                        .and_then(|auth| auth.jwt.as_ref())
                        .and_then(|jwt| jwt.claims.get("sub"))
                        .map(|s| s.to_string())
                });

            match clerk_id {
                Some(clerk_id) => accounts::delete_account(&state, &clerk_id).await,
                None => SyncError::Unauthorized.to_response(),
            }
        }
        _ => not_found(),
    }
}

fn not_found() -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::json!({"error": "Not found"}).to_string().into())
        .map_err(Box::new)?)
}
