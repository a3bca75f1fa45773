use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{run, service_fn, tracing, Error, Request};
use std::sync::Arc;
use usersync_shared::clerk::ClerkClient;
use usersync_shared::webhook::WebhookVerifier;
use usersync_shared::{AppState, Config};

mod http_handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    // Missing secrets abort here, before any request is served.
    let config = Config::from_env()?;
    let verifier = WebhookVerifier::new(&config.webhook_secret)?;
    let clerk_client = ClerkClient::new(config.clerk_api_url.clone(), config.clerk_secret_key.clone())?;

    // Initialize the AWS client once at startup
    let aws_config = aws_config::load_from_env().await;

    let state = AppState::new(
        DynamoClient::new(&aws_config),
        clerk_client,
        verifier,
        config.table_name.clone(),
    );

    run(service_fn(move |event: Request| {
        let state = Arc::clone(&state);
        async move { http_handler::function_handler(event, state).await }
    }))
    .await
}
