use std::sync::Arc;

use lambda_runtime::{service_fn, LambdaEvent};
use maint_seed::{
    InvocationHandler, RdsDataBackend, RdsDataConfig, SeedResponse, SeedRunner, SeederSettings,
};
use serde_json::Value;

use super::load_batch;

/// Serve Lambda invocations until the runtime shuts the process down.
///
/// The batch and the Data API client are built once. A batch that fails to
/// load does not stop the runtime; each invocation reports it instead.
pub async fn run(settings: SeederSettings) -> anyhow::Result<()> {
    let handler = match load_batch(&settings).await {
        Ok(batch) => {
            let backend = RdsDataBackend::new(RdsDataConfig::from_settings(&settings)).await;
            InvocationHandler::new(SeedRunner::new(backend, batch))
        }
        Err(error) => {
            tracing::error!(error = %error, "Failed to load statement batch");
            InvocationHandler::failed(error)
        }
    };
    let handler = Arc::new(handler);

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let handler = Arc::clone(&handler);
        async move { handle(&handler, event).await }
    }))
    .await
    .map_err(|e| anyhow::anyhow!(e))
}

async fn handle(
    handler: &InvocationHandler<RdsDataBackend>,
    event: LambdaEvent<Value>,
) -> Result<SeedResponse, lambda_runtime::Error> {
    let request_id = event.context.request_id;
    tracing::debug!(request_id = %request_id, "Received invocation");

    Ok(handler.handle(&request_id).await)
}
