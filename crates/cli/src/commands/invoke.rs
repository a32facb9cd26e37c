use maint_seed::{InvocationHandler, RdsDataBackend, RdsDataConfig, SeedRunner, SeederSettings};
use uuid::Uuid;

use super::load_batch;

/// Run a single invocation from the command line against the Data API.
pub async fn run(settings: SeederSettings) -> anyhow::Result<()> {
    let batch = load_batch(&settings).await?;
    let backend = RdsDataBackend::new(RdsDataConfig::from_settings(&settings)).await;
    let handler = InvocationHandler::new(SeedRunner::new(backend, batch));

    let response = handler.handle(&Uuid::new_v4().to_string()).await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    if !response.is_success() {
        anyhow::bail!("invocation finished with status {}", response.status_code);
    }
    Ok(())
}
