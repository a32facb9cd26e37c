use std::sync::Arc;

use maint_seed::{
    ConnectionCoordinates, ExecutionOutcome, MemoryBackend, SeedRunner, SeederSettings,
};
use uuid::Uuid;

use super::load_batch;

const PLACEHOLDER_CLUSTER_ARN: &str = "arn:aws:rds:local:000000000000:cluster:dry-run";
const PLACEHOLDER_SECRET_ARN: &str = "arn:aws:secretsmanager:local:000000000000:secret:dry-run";
const PLACEHOLDER_DATABASE: &str = "dry_run";

/// Execute the batch against an in-memory database.
///
/// Coordinates come from the environment when set, placeholders otherwise.
/// With `repeat > 1` every pass reuses the same database, which shows
/// whether the batch survives a rerun.
pub async fn run(settings: SeederSettings, repeat: u32) -> anyhow::Result<()> {
    let batch = load_batch(&settings).await?;
    let backend = Arc::new(MemoryBackend::new());
    let runner = SeedRunner::new(Arc::clone(&backend), batch);
    let coordinates = ConnectionCoordinates::from_env().unwrap_or_else(|_| {
        ConnectionCoordinates::new(
            PLACEHOLDER_CLUSTER_ARN,
            PLACEHOLDER_SECRET_ARN,
            PLACEHOLDER_DATABASE,
        )
    });

    let mut failed_passes = 0;
    for pass in 1..=repeat.max(1) {
        let report = runner
            .run_with_id(&coordinates, Uuid::new_v4().to_string())
            .await?;

        println!(
            "Pass {}: {} succeeded, {} failed ({} ms)",
            pass,
            report.summary.success_count,
            report.summary.error_count,
            report.execution_time_ms
        );
        for outcome in report.failures() {
            if let ExecutionOutcome::Failure(error) = &outcome.outcome {
                println!("  {:>3}. {}: {}", outcome.position, outcome.name, error);
            }
        }

        if !report.is_success() {
            failed_passes += 1;
        }
    }

    println!("\nTables: {}", backend.table_names().await.join(", "));
    if failed_passes > 0 {
        anyhow::bail!("{} of {} passes had failing statements", failed_passes, repeat.max(1));
    }
    Ok(())
}
