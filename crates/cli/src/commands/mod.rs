pub mod dry_run;
pub mod invoke;
pub mod lambda;
pub mod plan;

use std::sync::Arc;

use maint_seed::{SeedError, SeederSettings, StatementBatch};

/// Load the statement batch once per process
///
/// `MAINT_SEED_SQL_DIR` (or `--sql-dir`) selects a manifest directory;
/// otherwise the embedded CMMS batch is used.
pub async fn load_batch(settings: &SeederSettings) -> Result<Arc<StatementBatch>, SeedError> {
    let batch = match &settings.sql_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "Loading statement batch from directory");
            StatementBatch::load_dir(dir).await?
        }
        None => StatementBatch::cmms()?,
    };

    tracing::info!(statements = batch.len(), "Statement batch loaded");
    Ok(Arc::new(batch))
}
