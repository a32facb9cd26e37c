//! Seed Runner - Executes a statement batch against the database
//!
//! Statements run strictly one after another. A failing statement is
//! recorded and the run moves on to the next one; nothing is retried and
//! nothing is wrapped in a transaction.

use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::backends::{DataApiBackend, ExecuteStatementRequest};
use crate::batch::StatementBatch;
use crate::config::ConnectionCoordinates;
use crate::error::SeedResult;
use crate::outcome::{BatchReport, BatchSummary, ExecutionOutcome, RunState, StatementOutcome};

/// Runs a fixed batch through a data-access backend
pub struct SeedRunner<B> {
    backend: B,
    batch: Arc<StatementBatch>,
}

impl<B: DataApiBackend> SeedRunner<B> {
    /// Create a new runner
    pub fn new(backend: B, batch: Arc<StatementBatch>) -> Self {
        Self { backend, batch }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run the whole batch under a fresh run id
    pub async fn run(&self, coordinates: &ConnectionCoordinates) -> SeedResult<BatchReport> {
        self.run_with_id(coordinates, Uuid::new_v4().to_string()).await
    }

    /// Run the whole batch.
    ///
    /// Statement failures end up in the report. An `Err` here means the run
    /// itself is broken, not that a statement failed.
    pub async fn run_with_id(
        &self,
        coordinates: &ConnectionCoordinates,
        run_id: impl Into<String>,
    ) -> SeedResult<BatchReport> {
        let run_id = run_id.into();
        let started_at = Utc::now();
        let start_time = Instant::now();

        let mut state = RunState::NotStarted.start()?;
        tracing::info!(
            run_id = %run_id,
            backend = self.backend.name(),
            database = %coordinates.database,
            statements = self.batch.len(),
            "Starting seed run"
        );

        let mut summary = BatchSummary::default();
        let mut outcomes = Vec::with_capacity(self.batch.len());

        for (index, statement) in self.batch.iter().enumerate() {
            let position = index + 1;
            tracing::info!(
                run_id = %run_id,
                position,
                statement = %statement.name,
                phase = %statement.phase,
                "Executing SQL command"
            );
            tracing::debug!(run_id = %run_id, sql = %statement.sql, "SQL text");

            let request = ExecuteStatementRequest::new(coordinates, &statement.sql);
            let outcome: ExecutionOutcome = self.backend.execute_statement(&request).await.into();

            match &outcome {
                ExecutionOutcome::Success(result) => tracing::debug!(
                    run_id = %run_id,
                    position,
                    records_updated = result.records_updated,
                    "SQL command succeeded"
                ),
                ExecutionOutcome::Failure(error) => tracing::error!(
                    run_id = %run_id,
                    position,
                    statement = %statement.name,
                    error = %error,
                    "Error executing SQL command"
                ),
            }

            summary.record(&outcome);
            outcomes.push(StatementOutcome {
                position,
                name: statement.name.clone(),
                phase: statement.phase,
                outcome,
            });
        }

        state = state.complete(&summary)?;
        let execution_time_ms = start_time.elapsed().as_millis();

        if summary.is_success() {
            tracing::info!(
                run_id = %run_id,
                success_count = summary.success_count,
                execution_time_ms = execution_time_ms as u64,
                "Seed run completed"
            );
        } else {
            tracing::warn!(
                run_id = %run_id,
                success_count = summary.success_count,
                error_count = summary.error_count,
                last_error = summary.last_error.as_deref().unwrap_or_default(),
                execution_time_ms = execution_time_ms as u64,
                "Seed run completed with errors"
            );
        }

        Ok(BatchReport {
            run_id,
            state,
            summary,
            outcomes,
            started_at,
            execution_time_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::MemoryBackend;
    use crate::batch::Statement;
    use crate::outcome::Completion;

    fn coords() -> ConnectionCoordinates {
        ConnectionCoordinates::new("arn:cluster", "arn:secret", "cmms")
    }

    fn small_batch() -> Arc<StatementBatch> {
        let statements = vec![
            Statement::parse("createSites.sql", "CREATE TABLE sites (siteid INT PRIMARY KEY);")
                .unwrap(),
            Statement::parse("deleteSites.sql", "DELETE FROM sites;").unwrap(),
            Statement::parse("insertSites.sql", "INSERT INTO sites (siteid) VALUES (1), (2);")
                .unwrap(),
        ];
        Arc::new(StatementBatch::new(statements))
    }

    #[tokio::test]
    async fn test_run_reports_every_statement() {
        let runner = SeedRunner::new(MemoryBackend::new(), small_batch());
        let report = runner.run_with_id(&coords(), "run-1").await.unwrap();

        assert_eq!(report.run_id, "run-1");
        assert_eq!(report.state, RunState::Completed(Completion::Success));
        assert_eq!(report.summary.success_count, 3);
        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.outcomes[2].position, 3);
        assert_eq!(
            report.outcomes[2].outcome,
            ExecutionOutcome::Success(crate::outcome::StatementResult::updated(2))
        );
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_the_batch() {
        let backend = MemoryBackend::new().fail_on_call(2, "permission denied for table sites");
        let runner = SeedRunner::new(backend, small_batch());
        let report = runner.run(&coords()).await.unwrap();

        assert_eq!(report.state, RunState::Completed(Completion::PartialFailure));
        assert_eq!(report.summary.success_count, 2);
        assert_eq!(report.summary.error_count, 1);
        assert_eq!(
            report.summary.last_error.as_deref(),
            Some("permission denied for table sites")
        );
        assert_eq!(runner.backend().executed().await.len(), 3);
        assert_eq!(report.failures().map(|o| o.position).collect::<Vec<_>>(), vec![2]);
    }
}
