//! Run outcome types
//!
//! Defines what a run produces: one outcome per statement, the aggregate
//! summary derived from them, and the run state machine.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::batch::Phase;
use crate::error::{SeedError, SeedResult, StatementError};

/// Opaque success result returned by the data-access API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementResult {
    /// Rows inserted, updated, or deleted
    pub records_updated: i64,
    /// Rows returned by the statement
    pub rows_returned: usize,
}

impl StatementResult {
    pub fn updated(records_updated: i64) -> Self {
        Self {
            records_updated,
            rows_returned: 0,
        }
    }
}

/// Result of executing one statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    Success(StatementResult),
    Failure(StatementError),
}

impl ExecutionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionOutcome::Success(_))
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ExecutionOutcome::Failure(e) => Some(&e.message),
            ExecutionOutcome::Success(_) => None,
        }
    }
}

impl From<Result<StatementResult, StatementError>> for ExecutionOutcome {
    fn from(result: Result<StatementResult, StatementError>) -> Self {
        match result {
            Ok(r) => ExecutionOutcome::Success(r),
            Err(e) => ExecutionOutcome::Failure(e),
        }
    }
}

/// Outcome of a statement, tagged with where it sits in the batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementOutcome {
    /// 1-based position in the batch
    pub position: usize,
    pub name: String,
    pub phase: Phase,
    pub outcome: ExecutionOutcome,
}

/// Aggregate counts over a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub success_count: usize,
    pub error_count: usize,
    /// Message of the last failing statement. Earlier messages are not kept.
    pub last_error: Option<String>,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[StatementOutcome]) -> Self {
        outcomes.iter().fold(Self::default(), |mut summary, o| {
            summary.record(&o.outcome);
            summary
        })
    }

    pub fn record(&mut self, outcome: &ExecutionOutcome) {
        match outcome {
            ExecutionOutcome::Success(_) => self.success_count += 1,
            ExecutionOutcome::Failure(e) => {
                self.error_count += 1;
                self.last_error = Some(e.message.clone());
            }
        }
    }

    pub fn total(&self) -> usize {
        self.success_count + self.error_count
    }

    pub fn is_success(&self) -> bool {
        self.error_count == 0
    }
}

/// How a completed run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Completion {
    Success,
    PartialFailure,
}

/// Run lifecycle: `NotStarted -> Running -> Completed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "completion")]
pub enum RunState {
    NotStarted,
    Running,
    Completed(Completion),
}

impl RunState {
    pub fn start(self) -> SeedResult<Self> {
        match self {
            RunState::NotStarted => Ok(RunState::Running),
            other => Err(SeedError::State(format!("cannot start a run that is {:?}", other))),
        }
    }

    pub fn complete(self, summary: &BatchSummary) -> SeedResult<Self> {
        match self {
            RunState::Running if summary.is_success() => {
                Ok(RunState::Completed(Completion::Success))
            }
            RunState::Running => Ok(RunState::Completed(Completion::PartialFailure)),
            other => Err(SeedError::State(format!(
                "cannot complete a run that is {:?}",
                other
            ))),
        }
    }
}

/// Everything a finished run knows about itself
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub run_id: String,
    pub state: RunState,
    pub summary: BatchSummary,
    pub outcomes: Vec<StatementOutcome>,
    pub started_at: DateTime<Utc>,
    pub execution_time_ms: u128,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.state == RunState::Completed(Completion::Success)
    }

    /// Outcomes that failed, in batch order
    pub fn failures(&self) -> impl Iterator<Item = &StatementOutcome> {
        self.outcomes.iter().filter(|o| !o.outcome.is_success())
    }
}
