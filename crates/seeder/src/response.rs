//! Invocation response
//!
//! Shaped like an API Gateway proxy response: an HTTP-style status code
//! and a JSON body encoded as a string.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::batch::Phase;
use crate::error::SeedError;
use crate::outcome::{BatchReport, ExecutionOutcome};

pub const STATUS_OK: u16 = 200;
pub const STATUS_ERROR: u16 = 500;

pub const SUCCESS_MESSAGE: &str = "All SQL commands executed successfully";
pub const PARTIAL_FAILURE_MESSAGE: &str = "Some SQL commands failed to execute";
pub const FATAL_MESSAGE: &str = "Lambda execution failed";

/// Structured response returned to the invoker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedResponse {
    pub status_code: u16,
    pub body: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RunBody<'a> {
    message: &'static str,
    run_id: &'a str,
    success_count: usize,
    error_count: usize,
    last_error: Option<&'a str>,
    started_at: String,
    execution_time_ms: u64,
    results: Vec<StatementEntry<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatementEntry<'a> {
    position: usize,
    name: &'a str,
    phase: Phase,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    records_updated: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rows_returned: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

#[derive(Serialize)]
struct FatalBody<'a> {
    message: &'static str,
    error: &'a str,
}

impl SeedResponse {
    /// Response for a run that reached the end of the batch
    pub fn from_report(report: &BatchReport) -> Self {
        let summary = &report.summary;
        let (status_code, message) = if report.is_success() {
            (STATUS_OK, SUCCESS_MESSAGE)
        } else {
            (STATUS_ERROR, PARTIAL_FAILURE_MESSAGE)
        };

        let results = report
            .outcomes
            .iter()
            .map(|o| match &o.outcome {
                ExecutionOutcome::Success(result) => StatementEntry {
                    position: o.position,
                    name: &o.name,
                    phase: o.phase,
                    status: "success",
                    records_updated: Some(result.records_updated),
                    rows_returned: Some(result.rows_returned),
                    error: None,
                },
                ExecutionOutcome::Failure(error) => StatementEntry {
                    position: o.position,
                    name: &o.name,
                    phase: o.phase,
                    status: "error",
                    records_updated: None,
                    rows_returned: None,
                    error: Some(&error.message),
                },
            })
            .collect();

        let body = RunBody {
            message,
            run_id: &report.run_id,
            success_count: summary.success_count,
            error_count: summary.error_count,
            last_error: summary.last_error.as_deref(),
            started_at: report.started_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            execution_time_ms: report.execution_time_ms as u64,
            results,
        };

        Self {
            status_code,
            body: encode(&body),
        }
    }

    /// Response for an invocation that could not run the batch
    pub fn fatal(error: &SeedError) -> Self {
        let error = error.to_string();
        Self {
            status_code: STATUS_ERROR,
            body: encode(&FatalBody {
                message: FATAL_MESSAGE,
                error: &error,
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == STATUS_OK
    }

    /// Decode the body for inspection
    pub fn body_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_str(&self.body)
    }
}

fn encode<T: Serialize>(body: &T) -> String {
    serde_json::to_string(body).unwrap_or_else(|e| {
        json!({ "message": FATAL_MESSAGE, "error": e.to_string() }).to_string()
    })
}
