//! Data-access API backends
//!
//! The runner only ever sees [`DataApiBackend`]. The RDS Data API backend
//! talks to Aurora; the memory backend stands in for it in dry runs and
//! tests.

use async_trait::async_trait;
use serde::Serialize;

use crate::config::ConnectionCoordinates;
use crate::error::StatementError;
use crate::outcome::StatementResult;

pub mod memory;

#[cfg(feature = "rds-data")]
pub mod rds_data;

pub use memory::*;

#[cfg(feature = "rds-data")]
pub use rds_data::*;

/// One "execute statement" request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteStatementRequest<'a> {
    pub resource_arn: &'a str,
    pub secret_arn: &'a str,
    pub database: &'a str,
    pub sql: &'a str,
}

impl<'a> ExecuteStatementRequest<'a> {
    pub fn new(coordinates: &'a ConnectionCoordinates, sql: &'a str) -> Self {
        Self {
            resource_arn: &coordinates.cluster_arn,
            secret_arn: &coordinates.secret_arn,
            database: &coordinates.database,
            sql,
        }
    }
}

/// Stateless request/response access to a remote relational database
#[async_trait]
pub trait DataApiBackend: Send + Sync {
    /// Execute a single SQL statement
    async fn execute_statement(
        &self,
        request: &ExecuteStatementRequest<'_>,
    ) -> Result<StatementResult, StatementError>;

    /// Short backend name for logs
    fn name(&self) -> &'static str;
}

#[async_trait]
impl<B: DataApiBackend + ?Sized> DataApiBackend for std::sync::Arc<B> {
    async fn execute_statement(
        &self,
        request: &ExecuteStatementRequest<'_>,
    ) -> Result<StatementResult, StatementError> {
        (**self).execute_statement(request).await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
