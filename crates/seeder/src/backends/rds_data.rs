//! RDS Data API backend

use async_trait::async_trait;
use aws_sdk_rdsdata::error::SdkError;
use aws_sdk_rdsdata::operation::execute_statement::ExecuteStatementOutput;
use aws_sdk_rdsdata::Client;
use aws_smithy_types::error::display::DisplayErrorContext;
use aws_smithy_types::error::metadata::ProvideErrorMetadata;
use std::fmt;

use super::{DataApiBackend, ExecuteStatementRequest};
use crate::config::SeederSettings;
use crate::error::StatementError;
use crate::outcome::StatementResult;

/// RDS Data API client configuration
#[derive(Debug, Clone, Default)]
pub struct RdsDataConfig {
    /// Custom endpoint (local emulators)
    pub endpoint: Option<String>,
}

impl RdsDataConfig {
    pub fn from_settings(settings: &SeederSettings) -> Self {
        Self {
            endpoint: settings.data_api_endpoint.clone(),
        }
    }
}

/// Executes statements through the RDS Data API
#[derive(Debug, Clone)]
pub struct RdsDataBackend {
    client: Client,
}

impl RdsDataBackend {
    /// Build a client from the default credential chain (IAM role, environment, profile)
    pub async fn new(config: RdsDataConfig) -> Self {
        let mut loader = aws_config::from_env();
        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        Self::from_client(Client::new(&sdk_config))
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Convert an SDK error into the message recorded for the statement.
    ///
    /// Service errors carry the database's own message. Timeouts, dispatch
    /// and credential failures keep their whole source chain.
    fn convert_error<E, R>(error: SdkError<E, R>) -> StatementError
    where
        E: ProvideErrorMetadata + std::error::Error + 'static,
        R: fmt::Debug + 'static,
    {
        match error {
            SdkError::ServiceError(context) => {
                let err = context.err();
                let message = err
                    .message()
                    .or_else(|| err.code())
                    .map(str::to_string)
                    .unwrap_or_else(|| err.to_string());
                StatementError::new(message)
            }
            other => StatementError::new(DisplayErrorContext(other).to_string()),
        }
    }

    fn statement_result(output: &ExecuteStatementOutput) -> StatementResult {
        StatementResult {
            records_updated: output.number_of_records_updated(),
            rows_returned: output.records().map(|rows| rows.len()).unwrap_or(0),
        }
    }
}

#[async_trait]
impl DataApiBackend for RdsDataBackend {
    async fn execute_statement(
        &self,
        request: &ExecuteStatementRequest<'_>,
    ) -> Result<StatementResult, StatementError> {
        let output = self
            .client
            .execute_statement()
            .resource_arn(request.resource_arn)
            .secret_arn(request.secret_arn)
            .database(request.database)
            .sql(request.sql)
            .send()
            .await
            .map_err(Self::convert_error)?;

        Ok(Self::statement_result(&output))
    }

    fn name(&self) -> &'static str {
        "rds-data"
    }
}
