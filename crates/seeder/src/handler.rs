//! Invocation handling
//!
//! Every invocation ends in a [`SeedResponse`]: configuration problems,
//! initialization failures, and run-level errors are all turned into the
//! fatal response rather than propagated to the caller.

use std::env;

use crate::backends::DataApiBackend;
use crate::config::ConnectionCoordinates;
use crate::error::SeedError;
use crate::response::SeedResponse;
use crate::runner::SeedRunner;

/// Owns the result of process initialization and answers invocations
pub struct InvocationHandler<B> {
    runner: Result<SeedRunner<B>, SeedError>,
}

impl<B: DataApiBackend> InvocationHandler<B> {
    pub fn new(runner: SeedRunner<B>) -> Self {
        Self { runner: Ok(runner) }
    }

    /// A handler whose initialization failed; every invocation reports `error`
    pub fn failed(error: SeedError) -> Self {
        Self { runner: Err(error) }
    }

    pub fn runner(&self) -> Option<&SeedRunner<B>> {
        self.runner.as_ref().ok()
    }

    /// Handle an invocation using the process environment
    pub async fn handle(&self, run_id: &str) -> SeedResponse {
        self.handle_with(|key| env::var(key).ok(), run_id).await
    }

    /// Handle an invocation, resolving coordinates through `lookup`
    pub async fn handle_with<F>(&self, lookup: F, run_id: &str) -> SeedResponse
    where
        F: Fn(&str) -> Option<String>,
    {
        let coordinates = match ConnectionCoordinates::from_lookup(lookup) {
            Ok(coordinates) => coordinates,
            Err(e) => {
                let error = SeedError::from(e);
                tracing::error!(run_id, error = %error, "Lambda execution error");
                return SeedResponse::fatal(&error);
            }
        };

        let runner = match &self.runner {
            Ok(runner) => runner,
            Err(error) => {
                tracing::error!(run_id, error = %error, "Lambda execution error");
                return SeedResponse::fatal(error);
            }
        };

        match runner.run_with_id(&coordinates, run_id).await {
            Ok(report) => SeedResponse::from_report(&report),
            Err(error) => {
                tracing::error!(run_id, error = %error, "Lambda execution error");
                SeedResponse::fatal(&error)
            }
        }
    }
}
