//! # maint-seed
//!
//! Seeds the CMMS maintenance database by running a fixed, ordered batch of
//! SQL statements through the RDS Data API.
//!
//! - **Ordered phases**: schema creation, deletion of existing rows, seed inserts
//! - **Best-effort batches**: a failing statement is recorded and the run continues
//! - **Pluggable backends**: RDS Data API for Aurora, in-memory for dry runs and tests
//! - **Structured responses**: HTTP-style status code plus a JSON body
//!
//! ## Quick Start
//!
//! ```rust
//! use maint_seed::{ConnectionCoordinates, MemoryBackend, SeedRunner, StatementBatch};
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let batch = Arc::new(StatementBatch::cmms().unwrap());
//! let runner = SeedRunner::new(MemoryBackend::new(), batch);
//!
//! let coords = ConnectionCoordinates::new("arn:cluster", "arn:secret", "postgres");
//! let report = runner.run(&coords).await.unwrap();
//! assert_eq!(report.summary.success_count, 28);
//! # });
//! ```

pub mod backends;
pub mod batch;
pub mod config;
pub mod error;
pub mod handler;
pub mod logging;
pub mod outcome;
pub mod response;
pub mod runner;

pub use backends::*;
pub use batch::{Phase, Statement, StatementBatch};
pub use config::*;
pub use error::*;
pub use handler::*;
pub use logging::*;
pub use outcome::*;
pub use response::*;
pub use runner::*;
