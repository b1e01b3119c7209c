//! Sift Hardware Abstraction Layer
//!
//! A common interface between circuits and whatever executes them:
//!
//! - the [`Backend`] trait for job submission and management
//! - [`Capabilities`] to describe what a backend accepts
//! - [`ExecutionResult`] and [`Counts`] for measurement outcomes
//!
//! # Example: Running a Circuit
//!
//! ```ignore
//! use sift_hal::Backend;
//! use sift_adapter_sim::SimulatorBackend;
//! use sift_ir::{Circuit, QubitId};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut circuit = Circuit::with_size("bell", 2, 0);
//!     circuit.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?.measure_all()?;
//!
//!     let backend = SimulatorBackend::with_seed(7);
//!     let job_id = backend.submit(&circuit, 1000).await?;
//!     let result = backend.wait(&job_id).await?;
//!
//!     if let Some((bitstring, count)) = result.counts.most_frequent() {
//!         println!("Most frequent: {bitstring} ({count} times)");
//!     }
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod capability;
pub mod error;
pub mod job;
pub mod result;

pub use backend::{
    Backend, BackendAvailability, BackendConfig, BackendFactory, MAX_POLLS, POLL_INTERVAL,
    ValidationResult,
};
pub use capability::{Capabilities, GateSet};
pub use error::{HalError, HalResult};
pub use job::{Job, JobId, JobStatus};
pub use result::{Counts, ExecutionResult};
