//! Sift Demo Suite
//!
//! Grover's search over a 3-qubit register, run on the local statevector
//! backend:
//!
//! - [`circuits::grover`]: oracle, diffuser and the search circuit
//! - [`runner`]: submit a circuit and wait for its counts
//! - [`report`]: success probability and output formatting
//! - [`cli`]: the `demo-grover` command line
//!
//! ```ignore
//! use sift_adapter_sim::SimulatorBackend;
//! use sift_demos::runner::{DEFAULT_SHOTS, run_grover};
//!
//! let backend = SimulatorBackend::with_seed(42);
//! let report = run_grover(&backend, 1, DEFAULT_SHOTS).await?;
//! println!("{report}");
//! ```

pub mod circuits;
pub mod cli;
pub mod error;
pub mod report;
pub mod runner;

pub use error::{DemoError, DemoResult};
pub use report::SearchReport;

