//! Sift Local Statevector Simulator
//!
//! A local backend that evolves a circuit's full statevector and samples
//! measurement outcomes from it. Exact up to sampling noise, and limited to
//! roughly 20 qubits by memory.
//!
//! # Features
//!
//! - **All Standard Gates**: every gate in `sift-ir`
//! - **Measurement Sampling**: terminal measurements drawn per shot
//! - **Reproducible Runs**: a fixed seed yields identical counts
//! - **State Inspection**: [`SimulatorBackend::statevector`] returns the
//!   pre-measurement amplitudes
//!
//! # Memory
//!
//! | Qubits | Memory |
//! |--------|--------|
//! | 10 | ~16 KB |
//! | 15 | ~512 KB |
//! | 20 | ~16 MB |
//!
//! # Example
//!
//! ```ignore
//! use sift_adapter_sim::SimulatorBackend;
//! use sift_hal::Backend;
//! use sift_ir::{Circuit, QubitId};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = SimulatorBackend::with_seed(42);
//!
//!     let mut circuit = Circuit::with_size("bell", 2, 0);
//!     circuit.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?.measure_all()?;
//!
//!     let job_id = backend.submit(&circuit, 1000).await?;
//!     let result = backend.wait(&job_id).await?;
//!
//!     // Expect ~50% |00⟩ and ~50% |11⟩
//!     println!("Results: {}", result.counts);
//!
//!     Ok(())
//! }
//! ```

mod simulator;
mod statevector;

pub use simulator::{MAX_SUPPORTED_QUBITS, SimulatorBackend};
pub use statevector::{Sampler, Statevector};
