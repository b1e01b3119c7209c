//! Submit demo circuits to a backend and collect their results.

use sift_hal::{Backend, ExecutionResult};
use sift_ir::Circuit;
use tracing::{info, instrument};

use crate::circuits::grover::{NUM_QUBITS, grover_circuit};
use crate::error::DemoResult;
use crate::report::SearchReport;

/// Shots taken when none are requested.
pub const DEFAULT_SHOTS: u32 = 1000;

/// Run `circuit` for `shots` and wait for the result.
///
/// Backend errors are returned unchanged.
#[instrument(skip(backend, circuit), fields(backend = backend.name(), circuit = circuit.name()))]
pub async fn run_circuit<B: Backend + ?Sized>(
    backend: &B,
    circuit: &Circuit,
    shots: u32,
) -> DemoResult<ExecutionResult> {
    let job_id = backend.submit(circuit, shots).await?;
    info!(%job_id, "submitted");

    let result = backend.wait(&job_id).await?;
    info!(
        outcomes = result.counts.len(),
        elapsed_ms = result.execution_time_ms,
        "job finished"
    );
    Ok(result)
}

/// Build the 3-qubit search with `iterations` rounds, run it and report.
pub async fn run_grover<B: Backend + ?Sized>(
    backend: &B,
    iterations: usize,
    shots: u32,
) -> DemoResult<SearchReport> {
    let circuit = grover_circuit(NUM_QUBITS, iterations)?;
    let result = run_circuit(backend, &circuit, shots).await?;
    Ok(SearchReport::new(iterations, &result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DemoError;
    use sift_adapter_sim::SimulatorBackend;
    use sift_hal::HalError;

    #[tokio::test]
    async fn test_run_grover_defaults() {
        let backend = SimulatorBackend::with_seed(7);
        let report = run_grover(&backend, 1, DEFAULT_SHOTS).await.unwrap();

        assert_eq!(report.shots, 1000);
        assert_eq!(report.counts.total_shots(), 1000);
        assert!(report.success_probability > 0.70);
    }

    #[tokio::test]
    async fn test_backend_errors_propagate() {
        let backend = SimulatorBackend::with_max_qubits(2);
        let err = run_grover(&backend, 1, 10).await.unwrap_err();
        assert!(matches!(err, DemoError::Hal(HalError::CircuitTooLarge(_))));

        let backend = SimulatorBackend::new();
        let err = run_grover(&backend, 1, 0).await.unwrap_err();
        assert!(matches!(err, DemoError::Hal(HalError::InvalidShots(_))));
    }
}
