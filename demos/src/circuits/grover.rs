//! Grover's search algorithm circuit generator.
//!
//! Grover's algorithm finds a marked item in an unstructured database
//! with O(sqrt(N)) queries, compared to O(N) classically. The oracle here
//! marks the all-ones state of a 3-qubit register.

use sift_ir::Circuit;
use sift_ir::qubit::QubitId;
use std::f64::consts::PI;

use crate::error::{DemoError, DemoResult};

/// Register width the oracle is defined for.
pub const NUM_QUBITS: usize = 3;

/// Bit-string the oracle marks.
pub const TARGET: &str = "111";

/// Generate a Grover search circuit.
///
/// # Arguments
/// * `n_qubits` - Number of qubits; only [`NUM_QUBITS`] is supported
/// * `iterations` - Number of oracle + diffuser rounds (0 measures the
///   uniform superposition)
///
/// # Returns
/// The circuit with a barrier and then a measurement of every qubit into
/// its own clbit.
pub fn grover_circuit(n_qubits: usize, iterations: usize) -> DemoResult<Circuit> {
    let mut circuit = grover_state_circuit(n_qubits, iterations)?;
    circuit.barrier_all()?.measure_all()?;
    Ok(circuit)
}

/// Generate the Grover circuit without measurements.
///
/// Running it through a statevector exposes the amplified amplitudes.
pub fn grover_state_circuit(n_qubits: usize, iterations: usize) -> DemoResult<Circuit> {
    if n_qubits != NUM_QUBITS {
        return Err(DemoError::UnsupportedWidth {
            requested: n_qubits,
            supported: NUM_QUBITS,
        });
    }

    let register = [QubitId(0), QubitId(1), QubitId(2)];
    let mut circuit = Circuit::with_size("grover", NUM_QUBITS as u32, NUM_QUBITS as u32);

    // Uniform superposition
    for &q in &register {
        circuit.h(q)?;
    }

    for _ in 0..iterations {
        apply_oracle(&mut circuit, register)?;
        apply_diffuser(&mut circuit, register)?;
    }

    Ok(circuit)
}

/// Calculate the optimal number of Grover iterations.
///
/// For a single marked item in a space of size N = 2^n,
/// the optimal number of iterations is approximately π/4 * sqrt(N).
pub fn optimal_iterations(n_qubits: usize) -> usize {
    let n = 1 << n_qubits;
    let optimal = (PI / 4.0 * (n as f64).sqrt()).round() as usize;
    optimal.max(1)
}

/// Flip the phase of |111⟩ on `register`.
///
/// Every other basis state is left unchanged.
pub fn apply_oracle(circuit: &mut Circuit, register: [QubitId; 3]) -> DemoResult<()> {
    apply_ccz(circuit, register)
}

/// Apply the diffusion operator (2|s⟩⟨s| - I), up to a global phase.
///
/// H and X on every qubit, the |111⟩ phase flip, then X and H again.
pub fn apply_diffuser(circuit: &mut Circuit, register: [QubitId; 3]) -> DemoResult<()> {
    for &q in &register {
        circuit.h(q)?.x(q)?;
    }

    apply_ccz(circuit, register)?;

    for &q in &register {
        circuit.x(q)?.h(q)?;
    }
    Ok(())
}

/// CCZ = H[target] · CCX · H[target]
fn apply_ccz(circuit: &mut Circuit, [c1, c2, target]: [QubitId; 3]) -> DemoResult<()> {
    circuit.h(target)?.ccx(c1, c2, target)?.h(target)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimal_iterations() {
        assert_eq!(optimal_iterations(2), 2); // N=4, π/4*2 ≈ 1.57 → 2
        assert_eq!(optimal_iterations(3), 2); // N=8, π/4*2.83 ≈ 2.22 → 2
        assert_eq!(optimal_iterations(4), 3); // N=16, π/4*4 ≈ 3.14 → 3
    }

    #[test]
    fn test_grover_circuit_creation() {
        let circuit = grover_circuit(3, 1).unwrap();
        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(circuit.num_clbits(), 3);
        assert!(circuit.has_measurements());
        assert_eq!(circuit.measurements().count(), 3);

        let tail: Vec<_> = circuit.instructions().iter().rev().take(2).collect();
        assert!(tail[0].is_measure());
        assert!(tail[1].is_barrier());
    }

    #[test]
    fn test_gate_counts_per_iteration() {
        let ops = grover_state_circuit(3, 1).unwrap().count_ops();
        // 3 prep + 2 oracle + 6 + 2 diffuser
        assert_eq!(ops["h"], 13);
        assert_eq!(ops["x"], 6);
        assert_eq!(ops["ccx"], 2);

        let ops = grover_state_circuit(3, 2).unwrap().count_ops();
        assert_eq!(ops["ccx"], 4);
    }

    #[test]
    fn test_zero_iterations_is_superposition() {
        let circuit = grover_state_circuit(3, 0).unwrap();
        assert_eq!(circuit.num_ops(), 3);
        assert!(!circuit.has_measurements());
    }

    #[test]
    fn test_unsupported_width() {
        for n in [0, 2, 4] {
            assert!(matches!(
                grover_circuit(n, 1),
                Err(DemoError::UnsupportedWidth { requested, supported: 3 }) if requested == n
            ));
        }
    }

    #[test]
    fn test_oracle_on_permuted_register() {
        let mut circuit = Circuit::with_size("oracle", 3, 0);
        apply_oracle(&mut circuit, [QubitId(2), QubitId(0), QubitId(1)]).unwrap();

        let ccx = circuit
            .instructions()
            .iter()
            .find(|inst| inst.name() == "ccx")
            .unwrap();
        assert_eq!(ccx.qubits, vec![QubitId(2), QubitId(0), QubitId(1)]);
    }
}
