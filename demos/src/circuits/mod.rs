//! Quantum circuit generators for demos.

pub mod grover;

pub use grover::{
    NUM_QUBITS, TARGET, apply_diffuser, apply_oracle, grover_circuit, grover_state_circuit,
    optimal_iterations,
};
