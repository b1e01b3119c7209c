//! Backend capability descriptions.

use serde::{Deserialize, Serialize};
use sift_ir::Circuit;

/// What a backend can execute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Name of the backend.
    pub name: String,
    /// Number of qubits available.
    pub num_qubits: u32,
    /// Supported gate set (OpenQASM 3 naming convention).
    pub gate_set: GateSet,
    /// Maximum number of shots per job.
    pub max_shots: u32,
    /// Whether this is a simulator (`true`) or real hardware (`false`).
    pub is_simulator: bool,
}

impl Capabilities {
    /// Create capabilities for a simulator.
    pub fn simulator(num_qubits: u32) -> Self {
        Self {
            name: "simulator".into(),
            num_qubits,
            gate_set: GateSet::standard(),
            max_shots: 100_000,
            is_simulator: true,
        }
    }

    /// Reasons `circuit` cannot run here; empty when it can.
    pub fn violations(&self, circuit: &Circuit) -> Vec<String> {
        let mut reasons = vec![];
        if circuit.num_qubits() > self.num_qubits as usize {
            reasons.push(format!(
                "circuit has {} qubits but {} supports {}",
                circuit.num_qubits(),
                self.name,
                self.num_qubits
            ));
        }
        for inst in circuit.instructions() {
            if let Some(gate) = inst.as_gate() {
                if !self.gate_set.contains(gate.name()) {
                    reasons.push(format!("unsupported gate '{}'", gate.name()));
                }
            }
        }
        reasons
    }
}

/// Gates a backend accepts, grouped by arity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSet {
    /// Single-qubit gates supported.
    pub single_qubit: Vec<String>,
    /// Two-qubit gates supported.
    pub two_qubit: Vec<String>,
    /// Three-qubit gates supported.
    pub three_qubit: Vec<String>,
}

impl GateSet {
    /// Every gate in the Sift IR.
    pub fn standard() -> Self {
        let names =
            |list: &[&str]| -> Vec<String> { list.iter().map(|s| (*s).to_string()).collect() };
        Self {
            single_qubit: names(&[
                "id", "x", "y", "z", "h", "s", "sdg", "t", "tdg", "rx", "ry", "rz", "p",
            ]),
            two_qubit: names(&["cx", "cz", "swap"]),
            three_qubit: names(&["ccx"]),
        }
    }

    /// Check whether a gate is supported.
    pub fn contains(&self, gate: &str) -> bool {
        self.single_qubit
            .iter()
            .chain(&self.two_qubit)
            .chain(&self.three_qubit)
            .any(|g| g == gate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_ir::{QubitId, StandardGate};

    #[test]
    fn test_simulator_capabilities() {
        let caps = Capabilities::simulator(20);
        assert!(caps.is_simulator);
        assert_eq!(caps.num_qubits, 20);
        assert_eq!(caps.max_shots, 100_000);
    }

    #[test]
    fn test_standard_gate_set_covers_ir() {
        let set = GateSet::standard();
        for name in StandardGate::all_names() {
            assert!(set.contains(name), "missing {name}");
        }
        assert!(!set.contains("cswap"));
    }

    #[test]
    fn test_violations() {
        let caps = Capabilities::simulator(2);
        let mut circuit = Circuit::with_size("wide", 3, 0);
        circuit.ccx(QubitId(0), QubitId(1), QubitId(2)).unwrap();

        let reasons = caps.violations(&circuit);
        assert_eq!(reasons.len(), 1);
        assert!(reasons[0].contains("3 qubits"));

        let narrow = Circuit::with_size("narrow", 2, 0);
        assert!(caps.violations(&narrow).is_empty());
    }
}
