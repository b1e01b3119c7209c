//! High-level circuit builder API.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{ClbitId, QubitId};

/// A quantum circuit.
///
/// Instructions are kept in application order. Every instruction is
/// validated against the circuit's qubits and classical bits when it is
/// appended, so a built circuit is always well formed. Deserialization
/// replays the instructions through the same checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCircuit")]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Number of qubits; ids are `0..num_qubits`.
    num_qubits: u32,
    /// Number of classical bits; ids are `0..num_clbits`.
    num_clbits: u32,
    /// Instructions in application order.
    instructions: Vec<Instruction>,
}

/// Unchecked wire form of a [`Circuit`].
#[derive(Deserialize)]
struct RawCircuit {
    name: String,
    num_qubits: u32,
    num_clbits: u32,
    instructions: Vec<Instruction>,
}

impl TryFrom<RawCircuit> for Circuit {
    type Error = IrError;

    fn try_from(raw: RawCircuit) -> IrResult<Self> {
        let mut circuit = Circuit::with_size(raw.name, raw.num_qubits, raw.num_clbits);
        for instruction in raw.instructions {
            circuit.apply(instruction)?;
        }
        Ok(circuit)
    }
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            num_qubits: 0,
            num_clbits: 0,
            instructions: vec![],
        }
    }

    /// Create a circuit with a given number of qubits and classical bits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        Self {
            num_qubits,
            num_clbits,
            ..Self::new(name)
        }
    }

    /// Add a single classical bit to the circuit.
    pub fn add_clbit(&mut self) -> ClbitId {
        let id = ClbitId(self.num_clbits);
        self.num_clbits += 1;
        id
    }

    /// Append an instruction after validating its operands.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        let gate_name = instruction.as_gate().map(|g| g.name().to_string());

        if let InstructionKind::Gate(gate) = &instruction.kind {
            let expected = gate.num_qubits();
            let got = instruction.qubits.len() as u32;
            if expected != got {
                return Err(IrError::QubitCountMismatch {
                    gate_name: gate.name().to_string(),
                    expected,
                    got,
                });
            }
        }

        for &qubit in &instruction.qubits {
            if qubit.0 >= self.num_qubits {
                return Err(IrError::QubitNotFound {
                    qubit,
                    gate_name: gate_name.clone(),
                });
            }
        }

        for &clbit in &instruction.clbits {
            if clbit.0 >= self.num_clbits {
                return Err(IrError::ClbitNotFound {
                    clbit,
                    gate_name: gate_name.clone(),
                });
            }
        }

        let mut seen = FxHashSet::default();
        for &qubit in &instruction.qubits {
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit { qubit, gate_name });
            }
        }

        self.instructions.push(instruction);
        Ok(self)
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply identity gate.
    pub fn id(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::I, qubit))
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::H, qubit))
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::X, qubit))
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Y, qubit))
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Z, qubit))
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::S, qubit))
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Sdg, qubit))
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::T, qubit))
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Tdg, qubit))
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Rx(theta), qubit))
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Ry(theta), qubit))
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Rz(theta), qubit))
    }

    /// Apply phase gate.
    pub fn p(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::P(theta), qubit))
    }

    // =========================================================================
    // Multi-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::CX, control, target))
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::CZ, control, target))
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::Swap, q1, q2))
    }

    /// Apply Toffoli (CCX) gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(StandardGate::CCX, [c1, c2, target]))
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Measure a qubit to a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.apply(Instruction::measure(qubit, clbit))
    }

    /// Measure all qubits to corresponding classical bits.
    ///
    /// Classical bits are added until there is one per qubit.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        while self.num_clbits < self.num_qubits {
            self.add_clbit();
        }

        let qubits = self.qubit_ids();
        let clbits = (0..self.num_qubits).map(ClbitId);
        self.apply(Instruction::measure_all(qubits, clbits)?)
    }

    /// Apply a barrier to all qubits.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        self.apply(Instruction::barrier(self.qubit_ids()))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits as usize
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.num_clbits as usize
    }

    /// Ids of every qubit, in index order.
    pub fn qubit_ids(&self) -> impl Iterator<Item = QubitId> + use<> {
        (0..self.num_qubits).map(QubitId)
    }

    /// Instructions in application order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of instructions, barriers excluded.
    pub fn num_ops(&self) -> usize {
        self.instructions.iter().filter(|i| !i.is_barrier()).count()
    }

    /// Check whether any qubit is measured.
    pub fn has_measurements(&self) -> bool {
        self.instructions.iter().any(Instruction::is_measure)
    }

    /// Qubit → classical bit pairs of every measurement, in order.
    ///
    /// A later measurement into the same classical bit overwrites an
    /// earlier one, so callers should apply the pairs in sequence.
    pub fn measurements(&self) -> impl Iterator<Item = (QubitId, ClbitId)> + '_ {
        self.instructions
            .iter()
            .filter(|i| i.is_measure())
            .flat_map(|i| i.qubits.iter().copied().zip(i.clbits.iter().copied()))
    }

    /// Get the circuit depth.
    ///
    /// Each instruction occupies one layer on every wire it touches and
    /// starts after the latest layer among those wires. Barriers do not
    /// add a layer.
    pub fn depth(&self) -> usize {
        let mut qubit_depth = vec![0usize; self.num_qubits()];
        let mut clbit_depth = vec![0usize; self.num_clbits()];
        let mut max_depth = 0;

        for inst in self.instructions.iter().filter(|i| !i.is_barrier()) {
            let start = inst
                .qubits
                .iter()
                .map(|q| qubit_depth[q.index()])
                .chain(inst.clbits.iter().map(|c| clbit_depth[c.index()]))
                .max()
                .unwrap_or(0);
            let layer = start + 1;
            for q in &inst.qubits {
                qubit_depth[q.index()] = layer;
            }
            for c in &inst.clbits {
                clbit_depth[c.index()] = layer;
            }
            max_depth = max_depth.max(layer);
        }

        max_depth
    }

    /// Count instructions by name, barriers excluded.
    pub fn count_ops(&self) -> FxHashMap<String, usize> {
        let mut counts = FxHashMap::default();
        for inst in self.instructions.iter().filter(|i| !i.is_barrier()) {
            *counts.entry(inst.name().to_string()).or_insert(0) += 1;
        }
        counts
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "circuit {} ({} qubits, {} clbits, depth {})",
            self.name,
            self.num_qubits,
            self.num_clbits,
            self.depth()
        )?;
        for inst in &self.instructions {
            writeln!(f, "  {inst}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_circuit() {
        let circuit = Circuit::new("test");
        assert_eq!(circuit.name(), "test");
        assert_eq!(circuit.num_qubits(), 0);
        assert_eq!(circuit.num_clbits(), 0);
        assert_eq!(circuit.depth(), 0);
    }

    #[test]
    fn test_circuit_with_size() {
        let mut circuit = Circuit::with_size("test", 3, 2);
        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(circuit.num_clbits(), 2);

        assert_eq!(circuit.add_clbit(), ClbitId(2));
        assert_eq!(circuit.num_clbits(), 3);
    }

    #[test]
    fn test_fluent_api_and_depth() {
        let mut circuit = Circuit::with_size("bell", 2, 2);
        circuit
            .h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .measure(QubitId(0), ClbitId(0))
            .unwrap()
            .measure(QubitId(1), ClbitId(1))
            .unwrap();

        assert_eq!(circuit.depth(), 3); // H, CX, parallel measures
        assert_eq!(circuit.num_ops(), 4);
    }

    #[test]
    fn test_parallel_gates_share_a_layer() {
        let mut circuit = Circuit::with_size("layer", 3, 0);
        for q in circuit.qubit_ids() {
            circuit.h(q).unwrap();
        }
        circuit.barrier_all().unwrap();
        circuit.ccx(QubitId(0), QubitId(1), QubitId(2)).unwrap();

        assert_eq!(circuit.depth(), 2);
        assert_eq!(circuit.num_ops(), 4);
    }

    #[test]
    fn test_unknown_qubit_rejected() {
        let mut circuit = Circuit::with_size("test", 2, 0);
        let err = circuit.ccx(QubitId(0), QubitId(1), QubitId(2)).unwrap_err();
        assert_eq!(
            err,
            IrError::QubitNotFound {
                qubit: QubitId(2),
                gate_name: Some("ccx".into()),
            }
        );
        assert!(circuit.instructions().is_empty());
    }

    #[test]
    fn test_unknown_clbit_rejected() {
        let mut circuit = Circuit::with_size("test", 1, 0);
        let err = circuit.measure(QubitId(0), ClbitId(0)).unwrap_err();
        assert!(matches!(err, IrError::ClbitNotFound { .. }));
    }

    #[test]
    fn test_duplicate_qubit_rejected() {
        let mut circuit = Circuit::with_size("test", 2, 0);
        let err = circuit.cx(QubitId(1), QubitId(1)).unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit { qubit: QubitId(1), .. }));
    }

    #[test]
    fn test_arity_mismatch_rejected() {
        let mut circuit = Circuit::with_size("test", 3, 0);
        let err = circuit
            .apply(Instruction::gate(StandardGate::CCX, [QubitId(0), QubitId(1)]))
            .unwrap_err();
        assert_eq!(
            err,
            IrError::QubitCountMismatch {
                gate_name: "ccx".into(),
                expected: 3,
                got: 2,
            }
        );
    }

    #[test]
    fn test_measure_all_adds_clbits() {
        let mut circuit = Circuit::with_size("test", 3, 0);
        circuit.measure_all().unwrap();

        assert_eq!(circuit.num_clbits(), 3);
        assert!(circuit.has_measurements());
        let pairs: Vec<_> = circuit.measurements().collect();
        assert_eq!(
            pairs,
            vec![
                (QubitId(0), ClbitId(0)),
                (QubitId(1), ClbitId(1)),
                (QubitId(2), ClbitId(2)),
            ]
        );
    }

    #[test]
    fn test_count_ops() {
        let mut circuit = Circuit::with_size("test", 2, 0);
        circuit
            .h(QubitId(0))
            .unwrap()
            .h(QubitId(1))
            .unwrap()
            .cz(QubitId(0), QubitId(1))
            .unwrap()
            .barrier_all()
            .unwrap();

        let counts = circuit.count_ops();
        assert_eq!(counts.get("h"), Some(&2));
        assert_eq!(counts.get("cz"), Some(&1));
        assert_eq!(counts.get("barrier"), None);
    }

    #[test]
    fn test_display_lists_instructions() {
        let mut circuit = Circuit::with_size("demo", 2, 0);
        circuit.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();

        let text = circuit.to_string();
        assert!(text.starts_with("circuit demo (2 qubits, 0 clbits, depth 2)"));
        assert!(text.contains("  h q0\n"));
        assert!(text.contains("  cx q0, q1\n"));
    }

    #[test]
    fn test_serde_roundtrip_preserves_instructions() {
        let mut circuit = Circuit::with_size("rt", 2, 0);
        circuit.rz(0.25, QubitId(1)).unwrap().measure_all().unwrap();

        let json = serde_json::to_string(&circuit).unwrap();
        let back: Circuit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, circuit);
    }

    #[test]
    fn test_deserialize_rejects_out_of_range_operands() {
        let json = r#"{
            "name": "bad",
            "num_qubits": 1,
            "num_clbits": 0,
            "instructions": [{"kind": {"Gate": "X"}, "qubits": [3], "clbits": []}]
        }"#;
        let err = serde_json::from_str::<Circuit>(json).unwrap_err();
        assert!(err.to_string().contains("Qubit q3 not found"), "{err}");

        let json = r#"{
            "name": "bad",
            "num_qubits": 2,
            "num_clbits": 0,
            "instructions": [{"kind": {"Gate": "CX"}, "qubits": [0], "clbits": []}]
        }"#;
        let err = serde_json::from_str::<Circuit>(json).unwrap_err();
        assert!(err.to_string().contains("requires 2 qubits"), "{err}");
    }
}
