//! Sift Circuit Intermediate Representation
//!
//! This crate provides the data structures for describing the quantum
//! circuits that Sift backends execute.
//!
//! # Core Components
//!
//! - **Qubits and Classical Bits**: [`QubitId`], [`ClbitId`]
//! - **Gates**: [`StandardGate`], a closed set of named gates
//! - **Instructions**: [`Instruction`] combining gates with their operands
//! - **Circuit**: [`Circuit`], an ordered, validated instruction list
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use sift_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell_state", 2, 2);
//!
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! circuit.measure_all().unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.depth(), 3);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `id` | 1 | Identity |
//! | `x`, `y`, `z` | 1 | Pauli gates |
//! | `h` | 1 | Hadamard gate |
//! | `s`, `sdg`, `t`, `tdg` | 1 | Phase-family Clifford+T gates |
//! | `rx`, `ry`, `rz`, `p` | 1 | Rotation and phase gates |
//! | `cx`, `cz` | 2 | Controlled-NOT and Controlled-Z |
//! | `swap` | 2 | SWAP gate |
//! | `ccx` | 3 | Toffoli (CCNOT) gate |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::{Instruction, InstructionKind};
pub use qubit::{ClbitId, QubitId};
