//! Search outcome summary.

use serde::Serialize;
use sift_hal::{Counts, ExecutionResult};
use std::fmt;

use crate::circuits::grover::{NUM_QUBITS, TARGET};

/// What one Grover run measured.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchReport {
    /// Register width.
    pub qubits: usize,
    /// Oracle + diffuser rounds applied.
    pub iterations: usize,
    /// Shots executed.
    pub shots: u32,
    /// The marked bit-string.
    pub target: String,
    /// Measurement histogram.
    pub counts: Counts,
    /// Fraction of shots that measured [`TARGET`].
    pub success_probability: f64,
}

impl SearchReport {
    /// Summarize a finished run.
    pub fn new(iterations: usize, result: &ExecutionResult) -> Self {
        Self {
            qubits: NUM_QUBITS,
            iterations,
            shots: result.shots,
            target: TARGET.to_string(),
            counts: result.counts.clone(),
            success_probability: success_probability(&result.counts, result.shots),
        }
    }
}

/// `counts[TARGET] / shots`; a missing key counts as zero.
pub fn success_probability(counts: &Counts, shots: u32) -> f64 {
    if shots == 0 {
        return 0.0;
    }
    counts.get(TARGET) as f64 / f64::from(shots)
}

impl fmt::Display for SearchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Counts(ideal): {}", self.counts)?;
        write!(f, "Success probability: {:.2}", self.success_probability)
    }
}
