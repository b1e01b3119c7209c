//! Error types for the demo crate.

use sift_hal::HalError;
use sift_ir::IrError;
use thiserror::Error;

/// Errors raised while building or running a demo.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DemoError {
    /// The oracle is only defined for this many qubits.
    #[error("Grover search is defined for {supported} qubits, got {requested}")]
    UnsupportedWidth {
        /// Qubit count that was asked for.
        requested: usize,
        /// The only supported qubit count.
        supported: usize,
    },

    /// Circuit construction failed.
    #[error(transparent)]
    Ir(#[from] IrError),

    /// Backend call failed.
    #[error(transparent)]
    Hal(#[from] HalError),

    /// Writing output failed.
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),

    /// Report serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for demo operations.
pub type DemoResult<T> = Result<T, DemoError>;

#[cfg(test)]
mod tests {
    use super::*;
    use sift_ir::QubitId;

    #[test]
    fn test_error_messages() {
        let err = DemoError::UnsupportedWidth {
            requested: 4,
            supported: 3,
        };
        assert_eq!(
            err.to_string(),
            "Grover search is defined for 3 qubits, got 4"
        );

        let err: DemoError = HalError::JobCancelled.into();
        assert_eq!(err.to_string(), "Job cancelled");

        let err: DemoError = IrError::QubitNotFound {
            qubit: QubitId(5),
            gate_name: None,
        }
        .into();
        assert!(matches!(err, DemoError::Ir(_)));
    }
}
