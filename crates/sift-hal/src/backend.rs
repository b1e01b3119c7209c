//! Backend trait and configuration.
//!
//! The [`Backend`] trait defines the lifecycle for running a circuit:
//!
//! ```text
//!   capabilities() ──→ validate() ──→ submit() ──→ status() ──→ result()
//!    (sync, &ref)       (async)       (async)      (async)      (async)
//! ```
//!
//! `wait()` is provided on top of `status()` and `result()`.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::trace;

use sift_ir::Circuit;

use crate::capability::Capabilities;
use crate::error::{HalError, HalResult};
use crate::job::{JobId, JobStatus};
use crate::result::ExecutionResult;

/// Interval between status polls in [`Backend::wait`].
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Number of polls before [`Backend::wait`] gives up (5 minutes).
pub const MAX_POLLS: u32 = 600;

/// Configuration for a backend instance.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Name of the backend.
    pub name: String,
    /// Backend-specific settings.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BackendConfig {
    /// Create a new backend configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Add extra configuration.
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Read an unsigned integer setting.
    ///
    /// Returns `Ok(None)` when the key is absent and a configuration error
    /// when it holds anything other than a non-negative integer.
    pub fn get_u64(&self, key: &str) -> HalResult<Option<u64>> {
        match self.extra.get(key) {
            None => Ok(None),
            Some(value) => value.as_u64().map(Some).ok_or_else(|| {
                HalError::Configuration(format!(
                    "'{key}' must be a non-negative integer, got {value}"
                ))
            }),
        }
    }
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("name", &self.name)
            .field("extra", &self.extra)
            .finish()
    }
}

/// Trait for quantum backends.
///
/// Implementations cache their capabilities at construction time, so
/// `capabilities()` is synchronous and infallible.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Get the capabilities of this backend.
    fn capabilities(&self) -> &Capabilities;

    /// Check whether the backend accepts jobs right now.
    async fn availability(&self) -> HalResult<BackendAvailability>;

    /// Validate a circuit against backend constraints.
    async fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult>;

    /// Submit a circuit for execution.
    ///
    /// Returns a job ID that can be used to check status and retrieve results.
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId>;

    /// Get the status of a job.
    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus>;

    /// Get the result of a completed job.
    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult>;

    /// Cancel a job.
    async fn cancel(&self, job_id: &JobId) -> HalResult<()>;

    /// Wait for a job to complete and return its result.
    ///
    /// Polls every [`POLL_INTERVAL`] for at most [`MAX_POLLS`] rounds.
    async fn wait(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        for _ in 0..MAX_POLLS {
            let status = self.status(job_id).await?;
            trace!(%job_id, %status, "polled job");

            match status {
                JobStatus::Completed => return self.result(job_id).await,
                JobStatus::Failed(msg) => return Err(HalError::JobFailed(msg)),
                JobStatus::Cancelled => return Err(HalError::JobCancelled),
                JobStatus::Queued | JobStatus::Running => {
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
            }
        }

        Err(HalError::Timeout(job_id.0.clone()))
    }
}

/// Backend availability information.
#[derive(Debug, Clone)]
pub struct BackendAvailability {
    /// Whether the backend is currently accepting jobs.
    pub is_available: bool,
    /// Number of jobs currently in queue (if known).
    pub queue_depth: Option<u32>,
    /// Human-readable status message.
    pub status_message: Option<String>,
}

impl BackendAvailability {
    /// Availability of a local backend: no queue, always on.
    pub fn always_available() -> Self {
        Self {
            is_available: true,
            queue_depth: Some(0),
            status_message: None,
        }
    }
}

/// Result of circuit validation against backend constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Circuit is valid and can be submitted directly.
    Valid,
    /// Circuit is invalid for this backend.
    Invalid {
        /// Reasons the circuit is invalid.
        reasons: Vec<String>,
    },
}

impl ValidationResult {
    /// Check if the circuit is valid (can be submitted as-is).
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// Trait for creating backends from configuration.
pub trait BackendFactory: Backend + Sized {
    /// Create a backend from configuration.
    fn from_config(config: BackendConfig) -> HalResult<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Counts;
    use std::sync::Mutex;

    /// Reports a scripted sequence of statuses, one per poll.
    struct ScriptedBackend {
        caps: Capabilities,
        statuses: Mutex<Vec<JobStatus>>,
    }

    impl ScriptedBackend {
        fn new(mut statuses: Vec<JobStatus>) -> Self {
            statuses.reverse();
            Self {
                caps: Capabilities::simulator(1),
                statuses: Mutex::new(statuses),
            }
        }
    }

    #[async_trait]
    impl Backend for ScriptedBackend {
        fn name(&self) -> &str {
            "scripted"
        }

        fn capabilities(&self) -> &Capabilities {
            &self.caps
        }

        async fn availability(&self) -> HalResult<BackendAvailability> {
            Ok(BackendAvailability::always_available())
        }

        async fn validate(&self, _circuit: &Circuit) -> HalResult<ValidationResult> {
            Ok(ValidationResult::Valid)
        }

        async fn submit(&self, _circuit: &Circuit, _shots: u32) -> HalResult<JobId> {
            Ok(JobId::new("scripted-job"))
        }

        async fn status(&self, _job_id: &JobId) -> HalResult<JobStatus> {
            let mut statuses = self.statuses.lock().unwrap();
            Ok(statuses.pop().unwrap_or(JobStatus::Running))
        }

        async fn result(&self, _job_id: &JobId) -> HalResult<ExecutionResult> {
            Ok(ExecutionResult::new(Counts::from_pairs([("1", 4)]), 4))
        }

        async fn cancel(&self, _job_id: &JobId) -> HalResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_backend_config_extra() {
        let config = BackendConfig::new("simulator")
            .with_extra("seed", serde_json::json!(42))
            .with_extra("label", serde_json::json!("x"));

        assert_eq!(config.name, "simulator");
        assert_eq!(config.get_u64("seed").unwrap(), Some(42));
        assert_eq!(config.get_u64("missing").unwrap(), None);
        assert!(matches!(
            config.get_u64("label"),
            Err(HalError::Configuration(_))
        ));
    }

    #[test]
    fn test_backend_config_deserializes_flattened_extra() {
        let config: BackendConfig =
            serde_json::from_str(r#"{"name": "simulator", "max_qubits": 8}"#).unwrap();
        assert_eq!(config.get_u64("max_qubits").unwrap(), Some(8));
    }

    #[test]
    fn test_backend_availability() {
        let avail = BackendAvailability::always_available();
        assert!(avail.is_available);
        assert_eq!(avail.queue_depth, Some(0));
        assert_eq!(avail.status_message, None);
    }

    #[test]
    fn test_validation_result_is_valid() {
        assert!(ValidationResult::Valid.is_valid());
        assert!(!ValidationResult::Invalid { reasons: vec![] }.is_valid());
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_polls_until_completed() {
        let backend = ScriptedBackend::new(vec![
            JobStatus::Queued,
            JobStatus::Running,
            JobStatus::Completed,
        ]);
        let result = backend.wait(&JobId::new("scripted-job")).await.unwrap();
        assert_eq!(result.counts.get("1"), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_surfaces_failure() {
        let backend = ScriptedBackend::new(vec![JobStatus::Failed("boom".into())]);
        let err = backend.wait(&JobId::new("j")).await.unwrap_err();
        assert!(matches!(err, HalError::JobFailed(msg) if msg == "boom"));

        let backend = ScriptedBackend::new(vec![JobStatus::Cancelled]);
        let err = backend.wait(&JobId::new("j")).await.unwrap_err();
        assert!(matches!(err, HalError::JobCancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_times_out() {
        let backend = ScriptedBackend::new(vec![]);
        let err = backend.wait(&JobId::new("slow")).await.unwrap_err();
        assert!(matches!(err, HalError::Timeout(id) if id == "slow"));
    }
}
