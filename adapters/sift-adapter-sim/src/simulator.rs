//! Simulator backend implementation.

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tracing::{debug, instrument};
use uuid::Uuid;

use sift_hal::{
    Backend, BackendAvailability, BackendConfig, BackendFactory, Capabilities, Counts,
    ExecutionResult, HalError, HalResult, Job, JobId, JobStatus, ValidationResult,
};
use sift_ir::Circuit;

use crate::statevector::{Sampler, Statevector};

/// Default qubit limit; 2^20 amplitudes is 16 MiB.
const DEFAULT_MAX_QUBITS: u32 = 20;

/// Largest qubit limit a simulator accepts; 2^30 amplitudes is 16 GiB.
pub const MAX_SUPPORTED_QUBITS: u32 = 30;

/// Job data for the simulator.
struct SimJob {
    job: Job,
    result: Option<ExecutionResult>,
}

/// Local statevector backend.
///
/// Every job evolves the circuit's statevector once and then draws the
/// requested number of shots from its distribution. With a seed, each job
/// draws from a fresh generator seeded with it, so identical submissions
/// yield identical counts.
pub struct SimulatorBackend {
    /// Capabilities reported to callers.
    capabilities: Capabilities,
    /// Submitted jobs by id.
    jobs: Arc<Mutex<FxHashMap<String, SimJob>>>,
    /// Sampling seed; `None` draws from OS entropy.
    seed: Option<u64>,
}

impl SimulatorBackend {
    /// Create a new simulator backend with default settings.
    pub fn new() -> Self {
        Self::with_max_qubits(DEFAULT_MAX_QUBITS)
    }

    /// Create a simulator with custom max qubits.
    ///
    /// Limits above [`MAX_SUPPORTED_QUBITS`] are lowered to it.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self {
            capabilities: Capabilities::simulator(max_qubits.min(MAX_SUPPORTED_QUBITS)),
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
            seed: None,
        }
    }

    /// Create a simulator whose sampling is reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::new()
        }
    }

    /// The sampling seed, if one was configured.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Evolve `circuit` from |0...0⟩ without sampling.
    ///
    /// Measurements are skipped, so this exposes the pre-measurement state.
    pub fn statevector(&self, circuit: &Circuit) -> HalResult<Statevector> {
        self.check_width(circuit)?;
        Ok(evolve(circuit))
    }

    fn check_width(&self, circuit: &Circuit) -> HalResult<()> {
        if circuit.num_qubits() > self.capabilities.num_qubits as usize {
            return Err(HalError::CircuitTooLarge(format!(
                "Circuit has {} qubits but simulator only supports {}",
                circuit.num_qubits(),
                self.capabilities.num_qubits
            )));
        }
        Ok(())
    }

    fn check_shots(&self, shots: u32) -> HalResult<()> {
        if shots == 0 || shots > self.capabilities.max_shots {
            return Err(HalError::InvalidShots(format!(
                "{shots} is outside 1..={}",
                self.capabilities.max_shots
            )));
        }
        Ok(())
    }

    fn lock_jobs(&self) -> MutexGuard<'_, FxHashMap<String, SimJob>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Run simulation synchronously.
    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    fn run_simulation(&self, circuit: &Circuit, shots: u32) -> ExecutionResult {
        let start = Instant::now();

        debug!(
            "Starting simulation: {} qubits, {} ops, {} shots",
            circuit.num_qubits(),
            circuit.num_ops(),
            shots
        );

        let state = evolve(circuit);
        let sampler = Sampler::new(&state);
        let measurements: Vec<(usize, usize)> = circuit
            .measurements()
            .map(|(q, c)| (q.index(), c.index()))
            .collect();

        let mut rng = self.rng();
        let mut by_index: FxHashMap<usize, u64> = FxHashMap::default();
        for _ in 0..shots {
            *by_index.entry(sampler.sample(&mut rng)).or_insert(0) += 1;
        }

        let mut counts = Counts::new();
        for (index, count) in by_index {
            counts.insert(bitstring(index, &measurements, circuit.num_clbits()), count);
        }

        let elapsed = start.elapsed();
        debug!(outcomes = counts.len(), "Simulation completed in {:?}", elapsed);

        ExecutionResult::new(counts, shots).with_execution_time(elapsed.as_millis() as u64)
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply every instruction of `circuit` to a fresh statevector.
fn evolve(circuit: &Circuit) -> Statevector {
    let mut state = Statevector::new(circuit.num_qubits());
    for inst in circuit.instructions() {
        state.apply(inst);
    }
    state
}

/// Classical register contents for basis state `index`.
///
/// Classical bit 0 is the right-most character; bits never written read 0.
fn bitstring(index: usize, measurements: &[(usize, usize)], num_clbits: usize) -> String {
    let mut bits = vec!['0'; num_clbits];
    for &(qubit, clbit) in measurements {
        bits[clbit] = if (index >> qubit) & 1 == 1 { '1' } else { '0' };
    }
    bits.iter().rev().collect()
}

/// Reject gates that act on a qubit after it was measured.
fn check_terminal_measurements(circuit: &Circuit) -> HalResult<()> {
    let mut measured = vec![false; circuit.num_qubits()];
    for inst in circuit.instructions() {
        if inst.is_measure() {
            for q in &inst.qubits {
                measured[q.index()] = true;
            }
        } else if inst.is_gate() {
            if let Some(q) = inst.qubits.iter().find(|q| measured[q.index()]) {
                return Err(HalError::InvalidCircuit(format!(
                    "'{}' acts on {q} after it was measured; only terminal measurements are supported",
                    inst.name()
                )));
            }
        }
    }
    Ok(())
}

#[async_trait]
impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.capabilities.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn availability(&self) -> HalResult<BackendAvailability> {
        Ok(BackendAvailability::always_available())
    }

    async fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult> {
        let mut reasons = self.capabilities.violations(circuit);
        if !circuit.has_measurements() {
            reasons.push("circuit has no measurements".into());
        }
        if let Err(e) = check_terminal_measurements(circuit) {
            reasons.push(e.to_string());
        }
        Ok(if reasons.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid { reasons }
        })
    }

    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId> {
        self.check_width(circuit)?;
        self.check_shots(shots)?;
        if !circuit.has_measurements() {
            return Err(HalError::InvalidCircuit(
                "circuit has no measurements to sample".into(),
            ));
        }
        check_terminal_measurements(circuit)?;

        let job_id = JobId::new(Uuid::new_v4().to_string());
        let mut job = Job::new(job_id.clone(), shots, self.name());
        job.transition(JobStatus::Running);
        self.lock_jobs().insert(job_id.0.clone(), SimJob { job, result: None });

        debug!("Submitted job: {}", job_id);

        // The local backend finishes inside submit; wait() sees Completed on its first poll.
        let result = self.run_simulation(circuit, shots);

        if let Some(sim_job) = self.lock_jobs().get_mut(&job_id.0) {
            if sim_job.job.transition(JobStatus::Completed) {
                sim_job.result = Some(result);
            }
        }

        Ok(job_id)
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        self.lock_jobs()
            .get(&job_id.0)
            .map(|j| j.job.status.clone())
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))
    }

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let jobs = self.lock_jobs();
        let sim_job = jobs
            .get(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;
        match (&sim_job.job.status, &sim_job.result) {
            (JobStatus::Completed, Some(result)) => Ok(result.clone()),
            (JobStatus::Cancelled, _) => Err(HalError::JobCancelled),
            (JobStatus::Failed(msg), _) => Err(HalError::JobFailed(msg.clone())),
            (status, _) => Err(HalError::JobFailed(format!(
                "job {job_id} has no result in state {status}"
            ))),
        }
    }

    async fn cancel(&self, job_id: &JobId) -> HalResult<()> {
        let mut jobs = self.lock_jobs();
        let sim_job = jobs
            .get_mut(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;
        sim_job.job.transition(JobStatus::Cancelled);
        Ok(())
    }
}

impl BackendFactory for SimulatorBackend {
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        let max_qubits = match config.get_u64("max_qubits")? {
            Some(v) if v <= u64::from(MAX_SUPPORTED_QUBITS) => v as u32,
            Some(v) => {
                return Err(HalError::Configuration(format!(
                    "max_qubits {v} exceeds the supported {MAX_SUPPORTED_QUBITS}"
                )));
            }
            None => DEFAULT_MAX_QUBITS,
        };
        let seed = config.get_u64("seed")?;

        let mut capabilities = Capabilities::simulator(max_qubits);
        capabilities.name = config.name;

        Ok(Self {
            capabilities,
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
            seed,
        })
    }
}
