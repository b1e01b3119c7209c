//! Command-line front end for `demo-grover`.
//!
//! Report output goes to `out`; the circuit listing in JSON mode and error
//! lines go to `err`. The binary passes stdout and stderr.

use std::io::Write;

use clap::{Parser, ValueEnum};
use console::style;
use tracing::info;

use sift_adapter_sim::SimulatorBackend;
use sift_hal::{BackendConfig, BackendFactory};

use crate::circuits::grover::{NUM_QUBITS, grover_circuit};
use crate::error::DemoResult;
use crate::report::SearchReport;
use crate::runner::{DEFAULT_SHOTS, run_circuit};

#[derive(Parser, Debug)]
#[command(name = "demo-grover")]
#[command(version, about = "Demonstrate Grover's search algorithm on 3 qubits")]
pub struct Args {
    /// Number of oracle + diffuser rounds
    #[arg(short, long, default_value_t = 1)]
    pub iterations: usize,

    /// Number of shots
    #[arg(short, long, default_value_t = DEFAULT_SHOTS)]
    pub shots: u32,

    /// Seed for reproducible sampling
    #[arg(long, env = "SIFT_SEED")]
    pub seed: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Print the circuit before running it
    #[arg(long)]
    pub show_circuit: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Report format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Counts line and success-probability line.
    Text,
    /// One JSON object.
    Json,
}

/// Build, run and report the search described by `args`.
pub async fn execute(args: &Args, out: &mut impl Write, err: &mut impl Write) -> DemoResult<()> {
    let mut config = BackendConfig::new("simulator");
    if let Some(seed) = args.seed {
        config = config.with_extra("seed", serde_json::json!(seed));
    }
    let backend = SimulatorBackend::from_config(config)?;

    let circuit = grover_circuit(NUM_QUBITS, args.iterations)?;
    info!(
        iterations = args.iterations,
        depth = circuit.depth(),
        ops = circuit.num_ops(),
        "built search circuit"
    );

    if args.show_circuit {
        match args.format {
            Format::Text => write!(out, "{circuit}")?,
            // Keep stdout a single JSON document.
            Format::Json => write!(err, "{circuit}")?,
        }
    }

    let result = run_circuit(&backend, &circuit, args.shots).await?;
    let report = SearchReport::new(args.iterations, &result);

    match args.format {
        Format::Text => writeln!(out, "{report}")?,
        Format::Json => writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?,
    }

    Ok(())
}

/// Run [`execute`] and return the process exit code.
///
/// Failures are written to `err` as a styled `Error:` line and yield 1.
pub async fn run(args: &Args, out: &mut impl Write, err: &mut impl Write) -> i32 {
    match execute(args, out, err).await {
        Ok(()) => 0,
        Err(e) => {
            // Nothing more to report if stderr itself is gone.
            let _ = writeln!(err, "{} {}", style("Error:").red().bold(), e);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("demo-grover").chain(argv.iter().copied())).unwrap()
    }

    async fn capture(argv: &[&str]) -> (i32, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = run(&args(argv), &mut out, &mut err).await;
        (
            code,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_defaults() {
        let args = args(&[]);
        assert_eq!(args.iterations, 1);
        assert_eq!(args.shots, 1000);
        assert_eq!(args.format, Format::Text);
        assert!(!args.show_circuit);
    }

    #[tokio::test]
    async fn test_text_output_is_two_lines() {
        let (code, out, err) = capture(&["--seed", "7"]).await;
        assert_eq!(code, 0);
        assert!(err.is_empty());

        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Counts(ideal): {"));
        assert!(lines[1].starts_with("Success probability: 0."));
    }

    #[tokio::test]
    async fn test_error_exits_one() {
        let (code, out, err) = capture(&["--shots", "0"]).await;
        assert_eq!(code, 1);
        assert!(out.is_empty());
        assert!(err.contains("Error:"), "{err}");
        assert!(err.contains("Invalid shots"), "{err}");
    }

    #[tokio::test]
    async fn test_json_output_is_one_document() {
        let (code, out, err) = capture(&["--seed", "7", "--format", "json", "-i", "2"]).await;
        assert_eq!(code, 0);
        assert!(err.is_empty());

        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["qubits"], 3);
        assert_eq!(json["iterations"], 2);
        assert_eq!(json["shots"], 1000);
        assert_eq!(json["target"], "111");
        let total: u64 = json["counts"]
            .as_object()
            .unwrap()
            .values()
            .map(|v| v.as_u64().unwrap())
            .sum();
        assert_eq!(total, 1000);
        assert!(json["success_probability"].as_f64().unwrap() > 0.85);
    }

    #[tokio::test]
    async fn test_show_circuit_placement() {
        let (code, out, err) = capture(&["--seed", "7", "--show-circuit"]).await;
        assert_eq!(code, 0);
        assert!(out.starts_with("circuit grover (3 qubits, 3 clbits"));
        assert!(out.contains("Success probability: "));
        assert!(err.is_empty());

        let (code, out, err) =
            capture(&["--seed", "7", "--show-circuit", "--format", "json"]).await;
        assert_eq!(code, 0);
        assert!(err.starts_with("circuit grover (3 qubits, 3 clbits"));
        assert!(err.contains("  ccx q0, q1, q2\n"));
        serde_json::from_str::<serde_json::Value>(&out).unwrap();
    }
}
