//! Grover's Search Algorithm Demo
//!
//! Searches a 3-qubit register for |111⟩ on the local statevector backend
//! and prints the measured counts and success probability.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sift_demos::cli::{self, Args};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let code = cli::run(&args, &mut std::io::stdout(), &mut std::io::stderr()).await;
    if code != 0 {
        std::process::exit(code);
    }

    Ok(())
}
