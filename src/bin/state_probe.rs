//! state-probe: discover entity state operations on a simulated host
//!
//! ## Commands
//!
//! - **resolve**: find the load and save operations and print the report
//! - **inspect**: list every probed candidate with its outcome
//! - **apply**: load a JSON state onto a fresh entity and read it back
//!
//! ## Example Usage
//!
//! ```bash
//! # Resolve against a 1.8-era host
//! state-probe resolve --era legacy
//!
//! # Same method table, but reporting a newer version
//! state-probe resolve --era modern --host-version v1_12_R1 --json
//!
//! # Add a decoy and see what the probes observe
//! state-probe inspect --era shuffled --extra void-noop
//!
//! # Round-trip a saved state
//! state-probe apply --era modern --state zombie.json --set 'CustomName="Bob"'
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};

mod probe_cli;

use probe_cli::{apply::ApplyCmd, inspect::InspectCmd, resolve::ResolveCmd};
use state_probe::logging::init_logging;

#[derive(Parser)]
#[command(
    name = "state-probe",
    author,
    version,
    about = "Behavioral discovery of entity load/save operations"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON instead of human-readable format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (debug logs on stderr)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the load and save operations of the simulated entity
    Resolve(ResolveCmd),

    /// Probe every candidate and report what each one did
    Inspect(InspectCmd),

    /// Load a JSON state onto a fresh entity and save it back
    Apply(ApplyCmd),
}

fn main() -> Result<()> {
    let Cli {
        command,
        json,
        verbose,
    } = Cli::parse();
    init_logging(verbose);

    match command {
        Commands::Resolve(cmd) => cmd.execute(json),
        Commands::Inspect(cmd) => cmd.execute(json),
        Commands::Apply(cmd) => cmd.execute(json),
    }
}
