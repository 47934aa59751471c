//! Log subscriber setup for the CLI.

use state_probe_types::env_utils::env_bool;
use tracing_subscriber::EnvFilter;

/// Truthy value forces verbose logging without the `--verbose` flag.
pub const ENV_VERBOSE: &str = "STATE_PROBE_VERBOSE";

/// Install a stderr `fmt` subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level is `warn`, or `debug` for
/// this workspace's crates when `verbose` (or `STATE_PROBE_VERBOSE`) is on.
/// Safe to call more than once.
pub fn init_logging(verbose: bool) {
    let verbose = verbose || env_bool(ENV_VERBOSE);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn default_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("warn,state_probe=debug,state_probe_resolver=debug,state_probe_sim=debug")
    } else {
        EnvFilter::new("warn")
    }
}
