//! Resolve command - find the load and save operations of the simulated entity

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use state_probe::output::{format_resolution, print_json};
use state_probe::resolver::{CapabilityResolver, HostEnvironment};
use state_probe::sim::{SimBlobConverter, SimSampleProvider};

use super::HostArgs;

#[derive(Parser, Debug)]
pub struct ResolveCmd {
    #[command(flatten)]
    pub host: HostArgs,
}

impl ResolveCmd {
    pub fn execute(&self, json: bool) -> Result<()> {
        let host = self.host.build_host();
        let mut provider = SimSampleProvider::new(&host);
        let resolved = CapabilityResolver::new(&host, &SimBlobConverter)
            .with_config(self.host.resolver_config())
            .resolve(&host, &mut provider)
            .with_context(|| format!("failed to resolve state capabilities on {} host", host.era()))?;

        let report = resolved.report();
        if json {
            print_json(&json!({
                "era": host.era(),
                "host_version": host.version(),
                "report": report,
            }))
        } else {
            print!("{}", format_resolution(&host.version(), &report));
            Ok(())
        }
    }
}
