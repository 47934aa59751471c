//! Inspect command - list every probed candidate without resolving roles

use anyhow::{Context, Result};
use clap::Parser;
use state_probe::output::{format_candidates, print_json};
use state_probe::resolver::CapabilityResolver;
use state_probe::sim::{SimBlobConverter, SimSampleProvider};

use super::HostArgs;

#[derive(Parser, Debug)]
pub struct InspectCmd {
    #[command(flatten)]
    pub host: HostArgs,
}

impl InspectCmd {
    pub fn execute(&self, json: bool) -> Result<()> {
        let host = self.host.build_host();
        let mut provider = SimSampleProvider::new(&host);
        let report = CapabilityResolver::new(&host, &SimBlobConverter)
            .with_config(self.host.resolver_config())
            .inspect(&host, &mut provider)
            .context("failed to inspect candidates")?;

        if json {
            print_json(&report)
        } else {
            print!("{}", format_candidates(&report));
            Ok(())
        }
    }
}
