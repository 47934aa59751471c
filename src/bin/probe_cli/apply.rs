//! Apply command - load a JSON state onto a fresh entity and read it back

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde_json::json;
use state_probe::output::{format_state, print_json};
use state_probe::resolver::{CandidateOperation, CapabilityResolver, EntityStateAccess};
use state_probe::sim::{SimBlobConverter, SimEntity, SimMethod, SimSampleProvider};
use state_probe::types::StructuredValue;
use tracing::info;

use super::HostArgs;

#[derive(Parser, Debug)]
pub struct ApplyCmd {
    #[command(flatten)]
    pub host: HostArgs,

    /// JSON file holding the entity state (a top-level object)
    #[arg(long, value_name = "FILE")]
    pub state: PathBuf,

    /// Edit one top-level entry after loading: KEY=JSON (repeatable)
    #[arg(long = "set", value_name = "KEY=JSON")]
    pub edits: Vec<String>,
}

impl ApplyCmd {
    pub fn execute(&self, json: bool) -> Result<()> {
        let raw = std::fs::read_to_string(&self.state)
            .with_context(|| format!("failed to read {}", self.state.display()))?;
        let state: StructuredValue = serde_json::from_str(&raw)
            .with_context(|| format!("invalid state JSON in {}", self.state.display()))?;
        let edits = self
            .edits
            .iter()
            .map(String::as_str)
            .map(parse_edit)
            .collect::<Result<Vec<_>>>()?;

        let host = self.host.build_host();
        let mut provider = SimSampleProvider::new(&host);
        let resolved = CapabilityResolver::new(&host, &SimBlobConverter)
            .with_config(self.host.resolver_config())
            .resolve(&host, &mut provider)
            .context("failed to resolve state capabilities")?;
        let access = EntityStateAccess::new(Arc::new(resolved), SimBlobConverter);

        let mut entity = host.spawn_entity().context("failed to spawn entity")?;
        let result = round_trip(&access, &mut entity, &state, edits);
        host.despawn(entity.id());
        let saved = result?;

        if json {
            print_json(&json!({
                "entity": entity.id(),
                "state": saved,
            }))
        } else {
            println!(
                "Entity #{} saved via {}:",
                entity.id(),
                access.capabilities().save_operation().signature()
            );
            print!("{}", format_state(&saved));
            Ok(())
        }
    }
}

/// Load `state`, apply `edits`, and read the entity's state back.
fn round_trip(
    access: &EntityStateAccess<SimMethod, SimBlobConverter>,
    entity: &mut SimEntity,
    state: &StructuredValue,
    edits: Vec<(String, StructuredValue)>,
) -> Result<StructuredValue> {
    access.load(entity, state)?;
    info!(
        entity = entity.id(),
        load = %access.capabilities().load_operation().signature(),
        "loaded state"
    );
    if edits.is_empty() {
        return Ok(access.save(entity)?);
    }
    Ok(access.modify(entity, |compound| compound.extend(edits))?)
}

fn parse_edit(edit: &str) -> Result<(String, StructuredValue)> {
    let (key, value) = edit
        .split_once('=')
        .ok_or_else(|| anyhow!("expected KEY=JSON, got '{edit}'"))?;
    let value = serde_json::from_str(value)
        .with_context(|| format!("invalid JSON value for '{key}'"))?;
    Ok((key.to_string(), value))
}
