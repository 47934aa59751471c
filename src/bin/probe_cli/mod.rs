//! Subcommands of the state-probe CLI and the host options they share.

pub mod apply;
pub mod inspect;
pub mod resolve;

use std::str::FromStr;

use anyhow::{anyhow, Result};
use clap::Args;
use state_probe::resolver::{ProbeProtocol, ResolverConfig};
use state_probe::sim::{HostEra, SimBehavior, SimHost, SimMethod};
use state_probe::types::HostVersion;
use tracing::debug;

/// Options describing the simulated host to probe.
#[derive(Args, Debug, Clone)]
pub struct HostArgs {
    /// Host era: legacy, modern or shuffled
    #[arg(long, default_value = "legacy")]
    pub era: HostEra,

    /// Override the reported host version (e.g. v1_12_R1 or 1.12.2)
    #[arg(long, value_name = "VERSION")]
    pub host_version: Option<HostVersion>,

    /// Number of loaded worlds; 0 means the host is not ready
    #[arg(long, default_value_t = 1)]
    pub worlds: usize,

    /// Force a probe protocol (void or returning) instead of deriving it from the version
    #[arg(long)]
    pub protocol: Option<ProbeProtocol>,

    /// Append an extra method to the entity's table (repeatable)
    #[arg(long = "extra", value_name = "KIND")]
    pub extras: Vec<ExtraMethod>,
}

impl HostArgs {
    pub fn build_host(&self) -> SimHost {
        let mut host = SimHost::new(self.era).with_worlds(self.worlds);
        if let Some(version) = self.host_version {
            host = host.with_version(version);
        }
        for (i, extra) in self.extras.iter().enumerate() {
            host = host.with_method(extra.to_method(&format!("x{i}")));
        }
        debug!(
            era = %self.era,
            worlds = self.worlds,
            extras = self.extras.len(),
            "built simulated host"
        );
        host
    }

    /// Environment configuration, with `--protocol` taking precedence.
    pub fn resolver_config(&self) -> ResolverConfig {
        let config = ResolverConfig::from_env();
        match self.protocol {
            Some(protocol) => config.with_protocol(protocol),
            None => config,
        }
    }
}

/// An additional method for the simulated entity, chosen by behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraMethod {
    VoidSave,
    VoidLoad,
    VoidNoop,
    VoidFail,
    ReturningSave,
    ReturningEmpty,
}

impl ExtraMethod {
    fn to_method(self, name: &str) -> SimMethod {
        match self {
            ExtraMethod::VoidSave => SimMethod::void(name, SimBehavior::SaveInto),
            ExtraMethod::VoidLoad => SimMethod::void(name, SimBehavior::LoadState),
            ExtraMethod::VoidNoop => SimMethod::void(name, SimBehavior::Noop),
            ExtraMethod::VoidFail => SimMethod::void(name, SimBehavior::Fail),
            ExtraMethod::ReturningSave => SimMethod::returning(name, SimBehavior::SaveReturning),
            ExtraMethod::ReturningEmpty => SimMethod::returning(name, SimBehavior::ReturnsNothing),
        }
    }
}

impl FromStr for ExtraMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "void-save" => Ok(ExtraMethod::VoidSave),
            "void-load" => Ok(ExtraMethod::VoidLoad),
            "void-noop" => Ok(ExtraMethod::VoidNoop),
            "void-fail" => Ok(ExtraMethod::VoidFail),
            "returning-save" => Ok(ExtraMethod::ReturningSave),
            "returning-empty" => Ok(ExtraMethod::ReturningEmpty),
            other => Err(anyhow!(
                "unknown method kind '{other}' (expected void-save, void-load, void-noop, \
                 void-fail, returning-save or returning-empty)"
            )),
        }
    }
}
