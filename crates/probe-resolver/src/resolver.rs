//! The capability resolver entry point.
//!
//! One call to [`CapabilityResolver::resolve`] runs the whole procedure:
//!
//! 1. Check the host has at least one active context
//! 2. Select the probe protocol from the host version (or the configured override)
//! 3. Spawn the sample under a [`SampleGuard`]
//! 4. Classify candidates and merge the scans
//! 5. Drop the guard, removing the sample, whatever the outcome

use serde::{Deserialize, Serialize};
use state_probe_types::{HostVersion, TypeHandle};
use tracing::{debug, info};

use crate::capabilities::ResolvedCapabilities;
use crate::classifier::{Classifier, SurveyEntry};
use crate::config::ResolverConfig;
use crate::error::ResolveError;
use crate::host::{
    CandidateEnumerator, CandidateOperation, HostEnvironment, SampleProvider, StateBlobConverter,
};
use crate::protocol::ProbeProtocol;
use crate::sample::SampleGuard;

/// Resolves the load and save operations of a host type by probing a sample.
pub struct CapabilityResolver<'a, E, C> {
    enumerator: &'a E,
    converter: &'a C,
    config: ResolverConfig,
}

impl<'a, E, C> CapabilityResolver<'a, E, C>
where
    E: CandidateEnumerator,
    C: StateBlobConverter,
    E::Operation: CandidateOperation<Blob = C::Blob>,
{
    pub fn new(enumerator: &'a E, converter: &'a C) -> Self {
        Self {
            enumerator,
            converter,
            config: ResolverConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolve exactly one load and one save operation.
    ///
    /// Fails without spawning anything when the host has no active context.
    /// The sample is removed exactly once on every other path.
    pub fn resolve<H, P>(
        &self,
        env: &H,
        provider: &mut P,
    ) -> Result<ResolvedCapabilities<E::Operation>, ResolveError>
    where
        H: HostEnvironment + ?Sized,
        P: SampleProvider<Instance = <E::Operation as CandidateOperation>::Instance>,
    {
        let version = ensure_ready(env)?;
        let protocol = self.config.protocol_for(&version);
        let owner = provider.base_type();
        info!(
            host_version = %version,
            protocol = %protocol,
            owner = %owner,
            "resolving state capabilities"
        );

        let mut guard = SampleGuard::spawn(provider)?;
        let partial = Classifier::new(self.converter).classify(
            protocol,
            self.enumerator,
            &owner,
            guard.instance_mut(),
        )?;
        let resolved = partial.into_resolved(protocol)?;

        debug!(
            load = %resolved.load_operation().signature(),
            save = %resolved.save_operation().signature(),
            "resolved state capabilities"
        );
        Ok(resolved)
    }

    /// Probe every candidate and report what each one did, without resolving roles.
    ///
    /// Duplicates and missing roles are reported, not raised. Readiness and
    /// invocation failures still fail the call.
    pub fn inspect<H, P>(&self, env: &H, provider: &mut P) -> Result<CandidateReport, ResolveError>
    where
        H: HostEnvironment + ?Sized,
        P: SampleProvider<Instance = <E::Operation as CandidateOperation>::Instance>,
    {
        let version = ensure_ready(env)?;
        let protocol = self.config.protocol_for(&version);
        let owner = provider.base_type();

        let mut guard = SampleGuard::spawn(provider)?;
        let candidates = Classifier::new(self.converter).survey(
            protocol,
            self.enumerator,
            &owner,
            guard.instance_mut(),
        )?;

        Ok(CandidateReport {
            host_version: version,
            protocol,
            owner,
            candidates,
        })
    }
}

fn ensure_ready<H: HostEnvironment + ?Sized>(env: &H) -> Result<HostVersion, ResolveError> {
    if env.active_contexts() == 0 {
        return Err(ResolveError::Precondition(
            "resolution attempted before any world was loaded".to_string(),
        ));
    }
    Ok(env.version())
}

/// Every probed candidate for one host, from [`CapabilityResolver::inspect`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateReport {
    pub host_version: HostVersion,
    pub protocol: ProbeProtocol,
    pub owner: TypeHandle,
    pub candidates: Vec<SurveyEntry>,
}
