//! Behavioral resolution of state load/save operations on opaque host types.
//!
//! Hosts that persist entity state through obfuscated or version-shifting
//! methods cannot be bound by name. This crate spawns a disposable sample,
//! invokes every method of the right shape on an empty probe blob, and
//! classifies each one by what it does to that blob.
//!
//! - [`host`]: the traits a host implements
//! - [`protocol`]: version-dependent probe protocols
//! - [`classifier`]: the probing scans
//! - [`resolver`]: the [`CapabilityResolver`] entry point
//! - [`access`]: using resolved capabilities on live instances

pub mod access;
pub mod capabilities;
pub mod classifier;
pub mod config;
pub mod error;
pub mod host;
pub mod protocol;
pub mod resolver;
pub mod sample;

#[cfg(test)]
mod testing;

pub use access::EntityStateAccess;
pub use capabilities::{ResolutionReport, ResolvedCapabilities, Role, SaveConvention};
pub use classifier::{Classifier, ProbeOutcome, SurveyEntry};
pub use config::ResolverConfig;
pub use error::{AccessError, Ambiguity, MissingCapabilities, ResolveError};
pub use host::{
    CandidateEnumerator, CandidateOperation, HostEnvironment, SampleProvider, StateBlobConverter,
};
pub use protocol::ProbeProtocol;
pub use resolver::{CandidateReport, CapabilityResolver};
pub use sample::SampleGuard;
