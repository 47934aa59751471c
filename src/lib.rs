//! state-probe: behavioral discovery of entity state operations
//!
//! Resolves which methods of an opaque host type load and save its state by
//! invoking candidates on a disposable sample and watching what they do to an
//! empty probe blob.
//!
//! - **Resolution**: [`resolver`] (the capability resolver and its traits)
//! - **Shared types**: [`types`] (structured values, method shapes, versions)
//! - **Simulation**: [`sim`] (an in-memory host with era-dependent method tables)
//!
//! The `state-probe` binary drives the resolver against the simulated host.

pub mod logging;
pub mod output;

pub use state_probe_resolver as resolver;
pub use state_probe_sim as sim;
pub use state_probe_types as types;
