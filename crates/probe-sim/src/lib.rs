//! An in-memory host for exercising the capability resolver.
//!
//! [`SimHost`] exposes a single entity type whose state methods carry
//! obfuscated names and whose method table depends on the [`HostEra`]:
//!
//! - [`HostEra::Legacy`]: `v1_8_R3`, save writes into its argument
//! - [`HostEra::Modern`]: `v1_12_R1`, save returns a new blob
//! - [`HostEra::Shuffled`]: `v1_13_R2`, save listed first among decoys
//!
//! ```
//! use state_probe_resolver::CapabilityResolver;
//! use state_probe_sim::{HostEra, SimBlobConverter, SimHost, SimSampleProvider};
//!
//! let host = SimHost::new(HostEra::Modern);
//! let mut provider = SimSampleProvider::new(&host);
//! let resolved = CapabilityResolver::new(&host, &SimBlobConverter)
//!     .resolve(&host, &mut provider)
//!     .unwrap();
//! assert_eq!(resolved.report().save.name, "save");
//! assert_eq!(host.entity_count(), 0);
//! ```

pub mod blob;
pub mod entity;
pub mod host;
pub mod methods;

pub use blob::{SimBlob, SimBlobConverter};
pub use entity::SimEntity;
pub use host::{HostEra, SimHost, SimSampleProvider, ENTITY_TYPE};
pub use methods::{SimBehavior, SimMethod};
