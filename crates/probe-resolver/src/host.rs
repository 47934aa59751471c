//! Capability traits the resolver consumes.
//!
//! The host object model is opaque: the resolver never sees member names,
//! host classes or reflective handles. Everything it needs arrives through
//! these traits:
//!
//! - [`SampleProvider`]: spawns and removes the disposable test subject
//! - [`CandidateEnumerator`]: lists operations matching a [`MethodShape`]
//! - [`CandidateOperation`]: one enumerated operation, invocable on an instance
//! - [`StateBlobConverter`]: moves values between host blobs and [`StructuredValue`]
//! - [`HostEnvironment`]: readiness and version facts about the host
//!
//! # Example
//!
//! ```no_run
//! use state_probe_resolver::{CapabilityResolver, CandidateEnumerator, CandidateOperation,
//!     HostEnvironment, SampleProvider, StateBlobConverter};
//!
//! fn resolve_once<E, C, P>(host: &impl HostEnvironment, enumerator: &E, converter: &C, provider: &mut P)
//!     -> anyhow::Result<()>
//! where
//!     E: CandidateEnumerator,
//!     C: StateBlobConverter,
//!     E::Operation: CandidateOperation<Blob = C::Blob>,
//!     P: SampleProvider<Instance = <E::Operation as CandidateOperation>::Instance>,
//! {
//!     let resolved = CapabilityResolver::new(enumerator, converter).resolve(host, provider)?;
//!     println!("load = {}", resolved.load_operation().signature());
//!     Ok(())
//! }
//! ```

use anyhow::Result;
use state_probe_types::{HostVersion, MethodShape, MethodSignature, StructuredValue, TypeHandle};

/// Produces and discards the disposable sample instance.
pub trait SampleProvider {
    /// Handle to a live instance of the host's base type.
    type Instance;

    /// Spawn a live, invocable instance.
    fn spawn(&mut self) -> Result<Self::Instance>;

    /// Discard the spawned instance and restore prior host state.
    ///
    /// Must be idempotent. The resolver calls it exactly once per resolution.
    fn remove(&mut self);

    /// The type whose members are enumerated for candidates.
    fn base_type(&self) -> TypeHandle;
}

/// One enumerated member of the opaque type.
pub trait CandidateOperation {
    type Instance;
    type Blob;

    fn signature(&self) -> &MethodSignature;

    /// Invoke on `instance` with `blob` as the single argument.
    ///
    /// Void-shaped operations return `Ok(None)`. Blob-returning operations
    /// return whatever the host handed back, which may also be `None`.
    fn invoke(&self, instance: &mut Self::Instance, blob: &mut Self::Blob)
        -> Result<Option<Self::Blob>>;
}

/// Lists the operations of a host type that match a shape.
pub trait CandidateEnumerator {
    type Operation: CandidateOperation;

    /// All operations on `owner` matching `shape`, in host order.
    ///
    /// Returns an empty list when nothing matches; never fails.
    fn find_methods(&self, owner: &TypeHandle, shape: &MethodShape) -> Vec<Self::Operation>;
}

/// Moves values across the host blob boundary.
pub trait StateBlobConverter {
    type Blob;

    /// Build a host blob from a structured value.
    fn to_opaque(&self, value: &StructuredValue) -> Result<Self::Blob>;

    /// Derive a structured value from a host blob.
    ///
    /// `None` when the blob is not a well-formed structured container.
    fn from_opaque(&self, blob: &Self::Blob) -> Option<StructuredValue>;

    fn is_empty(&self, value: &StructuredValue) -> bool {
        value.is_empty()
    }
}

/// Facts about the running host.
pub trait HostEnvironment {
    /// Number of loaded worlds (or equivalent contexts).
    fn active_contexts(&self) -> usize;

    fn version(&self) -> HostVersion;
}
