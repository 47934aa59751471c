//! Shared types for the state-probe workspace.
//!
//! This crate provides the foundational types used by the resolver, the
//! simulated host and the CLI:
//!
//! - [`value`]: [`StructuredValue`], the host-independent view of a state blob
//! - [`shape`]: method shapes used to query candidate operations, and the
//!   signatures those candidates carry
//! - [`version`]: host version parsing and the protocol threshold rule
//! - [`env_utils`]: environment variable helpers used by configuration

pub mod env_utils;
pub mod shape;
pub mod value;
pub mod version;

pub use shape::{MethodShape, MethodSignature, TypeHandle, TypeRef, Visibility};
pub use value::StructuredValue;
pub use version::{HostVersion, VersionThreshold};
