//! Role slots and the resolved capability set.

use std::fmt;

use serde::{Deserialize, Serialize};
use state_probe_types::MethodSignature;

use crate::error::{Ambiguity, MissingCapabilities, ResolveError};
use crate::host::CandidateOperation;
use crate::protocol::ProbeProtocol;

/// The part an operation plays in state persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Hydrate the instance from an external blob.
    Load,
    /// Extract the instance's current state into a blob.
    Save,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Load => f.write_str("load"),
            Role::Save => f.write_str("save"),
        }
    }
}

/// Role slots filled by a single scan.
#[derive(Debug)]
pub struct PartialCapabilities<Op> {
    pub load: Option<Op>,
    pub save: Option<Op>,
}

impl<Op> Default for PartialCapabilities<Op> {
    fn default() -> Self {
        Self {
            load: None,
            save: None,
        }
    }
}

impl<Op: CandidateOperation> PartialCapabilities<Op> {
    /// Fill `role` with `op`, rejecting a second claimant.
    pub fn assign(&mut self, protocol: ProbeProtocol, role: Role, op: Op) -> Result<(), Ambiguity> {
        let slot = match role {
            Role::Load => &mut self.load,
            Role::Save => &mut self.save,
        };
        if let Some(existing) = slot {
            return Err(Ambiguity {
                protocol,
                role,
                first: existing.signature().to_string(),
                second: op.signature().to_string(),
            });
        }
        *slot = Some(op);
        Ok(())
    }

    /// Replace the save slot when `save` is present; keep the current one otherwise.
    pub fn overlay_save(mut self, save: Option<Op>) -> Self {
        if let Some(op) = save {
            self.save = Some(op);
        }
        self
    }

    pub fn missing_roles(&self) -> Vec<Role> {
        let mut missing = Vec::new();
        if self.load.is_none() {
            missing.push(Role::Load);
        }
        if self.save.is_none() {
            missing.push(Role::Save);
        }
        missing
    }

    /// Promote to a complete set, or fail naming what is missing.
    pub fn into_resolved(
        self,
        protocol: ProbeProtocol,
    ) -> Result<ResolvedCapabilities<Op>, ResolveError> {
        let missing = self.missing_roles();
        match (self.load, self.save) {
            (Some(load), Some(save)) => Ok(ResolvedCapabilities {
                protocol,
                load,
                save,
            }),
            (load, save) => Err(ResolveError::MissingCapability(MissingCapabilities {
                missing,
                load: load.map(|op| op.signature().to_string()),
                save: save.map(|op| op.signature().to_string()),
            })),
        }
    }
}

/// Exactly one load and one save operation for the inspected host type.
///
/// Immutable once built; wrap in an `Arc` to share across consumers.
#[derive(Debug, Clone)]
pub struct ResolvedCapabilities<Op> {
    protocol: ProbeProtocol,
    load: Op,
    save: Op,
}

impl<Op: CandidateOperation> ResolvedCapabilities<Op> {
    /// The operation that stores external state on an instance.
    pub fn load_operation(&self) -> &Op {
        &self.load
    }

    /// The operation that extracts an instance's state.
    pub fn save_operation(&self) -> &Op {
        &self.save
    }

    /// The protocol the capabilities were resolved under.
    pub fn protocol(&self) -> ProbeProtocol {
        self.protocol
    }

    /// How the save operation hands its state back.
    pub fn save_convention(&self) -> SaveConvention {
        if self.save.signature().returns_blob() {
            SaveConvention::Returned
        } else {
            SaveConvention::Argument
        }
    }

    pub fn report(&self) -> ResolutionReport {
        ResolutionReport {
            protocol: self.protocol,
            load: self.load.signature().clone(),
            save: self.save.signature().clone(),
            save_convention: self.save_convention(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveConvention {
    /// State is written into the blob passed in.
    Argument,
    /// State is returned as a new blob.
    Returned,
}

/// Serializable summary of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionReport {
    pub protocol: ProbeProtocol,
    pub load: MethodSignature,
    pub save: MethodSignature,
    pub save_convention: SaveConvention,
}

impl fmt::Display for ResolutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Protocol: {}", self.protocol)?;
        writeln!(f, "  load: {}", self.load)?;
        write!(
            f,
            "  save: {} ({})",
            self.save,
            match self.save_convention {
                SaveConvention::Argument => "writes into argument",
                SaveConvention::Returned => "returns new blob",
            }
        )
    }
}
