//! Resolution and access errors.
//!
//! Every resolution error is fatal to the attempt: there is no retry, no
//! partial result and no fallback. The one condition absorbed during probing
//! (a candidate whose blob yields no structured value) never reaches this
//! module.

use std::fmt;

use crate::capabilities::Role;
use crate::protocol::ProbeProtocol;

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Resolution attempted before the host is ready.
    #[error("host not ready: {0}")]
    Precondition(String),

    /// A role is still unassigned after every applicable scan.
    #[error("{0}")]
    MissingCapability(MissingCapabilities),

    /// Two candidates classified into the same role within one scan.
    #[error("{0}")]
    AmbiguousCapability(Ambiguity),

    /// The sample provider could not produce a live instance.
    #[error("failed to spawn sample instance")]
    SampleUnavailable(#[source] anyhow::Error),

    /// The empty probe blob could not be built.
    #[error("failed to construct probe blob")]
    ProbeConstruction(#[source] anyhow::Error),

    /// A candidate raised an error when invoked.
    #[error("candidate `{candidate}` failed during probing")]
    InvocationFailed {
        candidate: String,
        #[source]
        source: anyhow::Error,
    },
}

impl ResolveError {
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, ResolveError::AmbiguousCapability(_))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, ResolveError::MissingCapability(_))
    }
}

/// Which roles are unfilled, plus what is known about both slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingCapabilities {
    pub missing: Vec<Role>,
    pub load: Option<String>,
    pub save: Option<String>,
}

impl fmt::Display for MissingCapabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.missing.iter().map(|r| r.to_string()).collect();
        write!(
            f,
            "{} operation not found: L|{} -> S|{}",
            names.join(" and "),
            self.load.as_deref().unwrap_or("none"),
            self.save.as_deref().unwrap_or("none")
        )
    }
}

/// A role claimed by more than one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ambiguity {
    /// The scan in which the duplicate appeared.
    pub protocol: ProbeProtocol,
    pub role: Role,
    pub first: String,
    pub second: String,
}

impl fmt::Display for Ambiguity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.protocol, self.role) {
            (ProbeProtocol::VoidProcedure, Role::Load) => {
                write!(f, "duplicated candidate for loading")?
            }
            (ProbeProtocol::VoidProcedure, Role::Save) => {
                write!(f, "duplicated candidate for saving")?
            }
            (ProbeProtocol::Returning, _) => {
                write!(f, "duplicated save method (post-threshold)")?
            }
        }
        write!(f, ": `{}` and `{}`", self.first, self.second)
    }
}

/// Failures while using resolved capabilities on a live entity.
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    #[error("entity state must be a compound, got {0}")]
    NotCompound(&'static str),

    #[error("failed to convert state into a host blob")]
    Conversion(#[source] anyhow::Error),

    #[error("{role} operation `{operation}` failed")]
    Invocation {
        role: Role,
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("save operation `{0}` produced no structured state")]
    NoState(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ambiguity_messages_are_distinct() {
        let load = Ambiguity {
            protocol: ProbeProtocol::VoidProcedure,
            role: Role::Load,
            first: "a".into(),
            second: "b".into(),
        };
        let save = Ambiguity {
            role: Role::Save,
            ..load.clone()
        };
        let post = Ambiguity {
            protocol: ProbeProtocol::Returning,
            role: Role::Save,
            ..load.clone()
        };
        assert!(load.to_string().starts_with("duplicated candidate for loading"));
        assert!(save.to_string().starts_with("duplicated candidate for saving"));
        assert!(post.to_string().contains("post-threshold"));
        assert!(post.to_string().ends_with("`a` and `b`"));
    }

    #[test]
    fn test_missing_message_names_roles_and_slots() {
        let missing = MissingCapabilities {
            missing: vec![Role::Save],
            load: Some("public void a(StateBlob)".into()),
            save: None,
        };
        assert_eq!(
            missing.to_string(),
            "save operation not found: L|public void a(StateBlob) -> S|none"
        );

        let both = MissingCapabilities {
            missing: vec![Role::Load, Role::Save],
            load: None,
            save: None,
        };
        assert!(both.to_string().starts_with("load and save operation not found"));
    }
}
