//! Protocol variants.
//!
//! Older hosts persist state through two same-shaped void procedures; newer
//! hosts keep the void load procedure but moved save to a method returning
//! the blob. Which probing procedure applies is decided once per resolution
//! from the host version.

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use state_probe_types::{HostVersion, MethodShape, VersionThreshold};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeProtocol {
    /// `void m(blob)` for both roles. Hosts at or below the threshold.
    VoidProcedure,
    /// Void load plus `blob m(blob)` save. Hosts past the threshold.
    Returning,
}

impl ProbeProtocol {
    pub fn for_version(version: &HostVersion, threshold: &VersionThreshold) -> Self {
        if threshold.is_exceeded_by(version) {
            ProbeProtocol::Returning
        } else {
            ProbeProtocol::VoidProcedure
        }
    }

    /// Candidate shapes scanned by this protocol, in scan order.
    pub fn shapes(&self) -> Vec<MethodShape> {
        match self {
            ProbeProtocol::VoidProcedure => vec![MethodShape::void_procedure()],
            ProbeProtocol::Returning => {
                vec![MethodShape::void_procedure(), MethodShape::returning_blob()]
            }
        }
    }
}

impl fmt::Display for ProbeProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeProtocol::VoidProcedure => f.write_str("void-procedure"),
            ProbeProtocol::Returning => f.write_str("returning"),
        }
    }
}

impl FromStr for ProbeProtocol {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "void" | "void-procedure" | "void_procedure" | "legacy" => {
                Ok(ProbeProtocol::VoidProcedure)
            }
            "returning" | "returning-method" | "modern" => Ok(ProbeProtocol::Returning),
            other => Err(anyhow!(
                "unknown probe protocol '{}' (expected 'void' or 'returning')",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_for_version() {
        let t = VersionThreshold::default();
        assert_eq!(
            ProbeProtocol::for_version(&HostVersion::new(1, 8, 3), &t),
            ProbeProtocol::VoidProcedure
        );
        assert_eq!(
            ProbeProtocol::for_version(&HostVersion::new(1, 9, 0), &t),
            ProbeProtocol::Returning
        );
        assert_eq!(
            ProbeProtocol::for_version(&HostVersion::new(2, 0, 0), &t),
            ProbeProtocol::Returning
        );
    }

    #[test]
    fn test_returning_scans_void_shape_first() {
        let shapes = ProbeProtocol::Returning.shapes();
        assert_eq!(shapes[0], MethodShape::void_procedure());
        assert_eq!(shapes[1], MethodShape::returning_blob());
        assert_eq!(ProbeProtocol::VoidProcedure.shapes().len(), 1);
    }

    #[test]
    fn test_protocol_from_str() {
        assert_eq!(
            "Legacy".parse::<ProbeProtocol>().unwrap(),
            ProbeProtocol::VoidProcedure
        );
        assert_eq!(
            "returning".parse::<ProbeProtocol>().unwrap(),
            ProbeProtocol::Returning
        );
        assert!("sideways".parse::<ProbeProtocol>().is_err());
    }
}
