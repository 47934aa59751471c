//! Host version parsing.
//!
//! Hosts report their version either as a package tag (`v1_8_R3`) or as a
//! dotted release (`1.12.2`). Only `major` and `minor` take part in protocol
//! selection; `revision` is kept for diagnostics.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HostVersion {
    pub major: u32,
    pub minor: u32,
    pub revision: u32,
}

impl HostVersion {
    pub const fn new(major: u32, minor: u32, revision: u32) -> Self {
        Self {
            major,
            minor,
            revision,
        }
    }
}

impl FromStr for HostVersion {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(anyhow!("empty host version"));
        }

        // Package tag form: v1_8_R3
        if let Some(tag) = s.strip_prefix('v') {
            let parts: Vec<&str> = tag.split('_').collect();
            if parts.len() < 2 || parts.len() > 3 {
                return Err(anyhow!("invalid host version tag '{}'", s));
            }
            let major = parse_component(parts[0], s)?;
            let minor = parse_component(parts[1], s)?;
            let revision = match parts.get(2) {
                Some(r) => {
                    let digits = r
                        .strip_prefix('R')
                        .ok_or_else(|| anyhow!("invalid revision in host version tag '{}'", s))?;
                    parse_component(digits, s)?
                }
                None => 0,
            };
            return Ok(Self::new(major, minor, revision));
        }

        // Dotted release form: 1.12.2
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() < 2 || parts.len() > 3 {
            return Err(anyhow!("invalid host version '{}'", s));
        }
        let major = parse_component(parts[0], s)?;
        let minor = parse_component(parts[1], s)?;
        let revision = match parts.get(2) {
            Some(p) => parse_component(p, s)?,
            None => 0,
        };
        Ok(Self::new(major, minor, revision))
    }
}

fn parse_component(part: &str, whole: &str) -> Result<u32> {
    part.parse::<u32>()
        .with_context(|| format!("invalid component '{}' in host version '{}'", part, whole))
}

impl fmt::Display for HostVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}_{}_R{}", self.major, self.minor, self.revision)
    }
}

/// The version boundary between the two host eras.
///
/// A host is past the threshold when `major > self.major` OR
/// `minor > self.minor`. The components are compared independently, not
/// lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionThreshold {
    pub major: u32,
    pub minor: u32,
}

impl VersionThreshold {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    pub fn is_exceeded_by(&self, version: &HostVersion) -> bool {
        version.major > self.major || version.minor > self.minor
    }
}

impl Default for VersionThreshold {
    fn default() -> Self {
        Self::new(1, 8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_package_tag() {
        let v: HostVersion = "v1_8_R3".parse().unwrap();
        assert_eq!(v, HostVersion::new(1, 8, 3));
        let v: HostVersion = "v1_12".parse().unwrap();
        assert_eq!(v, HostVersion::new(1, 12, 0));
    }

    #[test]
    fn test_parse_dotted() {
        let v: HostVersion = "1.12.2".parse().unwrap();
        assert_eq!(v, HostVersion::new(1, 12, 2));
        let v: HostVersion = " 1.8 ".parse().unwrap();
        assert_eq!(v, HostVersion::new(1, 8, 0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<HostVersion>().is_err());
        assert!("v1".parse::<HostVersion>().is_err());
        assert!("v1_8_3".parse::<HostVersion>().is_err());
        assert!("1.x".parse::<HostVersion>().is_err());
        assert!("1.2.3.4".parse::<HostVersion>().is_err());
    }

    #[test]
    fn test_display_uses_tag_form() {
        assert_eq!(HostVersion::new(1, 9, 4).to_string(), "v1_9_R4");
    }

    #[test]
    fn test_threshold_components_are_independent() {
        let t = VersionThreshold::default();
        assert!(!t.is_exceeded_by(&HostVersion::new(1, 8, 9)));
        assert!(!t.is_exceeded_by(&HostVersion::new(1, 7, 0)));
        assert!(t.is_exceeded_by(&HostVersion::new(1, 9, 0)));
        assert!(t.is_exceeded_by(&HostVersion::new(2, 0, 0)));
        // minor alone decides even on an older major
        assert!(t.is_exceeded_by(&HostVersion::new(0, 9, 0)));
    }
}
