//! Resolver configuration.
//!
//! Defaults match the known host eras: hosts past `1.8` use the returning
//! protocol. Both the threshold and the protocol can be overridden from the
//! environment:
//!
//! | Variable | Meaning |
//! |---|---|
//! | `STATE_PROBE_THRESHOLD_MAJOR` | threshold major component (default `1`) |
//! | `STATE_PROBE_THRESHOLD_MINOR` | threshold minor component (default `8`) |
//! | `STATE_PROBE_PROTOCOL` | force `void` or `returning` regardless of version |

use state_probe_types::env_utils::{env_string, env_var_or};
use state_probe_types::{HostVersion, VersionThreshold};
use tracing::warn;

use crate::protocol::ProbeProtocol;

pub const ENV_THRESHOLD_MAJOR: &str = "STATE_PROBE_THRESHOLD_MAJOR";
pub const ENV_THRESHOLD_MINOR: &str = "STATE_PROBE_THRESHOLD_MINOR";
pub const ENV_PROTOCOL: &str = "STATE_PROBE_PROTOCOL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolverConfig {
    pub threshold: VersionThreshold,
    /// Skip version-based selection and always use this protocol.
    pub protocol_override: Option<ProbeProtocol>,
}

impl ResolverConfig {
    pub fn from_env() -> Self {
        let defaults = VersionThreshold::default();
        let threshold = VersionThreshold::new(
            env_var_or(ENV_THRESHOLD_MAJOR, defaults.major),
            env_var_or(ENV_THRESHOLD_MINOR, defaults.minor),
        );
        let protocol_override = env_string(ENV_PROTOCOL).and_then(|raw| {
            raw.parse::<ProbeProtocol>()
                .map_err(|e| warn!(value = %raw, error = %e, "ignoring protocol override"))
                .ok()
        });
        Self {
            threshold,
            protocol_override,
        }
    }

    pub fn with_threshold(mut self, threshold: VersionThreshold) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_protocol(mut self, protocol: ProbeProtocol) -> Self {
        self.protocol_override = Some(protocol);
        self
    }

    /// The protocol to probe a host of `version` with.
    pub fn protocol_for(&self, version: &HostVersion) -> ProbeProtocol {
        self.protocol_override
            .unwrap_or_else(|| ProbeProtocol::for_version(version, &self.threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_uses_version() {
        let config = ResolverConfig::default();
        assert_eq!(
            config.protocol_for(&HostVersion::new(1, 8, 3)),
            ProbeProtocol::VoidProcedure
        );
        assert_eq!(
            config.protocol_for(&HostVersion::new(1, 12, 1)),
            ProbeProtocol::Returning
        );
    }

    #[test]
    fn test_override_wins() {
        let config = ResolverConfig::default().with_protocol(ProbeProtocol::VoidProcedure);
        assert_eq!(
            config.protocol_for(&HostVersion::new(1, 12, 1)),
            ProbeProtocol::VoidProcedure
        );
    }

    #[test]
    fn test_custom_threshold() {
        let config = ResolverConfig::default().with_threshold(VersionThreshold::new(1, 12));
        assert_eq!(
            config.protocol_for(&HostVersion::new(1, 12, 2)),
            ProbeProtocol::VoidProcedure
        );
        assert_eq!(
            config.protocol_for(&HostVersion::new(1, 13, 0)),
            ProbeProtocol::Returning
        );
    }

    #[test]
    fn test_from_env() {
        std::env::set_var(ENV_THRESHOLD_MINOR, "11");
        std::env::set_var(ENV_PROTOCOL, "nonsense");
        let config = ResolverConfig::from_env();
        assert_eq!(config.threshold, VersionThreshold::new(1, 11));
        assert_eq!(config.protocol_override, None);

        std::env::set_var(ENV_PROTOCOL, "returning");
        let config = ResolverConfig::from_env();
        assert_eq!(config.protocol_override, Some(ProbeProtocol::Returning));

        std::env::remove_var(ENV_THRESHOLD_MINOR);
        std::env::remove_var(ENV_PROTOCOL);
    }
}
