//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated
//! configuration.

use std::net::SocketAddr;

use cassino::contact::DEFAULT_CONTACT_THRESHOLD;
use cassino::game::MatchRules;
use cassino::{BUILD_CEILING, MAX_BUILD_CARDS};

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Default rule parameters for new matches
    pub rules: MatchRules,
    /// Contact resolution radius in layout units
    pub contact_threshold: f64,
    /// Number of matches to create on startup
    pub num_matches: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// `bind_override` and `num_matches_override` come from CLI args and
    /// win over the corresponding environment variables.
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        num_matches_override: Option<usize>,
    ) -> Self {
        let bind = bind_override
            .or_else(|| {
                std::env::var("SERVER_BIND")
                    .ok()
                    .and_then(|s| s.parse().ok())
            })
            .unwrap_or_else(|| {
                "127.0.0.1:7878"
                    .parse()
                    .expect("Default bind address is valid")
            });

        let rules = MatchRules {
            build_ceiling: parse_env_or("BUILD_CEILING", BUILD_CEILING),
            completion_target: parse_env_or("COMPLETION_TARGET", BUILD_CEILING),
            max_build_cards: parse_env_or("MAX_BUILD_CARDS", MAX_BUILD_CARDS),
        };

        let contact_threshold = parse_env_or("CONTACT_THRESHOLD", DEFAULT_CONTACT_THRESHOLD);

        let num_matches = num_matches_override.unwrap_or_else(|| parse_env_or("START_MATCHES", 1));

        ServerConfig {
            bind,
            rules,
            contact_threshold,
            num_matches,
        }
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_rules(&self.rules)?;

        if !self.contact_threshold.is_finite() || self.contact_threshold <= 0.0 {
            return Err(ConfigError::Invalid {
                var: "CONTACT_THRESHOLD".to_string(),
                reason: "Must be a positive, finite distance".to_string(),
            });
        }

        Ok(())
    }
}

/// Validate a rule set, whether it came from the environment or from a
/// match-creation request merging client overrides over the defaults.
pub fn validate_rules(rules: &MatchRules) -> Result<(), ConfigError> {
    if rules.build_ceiling < 2 {
        return Err(ConfigError::Invalid {
            var: "BUILD_CEILING".to_string(),
            reason: "Must be at least 2 (the smallest combination is 1+1)".to_string(),
        });
    }

    if rules.build_ceiling > 10 {
        return Err(ConfigError::Invalid {
            var: "BUILD_CEILING".to_string(),
            reason: "Must be at most 10 (no hand card can capture a higher build)".to_string(),
        });
    }

    if rules.completion_target > rules.build_ceiling {
        return Err(ConfigError::Invalid {
            var: "COMPLETION_TARGET".to_string(),
            reason: format!("Cannot exceed the build ceiling ({})", rules.build_ceiling),
        });
    }

    if rules.max_build_cards < 2 {
        return Err(ConfigError::Invalid {
            var: "MAX_BUILD_CARDS".to_string(),
            reason: "Must be at least 2 (a build starts with two cards)".to_string(),
        });
    }

    Ok(())
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> ServerConfig {
        ServerConfig {
            bind: "127.0.0.1:7878".parse().unwrap(),
            rules: MatchRules::default(),
            contact_threshold: 60.0,
            num_matches: 1,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_config_validation_ceiling_too_small() {
        let mut config = base_config();
        config.rules.build_ceiling = 1;
        config.rules.completion_target = 1;

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
        assert!(err.to_string().contains("BUILD_CEILING"));
    }

    #[test]
    fn test_config_validation_target_above_ceiling() {
        let mut config = base_config();
        config.rules.completion_target = config.rules.build_ceiling + 1;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("COMPLETION_TARGET"));
    }

    #[test]
    fn test_rule_validation_rejects_out_of_range_overrides() {
        let rules = MatchRules {
            build_ceiling: 0,
            completion_target: 200,
            max_build_cards: 5,
        };
        let err = validate_rules(&rules).unwrap_err();
        assert!(err.to_string().contains("BUILD_CEILING"));
    }

    #[test]
    fn test_config_validation_threshold_not_positive() {
        let mut config = base_config();
        config.contact_threshold = 0.0;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("CONTACT_THRESHOLD"));
    }
}
