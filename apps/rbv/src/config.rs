//! # Server Configuration
//!
//! `ServerConfig` is assembled in three layers, each overriding the last:
//! built-in defaults, `RBV_*` environment variables, then command-line flags.
//!
//! Scoring weights and tier thresholds are not configurable.

use rbv_core::MissingRatingPolicy;
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::time::Duration;
use thiserror::Error;

/// Default listen address.
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Default cap on concurrently held sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 1024;

/// Default idle time after which a session is dropped (30 minutes).
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

pub const ENV_BIND: &str = "RBV_BIND";
pub const ENV_API_KEY: &str = "RBV_API_KEY";
pub const ENV_RATE_LIMIT: &str = "RBV_RATE_LIMIT";
pub const ENV_MAX_SESSIONS: &str = "RBV_MAX_SESSIONS";
pub const ENV_POLICY: &str = "RBV_POLICY";
pub const ENV_SESSION_TTL: &str = "RBV_SESSION_TTL";

/// A configuration value that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value '{value}' for {source_name}: {reason}")]
pub struct ConfigError {
    pub source_name: String,
    pub value: String,
    pub reason: String,
}

impl ConfigError {
    fn new(source_name: &str, value: &str, reason: impl ToString) -> Self {
        Self {
            source_name: source_name.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Settings for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Required API key. `None` disables authentication.
    pub api_key: Option<String>,
    /// Requests per second across all clients. `None` disables limiting.
    pub rate_limit: Option<NonZeroU32>,
    pub max_sessions: usize,
    /// Policy given to every new session.
    pub policy: MissingRatingPolicy,
    /// Sessions idle for longer than this are dropped.
    pub session_ttl: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            api_key: None,
            rate_limit: None,
            max_sessions: DEFAULT_MAX_SESSIONS,
            policy: MissingRatingPolicy::RequireAll,
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }
}

/// Values given on the command line. `None` keeps the lower layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub bind: Option<SocketAddr>,
    pub api_key: Option<String>,
    pub rate_limit: Option<NonZeroU32>,
    pub max_sessions: Option<usize>,
    pub policy: Option<MissingRatingPolicy>,
    pub session_ttl: Option<Duration>,
}

impl ServerConfig {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overlaid with variables from `lookup`.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(raw) = get(ENV_BIND) {
            config.bind = parse_bind(ENV_BIND, &raw)?;
        }
        if let Some(raw) = get(ENV_API_KEY) {
            config.api_key = Some(raw);
        }
        if let Some(raw) = get(ENV_RATE_LIMIT) {
            config.rate_limit = Some(parse_rate_limit(ENV_RATE_LIMIT, &raw)?);
        }
        if let Some(raw) = get(ENV_MAX_SESSIONS) {
            config.max_sessions = parse_max_sessions(ENV_MAX_SESSIONS, &raw)?;
        }
        if let Some(raw) = get(ENV_POLICY) {
            config.policy = parse_policy(ENV_POLICY, &raw)?;
        }
        if let Some(raw) = get(ENV_SESSION_TTL) {
            config.session_ttl = parse_session_ttl(ENV_SESSION_TTL, &raw)?;
        }

        Ok(config)
    }

    /// Apply command-line overrides.
    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(bind) = overrides.bind {
            self.bind = bind;
        }
        if let Some(key) = overrides.api_key {
            self.api_key = Some(key);
        }
        if let Some(limit) = overrides.rate_limit {
            self.rate_limit = Some(limit);
        }
        if let Some(max) = overrides.max_sessions {
            self.max_sessions = max;
        }
        if let Some(policy) = overrides.policy {
            self.policy = policy;
        }
        if let Some(ttl) = overrides.session_ttl {
            self.session_ttl = ttl;
        }
        self
    }
}

// =============================================================================
// PARSERS
// =============================================================================

pub fn parse_bind(source: &str, raw: &str) -> Result<SocketAddr, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|e| ConfigError::new(source, raw, e))
}

pub fn parse_rate_limit(source: &str, raw: &str) -> Result<NonZeroU32, ConfigError> {
    raw.trim()
        .parse::<NonZeroU32>()
        .map_err(|_| ConfigError::new(source, raw, "expected a positive number of requests per second"))
}

pub fn parse_max_sessions(source: &str, raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(0) | Err(_) => Err(ConfigError::new(
            source,
            raw,
            "expected a positive session count",
        )),
        Ok(n) => Ok(n),
    }
}

/// Whole seconds, at least one.
pub fn parse_session_ttl(source: &str, raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => Err(ConfigError::new(
            source,
            raw,
            "expected a positive number of seconds",
        )),
        Ok(secs) => Ok(Duration::from_secs(secs)),
    }
}

pub fn parse_policy(source: &str, raw: &str) -> Result<MissingRatingPolicy, ConfigError> {
    raw.parse().map_err(|e: String| ConfigError::new(source, raw, e))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = ServerConfig::from_lookup(lookup(&[]));
        assert_eq!(config, Ok(ServerConfig::default()));

        let config = ServerConfig::default();
        assert_eq!(config.bind.to_string(), DEFAULT_BIND);
        assert_eq!(config.max_sessions, DEFAULT_MAX_SESSIONS);
        assert_eq!(config.policy, MissingRatingPolicy::RequireAll);
        assert!(config.api_key.is_none());
        assert!(config.rate_limit.is_none());
        assert_eq!(config.session_ttl, DEFAULT_SESSION_TTL);
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[
            (ENV_BIND, "0.0.0.0:9000"),
            (ENV_API_KEY, "secret"),
            (ENV_RATE_LIMIT, "20"),
            (ENV_MAX_SESSIONS, "16"),
            (ENV_POLICY, "midpoint"),
            (ENV_SESSION_TTL, "90"),
        ]))
        .unwrap_or_default();

        assert_eq!(config.bind.port(), 9000);
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.rate_limit.map(NonZeroU32::get), Some(20));
        assert_eq!(config.max_sessions, 16);
        assert_eq!(config.policy, MissingRatingPolicy::Midpoint);
        assert_eq!(config.session_ttl, Duration::from_secs(90));
    }

    #[test]
    fn empty_variables_are_unset() {
        let config = ServerConfig::from_lookup(lookup(&[(ENV_API_KEY, ""), (ENV_BIND, "  ")]));
        assert_eq!(config, Ok(ServerConfig::default()));
    }

    #[test]
    fn invalid_values_are_errors() {
        for (name, value) in [
            (ENV_BIND, "localhost"),
            (ENV_RATE_LIMIT, "0"),
            (ENV_RATE_LIMIT, "fast"),
            (ENV_MAX_SESSIONS, "0"),
            (ENV_POLICY, "lenient"),
            (ENV_SESSION_TTL, "0"),
            (ENV_SESSION_TTL, "1.5"),
        ] {
            let result = ServerConfig::from_lookup(lookup(&[(name, value)]));
            let err = result.err();
            assert!(err.is_some(), "{name}={value} should fail");
            assert_eq!(err.map(|e| e.source_name), Some(name.to_string()));
        }
    }

    #[test]
    fn overrides_take_precedence() {
        let base = ServerConfig::from_lookup(lookup(&[(ENV_MAX_SESSIONS, "8"), (ENV_API_KEY, "env")]))
            .unwrap_or_default();
        let config = base.with_overrides(ConfigOverrides {
            api_key: Some("flag".into()),
            policy: Some(MissingRatingPolicy::Midpoint),
            session_ttl: Some(Duration::from_secs(5)),
            ..ConfigOverrides::default()
        });

        assert_eq!(config.api_key.as_deref(), Some("flag"));
        assert_eq!(config.max_sessions, 8);
        assert_eq!(config.policy, MissingRatingPolicy::Midpoint);
        assert_eq!(config.session_ttl, Duration::from_secs(5));
    }
}
