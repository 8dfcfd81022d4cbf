//! Environment-driven configuration, shared by the controller, bidder, and
//! snapshot binaries. CLI flags (see `src/bin/*.rs`) override the
//! corresponding environment variable; both fall back to the defaults below.

use crate::announcer::{DEFAULT_ANNOUNCE_PERIOD, DEFAULT_ANNOUNCEMENTS_SUBJECT};
use crate::dispatcher::DEFAULT_DISPATCH_PERIOD;
use crate::observer::default_ttl_for;
use std::time::Duration;

fn default_broker_url() -> String {
    "nats://127.0.0.1:4222".to_string()
}

/// Process configuration, assembled from environment variables prefixed
/// `PACER_`. Durations use `humantime`'s syntax (`"5s"`, `"500ms"`, `"2m"`).
#[derive(Debug, Clone)]
pub struct Config {
    pub broker_url: String,
    pub announcements_subject: String,
    pub announce_period: Duration,
    pub observer_ttl: Duration,
    pub dispatch_period: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            broker_url: default_broker_url(),
            announcements_subject: DEFAULT_ANNOUNCEMENTS_SUBJECT.to_string(),
            announce_period: DEFAULT_ANNOUNCE_PERIOD,
            observer_ttl: default_ttl_for(DEFAULT_ANNOUNCE_PERIOD),
            dispatch_period: DEFAULT_DISPATCH_PERIOD,
        }
    }
}

impl Config {
    /// Reads `PACER_BROKER_URL`, `PACER_ANNOUNCEMENTS_SUBJECT`,
    /// `PACER_ANNOUNCE_PERIOD`, `PACER_OBSERVER_TTL`, and
    /// `PACER_DISPATCH_PERIOD` from the process environment, falling back to
    /// defaults for anything unset. Per the Open Question resolution in
    /// this crate's design notes, an unset observer TTL defaults to twice
    /// the (possibly overridden) announce period rather than matching it.
    pub fn from_env() -> Self {
        let mut config = Config::default();
        if let Ok(v) = std::env::var("PACER_BROKER_URL") {
            config.broker_url = v;
        }
        if let Ok(v) = std::env::var("PACER_ANNOUNCEMENTS_SUBJECT") {
            config.announcements_subject = v;
        }
        if let Ok(v) = std::env::var("PACER_ANNOUNCE_PERIOD") {
            Self::parse_into(&v, &mut config.announce_period, "PACER_ANNOUNCE_PERIOD");
        }

        config.observer_ttl = default_ttl_for(config.announce_period);
        if let Ok(v) = std::env::var("PACER_OBSERVER_TTL") {
            Self::parse_into(&v, &mut config.observer_ttl, "PACER_OBSERVER_TTL");
        }

        if let Ok(v) = std::env::var("PACER_DISPATCH_PERIOD") {
            Self::parse_into(&v, &mut config.dispatch_period, "PACER_DISPATCH_PERIOD");
        }
        config
    }

    fn parse_into(raw: &str, slot: &mut Duration, var_name: &str) {
        match humantime::parse_duration(raw) {
            Ok(d) => *slot = d,
            Err(e) => tracing::warn!(var_name, error = %e, "ignoring invalid duration"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_derive_observer_ttl_from_announce_period() {
        let config = Config::default();
        assert_eq!(config.observer_ttl, config.announce_period * 2);
    }

    #[test]
    fn from_env_falls_back_to_defaults_when_unset() {
        for key in [
            "PACER_BROKER_URL",
            "PACER_ANNOUNCEMENTS_SUBJECT",
            "PACER_ANNOUNCE_PERIOD",
            "PACER_OBSERVER_TTL",
            "PACER_DISPATCH_PERIOD",
        ] {
            std::env::remove_var(key);
        }
        let config = Config::from_env();
        assert_eq!(config.broker_url, default_broker_url());
        assert_eq!(config.observer_ttl, DEFAULT_ANNOUNCE_PERIOD * 2);
    }
}
