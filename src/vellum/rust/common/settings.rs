// SPDX-License-Identifier: GPL-3.0-or-later
use once_cell::sync::OnceCell;
use std::env;
use tracing::warn;
use tracing_subscriber::EnvFilter;

pub const LIVENESS_CHECKS_VAR: &str = "VELLUM_LIVENESS_CHECKS";
pub const LOG_VAR: &str = "VELLUM_LOG";

static CONFIG: OnceCell<Config> = OnceCell::new();

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Warn when drawing through a context or pattern whose surface wrapper
    /// has already been released.
    pub liveness_checks: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            liveness_checks: cfg!(debug_assertions),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = env::var(LIVENESS_CHECKS_VAR) {
            match parse_flag(&value) {
                Some(flag) => config.liveness_checks = flag,
                None => warn!("Ignoring invalid {LIVENESS_CHECKS_VAR}={value:?}"),
            }
        }
        config
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

/// Installs the configuration. Returns it back if one is already active.
pub fn configure(config: Config) -> Result<(), Config> {
    CONFIG.set(config)
}

/// The active configuration, loaded from the environment on first use.
pub fn config() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}

/// Sets up log output filtered by `VELLUM_LOG`, defaulting to warnings. Does
/// nothing if the process already has a subscriber.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag(" On "), Some(true));
        assert_eq!(parse_flag("false"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
