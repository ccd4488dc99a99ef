//! Environment configuration

use serde::{Deserialize, Serialize};
use spire_bridge::BridgeConfig;
use std::time::Duration;
use tracing::warn;

pub const ENV_HOST: &str = "STS_AI_HOST";
pub const ENV_PORT: &str = "STS_AI_PORT";
pub const ENV_MAX_STEPS: &str = "STS_AI_MAX_STEPS";
pub const ENV_NORMALIZE: &str = "STS_AI_NORMALIZE";
pub const ENV_STEP_TIMEOUT_MS: &str = "STS_AI_STEP_TIMEOUT_MS";

/// Configuration for [`crate::SpireEnv`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvConfig {
    /// Connection to the game mod
    pub bridge: BridgeConfig,
    /// Scale player scalars into `[0, 1]`
    pub normalize: bool,
    /// Steps after which an episode is truncated
    pub max_steps: u32,
    /// Snapshots inspected by `reset` before giving up
    pub reset_max_retries: u32,
    /// Pause between reset polls
    pub reset_backoff: Duration,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            bridge: BridgeConfig::default(),
            normalize: true,
            max_steps: 1000,
            reset_max_retries: 20,
            reset_backoff: Duration::from_millis(100),
        }
    }
}

impl EnvConfig {
    /// Defaults overlaid with `STS_AI_*` variables from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`
    ///
    /// Values that fail to parse are logged and skipped.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup(ENV_HOST).filter(|h| !h.trim().is_empty()) {
            config.bridge.host = host.trim().to_string();
        }
        if let Some(port) = parse(&lookup, ENV_PORT) {
            config.bridge.port = port;
        }
        if let Some(max_steps) = parse(&lookup, ENV_MAX_STEPS) {
            config.max_steps = max_steps;
        }
        if let Some(normalize) = parse(&lookup, ENV_NORMALIZE) {
            config.normalize = normalize;
        }
        if let Some(ms) = parse::<u64, _>(&lookup, ENV_STEP_TIMEOUT_MS) {
            // 0 disables the deadline
            config.bridge.response_timeout = (ms > 0).then(|| Duration::from_millis(ms));
        }

        config
    }
}

fn parse<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring invalid {}={:?}: {}", key, raw, e);
            None
        }
    }
}
