//! Environment configuration.

use std::env;

use crate::playback::{TimingConfig, DEFAULT_BASE_INTERVAL_MS, DEFAULT_COMPRESSED_TARGET_MS};

#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub base_interval_ms: Option<u64>,
    pub compressed_target_ms: Option<u64>,
    pub debug: bool,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            base_interval_ms: env_u64_opt("REPLAY_BASE_INTERVAL_MS"),
            compressed_target_ms: env_u64_opt("REPLAY_COMPRESSED_TARGET_MS"),
            debug: env_flag("REPLAY_DEBUG"),
        }
    }

    /// Delay-model constants with environment overrides applied.
    #[must_use]
    pub fn timing(&self) -> TimingConfig {
        TimingConfig {
            base_interval_ms: self.base_interval_ms.unwrap_or(DEFAULT_BASE_INTERVAL_MS),
            compressed_target_ms: self
                .compressed_target_ms
                .unwrap_or(DEFAULT_COMPRESSED_TARGET_MS),
        }
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_u64_opt(key: &str) -> Option<u64> {
    env::var(key).ok().and_then(|value| value.trim().parse().ok())
}
