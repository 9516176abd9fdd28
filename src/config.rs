//! Runtime configuration sourced from the environment.
//!
//! Supported:
//! - BONESCOPE_ANALYSIS_DELAY_MS (artificial "analysis" latency, default 1500)
//! - BONESCOPE_SEND_DELAY_MS (artificial "sending" latency, default 1500)
//! - BONESCOPE_EXPORT_DIR (where `model_metrics.csv` is written, default ".")
//! - BONESCOPE_SEED (optional u64; seeds every RNG for reproducible demos)
//!
//! Logging variables (`BONESCOPE_LOG_MODE`, `BONESCOPE_LOG_FILE`, `RUST_LOG`)
//! are read directly in `main.rs` because they must be applied before anything
//! else runs.

use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_DELAY_MS: u64 = 1500;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Delay before a score is emitted for an uploaded image
    pub analysis_delay: Duration,

    /// Delay of the simulated email transport
    pub send_delay: Duration,

    /// Directory receiving metric exports
    pub export_dir: PathBuf,

    /// Fixed RNG seed, if any
    pub seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            analysis_delay: Duration::from_millis(DEFAULT_DELAY_MS),
            send_delay: Duration::from_millis(DEFAULT_DELAY_MS),
            export_dir: PathBuf::from("."),
            seed: None,
        }
    }
}

impl AppConfig {
    /// Load config overrides from environment (best-effort).
    ///
    /// Unparsable values are ignored and the default is kept.
    #[must_use]
    pub fn from_env_or_default() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Configuration for tests: no artificial delays, fixed seed.
    #[must_use]
    pub fn instant(seed: u64) -> Self {
        Self {
            analysis_delay: Duration::ZERO,
            send_delay: Duration::ZERO,
            export_dir: PathBuf::from("."),
            seed: Some(seed),
        }
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(ms) = lookup("BONESCOPE_ANALYSIS_DELAY_MS").and_then(|v| v.trim().parse::<u64>().ok()) {
            cfg.analysis_delay = Duration::from_millis(ms);
        }

        if let Some(ms) = lookup("BONESCOPE_SEND_DELAY_MS").and_then(|v| v.trim().parse::<u64>().ok()) {
            cfg.send_delay = Duration::from_millis(ms);
        }

        if let Some(dir) = lookup("BONESCOPE_EXPORT_DIR") {
            let dir = dir.trim();
            if !dir.is_empty() {
                cfg.export_dir = PathBuf::from(dir);
            }
        }

        cfg.seed = lookup("BONESCOPE_SEED").and_then(|v| v.trim().parse::<u64>().ok());

        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let cfg = AppConfig::from_lookup(lookup_from(&[]));
        assert_eq!(cfg.analysis_delay, Duration::from_millis(1500));
        assert_eq!(cfg.send_delay, Duration::from_millis(1500));
        assert_eq!(cfg.export_dir, PathBuf::from("."));
        assert!(cfg.seed.is_none());
    }

    #[test]
    fn test_overrides() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("BONESCOPE_ANALYSIS_DELAY_MS", "0"),
            ("BONESCOPE_SEND_DELAY_MS", " 250 "),
            ("BONESCOPE_EXPORT_DIR", "/tmp/exports"),
            ("BONESCOPE_SEED", "42"),
        ]));
        assert_eq!(cfg.analysis_delay, Duration::ZERO);
        assert_eq!(cfg.send_delay, Duration::from_millis(250));
        assert_eq!(cfg.export_dir, PathBuf::from("/tmp/exports"));
        assert_eq!(cfg.seed, Some(42));
    }

    #[test]
    fn test_invalid_values_are_ignored() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("BONESCOPE_ANALYSIS_DELAY_MS", "soon"),
            ("BONESCOPE_EXPORT_DIR", "   "),
            ("BONESCOPE_SEED", "-1"),
        ]));
        assert_eq!(cfg.analysis_delay, Duration::from_millis(1500));
        assert_eq!(cfg.export_dir, PathBuf::from("."));
        assert!(cfg.seed.is_none());
    }
}
