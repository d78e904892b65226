//! TOML configuration loading.
//!
//! Every section and field is optional; anything missing falls back to
//! its documented default, and an unreadable or unparsable file logs a
//! warning and yields the full default configuration. The daemon always
//! comes up.

use std::fs;

use serde::Deserialize;

use crate::localization::LocalizerConfig;
use crate::threads::LocalizationThreadConfig;

/// Default config file locations, tried in order when no explicit path
/// is given.
const DEFAULT_PATHS: [&str; 2] = ["garuda-loc.toml", "/etc/garuda-loc.toml"];

/// Top-level configuration.
///
/// The particle count is deliberately absent: the host builds the
/// belief engine and sizes its particle set before handing it over.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Localizer parameters (motion gate, preprocessing, frames, seeds).
    pub localizer: LocalizerConfig,
    /// Estimate output.
    pub output: OutputConfig,
    /// Thread timing.
    pub threads: ThreadsConfig,
}

/// Estimate output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// UDP target for estimate and diagnostic messages.
    /// Default: "127.0.0.1:6710"
    pub estimate_address: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            estimate_address: "127.0.0.1:6710".to_string(),
        }
    }
}

/// Thread timing configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ThreadsConfig {
    /// Upper bound on the per-scan wait for frame availability.
    /// Default: 500ms
    pub transform_wait_ms: u64,
    /// Period of the correction re-broadcast timer. Default: 500ms
    pub rebroadcast_period_ms: u64,
}

impl Default for ThreadsConfig {
    fn default() -> Self {
        Self {
            transform_wait_ms: 500,
            rebroadcast_period_ms: 500,
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the first readable
    /// default location when `path` is `None`.
    pub fn load(path: Option<&str>) -> Self {
        match path {
            Some(path) => match fs::read_to_string(path) {
                Ok(contents) => match basic_toml::from_str(&contents) {
                    Ok(cfg) => {
                        log::info!("Loaded config from {}", path);
                        cfg
                    }
                    Err(e) => {
                        log::warn!("Failed to parse config {}: {}", path, e);
                        Config::default()
                    }
                },
                Err(e) => {
                    log::warn!("Failed to read config {}: {}", path, e);
                    Config::default()
                }
            },
            None => {
                for path in &DEFAULT_PATHS {
                    if let Ok(contents) = fs::read_to_string(path) {
                        if let Ok(cfg) = basic_toml::from_str(&contents) {
                            log::info!("Loaded config from {}", path);
                            return cfg;
                        }
                    }
                }
                Config::default()
            }
        }
    }

    /// Build the localization thread configuration.
    pub fn localization_thread_config(&self) -> LocalizationThreadConfig {
        LocalizationThreadConfig {
            localizer: self.localizer.clone(),
            transform_wait_ms: self.threads.transform_wait_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let cfg: Config = basic_toml::from_str("").unwrap();
        assert_eq!(cfg.output.estimate_address, "127.0.0.1:6710");
        assert_eq!(cfg.threads.transform_wait_ms, 500);
        assert!(cfg.localizer.publish_after_update);
        assert!((cfg.localizer.motion_gate.translation_threshold - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_partial_override() {
        let toml = r#"
            [localizer.motion_gate]
            translation_threshold = 0.5

            [localizer.publisher.frames]
            map = "arena"

            [output]
            estimate_address = "10.0.0.3:7000"
        "#;
        let cfg: Config = basic_toml::from_str(toml).unwrap();

        assert!((cfg.localizer.motion_gate.translation_threshold - 0.5).abs() < 1e-6);
        // Untouched sibling keeps its default.
        assert!((cfg.localizer.motion_gate.rotation_threshold - 0.4).abs() < 1e-6);
        assert_eq!(cfg.localizer.publisher.frames.map, "arena");
        assert_eq!(cfg.localizer.publisher.frames.world, "world");
        assert_eq!(cfg.output.estimate_address, "10.0.0.3:7000");
    }

    #[test]
    fn test_initial_pose_section() {
        let toml = r#"
            [localizer.initial_pose]
            x = 1.0
            y = 2.0
            z = 0.5
            roll = 0.0
            pitch = 0.0
            yaw = 1.2
        "#;
        let cfg: Config = basic_toml::from_str(toml).unwrap();

        let pose = cfg.localizer.initial_pose.expect("pose set");
        assert!((pose.x - 1.0).abs() < 1e-6);
        assert!((pose.yaw - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let cfg = Config::load(Some("/nonexistent/garuda-loc.toml"));
        assert_eq!(cfg.threads.rebroadcast_period_ms, 500);
    }

    #[test]
    fn test_thread_config_builder() {
        let toml = r#"
            [threads]
            transform_wait_ms = 250
        "#;
        let cfg: Config = basic_toml::from_str(toml).unwrap();
        let thread_cfg = cfg.localization_thread_config();
        assert_eq!(thread_cfg.transform_wait_ms, 250);
    }
}
