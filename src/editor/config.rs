//! Editor configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::Result;
use crate::history::DEFAULT_THRESHOLD_MS;

/// Tunables for an editing session. Missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Window in which repeated transforms merge into one history entry
    pub coalesce_threshold_ms: u64,
    /// Degrees of longitude/latitude per arrow press
    pub position_step: f64,
    /// Degrees per arrow press
    pub rotation_step: f64,
    pub scale_step: f64,
    pub enabled_on_start: bool,
    pub remote_port: u16,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            coalesce_threshold_ms: DEFAULT_THRESHOLD_MS,
            position_step: 0.001,
            rotation_step: 1.0,
            scale_step: 1.0,
            enabled_on_start: true,
            remote_port: 9743,
        }
    }
}

impl EditorConfig {
    /// Parse from JSON and validate.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file, or defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Steps must be positive and finite.
    pub fn validate(&self) -> Result<()> {
        for (name, step) in [
            ("position_step", self.position_step),
            ("rotation_step", self.rotation_step),
            ("scale_step", self.scale_step),
        ] {
            if !step.is_finite() || step <= 0.0 {
                return Err(Error::Config(format!("{} must be positive, got {}", name, step)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.coalesce_threshold_ms, 100);
        assert_eq!(config.position_step, 0.001);
        assert_eq!(config.rotation_step, 1.0);
        assert_eq!(config.scale_step, 1.0);
        assert!(config.enabled_on_start);
        assert_eq!(config.remote_port, 9743);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = EditorConfig::from_json(r#"{"rotation_step": 5.0, "enabled_on_start": false}"#).unwrap();
        assert_eq!(config.rotation_step, 5.0);
        assert!(!config.enabled_on_start);
        assert_eq!(config.position_step, 0.001);
    }

    #[test]
    fn test_rejects_bad_step() {
        let err = EditorConfig::from_json(r#"{"scale_step": 0}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EditorConfig::load(&dir.path().join("editor.json")).unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.json");
        std::fs::write(&path, r#"{"remote_port": 9000}"#).unwrap();
        assert_eq!(EditorConfig::load(&path).unwrap().remote_port, 9000);
    }
}
