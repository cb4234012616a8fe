// Configuration loading for the Callbridge simulator
//
// The bridge itself reads no files; the simulator accepts a JSON document
// with the same shape as `BridgeConfig` so thresholds and defaults can be
// tried out without rebuilding a host app.

use anyhow::{Context, Result};
use callbridge_core::BridgeConfig;
use std::path::Path;

/// Load from `path`, or fall back to the built-in defaults.
pub fn load(path: Option<&Path>) -> Result<BridgeConfig> {
    let Some(path) = path else {
        return Ok(BridgeConfig::default());
    };

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config = BridgeConfig::from_json(&contents)
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    Ok(config)
}

/// Write the default configuration as pretty JSON.
pub fn write_default(path: &Path) -> Result<()> {
    let contents = serde_json::to_string_pretty(&BridgeConfig::default())
        .context("Failed to serialize config")?;
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write config file {}", path.display()))?;
    Ok(())
}

/// Flattened `key = value` pairs for display
pub fn entries(config: &BridgeConfig) -> Vec<(&'static str, String)> {
    vec![
        ("audio.volume", config.audio.volume.to_string()),
        ("audio.looping", config.audio.looping.to_string()),
        ("pip.min_windowed_level", config.pip.min_windowed_level.to_string()),
        ("pip.min_auto_enter_level", config.pip.min_auto_enter_level.to_string()),
        ("pip.default_aspect", config.pip.default_aspect.to_string()),
        ("command_queue_capacity", config.command_queue_capacity.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_without_path_uses_defaults() {
        assert_eq!(load(None).unwrap(), BridgeConfig::default());
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("callbridge.json");

        write_default(&path).unwrap();
        assert_eq!(load(Some(&path)).unwrap(), BridgeConfig::default());
    }

    #[test]
    fn test_invalid_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"audio":{"volume":3.0}}"#).unwrap();

        let err = load(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("volume"));
    }
}
