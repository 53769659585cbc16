use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ConfigError;

/// Texture filtering preference for the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureMode {
    #[default]
    Linear,
    NearestNeighbour,
}

/// Viewport display toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub show_bounding_box: bool,
    pub show_wireframe: bool,
    pub show_vhots: bool,
    pub texture_mode: TextureMode,
}

/// Editor configuration, persisted as TOML.
///
/// An explicit object passed to whoever needs it — never ambient global
/// state reachable from the codec or resolver.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub install_paths: BTreeSet<String>,
    pub viewport: ViewportConfig,
}

impl EditorConfig {
    /// Load from `path`, falling back to defaults when the file is missing
    /// or malformed. A missing config is the normal first-run state.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(_) => {
                warn!(path = %path.display(), "config file does not exist, using defaults");
                return Self::default();
            }
        };
        match toml::from_str(&text) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %path.display(), %err, "config file is malformed, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "saving config file");
        let text = toml::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = EditorConfig::default();
        config.install_paths.insert("/games/thief2".to_string());
        config.viewport.show_vhots = true;
        config.viewport.texture_mode = TextureMode::NearestNeighbour;
        config.save(&path).unwrap();

        let reloaded = EditorConfig::load(&path);
        assert_eq!(reloaded, config);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = EditorConfig::load("/definitely/not/here/config.toml");
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "this is { not toml").unwrap();
        assert_eq!(EditorConfig::load(&path), EditorConfig::default());
    }
}
