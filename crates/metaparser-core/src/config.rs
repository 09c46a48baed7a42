//! Bridge configuration

use crate::error::{MetaparserError, Result};
use crate::extension::DEFAULT_SCRIPTS;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration for the engine bridge
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Application directory holding `game/`, `stead/` and save files
    pub app_dir: PathBuf,
    /// Game directory name inside `app_dir` (default: game)
    pub game_dir_name: String,
    /// Scripts the extension loads, relative to `app_dir`
    pub scripts: Vec<String>,
    /// Prefix wrapping player input (default: @metaparser)
    pub command_prefix: String,
    /// Save name used for the automatic save (default: autosave)
    pub autosave_name: String,
    /// Number of numbered save slots (default: 3)
    pub save_slots: u32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            app_dir: PathBuf::from("."),
            game_dir_name: "game".into(),
            scripts: DEFAULT_SCRIPTS.iter().map(|s| s.to_string()).collect(),
            command_prefix: "@metaparser".into(),
            autosave_name: "autosave".into(),
            save_slots: 3,
        }
    }
}

impl BridgeConfig {
    /// Defaults rooted at the given application directory
    pub fn with_app_dir(app_dir: impl Into<PathBuf>) -> Self {
        Self {
            app_dir: app_dir.into(),
            ..Default::default()
        }
    }

    /// Read a JSON config file. Missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| {
            MetaparserError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: BridgeConfig = serde_json::from_str(&data)?;
        debug!("Loaded config from {}", path.display());
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.game_dir_name.trim().is_empty() {
            return Err(MetaparserError::Config("game_dir_name is empty".into()));
        }
        if self.autosave_name.trim().is_empty() {
            return Err(MetaparserError::Config("autosave_name is empty".into()));
        }
        Ok(())
    }

    /// Absolute-or-relative path of the game directory
    pub fn game_dir(&self) -> PathBuf {
        self.app_dir.join(&self.game_dir_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.game_dir_name, "game");
        assert_eq!(config.command_prefix, "@metaparser");
        assert_eq!(config.autosave_name, "autosave");
        assert_eq!(config.save_slots, 3);
        assert_eq!(config.scripts, vec!["stead/tiny3.lua", "stead/metaparser.lua"]);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"app_dir": "/data/metaparser", "save_slots": 5}}"#).unwrap();

        let config = BridgeConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.app_dir, PathBuf::from("/data/metaparser"));
        assert_eq!(config.save_slots, 5);
        assert_eq!(config.autosave_name, "autosave");
        assert_eq!(config.game_dir(), PathBuf::from("/data/metaparser/game"));
    }

    #[test]
    fn test_blank_autosave_name_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"autosave_name": "  "}}"#).unwrap();

        let err = BridgeConfig::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, MetaparserError::Config(_)));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = BridgeConfig::from_json_file(Path::new("/nonexistent/metaparser.json"))
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
