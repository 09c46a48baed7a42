//! Application directory layout and save slots

use chrono::{DateTime, Local};
use metaparser_core::{BridgeConfig, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Timestamp format shown for occupied save slots
const SLOT_TIME_FORMAT: &str = "%d-%m-%Y %H:%M";

/// State of one numbered save slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveSlot {
    /// Slot number, starting at 1
    pub number: u32,
    /// Last modification time, `None` when nothing is saved
    pub saved_at: Option<String>,
}

impl SaveSlot {
    /// Save name the engine is given for this slot
    pub fn file_name(number: u32) -> String {
        format!("{}.sav", number)
    }
}

/// Paths inside the application directory
#[derive(Debug, Clone)]
pub struct StorageLayout {
    root: PathBuf,
    game_dir_name: String,
    autosave_name: String,
    slots: u32,
}

impl StorageLayout {
    /// The root is made absolute here: the engine changes the working
    /// directory to the game directory once it starts.
    pub fn new(config: &BridgeConfig) -> Self {
        let root = std::path::absolute(&config.app_dir).unwrap_or_else(|e| {
            warn!("Cannot resolve {}: {}", config.app_dir.display(), e);
            config.app_dir.clone()
        });
        Self {
            root,
            game_dir_name: config.game_dir_name.clone(),
            autosave_name: config.autosave_name.clone(),
            slots: config.save_slots,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn game_dir(&self) -> PathBuf {
        self.root.join(&self.game_dir_name)
    }

    pub fn autosave_name(&self) -> &str {
        &self.autosave_name
    }

    pub fn autosave(&self) -> PathBuf {
        self.root.join(&self.autosave_name)
    }

    pub fn has_autosave(&self) -> bool {
        self.autosave().is_file()
    }

    pub fn slot_path(&self, number: u32) -> PathBuf {
        self.root.join(SaveSlot::file_name(number))
    }

    /// Remove the autosave. Returns whether a file was deleted.
    pub fn clear_autosave(&self) -> Result<bool> {
        let path = self.autosave();
        match std::fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed autosave {}", path.display());
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => {
                warn!("Failed to delete autosave {}: {}", path.display(), e);
                Err(e.into())
            }
        }
    }

    /// Describe every numbered slot, in order
    pub fn save_slots(&self) -> Vec<SaveSlot> {
        (1..=self.slots)
            .map(|number| SaveSlot {
                number,
                saved_at: slot_timestamp(&self.slot_path(number)),
            })
            .collect()
    }
}

fn slot_timestamp(path: &Path) -> Option<String> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    let local: DateTime<Local> = modified.into();
    Some(local.format(SLOT_TIME_FORMAT).to_string())
}
