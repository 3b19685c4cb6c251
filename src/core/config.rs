use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

/// Application settings persisted as settings.json. Notification
/// preferences and acknowledgments deliberately live outside this file:
/// they are session state, discarded at teardown.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// How often the background loop re-evaluates the item collection.
    pub scan_interval_seconds: u64,
    /// Custom alert sound; `None` plays the built-in chime.
    #[serde(default)]
    pub sound_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scan_interval_seconds: 5,
            sound_file: None,
        }
    }
}

pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(app_config_dir: PathBuf) -> Self {
        Self {
            config_path: app_config_dir.join("settings.json"),
        }
    }

    pub fn load(&self) -> Settings {
        if self.config_path.exists() {
            if let Ok(content) = fs::read_to_string(&self.config_path) {
                if let Ok(settings) = serde_json::from_str(&content) {
                    return settings;
                }
            }
        }
        Settings::default()
    }

    pub fn save(&self, settings: &Settings) -> io::Result<()> {
        // Ensure directory exists
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.config_path, content)
    }
}
