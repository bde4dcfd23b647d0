use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use taskmap_core::{AggregationPolicy, FilterMode};
use taskmap_engine::write_atomically;
use taskmap_logging::{taskmap_error, taskmap_info, taskmap_warn};

const STATE_FILENAME: &str = ".taskmap_state.ron";

/// Settings remembered between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub filter: FilterMode,
    #[serde(default)]
    pub policy: AggregationPolicy,
}

pub fn state_path(dir: &Path) -> PathBuf {
    dir.join(STATE_FILENAME)
}

pub fn load_preferences(dir: &Path) -> Preferences {
    let path = state_path(dir);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Preferences::default();
        }
        Err(err) => {
            taskmap_warn!("Failed to read preferences from {:?}: {}", path, err);
            return Preferences::default();
        }
    };

    match ron::from_str(&content) {
        Ok(prefs) => {
            taskmap_info!("Loaded preferences from {:?}", path);
            prefs
        }
        Err(err) => {
            taskmap_warn!("Failed to parse preferences from {:?}: {}", path, err);
            Preferences::default()
        }
    }
}

pub fn save_preferences(dir: &Path, prefs: &Preferences) {
    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(prefs, pretty) {
        Ok(text) => text,
        Err(err) => {
            taskmap_error!("Failed to serialize preferences: {}", err);
            return;
        }
    };

    let path = state_path(dir);
    if let Err(err) = write_atomically(&path, &content) {
        taskmap_error!("Failed to write preferences to {:?}: {}", path, err);
    }
}
