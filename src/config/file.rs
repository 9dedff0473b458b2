use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub tick_ms: Option<u64>,
    #[serde(default = "default_threaded")]
    pub threaded: bool,
    #[serde(default)]
    pub rear_touch: bool,
    pub click_hold_ms: Option<u64>,
    pub tap_timeout_ms: Option<u64>,
    pub tap_radius_px: Option<u32>,
}

impl Default for FileConfig {
    fn default() -> Self {
        FileConfig {
            width: None,
            height: None,
            tick_ms: None,
            threaded: default_threaded(),
            rear_touch: false,
            click_hold_ms: None,
            tap_timeout_ms: None,
            tap_radius_px: None,
        }
    }
}

fn default_threaded() -> bool {
    true
}

pub fn load_from_path(path: &Path) -> Option<FileConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => {
            log::info!("Loaded config from {}", path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}

pub fn load_from_default_paths() -> Option<FileConfig> {
    for path in default_config_paths() {
        if path.exists() {
            if let Some(config) = load_from_path(&path) {
                return Some(config);
            }
        }
    }
    None
}

fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("deckview.toml")];
    if let Ok(home) = std::env::var("HOME") {
        paths.push(PathBuf::from(home).join(".config").join("deckview.toml"));
    }
    paths
}
