//! Configuration file for capy-push.
//!
//! Read once at startup from `$XDG_CONFIG_HOME/capy-push/config.json`, or the
//! path in `CAPY_PUSH_CONFIG`. Missing or unreadable files fall back to the
//! defaults; missing keys take their default value.

use capy_notify::dbus::EXPIRE_DEFAULT;
use capy_notify::{ChannelDescriptor, FreedesktopOptions, NotificationDefaults};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "CAPY_PUSH_CONFIG";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushConfig {
    pub app_name: String,
    pub desktop_entry: Option<String>,
    /// Milliseconds; -1 lets the daemon decide.
    pub expire_timeout_ms: i32,
    /// Channel every push is posted to.
    pub channel: ChannelDescriptor,
    pub notification: NotificationDefaults,
    /// Backend URL that receives refreshed push tokens.
    pub token_endpoint: Option<String>,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            app_name: "capy-push".to_string(),
            desktop_entry: None,
            expire_timeout_ms: EXPIRE_DEFAULT,
            channel: ChannelDescriptor::default(),
            notification: NotificationDefaults::default(),
            token_endpoint: None,
        }
    }
}

impl PushConfig {
    /// Load from config file, or return default if not found
    pub fn load(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(_) => {
                info!("No config at {}, using defaults", path.display());
                return Self::default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                warn!("Invalid config {}: {}. Using defaults.", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn freedesktop_options(&self) -> FreedesktopOptions {
        FreedesktopOptions {
            app_name: self.app_name.clone(),
            desktop_entry: self.desktop_entry.clone(),
            expire_timeout: self.expire_timeout_ms,
        }
    }
}

/// Resolve the config file location.
pub fn config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    dirs::config_dir().map(|dir| dir.join("capy-push").join("config.json"))
}

pub fn load() -> PushConfig {
    config_path()
        .map(|path| PushConfig::load(&path))
        .unwrap_or_default()
}
