//! Application settings persistence using dconf
//!
//! Settings are stored in dconf under `/com/dicta/voice-memos/`

#![allow(dead_code)]

use log::error;

const DCONF_PATH: &str = "/com/dicta/voice-memos/";

/// Keys for dconf settings
mod keys {
    pub const DEFAULT_SPEED: &str = "default-speed";
    pub const RECORDINGS_DIR: &str = "recordings-dir";
}

/// Get the default playback speed from dconf
pub fn get_default_speed() -> Option<f32> {
    let key = format!("{}{}", DCONF_PATH, keys::DEFAULT_SPEED);
    dconf_rs::get_string(&key).ok().and_then(|s| s.parse().ok())
}

/// Set the default playback speed in dconf
pub fn set_default_speed(speed: f32) {
    let key = format!("{}{}", DCONF_PATH, keys::DEFAULT_SPEED);
    if let Err(e) = dconf_rs::set_string(&key, &speed.to_string()) {
        error!("Failed to save default speed to dconf: {}", e);
    }
}

/// Get the recordings directory override from dconf
pub fn get_recordings_dir() -> Option<String> {
    let key = format!("{}{}", DCONF_PATH, keys::RECORDINGS_DIR);
    dconf_rs::get_string(&key).ok().filter(|s| !s.is_empty())
}

/// Set the recordings directory override in dconf
pub fn set_recordings_dir(dir: &str) {
    let key = format!("{}{}", DCONF_PATH, keys::RECORDINGS_DIR);
    if let Err(e) = dconf_rs::set_string(&key, dir) {
        error!("Failed to save recordings directory to dconf: {}", e);
    }
}
