#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The fixed playback speed steps offered per recording entry
pub const PLAYBACK_SPEEDS: [f32; 4] = [0.5, 1.0, 1.5, 2.0];

/// Default playback speed when no preference is stored
pub const DEFAULT_SPEED: f32 = 1.0;

/// A saved voice memo
///
/// Identity is the timestamped file name minted when the recording started;
/// the struct is immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub file_name: String,
    pub title: String,
    pub created: DateTime<Utc>,
}

impl Recording {
    pub fn new(file_name: String) -> Self {
        let now = Utc::now();
        Self {
            file_name,
            title: now.format("%Y-%m-%d %H:%M:%S").to_string(),
            created: now,
        }
    }

    pub fn id(&self) -> &str {
        &self.file_name
    }
}

/// Generate a unique file name for a new recording
///
/// Uses epoch milliseconds, which also guarantees identity uniqueness
/// in the registry.
pub fn mint_file_name(now: DateTime<Utc>) -> String {
    format!("recording_{}.wav", now.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_mint_file_name_uses_epoch_millis() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(mint_file_name(at), "recording_1700000000123.wav");
    }

    #[test]
    fn test_recording_identity_is_file_name() {
        let recording = Recording::new("recording_42.wav".to_string());
        assert_eq!(recording.id(), "recording_42.wav");
        assert!(!recording.title.is_empty());
    }
}
