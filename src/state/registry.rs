#![allow(dead_code)]

use crate::models::Recording;
use serde::Serialize;

pub const PLAY_LABEL: &str = "Play";
pub const PAUSE_LABEL: &str = "Pause";

/// One displayed recording with its UI affordance state
#[derive(Debug, Clone, Serialize)]
pub struct RegistryEntry {
    pub recording: Recording,
    /// Play/pause toggle label, mirrors playback state
    pub label: &'static str,
    /// Seek indicator position, normalized 0..=100
    pub seek_percent: f32,
}

impl RegistryEntry {
    fn new(recording: Recording) -> Self {
        Self {
            recording,
            label: PLAY_LABEL,
            seek_percent: 0.0,
        }
    }
}

/// Insertion-ordered list of known recordings
///
/// In-memory only; rebuilt empty on launch. Holds no playback resources,
/// only the identity of entries and their view state.
#[derive(Debug, Default)]
pub struct RecordingRegistry {
    entries: Vec<RegistryEntry>,
}

impl RecordingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, recording: Recording) {
        self.entries.push(RegistryEntry::new(recording));
    }

    /// Remove by identity; returns whether an entry was removed
    pub fn remove(&mut self, file_name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.recording.file_name != file_name);
        self.entries.len() != before
    }

    pub fn contains(&self, file_name: &str) -> bool {
        self.get(file_name).is_some()
    }

    pub fn get(&self, file_name: &str) -> Option<&RegistryEntry> {
        self.entries
            .iter()
            .find(|e| e.recording.file_name == file_name)
    }

    fn get_mut(&mut self, file_name: &str) -> Option<&mut RegistryEntry> {
        self.entries
            .iter_mut()
            .find(|e| e.recording.file_name == file_name)
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    /// Look up by 1-based display index
    pub fn by_index(&self, index: usize) -> Option<&RegistryEntry> {
        index.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn set_playing(&mut self, file_name: &str, playing: bool) {
        if let Some(entry) = self.get_mut(file_name) {
            entry.label = if playing { PAUSE_LABEL } else { PLAY_LABEL };
        }
    }

    pub fn set_seek_percent(&mut self, file_name: &str, percent: f32) {
        if let Some(entry) = self.get_mut(file_name) {
            entry.seek_percent = percent.clamp(0.0, 100.0);
        }
    }

    pub fn reset_seek(&mut self, file_name: &str) {
        self.set_seek_percent(file_name, 0.0);
    }
}
