#![allow(dead_code)]

use super::SessionError;
use crate::host::{MediaHost, RecorderHandle};
use crate::models::{mint_file_name, Recording};
use chrono::Utc;
use log::{debug, error, info};
use std::path::{Path, PathBuf};

/// Tracks whether a recording is in progress and owns the single recorder
/// handle for its lifetime (created on start, released on stop).
pub struct RecordingSession {
    recordings_dir: PathBuf,
    recorder: Option<Box<dyn RecorderHandle>>,
    active: bool,
}

impl RecordingSession {
    pub fn new(recordings_dir: PathBuf) -> Self {
        Self {
            recordings_dir,
            recorder: None,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn recordings_dir(&self) -> &Path {
        &self.recordings_dir
    }

    /// Start capturing into a freshly minted file
    ///
    /// Returns the new file name, or `None` when a recording is already in
    /// progress (the call is ignored). A failure to start leaves the
    /// session inactive with no handle.
    pub fn start(&mut self, host: &dyn MediaHost) -> Result<Option<String>, SessionError> {
        if self.active {
            debug!("start ignored, recording already in progress");
            return Ok(None);
        }

        let file_name = mint_file_name(Utc::now());
        let path = self.recordings_dir.join(&file_name);
        let mut recorder = host.create_recorder(&path)?;
        recorder.start_capture()?;

        self.recorder = Some(recorder);
        self.active = true;
        info!("recording started: {}", path.display());
        Ok(Some(file_name))
    }

    /// Finalize the capture and hand back the new `Recording`
    ///
    /// Returns `None` when no recording is in progress (the call is
    /// ignored). The recorder handle is released on every exit path, and
    /// the session is inactive afterwards even if finalization failed.
    pub fn stop(&mut self) -> Result<Option<Recording>, SessionError> {
        if !self.active {
            debug!("stop ignored, no recording in progress");
            return Ok(None);
        }

        let Some(mut recorder) = self.recorder.take() else {
            // Active with no handle should be unreachable; report and keep
            // state untouched rather than guessing.
            error!("no active recorder handle to stop");
            return Err(SessionError::NoActiveRecording);
        };

        let result = recorder.stop_capture();
        self.active = false;
        drop(recorder);

        let path = result?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!("recording stopped: {}", path.display());
        Ok(Some(Recording::new(file_name)))
    }

    /// Host-reported capture failure: release the handle and return to the
    /// inactive state so the next start works.
    pub fn reset_on_error(&mut self, message: &str) {
        error!("recorder error: {message}");
        self.recorder = None;
        self.active = false;
    }
}
