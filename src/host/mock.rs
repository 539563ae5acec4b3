//! Scripted host for tests
//!
//! Logs every command, including handle releases, so tests can assert the
//! exact ordering the session invariants require (for example that the old
//! player is stopped and released before a new one is created).

use super::{Capability, HostError, MediaHost, PlayerHandle, RecorderHandle};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub type CommandLog = Arc<Mutex<Vec<String>>>;

pub struct MockHost {
    pub log: CommandLog,
    /// Duration reported by every player this host creates
    pub duration_ms: u64,
    /// Make `start_capture` fail, for error-path tests
    pub fail_start_capture: bool,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(Vec::new())),
            duration_ms: 10_000,
            fail_start_capture: false,
        }
    }

    pub fn with_duration(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            ..Self::new()
        }
    }
}

fn push(log: &CommandLog, entry: String) {
    log.lock().unwrap().push(entry);
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl MediaHost for MockHost {
    fn request_permissions(&self, capabilities: &[Capability]) {
        push(&self.log, format!("permissions {:?}", capabilities));
    }

    fn create_recorder(&self, path: &Path) -> Result<Box<dyn RecorderHandle>, HostError> {
        let name = base_name(path);
        push(&self.log, format!("create recorder {name}"));
        Ok(Box::new(MockRecorder {
            path: path.to_path_buf(),
            name,
            log: self.log.clone(),
            fail_start_capture: self.fail_start_capture,
        }))
    }

    fn create_player(&self, path: &Path) -> Result<Box<dyn PlayerHandle>, HostError> {
        let name = base_name(path);
        push(&self.log, format!("create player {name}"));
        Ok(Box::new(MockPlayer {
            name,
            log: self.log.clone(),
            duration_ms: self.duration_ms,
            position_ms: 0,
        }))
    }
}

struct MockRecorder {
    path: PathBuf,
    name: String,
    log: CommandLog,
    fail_start_capture: bool,
}

impl RecorderHandle for MockRecorder {
    fn start_capture(&mut self) -> Result<(), HostError> {
        if self.fail_start_capture {
            return Err(HostError::Wav("capture device unavailable".to_string()));
        }
        push(&self.log, format!("start capture {}", self.name));
        Ok(())
    }

    fn stop_capture(&mut self) -> Result<PathBuf, HostError> {
        push(&self.log, format!("stop capture {}", self.name));
        Ok(self.path.clone())
    }
}

impl Drop for MockRecorder {
    fn drop(&mut self) {
        push(&self.log, format!("release recorder {}", self.name));
    }
}

struct MockPlayer {
    name: String,
    log: CommandLog,
    duration_ms: u64,
    position_ms: u64,
}

impl PlayerHandle for MockPlayer {
    fn play(&mut self) -> Result<(), HostError> {
        push(&self.log, format!("play {}", self.name));
        Ok(())
    }

    fn pause(&mut self) -> Result<(), HostError> {
        push(&self.log, format!("pause {}", self.name));
        Ok(())
    }

    fn stop(&mut self) -> Result<(), HostError> {
        self.position_ms = 0;
        push(&self.log, format!("stop {}", self.name));
        Ok(())
    }

    fn seek_to(&mut self, position_ms: u64) -> Result<(), HostError> {
        self.position_ms = position_ms.min(self.duration_ms);
        push(&self.log, format!("seek {} {position_ms}", self.name));
        Ok(())
    }

    fn set_rate(&mut self, factor: f32) -> Result<(), HostError> {
        push(&self.log, format!("rate {} {factor}", self.name));
        Ok(())
    }

    fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    fn position_ms(&self) -> u64 {
        self.position_ms
    }
}

impl Drop for MockPlayer {
    fn drop(&mut self) {
        push(&self.log, format!("release player {}", self.name));
    }
}
