//! Host media capability surface
//!
//! The sessions never touch audio hardware or codecs directly; they drive
//! these ports and receive completion/status callbacks as `HostEvent`s.
//! `LocalHost` is the on-disk adapter used by the binary; tests substitute
//! a scripted mock.

mod local;
#[cfg(test)]
pub mod mock;

pub use local::LocalHost;

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Capabilities requested from the platform at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    RecordAudio,
    WriteStorage,
}

/// Errors surfaced by a host adapter
#[derive(Debug, Error)]
pub enum HostError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("wav error: {0}")]
    Wav(String),
}

/// An owned capture unit bound to one output file
///
/// The handle is released by dropping it; every exit path of a session
/// transition releases the handle it owns.
pub trait RecorderHandle {
    fn start_capture(&mut self) -> Result<(), HostError>;

    /// Finalize the capture and return the path of the finished file
    fn stop_capture(&mut self) -> Result<PathBuf, HostError>;
}

/// An owned playback unit bound to one recording
///
/// Transport commands return immediately; completion ("finished") and
/// status ("stopped") arrive later as `HostEvent`s. Released on drop.
pub trait PlayerHandle {
    fn play(&mut self) -> Result<(), HostError>;
    fn pause(&mut self) -> Result<(), HostError>;
    fn stop(&mut self) -> Result<(), HostError>;
    fn seek_to(&mut self, position_ms: u64) -> Result<(), HostError>;
    fn set_rate(&mut self, factor: f32) -> Result<(), HostError>;
    fn duration_ms(&self) -> u64;
    fn position_ms(&self) -> u64;
}

/// Factory surface provided by the platform
pub trait MediaHost {
    /// Fire-once asynchronous permission request; the answer arrives as a
    /// `HostEvent::Permission`.
    fn request_permissions(&self, capabilities: &[Capability]);

    fn create_recorder(&self, path: &Path) -> Result<Box<dyn RecorderHandle>, HostError>;

    fn create_player(&self, path: &Path) -> Result<Box<dyn PlayerHandle>, HostError>;
}
