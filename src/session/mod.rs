//! Recording and playback session state machines
//!
//! Each session exclusively owns at most one host handle of its kind for
//! the handle's lifetime; correctness rests on never holding two live
//! handles simultaneously, so every transition that replaces a handle stops
//! and releases the old one first.

mod playback;
mod recording;

pub use playback::{PlaybackSession, PlaybackState, SAMPLING_PERIOD};
pub use recording::RecordingSession;

use crate::host::HostError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("permissions denied, recording is unavailable")]
    PermissionDenied,
    #[error("no active recording to stop")]
    NoActiveRecording,
    #[error(transparent)]
    Host(#[from] HostError),
}
