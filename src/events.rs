//! Events flowing through the app loop
//!
//! `UiEvent`s originate from user interaction; `HostEvent`s are the
//! asynchronous callbacks of the host media surface plus the periodic
//! position-sampling ticks. Both are drained by the same cooperative loop,
//! so no two session transitions ever interleave.

#![allow(dead_code)]

use tokio::sync::mpsc::UnboundedSender;

/// User-originated input, one per affordance
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    RecordClicked,
    StopClicked,
    /// Play/pause toggle on one recording entry
    PlayClicked { file_name: String },
    DeleteClicked { file_name: String },
    /// One of the fixed speed buttons
    SpeedClicked { speed: f32 },
    /// Seek control dragged, `percent` in 0..=100
    SeekDragged { file_name: String, percent: f32 },
}

/// Asynchronous notifications delivered back to the app loop
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Answer to the fire-once permission request at startup
    Permission { granted: bool },
    /// Host-reported capture failure
    RecorderError { file_name: String, message: String },
    /// Playback reached the end of the clip
    PlaybackFinished { file_name: String },
    /// Host-reported "stopped" status, distinct from finishing naturally
    PlaybackStopped { file_name: String },
    /// Host-reported playback failure
    PlaybackError { file_name: String, message: String },
    /// Sampling loop tick for the named target
    PositionTick { file_name: String },
}

pub type HostEventSender = UnboundedSender<HostEvent>;
