//! Event dispatch
//!
//! The app owns the two sessions, the registry, and the host adapter.
//! UI events and host callbacks arrive on the same cooperative loop and
//! drive session transitions; the results are mirrored into the registry's
//! view state (labels, seek indicators) and the record/stop affordances.

use crate::events::{HostEvent, HostEventSender, UiEvent};
use crate::host::{Capability, MediaHost};
use crate::session::{PlaybackSession, RecordingSession, SessionError};
use crate::state::RecordingRegistry;
use log::{debug, error, info, warn};
use std::path::PathBuf;

pub struct App<H: MediaHost> {
    host: H,
    registry: RecordingRegistry,
    recording: RecordingSession,
    playback: PlaybackSession,
    permissions_granted: bool,
    record_enabled: bool,
    stop_enabled: bool,
}

impl<H: MediaHost> App<H> {
    pub fn new(
        host: H,
        recordings_dir: PathBuf,
        events: HostEventSender,
        default_speed: f32,
    ) -> Self {
        Self {
            host,
            registry: RecordingRegistry::new(),
            recording: RecordingSession::new(recordings_dir.clone()),
            playback: PlaybackSession::new(recordings_dir, events, default_speed),
            permissions_granted: false,
            record_enabled: true,
            stop_enabled: false,
        }
    }

    /// Fire-once permission request at startup; the answer arrives later
    /// as a `HostEvent::Permission`.
    pub fn request_permissions(&self) {
        self.host
            .request_permissions(&[Capability::RecordAudio, Capability::WriteStorage]);
    }

    pub fn registry(&self) -> &RecordingRegistry {
        &self.registry
    }

    pub fn playback(&self) -> &PlaybackSession {
        &self.playback
    }

    pub fn recording(&self) -> &RecordingSession {
        &self.recording
    }

    pub fn record_enabled(&self) -> bool {
        self.record_enabled
    }

    pub fn stop_enabled(&self) -> bool {
        self.stop_enabled
    }

    pub fn handle_ui(&mut self, event: UiEvent) {
        match event {
            UiEvent::RecordClicked => self.on_record(),
            UiEvent::StopClicked => self.on_stop(),
            UiEvent::PlayClicked { file_name } => self.on_play(&file_name),
            UiEvent::DeleteClicked { file_name } => self.on_delete(&file_name),
            UiEvent::SpeedClicked { speed } => self.on_speed(speed),
            UiEvent::SeekDragged { file_name, percent } => self.on_seek(&file_name, percent),
        }
    }

    pub fn handle_host(&mut self, event: HostEvent) {
        match event {
            HostEvent::Permission { granted } => {
                self.permissions_granted = granted;
                if granted {
                    info!("permissions granted");
                } else {
                    self.record_enabled = false;
                    error!("Permissions denied. The app cannot record without permissions.");
                }
            }
            HostEvent::RecorderError { file_name, message } => {
                self.recording
                    .reset_on_error(&format!("{file_name}: {message}"));
                self.record_enabled = self.permissions_granted;
                self.stop_enabled = false;
            }
            HostEvent::PlaybackFinished { file_name } => {
                if self.playback.on_finished(&file_name) {
                    self.registry.reset_seek(&file_name);
                    self.registry.set_playing(&file_name, false);
                }
            }
            HostEvent::PlaybackStopped { file_name } => {
                if self.playback.on_stopped(&file_name) {
                    self.registry.reset_seek(&file_name);
                    self.registry.set_playing(&file_name, false);
                }
            }
            HostEvent::PlaybackError { file_name, message } => {
                if self.playback.on_error(&file_name, &message) {
                    self.registry.reset_seek(&file_name);
                    self.registry.set_playing(&file_name, false);
                }
            }
            HostEvent::PositionTick { file_name } => {
                match self.playback.progress_percent(&file_name) {
                    Some(percent) => self.registry.set_seek_percent(&file_name, percent),
                    None => debug!("stale sampling tick for {file_name}"),
                }
            }
        }
    }

    fn on_record(&mut self) {
        if !self.permissions_granted {
            error!("{}", SessionError::PermissionDenied);
            return;
        }
        match self.recording.start(&self.host) {
            Ok(Some(_)) => {
                self.record_enabled = false;
                self.stop_enabled = true;
            }
            Ok(None) => {}
            Err(e) => error!("failed to start recording: {e}"),
        }
    }

    fn on_stop(&mut self) {
        match self.recording.stop() {
            Ok(Some(recording)) => {
                self.record_enabled = true;
                self.stop_enabled = false;
                info!("saved {}", recording.file_name);
                self.registry.add(recording);
            }
            Ok(None) => {}
            Err(e) => error!("failed to stop recording: {e}"),
        }
    }

    fn on_play(&mut self, file_name: &str) {
        if !self.registry.contains(file_name) {
            warn!("unknown recording: {file_name}");
            return;
        }
        let previous = self.playback.current().map(str::to_string);
        match self.playback.toggle(&self.host, file_name) {
            Ok(playing) => {
                if let Some(previous) = previous.filter(|p| p != file_name) {
                    self.registry.set_playing(&previous, false);
                    self.registry.reset_seek(&previous);
                }
                self.registry.set_playing(file_name, playing);
            }
            Err(e) => error!("playback failed on {file_name}: {e}"),
        }
    }

    fn on_delete(&mut self, file_name: &str) {
        if self.playback.delete_target(file_name) {
            debug!("deleted recording was the playback target");
        }
        if self.registry.remove(file_name) {
            info!("deleted {file_name}");
        } else {
            warn!("unknown recording: {file_name}");
        }
    }

    fn on_speed(&mut self, speed: f32) {
        if let Err(e) = self.playback.set_speed(speed) {
            error!("failed to apply speed {speed}: {e}");
        }
    }

    fn on_seek(&mut self, file_name: &str, percent: f32) {
        match self.playback.seek(file_name, percent) {
            Ok(Some(_)) => self.registry.set_seek_percent(file_name, percent),
            Ok(None) => debug!("seek ignored for non-current target {file_name}"),
            Err(e) => error!("seek failed on {file_name}: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::mock::{CommandLog, MockHost};
    use crate::session::PlaybackState;
    use crate::state::{PAUSE_LABEL, PLAY_LABEL};
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn app_with_host(host: MockHost) -> (App<MockHost>, CommandLog, UnboundedReceiver<HostEvent>) {
        let log = host.log.clone();
        let (tx, rx) = mpsc::unbounded_channel();
        let mut app = App::new(host, PathBuf::from("/tmp/recordings"), tx, 1.0);
        app.handle_host(HostEvent::Permission { granted: true });
        (app, log, rx)
    }

    fn granted_app() -> (App<MockHost>, CommandLog, UnboundedReceiver<HostEvent>) {
        app_with_host(MockHost::new())
    }

    /// Record one clip and return its file name
    fn record_one(app: &mut App<MockHost>) -> String {
        // Identity comes from epoch milliseconds; keep names distinct
        std::thread::sleep(std::time::Duration::from_millis(2));
        app.handle_ui(UiEvent::RecordClicked);
        app.handle_ui(UiEvent::StopClicked);
        app.registry()
            .entries()
            .last()
            .unwrap()
            .recording
            .file_name
            .clone()
    }

    #[tokio::test]
    async fn test_record_toggles_affordances_and_registers() {
        let (mut app, _log, _rx) = granted_app();

        app.handle_ui(UiEvent::RecordClicked);
        assert!(!app.record_enabled());
        assert!(app.stop_enabled());
        assert!(app.recording().is_active());

        app.handle_ui(UiEvent::StopClicked);
        assert!(app.record_enabled());
        assert!(!app.stop_enabled());
        assert_eq!(app.registry().len(), 1);
    }

    #[tokio::test]
    async fn test_record_refused_without_permissions() {
        let host = MockHost::new();
        let log = host.log.clone();
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(host, PathBuf::from("/tmp/recordings"), tx, 1.0);
        app.handle_host(HostEvent::Permission { granted: false });

        assert!(!app.record_enabled());
        app.handle_ui(UiEvent::RecordClicked);
        assert!(!app.recording().is_active());
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_recorder_error_resets_session() {
        let (mut app, _log, _rx) = granted_app();

        app.handle_ui(UiEvent::RecordClicked);
        app.handle_host(HostEvent::RecorderError {
            file_name: "whatever.wav".to_string(),
            message: "device lost".to_string(),
        });

        assert!(!app.recording().is_active());
        assert!(app.record_enabled());
        assert!(!app.stop_enabled());

        // Recording works again afterwards
        app.handle_ui(UiEvent::RecordClicked);
        assert!(app.recording().is_active());
    }

    /// The full walkthrough: record two clips, toggle R1, switch to R2,
    /// delete R2 while it is playing.
    #[tokio::test]
    async fn test_record_play_switch_delete_scenario() {
        let (mut app, log, _rx) = granted_app();

        let r1 = record_one(&mut app);
        let r2 = record_one(&mut app);
        assert_ne!(r1, r2);
        assert_eq!(app.registry().len(), 2);

        // Select R1: starts playing from 0
        app.handle_ui(UiEvent::PlayClicked { file_name: r1.clone() });
        assert_eq!(app.playback().state(), PlaybackState::Playing);
        assert_eq!(app.registry().get(&r1).unwrap().label, PAUSE_LABEL);

        // Toggle to pause, then back to play
        app.handle_ui(UiEvent::PlayClicked { file_name: r1.clone() });
        assert_eq!(app.playback().state(), PlaybackState::Paused);
        assert_eq!(app.registry().get(&r1).unwrap().label, PLAY_LABEL);
        app.handle_ui(UiEvent::PlayClicked { file_name: r1.clone() });
        assert_eq!(app.playback().state(), PlaybackState::Playing);

        // Switch to R2: R1 is stopped and released first, R2 starts at 0
        app.handle_ui(UiEvent::PlayClicked { file_name: r2.clone() });
        {
            let log = log.lock().unwrap();
            let release_r1 = log
                .iter()
                .position(|e| *e == format!("release player {r1}"))
                .unwrap();
            let create_r2 = log
                .iter()
                .position(|e| *e == format!("create player {r2}"))
                .unwrap();
            assert!(release_r1 < create_r2);
            assert!(log.contains(&format!("seek {r2} 0")));
        }
        assert_eq!(app.playback().current(), Some(r2.as_str()));
        assert_eq!(app.registry().get(&r1).unwrap().label, PLAY_LABEL);

        // Delete R2 while playing: player released, no current target
        app.handle_ui(UiEvent::DeleteClicked { file_name: r2.clone() });
        assert_eq!(app.playback().state(), PlaybackState::Idle);
        assert_eq!(app.playback().current(), None);
        assert!(!app.registry().contains(&r2));
        assert_eq!(app.registry().len(), 1);
        assert!(log
            .lock()
            .unwrap()
            .contains(&format!("release player {r2}")));
    }

    #[tokio::test]
    async fn test_speed_before_playback_applies_at_play() {
        let (mut app, log, _rx) = granted_app();
        let r1 = record_one(&mut app);

        app.handle_ui(UiEvent::SpeedClicked { speed: 2.0 });
        assert_eq!(app.playback().speed(), 2.0);

        app.handle_ui(UiEvent::PlayClicked { file_name: r1.clone() });
        assert!(log.lock().unwrap().contains(&format!("rate {r1} 2")));
    }

    #[tokio::test]
    async fn test_seek_drag_updates_indicator_and_keeps_state() {
        let (mut app, log, _rx) = app_with_host(MockHost::with_duration(10_000));
        let r1 = record_one(&mut app);

        app.handle_ui(UiEvent::PlayClicked { file_name: r1.clone() });
        app.handle_ui(UiEvent::SeekDragged {
            file_name: r1.clone(),
            percent: 50.0,
        });

        assert!(log.lock().unwrap().contains(&format!("seek {r1} 5000")));
        assert_eq!(app.playback().state(), PlaybackState::Playing);
        assert_eq!(app.registry().get(&r1).unwrap().seek_percent, 50.0);
    }

    #[tokio::test]
    async fn test_position_tick_moves_indicator_and_stale_tick_is_ignored() {
        let (mut app, _log, _rx) = app_with_host(MockHost::with_duration(10_000));
        let r1 = record_one(&mut app);

        app.handle_ui(UiEvent::PlayClicked { file_name: r1.clone() });
        app.handle_ui(UiEvent::SeekDragged {
            file_name: r1.clone(),
            percent: 30.0,
        });
        app.handle_host(HostEvent::PositionTick {
            file_name: r1.clone(),
        });
        assert_eq!(app.registry().get(&r1).unwrap().seek_percent, 30.0);

        // A tick for a recording that is not the target changes nothing
        app.handle_host(HostEvent::PositionTick {
            file_name: "stale.wav".to_string(),
        });
        assert_eq!(app.registry().get(&r1).unwrap().seek_percent, 30.0);
    }

    #[tokio::test]
    async fn test_finished_resets_indicator_and_label() {
        let (mut app, _log, _rx) = app_with_host(MockHost::with_duration(10_000));
        let r1 = record_one(&mut app);

        app.handle_ui(UiEvent::PlayClicked { file_name: r1.clone() });
        app.handle_ui(UiEvent::SeekDragged {
            file_name: r1.clone(),
            percent: 80.0,
        });

        app.handle_host(HostEvent::PlaybackFinished {
            file_name: r1.clone(),
        });
        let entry = app.registry().get(&r1).unwrap();
        assert_eq!(entry.label, PLAY_LABEL);
        assert_eq!(entry.seek_percent, 0.0);
        assert!(!app.playback().is_playing());
    }

    #[tokio::test]
    async fn test_playback_error_tears_down_and_resets_entry() {
        let (mut app, log, _rx) = granted_app();
        let r1 = record_one(&mut app);

        app.handle_ui(UiEvent::PlayClicked { file_name: r1.clone() });
        app.handle_host(HostEvent::PlaybackError {
            file_name: r1.clone(),
            message: "decoder fault".to_string(),
        });

        assert_eq!(app.playback().state(), PlaybackState::Idle);
        assert_eq!(app.registry().get(&r1).unwrap().label, PLAY_LABEL);
        assert!(log
            .lock()
            .unwrap()
            .contains(&format!("release player {r1}")));
    }

    #[tokio::test]
    async fn test_play_unknown_recording_is_ignored() {
        let (mut app, log, _rx) = granted_app();
        app.handle_ui(UiEvent::PlayClicked {
            file_name: "ghost.wav".to_string(),
        });
        assert_eq!(app.playback().state(), PlaybackState::Idle);
        assert!(!log
            .lock()
            .unwrap()
            .iter()
            .any(|e| e.starts_with("create player")));
    }
}
