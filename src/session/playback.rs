#![allow(dead_code)]

use super::SessionError;
use crate::events::{HostEvent, HostEventSender};
use crate::host::{MediaHost, PlayerHandle};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Period of the position-sampling loop
pub const SAMPLING_PERIOD: Duration = Duration::from_secs(1);

/// Observable state of the playback session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No target loaded
    Idle,
    Playing,
    Paused,
}

/// Owns the sampling task and aborts it when dropped, so the loop is
/// cancelled on every transition out of the playing state rather than
/// left firing against a stale target.
struct SamplerGuard {
    file_name: String,
    task: JoinHandle<()>,
}

impl Drop for SamplerGuard {
    fn drop(&mut self) {
        self.task.abort();
        debug!("sampling loop cancelled for {}", self.file_name);
    }
}

/// The single playback session shared by all recording entries
///
/// Tracks which recording is loaded, whether it is playing, and the sticky
/// speed preference. Exactly one player handle is owned while a target is
/// loaded; switching targets stops and releases the old handle before the
/// new one is constructed.
pub struct PlaybackSession {
    recordings_dir: PathBuf,
    events: HostEventSender,
    player: Option<Box<dyn PlayerHandle>>,
    current: Option<String>,
    playing: bool,
    speed: f32,
    sampler: Option<SamplerGuard>,
}

impl PlaybackSession {
    pub fn new(recordings_dir: PathBuf, events: HostEventSender, speed: f32) -> Self {
        Self {
            recordings_dir,
            events,
            player: None,
            current: None,
            playing: false,
            speed,
            sampler: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        match (&self.current, self.playing) {
            (None, _) => PlaybackState::Idle,
            (Some(_), true) => PlaybackState::Playing,
            (Some(_), false) => PlaybackState::Paused,
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub(crate) fn sampler_active(&self) -> bool {
        self.sampler.is_some()
    }

    /// Play/pause toggle for one recording entry
    ///
    /// Selecting the target that is already current toggles play/pause;
    /// selecting a different target stops and releases the old player
    /// first, then starts the new one from offset 0 at the sticky speed.
    /// Returns whether the target is playing afterwards.
    pub fn toggle(
        &mut self,
        host: &dyn MediaHost,
        file_name: &str,
    ) -> Result<bool, SessionError> {
        if self.current.as_deref() == Some(file_name) {
            if let Some(player) = self.player.as_mut() {
                if self.playing {
                    player.pause()?;
                    self.playing = false;
                    self.sampler = None;
                    return Ok(false);
                }
                // Speed changes made while paused take effect here
                player.set_rate(self.speed)?;
                player.play()?;
                self.playing = true;
                self.start_sampler(file_name);
                return Ok(true);
            }
        }

        self.teardown();

        let path = self.recordings_dir.join(file_name);
        let mut player = host.create_player(&path)?;
        player.seek_to(0)?;
        player.set_rate(self.speed)?;
        player.play()?;

        self.player = Some(player);
        self.current = Some(file_name.to_string());
        self.playing = true;
        self.start_sampler(file_name);
        info!("playback started: {file_name} at {}x", self.speed);
        Ok(true)
    }

    /// Natural completion for the current target: cancel the sampling loop
    /// and rewind so the next toggle replays from the start. The player
    /// handle and target stay loaded. Returns false for stale callbacks.
    pub fn on_finished(&mut self, file_name: &str) -> bool {
        if self.current.as_deref() != Some(file_name) {
            return false;
        }
        self.sampler = None;
        self.playing = false;
        if let Some(player) = self.player.as_mut() {
            // Quiesce the transport before rewinding so the handle is not
            // left advancing past the completion callback
            if let Err(e) = player.pause() {
                warn!("pause after finish failed: {e}");
            }
            if let Err(e) = player.seek_to(0) {
                warn!("rewind after finish failed: {e}");
            }
        }
        info!("playback finished: {file_name}");
        true
    }

    /// Host "stopped" status for the current target, distinct from
    /// finishing naturally. Returns false for stale callbacks.
    pub fn on_stopped(&mut self, file_name: &str) -> bool {
        if self.current.as_deref() != Some(file_name) {
            return false;
        }
        self.sampler = None;
        self.playing = false;
        if let Some(player) = self.player.as_mut() {
            if let Err(e) = player.seek_to(0) {
                warn!("rewind after stop failed: {e}");
            }
        }
        true
    }

    /// Host-reported playback failure: tear down to idle so the handle is
    /// not left dangling. Returns false for stale callbacks.
    pub fn on_error(&mut self, file_name: &str, message: &str) -> bool {
        if self.current.as_deref() != Some(file_name) {
            return false;
        }
        warn!("playback error on {file_name}: {message}");
        self.teardown();
        true
    }

    /// Explicit seek on the current target, `percent` in 0..=100
    ///
    /// Returns the commanded offset in milliseconds, or `None` when the
    /// named recording is not the current target. Play/pause state is
    /// unchanged.
    pub fn seek(&mut self, file_name: &str, percent: f32) -> Result<Option<u64>, SessionError> {
        if self.current.as_deref() != Some(file_name) {
            return Ok(None);
        }
        let Some(player) = self.player.as_mut() else {
            return Ok(None);
        };
        let fraction = (percent / 100.0).clamp(0.0, 1.0);
        let position_ms = (fraction as f64 * player.duration_ms() as f64) as u64;
        player.seek_to(position_ms)?;
        Ok(Some(position_ms))
    }

    /// Update the sticky speed preference
    ///
    /// Applied to the live player immediately while playing; while paused
    /// or idle it takes effect at the next play command.
    pub fn set_speed(&mut self, speed: f32) -> Result<(), SessionError> {
        self.speed = speed;
        if self.playing {
            if let Some(player) = self.player.as_mut() {
                player.set_rate(speed)?;
            }
        }
        Ok(())
    }

    /// The named recording is being deleted; tear playback down if it is
    /// the current target. Returns whether playback was torn down.
    pub fn delete_target(&mut self, file_name: &str) -> bool {
        if self.current.as_deref() != Some(file_name) {
            return false;
        }
        self.teardown();
        true
    }

    /// Current position as a percentage of duration, only while the named
    /// target is playing. Stale sampling ticks get `None`.
    pub fn progress_percent(&self, file_name: &str) -> Option<f32> {
        if !self.playing || self.current.as_deref() != Some(file_name) {
            return None;
        }
        let player = self.player.as_ref()?;
        let duration = player.duration_ms();
        if duration == 0 {
            return Some(0.0);
        }
        Some((player.position_ms() as f64 / duration as f64 * 100.0) as f32)
    }

    /// Stop and release the player and cancel the sampling loop
    fn teardown(&mut self) {
        self.sampler = None;
        if let Some(mut player) = self.player.take() {
            if let Err(e) = player.stop() {
                warn!("stopping player failed: {e}");
            }
        }
        self.current = None;
        self.playing = false;
    }

    fn start_sampler(&mut self, file_name: &str) {
        let events = self.events.clone();
        let name = file_name.to_string();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(SAMPLING_PERIOD);
            // interval fires immediately; the first sample is due one period in
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let tick = HostEvent::PositionTick {
                    file_name: name.clone(),
                };
                if events.send(tick).is_err() {
                    break;
                }
            }
        });
        self.sampler = Some(SamplerGuard {
            file_name: file_name.to_string(),
            task,
        });
    }
}
