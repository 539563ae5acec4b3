//! Local on-disk host adapter
//!
//! Implements the media ports against real WAV files: the recorder measures
//! capture time on the wall clock and finalizes a silent 16kHz mono WAV of
//! that duration, the player tracks position against the wall clock scaled
//! by the playback rate and emits `PlaybackFinished` when the clip runs out.
//! Real microphone capture belongs to the platform; this adapter keeps the
//! binary functional end to end without one.

use super::{Capability, HostError, MediaHost, PlayerHandle, RecorderHandle};
use crate::events::{HostEvent, HostEventSender};
use hound::{SampleFormat, WavSpec, WavWriter};
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

const CAPTURE_SAMPLE_RATE: u32 = 16_000;

/// Host adapter backed by the local filesystem and the wall clock
pub struct LocalHost {
    events: HostEventSender,
}

impl LocalHost {
    pub fn new(events: HostEventSender) -> Self {
        Self { events }
    }
}

impl MediaHost for LocalHost {
    fn request_permissions(&self, capabilities: &[Capability]) {
        // Local filesystem access needs no platform grant
        debug!("permissions requested: {:?}", capabilities);
        let _ = self.events.send(HostEvent::Permission { granted: true });
    }

    fn create_recorder(&self, path: &Path) -> Result<Box<dyn RecorderHandle>, HostError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Box::new(LocalRecorder {
            path: path.to_path_buf(),
            started: None,
        }))
    }

    fn create_player(&self, path: &Path) -> Result<Box<dyn PlayerHandle>, HostError> {
        let reader = hound::WavReader::open(path).map_err(|e| HostError::Wav(e.to_string()))?;
        let spec = reader.spec();
        let duration_ms = reader.duration() as u64 * 1000 / spec.sample_rate.max(1) as u64;

        Ok(Box::new(LocalPlayer {
            file_name: base_name(path),
            duration_ms,
            base_ms: 0,
            started: None,
            rate: 1.0,
            events: self.events.clone(),
            finish: None,
        }))
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

struct LocalRecorder {
    path: PathBuf,
    started: Option<Instant>,
}

impl RecorderHandle for LocalRecorder {
    fn start_capture(&mut self) -> Result<(), HostError> {
        self.started = Some(Instant::now());
        info!("capture started: {}", self.path.display());
        Ok(())
    }

    fn stop_capture(&mut self) -> Result<PathBuf, HostError> {
        let elapsed = self
            .started
            .take()
            .map(|t| t.elapsed())
            .unwrap_or(Duration::ZERO);

        let spec = WavSpec {
            channels: 1,
            sample_rate: CAPTURE_SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer =
            WavWriter::create(&self.path, spec).map_err(|e| HostError::Wav(e.to_string()))?;
        let sample_count = (elapsed.as_secs_f64() * CAPTURE_SAMPLE_RATE as f64) as usize;
        for _ in 0..sample_count {
            writer
                .write_sample(0i16)
                .map_err(|e| HostError::Wav(e.to_string()))?;
        }
        writer
            .finalize()
            .map_err(|e| HostError::Wav(e.to_string()))?;

        info!(
            "capture finished: {} ({:.1}s)",
            self.path.display(),
            elapsed.as_secs_f64()
        );
        Ok(self.path.clone())
    }
}

struct LocalPlayer {
    file_name: String,
    duration_ms: u64,
    /// Position accumulated up to the last pause/seek/rate change
    base_ms: u64,
    /// Set while playing; elapsed wall time scales by `rate`
    started: Option<Instant>,
    rate: f32,
    events: HostEventSender,
    finish: Option<JoinHandle<()>>,
}

impl LocalPlayer {
    /// Fold the elapsed play time into `base_ms`
    fn freeze_position(&mut self) {
        if let Some(started) = self.started.take() {
            let advanced = (started.elapsed().as_millis() as f64 * self.rate as f64) as u64;
            self.base_ms = (self.base_ms + advanced).min(self.duration_ms);
        }
    }

    fn cancel_finish(&mut self) {
        if let Some(task) = self.finish.take() {
            task.abort();
        }
    }

    /// Arm the completion callback for the remaining clip time
    fn schedule_finish(&mut self) {
        self.cancel_finish();
        let remaining = self.duration_ms.saturating_sub(self.base_ms);
        let wait = Duration::from_millis((remaining as f64 / self.rate.max(0.01) as f64) as u64);
        let events = self.events.clone();
        let file_name = self.file_name.clone();
        self.finish = Some(tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            let _ = events.send(HostEvent::PlaybackFinished { file_name });
        }));
    }
}

impl PlayerHandle for LocalPlayer {
    fn play(&mut self) -> Result<(), HostError> {
        if self.started.is_some() {
            return Ok(());
        }
        self.started = Some(Instant::now());
        self.schedule_finish();
        Ok(())
    }

    fn pause(&mut self) -> Result<(), HostError> {
        self.freeze_position();
        self.cancel_finish();
        Ok(())
    }

    fn stop(&mut self) -> Result<(), HostError> {
        self.cancel_finish();
        self.started = None;
        self.base_ms = 0;
        let _ = self.events.send(HostEvent::PlaybackStopped {
            file_name: self.file_name.clone(),
        });
        Ok(())
    }

    fn seek_to(&mut self, position_ms: u64) -> Result<(), HostError> {
        let playing = self.started.is_some();
        self.freeze_position();
        self.base_ms = position_ms.min(self.duration_ms);
        if playing {
            self.started = Some(Instant::now());
            self.schedule_finish();
        }
        Ok(())
    }

    fn set_rate(&mut self, factor: f32) -> Result<(), HostError> {
        let playing = self.started.is_some();
        self.freeze_position();
        self.rate = factor;
        if playing {
            self.started = Some(Instant::now());
            self.schedule_finish();
        }
        Ok(())
    }

    fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    fn position_ms(&self) -> u64 {
        let advanced = self
            .started
            .map(|t| (t.elapsed().as_millis() as f64 * self.rate as f64) as u64)
            .unwrap_or(0);
        (self.base_ms + advanced).min(self.duration_ms)
    }
}

impl Drop for LocalPlayer {
    fn drop(&mut self) {
        self.cancel_finish();
    }
}
