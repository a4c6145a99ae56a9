use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::assets::audio::looped_window;
use crate::assets::media::write_pcm_f32le_file;
use crate::capture::session::CaptureSession;
use crate::capture::timer::TimerQueue;
use crate::encode::{AudioInputConfig, Container, EncoderConfig, MediaEncoder};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{TelescrollError, TelescrollResult};
use crate::playback::clock::ManualClock;
use crate::playback::scheduler::Player;
use crate::playback::sink::Status;

pub const CAPTURE_FPS: u32 = 30;
/// Time between opening the capture and starting playback.
pub const SETTLE_DELAY_MS: u64 = 100;
/// Extra capture time after the last scene ends.
pub const STOP_MARGIN_MS: u64 = 500;

/// Shared flag for aborting an export in progress. Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CaptureEvent {
    StartPlayback,
    Stop,
}

/// Capture timeline for one export, relative to capture start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CapturePlan {
    pub playback_start_ms: u64,
    pub stop_at_ms: u64,
    pub frame_count: u64,
}

impl CapturePlan {
    pub fn new(total_duration_ms: u64, fps: Fps) -> Self {
        let playback_start_ms = SETTLE_DELAY_MS;
        let stop_at_ms = playback_start_ms + total_duration_ms + STOP_MARGIN_MS;
        Self {
            playback_start_ms,
            stop_at_ms,
            frame_count: fps.frames_before_ms(stop_at_ms),
        }
    }

    /// Delay between playback start and the stop timer.
    pub fn stop_delay_ms(&self) -> u64 {
        self.stop_at_ms - self.playback_start_ms
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportReport {
    pub path: PathBuf,
    pub container: Container,
    pub bytes: usize,
    pub chunks: usize,
    pub frames: u64,
    pub plan: CapturePlan,
}

/// Records playback into an encoder on a virtual clock and writes the result to disk.
#[derive(Clone, Debug)]
pub struct CaptureController {
    out_dir: PathBuf,
    fps: Fps,
}

impl CaptureController {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            fps: Fps {
                num: CAPTURE_FPS,
                den: 1,
            },
        }
    }

    pub fn with_fps(mut self, fps: Fps) -> Self {
        self.fps = fps;
        self
    }

    pub fn out_dir(&self) -> &std::path::Path {
        &self.out_dir
    }

    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Run one record-and-export cycle.
    ///
    /// Whatever the outcome, playback ends reset to idle, the player's clock is restored, and
    /// the export control is re-enabled.
    #[tracing::instrument(skip_all, fields(container = %encoder.container()))]
    pub fn export(
        &self,
        player: &mut Player,
        encoder: &mut dyn MediaEncoder,
        cancel: &CancelToken,
    ) -> TelescrollResult<ExportReport> {
        if player.scenes().is_empty() {
            return Err(TelescrollError::playback("nothing to export: no scenes"));
        }
        player.set_export_enabled(false);
        player.sink().status(&Status::Recording);

        let virtual_clock = ManualClock::new(0);
        let previous = player.swap_clock(Box::new(virtual_clock.clone()));
        let result = self.record(player, encoder, &virtual_clock, cancel);
        if result.is_err() {
            encoder.abort();
        }
        player.swap_clock(previous);

        if let Err(err) = player.reset() {
            tracing::warn!(error = %err, "failed to repaint after export");
        }
        player.set_export_enabled(true);

        match &result {
            Ok(report) => {
                player.sink().status(&Status::Downloaded(report.path.clone()));
            }
            Err(TelescrollError::Cancelled) => {
                tracing::info!("export cancelled");
                player.sink().status(&Status::ExportCancelled);
            }
            Err(err) => {
                tracing::warn!(error = %err, "export failed");
                player.sink().status(&Status::ExportFailed(err.to_string()));
            }
        }
        result
    }

    fn record(
        &self,
        player: &mut Player,
        encoder: &mut dyn MediaEncoder,
        clock: &ManualClock,
        cancel: &CancelToken,
    ) -> TelescrollResult<ExportReport> {
        let plan = CapturePlan::new(player.total_duration_ms(), self.fps);
        let canvas = player.canvas();

        let mut audio_tmp = TempFileGuard(None);
        let audio = match player.audio().and_then(|a| a.pcm()) {
            Some(pcm) if !pcm.is_empty() => {
                let mix = looped_window(
                    pcm,
                    plan.playback_start_ms,
                    plan.stop_at_ms - plan.playback_start_ms,
                );
                let path = std::env::temp_dir().join(format!(
                    "telescroll_audio_mix_{}_{}.f32le",
                    std::process::id(),
                    clock_nanos()
                ));
                write_pcm_f32le_file(&mix, &path)?;
                audio_tmp.0 = Some(path.clone());
                Some(AudioInputConfig {
                    path,
                    sample_rate: pcm.sample_rate,
                    channels: pcm.channels,
                })
            }
            _ => None,
        };

        player.reset()?;
        let container = encoder.container();
        encoder.begin(EncoderConfig {
            width: canvas.width,
            height: canvas.height,
            fps: self.fps,
            container,
            audio,
        })?;
        tracing::info!(
            frames = plan.frame_count,
            stop_at_ms = plan.stop_at_ms,
            "recording started"
        );

        let mut timers = TimerQueue::new();
        timers.schedule(plan.playback_start_ms, CaptureEvent::StartPlayback);
        let mut session = CaptureSession::new(container);
        let mut frames = 0u64;

        'capture: loop {
            let now = self.fps.frame_to_ms(FrameIndex(frames));
            clock.set(now);
            while let Some((due, event)) = timers.pop_due(now) {
                match event {
                    CaptureEvent::StartPlayback => {
                        player.start()?;
                        timers.schedule(due + plan.stop_delay_ms(), CaptureEvent::Stop);
                        tracing::debug!(at_ms = due, "playback started for capture");
                    }
                    CaptureEvent::Stop => break 'capture,
                }
            }
            if cancel.is_cancelled() {
                let dropped = timers.clear();
                tracing::debug!(at_ms = now, dropped, "capture cancelled; pending timers dropped");
                return Err(TelescrollError::Cancelled);
            }
            if player.pending_tick().is_some() {
                player.tick_pending()?;
            }
            encoder.push_frame(FrameIndex(frames), &player.snapshot())?;
            session.extend(encoder.drain());
            frames += 1;
        }

        session.extend(encoder.finish()?);
        let bytes = session.byte_len();
        let chunks = session.chunk_count();
        let path = session.finalize(&self.out_dir)?;
        Ok(ExportReport {
            path,
            container,
            bytes,
            chunks,
            frames,
            plan,
        })
    }
}

fn clock_nanos() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0)
}

struct TempFileGuard(Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/controller.rs"]
mod tests;
