use crate::assets::audio::AudioTrack;
use crate::foundation::core::Canvas;
use crate::foundation::error::{TelescrollError, TelescrollResult};
use crate::playback::clock::Clock;
use crate::playback::sink::{Controls, ProgressUpdate, SinkHandle};
use crate::playback::state::{PlaybackPhase, PlaybackState};
use crate::render::frame::{FrameRenderer, FrameReport, FrameRequest};
use crate::render::surface::{FrameRGBA, Surface};
use crate::script::scene::SceneList;
use crate::style::StyleConfig;

pub const NO_SCENES_NOTICE: &str = "Please generate a video first!";

/// Token for the one tick a player will accept next.
///
/// Pausing and resetting bump the generation, so handles taken before the transition go stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickHandle {
    generation: u64,
    sequence: u64,
}

impl TickHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    Rendered {
        scene_index: usize,
        progress: f64,
        elapsed_ms: u64,
    },
    Completed,
    /// The handle was cancelled or already consumed; nothing changed.
    Stale,
}

/// Owns playback state and turns clock time into rendered frames.
pub struct Player {
    scenes: SceneList,
    style: StyleConfig,
    state: PlaybackState,
    origin_ms: i64,
    paused_elapsed_ms: u64,
    generation: u64,
    pending: Option<TickHandle>,
    clock: Box<dyn Clock>,
    surface: Box<dyn Surface>,
    renderer: FrameRenderer,
    audio: Option<Box<dyn AudioTrack>>,
    sink: SinkHandle,
    export_enabled: bool,
    current_scene: usize,
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("scenes", &self.scenes.len())
            .field("state", &self.state)
            .field("pending", &self.pending)
            .field("audio", &self.audio.is_some())
            .finish_non_exhaustive()
    }
}

impl Player {
    pub fn new(surface: Box<dyn Surface>, clock: Box<dyn Clock>, sink: SinkHandle) -> Self {
        Self {
            scenes: SceneList::default(),
            style: StyleConfig::default(),
            state: PlaybackState::default(),
            origin_ms: 0,
            paused_elapsed_ms: 0,
            generation: 0,
            pending: None,
            clock,
            surface,
            renderer: FrameRenderer::new(),
            audio: None,
            sink,
            export_enabled: false,
            current_scene: 0,
        }
    }

    pub fn scenes(&self) -> &SceneList {
        &self.scenes
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.state.phase()
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.scenes.total_duration_ms()
    }

    pub fn paused_elapsed_ms(&self) -> u64 {
        self.paused_elapsed_ms
    }

    pub fn pending_tick(&self) -> Option<TickHandle> {
        self.pending
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.surface.width(),
            height: self.surface.height(),
        }
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn sink(&self) -> &SinkHandle {
        &self.sink
    }

    pub fn renderer(&self) -> &FrameRenderer {
        &self.renderer
    }

    pub fn audio(&self) -> Option<&dyn AudioTrack> {
        self.audio.as_deref()
    }

    /// Scene shown by the most recent tick, or 0 after a reset.
    pub fn current_scene(&self) -> usize {
        self.current_scene
    }

    pub fn export_enabled(&self) -> bool {
        self.export_enabled
    }

    /// Replace the scene list. Playback returns to idle at zero.
    pub fn set_scenes(&mut self, scenes: SceneList) {
        self.cancel_pending();
        self.scenes = scenes;
        self.state = PlaybackState::new(self.scenes.total_duration_ms());
        self.paused_elapsed_ms = 0;
        self.current_scene = 0;
        self.renderer.invalidate_layout();
    }

    pub fn set_style(&mut self, style: StyleConfig) {
        if style.font_family != self.style.font_family
            || style.base_font_size_ratio != self.style.base_font_size_ratio
        {
            self.renderer.invalidate_layout();
        }
        self.style = style;
    }

    /// Attach or detach the soundtrack. A detached track is paused first.
    pub fn set_audio(&mut self, audio: Option<Box<dyn AudioTrack>>) -> Option<Box<dyn AudioTrack>> {
        let now = self.clock.now_ms();
        let mut old = std::mem::replace(&mut self.audio, audio);
        if let Some(track) = old.as_mut() {
            track.pause(now);
        }
        old
    }

    pub fn swap_clock(&mut self, clock: Box<dyn Clock>) -> Box<dyn Clock> {
        std::mem::replace(&mut self.clock, clock)
    }

    pub fn set_export_enabled(&mut self, enabled: bool) {
        self.export_enabled = enabled;
        self.publish_controls();
    }

    pub fn start(&mut self) -> TelescrollResult<()> {
        if self.scenes.is_empty() {
            self.sink.notice(NO_SCENES_NOTICE);
            return Err(TelescrollError::playback("no scenes to play"));
        }
        if self.state.is_playing() {
            return Ok(());
        }
        if self.state.is_complete() {
            self.paused_elapsed_ms = 0;
            self.state.set_elapsed(0);
        }

        let now = self.clock.now_ms();
        if let Some(track) = self.audio.as_mut() {
            if self.paused_elapsed_ms == 0 {
                track.seek(0, now);
            }
            track.play(now);
        }
        self.origin_ms = now as i64 - self.paused_elapsed_ms as i64;
        self.state.set_playing();
        self.schedule();
        tracing::debug!(
            resume_from_ms = self.paused_elapsed_ms,
            total_ms = self.state.total_duration_ms(),
            "playback started"
        );
        self.publish_controls();
        Ok(())
    }

    /// Run the tick `handle` refers to, if it is still the pending one.
    pub fn tick(&mut self, handle: TickHandle) -> TelescrollResult<TickOutcome> {
        if self.pending != Some(handle) || !self.state.is_playing() {
            tracing::trace!(
                generation = handle.generation,
                sequence = handle.sequence,
                "ignoring stale tick"
            );
            return Ok(TickOutcome::Stale);
        }
        self.pending = None;

        let now = self.clock.now_ms() as i64;
        let raw = (now - self.origin_ms).max(0) as u64;
        let elapsed = raw.max(self.state.elapsed_ms());
        let total = self.state.total_duration_ms();

        let Some(cursor) = self.scenes.locate(elapsed) else {
            self.complete(elapsed);
            return Ok(TickOutcome::Completed);
        };
        self.state.set_elapsed(elapsed);
        self.current_scene = cursor.index;

        if let Err(err) = self.render_scene(cursor.index, cursor.progress) {
            self.halt();
            return Err(err);
        }
        self.sink.progress(&ProgressUpdate::new(elapsed, total));
        self.pending = Some(TickHandle {
            generation: self.generation,
            sequence: handle.sequence + 1,
        });
        tracing::trace!(
            scene = cursor.index,
            progress = cursor.progress,
            elapsed_ms = elapsed,
            "tick"
        );
        Ok(TickOutcome::Rendered {
            scene_index: cursor.index,
            progress: cursor.progress,
            elapsed_ms: elapsed,
        })
    }

    /// Tick the pending handle, or report `Stale` when nothing is scheduled.
    pub fn tick_pending(&mut self) -> TelescrollResult<TickOutcome> {
        match self.pending {
            Some(handle) => self.tick(handle),
            None => Ok(TickOutcome::Stale),
        }
    }

    pub fn pause(&mut self) {
        if !self.state.is_playing() {
            return;
        }
        self.halt();
        tracing::debug!(paused_at_ms = self.paused_elapsed_ms, "playback paused");
        self.publish_controls();
    }

    pub fn reset(&mut self) -> TelescrollResult<()> {
        self.cancel_pending();
        let now = self.clock.now_ms();
        if let Some(track) = self.audio.as_mut() {
            track.pause(now);
            track.seek(0, now);
        }
        self.state.set_idle();
        self.state.set_elapsed(0);
        self.paused_elapsed_ms = 0;
        self.current_scene = 0;
        self.origin_ms = now as i64;

        if !self.scenes.is_empty() {
            self.render_scene(0, 0.0)?;
        }
        self.sink
            .progress(&ProgressUpdate::new(0, self.state.total_duration_ms()));
        self.publish_controls();
        Ok(())
    }

    /// Paint `scene_index` at `progress` without touching playback state.
    pub fn render_scene(&mut self, scene_index: usize, progress: f64) -> TelescrollResult<FrameReport> {
        let Some(scene) = self.scenes.get(scene_index) else {
            return Err(TelescrollError::playback(format!(
                "scene {scene_index} out of range ({} scenes)",
                self.scenes.len()
            )));
        };
        let req = FrameRequest {
            scene_index,
            text: scene.text(),
            progress,
            style: &self.style,
        };
        self.renderer.render(self.surface.as_mut(), &req)
    }

    pub fn snapshot(&self) -> FrameRGBA {
        self.surface.snapshot()
    }

    fn schedule(&mut self) {
        self.pending = Some(TickHandle {
            generation: self.generation,
            sequence: 0,
        });
    }

    fn cancel_pending(&mut self) {
        self.generation += 1;
        self.pending = None;
    }

    fn halt(&mut self) {
        self.cancel_pending();
        self.paused_elapsed_ms = self.state.elapsed_ms();
        self.state.set_paused();
        let now = self.clock.now_ms();
        if let Some(track) = self.audio.as_mut() {
            track.pause(now);
        }
    }

    fn complete(&mut self, elapsed: u64) {
        self.cancel_pending();
        let total = self.state.total_duration_ms();
        self.state.set_elapsed(elapsed.max(total));
        self.state.set_idle();
        self.paused_elapsed_ms = 0;
        let now = self.clock.now_ms();
        if let Some(track) = self.audio.as_mut() {
            track.pause(now);
        }
        self.sink.progress(&ProgressUpdate::new(total, total));
        tracing::debug!(elapsed_ms = elapsed, total_ms = total, "playback complete");
        self.publish_controls();
    }

    fn publish_controls(&self) {
        let has_scenes = !self.scenes.is_empty();
        let playing = self.state.is_playing();
        self.sink.controls(Controls {
            play: has_scenes && !playing,
            pause: playing,
            export: has_scenes && self.export_enabled,
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/scheduler.rs"]
mod tests;
