//! Top-level controller tying script intake, assets, playback, and export together.

use std::path::Path;
use std::sync::Arc;

use crate::assets::audio::{AudioTrack, load_audio};
use crate::assets::image::{RasterImage, load_image};
use crate::capture::{CancelToken, CaptureController, ExportReport};
use crate::config::ProjectConfig;
use crate::encode::MediaEncoder;
use crate::foundation::error::{TelescrollError, TelescrollResult};
use crate::playback::clock::Clock;
use crate::playback::scheduler::Player;
use crate::playback::sink::{SinkHandle, Status};
use crate::render::surface::Surface;
use crate::script::DEFAULT_SCENE_DURATION_MS;
use crate::script::scene::SceneList;
use crate::script::summary::{ScriptSummary, format_duration};
use crate::style::{GradientPreset, StyleConfig};

pub const EMPTY_SCRIPT_NOTICE: &str = "Please enter a script first!";

/// Owns the script, loaded assets, and the player. Every UI action goes through here.
pub struct Studio {
    script: String,
    summary: ScriptSummary,
    scene_duration_ms: u64,
    player: Player,
    sink: SinkHandle,
}

impl std::fmt::Debug for Studio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Studio")
            .field("summary", &self.summary)
            .field("scene_duration_ms", &self.scene_duration_ms)
            .field("player", &self.player)
            .finish_non_exhaustive()
    }
}

impl Studio {
    pub fn new(surface: Box<dyn Surface>, clock: Box<dyn Clock>, sink: SinkHandle) -> Self {
        let player = Player::new(surface, clock, sink.clone());
        Self {
            script: String::new(),
            summary: ScriptSummary::from_script("", DEFAULT_SCENE_DURATION_MS),
            scene_duration_ms: DEFAULT_SCENE_DURATION_MS,
            player,
            sink,
        }
    }

    /// Build a studio from a project: style, script, and assets. Asset failures are soft.
    pub fn from_config(
        cfg: &ProjectConfig,
        surface: Box<dyn Surface>,
        clock: Box<dyn Clock>,
        sink: SinkHandle,
    ) -> TelescrollResult<Self> {
        cfg.validate()?;
        let mut studio = Self::new(surface, clock, sink);
        studio.scene_duration_ms = cfg.scene_duration_ms;
        studio.player.set_style(cfg.style_config());
        studio.set_script(cfg.script_text()?);
        if let Some(path) = &cfg.audio {
            studio.load_audio(path);
        }
        if let Some(path) = &cfg.style.background_image {
            studio.load_background(path);
        }
        Ok(studio)
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    pub fn summary(&self) -> &ScriptSummary {
        &self.summary
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn style(&self) -> &StyleConfig {
        self.player.style()
    }

    pub fn scene_duration_ms(&self) -> u64 {
        self.scene_duration_ms
    }

    /// Replace the script text and publish fresh word statistics.
    pub fn set_script(&mut self, text: impl Into<String>) -> &ScriptSummary {
        self.script = text.into();
        self.summary = ScriptSummary::from_script(&self.script, self.scene_duration_ms);
        self.sink.script_summary(&self.summary);
        &self.summary
    }

    /// Turn the current script into the scene list and paint its first frame.
    #[tracing::instrument(skip(self), fields(words = self.summary.word_count))]
    pub fn generate(&mut self) -> TelescrollResult<()> {
        let text = self.script.trim();
        if text.is_empty() {
            self.sink.notice(EMPTY_SCRIPT_NOTICE);
            return Err(TelescrollError::validation("script is empty"));
        }
        let scenes = SceneList::from_script(text, self.scene_duration_ms)?;
        let duration_ms = scenes.total_duration_ms();
        self.player.set_scenes(scenes);
        self.player.reset()?;
        self.player.set_export_enabled(true);
        self.sink.status(&Status::VideoReady {
            duration_label: format_duration(duration_ms),
            word_count: self.summary.word_count,
        });
        tracing::info!(duration_ms, "video ready");
        Ok(())
    }

    pub fn play(&mut self) -> TelescrollResult<()> {
        self.player.start()
    }

    pub fn pause(&mut self) {
        self.player.pause();
    }

    pub fn reset(&mut self) -> TelescrollResult<()> {
        self.player.reset()
    }

    /// Decode and attach a soundtrack. On failure the previous track stays.
    #[tracing::instrument(skip(self))]
    pub fn load_audio(&mut self, path: &Path) -> bool {
        match load_audio(path) {
            Ok(track) => {
                self.attach_audio(Box::new(track), &display_name(path));
                true
            }
            Err(err) => {
                self.report_asset_failure("audio", &err);
                false
            }
        }
    }

    pub fn attach_audio(&mut self, track: Box<dyn AudioTrack>, name: &str) {
        self.player.set_audio(Some(track));
        self.sink.status(&Status::AudioLoaded(name.to_owned()));
    }

    pub fn remove_audio(&mut self) {
        if self.player.set_audio(None).is_some() {
            self.sink.status(&Status::AudioRemoved);
        }
    }

    /// Decode and use a background image. On failure the previous background stays.
    #[tracing::instrument(skip(self))]
    pub fn load_background(&mut self, path: &Path) -> bool {
        match load_image(path) {
            Ok(image) => {
                if let Err(err) = self.set_background_image(image, &display_name(path)) {
                    tracing::warn!(error = %err, "failed to repaint with new background");
                }
                true
            }
            Err(err) => {
                self.report_asset_failure("background image", &err);
                false
            }
        }
    }

    pub fn set_background_image(&mut self, image: RasterImage, name: &str) -> TelescrollResult<()> {
        let mut style = self.player.style().clone();
        style.custom_image = Some(Arc::new(image));
        self.player.set_style(style);
        self.sink.status(&Status::BackgroundLoaded(name.to_owned()));
        self.repaint_current()
    }

    pub fn remove_background(&mut self) -> TelescrollResult<()> {
        let mut style = self.player.style().clone();
        style.custom_image = None;
        self.player.set_style(style);
        self.sink.status(&Status::BackgroundRemoved);
        self.repaint_current()
    }

    /// Switch the gradient. Takes effect from the next painted frame.
    pub fn set_gradient(&mut self, preset: GradientPreset) {
        let mut style = self.player.style().clone();
        style.gradient = preset;
        self.player.set_style(style);
    }

    pub fn export(
        &mut self,
        controller: &CaptureController,
        encoder: &mut dyn MediaEncoder,
        cancel: &CancelToken,
    ) -> TelescrollResult<ExportReport> {
        controller.export(&mut self.player, encoder, cancel)
    }

    fn repaint_current(&mut self) -> TelescrollResult<()> {
        if self.player.scenes().is_empty() {
            return Ok(());
        }
        let scene = self.player.current_scene();
        self.player.render_scene(scene, 0.0)?;
        Ok(())
    }

    fn report_asset_failure(&self, asset: &'static str, err: &TelescrollError) {
        tracing::warn!(asset, error = %err, "asset load failed");
        self.sink.status(&Status::AssetLoadFailed {
            asset,
            reason: err.to_string(),
        });
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
#[path = "../tests/unit/app.rs"]
mod tests;
