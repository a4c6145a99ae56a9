//! Media capture: turns rendered frames (plus an optional audio mix) into an encoded byte stream.

pub mod ffmpeg;
pub mod memory;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{TelescrollError, TelescrollResult};
use crate::render::surface::FrameRGBA;

pub use ffmpeg::{FfmpegEncoder, is_ffmpeg_on_path};
pub use memory::InMemoryEncoder;

/// Output container for exported videos.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    #[default]
    Mp4,
    WebM,
}

impl Container {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::WebM => "webm",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Mp4 => "video/mp4",
            Self::WebM => "video/webm",
        }
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for Container {
    type Err = TelescrollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mp4" => Ok(Self::Mp4),
            "webm" => Ok(Self::WebM),
            other => Err(TelescrollError::validation(format!(
                "unknown container '{other}' (expected mp4 or webm)"
            ))),
        }
    }
}

/// Raw PCM audio input mixed into the encoded stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioInputConfig {
    /// Interleaved `f32le` samples.
    pub path: PathBuf,
    pub sample_rate: u32,
    pub channels: u16,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncoderConfig {
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
    pub container: Container,
    pub audio: Option<AudioInputConfig>,
}

impl EncoderConfig {
    pub fn validate(&self) -> TelescrollResult<()> {
        if self.fps.num == 0 || self.fps.den == 0 {
            return Err(TelescrollError::validation("fps must be non-zero"));
        }
        if self.width == 0 || self.height == 0 {
            return Err(TelescrollError::validation(
                "encoder width/height must be non-zero",
            ));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(TelescrollError::validation(
                "encoder width/height must be even (required for yuv420p output)",
            ));
        }
        if let Some(audio) = &self.audio {
            if audio.sample_rate == 0 {
                return Err(TelescrollError::validation(
                    "audio sample_rate must be non-zero when audio is enabled",
                ));
            }
            if audio.channels == 0 {
                return Err(TelescrollError::validation(
                    "audio channels must be non-zero when audio is enabled",
                ));
            }
        }
        Ok(())
    }

    pub(crate) fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// Encoding session contract.
///
/// `push_frame` is called with strictly increasing frame indices. Encoded bytes arrive as
/// chunks: some while frames are still being pushed (`drain`), the rest from `finish`.
pub trait MediaEncoder {
    fn container(&self) -> Container;
    fn begin(&mut self, cfg: EncoderConfig) -> TelescrollResult<()>;
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> TelescrollResult<()>;
    /// Chunks produced since the last call, in stream order.
    fn drain(&mut self) -> Vec<Vec<u8>>;
    /// Close the stream and return the remaining chunks.
    fn finish(&mut self) -> TelescrollResult<Vec<Vec<u8>>>;
    /// Release every resource without producing output. Safe to call at any point.
    fn abort(&mut self);
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> TelescrollResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

pub(crate) fn check_frame(
    cfg: &EncoderConfig,
    last: Option<FrameIndex>,
    idx: FrameIndex,
    frame: &FrameRGBA,
) -> TelescrollResult<()> {
    if let Some(last) = last
        && idx.0 <= last.0
    {
        return Err(TelescrollError::capture(
            "encoder received out-of-order frame index",
        ));
    }
    if frame.width != cfg.width || frame.height != cfg.height {
        return Err(TelescrollError::validation(format!(
            "frame size mismatch: got {}x{}, expected {}x{}",
            frame.width, frame.height, cfg.width, cfg.height
        )));
    }
    if frame.data.len() != cfg.frame_len() {
        return Err(TelescrollError::validation(
            "frame.data size mismatch with width*height*4",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/mod.rs"]
mod tests;
