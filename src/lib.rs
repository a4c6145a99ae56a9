//! Telescroll renders a script as a teleprompter-style scrolling-text video.
//!
//! - Wrap the script into lines against a text measurer ([`layout`])
//! - Paint deterministic frames for `(scene, progress)` ([`FrameRenderer`])
//! - Drive playback from a clock with pause/resume/reset ([`Player`])
//! - Record playback on a virtual clock into a video file ([`CaptureController`])
//!
//! [`Studio`] ties these together behind the actions a UI exposes.
#![forbid(unsafe_code)]

pub mod app;
pub mod assets;
pub mod capture;
pub mod config;
pub mod encode;
pub mod foundation;
pub mod layout;
pub mod playback;
pub mod render;
pub mod script;
pub mod style;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, Point, Rect, Rgba8, Vec2};
pub use crate::foundation::error::{TelescrollError, TelescrollResult};

pub use crate::app::Studio;
pub use crate::assets::{AudioPcm, AudioTrack, PcmTrack, RasterImage};
pub use crate::capture::{CancelToken, CaptureController, ExportReport};
pub use crate::config::ProjectConfig;
pub use crate::encode::{
    AudioInputConfig, Container, EncoderConfig, FfmpegEncoder, InMemoryEncoder, MediaEncoder,
};
pub use crate::layout::{FontMeasurer, FontSpec, MonospaceMeasurer, TextMeasurer};
pub use crate::playback::{
    Clock, ManualClock, PacedRefresh, Player, RecordingSink, SinkHandle, Status, SystemClock,
    TickOutcome, TracingSink, UiSink,
};
pub use crate::render::{CpuSurface, FrameRGBA, FrameRenderer, RecordingSurface, Surface};
pub use crate::script::scene::{Scene, SceneList};
pub use crate::script::summary::ScriptSummary;
pub use crate::style::{GradientPreset, StyleConfig};
