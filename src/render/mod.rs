//! Frame rendering: the drawing-surface seam, its CPU and recording implementations, and the
//! frame renderer that paints one scene at one scroll progress.

pub mod background;
pub mod composite;
pub mod cpu;
pub mod frame;
pub mod recording;
pub mod surface;

pub use cpu::CpuSurface;
pub use frame::{FrameReport, FrameRenderer, FrameRequest};
pub use recording::{DrawCommand, RecordingSurface};
pub use surface::{BlendMode, FrameRGBA, Paint, Surface, TextPass};
