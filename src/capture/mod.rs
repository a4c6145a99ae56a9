//! Record-and-export: drives playback on a virtual clock and feeds every frame to an encoder.

pub mod controller;
pub mod session;
pub mod timer;

pub use controller::{
    CAPTURE_FPS, CancelToken, CaptureController, CapturePlan, ExportReport, SETTLE_DELAY_MS,
    STOP_MARGIN_MS,
};
pub use session::{CaptureSession, artifact_name};
pub use timer::TimerQueue;
