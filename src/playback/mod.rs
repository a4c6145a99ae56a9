//! Playback clock and scheduler: clock time in, rendered frames and UI updates out.

pub mod clock;
pub mod driver;
pub mod scheduler;
pub mod sink;
pub mod state;

pub use clock::{Clock, ManualClock, SystemClock};
pub use driver::{CountedRefresh, PacedRefresh, RefreshSignal, drive};
pub use scheduler::{Player, TickHandle, TickOutcome};
pub use sink::{
    Controls, NullSink, ProgressUpdate, RecordingSink, SinkHandle, Status, TracingSink, UiEvent,
    UiSink,
};
pub use state::{PlaybackPhase, PlaybackState};
