use std::cell::RefCell;
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

use crate::script::summary::{ScriptSummary, format_clock};

/// Per-tick progress for the progress bar and time display.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressUpdate {
    /// Overall progress in `[0, 100]`.
    pub percent: f64,
    pub elapsed_ms: u64,
    pub total_ms: u64,
}

impl ProgressUpdate {
    pub fn new(elapsed_ms: u64, total_ms: u64) -> Self {
        let percent = if total_ms == 0 {
            0.0
        } else {
            (elapsed_ms as f64 / total_ms as f64 * 100.0).min(100.0)
        };
        Self {
            percent,
            elapsed_ms,
            total_ms,
        }
    }

    pub fn percent_label(&self) -> String {
        format!("{:.0}%", self.percent)
    }

    /// `mm:ss / mm:ss`.
    pub fn time_label(&self) -> String {
        format!(
            "{} / {}",
            format_clock(self.elapsed_ms),
            format_clock(self.total_ms)
        )
    }
}

/// Which controls the user may currently press.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    pub play: bool,
    pub pause: bool,
    pub export: bool,
}

/// Terminal and asset events shown in the status line.
#[derive(Clone, Debug, PartialEq)]
pub enum Status {
    VideoReady {
        duration_label: String,
        word_count: usize,
    },
    AudioLoaded(String),
    AudioRemoved,
    BackgroundLoaded(String),
    BackgroundRemoved,
    Recording,
    Downloaded(PathBuf),
    ExportFailed(String),
    ExportCancelled,
    AssetLoadFailed {
        asset: &'static str,
        reason: String,
    },
}

impl Status {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::ExportFailed(_) | Self::AssetLoadFailed { .. })
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VideoReady {
                duration_label,
                word_count,
            } => write!(
                f,
                "Video ready! Duration: {duration_label} ({word_count} words)"
            ),
            Self::AudioLoaded(name) => write!(f, "Audio loaded: {name}"),
            Self::AudioRemoved => f.write_str("Audio removed"),
            Self::BackgroundLoaded(name) => write!(f, "Background image loaded: {name}"),
            Self::BackgroundRemoved => f.write_str("Background image removed"),
            Self::Recording => f.write_str("Recording video..."),
            Self::Downloaded(path) => write!(f, "Video downloaded: {}", path.display()),
            Self::ExportFailed(reason) => write!(f, "Export failed: {reason}"),
            Self::ExportCancelled => f.write_str("Export cancelled"),
            Self::AssetLoadFailed { asset, reason } => {
                write!(f, "Failed to load {asset}: {reason}")
            }
        }
    }
}

/// Receiver for everything the host UI displays. All methods default to doing nothing.
pub trait UiSink {
    fn script_summary(&mut self, _summary: &ScriptSummary) {}
    fn progress(&mut self, _update: &ProgressUpdate) {}
    fn status(&mut self, _status: &Status) {}
    /// Blocking notice for user mistakes such as playing before generating.
    fn notice(&mut self, _message: &str) {}
    fn controls(&mut self, _controls: Controls) {}
}

/// Shared handle to the UI sink, cloned into every component that reports to the UI.
#[derive(Clone)]
pub struct SinkHandle(Rc<RefCell<dyn UiSink>>);

impl fmt::Debug for SinkHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SinkHandle(..)")
    }
}

impl Default for SinkHandle {
    fn default() -> Self {
        Self::new(NullSink)
    }
}

impl SinkHandle {
    pub fn new(sink: impl UiSink + 'static) -> Self {
        Self(Rc::new(RefCell::new(sink)))
    }

    pub fn script_summary(&self, summary: &ScriptSummary) {
        self.0.borrow_mut().script_summary(summary);
    }

    pub fn progress(&self, update: &ProgressUpdate) {
        self.0.borrow_mut().progress(update);
    }

    pub fn status(&self, status: &Status) {
        self.0.borrow_mut().status(status);
    }

    pub fn notice(&self, message: &str) {
        self.0.borrow_mut().notice(message);
    }

    pub fn controls(&self, controls: Controls) {
        self.0.borrow_mut().controls(controls);
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl UiSink for NullSink {}

/// Reports UI events as log lines.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl UiSink for TracingSink {
    fn script_summary(&mut self, summary: &ScriptSummary) {
        tracing::info!(
            words = summary.word_count,
            scenes = summary.scene_count,
            duration = %summary.duration_label(),
            "{}",
            summary.recommendation_text()
        );
    }

    fn progress(&mut self, update: &ProgressUpdate) {
        tracing::debug!(
            percent = %update.percent_label(),
            time = %update.time_label(),
            "progress"
        );
    }

    fn status(&mut self, status: &Status) {
        if status.is_error() {
            tracing::warn!("{status}");
        } else {
            tracing::info!("{status}");
        }
    }

    fn notice(&mut self, message: &str) {
        tracing::warn!(notice = message, "user notice");
    }

    fn controls(&mut self, controls: Controls) {
        tracing::trace!(
            play = controls.play,
            pause = controls.pause,
            export = controls.export,
            "controls"
        );
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum UiEvent {
    ScriptSummary(ScriptSummary),
    Progress(ProgressUpdate),
    Status(Status),
    Notice(String),
    Controls(Controls),
}

/// Keeps every event; clones share one log.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    events: Rc<RefCell<Vec<UiEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<UiEvent> {
        self.events.borrow().clone()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    pub fn last_progress(&self) -> Option<ProgressUpdate> {
        self.events.borrow().iter().rev().find_map(|e| match e {
            UiEvent::Progress(p) => Some(*p),
            _ => None,
        })
    }

    pub fn last_controls(&self) -> Option<Controls> {
        self.events.borrow().iter().rev().find_map(|e| match e {
            UiEvent::Controls(c) => Some(*c),
            _ => None,
        })
    }

    pub fn statuses(&self) -> Vec<Status> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                UiEvent::Status(s) => Some(s.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn notices(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                UiEvent::Notice(n) => Some(n.clone()),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: UiEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl UiSink for RecordingSink {
    fn script_summary(&mut self, summary: &ScriptSummary) {
        self.push(UiEvent::ScriptSummary(summary.clone()));
    }

    fn progress(&mut self, update: &ProgressUpdate) {
        self.push(UiEvent::Progress(*update));
    }

    fn status(&mut self, status: &Status) {
        self.push(UiEvent::Status(status.clone()));
    }

    fn notice(&mut self, message: &str) {
        self.push(UiEvent::Notice(message.to_owned()));
    }

    fn controls(&mut self, controls: Controls) {
        self.push(UiEvent::Controls(controls));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/sink.rs"]
mod tests;
