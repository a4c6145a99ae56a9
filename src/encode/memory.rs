use crate::encode::{Container, EncoderConfig, MediaEncoder, check_frame};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{TelescrollError, TelescrollResult};
use crate::render::surface::FrameRGBA;

pub const STREAM_MAGIC: &[u8; 4] = b"TSCR";

/// Deterministic encoder double for tests and dry runs.
///
/// Emits a header chunk on `begin` and one small chunk per frame (index plus a byte sum of the
/// pixels); `finish` emits a trailer with the frame count.
#[derive(Debug, Default)]
pub struct InMemoryEncoder {
    container: Container,
    /// Config of the most recent `begin`, kept after the session ends.
    cfg: Option<EncoderConfig>,
    running: bool,
    frames: Vec<FrameIndex>,
    pending: Vec<Vec<u8>>,
    last_idx: Option<FrameIndex>,
    /// Fail `push_frame` at this index, to exercise error paths.
    fail_at: Option<FrameIndex>,
    aborted: bool,
}

impl InMemoryEncoder {
    pub fn new(container: Container) -> Self {
        Self {
            container,
            ..Self::default()
        }
    }

    pub fn failing_at(mut self, idx: FrameIndex) -> Self {
        self.fail_at = Some(idx);
        self
    }

    pub fn config(&self) -> Option<&EncoderConfig> {
        self.cfg.as_ref()
    }

    pub fn frames(&self) -> &[FrameIndex] {
        &self.frames
    }

    pub fn was_aborted(&self) -> bool {
        self.aborted
    }
}

impl MediaEncoder for InMemoryEncoder {
    fn container(&self) -> Container {
        self.container
    }

    fn begin(&mut self, cfg: EncoderConfig) -> TelescrollResult<()> {
        cfg.validate()?;
        let mut header = STREAM_MAGIC.to_vec();
        header.extend_from_slice(&cfg.width.to_le_bytes());
        header.extend_from_slice(&cfg.height.to_le_bytes());
        header.extend_from_slice(&cfg.fps.num.to_le_bytes());
        header.extend_from_slice(&cfg.fps.den.to_le_bytes());
        header.push(u8::from(cfg.audio.is_some()));
        self.pending = vec![header];
        self.frames.clear();
        self.last_idx = None;
        self.aborted = false;
        self.running = true;
        self.cfg = Some(cfg);
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> TelescrollResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .filter(|_| self.running)
            .ok_or_else(|| TelescrollError::capture("encoder not started"))?;
        check_frame(cfg, self.last_idx, idx, frame)?;
        if self.fail_at == Some(idx) {
            return Err(TelescrollError::capture(format!(
                "simulated encoder failure at frame {}",
                idx.0
            )));
        }
        self.last_idx = Some(idx);
        self.frames.push(idx);

        let sum = frame
            .data
            .iter()
            .fold(0u64, |acc, &b| acc.wrapping_add(u64::from(b)));
        let mut chunk = idx.0.to_le_bytes().to_vec();
        chunk.extend_from_slice(&sum.to_le_bytes());
        self.pending.push(chunk);
        Ok(())
    }

    fn drain(&mut self) -> Vec<Vec<u8>> {
        std::mem::take(&mut self.pending)
    }

    fn finish(&mut self) -> TelescrollResult<Vec<Vec<u8>>> {
        if !self.running {
            return Err(TelescrollError::capture("encoder not started"));
        }
        self.running = false;
        let mut rest = std::mem::take(&mut self.pending);
        rest.push((self.frames.len() as u64).to_le_bytes().to_vec());
        Ok(rest)
    }

    fn abort(&mut self) {
        self.running = false;
        self.pending.clear();
        self.aborted = true;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/memory.rs"]
mod tests;
