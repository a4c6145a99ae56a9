use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context as _;

use crate::encode::{Container, ensure_parent_dir};
use crate::foundation::error::{TelescrollError, TelescrollResult};

pub const ARTIFACT_PREFIX: &str = "telescroll-video-";

/// Encoded chunks collected during one record-and-export operation.
#[derive(Debug)]
pub struct CaptureSession {
    container: Container,
    chunks: Vec<Vec<u8>>,
}

impl CaptureSession {
    pub fn new(container: Container) -> Self {
        Self {
            container,
            chunks: Vec::new(),
        }
    }

    pub fn container(&self) -> Container {
        self.container
    }

    /// Append chunks in arrival order. Empty chunks are dropped.
    pub fn extend(&mut self, chunks: impl IntoIterator<Item = Vec<u8>>) {
        self.chunks
            .extend(chunks.into_iter().filter(|c| !c.is_empty()));
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn byte_len(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Concatenate every chunk into one artifact.
    pub fn assemble(&self) -> TelescrollResult<Vec<u8>> {
        if self.is_empty() {
            return Err(TelescrollError::capture(
                "encoder produced no data (stream empty)",
            ));
        }
        Ok(self.chunks.concat())
    }

    /// Write the artifact into `out_dir`, named after the current time.
    pub fn finalize(self, out_dir: &Path) -> TelescrollResult<PathBuf> {
        self.finalize_at(out_dir, epoch_ms())
    }

    pub fn finalize_at(self, out_dir: &Path, epoch_ms: u128) -> TelescrollResult<PathBuf> {
        let bytes = self.assemble()?;
        let path = out_dir.join(artifact_name(epoch_ms, self.container));
        ensure_parent_dir(&path)?;
        std::fs::write(&path, &bytes)
            .with_context(|| format!("failed to write video '{}'", path.display()))?;
        tracing::info!(
            path = %path.display(),
            bytes = bytes.len(),
            chunks = self.chunks.len(),
            "video written"
        );
        Ok(path)
    }
}

pub fn artifact_name(epoch_ms: u128, container: Container) -> String {
    format!("{ARTIFACT_PREFIX}{epoch_ms}.{}", container.extension())
}

fn epoch_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "../../tests/unit/capture/session.rs"]
mod tests;
