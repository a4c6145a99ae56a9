use std::path::Path;

use crate::foundation::error::{TelescrollError, TelescrollResult};

/// Sample rate used for decoded and captured audio.
pub const MIX_SAMPLE_RATE: u32 = 48_000;
pub const MIX_CHANNELS: u16 = 2;

/// Interleaved f32 PCM.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioPcm {
    pub sample_rate: u32,
    pub channels: u16,
    pub interleaved_f32: Vec<f32>,
}

impl AudioPcm {
    pub fn silent(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
            interleaved_f32: Vec::new(),
        }
    }

    /// Number of sample frames (one sample per channel).
    pub fn frame_count(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.interleaved_f32.len() / usize::from(self.channels)
        }
    }

    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        (self.frame_count() as u64 * 1000) / u64::from(self.sample_rate)
    }

    pub fn is_empty(&self) -> bool {
        self.frame_count() == 0
    }
}

#[cfg(feature = "media-ffmpeg")]
pub fn decode_audio_f32_stereo(path: &Path, sample_rate: u32) -> TelescrollResult<AudioPcm> {
    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            "2",
            "-ar",
            &sample_rate.to_string(),
            "pipe:1",
        ])
        .output()
        .map_err(|e| TelescrollError::asset(format!("failed to run ffmpeg for audio decode: {e}")))?;

    if !out.status.success() {
        let msg = String::from_utf8_lossy(&out.stderr);
        // A file with no audio stream decodes to silence.
        if msg.contains("matches no streams")
            || msg.contains("Output file #0 does not contain any stream")
        {
            return Ok(AudioPcm::silent(sample_rate, MIX_CHANNELS));
        }
        return Err(TelescrollError::asset(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            msg.trim()
        )));
    }

    let pcm = f32le_bytes_to_samples(&out.stdout)?;
    tracing::debug!(
        path = %path.display(),
        samples = pcm.len(),
        sample_rate,
        "decoded audio"
    );
    Ok(AudioPcm {
        sample_rate,
        channels: MIX_CHANNELS,
        interleaved_f32: pcm,
    })
}

#[cfg(not(feature = "media-ffmpeg"))]
pub fn decode_audio_f32_stereo(_path: &Path, _sample_rate: u32) -> TelescrollResult<AudioPcm> {
    Err(TelescrollError::asset(
        "audio tracks require the 'media-ffmpeg' feature",
    ))
}

pub fn f32le_bytes_to_samples(bytes: &[u8]) -> TelescrollResult<Vec<f32>> {
    if !bytes.len().is_multiple_of(4) {
        return Err(TelescrollError::asset(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

pub fn write_pcm_f32le_file(samples_interleaved: &[f32], out_path: &Path) -> TelescrollResult<()> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            TelescrollError::capture(format!(
                "failed to create audio output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }

    let mut bytes = Vec::<u8>::with_capacity(samples_interleaved.len() * 4);
    for &sample in samples_interleaved {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(out_path, bytes).map_err(|e| {
        TelescrollError::capture(format!(
            "failed to write audio file '{}': {e}",
            out_path.display()
        ))
    })
}
