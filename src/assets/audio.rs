use std::path::Path;

use crate::assets::media::{AudioPcm, MIX_SAMPLE_RATE, decode_audio_f32_stereo};
use crate::foundation::error::TelescrollResult;

/// Playback handle for the optional soundtrack.
///
/// Times are on the player's clock so a virtual clock keeps audio position deterministic.
pub trait AudioTrack {
    fn play(&mut self, now_ms: u64);
    fn pause(&mut self, now_ms: u64);
    fn seek(&mut self, position_ms: u64, now_ms: u64);
    fn position_ms(&self, now_ms: u64) -> u64;
    fn is_playing(&self) -> bool;

    /// Decoded samples, when this track can be mixed into an export.
    fn pcm(&self) -> Option<&AudioPcm> {
        None
    }
}

/// Decoded track that loops from its start once it runs out.
#[derive(Clone, Debug)]
pub struct PcmTrack {
    pcm: AudioPcm,
    looping: bool,
    position_ms: u64,
    playing_since_ms: Option<u64>,
}

impl PcmTrack {
    pub fn new(pcm: AudioPcm) -> Self {
        Self {
            pcm,
            looping: true,
            position_ms: 0,
            playing_since_ms: None,
        }
    }

    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn duration_ms(&self) -> u64 {
        self.pcm.duration_ms()
    }

    fn wrap_position(&self, raw_ms: u64) -> u64 {
        let dur = self.duration_ms();
        if dur == 0 {
            0
        } else if self.looping {
            raw_ms % dur
        } else {
            raw_ms.min(dur)
        }
    }
}

impl AudioTrack for PcmTrack {
    fn play(&mut self, now_ms: u64) {
        if self.playing_since_ms.is_none() {
            self.playing_since_ms = Some(now_ms);
        }
    }

    fn pause(&mut self, now_ms: u64) {
        self.position_ms = self.position_ms(now_ms);
        self.playing_since_ms = None;
    }

    fn seek(&mut self, position_ms: u64, now_ms: u64) {
        self.position_ms = self.wrap_position(position_ms);
        if self.playing_since_ms.is_some() {
            self.playing_since_ms = Some(now_ms);
        }
    }

    fn position_ms(&self, now_ms: u64) -> u64 {
        match self.playing_since_ms {
            None => self.position_ms,
            Some(since) => self.wrap_position(self.position_ms + now_ms.saturating_sub(since)),
        }
    }

    fn is_playing(&self) -> bool {
        self.playing_since_ms.is_some()
    }

    fn pcm(&self) -> Option<&AudioPcm> {
        Some(&self.pcm)
    }
}

pub fn load_audio(path: &Path) -> TelescrollResult<PcmTrack> {
    let pcm = decode_audio_f32_stereo(path, MIX_SAMPLE_RATE)?;
    tracing::info!(path = %path.display(), duration_ms = pcm.duration_ms(), "loaded audio track");
    Ok(PcmTrack::new(pcm))
}

/// Interleaved samples covering `lead_silence_ms` of silence followed by `body_ms` of `pcm`,
/// looped from its start.
pub fn looped_window(pcm: &AudioPcm, lead_silence_ms: u64, body_ms: u64) -> Vec<f32> {
    let channels = usize::from(pcm.channels.max(1));
    let ms_to_frames = |ms: u64| (ms * u64::from(pcm.sample_rate) / 1000) as usize;
    let lead = ms_to_frames(lead_silence_ms) * channels;
    let body = ms_to_frames(body_ms) * channels;

    let mut out = vec![0.0f32; lead + body];
    let src = &pcm.interleaved_f32[..pcm.frame_count() * channels];
    if src.is_empty() {
        return out;
    }
    for (dst, s) in out[lead..].iter_mut().zip(src.iter().cycle()) {
        *dst = *s;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/assets/audio.rs"]
mod tests;
