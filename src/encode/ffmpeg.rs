use std::io::{Read, Write as _};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{Receiver, TryRecvError, channel};
use std::thread::JoinHandle;

use crate::encode::{Container, EncoderConfig, MediaEncoder, check_frame};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{TelescrollError, TelescrollResult};
use crate::foundation::math::mul_div255;
use crate::render::surface::FrameRGBA;

const STDOUT_CHUNK_BYTES: usize = 64 * 1024;
const WEBM_VIDEO_BITRATE: &str = "5M";

/// Streams raw frames into the system `ffmpeg` and collects the encoded container from its
/// stdout as chunks.
pub struct FfmpegEncoder {
    container: Container,
    /// Background the premultiplied frames are flattened over (straight RGBA8).
    bg_rgba: [u8; 4],

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    chunks: Option<Receiver<Vec<u8>>>,
    stdout_reader: Option<JoinHandle<std::io::Result<()>>>,
    stderr_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,

    scratch: Vec<u8>,
    cfg: Option<EncoderConfig>,
    last_idx: Option<FrameIndex>,
}

impl std::fmt::Debug for FfmpegEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FfmpegEncoder")
            .field("container", &self.container)
            .field("running", &self.child.is_some())
            .field("last_idx", &self.last_idx)
            .finish_non_exhaustive()
    }
}

impl FfmpegEncoder {
    pub fn new(container: Container) -> Self {
        Self {
            container,
            bg_rgba: [0, 0, 0, 255],
            child: None,
            stdin: None,
            chunks: None,
            stdout_reader: None,
            stderr_drain: None,
            scratch: Vec::new(),
            cfg: None,
            last_idx: None,
        }
    }

    pub fn with_background(mut self, bg_rgba: [u8; 4]) -> Self {
        self.bg_rgba = bg_rgba;
        self
    }

    fn command(&self, cfg: &EncoderConfig) -> Command {
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // Frames are flattened to opaque RGBA before they reach stdin.
        cmd.args([
            "-y",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
        ]);
        push_input_fps(&mut cmd, cfg.fps);
        cmd.args(["-i", "pipe:0"]);

        if let Some(audio) = cfg.audio.as_ref() {
            cmd.args([
                "-f",
                "f32le",
                "-ar",
                &audio.sample_rate.to_string(),
                "-ac",
                &audio.channels.to_string(),
                "-i",
            ])
            .arg(&audio.path);
        }

        match self.container {
            Container::Mp4 => {
                cmd.args(["-c:v", "libx264", "-pix_fmt", "yuv420p"]);
                if cfg.audio.is_some() {
                    cmd.args(["-c:a", "aac", "-shortest"]);
                } else {
                    cmd.arg("-an");
                }
                // A non-seekable pipe needs a fragmented mp4.
                cmd.args([
                    "-movflags",
                    "frag_keyframe+empty_moov+default_base_moof",
                    "-f",
                    "mp4",
                ]);
            }
            Container::WebM => {
                cmd.args([
                    "-c:v",
                    "libvpx-vp9",
                    "-b:v",
                    WEBM_VIDEO_BITRATE,
                    "-pix_fmt",
                    "yuv420p",
                ]);
                if cfg.audio.is_some() {
                    cmd.args(["-c:a", "libopus", "-shortest"]);
                } else {
                    cmd.arg("-an");
                }
                cmd.args(["-f", "webm"]);
            }
        }
        cmd.arg("pipe:1");
        cmd
    }

    fn join_readers(&mut self) -> TelescrollResult<Vec<u8>> {
        if let Some(handle) = self.stdout_reader.take() {
            handle
                .join()
                .map_err(|_| TelescrollError::capture("ffmpeg stdout reader thread panicked"))?
                .map_err(|e| TelescrollError::capture(format!("ffmpeg stdout read failed: {e}")))?;
        }
        match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| TelescrollError::capture("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| TelescrollError::capture(format!("ffmpeg stderr read failed: {e}"))),
            None => Ok(Vec::new()),
        }
    }
}

impl MediaEncoder for FfmpegEncoder {
    fn container(&self) -> Container {
        self.container
    }

    fn begin(&mut self, cfg: EncoderConfig) -> TelescrollResult<()> {
        cfg.validate()?;
        if cfg.container != self.container {
            return Err(TelescrollError::validation(format!(
                "encoder produces {}, session asked for {}",
                self.container, cfg.container
            )));
        }
        if self.child.is_some() {
            return Err(TelescrollError::capture("ffmpeg encoder already started"));
        }
        if !is_ffmpeg_on_path() {
            return Err(TelescrollError::capture(
                "ffmpeg is required for video export, but was not found on PATH",
            ));
        }

        let mut child = self.command(&cfg).spawn().map_err(|e| {
            TelescrollError::capture(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| TelescrollError::capture("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| TelescrollError::capture("failed to open ffmpeg stdout (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| TelescrollError::capture("failed to open ffmpeg stderr (unexpected)"))?;

        let (tx, rx) = channel();
        let stdout_reader = std::thread::spawn(move || -> std::io::Result<()> {
            let mut buf = vec![0u8; STDOUT_CHUNK_BYTES];
            loop {
                let n = stdout.read(&mut buf)?;
                if n == 0 {
                    return Ok(());
                }
                if tx.send(buf[..n].to_vec()).is_err() {
                    // Receiver dropped on abort; keep draining so ffmpeg can exit.
                    continue;
                }
            }
        });
        let stderr_drain = std::thread::spawn(move || -> std::io::Result<Vec<u8>> {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        tracing::debug!(
            container = %self.container,
            width = cfg.width,
            height = cfg.height,
            audio = cfg.audio.is_some(),
            "spawned ffmpeg encoder"
        );
        self.scratch = vec![0u8; cfg.frame_len()];
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.chunks = Some(rx);
        self.stdout_reader = Some(stdout_reader);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> TelescrollResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| TelescrollError::capture("ffmpeg encoder not started"))?;
        check_frame(cfg, self.last_idx, idx, frame)?;
        self.last_idx = Some(idx);

        if frame.premultiplied {
            flatten_premul_over_bg_to_opaque_rgba8(&mut self.scratch, &frame.data, self.bg_rgba)?;
        } else {
            self.scratch.copy_from_slice(&frame.data);
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(TelescrollError::capture("ffmpeg encoder is already finalized"));
        };
        stdin.write_all(&self.scratch).map_err(|e| {
            TelescrollError::capture(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    fn drain(&mut self) -> Vec<Vec<u8>> {
        let mut out = Vec::new();
        let Some(rx) = self.chunks.as_ref() else {
            return out;
        };
        loop {
            match rx.try_recv() {
                Ok(chunk) => out.push(chunk),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return out,
            }
        }
    }

    fn finish(&mut self) -> TelescrollResult<Vec<Vec<u8>>> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| TelescrollError::capture("ffmpeg encoder not started"))?;

        let status = child.wait().map_err(|e| {
            TelescrollError::capture(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = self.join_readers()?;
        let rest: Vec<Vec<u8>> = self
            .chunks
            .take()
            .map(|rx| rx.into_iter().collect())
            .unwrap_or_default();
        self.cfg = None;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(TelescrollError::capture(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }
        Ok(rest)
    }

    fn abort(&mut self) {
        drop(self.stdin.take());
        drop(self.chunks.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        if let Err(err) = self.join_readers() {
            tracing::warn!(error = %err, "ffmpeg reader threads did not shut down cleanly");
        }
        self.cfg = None;
        self.last_idx = None;
    }
}

impl Drop for FfmpegEncoder {
    fn drop(&mut self) {
        if self.child.is_some() {
            self.abort();
        }
    }
}

fn push_input_fps(cmd: &mut Command, fps: Fps) {
    // `-r` before `-i` sets the rawvideo input rate.
    cmd.args(["-r", &format!("{}/{}", fps.num, fps.den)]);
}

pub(crate) fn flatten_premul_over_bg_to_opaque_rgba8(
    dst: &mut [u8],
    src_premul: &[u8],
    bg_rgba: [u8; 4],
) -> TelescrollResult<()> {
    if dst.len() != src_premul.len() || !dst.len().is_multiple_of(4) {
        return Err(TelescrollError::validation(
            "flatten expects equal-length rgba8 buffers",
        ));
    }

    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255 - a;
        for ((dc, &sc), &bc) in d[..3].iter_mut().zip(&s[..3]).zip(&bg_rgba[..3]) {
            let v = u16::from(sc) + u16::from(mul_div255(u16::from(bc), inv));
            *dc = v.min(255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
