use std::{
    ffi::OsString,
    io::{Read as _, Write as _},
    path::{Path, PathBuf},
    process::{Child, ChildStdin, Command, Stdio},
};

use anyhow::Context as _;

use crate::{
    composite::frame::FrameSequence,
    encode::timeline::FrameTimeline,
    foundation::error::{ReelError, ReelResult},
};

pub const DEFAULT_FFMPEG: &str = "ffmpeg";

#[derive(Clone, Debug)]
pub struct EncodeConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub out_path: PathBuf,
    pub overwrite: bool,
    /// ffmpeg executable; a bare name is looked up on `PATH`.
    pub program: PathBuf,
}

impl EncodeConfig {
    pub fn new(width: u32, height: u32, fps: u32, out_path: impl Into<PathBuf>) -> Self {
        Self {
            width,
            height,
            fps,
            out_path: out_path.into(),
            overwrite: true,
            program: PathBuf::from(DEFAULT_FFMPEG),
        }
    }

    pub fn validate(&self) -> ReelResult<()> {
        if self.width == 0 || self.height == 0 || self.fps == 0 {
            return Err(ReelError::validation(format!(
                "encode needs non-zero size and fps (got {}x{} @ {})",
                self.width, self.height, self.fps
            )));
        }
        // yuv420p subsamples chroma 2x2.
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(ReelError::validation(format!(
                "encode width/height must be even for yuv420p mp4 (got {}x{})",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Arguments for reading raw RGBA from stdin and writing H.264 to `out_path`.
    fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![if self.overwrite { "-y" } else { "-n" }.into()];
        args.extend(
            [
                "-loglevel",
                "error",
                "-f",
                "rawvideo",
                "-pix_fmt",
                "rgba",
                "-s",
                &format!("{}x{}", self.width, self.height),
                "-r",
                &self.fps.to_string(),
                "-i",
                "pipe:0",
                "-an",
                "-c:v",
                "libx264",
                "-pix_fmt",
                "yuv420p",
                "-movflags",
                "+faststart",
            ]
            .map(OsString::from),
        );
        args.push(self.out_path.clone().into_os_string());
        args
    }
}

/// True if `program -version` runs and succeeds.
pub fn ffmpeg_available(program: &Path) -> bool {
    Command::new(program)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

pub fn is_ffmpeg_on_path() -> bool {
    ffmpeg_available(Path::new(DEFAULT_FFMPEG))
}

/// Streams frames into an ffmpeg child process.
///
/// The child is always reaped: by [`FfmpegEncoder::finish`], by the first failed write
/// (whose error then carries ffmpeg's stderr), or on drop, which kills it.
pub struct FfmpegEncoder {
    cfg: EncodeConfig,
    bg_rgba: [u8; 4],
    child: Child,
    stdin: Option<ChildStdin>,
    scratch: Vec<u8>,
    reaped: bool,
}

impl FfmpegEncoder {
    pub fn new(cfg: EncodeConfig, bg_rgba: [u8; 4]) -> ReelResult<Self> {
        cfg.validate()?;
        if let Some(parent) = cfg.out_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        if !cfg.overwrite && cfg.out_path.exists() {
            return Err(ReelError::validation(format!(
                "output file '{}' already exists",
                cfg.out_path.display()
            )));
        }
        if !ffmpeg_available(&cfg.program) {
            return Err(ReelError::encode(format!(
                "'{}' is required for MP4 encoding but could not be run",
                cfg.program.display()
            )));
        }

        tracing::debug!(program = %cfg.program.display(), out = %cfg.out_path.display(), fps = cfg.fps, "spawning ffmpeg");
        let mut child = Command::new(&cfg.program)
            .args(cfg.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ReelError::encode(format!("failed to spawn ffmpeg: {e}")))?;
        let stdin = child.stdin.take();

        Ok(Self {
            scratch: vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 4],
            cfg,
            bg_rgba,
            child,
            stdin,
            reaped: false,
        })
    }

    /// Write one straight-alpha RGBA frame `repeats` times.
    pub fn encode_frame(&mut self, data: &[u8], repeats: u64) -> ReelResult<()> {
        if data.len() != self.scratch.len() {
            return Err(ReelError::validation(format!(
                "frame data is {} bytes, expected {} for {}x{}",
                data.len(),
                self.scratch.len(),
                self.cfg.width,
                self.cfg.height
            )));
        }
        if repeats == 0 {
            return Ok(());
        }

        for (d, s) in self.scratch.chunks_exact_mut(4).zip(data.chunks_exact(4)) {
            d.copy_from_slice(&over_background([s[0], s[1], s[2], s[3]], self.bg_rgba));
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(ReelError::encode("ffmpeg encoder is already finalized"));
        };
        let written = (0..repeats).try_for_each(|_| stdin.write_all(&self.scratch));
        if let Err(e) = written {
            return Err(self.abort(format!("failed to write frame to ffmpeg: {e}")));
        }
        Ok(())
    }

    /// Write a whole sequence, honoring each frame's display duration.
    pub fn encode_sequence(&mut self, seq: &FrameSequence) -> ReelResult<()> {
        if (seq.width, seq.height) != (self.cfg.width, self.cfg.height) {
            return Err(ReelError::validation(format!(
                "sequence is {}x{}, encoder expects {}x{}",
                seq.width, seq.height, self.cfg.width, self.cfg.height
            )));
        }

        let mut timeline = FrameTimeline::new(self.cfg.fps);
        for (i, frame) in seq.frames.iter().enumerate() {
            let repeats = timeline.advance(frame.delay_ms);
            if repeats == 0 {
                tracing::debug!(index = i, delay_ms = frame.delay_ms, "frame shorter than one output tick");
            }
            self.encode_frame(&frame.data, repeats)?;
        }

        if timeline.emitted() == 0
            && let Some(last) = seq.frames.last()
        {
            self.encode_frame(&last.data, 1)?;
        }
        Ok(())
    }

    pub fn finish(mut self) -> ReelResult<()> {
        self.reap()
    }

    /// Close stdin, drain stderr, and wait. Fails if ffmpeg exited unsuccessfully.
    fn reap(&mut self) -> ReelResult<()> {
        drop(self.stdin.take());
        self.reaped = true;

        let mut stderr = Vec::new();
        if let Some(mut pipe) = self.child.stderr.take() {
            let _ = pipe.read_to_end(&mut stderr);
        }
        let status = self
            .child
            .wait()
            .map_err(|e| ReelError::encode(format!("failed to wait for ffmpeg: {e}")))?;

        if !status.success() {
            return Err(ReelError::encode(format!(
                "ffmpeg exited with {status}: {}",
                String::from_utf8_lossy(&stderr).trim()
            )));
        }
        Ok(())
    }

    fn abort(&mut self, what: String) -> ReelError {
        match self.reap() {
            Ok(()) => ReelError::encode(what),
            Err(ReelError::Encode(reason)) => ReelError::encode(format!("{what}; {reason}")),
            Err(other) => ReelError::encode(format!("{what}; {other}")),
        }
    }
}

impl Drop for FfmpegEncoder {
    fn drop(&mut self) {
        if self.reaped {
            return;
        }
        drop(self.stdin.take());
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Straight-alpha `px` composited over an opaque `bg`.
fn over_background(px: [u8; 4], bg: [u8; 4]) -> [u8; 4] {
    let a = u32::from(px[3]);
    if a == 255 {
        return px;
    }
    let mix = |c: u8, b: u8| ((u32::from(c) * a + u32::from(b) * (255 - a) + 127) / 255) as u8;
    [mix(px[0], bg[0]), mix(px[1], bg[1]), mix(px[2], bg[2]), 255]
}
