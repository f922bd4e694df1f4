use std::path::PathBuf;

use rayon::prelude::*;

use crate::{
    composite::{compositor::composite, frame::FrameSequence},
    decode::gif_parser::GifParser,
    encode::ffmpeg::{DEFAULT_FFMPEG, EncodeConfig, FfmpegEncoder},
    foundation::error::{ReelError, ReelResult},
};

/// Parse a GIF and composite all of its frames.
pub fn gif_to_frames(bytes: &[u8]) -> ReelResult<FrameSequence> {
    let mut parser = GifParser::from_bytes(bytes)?;
    composite(&mut parser)
}

/// Composite independent inputs in parallel. Results keep input order.
pub fn composite_many<B>(inputs: &[B]) -> Vec<ReelResult<FrameSequence>>
where
    B: AsRef<[u8]> + Sync,
{
    inputs
        .par_iter()
        .map(|bytes| gif_to_frames(bytes.as_ref()))
        .collect()
}

/// Options for [`gif_to_mp4`].
#[derive(Clone, Debug)]
pub struct Mp4Opts {
    /// Constant output frame rate; GIF delays are mapped onto it.
    pub fps: u32,
    /// Background color to flatten alpha over (RGBA8, straight alpha).
    pub bg_rgba: [u8; 4],
    /// Whether to overwrite `out_path` if it already exists.
    pub overwrite: bool,
    /// ffmpeg executable to run.
    pub ffmpeg: PathBuf,
}

impl Default for Mp4Opts {
    fn default() -> Self {
        Self {
            fps: 30,
            bg_rgba: [0, 0, 0, 255],
            overwrite: true,
            ffmpeg: PathBuf::from(DEFAULT_FFMPEG),
        }
    }
}

/// Encode a composited sequence to MP4 via an `ffmpeg` subprocess.
///
/// If ffmpeg fails, the error carries its stderr.
pub fn frames_to_mp4(
    seq: &FrameSequence,
    out_path: impl Into<PathBuf>,
    opts: &Mp4Opts,
) -> ReelResult<()> {
    if seq.is_empty() {
        return Err(ReelError::validation("cannot encode an animation with no frames"));
    }

    let cfg = EncodeConfig {
        overwrite: opts.overwrite,
        program: opts.ffmpeg.clone(),
        ..EncodeConfig::new(seq.width, seq.height, opts.fps, out_path)
    };
    let mut enc = FfmpegEncoder::new(cfg, opts.bg_rgba)?;
    enc.encode_sequence(seq)?;
    enc.finish()
}

/// Parse, composite, and encode a GIF to MP4. `ffmpeg` must be on `PATH`.
pub fn gif_to_mp4(bytes: &[u8], out_path: impl Into<PathBuf>, opts: &Mp4Opts) -> ReelResult<()> {
    let seq = gif_to_frames(bytes)?;
    frames_to_mp4(&seq, out_path, opts)
}
