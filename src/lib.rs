#![forbid(unsafe_code)]

//! Animated GIF frame compositor.
//!
//! GIF frames are usually partial updates painted onto a persistent canvas, with a per-frame
//! disposal rule saying how that canvas is cleaned up before the next frame. [`composite`]
//! replays those rules and yields one complete RGBA image per frame, each with its display
//! duration, ready for a video encoder.

pub mod composite;
pub mod decode;
pub mod encode;
pub mod foundation;
pub mod pipeline;

pub use composite::{
    compositor::composite,
    disposal::BACKGROUND_RGBA,
    frame::{DEFAULT_DELAY_CS, FrameSequence, OutputFrame, delay_ms},
};
pub use decode::{
    gif_parser::GifParser,
    source::{Disposal, FrameInfo, FrameSource, LoopCount},
};
pub use encode::{
    ffmpeg::{DEFAULT_FFMPEG, EncodeConfig, FfmpegEncoder, ffmpeg_available, is_ffmpeg_on_path},
    png_seq::{ManifestEntry, SequenceManifest, write_png_sequence},
    timeline::FrameTimeline,
};
pub use foundation::{
    core::{Canvas, FrameRect},
    error::{ReelError, ReelResult},
};
pub use pipeline::{Mp4Opts, composite_many, frames_to_mp4, gif_to_frames, gif_to_mp4};
