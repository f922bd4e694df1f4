use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{composite::frame::FrameSequence, foundation::error::ReelResult};

pub const MANIFEST_FILE: &str = "frames.json";

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SequenceManifest {
    pub width: u32,
    pub height: u32,
    pub frames: Vec<ManifestEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ManifestEntry {
    pub file: String,
    pub delay_ms: u32,
}

pub fn frame_file_name(index: usize) -> String {
    format!("frame_{index:05}.png")
}

/// Write each frame as `frame_NNNNN.png` under `dir`, plus a `frames.json` manifest.
///
/// Returns the manifest path.
#[tracing::instrument(skip(seq), fields(frames = seq.len()))]
pub fn write_png_sequence(seq: &FrameSequence, dir: &Path) -> ReelResult<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create output dir '{}'", dir.display()))?;

    let mut entries = Vec::with_capacity(seq.len());
    for (i, frame) in seq.frames.iter().enumerate() {
        let file = frame_file_name(i);
        let path = dir.join(&file);
        image::save_buffer_with_format(
            &path,
            &frame.data,
            seq.width,
            seq.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        entries.push(ManifestEntry {
            file,
            delay_ms: frame.delay_ms,
        });
    }

    let manifest = SequenceManifest {
        width: seq.width,
        height: seq.height,
        frames: entries,
    };
    let manifest_path = dir.join(MANIFEST_FILE);
    let f = std::fs::File::create(&manifest_path)
        .with_context(|| format!("create manifest '{}'", manifest_path.display()))?;
    serde_json::to_writer_pretty(f, &manifest).context("write manifest json")?;

    tracing::info!(dir = %dir.display(), frames = seq.len(), "wrote png sequence");
    Ok(manifest_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_zero_padded() {
        assert_eq!(frame_file_name(0), "frame_00000.png");
        assert_eq!(frame_file_name(123), "frame_00123.png");
    }
}
