#![cfg(unix)]

use std::{os::unix::fs::PermissionsExt as _, path::PathBuf};

use gifreel::{FrameSequence, Mp4Opts, OutputFrame, ReelError, frames_to_mp4};

/// Stand-in for an ffmpeg build without libx264: answers `-version`, then fails without
/// reading stdin.
fn failing_ffmpeg(dir: &std::path::Path) -> PathBuf {
    std::fs::create_dir_all(dir).unwrap();
    let path = dir.join("ffmpeg");
    std::fs::write(
        &path,
        "#!/bin/sh\n\
         [ \"$1\" = \"-version\" ] && exit 0\n\
         echo \"Unknown encoder 'libx264'\" >&2\n\
         exit 1\n",
    )
    .unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn solid_sequence(side: u32, frames: usize) -> FrameSequence {
    FrameSequence {
        frames: (0..frames)
            .map(|_| OutputFrame {
                data: vec![200u8; (side * side * 4) as usize],
                delay_ms: 100,
            })
            .collect(),
        width: side,
        height: side,
    }
}

// One test so the stub script is never written while another thread forks.
#[test]
fn ffmpeg_failure_reports_its_stderr() {
    let dir = std::env::temp_dir().join(format!("gifreel_ffmpeg_failure_{}", std::process::id()));
    let opts = Mp4Opts {
        ffmpeg: failing_ffmpeg(&dir),
        ..Mp4Opts::default()
    };

    // Large enough that writing to the dead pipe fails mid-stream.
    let err = frames_to_mp4(&solid_sequence(512, 4), dir.join("big.mp4"), &opts).unwrap_err();
    assert!(matches!(err, ReelError::Encode(_)), "{err}");
    assert!(err.to_string().contains("Unknown encoder 'libx264'"), "{err}");

    // Small enough to fit in the pipe buffer; the failure surfaces at finish.
    let err = frames_to_mp4(&solid_sequence(2, 1), dir.join("small.mp4"), &opts).unwrap_err();
    assert!(err.to_string().contains("Unknown encoder 'libx264'"), "{err}");
    assert!(err.to_string().contains("exited with"), "{err}");

    let _ = std::fs::remove_dir_all(&dir);
}
