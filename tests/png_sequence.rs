use gifreel::{
    FrameSequence, OutputFrame, SequenceManifest, frames_to_mp4, write_png_sequence,
};

fn temp_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "gifreel_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn sample_sequence() -> FrameSequence {
    FrameSequence {
        frames: vec![
            OutputFrame {
                data: vec![255, 0, 0, 255, 0, 0, 0, 0],
                delay_ms: 50,
            },
            OutputFrame {
                data: vec![255, 255, 255, 255, 0, 255, 0, 255],
                delay_ms: 100,
            },
        ],
        width: 2,
        height: 1,
    }
}

#[test]
fn writes_pngs_and_manifest() {
    let dir = temp_dir("png_sequence");
    let manifest_path = write_png_sequence(&sample_sequence(), &dir).unwrap();

    let f = std::fs::File::open(&manifest_path).unwrap();
    let manifest: SequenceManifest = serde_json::from_reader(f).unwrap();
    assert_eq!((manifest.width, manifest.height), (2, 1));
    assert_eq!(manifest.frames.len(), 2);
    assert_eq!(manifest.frames[0].file, "frame_00000.png");
    assert_eq!(manifest.frames[1].delay_ms, 100);

    let img = image::open(dir.join(&manifest.frames[1].file))
        .unwrap()
        .to_rgba8();
    assert_eq!(img.dimensions(), (2, 1));
    assert_eq!(img.get_pixel(1, 0).0, [0, 255, 0, 255]);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn mp4_rejects_empty_sequence() {
    let seq = FrameSequence {
        frames: vec![],
        width: 2,
        height: 2,
    };
    let err = frames_to_mp4(&seq, temp_dir("empty").join("out.mp4"), &Default::default())
        .unwrap_err();
    assert!(err.to_string().contains("no frames"));
}

#[test]
fn mp4_rejects_odd_dimensions() {
    let err = frames_to_mp4(
        &sample_sequence(),
        temp_dir("odd").join("out.mp4"),
        &Default::default(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("even"), "{err}");
}
