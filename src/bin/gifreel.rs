use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use gifreel::FrameSource as _;

#[derive(Parser, Debug)]
#[command(name = "gifreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print dimensions, loop count and per-frame metadata as JSON.
    Info(InfoArgs),
    /// Write every composited frame as a PNG, plus a `frames.json` manifest.
    Frames(FramesArgs),
    /// Render an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct InfoArgs {
    /// Input GIF.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Input GIF.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input GIF.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Output frame rate.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Background color for transparent pixels, as RRGGBB hex.
    #[arg(long, default_value = "000000", value_parser = parse_hex_rgb)]
    bg: [u8; 3],

    /// Fail instead of replacing an existing output file.
    #[arg(long)]
    no_overwrite: bool,

    /// ffmpeg executable to run.
    #[arg(long, default_value = gifreel::DEFAULT_FFMPEG)]
    ffmpeg: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Info(args) => cmd_info(args),
        Command::Frames(args) => cmd_frames(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn read_gif(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("read gif '{}'", path.display()))
}

fn parse_hex_rgb(s: &str) -> Result<[u8; 3], String> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(format!("expected a RRGGBB hex color, got '{s}'"));
    }
    let v = u32::from_str_radix(hex, 16).map_err(|e| format!("invalid hex color '{s}': {e}"))?;
    let [_, r, g, b] = v.to_be_bytes();
    Ok([r, g, b])
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let bytes = read_gif(&args.in_path)?;
    let parser = gifreel::GifParser::from_bytes(&bytes)?;

    let frames = parser
        .frame_infos()
        .enumerate()
        .map(|(i, info)| {
            serde_json::json!({
                "index": i,
                "rect": info.rect,
                "delay_cs": info.delay_cs,
                "delay_ms": gifreel::delay_ms(info.delay_cs),
                "disposal": info.disposal,
            })
        })
        .collect::<Vec<_>>();

    let doc = serde_json::json!({
        "width": parser.width(),
        "height": parser.height(),
        "loop_count": parser.loop_count(),
        "frames": frames,
    });
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let bytes = read_gif(&args.in_path)?;
    let seq = gifreel::gif_to_frames(&bytes)?;
    let manifest = gifreel::write_png_sequence(&seq, &args.out)?;
    eprintln!("wrote {} frames, manifest {}", seq.len(), manifest.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let bytes = read_gif(&args.in_path)?;
    let [r, g, b] = args.bg;
    let opts = gifreel::Mp4Opts {
        fps: args.fps,
        bg_rgba: [r, g, b, 255],
        overwrite: !args.no_overwrite,
        ffmpeg: args.ffmpeg,
    };
    gifreel::gif_to_mp4(&bytes, &args.out, &opts)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_parse_with_or_without_hash() {
        assert_eq!(parse_hex_rgb("ff8000"), Ok([255, 128, 0]));
        assert_eq!(parse_hex_rgb("#0A0b0C"), Ok([10, 11, 12]));
    }

    #[test]
    fn malformed_hex_colors_are_rejected() {
        for bad in ["", "fff", "ff80000", "gg0000", "+f0000", "a\u{e9}aaa", "\u{e9}\u{e9}\u{e9}"] {
            assert!(parse_hex_rgb(bad).is_err(), "{bad:?} should be rejected");
        }
    }
}
