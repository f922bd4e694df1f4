use std::io::Read;

use crate::{
    decode::source::{Disposal, FrameInfo, FrameSource, LoopCount},
    foundation::{
        core::{Canvas, FrameRect},
        error::{ReelError, ReelResult},
    },
};

struct DecodedFrame {
    info: FrameInfo,
    /// Straight RGBA8 covering `info.rect`; alpha 0 marks the transparent index.
    rgba: Vec<u8>,
}

/// [`FrameSource`] over a fully decoded GIF bitstream.
///
/// Every frame is LZW-decoded and palette-resolved up front, so the frame count is
/// known before compositing starts and a truncated stream fails at construction.
pub struct GifParser {
    canvas: Canvas,
    loop_count: LoopCount,
    frames: Vec<DecodedFrame>,
}

impl GifParser {
    pub fn from_bytes(bytes: &[u8]) -> ReelResult<Self> {
        Self::from_reader(bytes)
    }

    #[tracing::instrument(skip(reader))]
    pub fn from_reader<R: Read>(reader: R) -> ReelResult<Self> {
        let mut opts = gif::DecodeOptions::new();
        opts.set_color_output(gif::ColorOutput::RGBA);
        let mut decoder = opts.read_info(reader)?;

        let canvas = Canvas::new(u32::from(decoder.width()), u32::from(decoder.height()))?;

        let mut frames = Vec::new();
        while let Some(frame) = decoder.read_next_frame()? {
            let rect = FrameRect::new(
                u32::from(frame.left),
                u32::from(frame.top),
                u32::from(frame.width),
                u32::from(frame.height),
            );
            let expected = (rect.width as usize) * (rect.height as usize) * 4;
            if frame.buffer.len() != expected {
                return Err(ReelError::validation(format!(
                    "frame {} pixel buffer is {} bytes, expected {expected}",
                    frames.len(),
                    frame.buffer.len()
                )));
            }
            if !rect.fits_within(canvas) {
                tracing::debug!(
                    index = frames.len(),
                    ?rect,
                    "frame rectangle extends past the logical screen; it will be clipped"
                );
            }

            frames.push(DecodedFrame {
                info: FrameInfo {
                    rect,
                    delay_cs: (frame.delay > 0).then_some(frame.delay),
                    disposal: Disposal::from_code(frame.dispose as u8),
                },
                rgba: frame.buffer.to_vec(),
            });
        }

        let loop_count = match decoder.repeat() {
            gif::Repeat::Infinite => LoopCount::Infinite,
            gif::Repeat::Finite(n) => LoopCount::Finite(n),
        };

        tracing::debug!(
            width = canvas.width,
            height = canvas.height,
            frames = frames.len(),
            "decoded gif"
        );

        Ok(Self {
            canvas,
            loop_count,
            frames,
        })
    }

    pub fn loop_count(&self) -> LoopCount {
        self.loop_count
    }

    pub fn frame_infos(&self) -> impl Iterator<Item = FrameInfo> + '_ {
        self.frames.iter().map(|f| f.info)
    }

    fn frame(&self, index: usize) -> ReelResult<&DecodedFrame> {
        self.frames.get(index).ok_or_else(|| {
            ReelError::validation(format!(
                "frame index {index} out of range (have {})",
                self.frames.len()
            ))
        })
    }
}

impl FrameSource for GifParser {
    fn width(&self) -> u32 {
        self.canvas.width
    }

    fn height(&self) -> u32 {
        self.canvas.height
    }

    fn num_frames(&self) -> usize {
        self.frames.len()
    }

    fn frame_info(&self, index: usize) -> ReelResult<FrameInfo> {
        Ok(self.frame(index)?.info)
    }

    fn blit_frame(&mut self, index: usize, canvas: &mut [u8]) -> ReelResult<()> {
        let frame = self.frame(index)?;
        blit_rgba(canvas, self.canvas, frame.info.rect, &frame.rgba)
    }
}

/// Copy the opaque pixels of `src` (covering `rect`) onto `dst`, clipped to `canvas`.
pub(crate) fn blit_rgba(
    dst: &mut [u8],
    canvas: Canvas,
    rect: FrameRect,
    src: &[u8],
) -> ReelResult<()> {
    if dst.len() != canvas.rgba_len()? {
        return Err(ReelError::validation(
            "blit expects a canvas buffer matching width*height*4",
        ));
    }
    let Some((x0, y0, x1, y1)) = rect.clamp_to(canvas) else {
        return Ok(());
    };

    let src_stride = rect.width as usize * 4;
    let dst_stride = canvas.width as usize * 4;
    for y in y0..y1 {
        let src_row = (y - rect.y) as usize * src_stride;
        let dst_row = y as usize * dst_stride;
        for x in x0..x1 {
            let s = src_row + (x - rect.x) as usize * 4;
            let px = &src[s..s + 4];
            if px[3] == 0 {
                continue;
            }
            let d = dst_row + x as usize * 4;
            dst[d..d + 4].copy_from_slice(px);
        }
    }
    Ok(())
}
