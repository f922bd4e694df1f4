use crate::{
    composite::{
        disposal::DisposalState,
        frame::{FrameSequence, OutputFrame, delay_ms},
    },
    decode::source::FrameSource,
    foundation::error::ReelResult,
};

/// Reconstruct every frame of `source` as it would appear on screen.
///
/// Per frame, in order:
/// 1. apply the previous frame's disposal,
/// 2. snapshot the canvas if this frame restores to previous,
/// 3. blit the frame onto the canvas,
/// 4. copy the canvas into a new [`OutputFrame`].
///
/// Any source error aborts the call; no partial sequence is returned.
#[tracing::instrument(skip(source), fields(width = source.width(), height = source.height(), frames = source.num_frames()))]
pub fn composite<S: FrameSource + ?Sized>(source: &mut S) -> ReelResult<FrameSequence> {
    let dims = source.canvas()?;
    let n = source.num_frames();

    let mut canvas = dims.transparent_buffer()?;
    let mut disposal = DisposalState::default();
    let mut frames = Vec::with_capacity(n);

    for i in 0..n {
        let info = source.frame_info(i)?;
        disposal.enter_frame(&mut canvas, dims, &info)?;
        source.blit_frame(i, &mut canvas)?;

        frames.push(OutputFrame {
            data: canvas.clone(),
            delay_ms: delay_ms(info.delay_cs),
        });
    }

    tracing::debug!(frames = frames.len(), "composited");
    Ok(FrameSequence {
        frames,
        width: dims.width,
        height: dims.height,
    })
}
