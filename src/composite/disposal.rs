//! Canvas transitions between consecutive frames.
//!
//! A frame's disposal only takes effect on the way into the *next* frame. `DisposalState`
//! carries that pending instruction (and, for restore-to-previous, the pre-blit snapshot)
//! across exactly one transition.

use crate::{
    decode::source::{Disposal, FrameInfo},
    foundation::{
        core::{Canvas, FrameRect},
        error::{ReelError, ReelResult},
    },
};

/// Fill used by restore-to-background.
///
/// Opaque white, not the transparent/background-color-table fill of the GIF format. Kept for
/// output compatibility with existing renders.
pub const BACKGROUND_RGBA: [u8; 4] = [255, 255, 255, 255];

/// Disposal left behind by the most recently blitted frame.
#[derive(Clone, Debug, Default)]
pub(crate) enum DisposalState {
    /// First frame, or the previous frame asked for no change.
    #[default]
    Idle,
    RestoreBackground(FrameRect),
    /// Canvas as it was right before the previous frame's blit.
    RestorePrevious(Option<Vec<u8>>),
}

impl DisposalState {
    /// Apply the pending disposal to `canvas`, then arm the state with `next`'s own disposal
    /// (snapshotting the canvas if it restores to previous). Call before `next` is blitted.
    pub(crate) fn enter_frame(
        &mut self,
        canvas: &mut [u8],
        dims: Canvas,
        next: &FrameInfo,
    ) -> ReelResult<()> {
        check_len(canvas, dims)?;
        match std::mem::take(self) {
            Self::Idle => {}
            Self::RestoreBackground(rect) => fill_rect(canvas, dims, rect, BACKGROUND_RGBA)?,
            Self::RestorePrevious(Some(snapshot)) => {
                if snapshot.len() != canvas.len() {
                    return Err(ReelError::validation(format!(
                        "snapshot is {} bytes but canvas is {}",
                        snapshot.len(),
                        canvas.len()
                    )));
                }
                canvas.copy_from_slice(&snapshot);
            }
            Self::RestorePrevious(None) => {
                tracing::debug!("restore-to-previous without a snapshot; canvas left unchanged");
            }
        }

        *self = match next.disposal {
            Disposal::Unspecified | Disposal::Keep => Self::Idle,
            Disposal::RestoreBackground => Self::RestoreBackground(next.rect),
            Disposal::RestorePrevious => Self::RestorePrevious(Some(canvas.to_vec())),
        };
        Ok(())
    }
}

fn check_len(canvas: &[u8], dims: Canvas) -> ReelResult<()> {
    let expected = dims.rgba_len()?;
    if canvas.len() != expected {
        return Err(ReelError::validation(format!(
            "canvas buffer is {} bytes, expected {expected} for {}x{}",
            canvas.len(),
            dims.width,
            dims.height
        )));
    }
    Ok(())
}

/// Overwrite every pixel of `rect` that lies on the canvas with `rgba`.
pub(crate) fn fill_rect(
    canvas: &mut [u8],
    dims: Canvas,
    rect: FrameRect,
    rgba: [u8; 4],
) -> ReelResult<()> {
    check_len(canvas, dims)?;
    if !rect.fits_within(dims) {
        tracing::debug!(?rect, "background restore rectangle clamped to canvas");
    }
    let Some((x0, y0, x1, y1)) = rect.clamp_to(dims) else {
        return Ok(());
    };
    let stride = dims.width as usize * 4;
    for y in y0 as usize..y1 as usize {
        let row = &mut canvas[y * stride + x0 as usize * 4..y * stride + x1 as usize * 4];
        for px in row.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }
    Ok(())
}
