use crate::foundation::error::{ReelError, ReelResult};

/// Logical screen size of an animation. Fixed for the whole decode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> ReelResult<Self> {
        if width == 0 || height == 0 {
            return Err(ReelError::validation(format!(
                "canvas width/height must be non-zero (got {width}x{height})"
            )));
        }
        Ok(Self { width, height })
    }

    /// Byte length of a tightly packed RGBA8 buffer of this size.
    pub fn rgba_len(self) -> ReelResult<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| ReelError::validation("canvas buffer size overflow"))
    }

    pub fn transparent_buffer(self) -> ReelResult<Vec<u8>> {
        Ok(vec![0u8; self.rgba_len()?])
    }
}

/// Frame rectangle in canvas coordinates. May extend past the canvas edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl FrameRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Intersection with `canvas`, as half-open `(x0, y0, x1, y1)`; `None` when empty.
    pub fn clamp_to(self, canvas: Canvas) -> Option<(u32, u32, u32, u32)> {
        let x0 = self.x.min(canvas.width);
        let y0 = self.y.min(canvas.height);
        let x1 = self.x.saturating_add(self.width).min(canvas.width);
        let y1 = self.y.saturating_add(self.height).min(canvas.height);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0, y0, x1, y1))
    }

    pub fn fits_within(self, canvas: Canvas) -> bool {
        self.x.saturating_add(self.width) <= canvas.width
            && self.y.saturating_add(self.height) <= canvas.height
    }
}
