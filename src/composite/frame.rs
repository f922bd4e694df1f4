/// Delay used when a frame has no delay, or a delay of zero.
pub const DEFAULT_DELAY_CS: u16 = 10;

/// Fully composited frame, independent of the canvas it was copied from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputFrame {
    /// Straight-alpha RGBA8, row-major, tightly packed.
    pub data: Vec<u8>,
    pub delay_ms: u32,
}

/// Compositor output handed to an encoder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameSequence {
    pub frames: Vec<OutputFrame>,
    pub width: u32,
    pub height: u32,
}

impl FrameSequence {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.frames.iter().map(|f| u64::from(f.delay_ms)).sum()
    }
}

/// Display duration in milliseconds for a raw centisecond delay.
pub fn delay_ms(delay_cs: Option<u16>) -> u32 {
    let cs = match delay_cs {
        None | Some(0) => DEFAULT_DELAY_CS,
        Some(cs) => cs,
    };
    u32::from(cs.max(1)) * 10
}
