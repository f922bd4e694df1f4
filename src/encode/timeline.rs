/// Maps variable per-frame delays onto a constant output frame rate.
///
/// Each source frame ends at `round(elapsed_ms * fps / 1000)` output ticks, so rounding
/// error never accumulates across a long animation.
#[derive(Clone, Debug)]
pub struct FrameTimeline {
    fps: u32,
    elapsed_ms: u64,
    emitted: u64,
}

impl FrameTimeline {
    pub fn new(fps: u32) -> Self {
        Self {
            fps,
            elapsed_ms: 0,
            emitted: 0,
        }
    }

    /// How many times to write the next source frame, which lasts `delay_ms`.
    pub fn advance(&mut self, delay_ms: u32) -> u64 {
        self.elapsed_ms += u64::from(delay_ms);
        let end = (self.elapsed_ms * u64::from(self.fps) + 500) / 1000;
        let repeats = end.saturating_sub(self.emitted);
        self.emitted += repeats;
        repeats
    }

    /// Output frames written so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}
