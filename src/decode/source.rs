use crate::foundation::{
    core::{Canvas, FrameRect},
    error::ReelResult,
};

/// What a frame asks to happen to the canvas once it has been displayed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposal {
    /// Code 0. Treated like [`Disposal::Keep`].
    #[default]
    Unspecified,
    /// Code 1.
    Keep,
    /// Code 2.
    RestoreBackground,
    /// Code 3.
    RestorePrevious,
}

impl Disposal {
    /// Maps the 3-bit graphic control field. Reserved codes 4..=7 read as unspecified.
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Self::Keep,
            2 => Self::RestoreBackground,
            3 => Self::RestorePrevious,
            _ => Self::Unspecified,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Unspecified => 0,
            Self::Keep => 1,
            Self::RestoreBackground => 2,
            Self::RestorePrevious => 3,
        }
    }
}

/// Per-frame metadata as reported by the parser.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameInfo {
    pub rect: FrameRect,
    /// Raw delay in hundredths of a second.
    pub delay_cs: Option<u16>,
    pub disposal: Disposal,
}

/// Number of times a player should repeat the animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopCount {
    Infinite,
    Finite(u16),
}

/// The decoder side of compositing: frame metadata plus an in-place blit.
///
/// Implementations own transparency and palette handling. The compositor only
/// sequences calls and manages the canvas between them.
pub trait FrameSource {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn num_frames(&self) -> usize;

    fn frame_info(&self, index: usize) -> ReelResult<FrameInfo>;

    /// Composite frame `index` onto `canvas` (tightly packed RGBA8 of the logical screen).
    fn blit_frame(&mut self, index: usize, canvas: &mut [u8]) -> ReelResult<()>;

    fn canvas(&self) -> ReelResult<Canvas> {
        Canvas::new(self.width(), self.height())
    }
}
