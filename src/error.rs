//! Ticker errors

use core::fmt;

/// Errors raised while configuring or controlling a ticker
///
/// Display bus failures are not listed here; they surface as the display
/// adapter's own error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickerError {
    /// Segment count is zero or above the supported maximum
    SegmentsOutOfRange { requested: usize, max: usize },
    /// Framebuffer cannot hold the visible segments plus the scroll-in margin
    FrameTooNarrow { cells: usize, required: usize },
    /// Replacement text does not fit the text buffer
    TextTooLong { len: usize, max: usize },
    /// `start` called on a ticker whose timer is already armed
    AlreadyRunning,
    /// The timer refused to schedule the first firing
    TimerUnavailable,
}

impl fmt::Display for TickerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SegmentsOutOfRange { requested, max } => {
                write!(f, "segment count {requested} outside 1..={max}")
            }
            Self::FrameTooNarrow { cells, required } => {
                write!(f, "frame has {cells} cells, needs at least {required}")
            }
            Self::TextTooLong { len, max } => {
                write!(f, "text is {len} bytes, limit is {max}")
            }
            Self::AlreadyRunning => f.write_str("ticker already running"),
            Self::TimerUnavailable => f.write_str("timer could not be armed"),
        }
    }
}
