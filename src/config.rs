//! Ticker construction parameters

use core::time::Duration;

use crate::error::TickerError;

/// Pixels per character cell; one cell scrolls by in this many ticks.
pub const CELL_WIDTH: u8 = 8;

/// Longest display width supported, in segments
pub const MAX_SEGMENTS: usize = 16;

/// Longest ticker text, in bytes
pub const MAX_TEXT_LEN: usize = 128;

/// Text shown until the owner replaces it
pub const DEFAULT_TEXT: &str = "Hello World!";

/// Time between sub-pixel ticks unless configured otherwise
pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);

/// Fixed parameters of a ticker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickerConfig {
    num_segments: usize,
    delay: Duration,
    inverse: bool,
}

impl TickerConfig {
    /// Create a config for a display `num_segments` cells wide
    ///
    /// Fails with [`TickerError::SegmentsOutOfRange`] for zero segments or
    /// more than [`MAX_SEGMENTS`].
    pub fn new(num_segments: usize) -> Result<Self, TickerError> {
        if num_segments == 0 || num_segments > MAX_SEGMENTS {
            return Err(TickerError::SegmentsOutOfRange {
                requested: num_segments,
                max: MAX_SEGMENTS,
            });
        }

        Ok(Self {
            num_segments,
            delay: DEFAULT_DELAY,
            inverse: false,
        })
    }

    /// Set the time between sub-pixel ticks
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Draw dark text on a lit background
    pub const fn with_inverse(mut self, inverse: bool) -> Self {
        self.inverse = inverse;
        self
    }

    pub const fn num_segments(&self) -> usize {
        self.num_segments
    }

    pub const fn delay(&self) -> Duration {
        self.delay
    }

    pub const fn inverse(&self) -> bool {
        self.inverse
    }

    /// Tick period in whole milliseconds, saturating at `u32::MAX`
    pub fn period_ms(&self) -> u32 {
        u32::try_from(self.delay.as_millis()).unwrap_or(u32::MAX)
    }

    /// Characters drawn on each cell entry: the visible cells, the one
    /// scrolling in, and one spare.
    pub const fn window_len(&self) -> usize {
        self.num_segments + 2
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TickerConfig {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "TickerConfig(segments={}, period={}ms, inverse={})",
            self.num_segments,
            self.period_ms(),
            self.inverse
        );
    }
}
