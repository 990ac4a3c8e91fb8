//! Scroll state machine
//!
//! A pass walks a cursor over the padded text (`num_segments + 1` blanks
//! followed by the ticker text). Each cursor position is a character cell
//! that takes [`CELL_WIDTH`] ticks to scroll by: the first tick of a cell
//! redraws the window of characters starting at the cursor, and every tick
//! shifts the picture one pixel to the left.

use heapless::{String, Vec};

use crate::config::{TickerConfig, CELL_WIDTH, DEFAULT_TEXT, MAX_SEGMENTS, MAX_TEXT_LEN};
use crate::display::TickerDisplay;
use crate::error::TickerError;

/// Capacity of the padded text: leading blanks plus the longest text
pub const PADDED_CAPACITY: usize = MAX_SEGMENTS + 1 + MAX_TEXT_LEN;

/// Capacity of a redraw window in bytes (window chars are at most 4 bytes)
pub const WINDOW_CAPACITY: usize = (MAX_SEGMENTS + 2) * 4;

/// Characters drawn on a cell-entry tick
pub type Window = String<WINDOW_CAPACITY>;

/// Draw commands for one tick
///
/// `redraw` is set on the first tick of a character cell. Replaying a tick
/// issues `fill`, `draw_text` and `show` for the redraw (if any), then
/// `scroll(-1, 0)` and `show`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tick {
    /// Cursor position this tick belongs to
    pub cursor: usize,
    /// Sub-pixel position within the cell, `0..CELL_WIDTH`
    pub sub_step: u8,
    /// Window to draw when entering a new cell
    pub redraw: Option<Window>,
    /// Background polarity; text is drawn with the opposite
    pub inverse: bool,
}

impl Tick {
    /// Replay the whole tick
    pub fn render<D: TickerDisplay>(&self, display: &mut D) -> Result<(), D::Error> {
        self.draw_cell(display)?;
        self.shift(display)
    }

    /// Redraw half: blank the display and draw the window. No-op mid-cell.
    pub fn draw_cell<D: TickerDisplay>(&self, display: &mut D) -> Result<(), D::Error> {
        if let Some(window) = &self.redraw {
            display.fill(self.inverse)?;
            display.draw_text(window, 0, 1, !self.inverse)?;
            display.show()?;
        }
        Ok(())
    }

    /// Scroll half: shift one pixel left and push to the display
    pub fn shift<D: TickerDisplay>(&self, display: &mut D) -> Result<(), D::Error> {
        display.scroll(-1, 0)?;
        display.show()
    }

    /// True on the first tick of a character cell
    pub fn enters_cell(&self) -> bool {
        self.redraw.is_some()
    }
}

/// State of a running ticker
#[derive(Debug, Clone)]
pub struct TickerState {
    config: TickerConfig,
    /// Text as last set by the owner
    text: String<MAX_TEXT_LEN>,
    /// Snapshot of the text for the current pass, with leading blanks
    padded: Vec<char, PADDED_CAPACITY>,
    cursor: usize,
    sub_step: u8,
    passes: u32,
}

impl TickerState {
    /// Create a ticker showing [`DEFAULT_TEXT`]
    pub fn new(config: TickerConfig) -> Self {
        let mut text = String::new();
        let _ = text.push_str(DEFAULT_TEXT);

        Self {
            config,
            text,
            padded: Vec::new(),
            cursor: 0,
            sub_step: 0,
            passes: 0,
        }
    }

    pub fn config(&self) -> &TickerConfig {
        &self.config
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the ticker text
    ///
    /// The current pass keeps scrolling the old text; the new one is picked
    /// up when the cursor next wraps to the start.
    pub fn set_text(&mut self, text: &str) -> Result<(), TickerError> {
        if text.len() > MAX_TEXT_LEN {
            return Err(TickerError::TextTooLong {
                len: text.len(),
                max: MAX_TEXT_LEN,
            });
        }
        self.text.clear();
        let _ = self.text.push_str(text);
        Ok(())
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn sub_step(&self) -> u8 {
        self.sub_step
    }

    /// Completed passes, wrapping
    pub fn passes(&self) -> u32 {
        self.passes
    }

    /// Padded text of the current pass. Empty before the first tick.
    pub fn padded(&self) -> &[char] {
        &self.padded
    }

    /// Rewind to the start of a pass; the next tick re-snapshots the text
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.sub_step = 0;
    }

    /// Advance by one sub-pixel tick and return that tick's draw commands
    pub fn advance(&mut self) -> Tick {
        let redraw = if self.sub_step == 0 {
            if self.cursor == 0 {
                self.begin_pass();
            }
            Some(self.window())
        } else {
            None
        };

        let tick = Tick {
            cursor: self.cursor,
            sub_step: self.sub_step,
            redraw,
            inverse: self.config.inverse(),
        };

        self.sub_step += 1;
        if self.sub_step >= CELL_WIDTH {
            self.sub_step = 0;
            self.next_cell();
        }

        tick
    }

    /// Ticks in one pass over the current padded text
    pub fn ticks_per_pass(&self) -> usize {
        self.positions_per_pass() * usize::from(CELL_WIDTH)
    }

    /// Cursor positions in one pass over the current padded text
    pub fn positions_per_pass(&self) -> usize {
        self.padded.len().saturating_sub(1)
    }

    fn next_cell(&mut self) {
        self.cursor += 1;
        if self.cursor >= self.positions_per_pass() {
            self.cursor = 0;
            self.passes = self.passes.wrapping_add(1);
        }
    }

    fn begin_pass(&mut self) {
        self.padded.clear();
        for _ in 0..=self.config.num_segments() {
            let _ = self.padded.push(' ');
        }
        // Capacity covers MAX_SEGMENTS + 1 blanks and MAX_TEXT_LEN chars.
        for c in self.text.chars() {
            let _ = self.padded.push(c);
        }
    }

    fn window(&self) -> Window {
        let mut window = Window::new();
        for &c in self
            .padded
            .iter()
            .skip(self.cursor)
            .take(self.config.window_len())
        {
            let _ = window.push(c);
        }
        window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn state(segments: usize, text: &str) -> TickerState {
        let mut state = TickerState::new(TickerConfig::new(segments).unwrap());
        state.set_text(text).unwrap();
        state
    }

    #[test]
    fn test_starts_with_default_text() {
        let state = TickerState::new(TickerConfig::new(4).unwrap());
        assert_eq!(state.text(), "Hello World!");
        assert!(state.padded().is_empty());
    }

    #[test]
    fn test_first_tick_enters_cell() {
        let mut state = state(4, "AB");
        let tick = state.advance();
        assert_eq!(tick.cursor, 0);
        assert_eq!(tick.sub_step, 0);
        assert_eq!(tick.redraw.as_deref(), Some("     A"));
        assert_eq!(state.padded().len(), 7);
    }

    #[test]
    fn test_four_segments_ab_pass() {
        let mut state = state(4, "AB");
        let ticks: std::vec::Vec<Tick> = (0..48).map(|_| state.advance()).collect();

        assert_eq!(state.cursor(), 0);
        assert_eq!(state.sub_step(), 0);
        assert_eq!(state.passes(), 1);
        assert_eq!(state.positions_per_pass(), 6);
        assert_eq!(state.ticks_per_pass(), 48);

        let windows: std::vec::Vec<&str> = ticks
            .iter()
            .filter_map(|tick| tick.redraw.as_deref())
            .collect();
        assert_eq!(
            windows,
            ["     A", "    AB", "   AB", "  AB", " AB", "AB"]
        );
    }

    #[test]
    fn test_window_is_short_near_end() {
        let mut state = state(1, "XYZ");
        // padded = "  XYZ", positions 0..4
        let windows: std::vec::Vec<Window> = (0..32)
            .filter_map(|_| state.advance().redraw)
            .collect();
        assert_eq!(windows[0].as_str(), "  X");
        assert_eq!(windows[2].as_str(), "XYZ");
        assert_eq!(windows[3].as_str(), "YZ");
    }

    #[test]
    fn test_text_change_waits_for_next_pass() {
        let mut state = state(2, "AB");
        // Pass of "   AB": 4 positions, 32 ticks.
        for _ in 0..10 {
            state.advance();
        }
        state.set_text("CD").unwrap();

        let mut seen = std::vec::Vec::new();
        for _ in 10..32 {
            if let Some(window) = state.advance().redraw {
                seen.push(window);
            }
        }
        assert!(seen.iter().all(|w| !w.contains('C') && !w.contains('D')));
        assert!(seen.iter().any(|w| w.contains('B')));

        assert_eq!(state.cursor(), 0);
        state.advance();
        assert_eq!(state.padded(), &[' ', ' ', ' ', 'C', 'D']);
    }

    #[test]
    fn test_reset_rewinds_and_resnapshots() {
        let mut state = state(2, "AB");
        for _ in 0..13 {
            state.advance();
        }
        state.set_text("Q").unwrap();
        state.reset();
        let tick = state.advance();
        assert_eq!(tick.cursor, 0);
        assert!(tick.enters_cell());
        assert_eq!(state.padded(), &[' ', ' ', ' ', 'Q']);
    }

    #[test]
    fn test_empty_text_scrolls_blanks() {
        let mut state = state(3, "");
        state.advance();
        assert_eq!(state.positions_per_pass(), 3);
    }

    #[test]
    fn test_rejects_long_text() {
        let mut state = state(2, "keep");
        let long = "x".repeat(MAX_TEXT_LEN + 1);
        assert_eq!(
            state.set_text(&long),
            Err(TickerError::TextTooLong {
                len: MAX_TEXT_LEN + 1,
                max: MAX_TEXT_LEN
            })
        );
        assert_eq!(state.text(), "keep");
    }

    #[test]
    fn test_multibyte_text_windows_by_char() {
        let mut state = state(1, "äö");
        let windows: std::vec::Vec<Window> = (0..24)
            .filter_map(|_| state.advance().redraw)
            .collect();
        assert_eq!(windows[2].as_str(), "äö");
        assert_eq!(state.positions_per_pass(), 3);
    }

    proptest! {
        #[test]
        fn prop_sub_step_cycles(segments in 1usize..=MAX_SEGMENTS, text in "[ -~]{0,20}", ticks in 1usize..400) {
            let mut state = state(segments, &text);
            let mut expected = 0u8;
            for _ in 0..ticks {
                let tick = state.advance();
                prop_assert_eq!(tick.sub_step, expected);
                prop_assert_eq!(tick.enters_cell(), expected == 0);
                expected = (expected + 1) % CELL_WIDTH;
            }
        }

        #[test]
        fn prop_pass_visits_every_position_once(segments in 1usize..=MAX_SEGMENTS, text in "[ -~]{0,20}") {
            let mut state = state(segments, &text);
            let expected_positions = segments + text.chars().count();

            let mut cursors = std::vec::Vec::new();
            loop {
                let tick = state.advance();
                if tick.enters_cell() {
                    cursors.push(tick.cursor);
                }
                if state.passes() == 1 {
                    break;
                }
            }

            prop_assert_eq!(state.padded().len(), expected_positions + 1);
            prop_assert_eq!(cursors, (0..expected_positions).collect::<std::vec::Vec<_>>());
        }

        #[test]
        fn prop_cursor_advances_every_cell(segments in 1usize..=8, text in "[A-Z]{1,10}", ticks in 1usize..300) {
            let mut state = state(segments, &text);
            let mut previous = None;
            for _ in 0..ticks {
                let tick = state.advance();
                if let Some(prev) = previous {
                    if tick.sub_step == 0 {
                        let positions = state.positions_per_pass();
                        prop_assert_eq!(tick.cursor, (prev + 1) % positions);
                    } else {
                        prop_assert_eq!(tick.cursor, prev);
                    }
                }
                previous = Some(tick.cursor);
            }
        }
    }
}
