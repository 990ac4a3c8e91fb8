//! Display adapter contract and the MAX7219 matrix adapter

use embedded_graphics::mono_font::{ascii::FONT_5X8, MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{DrawTarget, Point};
use embedded_graphics::text::{Baseline, Text};
use embedded_graphics::Drawable;
use max7219::connectors::Connector;
use max7219::{DataError, MAX7219};

use crate::error::TickerError;
use crate::frame::MatrixFrame;

/// What the ticker needs from a display
///
/// Coordinates are pixels; `lit` selects the pixel polarity. Calls complete
/// synchronously. Glyph rendering is the adapter's business.
pub trait TickerDisplay {
    type Error;

    /// Set the whole display to `lit`
    fn fill(&mut self, lit: bool) -> Result<(), Self::Error>;

    /// Draw `text` with its top-left corner at `(x, y)`
    fn draw_text(&mut self, text: &str, x: i32, y: i32, lit: bool) -> Result<(), Self::Error>;

    /// Shift the picture by `(dx, dy)` pixels
    fn scroll(&mut self, dx: i32, dy: i32) -> Result<(), Self::Error>;

    /// Push pending changes to the hardware
    fn show(&mut self) -> Result<(), Self::Error>;
}

/// 5x8 ASCII glyphs on an 8 pixel pitch, one glyph per matrix cell
pub const CELL_FONT: MonoFont<'static> = MonoFont {
    character_spacing: 3,
    ..FONT_5X8
};

/// Draw `text` in [`CELL_FONT`]; pixels outside the target are clipped
pub fn draw_cell_text<D>(
    target: &mut D,
    text: &str,
    x: i32,
    y: i32,
    lit: bool,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let style = MonoTextStyle::new(&CELL_FONT, BinaryColor::from(lit));
    // Only the glyph pixels are drawn; the background stays as filled.
    Text::with_baseline(text, Point::new(x, y), style, Baseline::Top).draw(target)?;
    Ok(())
}

/// Ticker display over a chain of MAX7219 8x8 matrices
///
/// Drawing goes to a [`MatrixFrame`] of `CELLS` cells, of which the first
/// `segments` are visible. The frame must be at least two cells wider than
/// the visible part so the characters scrolling in are already drawn.
pub struct Max7219Matrix<CONNECTOR, const CELLS: usize> {
    driver: MAX7219<CONNECTOR>,
    frame: MatrixFrame<CELLS>,
    segments: usize,
}

impl<CONNECTOR, const CELLS: usize> Max7219Matrix<CONNECTOR, CELLS>
where
    CONNECTOR: Connector,
{
    /// Wrap an initialized driver whose chain is `segments` devices long
    pub fn new(driver: MAX7219<CONNECTOR>, segments: usize) -> Result<Self, TickerError> {
        let required = segments + 2;
        if CELLS < required {
            return Err(TickerError::FrameTooNarrow {
                cells: CELLS,
                required,
            });
        }

        Ok(Self {
            driver,
            frame: MatrixFrame::new(),
            segments,
        })
    }

    pub fn frame(&self) -> &MatrixFrame<CELLS> {
        &self.frame
    }

    pub fn driver_mut(&mut self) -> &mut MAX7219<CONNECTOR> {
        &mut self.driver
    }

    /// Give the driver back, e.g. to power the chain down
    pub fn release(self) -> MAX7219<CONNECTOR> {
        self.driver
    }
}

impl<CONNECTOR, const CELLS: usize> TickerDisplay for Max7219Matrix<CONNECTOR, CELLS>
where
    CONNECTOR: Connector,
{
    type Error = DataError;

    fn fill(&mut self, lit: bool) -> Result<(), Self::Error> {
        self.frame.fill(lit);
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, lit: bool) -> Result<(), Self::Error> {
        draw_cell_text(&mut self.frame, text, x, y, lit).map_err(|never| match never {})
    }

    fn scroll(&mut self, dx: i32, dy: i32) -> Result<(), Self::Error> {
        self.frame.scroll(dx, dy);
        Ok(())
    }

    fn show(&mut self) -> Result<(), Self::Error> {
        for device in 0..self.segments {
            self.driver.write_raw(device, &self.frame.device_rows(device))?;
        }
        Ok(())
    }
}
