//! 1-bit framebuffer for a chain of 8x8 matrix devices

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Pixel, Size};

use crate::config::CELL_WIDTH;
use crate::display::TickerDisplay;

/// Rows per cell; MAX7219 matrices are square.
pub const CELL_HEIGHT: usize = CELL_WIDTH as usize;

/// Framebuffer of `CELLS` 8x8 cells laid out left to right
///
/// Rows are stored per cell in FC16 order: cell 0 is the leftmost device and
/// the most significant bit of each row byte is the leftmost pixel. Cells
/// past the visible segments act as off-screen drawing space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixFrame<const CELLS: usize> {
    rows: [[u8; CELLS]; CELL_HEIGHT],
}

impl<const CELLS: usize> MatrixFrame<CELLS> {
    /// Width in pixels
    pub const WIDTH: usize = CELLS * CELL_WIDTH as usize;
    /// Height in pixels
    pub const HEIGHT: usize = CELL_HEIGHT;

    /// Create a blank frame
    pub const fn new() -> Self {
        Self {
            rows: [[0; CELLS]; CELL_HEIGHT],
        }
    }

    /// Set every pixel
    pub fn fill(&mut self, lit: bool) {
        let byte = if lit { 0xFF } else { 0x00 };
        for row in self.rows.iter_mut() {
            row.fill(byte);
        }
    }

    /// Cell index and row-byte mask of column `x`
    const fn column(x: usize) -> (usize, u8) {
        let cell_width = CELL_WIDTH as usize;
        (x / cell_width, 0x80 >> (x % cell_width))
    }

    /// Pixel at `(x, y)`; out-of-range reads are dark
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        let (cell, mask) = Self::column(x);
        match self.rows.get(y).and_then(|row| row.get(cell)) {
            Some(byte) => byte & mask != 0,
            None => false,
        }
    }

    /// Set the pixel at `(x, y)`; out-of-range writes are ignored
    pub fn set_pixel(&mut self, x: usize, y: usize, lit: bool) {
        let (cell, mask) = Self::column(x);
        if let Some(byte) = self.rows.get_mut(y).and_then(|row| row.get_mut(cell)) {
            if lit {
                *byte |= mask;
            } else {
                *byte &= !mask;
            }
        }
    }

    /// Shift the contents by `(dx, dy)` pixels
    ///
    /// Like MicroPython's `framebuf.scroll`, the strip uncovered by the shift
    /// keeps its previous pixels.
    pub fn scroll(&mut self, dx: i32, dy: i32) {
        let width = Self::WIDTH;
        let height = Self::HEIGHT;
        let shift_x = dx.unsigned_abs() as usize;
        let shift_y = dy.unsigned_abs() as usize;
        if shift_x >= width || shift_y >= height {
            return;
        }

        // Walk destinations away from the source so nothing is read after
        // being overwritten.
        for j in 0..height - shift_y {
            let y = if dy > 0 { height - 1 - j } else { j };
            let src_y = if dy > 0 { y - shift_y } else { y + shift_y };
            for i in 0..width - shift_x {
                let x = if dx > 0 { width - 1 - i } else { i };
                let src_x = if dx > 0 { x - shift_x } else { x + shift_x };
                let lit = self.pixel(src_x, src_y);
                self.set_pixel(x, y, lit);
            }
        }
    }

    /// Row bytes for one device, top row first
    pub fn device_rows(&self, device: usize) -> [u8; CELL_HEIGHT] {
        let mut buffer = [0u8; CELL_HEIGHT];
        for (out, row) in buffer.iter_mut().zip(self.rows.iter()) {
            *out = row.get(device).copied().unwrap_or(0);
        }
        buffer
    }
}

impl<const CELLS: usize> Default for MatrixFrame<CELLS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const CELLS: usize> OriginDimensions for MatrixFrame<CELLS> {
    fn size(&self) -> Size {
        Size::new(Self::WIDTH as u32, Self::HEIGHT as u32)
    }
}

impl<const CELLS: usize> DrawTarget for MatrixFrame<CELLS> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if let (Ok(x), Ok(y)) = (usize::try_from(coord.x), usize::try_from(coord.y)) {
                self.set_pixel(x, y, color.is_on());
            }
        }
        Ok(())
    }
}

/// A bare frame is a display with nothing behind it; `show` does nothing.
impl<const CELLS: usize> TickerDisplay for MatrixFrame<CELLS> {
    type Error = Infallible;

    fn fill(&mut self, lit: bool) -> Result<(), Self::Error> {
        MatrixFrame::fill(self, lit);
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, lit: bool) -> Result<(), Self::Error> {
        crate::display::draw_cell_text(self, text, x, y, lit)
    }

    fn scroll(&mut self, dx: i32, dy: i32) -> Result<(), Self::Error> {
        MatrixFrame::scroll(self, dx, dy);
        Ok(())
    }

    fn show(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
