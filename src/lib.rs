//! Scrolling ticker tape for a row of 8x8 LED-matrix segments
//!
//! The crate is split the same way the firmware is wired:
//!
//! - [`ticker`]: the scroll state machine, one sub-pixel tick at a time
//! - [`scheduler`]: blocking and timer-interrupt drivers for the state machine
//! - [`display`]: the display adapter contract plus a MAX7219 implementation
//! - [`frame`]: the 1-bit framebuffer the MAX7219 adapter draws into
//! - [`config`]: construction parameters and limits
//!
//! Everything here is `no_std` and allocation free; the RP2040 firmware lives
//! in `src/main.rs` and `demos/`.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod display;
pub mod error;
pub mod frame;
pub mod scheduler;
pub mod ticker;

pub use config::{TickerConfig, CELL_WIDTH, DEFAULT_TEXT, MAX_SEGMENTS, MAX_TEXT_LEN};
pub use display::{Max7219Matrix, TickerDisplay};
pub use error::TickerError;
pub use frame::MatrixFrame;
pub use scheduler::{BlockingTicker, InterruptTicker, PeriodicTimer, TickOutcome, TickerPhase};
pub use ticker::{Tick, TickerState};
