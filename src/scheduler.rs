//! Drivers that feed ticks to the scroll state machine
//!
//! [`BlockingTicker`] owns the calling thread and sleeps between ticks.
//! [`InterruptTicker`] is driven from a periodic timer interrupt and leaves
//! the foreground free; the timer is injected as a [`PeriodicTimer`].

use core::convert::Infallible;

use embedded_hal::blocking::delay::DelayMs;

use crate::config::TickerConfig;
use crate::display::TickerDisplay;
use crate::error::TickerError;
use crate::ticker::TickerState;

/// Ticker driven by a blocking loop
#[derive(Debug, Clone)]
pub struct BlockingTicker {
    state: TickerState,
}

impl BlockingTicker {
    pub fn new(config: TickerConfig) -> Self {
        Self {
            state: TickerState::new(config),
        }
    }

    pub fn state(&self) -> &TickerState {
        &self.state
    }

    /// Replace the text; takes effect at the next pass
    pub fn set_text(&mut self, text: &str) -> Result<(), TickerError> {
        self.state.set_text(text)
    }

    /// Run one tick: redraw on cell entry, sleep, then scroll
    pub fn step<D, DL>(&mut self, display: &mut D, delay: &mut DL) -> Result<(), D::Error>
    where
        D: TickerDisplay,
        DL: DelayMs<u32>,
    {
        let tick = self.state.advance();
        tick.draw_cell(display)?;
        delay.delay_ms(self.state.config().period_ms());
        tick.shift(display)
    }

    /// Tick forever. Only returns if the display fails.
    pub fn run<D, DL>(&mut self, display: &mut D, delay: &mut DL) -> Result<Infallible, D::Error>
    where
        D: TickerDisplay,
        DL: DelayMs<u32>,
    {
        loop {
            self.step(display, delay)?;
        }
    }
}

/// Hardware timer that calls back into [`InterruptTicker::on_timer`]
///
/// Implementations must not fire again until [`rearm`](Self::rearm) is
/// called; that keeps a slow display from stacking up overlapping ticks.
pub trait PeriodicTimer {
    type Error;

    /// Enable the interrupt and schedule the first firing `period_ms` out
    fn arm(&mut self, period_ms: u32) -> Result<(), Self::Error>;

    /// Acknowledge the current firing and schedule the next one a period out
    fn rearm(&mut self) -> Result<(), Self::Error>;

    /// Disable the interrupt and drop any pending firing
    fn disarm(&mut self);
}

/// Lifecycle of an [`InterruptTicker`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickerPhase {
    /// Timer disarmed, no ticks are processed
    Idle,
    /// Timer armed
    Running,
}

/// Result of one timer callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// State advanced and the tick reached the display
    Rendered,
    /// State advanced but the display reported an error; the frame is lost
    DisplayFault,
    /// Ticker is stopped; the firing was discarded
    Idle,
    /// The next firing could not be scheduled; the ticker stopped itself
    TimerFault,
}

/// Ticker driven by a periodic timer interrupt
///
/// Call [`on_timer`](Self::on_timer) from the timer's interrupt handler.
/// Owners that change the text from other contexts reach the ticker through
/// the same lock as the handler; the change shows from the next pass.
#[derive(Debug)]
pub struct InterruptTicker<T> {
    state: TickerState,
    timer: T,
    phase: TickerPhase,
    display_faults: u32,
}

impl<T: PeriodicTimer> InterruptTicker<T> {
    /// Create an idle ticker; `timer` is not armed until [`start`](Self::start)
    pub fn new(config: TickerConfig, timer: T) -> Self {
        Self {
            state: TickerState::new(config),
            timer,
            phase: TickerPhase::Idle,
            display_faults: 0,
        }
    }

    pub fn state(&self) -> &TickerState {
        &self.state
    }

    pub fn phase(&self) -> TickerPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == TickerPhase::Running
    }

    /// Display errors swallowed by the timer callback, wrapping
    pub fn display_faults(&self) -> u32 {
        self.display_faults
    }

    /// Replace the text; takes effect at the next pass
    pub fn set_text(&mut self, text: &str) -> Result<(), TickerError> {
        self.state.set_text(text)
    }

    /// Start a fresh pass and arm the timer
    ///
    /// Rejected while running so an armed timer is never re-armed twice.
    pub fn start(&mut self) -> Result<(), TickerError> {
        if self.is_running() {
            #[cfg(feature = "defmt")]
            defmt::warn!("ticker: start rejected, already running");
            return Err(TickerError::AlreadyRunning);
        }

        self.state.reset();
        let period_ms = self.state.config().period_ms();
        if self.timer.arm(period_ms).is_err() {
            self.timer.disarm();
            #[cfg(feature = "defmt")]
            defmt::warn!("ticker: timer refused period {}ms", period_ms);
            return Err(TickerError::TimerUnavailable);
        }
        self.phase = TickerPhase::Running;

        #[cfg(feature = "defmt")]
        defmt::info!("ticker: started, period {}ms", period_ms);
        Ok(())
    }

    /// Disarm the timer. No tick advances after this returns.
    pub fn stop(&mut self) {
        if !self.is_running() {
            return;
        }
        self.timer.disarm();
        self.phase = TickerPhase::Idle;

        #[cfg(feature = "defmt")]
        defmt::info!("ticker: stopped after {} passes", self.state.passes());
    }

    /// Timer callback: advance one tick and render it
    ///
    /// Display errors are counted and dropped here; an interrupt handler has
    /// nobody to return them to.
    pub fn on_timer<D: TickerDisplay>(&mut self, display: &mut D) -> TickOutcome {
        if !self.is_running() {
            // Firing raced with stop(); make sure it does not come back.
            self.timer.disarm();
            return TickOutcome::Idle;
        }

        let tick = self.state.advance();
        let outcome = match tick.render(display) {
            Ok(()) => TickOutcome::Rendered,
            Err(_) => {
                self.display_faults = self.display_faults.wrapping_add(1);
                #[cfg(feature = "defmt")]
                defmt::warn!(
                    "ticker: display fault at cursor {} (total {})",
                    tick.cursor,
                    self.display_faults
                );
                TickOutcome::DisplayFault
            }
        };

        // Schedule the next firing only once this tick's bus I/O is done.
        if self.timer.rearm().is_err() {
            // No further firing is coming; go idle so a later start() works.
            self.timer.disarm();
            self.phase = TickerPhase::Idle;
            #[cfg(feature = "defmt")]
            defmt::warn!("ticker: rearm failed, stopped at cursor {}", tick.cursor);
            return TickOutcome::TimerFault;
        }
        outcome
    }

    /// Stop and hand back the timer
    pub fn release(mut self) -> T {
        self.stop();
        self.timer
    }
}
