//! Test doubles shared by the integration tests

#![allow(dead_code)]

use tickertape::{PeriodicTimer, TickerDisplay};

/// One call made on a display
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Fill(bool),
    Text(String, i32, i32, bool),
    Scroll(i32, i32),
    Show,
}

/// Display that records calls and can be told to fail
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    pub ops: Vec<Op>,
    /// Fail every call once this many calls have succeeded
    pub fail_after: Option<usize>,
    /// Fail only `show` calls while set
    pub fail_show: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusError;

impl RecordingDisplay {
    pub fn failing_after(calls: usize) -> Self {
        Self {
            fail_after: Some(calls),
            ..Self::default()
        }
    }

    fn record(&mut self, op: Op) -> Result<(), BusError> {
        if self.fail_after.is_some_and(|limit| self.ops.len() >= limit) {
            return Err(BusError);
        }
        if self.fail_show && op == Op::Show {
            return Err(BusError);
        }
        self.ops.push(op);
        Ok(())
    }

    pub fn count(&self, wanted: fn(&Op) -> bool) -> usize {
        self.ops.iter().filter(|op| wanted(op)).count()
    }

    /// Text drawn by each fill+draw, in order
    pub fn drawn_texts(&self) -> Vec<String> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Text(text, ..) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
}

impl TickerDisplay for RecordingDisplay {
    type Error = BusError;

    fn fill(&mut self, lit: bool) -> Result<(), BusError> {
        self.record(Op::Fill(lit))
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, lit: bool) -> Result<(), BusError> {
        self.record(Op::Text(text.to_string(), x, y, lit))
    }

    fn scroll(&mut self, dx: i32, dy: i32) -> Result<(), BusError> {
        self.record(Op::Scroll(dx, dy))
    }

    fn show(&mut self) -> Result<(), BusError> {
        self.record(Op::Show)
    }
}

/// Delay provider that only counts
#[derive(Debug, Default)]
pub struct FakeDelay {
    pub sleeps: Vec<u32>,
}

impl embedded_hal::blocking::delay::DelayMs<u32> for FakeDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.sleeps.push(ms);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmBusy;

/// Timer that records its configuration
#[derive(Debug, Default)]
pub struct FakeTimer {
    pub period_ms: Option<u32>,
    pub armed: bool,
    pub arms: u32,
    pub rearms: u32,
    pub disarms: u32,
    /// Refuse to reschedule after this many rearms
    pub rearm_limit: Option<u32>,
}

impl PeriodicTimer for FakeTimer {
    type Error = AlarmBusy;

    fn arm(&mut self, period_ms: u32) -> Result<(), AlarmBusy> {
        self.period_ms = Some(period_ms);
        self.armed = true;
        self.arms += 1;
        Ok(())
    }

    fn rearm(&mut self) -> Result<(), AlarmBusy> {
        if self.rearm_limit.is_some_and(|limit| self.rearms >= limit) {
            return Err(AlarmBusy);
        }
        self.rearms += 1;
        Ok(())
    }

    fn disarm(&mut self) {
        self.armed = false;
        self.disarms += 1;
    }
}
