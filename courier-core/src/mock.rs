//! Mock peripherals for host tests

use core::cell::Cell;
use std::vec::Vec;

use courier_hal::{Clock, ConfigureUart, UartConfig, UartTx};
use embedded_hal_async::delay::DelayNs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockError {
    Rejected,
    LineFault,
}

/// UART that records everything written to it
#[derive(Default)]
pub struct MockUart {
    /// Bytes on the wire, in order
    pub wire: Vec<u8>,
    /// Last applied configuration
    pub config: Option<UartConfig>,
    /// Number of successful `configure` calls
    pub configure_calls: u32,
    /// Make `configure` fail
    pub reject_config: bool,
    /// `try_write_byte` reports busy this many times before accepting
    pub busy_polls: u32,
    /// Never accept a byte through `try_write_byte`
    pub stuck: bool,
    /// Stop accepting bytes through `try_write_byte` once this many are on the wire
    pub stall_after: Option<usize>,
    /// Fail writes once this many bytes are on the wire
    pub fail_after: Option<usize>,
    pub flushes: u32,
}

impl MockUart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wire_str(&self) -> &str {
        core::str::from_utf8(&self.wire).unwrap()
    }

    fn check_fault(&self, extra: usize) -> Result<(), MockError> {
        match self.fail_after {
            Some(limit) if self.wire.len() + extra > limit => Err(MockError::LineFault),
            _ => Ok(()),
        }
    }
}

impl UartTx for MockUart {
    type Error = MockError;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.check_fault(data.len())?;
        self.wire.extend_from_slice(data);
        Ok(())
    }

    fn try_write_byte(&mut self, byte: u8) -> Result<bool, Self::Error> {
        if self.stuck || self.stall_after.is_some_and(|n| self.wire.len() >= n) {
            return Ok(false);
        }
        if self.busy_polls > 0 {
            self.busy_polls -= 1;
            return Ok(false);
        }
        self.check_fault(1)?;
        self.wire.push(byte);
        Ok(true)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.flushes += 1;
        Ok(())
    }
}

impl ConfigureUart for MockUart {
    fn configure(&mut self, config: &UartConfig) -> Result<(), Self::Error> {
        if self.reject_config {
            return Err(MockError::Rejected);
        }
        self.config = Some(*config);
        self.configure_calls += 1;
        Ok(())
    }
}

/// Clock that advances by a fixed step every time it is read
pub struct MockClock {
    now: Cell<u64>,
    step: u64,
}

impl MockClock {
    pub fn new(step: u64) -> Self {
        Self {
            now: Cell::new(0),
            step,
        }
    }
}

impl Clock for MockClock {
    fn now_micros(&self) -> u64 {
        let now = self.now.get();
        self.now.set(now + self.step);
        now
    }
}

/// Delay that only records what was requested
#[derive(Default)]
pub struct MockDelay {
    pub delays_ms: Vec<u32>,
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.delays_ms.push(ns / 1_000_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.delays_ms.push(ms);
    }
}
