//! Beacon loop
//!
//! Sends the greeting once, then the status message followed by a fixed
//! delay, forever. Everything runs on the caller's task, so messages
//! reach the wire in program order.

use courier_hal::{Clock, UartTx};
use embedded_hal_async::delay::DelayNs;

use crate::config::BeaconConfig;
use crate::serial::{Ready, SerialError, SerialPort};

/// Time allowed on top of twice the greeting's wire time
pub const GREETING_SLACK_US: u64 = 1_000;

/// Periodic announcer over a serial port
pub struct Beacon {
    config: BeaconConfig,
    /// Status messages sent so far
    ticks: u32,
}

impl Beacon {
    /// Create a beacon that has not sent anything yet
    pub fn new(config: BeaconConfig) -> Self {
        Self { config, ticks: 0 }
    }

    /// Messages and interval in use
    pub fn config(&self) -> &BeaconConfig {
        &self.config
    }

    /// Number of status messages sent (wraps)
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Send the greeting
    pub fn greet<U: UartTx>(
        &mut self,
        port: &mut SerialPort<'_, U, Ready>,
    ) -> Result<(), SerialError<U::Error>> {
        port.send_text(self.config.greeting)
    }

    /// Send the greeting, giving up if the transmitter stalls
    ///
    /// The budget is twice the greeting's wire time at the port's
    /// configuration plus [`GREETING_SLACK_US`].
    pub fn greet_within<U: UartTx, C: Clock>(
        &mut self,
        port: &mut SerialPort<'_, U, Ready>,
        clock: &C,
    ) -> Result<(), SerialError<U::Error>> {
        let wire_us = port
            .config()
            .transfer_time_us(self.config.greeting.len())
            .unwrap_or(0);
        let budget = wire_us.saturating_mul(2).saturating_add(GREETING_SLACK_US);
        port.send_text_within(self.config.greeting, budget, clock)
    }

    /// Send one status message, then wait out the interval
    pub async fn tick<U: UartTx, D: DelayNs>(
        &mut self,
        port: &mut SerialPort<'_, U, Ready>,
        delay: &mut D,
    ) -> Result<(), SerialError<U::Error>> {
        port.send_text(self.config.status)?;
        self.ticks = self.ticks.wrapping_add(1);
        delay.delay_ms(self.config.interval_ms).await;
        Ok(())
    }

    /// Greet, then tick forever
    ///
    /// Only returns if a send fails; the error is handed back so the caller
    /// can decide how to stop.
    pub async fn run<U: UartTx, D: DelayNs>(
        &mut self,
        port: &mut SerialPort<'_, U, Ready>,
        delay: &mut D,
    ) -> SerialError<U::Error> {
        if let Err(e) = self.greet(port) {
            return e;
        }
        self.keep_alive(port, delay).await
    }

    /// Tick forever, returning the first send error
    pub async fn keep_alive<U: UartTx, D: DelayNs>(
        &mut self,
        port: &mut SerialPort<'_, U, Ready>,
        delay: &mut D,
    ) -> SerialError<U::Error> {
        loop {
            if let Err(e) = self.tick(port, delay).await {
                return e;
            }
        }
    }
}

impl Default for Beacon {
    fn default() -> Self {
        Self::new(BeaconConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::PeripheralClaims;
    use crate::mock::{MockClock, MockDelay, MockError, MockUart};
    use courier_hal::UsartId;
    use embassy_futures::block_on;
    use std::string::String;

    const GREETING: &str = "Hello from STM32 UART!\r\n";
    const STATUS: &str = "Looping...\r\n";

    fn ready_port(claims: &PeripheralClaims, uart: MockUart) -> SerialPort<'_, MockUart, Ready> {
        let claim = claims.claim(UsartId::Usart1).unwrap();
        SerialPort::new(uart, claim, UsartId::Usart1.default_pins())
            .initialize()
            .unwrap()
    }

    #[test]
    fn test_greeting_then_status() {
        let claims = PeripheralClaims::new();
        let mut port = ready_port(&claims, MockUart::new());
        let mut delay = MockDelay::default();
        let mut beacon = Beacon::default();

        beacon.greet(&mut port).unwrap();
        for _ in 0..3 {
            block_on(beacon.tick(&mut port, &mut delay)).unwrap();
        }

        let mut expected = String::from(GREETING);
        for _ in 0..3 {
            expected.push_str(STATUS);
        }
        assert_eq!(port.uart().wire_str(), expected);
        assert_eq!(delay.delays_ms, [1000, 1000, 1000]);
        assert_eq!(beacon.ticks(), 3);
    }

    #[test]
    fn test_status_precedes_delay() {
        let claims = PeripheralClaims::new();
        let mut port = ready_port(&claims, MockUart::new());
        let mut delay = MockDelay::default();
        let mut beacon = Beacon::default();

        block_on(beacon.tick(&mut port, &mut delay)).unwrap();
        assert_eq!(port.uart().wire_str(), STATUS);
        assert_eq!(delay.delays_ms.len(), 1);
    }

    #[test]
    fn test_custom_messages() {
        let claims = PeripheralClaims::new();
        let mut port = ready_port(&claims, MockUart::new());
        let mut delay = MockDelay::default();
        let mut beacon = Beacon::new(BeaconConfig {
            greeting: "hi\n",
            status: ".",
            interval_ms: 250,
        });

        beacon.greet(&mut port).unwrap();
        block_on(beacon.tick(&mut port, &mut delay)).unwrap();
        assert_eq!(port.uart().wire_str(), "hi\n.");
        assert_eq!(delay.delays_ms, [250]);
    }

    #[test]
    fn test_run_stops_on_transmit_fault() {
        // Room for the greeting and two status messages
        let mut uart = MockUart::new();
        uart.fail_after = Some(GREETING.len() + 2 * STATUS.len());

        let claims = PeripheralClaims::new();
        let mut port = ready_port(&claims, uart);
        let mut delay = MockDelay::default();
        let mut beacon = Beacon::default();

        let err = block_on(beacon.run(&mut port, &mut delay));
        assert_eq!(err, SerialError::Transmit(MockError::LineFault));

        let mut expected = String::from(GREETING);
        expected.push_str(STATUS);
        expected.push_str(STATUS);
        assert_eq!(port.uart().wire_str(), expected);
        assert_eq!(delay.delays_ms, [1000, 1000]);
        assert_eq!(beacon.ticks(), 2);
    }

    #[test]
    fn test_run_stops_if_greeting_fails() {
        let mut uart = MockUart::new();
        uart.fail_after = Some(0);

        let claims = PeripheralClaims::new();
        let mut port = ready_port(&claims, uart);
        let mut delay = MockDelay::default();
        let mut beacon = Beacon::default();

        let err = block_on(beacon.run(&mut port, &mut delay));
        assert_eq!(err, SerialError::Transmit(MockError::LineFault));
        assert!(port.uart().wire.is_empty());
        assert!(delay.delays_ms.is_empty());
    }

    #[test]
    fn test_bounded_greeting_waits_for_transmitter() {
        let mut uart = MockUart::new();
        uart.busy_polls = 10;

        let claims = PeripheralClaims::new();
        let mut port = ready_port(&claims, uart);
        let mut beacon = Beacon::default();

        beacon.greet_within(&mut port, &MockClock::new(10)).unwrap();
        assert_eq!(port.uart().wire_str(), GREETING);
        assert_eq!(beacon.ticks(), 0);
    }

    #[test]
    fn test_bounded_greeting_times_out_on_stalled_line() {
        let mut uart = MockUart::new();
        uart.stall_after = Some(5);

        let claims = PeripheralClaims::new();
        let mut port = ready_port(&claims, uart);
        let mut beacon = Beacon::default();

        let result = beacon.greet_within(&mut port, &MockClock::new(500));
        assert_eq!(result, Err(SerialError::Timeout));
        assert_eq!(port.uart().wire_str(), &GREETING[..5]);
    }

    #[test]
    fn test_keep_alive_skips_greeting() {
        let mut uart = MockUart::new();
        uart.fail_after = Some(STATUS.len());

        let claims = PeripheralClaims::new();
        let mut port = ready_port(&claims, uart);
        let mut delay = MockDelay::default();
        let mut beacon = Beacon::default();

        let err = block_on(beacon.keep_alive(&mut port, &mut delay));
        assert_eq!(err, SerialError::Transmit(MockError::LineFault));
        assert_eq!(port.uart().wire_str(), STATUS);
        assert_eq!(delay.delays_ms, [1000]);
    }
}
