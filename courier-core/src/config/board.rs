//! Board configuration: serial port settings and beacon messages

use courier_hal::{UartConfig, UsartId, UsartPins};

use super::ConfigError;

/// Lowest accepted baud rate
pub const MIN_BAUDRATE: u32 = 1200;

/// Highest accepted baud rate (72 MHz APB2 clock / 16x oversampling)
pub const MAX_BAUDRATE: u32 = 4_500_000;

/// Default greeting, sent once after initialization
pub const DEFAULT_GREETING: &str = "Hello from STM32 UART!\r\n";

/// Default status message, sent every interval
pub const DEFAULT_STATUS: &str = "Looping...\r\n";

/// Default interval between status messages
pub const DEFAULT_INTERVAL_MS: u32 = 1000;

/// Serial port settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerialSettings {
    /// USART instance to claim
    pub instance: UsartId,
    /// TX/RX pin pair
    pub pins: UsartPins,
    /// Baud rate in bits per second
    pub baudrate: u32,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            instance: UsartId::Usart1,
            pins: UsartId::Usart1.default_pins(),
            baudrate: 115200,
        }
    }
}

impl SerialSettings {
    /// 8-N-1 UART configuration at the configured baud rate
    pub fn uart_config(&self) -> UartConfig {
        UartConfig::with_baudrate(self.baudrate)
    }

    /// Check the baud rate range and that the pins can be routed
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_baudrate(self.baudrate)?;
        if !self.instance.supports(&self.pins) {
            return Err(ConfigError::InvalidPins(self.instance));
        }
        Ok(())
    }
}

/// Beacon message configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BeaconConfig {
    /// Sent once at startup
    pub greeting: &'static str,
    /// Sent every `interval_ms`
    pub status: &'static str,
    /// Delay after each status message
    pub interval_ms: u32,
}

impl Default for BeaconConfig {
    fn default() -> Self {
        Self {
            greeting: DEFAULT_GREETING,
            status: DEFAULT_STATUS,
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}

impl BeaconConfig {
    /// Check both messages and the interval
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_message(self.greeting)?;
        validate_message(self.status)?;
        validate_interval(self.interval_ms)
    }
}

/// Check a baud rate against the supported range
pub fn validate_baudrate(baudrate: u32) -> Result<(), ConfigError> {
    if !(MIN_BAUDRATE..=MAX_BAUDRATE).contains(&baudrate) {
        return Err(ConfigError::BaudrateOutOfRange(baudrate));
    }
    Ok(())
}

/// Check that a message is non-empty and has no NUL bytes
pub fn validate_message(text: &str) -> Result<(), ConfigError> {
    if text.is_empty() {
        return Err(ConfigError::EmptyMessage);
    }
    if text.bytes().any(|b| b == 0) {
        return Err(ConfigError::EmbeddedNul);
    }
    Ok(())
}

/// Check that the interval is non-zero
pub fn validate_interval(interval_ms: u32) -> Result<(), ConfigError> {
    if interval_ms == 0 {
        return Err(ConfigError::ZeroInterval);
    }
    Ok(())
}
