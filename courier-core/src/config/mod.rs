//! Configuration types
//!
//! Board settings are compiled into the firmware. The firmware build script
//! runs the same validation on `board.toml` before generating the constants,
//! so a bad value fails the build instead of the boot.

pub mod board;

pub use board::*;

use core::fmt;

use courier_hal::UsartId;

/// Configuration validation error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Baud rate outside [`MIN_BAUDRATE`]..=[`MAX_BAUDRATE`]
    BaudrateOutOfRange(u32),
    /// Pin pair cannot be routed to the instance
    InvalidPins(UsartId),
    /// Message text is empty
    EmptyMessage,
    /// Message text contains a NUL byte (would be cut short on the wire)
    EmbeddedNul,
    /// Interval between status messages is zero
    ZeroInterval,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::BaudrateOutOfRange(baud) => write!(
                f,
                "baudrate {} out of range ({}-{})",
                baud, MIN_BAUDRATE, MAX_BAUDRATE
            ),
            ConfigError::InvalidPins(id) => {
                write!(f, "pin pair cannot be routed to {}", id.name())
            }
            ConfigError::EmptyMessage => f.write_str("message must not be empty"),
            ConfigError::EmbeddedNul => f.write_str("message must not contain NUL bytes"),
            ConfigError::ZeroInterval => f.write_str("interval_ms must be greater than 0"),
        }
    }
}
