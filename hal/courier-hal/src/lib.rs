//! Courier Hardware Abstraction Layer
//!
//! This crate defines hardware abstraction traits and plain value types
//! that chip-specific HALs implement. The core driver only talks to these,
//! so it can be tested on the host with mock peripherals.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (courier-firmware)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  courier-core (serial driver, beacon)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  courier-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!            ┌────────────────┐
//!            │  courier-hal-  │
//!            │    stm32f1     │
//!            └────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartTx`], [`uart::ConfigureUart`] - Serial transmission
//! - [`time::Clock`] - Monotonic time source
//!
//! # Value types
//!
//! - [`uart::UartConfig`] - Frame format and baud rate
//! - [`usart::UsartId`] - USART instances and their pin pairs
//! - [`gpio::PinId`] - Pin identifiers and modes

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod time;
pub mod uart;
pub mod usart;

// Re-export key traits at crate root for convenience
pub use gpio::{PinConfig, PinId, PinMode, PinSpeed, Port, Pull};
pub use time::Clock;
pub use uart::{ConfigureUart, UartConfig, UartTx};
pub use usart::{UsartId, UsartPins};
