//! Board-agnostic core logic for the Courier firmware
//!
//! This crate contains everything that does not depend on a specific chip:
//!
//! - Serial transmitter driver with an Uninitialized/Ready typestate
//! - Peripheral ownership registry
//! - Checked decimal formatting
//! - Beacon loop (greeting, then periodic status messages)
//! - Configuration types and validation
//!
//! Hardware access goes through the `courier-hal` traits, so all of it
//! runs under `cargo test` on the host.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod beacon;
pub mod claim;
pub mod config;
pub mod format;
pub mod serial;

#[cfg(test)]
pub(crate) mod mock;

pub use beacon::Beacon;
pub use claim::{AlreadyClaimed, Claim, PeripheralClaims};
pub use config::{BeaconConfig, SerialSettings};
pub use format::EncodingError;
pub use serial::{Ready, SerialError, SerialPort, Uninitialized};
