//! STM32F1-specific HAL for the Courier firmware
//!
//! This crate provides STM32F1-specific implementations of the
//! `courier-hal` traits on top of embassy-stm32. It supports:
//!
//! - STM32F103C8 (Blue Pill)
//! - STM32F103CB (Blue Pill with 128K flash)
//!
//! # Features
//!
//! - `stm32f103c8` - Enable support for STM32F103C8T6
//! - `stm32f103cb` - Enable support for STM32F103CBT6
//! - `defmt` - Enable debug formatting support
//!
//! # Usage
//!
//! The firmware calls [`clock::blue_pill_config`] for bring-up, opens the
//! USART with embassy-stm32 directly and wraps it in a [`uart::BlockingUsart`]
//! so the core driver can use it through the `courier-hal` traits.

#![no_std]

pub mod clock;
pub mod uart;

// Re-export shared types from courier-hal
pub use courier_hal::{UartConfig, UsartId, UsartPins};
