//! USART instances of the STM32F103
//!
//! Each instance can be routed to a fixed set of (TX, RX) pin pairs
//! through the AFIO remap register.

use crate::gpio::{PinConfig, PinId, Port};

/// USART peripheral instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UsartId {
    Usart1,
    Usart2,
    Usart3,
}

impl UsartId {
    /// All instances, in register order
    pub const ALL: [UsartId; 3] = [UsartId::Usart1, UsartId::Usart2, UsartId::Usart3];

    /// Zero-based index, used as a bit position in ownership masks
    pub const fn index(&self) -> u8 {
        match self {
            UsartId::Usart1 => 0,
            UsartId::Usart2 => 1,
            UsartId::Usart3 => 2,
        }
    }

    /// Instance name as written in reference manuals
    pub const fn name(&self) -> &'static str {
        match self {
            UsartId::Usart1 => "USART1",
            UsartId::Usart2 => "USART2",
            UsartId::Usart3 => "USART3",
        }
    }

    /// Legal (TX, RX) pin pairs, default mapping first
    pub const fn pin_options(&self) -> &'static [UsartPins] {
        match self {
            UsartId::Usart1 => &USART1_PINS,
            UsartId::Usart2 => &USART2_PINS,
            UsartId::Usart3 => &USART3_PINS,
        }
    }

    /// Default (non-remapped) pin pair
    pub const fn default_pins(&self) -> UsartPins {
        self.pin_options()[0]
    }

    /// Check whether `pins` can be routed to this instance
    pub fn supports(&self, pins: &UsartPins) -> bool {
        self.pin_options().contains(pins)
    }

    /// Check whether `pins` needs the AFIO remap
    pub fn is_remapped(&self, pins: &UsartPins) -> bool {
        self.supports(pins) && *pins != self.default_pins()
    }
}

const fn pin(port: Port, pin: u8) -> PinId {
    PinId { port, pin }
}

const USART1_PINS: [UsartPins; 2] = [
    UsartPins::new(pin(Port::A, 9), pin(Port::A, 10)),
    UsartPins::new(pin(Port::B, 6), pin(Port::B, 7)),
];

const USART2_PINS: [UsartPins; 2] = [
    UsartPins::new(pin(Port::A, 2), pin(Port::A, 3)),
    UsartPins::new(pin(Port::D, 5), pin(Port::D, 6)),
];

const USART3_PINS: [UsartPins; 3] = [
    UsartPins::new(pin(Port::B, 10), pin(Port::B, 11)),
    UsartPins::new(pin(Port::C, 10), pin(Port::C, 11)),
    UsartPins::new(pin(Port::D, 8), pin(Port::D, 9)),
];

/// Transmit and receive pin of a USART
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UsartPins {
    pub tx: PinId,
    pub rx: PinId,
}

impl UsartPins {
    pub const fn new(tx: PinId, rx: PinId) -> Self {
        Self { tx, rx }
    }

    /// Parse a pin pair from config strings
    pub fn parse(tx: &str, rx: &str) -> Option<Self> {
        Some(Self::new(PinId::parse(tx)?, PinId::parse(rx)?))
    }

    /// Pin modes the platform layer must apply before the USART is enabled
    pub const fn configs(&self) -> [PinConfig; 2] {
        [PinConfig::uart_tx(self.tx), PinConfig::uart_rx(self.rx)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpio::PinMode;

    #[test]
    fn test_indices_are_distinct() {
        let mut mask = 0u8;
        for id in UsartId::ALL {
            let bit = 1 << id.index();
            assert_eq!(mask & bit, 0);
            mask |= bit;
        }
    }

    #[test]
    fn test_usart1_pins() {
        let default = UsartPins::parse("PA9", "PA10").unwrap();
        let remapped = UsartPins::parse("PB6", "PB7").unwrap();

        assert_eq!(UsartId::Usart1.default_pins(), default);
        assert!(UsartId::Usart1.supports(&default));
        assert!(!UsartId::Usart1.is_remapped(&default));
        assert!(UsartId::Usart1.is_remapped(&remapped));

        // Swapped TX/RX is not a legal routing
        let swapped = UsartPins::parse("PA10", "PA9").unwrap();
        assert!(!UsartId::Usart1.supports(&swapped));
        assert!(!UsartId::Usart2.supports(&default));
    }

    #[test]
    fn test_pin_configs() {
        let [tx, rx] = UsartId::Usart1.default_pins().configs();
        assert_eq!(tx.mode, PinMode::AlternatePushPull);
        assert_eq!(rx.mode, PinMode::FloatingInput);
    }
}
