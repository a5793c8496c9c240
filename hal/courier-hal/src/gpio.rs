//! GPIO pin identifiers and modes
//!
//! Describes pins and the electrical mode a peripheral needs them in.
//! Chip HALs do the actual register programming; these types only carry
//! the intent so it can be validated and logged.

use core::fmt;

/// GPIO port letter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    A,
    B,
    C,
    D,
    E,
}

impl Port {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'A' => Some(Port::A),
            'B' => Some(Port::B),
            'C' => Some(Port::C),
            'D' => Some(Port::D),
            'E' => Some(Port::E),
            _ => None,
        }
    }

    fn as_char(&self) -> char {
        match self {
            Port::A => 'A',
            Port::B => 'B',
            Port::C => 'C',
            Port::D => 'D',
            Port::E => 'E',
        }
    }
}

/// A single pin, e.g. PA9
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinId {
    pub port: Port,
    pub pin: u8,
}

impl PinId {
    /// Create a pin identifier, `pin` must be 0-15
    pub const fn new(port: Port, pin: u8) -> Option<Self> {
        if pin > 15 {
            return None;
        }
        Some(Self { port, pin })
    }

    /// Parse a pin string from config
    ///
    /// Supports formats like "PA9", "pb6" and " PC13 ".
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let mut chars = s.chars();

        if !matches!(chars.next(), Some('P') | Some('p')) {
            return None;
        }
        let port = Port::from_char(chars.next()?.to_ascii_uppercase())?;

        let pin_str = chars.as_str();
        if pin_str.is_empty()
            || pin_str.len() > 2
            || !pin_str.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
        let pin: u8 = pin_str.parse().ok()?;

        Self::new(port, pin)
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}{}", self.port.as_char(), self.pin)
    }
}

/// Electrical pin mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// Push-pull output driven by a peripheral (e.g. USART TX)
    AlternatePushPull,
    /// Open-drain output driven by a peripheral
    AlternateOpenDrain,
    /// High-impedance input (e.g. USART RX)
    FloatingInput,
    /// Input with pull resistor
    PulledInput,
    /// General purpose push-pull output
    PushPullOutput,
}

/// Output slew rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinSpeed {
    Low,
    Medium,
    High,
}

/// Pull resistor selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    None,
    Up,
    Down,
}

/// Full configuration for one pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    pub pin: PinId,
    pub mode: PinMode,
    pub speed: PinSpeed,
    pub pull: Pull,
}

impl PinConfig {
    /// Transmit line: alternate-function push-pull, high speed
    pub const fn uart_tx(pin: PinId) -> Self {
        Self {
            pin,
            mode: PinMode::AlternatePushPull,
            speed: PinSpeed::High,
            pull: Pull::None,
        }
    }

    /// Receive line: floating input, no pull
    pub const fn uart_rx(pin: PinId) -> Self {
        Self {
            pin,
            mode: PinMode::FloatingInput,
            speed: PinSpeed::Low,
            pull: Pull::None,
        }
    }

    /// Check if this pin is driven by the chip
    pub fn is_output(&self) -> bool {
        matches!(
            self.mode,
            PinMode::AlternatePushPull | PinMode::AlternateOpenDrain | PinMode::PushPullOutput
        )
    }
}
