//! Serial transmitter driver
//!
//! Owns one USART and exposes blocking send operations for raw bytes,
//! text and decimal integers.
//!
//! # Lifecycle
//!
//! ```text
//! SerialPort::new(uart, claim, pins)      -> SerialPort<Uninitialized>
//!     .initialize()                       -> SerialPort<Ready>
//!         .send_bytes / send_text / send_number
//! ```
//!
//! The transition is one-way and consumes the uninitialized port, so a
//! Ready port cannot be initialized again and a port that failed to
//! initialize is gone rather than half-configured. Ownership of the
//! instance itself is guarded by a [`Claim`].

use core::fmt;
use core::marker::PhantomData;

use courier_hal::{Clock, ConfigureUart, UartConfig, UartTx, UsartId, UsartPins};

use crate::claim::{AlreadyClaimed, Claim};
use crate::format::{format_decimal, EncodingError};

/// Port has not been configured yet
pub struct Uninitialized;

/// Port is configured and can transmit
pub struct Ready;

/// Errors reported by [`SerialPort`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerialError<E> {
    /// Peripheral rejected the configuration
    Config(E),
    /// Pin pair cannot be routed to the claimed instance
    InvalidPins(UsartId),
    /// Instance is owned by another port
    AlreadyClaimed(UsartId),
    /// Value could not be rendered as text
    Encoding(EncodingError),
    /// Peripheral reported a fault while transmitting
    Transmit(E),
    /// Bounded send did not finish before its deadline
    Timeout,
}

impl<E> From<AlreadyClaimed> for SerialError<E> {
    fn from(e: AlreadyClaimed) -> Self {
        SerialError::AlreadyClaimed(e.0)
    }
}

impl<E> From<EncodingError> for SerialError<E> {
    fn from(e: EncodingError) -> Self {
        SerialError::Encoding(e)
    }
}

impl<E: fmt::Display> fmt::Display for SerialError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerialError::Config(e) => write!(f, "configuration failed: {}", e),
            SerialError::InvalidPins(id) => {
                write!(f, "pins cannot be routed to {}", id.name())
            }
            SerialError::AlreadyClaimed(id) => write!(f, "{} is already claimed", id.name()),
            SerialError::Encoding(e) => write!(f, "encoding failed: {}", e),
            SerialError::Transmit(e) => write!(f, "transmit failed: {}", e),
            SerialError::Timeout => f.write_str("transmit timed out"),
        }
    }
}

/// Exclusive handle to one USART
pub struct SerialPort<'c, U, S = Ready> {
    uart: U,
    claim: Claim<'c>,
    pins: UsartPins,
    config: UartConfig,
    _state: PhantomData<S>,
}

impl<'c, U, S> SerialPort<'c, U, S> {
    /// Instance this port owns
    pub fn instance(&self) -> UsartId {
        self.claim.id()
    }

    /// TX/RX pins this port is routed to
    pub fn pins(&self) -> UsartPins {
        self.pins
    }

    #[cfg(test)]
    pub(crate) fn uart(&self) -> &U {
        &self.uart
    }
}

impl<'c, U: ConfigureUart> SerialPort<'c, U, Uninitialized> {
    /// Bind a UART to the instance proven by `claim`
    ///
    /// The platform layer must already have enabled the peripheral clock and
    /// put `pins` in the modes given by [`UsartPins::configs`].
    pub fn new(uart: U, claim: Claim<'c>, pins: UsartPins) -> Self {
        Self {
            uart,
            claim,
            pins,
            config: UartConfig::default(),
            _state: PhantomData,
        }
    }

    /// Configure 115200 baud, 8-N-1, no flow control, TX and RX enabled
    pub fn initialize(self) -> Result<SerialPort<'c, U, Ready>, SerialError<U::Error>> {
        self.initialize_with(UartConfig::default())
    }

    /// Configure with a caller supplied configuration
    ///
    /// On failure the port is dropped and its claim released.
    pub fn initialize_with(
        mut self,
        config: UartConfig,
    ) -> Result<SerialPort<'c, U, Ready>, SerialError<U::Error>> {
        let instance = self.claim.id();
        if !instance.supports(&self.pins) {
            return Err(SerialError::InvalidPins(instance));
        }

        self.uart.configure(&config).map_err(SerialError::Config)?;

        Ok(SerialPort {
            uart: self.uart,
            claim: self.claim,
            pins: self.pins,
            config,
            _state: PhantomData,
        })
    }
}

impl<'c, U: UartTx> SerialPort<'c, U, Ready> {
    /// Configuration the peripheral was programmed with
    pub fn config(&self) -> &UartConfig {
        &self.config
    }

    /// Transmit `bytes` and wait until the last one has left the wire
    ///
    /// There is no timeout: the call returns only once every byte has been
    /// shifted out, or the peripheral reports a fault.
    pub fn send_bytes(&mut self, bytes: &[u8]) -> Result<(), SerialError<U::Error>> {
        self.uart
            .write_blocking(bytes)
            .map_err(SerialError::Transmit)?;
        self.uart.flush().map_err(SerialError::Transmit)
    }

    /// Transmit `bytes`, giving up after `timeout_us` microseconds
    ///
    /// The deadline covers handing bytes to the transmitter. Bytes already
    /// accepted before a timeout are on the wire; the rest are not sent.
    pub fn send_bytes_within<C: Clock>(
        &mut self,
        bytes: &[u8],
        timeout_us: u64,
        clock: &C,
    ) -> Result<(), SerialError<U::Error>> {
        let deadline = clock.deadline_after(timeout_us);

        for &byte in bytes {
            while !self
                .uart
                .try_write_byte(byte)
                .map_err(SerialError::Transmit)?
            {
                if clock.has_passed(deadline) {
                    return Err(SerialError::Timeout);
                }
            }
        }

        // At most one frame time once the last byte is accepted
        self.uart.flush().map_err(SerialError::Transmit)
    }

    /// Transmit the text up to its first NUL byte
    ///
    /// Text is sent as raw bytes without any encoding checks.
    pub fn send_text(&mut self, text: &str) -> Result<(), SerialError<U::Error>> {
        self.send_bytes(until_nul(text))
    }

    /// [`send_text`](Self::send_text) with the deadline of
    /// [`send_bytes_within`](Self::send_bytes_within)
    pub fn send_text_within<C: Clock>(
        &mut self,
        text: &str,
        timeout_us: u64,
        clock: &C,
    ) -> Result<(), SerialError<U::Error>> {
        self.send_bytes_within(until_nul(text), timeout_us, clock)
    }

    /// Transmit an integer as decimal text
    pub fn send_number(&mut self, value: impl Into<i128>) -> Result<(), SerialError<U::Error>> {
        let text = format_decimal(value)?;
        self.send_text(&text)
    }
}

/// Bytes of `text` before its first NUL
fn until_nul(text: &str) -> &[u8] {
    let bytes = text.as_bytes();
    let len = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    &bytes[..len]
}

/// Each formatted piece goes out through [`SerialPort::send_text`], so it
/// is cut at its first NUL like any other text.
impl<U: UartTx> fmt::Write for SerialPort<'_, U, Ready> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.send_text(s).map_err(|_| fmt::Error)
    }
}
