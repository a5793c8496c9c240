//! UART serial communication abstractions
//!
//! Provides traits for blocking serial transmission that can be
//! implemented by chip-specific HALs.

/// UART transmitter
///
/// Blocking trait for sending data over a UART interface.
pub trait UartTx {
    /// Error type for transmit operations
    type Error;

    /// Write data to the UART
    ///
    /// Blocks until all data has been handed to the transmitter or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Try to hand a single byte to the transmitter without waiting
    ///
    /// Returns `Ok(false)` if the transmit register is still occupied.
    fn try_write_byte(&mut self, byte: u8) -> Result<bool, Self::Error>;

    /// Wait until the last byte has left the shift register
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// UART that can be (re)programmed with a new configuration
///
/// Shares its error type with [`UartTx`] so a driver can report both
/// configuration and transmit faults through one error.
pub trait ConfigureUart: UartTx {
    /// Program baud rate, frame format and enabled directions
    fn configure(&mut self, config: &UartConfig) -> Result<(), Self::Error>;
}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
    /// Hardware flow control
    pub flow_control: FlowControl,
    /// Enabled directions
    pub mode: UartMode,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baudrate: 115200,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            flow_control: FlowControl::None,
            mode: UartMode::TxRx,
        }
    }
}

impl UartConfig {
    /// Default 8-N-1 configuration at the given baud rate
    pub fn with_baudrate(baudrate: u32) -> Self {
        Self {
            baudrate,
            ..Self::default()
        }
    }

    /// Bits on the wire per transmitted byte (start + data + parity + stop)
    pub fn bits_per_frame(&self) -> u32 {
        let data = match self.data_bits {
            DataBits::Seven => 7,
            DataBits::Eight => 8,
            DataBits::Nine => 9,
        };
        let parity = match self.parity {
            Parity::None => 0,
            Parity::Even | Parity::Odd => 1,
        };
        let stop = match self.stop_bits {
            StopBits::One => 1,
            StopBits::Two => 2,
        };
        1 + data + parity + stop
    }

    /// Time needed to shift out `bytes` bytes, in microseconds (rounded up)
    ///
    /// Returns `None` for a zero baud rate.
    pub fn transfer_time_us(&self, bytes: usize) -> Option<u64> {
        if self.baudrate == 0 {
            return None;
        }
        let bits = bytes as u64 * self.bits_per_frame() as u64;
        Some((bits * 1_000_000).div_ceil(self.baudrate as u64))
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
    Nine,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}

/// Hardware flow control mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlowControl {
    None,
    RtsCts,
}

/// Which directions of the peripheral are enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartMode {
    TxOnly,
    RxOnly,
    TxRx,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_115200_8n1() {
        let config = UartConfig::default();
        assert_eq!(config.baudrate, 115200);
        assert_eq!(config.data_bits, DataBits::Eight);
        assert_eq!(config.parity, Parity::None);
        assert_eq!(config.stop_bits, StopBits::One);
        assert_eq!(config.flow_control, FlowControl::None);
        assert_eq!(config.mode, UartMode::TxRx);
    }

    #[test]
    fn test_bits_per_frame() {
        assert_eq!(UartConfig::default().bits_per_frame(), 10);

        let mut config = UartConfig::default();
        config.parity = Parity::Even;
        config.stop_bits = StopBits::Two;
        assert_eq!(config.bits_per_frame(), 12);
    }

    #[test]
    fn test_transfer_time() {
        let config = UartConfig::default();
        // 10 bits at 115200 baud = 86.8us
        assert_eq!(config.transfer_time_us(1), Some(87));
        // "Looping...\r\n" is 12 bytes
        assert_eq!(config.transfer_time_us(12), Some(1042));
        assert_eq!(config.transfer_time_us(0), Some(0));

        assert_eq!(UartConfig::with_baudrate(0).transfer_time_us(1), None);
    }
}
