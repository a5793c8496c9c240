//! UART driver for STM32F1
//!
//! Wraps a blocking embassy-stm32 USART so it can be driven through the
//! `courier-hal` traits.

use core::fmt;

use courier_hal::uart::{DataBits, FlowControl, Parity, StopBits, UartMode};
use courier_hal::{ConfigureUart, UartConfig, UartTx, UsartId};
use embassy_stm32::mode::Blocking;
use embassy_stm32::pac;
use embassy_stm32::usart::{self, ConfigError, Error as UsartError, Uart};

/// Error from UART operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartBusError {
    /// Framing error
    Framing,
    /// Noise error
    Noise,
    /// Overrun error
    Overrun,
    /// Parity error
    Parity,
    /// Buffer too small
    BufferTooSmall,
    /// Requested baud rate is below what the peripheral clock allows
    BaudrateTooLow,
    /// Requested baud rate is above what the peripheral clock allows
    BaudrateTooHigh,
    /// Configuration not supported by this wrapper
    Unsupported,
    /// Other error
    Other,
}

impl From<UsartError> for UartBusError {
    fn from(e: UsartError) -> Self {
        match e {
            UsartError::Framing => UartBusError::Framing,
            UsartError::Noise => UartBusError::Noise,
            UsartError::Overrun => UartBusError::Overrun,
            UsartError::Parity => UartBusError::Parity,
            UsartError::BufferTooLong => UartBusError::BufferTooSmall,
            _ => UartBusError::Other,
        }
    }
}

impl From<ConfigError> for UartBusError {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::BaudrateTooLow => UartBusError::BaudrateTooLow,
            ConfigError::BaudrateTooHigh => UartBusError::BaudrateTooHigh,
            ConfigError::DataParityNotSupported => UartBusError::Unsupported,
            _ => UartBusError::Other,
        }
    }
}

impl fmt::Display for UartBusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            UartBusError::Framing => "framing error",
            UartBusError::Noise => "noise error",
            UartBusError::Overrun => "overrun error",
            UartBusError::Parity => "parity error",
            UartBusError::BufferTooSmall => "buffer too small",
            UartBusError::BaudrateTooLow => "baud rate too low",
            UartBusError::BaudrateTooHigh => "baud rate too high",
            UartBusError::Unsupported => "unsupported configuration",
            UartBusError::Other => "usart error",
        };
        f.write_str(msg)
    }
}

/// Translate a board-agnostic config into the embassy one
///
/// Flow control and single-direction modes are rejected: the blocking
/// wrapper always owns both lines and never drives RTS/CTS.
pub fn to_embassy_config(config: &UartConfig) -> Result<usart::Config, UartBusError> {
    if config.flow_control != FlowControl::None || config.mode != UartMode::TxRx {
        return Err(UartBusError::Unsupported);
    }

    let mut out = usart::Config::default();
    out.baudrate = config.baudrate;
    out.data_bits = match config.data_bits {
        DataBits::Seven => usart::DataBits::DataBits7,
        DataBits::Eight => usart::DataBits::DataBits8,
        DataBits::Nine => usart::DataBits::DataBits9,
    };
    out.parity = match config.parity {
        Parity::None => usart::Parity::ParityNone,
        Parity::Even => usart::Parity::ParityEven,
        Parity::Odd => usart::Parity::ParityOdd,
    };
    out.stop_bits = match config.stop_bits {
        StopBits::One => usart::StopBits::STOP1,
        StopBits::Two => usart::StopBits::STOP2,
    };
    Ok(out)
}

/// Blocking USART bound to one instance
pub struct BlockingUsart<'d> {
    uart: Uart<'d, Blocking>,
    instance: UsartId,
}

impl<'d> BlockingUsart<'d> {
    /// Wrap an already opened embassy USART
    ///
    /// `instance` must be the peripheral `uart` was opened on; it selects
    /// the status register polled by [`UartTx::try_write_byte`].
    pub fn new(uart: Uart<'d, Blocking>, instance: UsartId) -> Self {
        Self { uart, instance }
    }

    fn regs(&self) -> pac::usart::Usart {
        match self.instance {
            UsartId::Usart1 => pac::USART1,
            UsartId::Usart2 => pac::USART2,
            UsartId::Usart3 => pac::USART3,
        }
    }

    /// Transmit data register empty
    fn tx_ready(&self) -> bool {
        self.regs().sr().read().txe()
    }
}

impl UartTx for BlockingUsart<'_> {
    type Error = UartBusError;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.uart.blocking_write(data)?;
        Ok(())
    }

    fn try_write_byte(&mut self, byte: u8) -> Result<bool, Self::Error> {
        if !self.tx_ready() {
            return Ok(false);
        }
        // TXE is set, so this returns without spinning
        self.uart.blocking_write(&[byte])?;
        Ok(true)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.uart.blocking_flush()?;
        Ok(())
    }
}

impl ConfigureUart for BlockingUsart<'_> {
    fn configure(&mut self, config: &UartConfig) -> Result<(), Self::Error> {
        let config = to_embassy_config(config)?;
        self.uart.set_config(&config)?;
        Ok(())
    }
}
