//! Courier - Blue Pill UART Beacon Firmware
//!
//! Brings up an STM32F103 at 72 MHz, claims USART1 and announces itself
//! over the serial line: one greeting, then a status line every interval.
//!
//! Startup order is fixed: clocks, then the serial port, then the beacon.
//! Any failure before the beacon starts halts the chip with the line
//! silent; there is nobody to report to and nothing to retry.

#![no_std]
#![no_main]

use courier_core::serial::SerialError;
use courier_core::{Beacon, PeripheralClaims, SerialPort};
use courier_hal_stm32f1::clock::{blue_pill_config, EmbassyClock, SYSCLK_FREQ};
use courier_hal_stm32f1::uart::{to_embassy_config, BlockingUsart, UartBusError};
use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::usart::Uart;
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

/// Board constants generated by build.rs from board.toml
mod board {
    include!(concat!(env!("OUT_DIR"), "/board_config.rs"));
}

/// Ownership of the USART instances
static CLAIMS: PeripheralClaims = PeripheralClaims::new();

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Courier firmware starting...");

    // Platform bring-up: clocks, time driver, interrupt controller
    let p = embassy_stm32::init(blue_pill_config());
    info!("Peripherals initialized, SYSCLK = {} Hz", SYSCLK_FREQ.0);

    let settings = board::SERIAL;
    let uart_config = settings.uart_config();

    let usart_config = match to_embassy_config(&uart_config) {
        Ok(config) => config,
        Err(e) => fail_stop(SerialError::Config(e)),
    };

    // Opening the USART enables its clock and puts the pins in these modes
    for pin in settings.pins.configs() {
        info!(
            "{} pin {}: {}",
            if pin.is_output() { "Driven" } else { "Input" },
            pin.pin,
            pin
        );
    }
    let remapped = settings.instance.is_remapped(&settings.pins);
    let usart = if remapped {
        Uart::new_blocking(p.USART1, p.PB7, p.PB6, usart_config)
    } else {
        Uart::new_blocking(p.USART1, p.PA10, p.PA9, usart_config)
    };
    let usart = match usart {
        Ok(usart) => BlockingUsart::new(usart, settings.instance),
        Err(e) => fail_stop(SerialError::Config(e.into())),
    };

    let claim = match CLAIMS.claim(settings.instance) {
        Ok(claim) => claim,
        Err(e) => fail_stop(e.into()),
    };

    let mut port = match SerialPort::new(usart, claim, settings.pins).initialize_with(uart_config) {
        Ok(port) => port,
        Err(e) => fail_stop(e),
    };
    info!(
        "{} ready: {} baud 8N1, tx={}, rx={}, remapped={}",
        port.instance().name(),
        port.config().baudrate,
        port.pins().tx,
        port.pins().rx,
        remapped
    );

    let mut beacon = Beacon::new(board::BEACON);
    info!(
        "Beacon running, interval {} ms, status line takes {} us on the wire",
        beacon.config().interval_ms,
        uart_config.transfer_time_us(beacon.config().status.len())
    );

    // Bounded, so a stalled transmitter halts the board instead of hanging
    if let Err(e) = beacon.greet_within(&mut port, &EmbassyClock) {
        error!("Greeting not sent: {}", e);
        halt()
    }

    let err = beacon.keep_alive(&mut port, &mut Delay).await;
    error!("Beacon stopped after {} status messages: {}", beacon.ticks(), err);
    halt()
}

/// Log the error once, then halt
fn fail_stop(err: SerialError<UartBusError>) -> ! {
    error!("Serial port initialization failed: {}", err);
    halt()
}

/// Park the core forever
///
/// The UART is left alone; the line stays silent.
fn halt() -> ! {
    loop {
        cortex_m::asm::wfi();
    }
}
