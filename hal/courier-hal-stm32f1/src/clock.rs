//! Clock tree and time source for STM32F1 boards

use courier_hal::Clock;
use embassy_stm32::rcc::{
    AHBPrescaler, APBPrescaler, Hse, HseMode, Pll, PllMul, PllPreDiv, PllSource, Sysclk,
};
use embassy_stm32::time::Hertz;
use embassy_stm32::Config;
use embassy_time::Instant;

/// External crystal fitted on the Blue Pill
pub const HSE_FREQ: Hertz = Hertz(8_000_000);

/// System clock reached by [`blue_pill_config`]
pub const SYSCLK_FREQ: Hertz = Hertz(72_000_000);

/// Embassy config for a Blue Pill running at 72 MHz
///
/// 8 MHz HSE -> PLL x9 -> 72 MHz SYSCLK. APB1 is limited to 36 MHz on this
/// family, APB2 (where USART1 lives) runs at the full 72 MHz.
pub fn blue_pill_config() -> Config {
    let mut config = Config::default();
    config.rcc.hse = Some(Hse {
        freq: HSE_FREQ,
        mode: HseMode::Oscillator,
    });
    config.rcc.pll = Some(Pll {
        src: PllSource::HSE,
        prediv: PllPreDiv::DIV1,
        mul: PllMul::MUL9,
    });
    config.rcc.sys = Sysclk::PLL1_P;
    config.rcc.ahb_pre = AHBPrescaler::DIV1;
    config.rcc.apb1_pre = APBPrescaler::DIV2;
    config.rcc.apb2_pre = APBPrescaler::DIV1;
    config
}

/// Monotonic clock backed by the embassy time driver
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_micros(&self) -> u64 {
        Instant::now().as_micros()
    }
}
