//! Board Support Crate for the hybrid controller of an analog computer.
//!
//! The controller is an ATmega328P at 16 MHz (Arduino Nano footprint) that
//! sits on the hybrid port of the analog computer. This crate re-exports
//! the HAL with the pins named by their function on the hybrid port
//! instead of their MCU names.
//!
//! | pin | port | use |
//! | --- | --- | --- |
//! | `en` | PD2 | hybrid mode enable |
//! | `ic` | PD3 | IC mode line |
//! | `op` | PD4 | OP mode line |
//! | `a0`..`a3` | PC0..PC3 | analog outputs of the computer |
//! | `rx`, `tx` | PD0, PD1 | USART0 to the host |
//! | `led` | PB5 | on board led |
//!
//! A rough skeleton for an application:
//!
//! ```no_run
//! #![no_std]
//! #![no_main]
//!
//! extern crate panic_halt;
//!
//! use hybrid_board::prelude::*;
//!
//! #[hybrid_board::entry]
//! fn main() -> ! {
//!     let dp = hybrid_board::Peripherals::take().unwrap();
//!
//!     unimplemented!()
//! }
//! ```

#![no_std]

// Expose hal & pac crates
pub use atmega328p_hal as hal;
pub use crate::hal::pac;

/// See [`avr_device::entry`](https://docs.rs/avr-device/latest/avr_device/attr.entry.html).
#[cfg(feature = "rt")]
pub use crate::hal::entry;

pub use crate::pac::Peripherals;

mod pins;
pub use crate::pins::*;

pub mod prelude {
    pub use crate::hal::prelude::*;
    pub use crate::hal::usart::BaudrateArduinoExt as _;
}

/// In debug builds a panic is reported on the serial port, release builds
/// link panic-halt instead.
#[cfg(debug_assertions)]
#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    use prelude::*;

    avr_device::interrupt::disable();

    let mut serial: Serial<hal::port::mode::Floating> =
        unsafe { core::mem::MaybeUninit::uninit().assume_init() };

    ufmt::uwriteln!(&mut serial, "Firmware panic!\r").void_unwrap();

    if let Some(loc) = info.location() {
        ufmt::uwriteln!(
            &mut serial,
            "  At {}:{}:{}\r",
            loc.file(),
            loc.line(),
            loc.column(),
        )
        .void_unwrap();
    }

    loop {}
}

/// Support for the Analog to Digital Converter
///
/// ```no_run
/// let dp = hybrid_board::Peripherals::take().unwrap();
///
/// let mut pins = hybrid_board::Pins::new(dp.PORTB, dp.PORTC, dp.PORTD);
///
/// let mut adc = hybrid_board::adc::Adc::new(dp.ADC, hybrid_board::adc::AdcSettings::default());
///
/// // Convert pin to Analog input
/// let mut a0 = pins.a0.into_analog_input(&mut adc);
///
/// let aread: u16 = nb::block!{adc.read(&mut a0)}.void_unwrap();
/// ```
pub mod adc {
    pub use atmega328p_hal::adc::*;
}

/// Serial (UART) interface on pins `RX` and `TX`
///
/// ```no_run
/// let dp = hybrid_board::Peripherals::take().unwrap();
///
/// let mut pins = hybrid_board::Pins::new(dp.PORTB, dp.PORTC, dp.PORTD);
///
/// let mut serial = hybrid_board::Serial::new(
///     dp.USART0,
///     pins.rx,
///     pins.tx.into_output(&mut pins.ddr),
///     115200.into_baudrate(),
/// );
///
/// ufmt::uwriteln!(&mut serial, "status\r").void_unwrap();
/// ```
pub type Serial<IMODE> = hal::usart::Usart0<hal::clock::MHz16, IMODE>;
