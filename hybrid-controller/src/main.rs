//! firmware for the hybrid controller
//! runs IC/OP sequences on an analog computer, samples its outputs
//! and takes commands over the serial port

#![no_std]
#![no_main]
#![feature(abi_avr_interrupt)]

#[cfg(not(debug_assertions))]
extern crate panic_halt;

use avr_device::interrupt;
use core::cell::RefCell;
use core::ops::{Deref, DerefMut};

use heapless::Deque;

use hybrid_board::hal;
use hybrid_board::pac;
use hybrid_board::prelude::*;
use hal::port::mode::{Floating, Output};
use hal::port::portd::{PD2, PD3, PD4};

use hybrid_sequencer::{
    Controller, HybridLines, LineBuffer, OutputQueue, PeriodicTimer, Sampler, SequencerState,
};

//==========================================================

mod analog;
use crate::analog::AnalogChannels;

mod timers;
use crate::timers::{PhaseTimer, SampleTimer};

#[cfg(debug_assertions)]
mod trace;

//==========================================================

const BAUD: u32 = 115200;

type Lines = HybridLines<PD3<Output>, PD4<Output>, PD2<Output>>;
type HybridController = Controller<Lines, AnalogChannels, PhaseTimer, SampleTimer>;

static CONTROLLER: interrupt::Mutex<RefCell<Option<HybridController>>> =
    interrupt::Mutex::new(RefCell::new(None));

// written by the timer interrupts and the command handler, drained by the main loop
static OUTPUT: interrupt::Mutex<RefCell<OutputQueue>> =
    interrupt::Mutex::new(RefCell::new(OutputQueue::new()));

const INPUT_QUEUE_SIZE: usize = 64;

// filled by the usart receive interrupt, a byte that does not fit is lost
static INPUT: interrupt::Mutex<RefCell<Deque<u8, INPUT_QUEUE_SIZE>>> =
    interrupt::Mutex::new(RefCell::new(Deque::new()));

fn current_state() -> SequencerState {
    interrupt::free(|cs| {
        if let Some(c) = CONTROLLER.borrow(cs).borrow().deref() {
            c.state()
        } else {
            SequencerState::Idle
        }
    })
}

//==========================================================

#[hal::entry]
fn main() -> ! {
    let dp = hybrid_board::Peripherals::take().unwrap();

    // turn off unused modules
    let cpu = dp.CPU;
    cpu.prr.write(|w| {
        w.prtim0().set_bit();
        w.prspi().set_bit();
        w.prtwi().set_bit()
    });
    // turn off analog comparator
    let ac = dp.AC;
    ac.acsr.write(|w| w.acd().set_bit());

    let mut pins = hybrid_board::Pins::new(dp.PORTB, dp.PORTC, dp.PORTD);

    let mut led = pins.led.into_output(&mut pins.ddr);

    // mode lines, the enable line starts low so the computer keeps its own mode
    let lines = HybridLines::new(
        pins.ic.into_output(&mut pins.ddr),
        pins.op.into_output(&mut pins.ddr),
        pins.en.into_output(&mut pins.ddr),
    );

    let mut serial = hybrid_board::Serial::<Floating>::new(
        dp.USART0,
        pins.rx,
        pins.tx.into_output(&mut pins.ddr),
        BAUD.into_baudrate(),
    );
    // receive interrupt, the serial object is only used for sending
    let usart = unsafe { &*pac::USART0::ptr() };
    usart.ucsr0b.modify(|_, w| w.rxcie0().set_bit());

    // setup adc, default is 128 clock division, and AVcc voltage reference
    let mut adc = hybrid_board::adc::Adc::new(dp.ADC, Default::default());
    let a0 = pins.a0.into_analog_input(&mut adc);
    let a1 = pins.a1.into_analog_input(&mut adc);
    let a2 = pins.a2.into_analog_input(&mut adc);
    let a3 = pins.a3.into_analog_input(&mut adc);
    let inputs = AnalogChannels::new(adc, a0, a1, a2, a3);

    let sampler = Sampler::new(inputs, PeriodicTimer::new(SampleTimer::new(dp.TC2)));
    let controller = Controller::new(lines, sampler, PeriodicTimer::new(PhaseTimer::new(dp.TC1)));

    interrupt::free(|cs| {
        // transfer to static variable
        CONTROLLER.borrow(cs).replace(Some(controller));
        #[cfg(debug_assertions)]
        trace::send_banner(OUTPUT.borrow(cs).borrow_mut().deref_mut()).void_unwrap();
    });

    let mut line = LineBuffer::new();
    // byte taken from the queue the usart wasn't ready for
    let mut pending: Option<u8> = None;
    #[cfg(debug_assertions)]
    let mut prev_state = SequencerState::Idle;

    // enable interrupts
    unsafe {
        interrupt::enable();
    }

    loop {
        let received = interrupt::free(|cs| INPUT.borrow(cs).borrow_mut().pop_front());
        if let Some(byte) = received {
            if line.push(byte) {
                interrupt::free(|cs| {
                    let mut output = OUTPUT.borrow(cs).borrow_mut();
                    if let Some(ref mut c) = CONTROLLER.borrow(cs).borrow_mut().deref_mut() {
                        c.handle_input(line.line(), output.deref_mut(), cs).void_unwrap();
                    }
                });
                line.clear();
            }
        }

        // finish the adc conversions of a sample, one step per pass
        interrupt::free(|cs| {
            let mut output = OUTPUT.borrow(cs).borrow_mut();
            if let Some(ref mut c) = CONTROLLER.borrow(cs).borrow_mut().deref_mut() {
                c.sample_poll(output.deref_mut(), cs).void_unwrap();
            }
        });

        if pending.is_none() {
            pending = interrupt::free(|cs| OUTPUT.borrow(cs).borrow_mut().pop());
        }
        if let Some(byte) = pending {
            match serial.write(byte) {
                Ok(()) => pending = None,
                Err(nb::Error::WouldBlock) => {}
                Err(nb::Error::Other(e)) => void::unreachable(e),
            }
        }

        let state = current_state();
        if state == SequencerState::Idle {
            led.set_low().void_unwrap();
        } else {
            led.set_high().void_unwrap();
        }

        #[cfg(debug_assertions)]
        {
            interrupt::free(|cs| {
                let mut output = OUTPUT.borrow(cs).borrow_mut();
                let dropped = output.take_dropped();
                if dropped > 0 {
                    trace::send_dropped(output.deref_mut(), dropped).void_unwrap();
                }
                if state != prev_state {
                    trace::send_transition(output.deref_mut(), prev_state, state).void_unwrap();
                }
            });
            prev_state = state;
        }
    }
}

//==========================================================

// interrupt handler for Timer1 compare match A, once per millisecond
#[interrupt(atmega328p)]
fn TIMER1_COMPA() {
    // interrupts are already off in an avr handler, free() only
    // provides the token for the statics
    interrupt::free(move |cs| {
        let mut output = OUTPUT.borrow(cs).borrow_mut();
        if let Some(ref mut c) = CONTROLLER.borrow(cs).borrow_mut().deref_mut() {
            c.phase_tick(output.deref_mut(), cs).void_unwrap();
        }
    });
}

//==========================================================

// interrupt handler for Timer2 compare match A, once per millisecond
#[interrupt(atmega328p)]
fn TIMER2_COMPA() {
    // interrupts are already off in an avr handler, free() only
    // provides the token for the statics
    interrupt::free(move |cs| {
        let mut output = OUTPUT.borrow(cs).borrow_mut();
        if let Some(ref mut c) = CONTROLLER.borrow(cs).borrow_mut().deref_mut() {
            c.sample_tick(output.deref_mut(), cs).void_unwrap();
        }
    });
}

//==========================================================

// interrupt handler for USART receive complete, keeps the two byte
// hardware buffer from overrunning while the main loop is busy
#[interrupt(atmega328p)]
fn USART_RX() {
    let usart = unsafe { &*pac::USART0::ptr() };
    let byte = usart.udr0.read().bits();
    interrupt::free(move |cs| {
        let _ = INPUT.borrow(cs).borrow_mut().push_back(byte);
    });
}
