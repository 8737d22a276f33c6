//! test doubles for the hardware seams

use core::convert::Infallible;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::string::String;
use std::vec::Vec;

use embedded_hal::digital::v2::OutputPin;
use void::Void;

use crate::sampler::AnalogInputs;
use crate::timer::TimerHw;

/// Output pin whose level can be inspected through any clone. Pins made
/// with `sharing_journal` record their writes in one common journal.
#[derive(Clone)]
pub struct MockPin {
    level: Rc<Cell<bool>>,
    journal: Rc<RefCell<Vec<(usize, bool)>>>,
}

impl MockPin {
    pub fn new() -> MockPin {
        MockPin {
            level: Rc::new(Cell::new(false)),
            journal: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn sharing_journal(&self) -> MockPin {
        MockPin {
            level: Rc::new(Cell::new(false)),
            journal: self.journal.clone(),
        }
    }

    fn id(&self) -> usize {
        Rc::as_ptr(&self.level) as usize
    }

    pub fn is_high(&self) -> bool {
        self.level.get()
    }

    pub fn force(&self, level: bool) {
        self.level.set(level);
    }

    pub fn clear_journal(&self) {
        self.journal.borrow_mut().clear();
    }

    /// levels of `(a, b)` after every journaled write, starting from `start`
    pub fn replay(a: &MockPin, b: &MockPin, start: (bool, bool)) -> Vec<(bool, bool)> {
        let mut levels = start;
        let mut seen = Vec::new();
        for &(id, level) in a.journal.borrow().iter() {
            if id == a.id() {
                levels.0 = level;
            } else if id == b.id() {
                levels.1 = level;
            }
            seen.push(levels);
        }
        seen
    }

    fn write(&mut self, level: bool) {
        self.level.set(level);
        self.journal.borrow_mut().push((self.id(), level));
    }
}

impl OutputPin for MockPin {
    type Error = Void;

    fn set_low(&mut self) -> Result<(), Void> {
        self.write(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Void> {
        self.write(true);
        Ok(())
    }
}

//==========================================================

/// Timer interrupt enable bit
#[derive(Clone)]
pub struct MockTimerHw {
    enabled: Rc<Cell<bool>>,
    enables: Rc<Cell<u32>>,
}

impl MockTimerHw {
    pub fn new() -> MockTimerHw {
        MockTimerHw {
            enabled: Rc::new(Cell::new(false)),
            enables: Rc::new(Cell::new(0)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    pub fn enables(&self) -> u32 {
        self.enables.get()
    }
}

impl TimerHw for MockTimerHw {
    fn enable(&mut self) {
        self.enabled.set(true);
        self.enables.set(self.enables.get() + 1);
    }

    fn disable(&mut self) {
        self.enabled.set(false);
    }
}

//==========================================================

/// Adc returning fixed readings per channel. A conversion is ready on
/// the `latency`-th read after the one that started it.
#[derive(Clone)]
pub struct MockAdc {
    values: [u16; 4],
    latency: u8,
    converting: Option<(u8, u8)>,
    reads: Rc<RefCell<Vec<u8>>>,
}

impl MockAdc {
    pub fn new(values: [u16; 4]) -> MockAdc {
        MockAdc {
            values,
            latency: 1,
            converting: None,
            reads: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn with_latency(mut self, latency: u8) -> MockAdc {
        self.latency = latency.max(1);
        self
    }

    /// channels in the order their conversions completed
    pub fn reads(&self) -> Vec<u8> {
        self.reads.borrow().clone()
    }
}

impl AnalogInputs for MockAdc {
    fn read(&mut self, channel: u8) -> nb::Result<u16, Void> {
        match self.converting {
            Some((busy, remaining)) if busy == channel => {
                if remaining > 1 {
                    self.converting = Some((busy, remaining - 1));
                    Err(nb::Error::WouldBlock)
                } else {
                    self.converting = None;
                    self.reads.borrow_mut().push(channel);
                    Ok(self.values[channel as usize])
                }
            }
            _ => {
                self.converting = Some((channel, self.latency));
                Err(nb::Error::WouldBlock)
            }
        }
    }
}

//==========================================================

/// Serial output collected into a string
#[derive(Default)]
pub struct TestOut(pub String);

impl TestOut {
    pub fn new() -> TestOut {
        TestOut(String::new())
    }

    pub fn lines(&self) -> Vec<&str> {
        self.0.split("\r\n").filter(|l| !l.is_empty()).collect()
    }

    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.0)
    }
}

impl ufmt::uWrite for TestOut {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
        self.0.push_str(s);
        Ok(())
    }
}

/// token for calling into the library outside of an interrupt free section
pub fn cs() -> bare_metal::CriticalSection {
    unsafe { bare_metal::CriticalSection::new() }
}
