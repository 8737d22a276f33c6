//! routines that read the analog outputs of the computer during a run
//!
//! The sample interrupt only starts a record, the conversions are then
//! collected by [`Sampler::poll`] from the main loop. Interrupts are never
//! held off for a whole record.
use bare_metal::CriticalSection;
use heapless::Vec;
use ufmt::uWrite;
use void::Void;

use crate::config::MAX_CHANNELS;
use crate::timer::{PeriodicTimer, TimerHw};

const RECORD_CHANNELS: usize = MAX_CHANNELS as usize;

/// longest record, five digits and ';' per reading and the line end
const RECORD_SIZE: usize = RECORD_CHANNELS * 6 + 2;

/// Analog input channels in ascending order, A0 first
pub trait AnalogInputs {
    /// Starts a conversion on `channel` if none is running and returns
    /// `WouldBlock` until its result is ready.
    fn read(&mut self, channel: u8) -> nb::Result<u16, Void>;
}

/// one record, formatted before it is handed to the output in one write
struct RecordBuf(Vec<u8, RECORD_SIZE>);

impl uWrite for RecordBuf {
    type Error = ();

    fn write_str(&mut self, s: &str) -> Result<(), ()> {
        self.0.extend_from_slice(s.as_bytes())
    }
}

pub struct Sampler<A, H> {
    inputs: A,
    timer: PeriodicTimer<H>,
    // channels of the record being converted, zero when there is none
    channels: u8,
    readings: Vec<u16, RECORD_CHANNELS>,
}

impl<A, H> Sampler<A, H>
where
    A: AnalogInputs,
    H: TimerHw,
{
    pub fn new(inputs: A, timer: PeriodicTimer<H>) -> Sampler<A, H> {
        Sampler {
            inputs,
            timer,
            channels: 0,
            readings: Vec::new(),
        }
    }

    pub fn start(&mut self, interval_ms: u32, cs: &CriticalSection) {
        self.discard();
        self.timer.start(interval_ms, cs);
    }

    /// a record still being converted is dropped
    pub fn stop(&mut self, cs: &CriticalSection) {
        self.timer.stop(cs);
        self.discard();
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    pub fn is_converting(&self) -> bool {
        self.channels > 0
    }

    /// Sample timer interrupt. Starts a record each time the interval
    /// expires, an expiry while the last record is still converting is
    /// skipped.
    pub fn tick<W>(&mut self, channels: u8, out: &mut W, cs: &CriticalSection) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        if !self.timer.tick(cs) || self.is_converting() {
            return Ok(());
        }
        self.channels = channels.min(MAX_CHANNELS);
        self.readings.clear();
        self.poll(out)
    }

    /// Collects finished conversions and starts the next one. Writes the
    /// record once every channel is read.
    pub fn poll<W>(&mut self, out: &mut W) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        while self.is_converting() {
            let channel = self.readings.len() as u8;
            if channel >= self.channels {
                let result = self.record(out);
                self.discard();
                return result;
            }
            match self.inputs.read(channel) {
                Ok(value) => {
                    // bounded by channels
                    let _ = self.readings.push(value);
                }
                Err(nb::Error::WouldBlock) => return Ok(()),
                Err(nb::Error::Other(e)) => void::unreachable(e),
            }
        }
        Ok(())
    }

    fn discard(&mut self) {
        self.channels = 0;
        self.readings.clear();
    }

    /// raw readings, each followed by ';', one record per line
    fn record<W>(&self, out: &mut W) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        let mut buf = RecordBuf(Vec::new());
        for value in self.readings.iter() {
            if ufmt::uwrite!(&mut buf, "{};", *value).is_err() {
                return Ok(());
            }
        }
        if ufmt::uwriteln!(&mut buf, "\r").is_err() {
            return Ok(());
        }
        match core::str::from_utf8(&buf.0) {
            Ok(text) => out.write_str(text),
            Err(_) => Ok(()),
        }
    }
}
