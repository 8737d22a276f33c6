//! adc readings of the computer's analog outputs

use hybrid_board::adc::Adc;
use hybrid_board::hal::port::mode::Analog;
use hybrid_board::hal::port::portc::{PC0, PC1, PC2, PC3};
use hybrid_board::prelude::*;
use hybrid_sequencer::AnalogInputs;
use void::Void;

pub struct AnalogChannels {
    adc: Adc,
    a0: PC0<Analog>,
    a1: PC1<Analog>,
    a2: PC2<Analog>,
    a3: PC3<Analog>,
}

impl AnalogChannels {
    pub fn new(adc: Adc, a0: PC0<Analog>, a1: PC1<Analog>, a2: PC2<Analog>, a3: PC3<Analog>) -> Self {
        AnalogChannels { adc, a0, a1, a2, a3 }
    }
}

impl AnalogInputs for AnalogChannels {
    /// the first call starts a conversion, about 104us at the default
    /// clock division, later calls return its result once it is done
    fn read(&mut self, channel: u8) -> nb::Result<u16, Void> {
        match channel {
            0 => self.adc.read(&mut self.a0),
            1 => self.adc.read(&mut self.a1),
            2 => self.adc.read(&mut self.a2),
            3 => self.adc.read(&mut self.a3),
            _ => Ok(0),
        }
    }
}
