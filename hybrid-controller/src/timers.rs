//! the two millisecond timers
//!
//! Both run in CTC mode at CK/64, a compare match every 250 counts is one
//! millisecond at 16 MHz. Timer1 paces the run phases, Timer2 the samples.

use hybrid_board::pac;
use hybrid_sequencer::TimerHw;

// 16 MHz / 64 / 1000 - 1
const MS_COMPARE: u8 = 249;

pub struct PhaseTimer {
    tc1: pac::TC1,
}

impl PhaseTimer {
    pub fn new(tc1: pac::TC1) -> Self {
        tc1.timsk1.write(|w| w.ocie1a().clear_bit());
        tc1.tccr1a.write(|w| unsafe { w.wgm1().bits(0b00) });
        tc1.tccr1b.write(|w| unsafe { w.wgm1().bits(0b01) }.cs1().prescale_64());
        tc1.ocr1a.write(|w| unsafe { w.bits(MS_COMPARE as u16) });
        PhaseTimer { tc1 }
    }
}

impl TimerHw for PhaseTimer {
    fn enable(&mut self) {
        // first period is a whole millisecond
        self.tc1.tcnt1.write(|w| unsafe { w.bits(0) });
        self.tc1.tifr1.write(|w| w.ocf1a().set_bit());
        self.tc1.timsk1.write(|w| w.ocie1a().set_bit());
    }

    fn disable(&mut self) {
        self.tc1.timsk1.write(|w| w.ocie1a().clear_bit());
    }
}

//==========================================================

pub struct SampleTimer {
    tc2: pac::TC2,
}

impl SampleTimer {
    pub fn new(tc2: pac::TC2) -> Self {
        tc2.timsk2.write(|w| w.ocie2a().clear_bit());
        tc2.tccr2a.write(|w| w.wgm2().ctc());
        tc2.tccr2b.write(|w| w.cs2().prescale_64());
        tc2.ocr2a.write(|w| unsafe { w.bits(MS_COMPARE) });
        SampleTimer { tc2 }
    }
}

impl TimerHw for SampleTimer {
    fn enable(&mut self) {
        self.tc2.tcnt2.write(|w| unsafe { w.bits(0) });
        self.tc2.tifr2.write(|w| w.ocf2a().set_bit());
        self.tc2.timsk2.write(|w| w.ocie2a().set_bit());
    }

    fn disable(&mut self) {
        self.tc2.timsk2.write(|w| w.ocie2a().clear_bit());
    }
}
