//! millisecond periodic timers
//!
//! The hardware timer only provides a 1 kHz compare interrupt that can be
//! switched on and off. The period is counted here in software, the
//! interrupt handler calls [`PeriodicTimer::tick`] once per millisecond.

use bare_metal::CriticalSection;

/// Hardware side of a periodic timer
pub trait TimerHw {
    /// restart the prescaler count and enable the 1ms interrupt
    fn enable(&mut self);
    /// disable the interrupt, a no-op when already disabled
    fn disable(&mut self);
}

pub struct PeriodicTimer<H> {
    hw: H,
    period: u32,
    remaining: u32,
    running: bool,
}

impl<H: TimerHw> PeriodicTimer<H> {
    pub fn new(mut hw: H) -> PeriodicTimer<H> {
        hw.disable();
        PeriodicTimer {
            hw,
            period: 0,
            remaining: 0,
            running: false,
        }
    }

    /// (re)start with a period in milliseconds, zero is treated as one
    pub fn start(&mut self, period_ms: u32, _cs: &CriticalSection) {
        self.period = period_ms.max(1);
        self.remaining = self.period;
        self.running = true;
        self.hw.enable();
    }

    pub fn stop(&mut self, _cs: &CriticalSection) {
        self.running = false;
        self.hw.disable();
    }

    pub fn is_running(&self) -> bool {
        self.running
    }


    /// one millisecond has passed, returns true when the period expired.
    /// The count reloads from the period, not from when the expiry was
    /// handled, so a periodic timer does not drift.
    pub fn tick(&mut self, _cs: &CriticalSection) -> bool {
        if !self.running {
            return false;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            self.remaining = self.period;
            true
        } else {
            false
        }
    }

    #[cfg(test)]
    pub(crate) fn period(&self) -> u32 {
        self.period
    }

    #[cfg(test)]
    pub(crate) fn hw(&self) -> &H {
        &self.hw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{cs, MockTimerHw};

    fn ticks_until_fire(timer: &mut PeriodicTimer<MockTimerHw>, limit: u32) -> Option<u32> {
        let cs = cs();
        (1..=limit).find(|_| timer.tick(&cs))
    }

    #[test]
    fn stopped_timer_never_fires() {
        let cs = cs();
        let mut timer = PeriodicTimer::new(MockTimerHw::new());
        assert!(!timer.is_running());
        assert!(!(0..100).any(|_| timer.tick(&cs)));
    }

    #[test]
    fn fires_every_period_without_drift() {
        let cs = cs();
        let mut timer = PeriodicTimer::new(MockTimerHw::new());
        timer.start(5, &cs);
        let fired: Vec<u32> = (1..=20).filter(|_| timer.tick(&cs)).collect();
        assert_eq!(fired, vec![5, 10, 15, 20]);
    }

    #[test]
    fn restart_reloads_full_period() {
        let cs = cs();
        let mut timer = PeriodicTimer::new(MockTimerHw::new());
        timer.start(10, &cs);
        for _ in 0..7 {
            assert!(!timer.tick(&cs));
        }
        timer.start(3, &cs);
        assert_eq!(ticks_until_fire(&mut timer, 20), Some(3));
        assert_eq!(timer.period(), 3);
    }

    #[test]
    fn zero_period_fires_every_tick() {
        let cs = cs();
        let mut timer = PeriodicTimer::new(MockTimerHw::new());
        timer.start(0, &cs);
        assert!(timer.tick(&cs));
        assert!(timer.tick(&cs));
    }

    #[test]
    fn stop_is_idempotent_and_disables_interrupt() {
        let cs = cs();
        let hw = MockTimerHw::new();
        let mut timer = PeriodicTimer::new(hw.clone());
        timer.stop(&cs);
        assert!(!hw.is_enabled());
        timer.start(2, &cs);
        assert!(hw.is_enabled());
        timer.stop(&cs);
        timer.stop(&cs);
        assert!(!hw.is_enabled());
        assert!(!timer.is_running());
        assert!(!timer.tick(&cs));
        assert!(!timer.tick(&cs));
    }

    #[test]
    fn long_phases_are_counted_in_milliseconds() {
        let cs = cs();
        let mut timer = PeriodicTimer::new(MockTimerHw::new());
        timer.start(180_000, &cs);
        assert_eq!(ticks_until_fire(&mut timer, 200_000), Some(180_000));
    }
}
