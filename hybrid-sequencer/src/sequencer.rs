//! IC/OP run sequencer
//!
//! A single run holds the computer in IC for `ictime`, lets it operate
//! for `optime` and halts it. A repetitive run goes straight back to IC
//! after every OP phase until it is stopped by a mode command.
//!
//! Only the phase timer advances the machine. `run` and `rep` put it into
//! `PhaseStart` and evaluate right away, `ic`, `op`, `halt` and `disable`
//! force it back to `Idle`.

use bare_metal::CriticalSection;
use ufmt::uWrite;

use crate::config::{RunConfig, RunFlags};
use crate::mode::{DeviceMode, ModeDriver};
use crate::sampler::{AnalogInputs, Sampler};
use crate::timer::{PeriodicTimer, TimerHw};

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SequencerState {
    Idle,
    PhaseStart,
    PhaseIC,
    PhaseOP,
}

impl SequencerState {
    pub fn name(&self) -> &'static str {
        match self {
            SequencerState::Idle => "Idle",
            SequencerState::PhaseStart => "PhaseStart",
            SequencerState::PhaseIC => "PhaseIC",
            SequencerState::PhaseOP => "PhaseOP",
        }
    }
}

/// the parts of the controller a transition touches
pub struct RunContext<'a, L, A, S> {
    pub config: &'a RunConfig,
    pub flags: &'a mut RunFlags,
    pub lines: &'a mut L,
    pub sampler: &'a mut Sampler<A, S>,
}

pub struct Sequencer<P> {
    state: SequencerState,
    timer: PeriodicTimer<P>,
}

impl<P: TimerHw> Sequencer<P> {
    pub fn new(timer: PeriodicTimer<P>) -> Sequencer<P> {
        Sequencer {
            state: SequencerState::Idle,
            timer,
        }
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn is_timer_running(&self) -> bool {
        self.timer.is_running()
    }

    /// begin a single or repetitive run from whatever state we are in
    pub fn begin<L, A, S, W>(
        &mut self,
        repeating: bool,
        ctx: RunContext<'_, L, A, S>,
        out: &mut W,
        cs: &CriticalSection,
    ) -> Result<(), W::Error>
    where
        L: ModeDriver,
        A: AnalogInputs,
        S: TimerHw,
        W: uWrite + ?Sized,
    {
        self.timer.stop(cs);
        ctx.sampler.stop(cs);
        ctx.flags.repeating = repeating;
        self.state = SequencerState::PhaseStart;
        self.evaluate(ctx, out, cs)
    }

    /// Stop both timers and go idle. Every way out of a run ends here,
    /// so a run that is stopped no longer counts as armed.
    pub fn stop<A, S>(&mut self, flags: &mut RunFlags, sampler: &mut Sampler<A, S>, cs: &CriticalSection)
    where
        A: AnalogInputs,
        S: TimerHw,
    {
        self.timer.stop(cs);
        sampler.stop(cs);
        flags.armed = false;
        flags.repeating = false;
        self.state = SequencerState::Idle;
    }

    /// phase timer interrupt
    pub fn tick<L, A, S, W>(
        &mut self,
        ctx: RunContext<'_, L, A, S>,
        out: &mut W,
        cs: &CriticalSection,
    ) -> Result<(), W::Error>
    where
        L: ModeDriver,
        A: AnalogInputs,
        S: TimerHw,
        W: uWrite + ?Sized,
    {
        if self.timer.tick(cs) {
            self.evaluate(ctx, out, cs)
        } else {
            Ok(())
        }
    }

    fn evaluate<L, A, S, W>(
        &mut self,
        ctx: RunContext<'_, L, A, S>,
        out: &mut W,
        cs: &CriticalSection,
    ) -> Result<(), W::Error>
    where
        L: ModeDriver,
        A: AnalogInputs,
        S: TimerHw,
        W: uWrite + ?Sized,
    {
        let RunContext {
            config,
            flags,
            lines,
            sampler,
        } = ctx;

        let mut reevaluate = true;
        while reevaluate {
            reevaluate = false;
            let next = match self.state {
                SequencerState::Idle => SequencerState::Idle,
                SequencerState::PhaseStart => {
                    lines.set_mode(DeviceMode::Ic);
                    self.timer.start(config.ic_time_ms(), cs);
                    SequencerState::PhaseIC
                }
                SequencerState::PhaseIC => {
                    self.timer.stop(cs);
                    lines.set_mode(DeviceMode::Op);
                    if !flags.repeating && flags.armed {
                        sampler.start(config.sample_interval_ms(), cs);
                    }
                    self.timer.start(config.op_time_ms(), cs);
                    SequencerState::PhaseOP
                }
                SequencerState::PhaseOP if flags.repeating => {
                    // next cycle starts now, not on the next tick
                    reevaluate = true;
                    SequencerState::PhaseStart
                }
                SequencerState::PhaseOP => {
                    self.stop(flags, sampler, cs);
                    lines.set_mode(DeviceMode::Halt);
                    ufmt::uwriteln!(out, "EOR\r")?;
                    SequencerState::Idle
                }
            };
            self.state = next;
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn timer(&self) -> &PeriodicTimer<P> {
        &self.timer
    }
}
