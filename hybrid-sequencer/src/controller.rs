//! the controller, owner of all run state
//!
//! Firmware keeps the one `Controller` in an interrupt mutex. The phase
//! and sample timer interrupts call `phase_tick` and `sample_tick`, the main
//! loop hands it complete input lines and calls `sample_poll`. Every entry point takes the
//! critical section token, so an interrupt can never observe a half done
//! command and a command never races a phase change.

use bare_metal::CriticalSection;
use ufmt::uWrite;

use crate::command::{Command, CommandError, HELP};
use crate::config::{ConfigError, RunConfig, RunFlags};
use crate::line::{split_command, LineError};
use crate::mode::{DeviceMode, ModeDriver};
use crate::sampler::{AnalogInputs, Sampler};
use crate::sequencer::{RunContext, Sequencer, SequencerState};
use crate::timer::{PeriodicTimer, TimerHw};
use crate::VERSION;

pub struct Controller<L, A, P, S> {
    config: RunConfig,
    flags: RunFlags,
    lines: L,
    sampler: Sampler<A, S>,
    sequencer: Sequencer<P>,
}

impl<L, A, P, S> Controller<L, A, P, S>
where
    L: ModeDriver,
    A: AnalogInputs,
    P: TimerHw,
    S: TimerHw,
{
    pub fn new(lines: L, sampler: Sampler<A, S>, phase_timer: PeriodicTimer<P>) -> Self {
        Controller {
            config: RunConfig::new(),
            flags: RunFlags::new(),
            lines,
            sampler,
            sequencer: Sequencer::new(phase_timer),
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn flags(&self) -> &RunFlags {
        &self.flags
    }

    pub fn state(&self) -> SequencerState {
        self.sequencer.state()
    }

    pub fn is_sampling(&self) -> bool {
        self.sampler.is_running()
    }

    pub fn is_phase_timer_running(&self) -> bool {
        self.sequencer.is_timer_running()
    }

    //==========================================================

    /// phase timer interrupt, once per millisecond
    pub fn phase_tick<W>(&mut self, out: &mut W, cs: &CriticalSection) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        let ctx = RunContext {
            config: &self.config,
            flags: &mut self.flags,
            lines: &mut self.lines,
            sampler: &mut self.sampler,
        };
        self.sequencer.tick(ctx, out, cs)
    }

    /// sample timer interrupt, once per millisecond
    pub fn sample_tick<W>(&mut self, out: &mut W, cs: &CriticalSection) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        self.sampler.tick(self.config.channels(), out, cs)
    }

    /// main loop, collects the conversions the sample interrupt started
    pub fn sample_poll<W>(&mut self, out: &mut W, _cs: &CriticalSection) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        self.sampler.poll(out)
    }

    //==========================================================

    /// a line from the serial port, or why it could not be read
    pub fn handle_input<W>(
        &mut self,
        line: Result<&str, LineError>,
        out: &mut W,
        cs: &CriticalSection,
    ) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        let line = match line {
            Ok(line) => line,
            Err(e) => return report(out, e.into()),
        };
        let (name, value) = match split_command(line) {
            Some(tokens) => tokens,
            None => return Ok(()),
        };
        match Command::parse(name, value) {
            Ok(command) => self.execute(command, out, cs),
            Err(e) => report(out, e),
        }
    }

    pub fn execute<W>(&mut self, command: Command, out: &mut W, cs: &CriticalSection) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        match command {
            Command::Arm => {
                self.flags.armed = true;
                ufmt::uwriteln!(out, "armed=1\r")
            }
            Command::Channels(n) => setting(out, "channels", self.config.set_channels(n).map(|()| n)),
            Command::IcTime(ms) => setting(out, "ictime", self.config.set_ic_time_ms(ms).map(|()| ms)),
            Command::OpTime(ms) => setting(out, "optime", self.config.set_op_time_ms(ms).map(|()| ms)),
            Command::Interval(ms) => setting(
                out,
                "interval",
                self.config.set_sample_interval_ms(ms).map(|()| ms),
            ),
            Command::Enable => {
                self.lines.set_mode(DeviceMode::Ic);
                self.lines.set_enabled(true);
                Ok(())
            }
            Command::Disable => {
                self.sequencer.stop(&mut self.flags, &mut self.sampler, cs);
                self.lines.set_enabled(false);
                Ok(())
            }
            Command::Ic => {
                self.force_mode(DeviceMode::Ic, cs);
                Ok(())
            }
            Command::Op => {
                self.force_mode(DeviceMode::Op, cs);
                Ok(())
            }
            Command::Halt => {
                self.force_mode(DeviceMode::Halt, cs);
                Ok(())
            }
            Command::Run => self.begin(false, out, cs),
            Command::Rep => self.begin(true, out, cs),
            Command::Status => self.status(out),
            Command::Help => {
                for line in HELP {
                    ufmt::uwriteln!(out, "{}\r", *line)?;
                }
                Ok(())
            }
        }
    }

    /// interrupts any run
    fn force_mode(&mut self, mode: DeviceMode, cs: &CriticalSection) {
        self.sequencer.stop(&mut self.flags, &mut self.sampler, cs);
        self.lines.set_mode(mode);
    }

    fn begin<W>(&mut self, repeating: bool, out: &mut W, cs: &CriticalSection) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        let ctx = RunContext {
            config: &self.config,
            flags: &mut self.flags,
            lines: &mut self.lines,
            sampler: &mut self.sampler,
        };
        self.sequencer.begin(repeating, ctx, out, cs)
    }

    // repeating is not reported, existing host tools parse this line
    fn status<W>(&self, out: &mut W) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        let armed: u8 = if self.flags.armed { 1 } else { 0 };
        ufmt::uwriteln!(
            out,
            "version={},optime={},ictime={},channels={},armed={},interval={}\r",
            VERSION,
            self.config.op_time_ms(),
            self.config.ic_time_ms(),
            self.config.channels(),
            armed,
            self.config.sample_interval_ms()
        )
    }
}

fn setting<W>(out: &mut W, key: &str, result: Result<u32, ConfigError>) -> Result<(), W::Error>
where
    W: uWrite + ?Sized,
{
    match result {
        Ok(value) => ufmt::uwriteln!(out, "{}={}\r", key, value),
        Err(e) => report(out, e.into()),
    }
}

fn report<W>(out: &mut W, e: CommandError<'_>) -> Result<(), W::Error>
where
    W: uWrite + ?Sized,
{
    ufmt::uwriteln!(out, "{}\r", e)
}
