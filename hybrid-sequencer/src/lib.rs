//! Run sequencer for a hybrid analog computer controller
//!
//! Drives the IC/OP mode lines of an analog computer from two periodic
//! timers, samples analog outputs during armed single runs, and interprets
//! the line oriented command protocol read from the serial port.
//!
//! Everything here is hardware independent. The firmware supplies the pins,
//! timers and adc through [`ModeDriver`], [`TimerHw`] and [`AnalogInputs`],
//! keeps the [`Controller`] in an interrupt mutex and calls into it from the
//! timer interrupts and the foreground loop.

#![cfg_attr(not(test), no_std)]

pub mod command;
pub mod config;
pub mod controller;
pub mod line;
pub mod mode;
pub mod output;
pub mod sampler;
pub mod sequencer;
pub mod timer;

pub use bare_metal::CriticalSection;

pub use crate::command::{Command, CommandError};
pub use crate::config::{ConfigError, RunConfig, RunFlags};
pub use crate::controller::Controller;
pub use crate::line::{split_command, LineBuffer};
pub use crate::mode::{DeviceMode, HybridLines, ModeDriver};
pub use crate::output::OutputQueue;
pub use crate::sampler::{AnalogInputs, Sampler};
pub use crate::sequencer::{Sequencer, SequencerState};
pub use crate::timer::{PeriodicTimer, TimerHw};

/// firmware version reported by `status`
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
pub(crate) mod mock;
