//! tunable run parameters and run flags

use ufmt::{uDisplay, uWrite, Formatter};

/// number of analog inputs wired to the sampler
pub const MAX_CHANNELS: u8 = 4;

/// shortest sample interval. A four channel record is 22 bytes, about 1.9ms
/// on the wire at 115200 baud, its conversions take about 0.45ms. Records
/// the usart can not keep up with are dropped whole.
pub const MIN_SAMPLE_INTERVAL_MS: u32 = 2;

pub const DEFAULT_IC_TIME_MS: u32 = 10;
pub const DEFAULT_OP_TIME_MS: u32 = 20;
pub const DEFAULT_SAMPLE_INTERVAL_MS: u32 = 10;
pub const DEFAULT_CHANNELS: u8 = 1;

//==========================================================

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ConfigError {
    ChannelsOutOfRange(u32),
    IntervalTooShort(u32),
    ZeroDuration(&'static str),
}

impl uDisplay for ConfigError {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        match self {
            ConfigError::ChannelsOutOfRange(n) => {
                ufmt::uwrite!(f, "channels must be 1..{}, got {}", MAX_CHANNELS, *n)
            }
            ConfigError::IntervalTooShort(n) => ufmt::uwrite!(
                f,
                "interval must be at least {} ms, got {}",
                MIN_SAMPLE_INTERVAL_MS,
                *n
            ),
            ConfigError::ZeroDuration(key) => ufmt::uwrite!(f, "{} must be positive", *key),
        }
    }
}

//==========================================================

/// Phase durations and sampling setup, changed only by the setters below
/// so the invariants always hold
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RunConfig {
    ic_time_ms: u32,
    op_time_ms: u32,
    sample_interval_ms: u32,
    channels: u8,
}

impl RunConfig {
    pub const fn new() -> RunConfig {
        RunConfig {
            ic_time_ms: DEFAULT_IC_TIME_MS,
            op_time_ms: DEFAULT_OP_TIME_MS,
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL_MS,
            channels: DEFAULT_CHANNELS,
        }
    }

    pub fn ic_time_ms(&self) -> u32 {
        self.ic_time_ms
    }

    pub fn op_time_ms(&self) -> u32 {
        self.op_time_ms
    }

    pub fn sample_interval_ms(&self) -> u32 {
        self.sample_interval_ms
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn set_ic_time_ms(&mut self, ms: u32) -> Result<(), ConfigError> {
        if ms == 0 {
            return Err(ConfigError::ZeroDuration("ictime"));
        }
        self.ic_time_ms = ms;
        Ok(())
    }

    pub fn set_op_time_ms(&mut self, ms: u32) -> Result<(), ConfigError> {
        if ms == 0 {
            return Err(ConfigError::ZeroDuration("optime"));
        }
        self.op_time_ms = ms;
        Ok(())
    }

    pub fn set_sample_interval_ms(&mut self, ms: u32) -> Result<(), ConfigError> {
        if ms < MIN_SAMPLE_INTERVAL_MS {
            return Err(ConfigError::IntervalTooShort(ms));
        }
        self.sample_interval_ms = ms;
        Ok(())
    }

    pub fn set_channels(&mut self, n: u32) -> Result<(), ConfigError> {
        if n == 0 || n > MAX_CHANNELS as u32 {
            return Err(ConfigError::ChannelsOutOfRange(n));
        }
        self.channels = n as u8;
        Ok(())
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig::new()
    }
}

//==========================================================

/// `armed` logs the next single run and is cleared when any run ends,
/// `repeating` cycles IC/OP until stopped
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RunFlags {
    pub repeating: bool,
    pub armed: bool,
}

impl RunFlags {
    pub const fn new() -> RunFlags {
        RunFlags {
            repeating: false,
            armed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_satisfy_limits() {
        let cfg = RunConfig::default();
        assert!(cfg.ic_time_ms() > 0);
        assert!(cfg.op_time_ms() > 0);
        assert!(cfg.sample_interval_ms() >= MIN_SAMPLE_INTERVAL_MS);
        assert!((1..=MAX_CHANNELS).contains(&cfg.channels()));
    }

    #[test]
    fn channels_outside_range_are_rejected() {
        let mut cfg = RunConfig::new();
        cfg.set_channels(3).unwrap();
        assert_eq!(cfg.set_channels(5), Err(ConfigError::ChannelsOutOfRange(5)));
        assert_eq!(cfg.set_channels(0), Err(ConfigError::ChannelsOutOfRange(0)));
        assert_eq!(cfg.channels(), 3);
    }

    #[test]
    fn interval_below_floor_keeps_previous_value() {
        let mut cfg = RunConfig::new();
        cfg.set_sample_interval_ms(5).unwrap();
        assert_eq!(
            cfg.set_sample_interval_ms(0),
            Err(ConfigError::IntervalTooShort(0))
        );
        assert_eq!(cfg.set_sample_interval_ms(1), Err(ConfigError::IntervalTooShort(1)));
        assert_eq!(cfg.sample_interval_ms(), 5);
        cfg.set_sample_interval_ms(MIN_SAMPLE_INTERVAL_MS).unwrap();
        assert_eq!(cfg.sample_interval_ms(), MIN_SAMPLE_INTERVAL_MS);
    }

    #[test]
    fn zero_phase_durations_are_rejected() {
        let mut cfg = RunConfig::new();
        assert_eq!(cfg.set_ic_time_ms(0), Err(ConfigError::ZeroDuration("ictime")));
        assert_eq!(cfg.set_op_time_ms(0), Err(ConfigError::ZeroDuration("optime")));
        cfg.set_ic_time_ms(50).unwrap();
        cfg.set_op_time_ms(180_000).unwrap();
        assert_eq!(cfg.ic_time_ms(), 50);
        assert_eq!(cfg.op_time_ms(), 180_000);
    }
}
