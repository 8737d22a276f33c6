//! commands of the serial protocol
//!
use ufmt::{uDisplay, uWrite, Formatter};

use crate::config::ConfigError;
use crate::line::LineError;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Command {
    Arm,
    Channels(u32),
    Disable,
    Enable,
    Halt,
    Ic,
    IcTime(u32),
    Interval(u32),
    Op,
    OpTime(u32),
    Rep,
    Run,
    Status,
    Help,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CommandError<'a> {
    Illegal(&'a str),
    MissingValue(&'static str),
    InvalidNumber(&'static str, &'a str),
    Config(ConfigError),
    Line(LineError),
}

impl From<ConfigError> for CommandError<'_> {
    fn from(e: ConfigError) -> Self {
        CommandError::Config(e)
    }
}

impl From<LineError> for CommandError<'_> {
    fn from(e: LineError) -> Self {
        CommandError::Line(e)
    }
}

impl uDisplay for CommandError<'_> {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        match self {
            CommandError::Illegal(token) => ufmt::uwrite!(f, "Illegal command >>> {}", *token),
            CommandError::MissingValue(key) => ufmt::uwrite!(f, "Missing value for {}", *key),
            CommandError::InvalidNumber(key, value) => {
                ufmt::uwrite!(f, "Invalid number for {}: {}", *key, *value)
            }
            CommandError::Config(e) => ufmt::uwrite!(f, "Error: {}", e),
            CommandError::Line(LineError::TooLong) => f.write_str("Line too long"),
            CommandError::Line(LineError::NotUtf8) => f.write_str("Invalid input"),
        }
    }
}

fn number<'a>(key: &'static str, value: Option<&'a str>) -> Result<u32, CommandError<'a>> {
    let value = value.ok_or(CommandError::MissingValue(key))?;
    value
        .parse::<u32>()
        .map_err(|_| CommandError::InvalidNumber(key, value))
}

impl Command {
    /// Keywords are case sensitive. A value given to a command that takes
    /// none is ignored.
    pub fn parse<'a>(name: &'a str, value: Option<&'a str>) -> Result<Command, CommandError<'a>> {
        let command = match name {
            "arm" => Command::Arm,
            "channels" => Command::Channels(number("channels", value)?),
            "disable" => Command::Disable,
            "enable" => Command::Enable,
            "halt" => Command::Halt,
            "help" => Command::Help,
            "ic" => Command::Ic,
            "ictime" => Command::IcTime(number("ictime", value)?),
            "interval" => Command::Interval(number("interval", value)?),
            "op" => Command::Op,
            "optime" => Command::OpTime(number("optime", value)?),
            "rep" => Command::Rep,
            "run" => Command::Run,
            "status" => Command::Status,
            _ => return Err(CommandError::Illegal(name)),
        };
        Ok(command)
    }
}

/// kept short, string literals live in sram on the avr
pub const HELP: &[&str] = &[
    "arm  log next run",
    "channels=1..4  channels to log",
    "enable|disable  hybrid mode",
    "ic|op|halt  set mode, stop run",
    "ictime=ms  IC time",
    "optime=ms  OP time",
    "interval=ms  sample interval",
    "run|rep  single/repetitive run",
    "status|help",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::TestOut;

    fn message(e: CommandError<'_>) -> String {
        let mut out = TestOut::new();
        ufmt::uwrite!(&mut out, "{}", e).unwrap();
        out.take()
    }

    #[test]
    fn keywords_without_values() {
        let cases = [
            ("arm", Command::Arm),
            ("disable", Command::Disable),
            ("enable", Command::Enable),
            ("halt", Command::Halt),
            ("help", Command::Help),
            ("ic", Command::Ic),
            ("op", Command::Op),
            ("rep", Command::Rep),
            ("run", Command::Run),
            ("status", Command::Status),
        ];
        for &(name, command) in cases.iter() {
            assert_eq!(Command::parse(name, None), Ok(command));
        }
        assert_eq!(Command::parse("run", Some("7")), Ok(Command::Run));
    }

    #[test]
    fn keywords_with_values() {
        assert_eq!(Command::parse("channels", Some("3")), Ok(Command::Channels(3)));
        assert_eq!(Command::parse("ictime", Some("50")), Ok(Command::IcTime(50)));
        assert_eq!(Command::parse("optime", Some("3000")), Ok(Command::OpTime(3000)));
        assert_eq!(Command::parse("interval", Some("0")), Ok(Command::Interval(0)));
    }

    #[test]
    fn keywords_are_case_sensitive() {
        assert_eq!(Command::parse("RUN", None), Err(CommandError::Illegal("RUN")));
        assert_eq!(message(CommandError::Illegal("RUN")), "Illegal command >>> RUN");
    }

    #[test]
    fn bad_values() {
        let e = Command::parse("ictime", None).unwrap_err();
        assert_eq!(e, CommandError::MissingValue("ictime"));
        assert_eq!(message(e), "Missing value for ictime");

        let e = Command::parse("optime", Some("-5")).unwrap_err();
        assert_eq!(e, CommandError::InvalidNumber("optime", "-5"));
        assert_eq!(message(e), "Invalid number for optime: -5");

        let e = Command::parse("channels", Some("two")).unwrap_err();
        assert_eq!(e, CommandError::InvalidNumber("channels", "two"));
    }

    #[test]
    fn config_errors_are_described() {
        assert_eq!(
            message(ConfigError::ChannelsOutOfRange(5).into()),
            "Error: channels must be 1..4, got 5"
        );
        assert_eq!(
            message(ConfigError::IntervalTooShort(0).into()),
            "Error: interval must be at least 2 ms, got 0"
        );
        assert_eq!(message(LineError::TooLong.into()), "Line too long");
    }
}
