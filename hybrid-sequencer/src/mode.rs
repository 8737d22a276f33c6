//! control lines of the analog computer
//!
use embedded_hal::digital::v2::OutputPin;
use void::{ResultVoidExt, Void};

/// mode of the analog computer as set by the IC and OP lines
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DeviceMode {
    Ic,
    Op,
    Halt,
}

/// Anything that can put the analog computer into a mode and take over its
/// mode switching
pub trait ModeDriver {
    fn set_mode(&mut self, mode: DeviceMode);
    fn set_enabled(&mut self, enabled: bool);
}

//==========================================================

/// The three hybrid interface outputs
pub struct HybridLines<IC, OP, EN> {
    ic: IC,
    op: OP,
    enable: EN,
}

impl<IC, OP, EN> HybridLines<IC, OP, EN>
where
    IC: OutputPin<Error = Void>,
    OP: OutputPin<Error = Void>,
    EN: OutputPin<Error = Void>,
{
    /// takes the pins with hybrid mode off
    pub fn new(ic: IC, op: OP, enable: EN) -> HybridLines<IC, OP, EN> {
        let mut lines = HybridLines { ic, op, enable };
        lines.enable.set_low().void_unwrap();
        lines
    }
}

impl<IC, OP, EN> ModeDriver for HybridLines<IC, OP, EN>
where
    IC: OutputPin<Error = Void>,
    OP: OutputPin<Error = Void>,
    EN: OutputPin<Error = Void>,
{
    // assert before release, a transient between modes is then a halt
    fn set_mode(&mut self, mode: DeviceMode) {
        match mode {
            DeviceMode::Ic => {
                self.ic.set_high().void_unwrap();
                self.op.set_low().void_unwrap();
            }
            DeviceMode::Op => {
                self.op.set_high().void_unwrap();
                self.ic.set_low().void_unwrap();
            }
            DeviceMode::Halt => {
                self.ic.set_high().void_unwrap();
                self.op.set_high().void_unwrap();
            }
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        if enabled {
            self.enable.set_high().void_unwrap();
        } else {
            self.enable.set_low().void_unwrap();
        }
    }
}
