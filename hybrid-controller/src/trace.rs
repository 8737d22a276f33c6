//! debug output for the controller
//! These functions are only used in debug builds, every line starts
//! with '#' so host tools can skip them

use hybrid_sequencer::{SequencerState, VERSION};
use ufmt::uWrite;

pub fn send_banner<W: uWrite + ?Sized>(out: &mut W) -> Result<(), W::Error> {
    ufmt::uwriteln!(out, "\r\n# HybridController {}\r", VERSION)
}

pub fn send_transition<W: uWrite + ?Sized>(
    out: &mut W,
    previous: SequencerState,
    current: SequencerState,
) -> Result<(), W::Error> {
    ufmt::uwriteln!(out, "# {} -> {}\r", previous.name(), current.name())
}

pub fn send_dropped<W: uWrite + ?Sized>(out: &mut W, count: u16) -> Result<(), W::Error> {
    ufmt::uwriteln!(out, "# dropped {}\r", count)
}
