//! `DummyInput`: an input source that never produces a key, used as the
//! default before an application attaches a real terminal or pipe.

use crate::error::Result;
use crate::keys::KeyPress;

use super::{Input, RawModeGuard};

/// Never yields any key presses and accepts raw-mode requests as no-ops.
pub struct DummyInput;

impl DummyInput {
    /// A source producing nothing.
    pub fn new() -> Self {
        Self
    }
}

impl Default for DummyInput {
    fn default() -> Self {
        Self::new()
    }
}

impl Input for DummyInput {
    fn read_keys(&mut self) -> Vec<KeyPress> {
        Vec::new()
    }

    fn flush_keys(&mut self) -> Vec<KeyPress> {
        Vec::new()
    }

    fn raw_mode(&mut self) -> Result<RawModeGuard<'_>> {
        Ok(RawModeGuard::new(|| {}))
    }
}
