//! `Input`: the source of key presses, decoupled from any particular
//! terminal or transport so tests can drive an application with
//! synthetic keys.

pub mod dummy;
pub mod pipe;
pub mod tty;

use crate::error::Result;
use crate::keys::KeyPress;

/// A source of decoded key presses.
///
/// Implementations are expected to be non-blocking: [`Input::read_keys`]
/// returns whatever is immediately available (possibly nothing), and the
/// application loop is responsible for waiting (via a poll/select on
/// [`Input::fileno`], or a channel recv for in-process sources) between
/// calls.
pub trait Input: Send {
    /// Drain and return whatever complete key presses are currently
    /// buffered.
    fn read_keys(&mut self) -> Vec<KeyPress>;

    /// Force resolution of any ambiguous pending escape sequence (see
    /// [`crate::vt100::Vt100Parser::flush`]), returning newly completed
    /// key presses.
    fn flush_keys(&mut self) -> Vec<KeyPress>;

    /// Enter raw mode (no line buffering, no echo) for the duration this
    /// guard is held. Returns an error if the underlying terminal can't
    /// be put into raw mode.
    fn raw_mode(&mut self) -> Result<RawModeGuard<'_>>;

    /// A platform file descriptor/handle usable for readiness polling, if
    /// this input is backed by one (pipe- or channel-based inputs return
    /// `None`).
    fn fileno(&self) -> Option<i32> {
        None
    }

    /// A hash of any bytes already buffered but not yet consumed, used to
    /// detect whether typeahead exists before switching input sources.
    fn typeahead_hash(&self) -> u64 {
        0
    }

    /// Release any OS-level resources (restoring terminal mode if
    /// needed). Called once, on shutdown.
    fn close(&mut self) {}
}

/// RAII guard restoring cooked (line-buffered) mode when dropped.
///
/// Holds a closure rather than a direct terminal handle so every `Input`
/// implementation can provide its own restoration logic without a shared
/// base type.
pub struct RawModeGuard<'a> {
    restore: Box<dyn FnMut() + 'a>,
}

impl<'a> RawModeGuard<'a> {
    /// Wrap a restoration closure, run once when the guard drops.
    pub fn new(restore: impl FnMut() + 'a) -> Self {
        Self {
            restore: Box::new(restore),
        }
    }
}

impl Drop for RawModeGuard<'_> {
    fn drop(&mut self) {
        (self.restore)();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn raw_mode_guard_restores_on_drop() {
        let restored = AtomicBool::new(false);
        {
            let _guard = RawModeGuard::new(|| restored.store(true, Ordering::SeqCst));
            assert!(!restored.load(Ordering::SeqCst));
        }
        assert!(restored.load(Ordering::SeqCst));
    }
}
