//! `PipeInput`: an in-process input source fed by calling
//! [`PipeInput::send_bytes`]/[`PipeInput::send_text`], used by tests and by
//! programmatic control of an [`crate::application::Application`] (piping
//! synthetic keystrokes instead of reading a real terminal).

use std::sync::Mutex;

use crate::error::Result;
use crate::keys::KeyPress;
use crate::vt100::Vt100Parser;

use super::{Input, RawModeGuard};

/// A thread-safe byte sink that feeds a [`Vt100Parser`] and buffers
/// completed key presses until [`Input::read_keys`] drains them. Bytes
/// sent from any thread (e.g. a background task forwarding a remote
/// terminal) show up on the next read.
pub struct PipeInput {
    parser: Mutex<Vt100Parser>,
    buffered: Mutex<Vec<KeyPress>>,
}

impl PipeInput {
    /// A pipe with nothing buffered.
    pub fn new() -> Self {
        Self {
            parser: Mutex::new(Vt100Parser::new()),
            buffered: Mutex::new(Vec::new()),
        }
    }

    /// Feed raw bytes (already UTF-8 decoded) into the parser.
    pub fn send_bytes(&self, data: &str) {
        let events = {
            let mut parser = self.parser.lock().unwrap_or_else(|e| e.into_inner());
            parser.feed(data)
        };
        if !events.is_empty() {
            let mut buffer = self.buffered.lock().unwrap_or_else(|e| e.into_inner());
            buffer.extend(events);
        }
    }

    /// Feed plain text (equivalent to `send_bytes` with no escape
    /// sequences).
    pub fn send_text(&self, text: &str) {
        self.send_bytes(text);
    }
}

impl Default for PipeInput {
    fn default() -> Self {
        Self::new()
    }
}

impl Input for PipeInput {
    fn read_keys(&mut self) -> Vec<KeyPress> {
        std::mem::take(&mut *self.buffered.lock().unwrap_or_else(|e| e.into_inner()))
    }

    fn flush_keys(&mut self) -> Vec<KeyPress> {
        let events = {
            let mut parser = self.parser.lock().unwrap_or_else(|e| e.into_inner());
            parser.flush()
        };
        let mut buffer = self.buffered.lock().unwrap_or_else(|e| e.into_inner());
        buffer.extend(events);
        std::mem::take(&mut *buffer)
    }

    fn raw_mode(&mut self) -> Result<RawModeGuard<'_>> {
        Ok(RawModeGuard::new(|| {}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_text_produces_key_presses() {
        let mut pipe = PipeInput::new();
        pipe.send_text("ab");
        let keys = pipe.read_keys();
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn send_bytes_handles_escape_sequences() {
        let mut pipe = PipeInput::new();
        pipe.send_bytes("\x1b[A");
        let keys = pipe.read_keys();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].key, crate::keys::KeyId::Up);
    }

    #[test]
    fn read_keys_drains_the_buffer() {
        let mut pipe = PipeInput::new();
        pipe.send_text("x");
        assert_eq!(pipe.read_keys().len(), 1);
        assert_eq!(pipe.read_keys().len(), 0);
    }

    #[test]
    fn flush_resolves_pending_escape() {
        let mut pipe = PipeInput::new();
        pipe.send_bytes("\x1b");
        assert!(pipe.read_keys().is_empty());
        let flushed = pipe.flush_keys();
        assert_eq!(flushed, vec![KeyPress::new(crate::keys::KeyId::Escape, "\x1b")]);
    }
}
