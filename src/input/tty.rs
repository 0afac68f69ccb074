//! `TtyInput`: reads raw bytes from the process's standard input on a
//! background thread and feeds them through a [`Vt100Parser`], so
//! [`Input::read_keys`] stays non-blocking from the application thread's
//! point of view.
//!
//! Covers the common POSIX-tty and Windows-virtual-terminal case (modern
//! Windows terminals run with `ENABLE_VIRTUAL_TERMINAL_INPUT`, so the same
//! ANSI byte stream applies); a native Win32 console-record backend is an
//! external collaborator this crate doesn't provide.

use std::io::Read;
use std::thread;

use crossbeam_channel::{unbounded, Receiver, Sender};
use crossterm::terminal;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::keys::KeyPress;
use crate::vt100::Vt100Parser;

use super::{Input, RawModeGuard};

/// Reads `stdin` on a dedicated thread and decodes it through a
/// [`Vt100Parser`] on the calling (application) thread.
pub struct TtyInput {
    parser: Vt100Parser,
    receiver: Receiver<String>,
    raw_mode_active: bool,
}

impl TtyInput {
    /// Spawn a background reader over `std::io::stdin()`.
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        if let Err(err) = thread::Builder::new().name("termform-tty-input".into()).spawn(move || read_loop(tx)) {
            warn!(error = %err, "failed to spawn tty input reader thread; no keys will ever arrive");
        }
        Self {
            parser: Vt100Parser::new(),
            receiver: rx,
            raw_mode_active: false,
        }
    }
}

impl Default for TtyInput {
    fn default() -> Self {
        Self::new()
    }
}

fn read_loop(tx: Sender<String>) {
    let mut stdin = std::io::stdin();
    let mut buf = [0u8; 1024];
    loop {
        match stdin.read(&mut buf) {
            Ok(0) => {
                debug!("tty input: stdin closed");
                return;
            }
            Ok(n) => {
                let chunk = String::from_utf8_lossy(&buf[..n]).into_owned();
                if tx.send(chunk).is_err() {
                    return;
                }
            }
            Err(err) => {
                warn!(error = %err, "tty input: read error, stopping reader thread");
                return;
            }
        }
    }
}

impl Input for TtyInput {
    fn read_keys(&mut self) -> Vec<KeyPress> {
        let mut events = Vec::new();
        while let Ok(chunk) = self.receiver.try_recv() {
            events.extend(self.parser.feed(&chunk));
        }
        events
    }

    fn flush_keys(&mut self) -> Vec<KeyPress> {
        self.parser.flush()
    }

    fn raw_mode(&mut self) -> Result<RawModeGuard<'_>> {
        terminal::enable_raw_mode().map_err(|e| {
            warn!(error = %e, "failed to enable raw mode");
            Error::TerminalUnavailable(e.to_string())
        })?;
        self.raw_mode_active = true;
        debug!("tty input: entered raw mode");
        let active = &mut self.raw_mode_active;
        Ok(RawModeGuard::new(move || {
            if *active {
                let _ = terminal::disable_raw_mode();
                *active = false;
            }
        }))
    }

    fn fileno(&self) -> Option<i32> {
        None
    }
}
