//! VT100/ANSI escape-sequence parser: turns a stream of terminal bytes into
//! [`KeyPress`] events.
//!
//! The parser is a byte-level (here, character-level, since the input is
//! already UTF-8 decoded) state machine with explicit suspension points —
//! [`Vt100Parser::feed`] may leave a sequence incomplete, and
//! [`Vt100Parser::flush`] is the caller's signal that no more bytes are
//! coming soon, so any buffered partial sequence should be resolved to
//! literal key presses (this is how a bare `ESC` is told apart from the
//! start of `ESC O P` / F1: the application loop calls `flush` after an
//! inter-key timeout, see [`crate::application`]).

use crate::keys::{KeyId, KeyPress};
use tracing::{trace, warn};

/// Bound on how many bytes an incomplete escape sequence may accumulate
/// before the parser gives up and flushes it as literal keys. This can
/// never be a fatal error — it is a forced flush.
const MAX_PENDING_BYTES: usize = 256;

const PASTE_TERMINATOR: &[char] = &['\x1b', '[', '2', '0', '1', '~'];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Ground,
    Escape,
    Ss3,
    CsiEntry,
    CsiParam,
    CsiIntermediate,
    OscString,
    SosPmApcString,
    BracketedPaste,
}

/// A VT100/ANSI escape-sequence parser.
///
/// Not thread-safe and not meant to be: it is driven exclusively by the
/// single-threaded input-reading path (spec's "no internal locking").
pub struct Vt100Parser {
    state: State,
    /// Raw characters accumulated since the state left `Ground`, including
    /// the triggering `ESC`. Replayed as literal keys on flush/overflow.
    pending: String,
    pending_bytes: usize,
    csi_params: String,
    paste_buffer: String,
    paste_match: usize,
    events: Vec<KeyPress>,
}

impl Vt100Parser {
    /// Create a new parser in the `Ground` state.
    pub fn new() -> Self {
        Self {
            state: State::Ground,
            pending: String::new(),
            pending_bytes: 0,
            csi_params: String::new(),
            paste_buffer: String::new(),
            paste_match: 0,
            events: Vec::new(),
        }
    }

    /// Feed decoded characters into the parser, returning every
    /// [`KeyPress`] completed as a result.
    pub fn feed(&mut self, data: &str) -> Vec<KeyPress> {
        for c in data.chars() {
            self.feed_char(c);
        }
        std::mem::take(&mut self.events)
    }

    /// Feed then immediately flush, for convenience.
    pub fn feed_and_flush(&mut self, data: &str) -> Vec<KeyPress> {
        let mut events = self.feed(data);
        events.extend(self.flush());
        events
    }

    /// Force emission of any buffered partial sequence as literal keys.
    /// Critical for disambiguating a bare `ESC` from the start of a CSI
    /// sequence: callers invoke this after an inter-key timeout.
    ///
    /// A no-op while inside bracketed paste, OSC, or DCS/SOS/PM/APC
    /// strings — those have no "literal" fallback and simply keep
    /// accumulating until [`Self::reset`].
    pub fn flush(&mut self) -> Vec<KeyPress> {
        match self.state {
            State::Escape | State::Ss3 | State::CsiEntry | State::CsiParam | State::CsiIntermediate => {
                self.emit_pending_as_literal();
            }
            State::Ground | State::OscString | State::SosPmApcString | State::BracketedPaste => {}
        }
        std::mem::take(&mut self.events)
    }

    /// Discard all partial state and return to `Ground`.
    ///
    /// `drop_cpr_waiters` is accepted for interface parity with spec §4.1
    /// but is a no-op here: cursor-position-report waiter bookkeeping is
    /// owned by the `Input` abstraction (§4.2), not the byte-level parser.
    pub fn reset(&mut self, drop_cpr_waiters: bool) {
        let _ = drop_cpr_waiters;
        self.state = State::Ground;
        self.pending.clear();
        self.pending_bytes = 0;
        self.csi_params.clear();
        self.paste_buffer.clear();
        self.paste_match = 0;
        self.events.clear();
    }

    fn push_pending(&mut self, c: char) {
        self.pending.push(c);
        self.pending_bytes += c.len_utf8();
        if self.pending_bytes > MAX_PENDING_BYTES {
            warn!(bytes = self.pending_bytes, "vt100 parser: incomplete sequence overflow, flushing as literal");
            self.emit_pending_as_literal();
        }
    }

    fn emit(&mut self, key: KeyId, data: impl Into<String>) {
        self.events.push(KeyPress::new(key, data));
    }

    /// Classify and emit a single `Ground`-state character: a control byte
    /// maps to its `ControlX` key, everything else is `Any`.
    fn emit_ground_char(&mut self, c: char) {
        if let Some(key) = control_key(c) {
            self.emit(key, c.to_string());
        } else {
            self.emit(KeyId::Any, c.to_string());
        }
    }

    /// Replay the buffered `pending` string as literal `Ground` key
    /// presses: the initiating `ESC` becomes `KeyId::Escape`, everything
    /// after is classified the same way a `Ground`-state byte would be.
    fn emit_pending_as_literal(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        let mut chars = pending.chars();
        if let Some(first) = chars.next() {
            debug_assert_eq!(first, '\x1b');
            self.emit(KeyId::Escape, "\x1b");
        }
        for c in chars {
            self.emit_ground_char(c);
        }
        self.pending.clear();
        self.pending_bytes = 0;
        self.csi_params.clear();
        self.state = State::Ground;
    }

    fn feed_char(&mut self, c: char) {
        match self.state {
            State::Ground => self.feed_ground(c),
            State::Escape => self.feed_escape(c),
            State::Ss3 => self.feed_ss3(c),
            State::CsiEntry | State::CsiParam | State::CsiIntermediate => self.feed_csi(c),
            State::OscString => self.feed_osc(c),
            State::SosPmApcString => self.feed_sos_pm_apc(c),
            State::BracketedPaste => self.feed_paste(c),
        }
    }

    fn feed_ground(&mut self, c: char) {
        if c == '\x1b' {
            self.state = State::Escape;
            self.push_pending(c);
            return;
        }
        self.emit_ground_char(c);
    }

    fn feed_escape(&mut self, c: char) {
        self.push_pending(c);
        match c {
            '[' => {
                self.state = State::CsiEntry;
                self.csi_params.clear();
            }
            'O' => self.state = State::Ss3,
            ']' => self.state = State::OscString,
            'P' | 'X' | '^' | '_' => self.state = State::SosPmApcString,
            _ => {
                // Not a recognized escape introducer: emit Escape, then
                // reprocess this character as a fresh Ground character.
                self.pending.pop();
                self.pending_bytes -= c.len_utf8();
                self.emit(KeyId::Escape, "\x1b");
                self.pending.clear();
                self.pending_bytes = 0;
                self.state = State::Ground;
                self.feed_ground(c);
            }
        }
    }

    fn feed_ss3(&mut self, c: char) {
        self.push_pending(c);
        let key = match c {
            'P' => Some(KeyId::F1),
            'Q' => Some(KeyId::F2),
            'R' => Some(KeyId::F3),
            'S' => Some(KeyId::F4),
            _ => None,
        };
        if let Some(key) = key {
            let data = std::mem::take(&mut self.pending);
            self.pending_bytes = 0;
            self.state = State::Ground;
            self.emit(key, data);
        } else {
            self.emit_pending_as_literal();
        }
    }

    fn feed_csi(&mut self, c: char) {
        self.push_pending(c);
        let is_final = ('\u{40}'..='\u{7e}').contains(&c);
        if !is_final {
            self.csi_params.push(c);
            self.state = if c.is_ascii_digit() || c == ';' || c == '<' || c == '?' {
                State::CsiParam
            } else {
                State::CsiIntermediate
            };
            return;
        }
        self.dispatch_csi_final(c);
    }

    fn dispatch_csi_final(&mut self, final_byte: char) {
        let params = std::mem::take(&mut self.csi_params);
        let raw = std::mem::take(&mut self.pending);
        self.pending_bytes = 0;
        self.state = State::Ground;

        // Bracketed paste begin.
        if params == "200" && final_byte == '~' {
            self.state = State::BracketedPaste;
            self.paste_buffer.clear();
            self.paste_match = 0;
            return;
        }

        // SGR mouse: "<b;x;yM" / "<b;x;ym".
        if let Some(body) = params.strip_prefix('<') {
            if (final_byte == 'M' || final_byte == 'm') && body.split(';').count() == 3 {
                self.emit(KeyId::Vt100MouseEvent, raw);
                return;
            }
        }

        // urxvt mouse: plain "b;x;yM" (three numeric params, no '<').
        if final_byte == 'M'
            && !params.is_empty()
            && params.split(';').all(|p| p.chars().all(|c| c.is_ascii_digit()))
            && params.split(';').count() == 3
        {
            self.emit(KeyId::Vt100MouseEvent, raw);
            return;
        }

        // CPR: "<row>;<col>R".
        if final_byte == 'R'
            && params.split(';').count() == 2
            && params.split(';').all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
        {
            self.emit(KeyId::CprResponse, raw);
            return;
        }

        if let Some(key) = lookup_csi_key(&params, final_byte) {
            self.emit(key, raw);
            return;
        }

        trace!(params = %params, final_byte = %final_byte, "vt100 parser: unrecognized CSI sequence, degrading to literal");
        self.pending = raw;
        self.pending_bytes = self.pending.chars().map(char::len_utf8).sum();
        self.emit_pending_as_literal();
    }

    fn feed_osc(&mut self, c: char) {
        self.push_pending(c);
        if c == '\u{7}' {
            self.finish_string_sequence();
            return;
        }
        if self.pending.ends_with("\x1b\\") {
            self.finish_string_sequence();
        }
    }

    fn feed_sos_pm_apc(&mut self, c: char) {
        self.push_pending(c);
        if self.pending.ends_with("\x1b\\") {
            self.finish_string_sequence();
        }
    }

    fn finish_string_sequence(&mut self) {
        self.pending.clear();
        self.pending_bytes = 0;
        self.state = State::Ground;
    }

    fn feed_paste(&mut self, c: char) {
        let expected = PASTE_TERMINATOR[self.paste_match];
        if c == expected {
            self.paste_match += 1;
            if self.paste_match == PASTE_TERMINATOR.len() {
                let data = std::mem::take(&mut self.paste_buffer);
                self.paste_match = 0;
                self.state = State::Ground;
                self.emit(KeyId::BracketedPaste, data);
            }
            return;
        }
        // Partial terminator match broke: the speculative prefix was
        // literal paste content, not the start of the real terminator.
        if self.paste_match > 0 {
            for term_c in &PASTE_TERMINATOR[..self.paste_match] {
                self.paste_buffer.push(*term_c);
            }
            self.paste_match = 0;
        }
        // The breaking character might itself start a fresh terminator
        // attempt (e.g. two ESCs in a row inside the pasted text).
        if c == PASTE_TERMINATOR[0] {
            self.paste_match = 1;
        } else {
            self.paste_buffer.push(c);
        }
    }
}

impl Default for Vt100Parser {
    fn default() -> Self {
        Self::new()
    }
}

fn control_key(c: char) -> Option<KeyId> {
    let b = c as u32;
    Some(match b {
        0x00 => KeyId::ControlAt,
        0x01 => KeyId::ControlA,
        0x02 => KeyId::ControlB,
        0x03 => KeyId::ControlC,
        0x04 => KeyId::ControlD,
        0x05 => KeyId::ControlE,
        0x06 => KeyId::ControlF,
        0x07 => KeyId::ControlG,
        0x08 => KeyId::ControlH,
        0x09 => KeyId::Tab,
        0x0a => KeyId::ControlJ,
        0x0b => KeyId::ControlK,
        0x0c => KeyId::ControlL,
        0x0d => KeyId::Enter,
        0x0e => KeyId::ControlN,
        0x0f => KeyId::ControlO,
        0x10 => KeyId::ControlP,
        0x11 => KeyId::ControlQ,
        0x12 => KeyId::ControlR,
        0x13 => KeyId::ControlS,
        0x14 => KeyId::ControlT,
        0x15 => KeyId::ControlU,
        0x16 => KeyId::ControlV,
        0x17 => KeyId::ControlW,
        0x18 => KeyId::ControlX,
        0x19 => KeyId::ControlY,
        0x1a => KeyId::ControlZ,
        0x1c => KeyId::ControlBackslash,
        0x1d => KeyId::ControlSquareClose,
        0x1e => KeyId::ControlCircumflex,
        0x1f => KeyId::ControlUnderscore,
        0x7f => KeyId::Backspace,
        _ => return None,
    })
}

/// Known CSI `(params, final_byte)` combinations from spec §6.3, including
/// the `1;n` modifier convention (`2`=Shift, `3`=Alt, `4`=Shift+Alt,
/// `5`=Ctrl, `6`=Shift+Ctrl, `7`=Alt+Ctrl, `8`=Shift+Alt+Ctrl). Modifier
/// combinations this crate has no dedicated `KeyId` for fall back to the
/// unmodified key rather than degrading to literal — see DESIGN.md.
fn lookup_csi_key(params: &str, final_byte: char) -> Option<KeyId> {
    if params.is_empty() {
        return match final_byte {
            'A' => Some(KeyId::Up),
            'B' => Some(KeyId::Down),
            'C' => Some(KeyId::Right),
            'D' => Some(KeyId::Left),
            'H' => Some(KeyId::Home),
            'F' => Some(KeyId::End),
            'Z' => Some(KeyId::BackTab),
            _ => None,
        };
    }

    if let Some(rest) = params.strip_prefix("1;") {
        let modifier: u8 = rest.parse().ok()?;
        let base = match final_byte {
            'A' => Direction::Up,
            'B' => Direction::Down,
            'C' => Direction::Right,
            'D' => Direction::Left,
            'H' => Direction::Home,
            'F' => Direction::End,
            _ => return None,
        };
        return Some(modified_direction_key(base, modifier));
    }

    let code: u32 = params.parse().ok()?;
    if final_byte != '~' {
        return None;
    }
    match code {
        2 => Some(KeyId::Insert),
        3 => Some(KeyId::Delete),
        5 => Some(KeyId::PageUp),
        6 => Some(KeyId::PageDown),
        15 => Some(KeyId::F5),
        17 => Some(KeyId::F6),
        18 => Some(KeyId::F7),
        19 => Some(KeyId::F8),
        20 => Some(KeyId::F9),
        21 => Some(KeyId::F10),
        23 => Some(KeyId::F11),
        24 => Some(KeyId::F12),
        _ => None,
    }
}

enum Direction {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
}

/// Modifier 2=Shift, 5=Ctrl have dedicated `KeyId`s for arrow/Home/End;
/// other modifier values (Alt, and multi-modifier combos) fall back to the
/// unmodified direction.
fn modified_direction_key(dir: Direction, modifier: u8) -> KeyId {
    use Direction::*;
    match (modifier, dir) {
        (2, Up) => KeyId::ShiftUp,
        (2, Down) => KeyId::ShiftDown,
        (2, Left) => KeyId::ShiftLeft,
        (2, Right) => KeyId::ShiftRight,
        (2, Home) => KeyId::ShiftHome,
        (2, End) => KeyId::ShiftEnd,
        (5, Up) => KeyId::ControlUp,
        (5, Down) => KeyId::ControlDown,
        (5, Left) => KeyId::ControlLeft,
        (5, Right) => KeyId::ControlRight,
        (5, Home) => KeyId::ControlHome,
        (5, End) => KeyId::ControlEnd,
        (_, Up) => KeyId::Up,
        (_, Down) => KeyId::Down,
        (_, Left) => KeyId::Left,
        (_, Right) => KeyId::Right,
        (_, Home) => KeyId::Home,
        (_, End) => KeyId::End,
    }
}
