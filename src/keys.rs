//! Logical key identities and the `KeyPress` event the VT100 parser emits.

/// A logical key, decoupled from any particular terminal's byte encoding.
///
/// `Any` carries a printable character. The synthetic variants
/// (`BracketedPaste`, `Vt100MouseEvent`, `CprResponse`, `WindowsMouseEvent`,
/// `Sigint`, `Ignore`) are not produced by pressing a physical key — they
/// represent higher-level events the parser or input back-end synthesizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum KeyId {
    /// A printable character; the character itself lives in `KeyPress::data`.
    Any,
    Escape,
    ControlAt,
    ControlA,
    ControlB,
    ControlC,
    ControlD,
    ControlE,
    ControlF,
    ControlG,
    ControlH,
    ControlI,
    ControlJ,
    ControlK,
    ControlL,
    ControlM,
    ControlN,
    ControlO,
    ControlP,
    ControlQ,
    ControlR,
    ControlS,
    ControlT,
    ControlU,
    ControlV,
    ControlW,
    ControlX,
    ControlY,
    ControlZ,
    ControlBackslash,
    ControlSquareClose,
    ControlCircumflex,
    ControlUnderscore,
    Backspace,
    Tab,
    Enter,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Delete,
    ShiftDelete,
    Insert,
    PageUp,
    PageDown,
    BackTab,
    ShiftUp,
    ShiftDown,
    ShiftLeft,
    ShiftRight,
    ShiftHome,
    ShiftEnd,
    ControlUp,
    ControlDown,
    ControlLeft,
    ControlRight,
    ControlHome,
    ControlEnd,
    ControlInsert,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    F13,
    F14,
    F15,
    F16,
    F17,
    F18,
    F19,
    F20,
    F21,
    F22,
    F23,
    F24,
    /// A bracketed-paste block; `data` holds the pasted text.
    BracketedPaste,
    /// A raw VT100 mouse report; `data` holds the undecoded escape body.
    Vt100MouseEvent,
    /// A raw Windows console mouse record; `data` holds an encoded body.
    WindowsMouseEvent,
    /// A cursor position report (`ESC [ <row> ; <col> R`); `data` holds the
    /// raw sequence.
    CprResponse,
    /// Ctrl-C raised as SIGINT from a platform that delivers it out of
    /// band rather than through the byte stream.
    Sigint,
    /// A key that should be silently dropped (no-op).
    Ignore,
}

/// A single decoded input event: a logical key plus the raw or
/// application-specific data that produced it.
///
/// For `KeyId::Any` `data` is the printable character (as a one-character
/// string, since combining sequences are not split apart). For synthetic
/// events (`BracketedPaste`, mouse, CPR) `data` carries the relevant payload.
/// For all other keys `data` is the exact byte sequence that was parsed,
/// which is what makes the parser's round-trip property
/// (`feed(key.data)` reproduces `key`) hold.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyPress {
    /// The logical key.
    pub key: KeyId,
    /// Associated data (see struct docs).
    pub data: String,
}

impl KeyPress {
    /// Create a new key press.
    pub fn new(key: KeyId, data: impl Into<String>) -> Self {
        Self {
            key,
            data: data.into(),
        }
    }

    /// A plain printable character key press.
    pub fn char(c: char) -> Self {
        Self::new(KeyId::Any, c.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_key_press() {
        let k = KeyPress::char('a');
        assert_eq!(k.key, KeyId::Any);
        assert_eq!(k.data, "a");
    }

    #[test]
    fn key_press_equality() {
        let a = KeyPress::new(KeyId::Enter, "\r");
        let b = KeyPress::new(KeyId::Enter, "\r");
        assert_eq!(a, b);
    }
}
