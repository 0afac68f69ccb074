//! `Output`: the terminal-writing side of the toolkit, decoupled from any
//! particular backend so rendering can be tested without a real tty.

use crate::error::Result;
use crate::primitives::Point;
use crate::screen::Screen;

/// How many colors the terminal can display, used to decide how to encode
/// a [`crate::style::Style`] into actual escape sequences. Negotiating a
/// terminal's *kind* or multiplexer (tmux, screen) is out of scope here —
/// only this coarse color-depth signal is carried.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ColorSupport {
    /// No color; styles affect only bold/underline-style attributes, if
    /// even those.
    Monochrome,
    /// The 16 standard ANSI colors.
    Ansi16,
    /// The 256-color indexed palette.
    Indexed256,
    /// 24-bit RGB ("true color").
    TrueColor,
}

/// A terminal output sink: writes a rendered [`Screen`] and controls
/// cursor/mode state around it.
pub trait Output: Send {
    /// Write the full contents of `screen`, replacing whatever was
    /// previously displayed. A real backend is expected to diff against
    /// the last frame and only emit the bytes needed to update changed
    /// cells; this trait only specifies the observable result.
    fn render(&mut self, screen: &Screen) -> Result<()>;

    /// Move the terminal cursor to `point` (screen-absolute coordinates).
    fn set_cursor_position(&mut self, point: Point) -> Result<()>;

    /// Show or hide the terminal cursor.
    fn set_cursor_visible(&mut self, visible: bool) -> Result<()>;

    /// Enter the alternate screen buffer (full-screen applications use
    /// this so exiting restores the user's scrollback).
    fn enter_alternate_screen(&mut self) -> Result<()>;

    /// Leave the alternate screen buffer.
    fn leave_alternate_screen(&mut self) -> Result<()>;

    /// Flush any buffered writes to the underlying transport.
    fn flush(&mut self) -> Result<()>;

    /// The terminal's negotiated color depth.
    fn color_support(&self) -> ColorSupport;

    /// The output's current size in columns/rows, if known.
    fn size(&self) -> Option<crate::primitives::Size> {
        None
    }
}
