//! [`Output`] implementations with no real terminal behind them: used by
//! unit/integration tests and by headless embedding of the toolkit.

use std::sync::Mutex;

use crate::error::Result;
use crate::output::{ColorSupport, Output};
use crate::primitives::{Point, Size};
use crate::screen::Screen;

/// Captures the most recently rendered frame as plain text plus the last
/// cursor position, for assertions in tests (commonly paired with
/// `insta` snapshots of [`TestBackend::last_frame`]).
pub struct TestBackend {
    size: Size,
    last_frame: Mutex<String>,
    cursor: Mutex<Option<Point>>,
    cursor_visible: Mutex<bool>,
    color_support: ColorSupport,
}

impl TestBackend {
    /// A fixed-size virtual terminal.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            last_frame: Mutex::new(String::new()),
            cursor: Mutex::new(None),
            cursor_visible: Mutex::new(true),
            color_support: ColorSupport::TrueColor,
        }
    }

    /// Use a specific color depth instead of the default `TrueColor`.
    #[must_use]
    pub fn with_color_support(mut self, color_support: ColorSupport) -> Self {
        self.color_support = color_support;
        self
    }

    /// The text of the last rendered frame, one line per row.
    pub fn last_frame(&self) -> String {
        self.last_frame.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// The last cursor position set via [`Output::set_cursor_position`].
    pub fn cursor_position(&self) -> Option<Point> {
        *self.cursor.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Whether the cursor is currently marked visible.
    pub fn cursor_visible(&self) -> bool {
        *self.cursor_visible.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Output for TestBackend {
    fn render(&mut self, screen: &Screen) -> Result<()> {
        let mut frame = String::new();
        for y in 0..screen.height() {
            for x in 0..screen.width() {
                frame.push_str(screen.get_char(Point::new(x, y)).display());
            }
            if y + 1 < screen.height() {
                frame.push('\n');
            }
        }
        *self.last_frame.lock().unwrap_or_else(|e| e.into_inner()) = frame;
        Ok(())
    }

    fn set_cursor_position(&mut self, point: Point) -> Result<()> {
        *self.cursor.lock().unwrap_or_else(|e| e.into_inner()) = Some(point);
        Ok(())
    }

    fn set_cursor_visible(&mut self, visible: bool) -> Result<()> {
        *self.cursor_visible.lock().unwrap_or_else(|e| e.into_inner()) = visible;
        Ok(())
    }

    fn enter_alternate_screen(&mut self) -> Result<()> {
        Ok(())
    }

    fn leave_alternate_screen(&mut self) -> Result<()> {
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn color_support(&self) -> ColorSupport {
        self.color_support
    }

    fn size(&self) -> Option<Size> {
        Some(self.size)
    }
}

/// Captures raw bytes written to it, as if piped to a file, without any
/// cursor or screen-diffing behavior. Used to test that a higher layer
/// emits the exact escape sequences it claims to.
pub struct PipeOutput {
    buffer: Mutex<Vec<u8>>,
    color_support: ColorSupport,
}

impl PipeOutput {
    /// An output accumulating raw bytes in memory.
    pub fn new() -> Self {
        Self {
            buffer: Mutex::new(Vec::new()),
            color_support: ColorSupport::Ansi16,
        }
    }

    /// Everything written so far, as a lossy UTF-8 string.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().unwrap_or_else(|e| e.into_inner())).into_owned()
    }
}

impl Default for PipeOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl Output for PipeOutput {
    fn render(&mut self, screen: &Screen) -> Result<()> {
        let mut buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        for y in 0..screen.height() {
            for x in 0..screen.width() {
                buffer.extend_from_slice(screen.get_char(Point::new(x, y)).display().as_bytes());
            }
            buffer.push(b'\n');
        }
        Ok(())
    }

    fn set_cursor_position(&mut self, _point: Point) -> Result<()> {
        Ok(())
    }

    fn set_cursor_visible(&mut self, _visible: bool) -> Result<()> {
        Ok(())
    }

    fn enter_alternate_screen(&mut self) -> Result<()> {
        Ok(())
    }

    fn leave_alternate_screen(&mut self) -> Result<()> {
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn color_support(&self) -> ColorSupport {
        self.color_support
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_captures_frame() {
        let mut backend = TestBackend::new(Size::new(3, 1));
        let mut screen = Screen::new(3, 1);
        screen.set_char(Point::new(0, 0), crate::screen::Char::new('h', crate::style::Style::new()));
        backend.render(&screen).unwrap();
        assert_eq!(backend.last_frame(), "h  ");
    }

    #[test]
    fn test_backend_tracks_cursor() {
        let mut backend = TestBackend::new(Size::new(10, 10));
        backend.set_cursor_position(Point::new(2, 3)).unwrap();
        assert_eq!(backend.cursor_position(), Some(Point::new(2, 3)));
    }

    #[test]
    fn pipe_output_accumulates_bytes() {
        let mut output = PipeOutput::new();
        let mut screen = Screen::new(2, 1);
        screen.set_char(Point::new(0, 0), crate::screen::Char::new('x', crate::style::Style::new()));
        output.render(&screen).unwrap();
        assert_eq!(output.contents(), "x \n");
    }
}
