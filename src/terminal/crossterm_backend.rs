//! [`Output`] backed by `crossterm`.
//!
//! Style *strings* are opaque to this crate (see [`crate::style::Style`]),
//! so this backend writes characters without translating style classes
//! into terminal attributes — that translation is left to a theme layer
//! built on top, consistent with spec scoping style-string parsing out.

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::output::{ColorSupport, Output};
use crate::primitives::{Point, Size};
use crate::screen::Screen;

use super::detect;

/// Writes to a real terminal via `crossterm`.
pub struct CrosstermBackend<W: Write + Send> {
    writer: W,
    color_support: ColorSupport,
    raw_mode_active: bool,
}

impl<W: Write + Send> CrosstermBackend<W> {
    /// Wrap `writer` (typically `std::io::stdout()`), detecting color
    /// depth from the process environment.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            color_support: detect::detect(),
            raw_mode_active: false,
        }
    }

    /// Enter raw mode (no line buffering, no echo). Tracks whether it
    /// succeeded so `Drop` only restores a mode this backend actually
    /// entered.
    pub fn enable_raw_mode(&mut self) -> Result<()> {
        terminal::enable_raw_mode().map_err(|e| {
            warn!(error = %e, "failed to enable raw mode");
            Error::TerminalUnavailable(e.to_string())
        })?;
        self.raw_mode_active = true;
        debug!("entered raw mode");
        Ok(())
    }

    /// Leave raw mode, if active.
    pub fn disable_raw_mode(&mut self) -> Result<()> {
        if !self.raw_mode_active {
            return Ok(());
        }
        terminal::disable_raw_mode().map_err(|e| Error::TerminalUnavailable(e.to_string()))?;
        self.raw_mode_active = false;
        Ok(())
    }
}

impl<W: Write + Send> Output for CrosstermBackend<W> {
    fn render(&mut self, screen: &Screen) -> Result<()> {
        queue!(self.writer, MoveTo(0, 0)).map_err(io::Error::from)?;
        for y in 0..screen.height() {
            for x in 0..screen.width() {
                let point = Point::new(x, y);
                if let Some(escape) = screen.zero_width_escape(point) {
                    write!(self.writer, "{escape}")?;
                }
                let c = screen.get_char(point);
                write!(self.writer, "{}", c.display())?;
            }
            if y + 1 < screen.height() {
                queue!(self.writer, MoveTo(0, (y + 1) as u16)).map_err(io::Error::from)?;
            }
        }
        Ok(())
    }

    fn set_cursor_position(&mut self, point: Point) -> Result<()> {
        execute!(self.writer, MoveTo(point.x as u16, point.y as u16)).map_err(io::Error::from)?;
        Ok(())
    }

    fn set_cursor_visible(&mut self, visible: bool) -> Result<()> {
        if visible {
            execute!(self.writer, Show).map_err(io::Error::from)?;
        } else {
            execute!(self.writer, Hide).map_err(io::Error::from)?;
        }
        Ok(())
    }

    fn enter_alternate_screen(&mut self) -> Result<()> {
        execute!(self.writer, EnterAlternateScreen).map_err(io::Error::from)?;
        Ok(())
    }

    fn leave_alternate_screen(&mut self) -> Result<()> {
        execute!(self.writer, LeaveAlternateScreen).map_err(io::Error::from)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn color_support(&self) -> ColorSupport {
        self.color_support
    }

    fn size(&self) -> Option<Size> {
        terminal::size()
            .ok()
            .map(|(cols, rows)| Size::new(cols as usize, rows as usize))
    }
}

impl<W: Write + Send> Drop for CrosstermBackend<W> {
    fn drop(&mut self) {
        if self.raw_mode_active {
            let _ = terminal::disable_raw_mode();
        }
    }
}
