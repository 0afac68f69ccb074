//! `UIControl`: the content a [`crate::layout::window::Window`] draws,
//! decoupled from layout and scrolling.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::buffer::Buffer;
use crate::lexer::{Lexer, LineMapper, PlainTextLexer};
use crate::primitives::{Dimension, Point, WritePosition};
use crate::screen::{Char, Screen};
use crate::style::Style;

/// Maximum gap between clicks counted toward a double/triple click.
const MULTI_CLICK_WINDOW: Duration = Duration::from_millis(500);

/// Content a [`crate::layout::window::Window`] can render.
///
/// `render` is given the window's absolute rectangle plus the current
/// scroll offsets (in content coordinates) rather than owning scrolling
/// itself — scrolling is `Window`'s job, `UIControl`'s job is only to
/// know how to paint a window into its content.
pub trait UIControl: Send + Sync {
    /// Preferred content width.
    fn preferred_width(&self, max_available: usize) -> Dimension;

    /// Preferred content height for a given width.
    fn preferred_height(&self, width: usize, max_available: usize) -> Dimension;

    /// Draw content into `screen` at `position`, starting from
    /// `(horizontal_scroll, vertical_scroll)` in content coordinates.
    fn render(
        &self,
        screen: &mut Screen,
        position: WritePosition,
        horizontal_scroll: usize,
        vertical_scroll: usize,
    );

    /// Absolute screen position of the cursor, if this control owns one
    /// and it is currently within the visible (scrolled) rectangle.
    fn cursor_position(
        &self,
        position: WritePosition,
        horizontal_scroll: usize,
        vertical_scroll: usize,
    ) -> Option<Point>;

    /// The cursor's position in content coordinates `(row, col)`,
    /// independent of scrolling — used by `Window` to decide how far to
    /// scroll before rendering.
    fn cursor_content_position(&self) -> Option<(usize, usize)>;

    /// Handle a mouse click at the given content-coordinate position.
    /// `click_count` is 1, 2, or 3 (single/double/triple click); the
    /// default implementation ignores clicks entirely.
    fn handle_click(&self, _row: usize, _col: usize, _click_count: u8) {}
}

/// A control with no content and no cursor; used as a placeholder and in
/// tests.
pub struct DummyControl;

impl DummyControl {
    /// An empty, cursorless control.
    pub fn new() -> Self {
        Self
    }
}

impl Default for DummyControl {
    fn default() -> Self {
        Self::new()
    }
}

impl UIControl for DummyControl {
    fn preferred_width(&self, _max_available: usize) -> Dimension {
        Dimension::exact(0)
    }

    fn preferred_height(&self, _width: usize, _max_available: usize) -> Dimension {
        Dimension::exact(0)
    }

    fn render(&self, _screen: &mut Screen, _position: WritePosition, _h: usize, _v: usize) {}

    fn cursor_position(&self, _position: WritePosition, _h: usize, _v: usize) -> Option<Point> {
        None
    }

    fn cursor_content_position(&self) -> Option<(usize, usize)> {
        None
    }
}

/// Renders fixed text (no editing, no cursor), the control behind static
/// labels, toolbars, and help text.
pub struct FormattedTextControl {
    text: String,
    style: Style,
}

impl FormattedTextControl {
    /// Render `text` in `style`.
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    fn lines(&self) -> Vec<&str> {
        self.text.split('\n').collect()
    }
}

impl UIControl for FormattedTextControl {
    fn preferred_width(&self, max_available: usize) -> Dimension {
        let width = self
            .lines()
            .iter()
            .map(|l| unicode_width::UnicodeWidthStr::width(*l))
            .max()
            .unwrap_or(0)
            .min(max_available);
        Dimension::new(0, max_available, width, 1)
    }

    fn preferred_height(&self, _width: usize, max_available: usize) -> Dimension {
        let height = self.lines().len().min(max_available.max(1));
        Dimension::new(0, max_available, height, 1)
    }

    fn render(&self, screen: &mut Screen, position: WritePosition, horizontal_scroll: usize, vertical_scroll: usize) {
        let lines = self.lines();
        for row in 0..position.height {
            let Some(line) = lines.get(row + vertical_scroll) else {
                break;
            };
            for (col, c) in line.chars().skip(horizontal_scroll).enumerate() {
                if col >= position.width {
                    break;
                }
                screen.set_char(
                    Point::new(position.xpos + col, position.ypos + row),
                    Char::new(c, self.style.clone()),
                );
            }
        }
    }

    fn cursor_position(&self, _position: WritePosition, _h: usize, _v: usize) -> Option<Point> {
        None
    }

    fn cursor_content_position(&self) -> Option<(usize, usize)> {
        None
    }
}

#[derive(Clone, Copy, Default)]
struct ClickState {
    last_click_at: Option<Instant>,
    last_position: Option<(usize, usize)>,
    streak: u8,
}

/// Renders a [`Buffer`]'s document with a cursor, and implements
/// click-to-position / double-click word-select / triple-click
/// line-select mouse handling.
pub struct BufferControl {
    buffer: Arc<Mutex<Buffer>>,
    style: Style,
    click_state: Mutex<ClickState>,
    lexer: Arc<dyn Lexer>,
    mapper_cache: Mutex<Option<(u64, LineMapper)>>,
}

impl BufferControl {
    /// Render and edit `buffer` in the default style, with no syntax
    /// highlighting.
    pub fn new(buffer: Buffer) -> Self {
        Self {
            buffer: Arc::new(Mutex::new(buffer)),
            style: Style::new(),
            click_state: Mutex::new(ClickState::default()),
            lexer: Arc::new(PlainTextLexer::default()),
            mapper_cache: Mutex::new(None),
        }
    }

    /// A shared handle to the underlying buffer, so an
    /// [`crate::application::Application`] can focus it ambiently (see
    /// `AppHandle::has_selection` and friends) without this control
    /// losing exclusive-looking access via [`Self::with_buffer`].
    pub fn shared_buffer(&self) -> Arc<Mutex<Buffer>> {
        self.buffer.clone()
    }

    /// Highlight the buffer's content with `lexer` instead of painting it
    /// flat.
    #[must_use]
    pub fn with_lexer(mut self, lexer: Arc<dyn Lexer>) -> Self {
        self.lexer = lexer;
        self.mapper_cache = Mutex::new(None);
        self
    }

    /// Lock and access the underlying buffer.
    pub fn with_buffer<R>(&self, f: impl FnOnce(&mut Buffer) -> R) -> R {
        let mut buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut buffer)
    }

    fn lines(buffer: &Buffer) -> Vec<String> {
        buffer.document().text().split('\n').map(str::to_string).collect()
    }

    /// The cached line mapper for `buffer`'s current content version,
    /// rebuilding it via `self.lexer` only when the version advanced
    /// since the last call.
    fn with_mapper<R>(&self, buffer: &Buffer, f: impl FnOnce(&LineMapper) -> R) -> R {
        let mut cache = self.mapper_cache.lock().unwrap_or_else(|e| e.into_inner());
        let version = buffer.content_version();
        let stale = match &*cache {
            Some((cached_version, _)) => *cached_version != version,
            None => true,
        };
        if stale {
            *cache = Some((version, self.lexer.lex_document(buffer.document())));
        }
        let (_, mapper) = cache.as_ref().expect("just populated above");
        f(mapper)
    }

    /// Classify a click at `(row, col)` against the last click's time and
    /// position, returning the resulting click count (1, 2, or 3).
    fn classify_click(&self, row: usize, col: usize) -> u8 {
        let mut state = self.click_state.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        let is_repeat = state
            .last_click_at
            .map(|at| now.duration_since(at) <= MULTI_CLICK_WINDOW)
            .unwrap_or(false)
            && state.last_position == Some((row, col));
        state.streak = if is_repeat { (state.streak % 3) + 1 } else { 1 };
        state.last_click_at = Some(now);
        state.last_position = Some((row, col));
        state.streak
    }
}

impl UIControl for BufferControl {
    fn preferred_width(&self, max_available: usize) -> Dimension {
        let buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        let width = Self::lines(&buffer)
            .iter()
            .map(|l| unicode_width::UnicodeWidthStr::width(l.as_str()))
            .max()
            .unwrap_or(0)
            .min(max_available);
        Dimension::new(1.min(max_available), max_available, width, 1)
    }

    fn preferred_height(&self, _width: usize, max_available: usize) -> Dimension {
        let buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        let height = Self::lines(&buffer).len().min(max_available.max(1));
        Dimension::new(1.min(max_available), max_available, height, 1)
    }

    fn render(&self, screen: &mut Screen, position: WritePosition, horizontal_scroll: usize, vertical_scroll: usize) {
        let buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        let line_count = Self::lines(&buffer).len();
        self.with_mapper(&buffer, |mapper| {
            for row in vertical_scroll..line_count {
                let screen_row = row - vertical_scroll;
                if screen_row >= position.height {
                    break;
                }
                let mut col = 0usize;
                'spans: for (span_style, text) in mapper(row) {
                    let style = self.style.appended(span_style.as_str());
                    for c in text.chars() {
                        if col >= horizontal_scroll {
                            let screen_col = col - horizontal_scroll;
                            if screen_col >= position.width {
                                break 'spans;
                            }
                            screen.set_char(
                                Point::new(position.xpos + screen_col, position.ypos + screen_row),
                                Char::new(c, style.clone()),
                            );
                        }
                        col += 1;
                    }
                }
            }
        });
    }

    fn cursor_position(&self, position: WritePosition, horizontal_scroll: usize, vertical_scroll: usize) -> Option<Point> {
        let (row, col) = self.cursor_content_position()?;
        if row < vertical_scroll || col < horizontal_scroll {
            return None;
        }
        let screen_row = row - vertical_scroll;
        let screen_col = col - horizontal_scroll;
        if screen_row >= position.height || screen_col >= position.width {
            return None;
        }
        Some(Point::new(position.xpos + screen_col, position.ypos + screen_row))
    }

    fn cursor_content_position(&self) -> Option<(usize, usize)> {
        let buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        let doc = buffer.document();
        Some((doc.cursor_row(), doc.cursor_col()))
    }

    fn handle_click(&self, row: usize, col: usize, _click_count: u8) {
        let click_count = self.classify_click(row, col);
        let mut buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        let index = buffer.document().translate_row_col_to_index(row, col);
        match click_count {
            1 => {
                buffer.cancel_selection();
                let relative = index as isize - buffer.document().cursor_position() as isize;
                buffer.cursor_move(relative);
            }
            2 => {
                if let Some((start, end)) = buffer.document().word_bounds_at(index) {
                    buffer.set_selection(start, crate::document::SelectionType::Range);
                    let relative = end as isize - buffer.document().cursor_position() as isize;
                    buffer.cursor_move(relative);
                }
            }
            _ => {
                let line_start = buffer.document().translate_row_col_to_index(row, 0);
                let line_len = buffer
                    .document()
                    .text()
                    .split('\n')
                    .nth(row)
                    .map(|l| l.chars().count())
                    .unwrap_or(0);
                buffer.set_selection(line_start, crate::document::SelectionType::Line);
                let relative = (line_start + line_len) as isize - buffer.document().cursor_position() as isize;
                buffer.cursor_move(relative);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    #[test]
    fn formatted_text_renders_into_screen() {
        let control = FormattedTextControl::new("hi", Style::new());
        let mut screen = Screen::new(5, 2);
        control.render(&mut screen, WritePosition::new(0, 0, 5, 2), 0, 0);
        assert_eq!(screen.get_char(Point::new(0, 0)).display(), "h");
        assert_eq!(screen.get_char(Point::new(1, 0)).display(), "i");
    }

    #[test]
    fn buffer_control_cursor_position() {
        let mut buffer = Buffer::new();
        buffer.insert_text("ab").unwrap();
        let control = BufferControl::new(buffer);
        let pos = control.cursor_content_position();
        assert_eq!(pos, Some((0, 2)));
    }

    #[test]
    fn buffer_control_paints_keyword_spans_from_its_lexer() {
        use crate::lexer::KeywordLexer;

        let mut buffer = Buffer::new();
        buffer.insert_text("fn main").unwrap();
        let control = BufferControl::new(buffer).with_lexer(Arc::new(KeywordLexer::new(
            Style::new(),
            vec![("fn".to_string(), Style::from("class:keyword"))],
        )));
        let mut screen = Screen::new(10, 1);
        control.render(&mut screen, WritePosition::new(0, 0, 10, 1), 0, 0);
        assert!(screen.get_char(Point::new(0, 0)).style().as_str().contains("keyword"));
        assert!(!screen.get_char(Point::new(3, 0)).style().as_str().contains("keyword"));
    }

    #[test]
    fn buffer_control_mapper_cache_rebuilds_after_edit() {
        use crate::lexer::KeywordLexer;

        let mut buffer = Buffer::new();
        buffer.insert_text("a").unwrap();
        let control = BufferControl::new(buffer).with_lexer(Arc::new(KeywordLexer::new(
            Style::new(),
            vec![("ok".to_string(), Style::from("class:keyword"))],
        )));
        let mut screen = Screen::new(10, 1);
        control.render(&mut screen, WritePosition::new(0, 0, 10, 1), 0, 0);
        assert!(!screen.get_char(Point::new(0, 0)).style().as_str().contains("keyword"));

        control.with_buffer(|buffer| buffer.reset("ok"));
        let mut screen = Screen::new(10, 1);
        control.render(&mut screen, WritePosition::new(0, 0, 10, 1), 0, 0);
        assert!(screen.get_char(Point::new(0, 0)).style().as_str().contains("keyword"));
    }

    #[test]
    fn single_click_moves_cursor() {
        let mut buffer = Buffer::new();
        buffer.insert_text("hello world").unwrap();
        let control = BufferControl::new(buffer);
        control.handle_click(0, 2, 1);
        assert_eq!(control.cursor_content_position(), Some((0, 2)));
    }

    #[test]
    fn double_click_selects_word() {
        let mut buffer = Buffer::new();
        buffer.insert_text("hello world").unwrap();
        let control = BufferControl::new(buffer);
        control.handle_click(0, 7, 1);
        control.handle_click(0, 7, 1);
        // "world" spans content columns 6..11; double click should move
        // the cursor to the end of the word and select it.
        assert_eq!(control.cursor_content_position(), Some((0, 11)));
        control.with_buffer(|buffer| {
            let selection = buffer.document().selection().expect("word should be selected");
            assert_eq!(selection.anchor, 6);
            assert_eq!(selection.selection_type, crate::document::SelectionType::Range);
        });
    }

    #[test]
    fn triple_click_selects_line() {
        let mut buffer = Buffer::new();
        buffer.insert_text("hello world").unwrap();
        let control = BufferControl::new(buffer);
        control.handle_click(0, 3, 1);
        control.handle_click(0, 3, 1);
        control.handle_click(0, 3, 1);
        assert_eq!(control.cursor_content_position(), Some((0, 11)));
        control.with_buffer(|buffer| {
            let selection = buffer.document().selection().expect("line should be selected");
            assert_eq!(selection.anchor, 0);
            assert_eq!(selection.selection_type, crate::document::SelectionType::Line);
        });
    }

    #[test]
    fn click_classification_resets_after_window() {
        let control = BufferControl::new(Buffer::new());
        let first = control.classify_click(0, 0);
        assert_eq!(first, 1);
        {
            let mut state = control
                .click_state
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            state.last_click_at = Some(Instant::now() - MULTI_CLICK_WINDOW * 2);
        }
        let second = control.classify_click(0, 0);
        assert_eq!(second, 1);
    }

    #[test]
    fn dummy_control_has_no_cursor() {
        let _ = Document::empty();
        let control = DummyControl::new();
        assert_eq!(control.cursor_content_position(), None);
    }
}
