//! `Window`: the leaf container that actually draws a [`UIControl`]'s
//! content, owning scroll position and exposing render info for
//! mouse-position translation and cursor placement.

use crate::controls::UIControl;
use crate::primitives::{Dimension, Point, WritePosition};
use crate::screen::Screen;
use crate::style::Style;

use super::Container;

/// Whether a window wraps long lines or scrolls them horizontally.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WrapMode {
    /// Lines wrap onto additional display rows.
    Wrap,
    /// Lines scroll horizontally; only `horizontal_scroll` columns are
    /// visible per line.
    NoWrap,
}

/// A snapshot of what a [`Window`] actually drew in its last render pass:
/// the mapping from document/content line to screen row, used to
/// translate mouse clicks back into content coordinates and to place the
/// cursor.
#[derive(Clone, Debug, Default)]
pub struct WindowRenderInfo {
    /// Absolute screen rectangle the window was given.
    pub position: WritePosition,
    /// First content row currently visible (after vertical scrolling).
    pub vertical_scroll: usize,
    /// First content column currently visible (after horizontal
    /// scrolling, only meaningful in `NoWrap` mode).
    pub horizontal_scroll: usize,
    /// Absolute screen position of the cursor, if the window's control
    /// reported one.
    pub cursor_position: Option<Point>,
}

struct ScrollState {
    vertical: usize,
    horizontal: usize,
}

/// A leaf container that draws a [`UIControl`]'s content with scrolling.
///
/// Scroll position is conceptually mutable on every render pass
/// (auto-scroll-to-cursor), but [`Container::write_to_screen`] takes
/// `&self` so layout trees can be shared across a render and a
/// click-translation lookup in the same pass; it lives behind a `Mutex`
/// for that reason, the same way `last_render_info` does.
pub struct Window {
    id: u64,
    control: Box<dyn UIControl>,
    wrap: WrapMode,
    scroll: std::sync::Mutex<ScrollState>,
    always_scroll_to_cursor: bool,
    style: Style,
    last_render_info: std::sync::Mutex<WindowRenderInfo>,
}

fn next_window_id() -> u64 {
    static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);
    COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed)
}

impl Window {
    /// A window drawing `control`'s content, wrapping long lines by
    /// default.
    pub fn new(control: Box<dyn UIControl>) -> Self {
        Self {
            id: next_window_id(),
            control,
            wrap: WrapMode::Wrap,
            scroll: std::sync::Mutex::new(ScrollState { vertical: 0, horizontal: 0 }),
            always_scroll_to_cursor: true,
            style: Style::new(),
            last_render_info: std::sync::Mutex::new(WindowRenderInfo::default()),
        }
    }

    /// This window's stable identity, used to register its cursor
    /// position on the `Screen` for cursor-relative float anchors.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Use horizontal scrolling instead of line wrapping.
    #[must_use]
    pub fn with_wrap(mut self, wrap: WrapMode) -> Self {
        self.wrap = wrap;
        self
    }

    /// Background style applied to cells the control didn't draw.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Snapshot of the last render pass, for mouse-click translation.
    pub fn render_info(&self) -> WindowRenderInfo {
        self.last_render_info
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Current vertical scroll offset, in content rows.
    pub fn vertical_scroll(&self) -> usize {
        self.scroll.lock().unwrap_or_else(|e| e.into_inner()).vertical
    }

    /// Current horizontal scroll offset, in content columns.
    pub fn horizontal_scroll(&self) -> usize {
        self.scroll.lock().unwrap_or_else(|e| e.into_inner()).horizontal
    }

    /// Scroll so the cursor row is visible within `height` rows, moving
    /// the minimum distance necessary (never re-centers gratuitously).
    fn scroll_to_cursor(state: &mut ScrollState, cursor_row: usize, height: usize) {
        if height == 0 {
            return;
        }
        if cursor_row < state.vertical {
            state.vertical = cursor_row;
        } else if cursor_row >= state.vertical + height {
            state.vertical = cursor_row + 1 - height;
        }
    }

    fn scroll_to_cursor_col(state: &mut ScrollState, cursor_col: usize, width: usize) {
        if width == 0 {
            return;
        }
        if cursor_col < state.horizontal {
            state.horizontal = cursor_col;
        } else if cursor_col >= state.horizontal + width {
            state.horizontal = cursor_col + 1 - width;
        }
    }

    /// Translate an absolute screen point into content `(row, col)`
    /// coordinates, using the last render pass's scroll offsets. Returns
    /// `None` if the point falls outside the window's last rectangle.
    pub fn translate_point_to_position(&self, point: Point) -> Option<(usize, usize)> {
        let info = self.render_info();
        if !info.position.contains(point) {
            return None;
        }
        let row = point.y - info.position.ypos + info.vertical_scroll;
        let col = point.x - info.position.xpos + info.horizontal_scroll;
        Some((row, col))
    }
}

impl Container for Window {
    fn preferred_width(&self, max_available: usize) -> Dimension {
        self.control.preferred_width(max_available)
    }

    fn preferred_height(&self, width: usize, max_available: usize) -> Dimension {
        self.control.preferred_height(width, max_available)
    }

    fn write_to_screen(&self, screen: &mut Screen, position: WritePosition) {
        let (horizontal_scroll, vertical_scroll) = {
            let mut state = self.scroll.lock().unwrap_or_else(|e| e.into_inner());
            if self.always_scroll_to_cursor {
                if let Some((row, col)) = self.control.cursor_content_position() {
                    Self::scroll_to_cursor(&mut state, row, position.height);
                    if matches!(self.wrap, WrapMode::NoWrap) {
                        Self::scroll_to_cursor_col(&mut state, col, position.width);
                    } else {
                        state.horizontal = 0;
                    }
                }
            }
            (state.horizontal, state.vertical)
        };

        for y in 0..position.height {
            for x in 0..position.width {
                screen.set_char(
                    Point::new(position.xpos + x, position.ypos + y),
                    crate::screen::Char::blank(self.style.clone()),
                );
            }
        }
        self.control
            .render(screen, position, horizontal_scroll, vertical_scroll);
        let cursor_position = self.control.cursor_position(position, horizontal_scroll, vertical_scroll);
        if let Some(point) = cursor_position {
            screen.set_cursor_position(self.id, point);
        }
        *self
            .last_render_info
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = WindowRenderInfo {
            position,
            vertical_scroll,
            horizontal_scroll,
            cursor_position,
        };
    }
}
