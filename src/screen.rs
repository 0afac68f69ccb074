//! The screen buffer: a sparse, styled character grid the layout engine
//! renders into and the output back-end diffs against the previous frame.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use unicode_width::UnicodeWidthStr;

use crate::primitives::Point;
use crate::style::Style;

/// Bound on the shared literal-character intern cache (see [`Char::new`]):
/// past this many distinct `(char, style)` pairs, new entries are no longer
/// interned, they just allocate — keeps a pathological stream of unique
/// styles from growing the cache without bound.
const INTERN_CACHE_LIMIT: usize = 4096;

type InternCache = Mutex<HashMap<(char, String), std::sync::Arc<CharData>>>;

fn intern_cache() -> &'static InternCache {
    static CACHE: OnceLock<InternCache> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

#[derive(Debug, PartialEq, Eq)]
struct CharData {
    display: String,
    style: Style,
    width: usize,
}

/// A single rendered cell: a display string, its style, and its terminal
/// column width.
///
/// Control characters (`< 0x20`, `0x7F`), the C1 control range, and NBSP
/// are transformed into a visible representation per spec §3.1 —
/// `Char::new` never stores a raw control byte in `display`. Common
/// `(char, style)` pairs are interned behind a bounded cache, since a
/// blank screen is overwhelmingly spaces in the default style.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Char(std::sync::Arc<CharData>);

impl Char {
    /// Build a cell, transforming non-printable input into a visible
    /// placeholder and computing display width. Interned when the shared
    /// cache has not yet hit [`INTERN_CACHE_LIMIT`].
    pub fn new(c: char, style: Style) -> Self {
        let (display, class) = sanitize(c);
        let style = match class {
            Some(class) => style.prepended(class),
            None => style,
        };
        let key = (c, style.as_str().to_string());
        let mut cache = intern_cache().lock().unwrap_or_else(|e| e.into_inner());
        if let Some(data) = cache.get(&key) {
            return Self(data.clone());
        }
        let width = UnicodeWidthStr::width(display.as_str());
        let data = std::sync::Arc::new(CharData {
            display,
            style,
            width,
        });
        if cache.len() < INTERN_CACHE_LIMIT {
            cache.insert(key, data.clone());
        }
        Self(data)
    }

    /// A blank cell (a single space) in the given style.
    pub fn blank(style: Style) -> Self {
        Self::new(' ', style)
    }

    /// The string actually drawn to the terminal for this cell — usually
    /// one character, but `"^A"`/`"<80>"`-style transforms of control bytes
    /// are multiple.
    pub fn display(&self) -> &str {
        &self.0.display
    }

    /// The cell's style.
    pub fn style(&self) -> &Style {
        &self.0.style
    }

    /// Terminal column width (0, 1, or 2) of the display string.
    pub fn width(&self) -> usize {
        self.0.width
    }
}

/// Map control characters, the C1 range, and NBSP to a visible
/// representation, returning the display string plus a style class to
/// prepend (if the transform applies one).
///
/// Control codes `0x00..0x20` and DEL (`0x7F`) become caret notation
/// (`0x01` → `"^A"`, `0x7F` → `"^?"`) styled `class:control-character`;
/// the C1 range (`0x80..0x9F`) becomes `<hex>` (e.g. `"<80>"`); NBSP
/// becomes a plain space styled `class:nbsp`. Everything else passes
/// through unchanged with no class.
fn sanitize(c: char) -> (String, Option<&'static str>) {
    match c as u32 {
        0xa0 => (" ".to_string(), Some("class:nbsp")),
        code @ (0x00..=0x1f | 0x7f) => {
            let caret = (code ^ 0x40) as u8 as char;
            (format!("^{caret}"), Some("class:control-character"))
        }
        code @ 0x80..=0x9f => (format!("<{code:02x}>"), Some("class:control-character")),
        _ => (c.to_string(), None),
    }
}

/// A float draw request queued during a render pass: floats are collected
/// while the base layer is drawn, then painted back-to-front by
/// `(z_index, sequence)` so later-queued floats at the same z-index win
/// ties (FIFO within a layer).
#[derive(Clone, Debug)]
struct QueuedFloat {
    z_index: i32,
    seq: u64,
    origin: Point,
    cells: Vec<(Point, Char)>,
}

/// The screen's sparse character grid plus the deferred float queue.
///
/// Cells are stored in a `HashMap` keyed by position rather than a dense
/// 2D array: most of a terminal frame is blank, and resizing the terminal
/// must not require reallocating a full grid.
pub struct Screen {
    width: usize,
    height: usize,
    cells: HashMap<Point, Char>,
    default_char: Char,
    floats: Vec<QueuedFloat>,
    float_seq: u64,
    /// Escape sequences with no visible width (e.g. hyperlink OSC 8) keyed
    /// by the position they're anchored at, emitted immediately before the
    /// cell at that position.
    zero_width_escapes: HashMap<Point, String>,
    /// Per-window cursor positions registered during the base layer's
    /// render pass, so cursor-relative floats (`xcursor`/`ycursor`
    /// anchors) can resolve against them afterward.
    cursor_positions: HashMap<u64, Point>,
}

impl Screen {
    /// An empty screen of the given size, filled with blanks in the
    /// default style.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: HashMap::new(),
            default_char: Char::blank(Style::new()),
            floats: Vec::new(),
            float_seq: 0,
            zero_width_escapes: HashMap::new(),
            cursor_positions: HashMap::new(),
        }
    }

    /// Screen width in columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Screen height in rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Write a cell directly into the base layer. Out-of-bounds positions
    /// are silently dropped rather than panicking.
    pub fn set_char(&mut self, point: Point, c: Char) {
        if point.x >= self.width || point.y >= self.height {
            return;
        }
        self.cells.insert(point, c);
    }

    /// Read a cell, falling back to the default blank if nothing was
    /// drawn there.
    pub fn get_char(&self, point: Point) -> &Char {
        self.cells.get(&point).unwrap_or(&self.default_char)
    }

    /// Attach a zero-width escape sequence (e.g. a terminal hyperlink) to
    /// be emitted immediately before the cell at `point`.
    pub fn set_zero_width_escape(&mut self, point: Point, escape: impl Into<String>) {
        self.zero_width_escapes.insert(point, escape.into());
    }

    /// The zero-width escape anchored at `point`, if any.
    pub fn zero_width_escape(&self, point: Point) -> Option<&str> {
        self.zero_width_escapes.get(&point).map(String::as_str)
    }

    /// Queue a float's cells for later compositing at `z_index`, anchored
    /// at `origin`. Floats are drawn in ascending `z_index` order after
    /// the base layer, and in FIFO order among floats sharing a z-index.
    pub fn queue_float(&mut self, origin: Point, z_index: i32, cells: Vec<(Point, Char)>) {
        let seq = self.float_seq;
        self.float_seq += 1;
        self.floats.push(QueuedFloat {
            z_index,
            seq,
            origin,
            cells,
        });
    }

    /// Composite all queued floats onto the base layer in z-index/seq
    /// order, then clear the queue. Called once per render pass after the
    /// base layer and all floats have been drawn.
    pub fn flush_floats(&mut self) {
        let mut floats = std::mem::take(&mut self.floats);
        floats.sort_by_key(|f| (f.z_index, f.seq));
        for float in floats {
            for (offset, c) in float.cells {
                let point = Point::new(float.origin.x + offset.x, float.origin.y + offset.y);
                self.set_char(point, c);
            }
        }
    }

    /// Register the absolute cursor position a window drew at, keyed by
    /// that window's id. Read back by cursor-relative float anchors once
    /// the base layer has finished its render pass.
    pub fn set_cursor_position(&mut self, window_id: u64, point: Point) {
        self.cursor_positions.insert(window_id, point);
    }

    /// The cursor position last registered for `window_id`, if any.
    pub fn cursor_position_for(&self, window_id: u64) -> Option<Point> {
        self.cursor_positions.get(&window_id).copied()
    }

    /// Iterate over every explicitly drawn (non-default) cell.
    pub fn drawn_cells(&self) -> impl Iterator<Item = (&Point, &Char)> {
        self.cells.iter()
    }
}
