//! Layout containers and the weighted dimension-division algorithm.
//!
//! A [`Container`] reports how much space it wants (its preferred
//! [`Dimension`] on each axis) and, given an allotted rectangle, divides
//! that space among its children. [`HSplit`]/[`VSplit`] use a
//! weighted round-robin divider rather than a general constraint solver,
//! since the division rule needs to be exact and its tie-breaks
//! deterministic (see [`divide_space`]).

pub mod window;

use crate::primitives::{Dimension, Point, Size, WritePosition};
use crate::screen::{Char, Screen};

/// Something that can be laid out: it reports the space it wants and,
/// given an allotted rectangle, draws itself (or its children) into a
/// [`Screen`].
pub trait Container: Send + Sync {
    /// Preferred width, used by parent splits to allocate columns.
    fn preferred_width(&self, max_available: usize) -> Dimension;

    /// Preferred height for a given width, used by parent splits to
    /// allocate rows.
    fn preferred_height(&self, width: usize, max_available: usize) -> Dimension;

    /// Render into `screen` at the given write position.
    fn write_to_screen(&self, screen: &mut Screen, position: WritePosition);
}

/// Divide `available` units among `dims.len()` children according to each
/// child's `(min, max, preferred, weight)`.
///
/// Algorithm (spec §4.6): every child starts at its `min`; if the children's
/// combined minimums already exceed `available`, there is no valid division
/// and `None` is returned (the caller renders a "window too small"
/// sentinel rather than silently shrinking a child below the minimum it
/// asked for). Otherwise remaining space is handed out one unit at a time
/// in weighted round-robin order — each pass grants one unit to the child
/// with the largest `weight / (already_allocated + 1)` ratio among
/// children still below their `max` and below their `preferred` (first
/// pass) or `max` (second pass once every child has reached `preferred`).
/// Ties are broken by earliest index, so the result is deterministic and
/// stable under reordering-insensitive callers.
pub fn divide_space(dims: &[Dimension], available: usize) -> Option<Vec<usize>> {
    if dims.is_empty() {
        return Some(Vec::new());
    }
    let total_min: usize = dims.iter().map(|d| d.min).sum();
    if total_min > available {
        return None;
    }
    let mut sizes: Vec<usize> = dims.iter().map(|d| d.min).collect();
    let mut remaining = available - total_min;

    // Pass 1: grow toward `preferred`.
    grow_pass(dims, &mut sizes, &mut remaining, |d| d.preferred.max(d.min));
    // Pass 2: grow toward `max`, spending any space still left over.
    grow_pass(dims, &mut sizes, &mut remaining, |d| d.max);

    // Any space that still could not be placed (every child capped at
    // `max`) is granted to the last child so totals always match
    // `available` exactly, matching how terminal splits consume the
    // remainder column/row.
    if remaining > 0 {
        if let Some(last) = sizes.last_mut() {
            *last += remaining;
        }
    }

    Some(sizes)
}

fn grow_pass(
    dims: &[Dimension],
    sizes: &mut [usize],
    remaining: &mut usize,
    cap: impl Fn(&Dimension) -> usize,
) {
    loop {
        if *remaining == 0 {
            return;
        }
        let mut best: Option<(usize, f64)> = None;
        for (i, d) in dims.iter().enumerate() {
            let ceiling = cap(d);
            if sizes[i] >= ceiling {
                continue;
            }
            let ratio = d.weight as f64 / (sizes[i] + 1) as f64;
            match best {
                Some((_, best_ratio)) if ratio <= best_ratio => {}
                _ => best = Some((i, ratio)),
            }
        }
        match best {
            Some((i, _)) => {
                sizes[i] += 1;
                *remaining -= 1;
            }
            None => return,
        }
    }
}

/// Fill `position` with the "window too small" sentinel: the combined
/// minimums of a split's children didn't fit the space the parent gave it
/// (see [`divide_space`]), so there is no valid child layout to draw.
fn render_too_small(screen: &mut Screen, position: WritePosition) {
    let style = crate::style::Style::from("class:window-too-small");
    for y in position.ypos..position.ypos + position.height {
        for x in position.xpos..position.xpos + position.width {
            screen.set_char(
                crate::primitives::Point::new(x, y),
                crate::screen::Char::blank(style.clone()),
            );
        }
    }
}

/// Lay children out left-to-right, dividing width with [`divide_space`]
/// and giving each child the full available height.
pub struct HSplit {
    children: Vec<Box<dyn Container>>,
}

impl HSplit {
    /// Build from an ordered list of children.
    pub fn new(children: Vec<Box<dyn Container>>) -> Self {
        Self { children }
    }
}

impl Container for HSplit {
    fn preferred_width(&self, max_available: usize) -> Dimension {
        let mut total = Dimension::exact(0);
        for child in &self.children {
            let d = child.preferred_width(max_available);
            total = Dimension::new(
                total.min + d.min,
                total.max.saturating_add(d.max),
                total.preferred + d.preferred,
                total.weight + d.weight,
            );
        }
        total
    }

    fn preferred_height(&self, width: usize, max_available: usize) -> Dimension {
        let Some(widths) = divide_space(
            &self
                .children
                .iter()
                .map(|c| c.preferred_width(width))
                .collect::<Vec<_>>(),
            width,
        ) else {
            return Dimension::exact(0);
        };
        let mut max_pref = 0;
        let mut max_max = 0;
        for (child, w) in self.children.iter().zip(widths) {
            let d = child.preferred_height(w, max_available);
            max_pref = max_pref.max(d.preferred);
            max_max = max_max.max(d.max);
        }
        Dimension::new(0, max_max, max_pref, 1)
    }

    fn write_to_screen(&self, screen: &mut Screen, position: WritePosition) {
        let dims: Vec<Dimension> = self
            .children
            .iter()
            .map(|c| c.preferred_width(position.width))
            .collect();
        let Some(widths) = divide_space(&dims, position.width) else {
            render_too_small(screen, position);
            return;
        };
        let mut x = position.xpos;
        for (child, width) in self.children.iter().zip(widths) {
            child.write_to_screen(
                screen,
                WritePosition::new(x, position.ypos, width, position.height),
            );
            x += width;
        }
    }
}

/// Lay children out top-to-bottom, dividing height with [`divide_space`]
/// and giving each child the full available width.
pub struct VSplit {
    children: Vec<Box<dyn Container>>,
}

impl VSplit {
    /// Build from an ordered list of children.
    pub fn new(children: Vec<Box<dyn Container>>) -> Self {
        Self { children }
    }
}

impl Container for VSplit {
    fn preferred_width(&self, max_available: usize) -> Dimension {
        let mut max_pref = 0;
        let mut max_max = 0;
        for child in &self.children {
            let d = child.preferred_width(max_available);
            max_pref = max_pref.max(d.preferred);
            max_max = max_max.max(d.max);
        }
        Dimension::new(0, max_max, max_pref, 1)
    }

    fn preferred_height(&self, width: usize, max_available: usize) -> Dimension {
        let mut total = Dimension::exact(0);
        for child in &self.children {
            let d = child.preferred_height(width, max_available);
            total = Dimension::new(
                total.min + d.min,
                total.max.saturating_add(d.max),
                total.preferred + d.preferred,
                total.weight + d.weight,
            );
        }
        total
    }

    fn write_to_screen(&self, screen: &mut Screen, position: WritePosition) {
        let dims: Vec<Dimension> = self
            .children
            .iter()
            .map(|c| c.preferred_height(position.width, position.height))
            .collect();
        let Some(heights) = divide_space(&dims, position.height) else {
            render_too_small(screen, position);
            return;
        };
        let mut y = position.ypos;
        for (child, height) in self.children.iter().zip(heights) {
            child.write_to_screen(
                screen,
                WritePosition::new(position.xpos, y, position.width, height),
            );
            y += height;
        }
    }
}

/// Horizontal anchor for a floated child within its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HorizontalAnchor {
    /// Anchored to an exact column offset from the left.
    Left(usize),
    /// Anchored to an exact column offset from the right.
    Right(usize),
    /// Anchored `offset` columns from a window's cursor column (negative
    /// offsets shift left). Resolves against the cursor position the
    /// named window registered on the `Screen` during the base layer's
    /// render pass; falls back to the parent's left edge if that window
    /// never registered one.
    Cursor(isize),
    /// Centered horizontally.
    Center,
}

/// Vertical anchor for a floated child within its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerticalAnchor {
    /// Anchored to an exact row offset from the top.
    Top(usize),
    /// Anchored to an exact row offset from the bottom.
    Bottom(usize),
    /// Anchored `offset` rows from a window's cursor row (typically `1`,
    /// to drop a completion menu immediately below the cursor).
    Cursor(isize),
    /// Centered vertically.
    Center,
}

/// A single floated child positioned relative to its parent's rectangle,
/// drawn on top of the base content at a given z-index.
pub struct Float {
    /// Horizontal placement.
    pub horizontal: HorizontalAnchor,
    /// Vertical placement.
    pub vertical: VerticalAnchor,
    /// Stacking order; higher paints over lower (see [`Screen::queue_float`]).
    /// Values below 1 are normalized to 1 (0 is reserved for base content).
    pub z_index: i32,
    /// The [`Window`](super::window::Window) id whose cursor position a
    /// `Cursor` anchor resolves against. Ignored by floats that only use
    /// `Left`/`Right`/`Top`/`Bottom`/`Center` anchors.
    pub cursor_window: Option<u64>,
    /// The floated content.
    pub content: Box<dyn Container>,
}

/// Draws a base container, then composites floats on top at resolved
/// positions.
///
/// Resolution rule: a float's width/height are its preferred dimensions
/// clamped to the parent rectangle; `Left`/`Right`/`Top`/`Bottom`/`Cursor`
/// anchors win over `Center` when both would otherwise place the float
/// out of bounds (the explicit offset is honored, and the float is
/// clipped against the parent rather than re-centered).
///
/// Floats are rendered into a scratch screen and handed to
/// [`Screen::queue_float`] rather than drawn directly, so they composite
/// in the same deferred z-index pass as every other queued float in the
/// tree — `Cursor` anchors in particular must resolve only after the
/// base layer has registered the anchoring window's cursor position,
/// which `write_to_screen` guarantees by drawing `base` first.
pub struct FloatContainer {
    base: Box<dyn Container>,
    floats: Vec<Float>,
}

impl FloatContainer {
    /// Build from a base container and an ordered list of floats (earlier
    /// floats are queued first; z-index still governs paint order).
    pub fn new(base: Box<dyn Container>, floats: Vec<Float>) -> Self {
        Self { base, floats }
    }

    fn resolve_float(&self, float: &Float, parent: WritePosition, screen: &Screen) -> WritePosition {
        let width_dim = float.content.preferred_width(parent.width);
        let width = width_dim.preferred.clamp(width_dim.min, parent.width.max(width_dim.min)).min(parent.width.max(1));
        let height_dim = float.content.preferred_height(width, parent.height);
        let height = height_dim
            .preferred
            .clamp(height_dim.min, parent.height.max(height_dim.min))
            .min(parent.height.max(1));

        let cursor = float.cursor_window.and_then(|id| screen.cursor_position_for(id));

        let x = match float.horizontal {
            HorizontalAnchor::Left(offset) => parent.xpos + offset,
            HorizontalAnchor::Right(offset) => {
                (parent.xpos + parent.width).saturating_sub(width + offset)
            }
            HorizontalAnchor::Cursor(offset) => match cursor {
                Some(point) => (point.x as isize + offset).max(0) as usize,
                None => parent.xpos,
            },
            HorizontalAnchor::Center => {
                parent.xpos + parent.width.saturating_sub(width) / 2
            }
        };
        let y = match float.vertical {
            VerticalAnchor::Top(offset) => parent.ypos + offset,
            VerticalAnchor::Bottom(offset) => {
                (parent.ypos + parent.height).saturating_sub(height + offset)
            }
            VerticalAnchor::Cursor(offset) => match cursor {
                Some(point) => (point.y as isize + offset).max(0) as usize,
                None => parent.ypos,
            },
            VerticalAnchor::Center => {
                parent.ypos + parent.height.saturating_sub(height) / 2
            }
        };
        WritePosition::new(x, y, width, height)
    }
}

impl Container for FloatContainer {
    fn preferred_width(&self, max_available: usize) -> Dimension {
        self.base.preferred_width(max_available)
    }

    fn preferred_height(&self, width: usize, max_available: usize) -> Dimension {
        self.base.preferred_height(width, max_available)
    }

    fn write_to_screen(&self, screen: &mut Screen, position: WritePosition) {
        self.base.write_to_screen(screen, position);
        for float in &self.floats {
            let resolved = self.resolve_float(float, position, screen);
            let mut scratch = Screen::new(resolved.width, resolved.height);
            float
                .content
                .write_to_screen(&mut scratch, WritePosition::new(0, 0, resolved.width, resolved.height));
            let cells: Vec<(Point, Char)> = scratch
                .drawn_cells()
                .map(|(point, c)| (*point, c.clone()))
                .collect();
            screen.queue_float(Point::new(resolved.xpos, resolved.ypos), float.z_index.max(1), cells);
        }
    }
}

/// Wraps a child, only laying it out (and giving it space) while a filter
/// evaluates to true; otherwise it contributes zero space.
pub struct ConditionalContainer {
    content: Box<dyn Container>,
    filter: crate::filter::Filter,
}

impl ConditionalContainer {
    /// Gate `content` behind `filter`.
    pub fn new(content: Box<dyn Container>, filter: crate::filter::Filter) -> Self {
        Self { content, filter }
    }
}

impl Container for ConditionalContainer {
    fn preferred_width(&self, max_available: usize) -> Dimension {
        if self.filter.invoke() {
            self.content.preferred_width(max_available)
        } else {
            Dimension::exact(0)
        }
    }

    fn preferred_height(&self, width: usize, max_available: usize) -> Dimension {
        if self.filter.invoke() {
            self.content.preferred_height(width, max_available)
        } else {
            Dimension::exact(0)
        }
    }

    fn write_to_screen(&self, screen: &mut Screen, position: WritePosition) {
        if self.filter.invoke() {
            self.content.write_to_screen(screen, position);
        }
    }
}

/// Resolves to a different container on every layout pass, for content
/// whose structure (not just visibility) changes at runtime.
pub struct DynamicContainer {
    get: Box<dyn Fn() -> Box<dyn Container> + Send + Sync>,
}

impl DynamicContainer {
    /// `get` is called once per layout pass to resolve the current child.
    pub fn new(get: impl Fn() -> Box<dyn Container> + Send + Sync + 'static) -> Self {
        Self { get: Box::new(get) }
    }
}

impl Container for DynamicContainer {
    fn preferred_width(&self, max_available: usize) -> Dimension {
        (self.get)().preferred_width(max_available)
    }

    fn preferred_height(&self, width: usize, max_available: usize) -> Dimension {
        (self.get)().preferred_height(width, max_available)
    }

    fn write_to_screen(&self, screen: &mut Screen, position: WritePosition) {
        (self.get)().write_to_screen(screen, position);
    }
}

/// A leaf container of a fixed size, useful for tests and as a building
/// block for controls that manage their own rendering.
pub struct FixedSize {
    size: Size,
}

impl FixedSize {
    /// A leaf that always reports exactly `size`.
    pub fn new(size: Size) -> Self {
        Self { size }
    }
}

impl Container for FixedSize {
    fn preferred_width(&self, _max_available: usize) -> Dimension {
        Dimension::exact(self.size.width)
    }

    fn preferred_height(&self, _width: usize, _max_available: usize) -> Dimension {
        Dimension::exact(self.size.height)
    }

    fn write_to_screen(&self, _screen: &mut Screen, _position: WritePosition) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dim(min: usize, max: usize, preferred: usize, weight: usize) -> Dimension {
        Dimension::new(min, max, preferred, weight)
    }

    /// A leaf that fills its assigned rectangle with a fixed character,
    /// used where a test needs to observe that something was actually
    /// drawn (unlike [`FixedSize`], which only reports dimensions).
    struct FilledBox {
        size: Size,
        fill: char,
    }

    impl FilledBox {
        fn new(size: Size, fill: char) -> Self {
            Self { size, fill }
        }
    }

    impl Container for FilledBox {
        fn preferred_width(&self, _max_available: usize) -> Dimension {
            Dimension::exact(self.size.width)
        }

        fn preferred_height(&self, _width: usize, _max_available: usize) -> Dimension {
            Dimension::exact(self.size.height)
        }

        fn write_to_screen(&self, screen: &mut Screen, position: WritePosition) {
            for y in 0..position.height {
                for x in 0..position.width {
                    screen.set_char(
                        Point::new(position.xpos + x, position.ypos + y),
                        Char::new(self.fill, crate::style::Style::new()),
                    );
                }
            }
        }
    }

    #[test]
    fn divide_space_exact_fit() {
        let dims = vec![dim(0, 100, 5, 1), dim(0, 100, 5, 1)];
        let sizes = divide_space(&dims, 10).unwrap();
        assert_eq!(sizes, vec![5, 5]);
    }

    #[test]
    fn divide_space_respects_weight_when_growing_past_preferred() {
        let dims = vec![dim(0, 100, 1, 1), dim(0, 100, 1, 3)];
        let sizes = divide_space(&dims, 10).unwrap();
        assert_eq!(sizes.iter().sum::<usize>(), 10);
        // The heavier-weighted child should end up with strictly more
        // space once both are past their preferred size.
        assert!(sizes[1] > sizes[0]);
    }

    #[test]
    fn divide_space_none_when_minimums_exceed_available() {
        let dims = vec![dim(20, 100, 20, 1), dim(20, 100, 20, 1)];
        assert_eq!(divide_space(&dims, 30), None);
    }

    #[test]
    fn divide_space_deterministic_tie_break() {
        let dims = vec![dim(0, 100, 0, 1), dim(0, 100, 0, 1), dim(0, 100, 0, 1)];
        let a = divide_space(&dims, 10);
        let b = divide_space(&dims, 10);
        assert_eq!(a, b);
    }

    #[test]
    fn divide_space_empty() {
        assert_eq!(divide_space(&[], 10), Some(Vec::<usize>::new()));
    }

    #[test]
    fn divide_space_leftover_goes_to_last() {
        let dims = vec![dim(0, 2, 2, 1), dim(0, 2, 2, 1)];
        let sizes = divide_space(&dims, 10).unwrap();
        assert_eq!(sizes.iter().sum::<usize>(), 10);
        assert_eq!(sizes[0], 2);
        assert_eq!(sizes[1], 8);
    }

    #[test]
    fn hsplit_divides_width() {
        let a = Box::new(FixedSize::new(Size::new(5, 1)));
        let b = Box::new(FixedSize::new(Size::new(5, 1)));
        let split = HSplit::new(vec![a, b]);
        let mut screen = Screen::new(20, 5);
        split.write_to_screen(&mut screen, WritePosition::new(0, 0, 20, 5));
    }

    #[test]
    fn conditional_container_zero_space_when_hidden() {
        let inner = Box::new(FixedSize::new(Size::new(5, 1)));
        let cond = ConditionalContainer::new(inner, crate::filter::Filter::never());
        assert_eq!(cond.preferred_width(100).preferred, 0);
    }

    #[test]
    fn float_resolves_bottom_right_anchor() {
        let content = Box::new(FixedSize::new(Size::new(4, 2)));
        let float = Float {
            horizontal: HorizontalAnchor::Right(0),
            vertical: VerticalAnchor::Bottom(0),
            z_index: 0,
            cursor_window: None,
            content,
        };
        let base = Box::new(FixedSize::new(Size::new(0, 0)));
        let container = FloatContainer::new(base, vec![float]);
        let parent = WritePosition::new(0, 0, 10, 10);
        let screen = Screen::new(10, 10);
        let resolved = container.resolve_float(&container.floats[0], parent, &screen);
        assert_eq!(resolved.xpos, 6);
        assert_eq!(resolved.ypos, 8);
    }

    #[test]
    fn float_with_no_registered_cursor_falls_back_to_parent_origin() {
        let content = Box::new(FixedSize::new(Size::new(4, 2)));
        let float = Float {
            horizontal: HorizontalAnchor::Cursor(0),
            vertical: VerticalAnchor::Cursor(1),
            z_index: 0,
            cursor_window: Some(42),
            content,
        };
        let base = Box::new(FixedSize::new(Size::new(0, 0)));
        let container = FloatContainer::new(base, vec![float]);
        let parent = WritePosition::new(2, 3, 10, 10);
        let screen = Screen::new(10, 10);
        let resolved = container.resolve_float(&container.floats[0], parent, &screen);
        assert_eq!(resolved.xpos, parent.xpos);
        assert_eq!(resolved.ypos, parent.ypos);
    }

    #[test]
    fn float_anchors_to_registered_cursor_position() {
        let content = Box::new(FixedSize::new(Size::new(4, 1)));
        let float = Float {
            horizontal: HorizontalAnchor::Cursor(0),
            vertical: VerticalAnchor::Cursor(1),
            z_index: 0,
            cursor_window: Some(7),
            content,
        };
        let base = Box::new(FixedSize::new(Size::new(0, 0)));
        let container = FloatContainer::new(base, vec![float]);
        let parent = WritePosition::new(0, 0, 10, 10);
        let mut screen = Screen::new(10, 10);
        screen.set_cursor_position(7, crate::primitives::Point::new(3, 4));
        let resolved = container.resolve_float(&container.floats[0], parent, &screen);
        assert_eq!(resolved.xpos, 3);
        assert_eq!(resolved.ypos, 5);
    }

    #[test]
    fn float_container_queues_floats_instead_of_drawing_immediately() {
        let base = Box::new(FixedSize::new(Size::new(0, 0)));
        let content = Box::new(FilledBox::new(Size::new(2, 1), 'x'));
        let float = Float {
            horizontal: HorizontalAnchor::Left(0),
            vertical: VerticalAnchor::Top(0),
            z_index: -5,
            cursor_window: None,
            content,
        };
        let container = FloatContainer::new(base, vec![float]);
        let mut screen = Screen::new(5, 5);
        container.write_to_screen(&mut screen, WritePosition::new(0, 0, 5, 5));
        // a negative z-index is normalized to 1 and only lands on the
        // base grid once `flush_floats` runs.
        assert_eq!(screen.get_char(Point::new(0, 0)).display(), " ");
        screen.flush_floats();
        assert_ne!(screen.get_char(Point::new(0, 0)).display(), " ");
    }
}
