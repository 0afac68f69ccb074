//! Geometry and sizing primitives: [`Point`], [`Size`], [`WritePosition`],
//! [`Dimension`].

/// A position in terminal coordinates, `(x, y)` meaning `(column, row)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    /// Column (x coordinate).
    pub x: usize,
    /// Row (y coordinate).
    pub y: usize,
}

impl Point {
    /// Create a new point.
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl From<(usize, usize)> for Point {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}

/// A size in terminal cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    /// Width in columns.
    pub width: usize,
    /// Height in rows.
    pub height: usize,
}

impl Size {
    /// Create a new size.
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Returns true if either dimension is zero.
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// The absolute screen rectangle a window was assigned during layout.
///
/// Produced by the layout pass and consumed by [`crate::layout::window::Window`]
/// when it registers cursor/menu positions on the [`crate::screen::Screen`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct WritePosition {
    /// Column of the top-left cell.
    pub xpos: usize,
    /// Row of the top-left cell.
    pub ypos: usize,
    /// Width in columns.
    pub width: usize,
    /// Height in rows.
    pub height: usize,
}

impl WritePosition {
    /// Create a new write position.
    pub const fn new(xpos: usize, ypos: usize, width: usize, height: usize) -> Self {
        Self {
            xpos,
            ypos,
            width,
            height,
        }
    }

    /// Returns true if the given point falls within this rectangle.
    pub const fn contains(self, p: Point) -> bool {
        p.x >= self.xpos
            && p.x < self.xpos + self.width
            && p.y >= self.ypos
            && p.y < self.ypos + self.height
    }
}

/// A dimension request: minimum, maximum, preferred size, and a weight used
/// to distribute surplus space among siblings.
///
/// Invariant: `0 <= min <= preferred <= max` and `weight >= 1`. Constructors
/// clamp `preferred` into `[min, max]` rather than panicking, since a
/// momentarily-inconsistent request (e.g. a shrinking terminal) should
/// degrade gracefully rather than abort a render pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimension {
    /// Minimum acceptable size.
    pub min: usize,
    /// Maximum acceptable size.
    pub max: usize,
    /// Preferred size, used as the first growth target.
    pub preferred: usize,
    /// Relative weight when distributing surplus space among siblings.
    pub weight: usize,
}

impl Dimension {
    /// Create a dimension, clamping `preferred` into `[min, max]` and
    /// `weight` to be at least 1.
    pub fn new(min: usize, max: usize, preferred: usize, weight: usize) -> Self {
        let max = max.max(min);
        let preferred = preferred.clamp(min, max);
        Self {
            min,
            max,
            preferred,
            weight: weight.max(1),
        }
    }

    /// A dimension with no constraints: `min=0, max=usize::MAX`, preferred
    /// taken as given, weight 1.
    pub fn exact(amount: usize) -> Self {
        Self::new(amount, amount, amount, 1)
    }

    /// The default dimension: unconstrained, a middling preferred size.
    pub fn unspecified() -> Self {
        Self::new(0, usize::MAX, 1, 1)
    }
}

impl Default for Dimension {
    fn default() -> Self {
        Self::unspecified()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_from_tuple() {
        let p: Point = (5, 10).into();
        assert_eq!(p, Point::new(5, 10));
    }

    #[test]
    fn size_empty() {
        assert!(Size::new(0, 10).is_empty());
        assert!(!Size::new(1, 1).is_empty());
    }

    #[test]
    fn write_position_contains() {
        let wp = WritePosition::new(10, 10, 20, 20);
        assert!(wp.contains(Point::new(10, 10)));
        assert!(wp.contains(Point::new(29, 29)));
        assert!(!wp.contains(Point::new(30, 30)));
        assert!(!wp.contains(Point::new(9, 10)));
    }

    #[test]
    fn dimension_clamps_preferred() {
        let d = Dimension::new(5, 10, 20, 1);
        assert_eq!(d.preferred, 10);
        let d = Dimension::new(5, 10, 2, 1);
        assert_eq!(d.preferred, 5);
    }

    #[test]
    fn dimension_weight_at_least_one() {
        let d = Dimension::new(0, 10, 5, 0);
        assert_eq!(d.weight, 1);
    }

    #[test]
    fn dimension_exact() {
        let d = Dimension::exact(7);
        assert_eq!((d.min, d.max, d.preferred), (7, 7, 7));
    }
}
