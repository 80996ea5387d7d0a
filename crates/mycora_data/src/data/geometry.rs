use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// A grid position, or a 2-D integer vector held in a VM register.
///
/// `x` is the column and `y` the row. Coordinates are unbounded here; the
/// arena folds them onto the torus when it dereferences them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const ZERO: Coord = Coord { x: 0, y: 0 };

    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    /// Folds the coordinate onto a `width` x `height` torus.
    #[must_use]
    pub fn wrap(self, width: u16, height: u16) -> Self {
        Self {
            x: self.x.rem_euclid(i32::from(width.max(1))),
            y: self.y.rem_euclid(i32::from(height.max(1))),
        }
    }
}

impl Add for Coord {
    type Output = Coord;

    fn add(self, rhs: Coord) -> Coord {
        Coord::new(self.x.wrapping_add(rhs.x), self.y.wrapping_add(rhs.y))
    }
}

impl Sub for Coord {
    type Output = Coord;

    fn sub(self, rhs: Coord) -> Coord {
        Coord::new(self.x.wrapping_sub(rhs.x), self.y.wrapping_sub(rhs.y))
    }
}

impl Mul<i32> for Coord {
    type Output = Coord;

    fn mul(self, rhs: i32) -> Coord {
        Coord::new(self.x.wrapping_mul(rhs), self.y.wrapping_mul(rhs))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Width and height of a rectangular block of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Extent {
    pub width: u16,
    pub height: u16,
}

impl Extent {
    #[must_use]
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Number of cells covered.
    #[must_use]
    pub fn area(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.area() == 0
    }

    /// Interprets a register value as a size; non-positive components
    /// yield `None`.
    #[must_use]
    pub fn from_coord(c: Coord) -> Option<Self> {
        let width = u16::try_from(c.x).ok().filter(|w| *w > 0)?;
        let height = u16::try_from(c.y).ok().filter(|h| *h > 0)?;
        Some(Self { width, height })
    }
}

/// Axis-aligned rectangle on the arena. May straddle the wrap seam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Coord,
    pub extent: Extent,
}

impl Rect {
    #[must_use]
    pub const fn new(origin: Coord, extent: Extent) -> Self {
        Self { origin, extent }
    }

    #[must_use]
    pub fn area(&self) -> usize {
        self.extent.area()
    }

    /// Unwrapped coordinate of the `index`-th cell in row-major order.
    #[must_use]
    pub fn offset(&self, index: usize) -> Coord {
        let w = usize::from(self.extent.width.max(1));
        let dx = (index % w) as i32;
        let dy = (index / w) as i32;
        self.origin + Coord::new(dx, dy)
    }

    /// Row-major iteration over the (unwrapped) cells of the rectangle.
    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.area()).map(move |i| self.offset(i))
    }

    /// Row-major index of `coord` inside the rectangle on a
    /// `width` x `height` torus, if it lies inside.
    #[must_use]
    pub fn index_of(&self, coord: Coord, width: u16, height: u16) -> Option<usize> {
        let rel = (coord.wrap(width, height) - self.origin.wrap(width, height)).wrap(width, height);
        let (dx, dy) = (rel.x as usize, rel.y as usize);
        if dx < usize::from(self.extent.width) && dy < usize::from(self.extent.height) {
            Some(dy * usize::from(self.extent.width) + dx)
        } else {
            None
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}x{}",
            self.origin, self.extent.width, self.extent.height
        )
    }
}

/// Direction an instruction pointer travels in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Heading {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

impl Heading {
    /// Unit step along this heading (rows grow downwards).
    #[must_use]
    pub fn delta(self) -> Coord {
        match self {
            Heading::Up => Coord::new(0, -1),
            Heading::Down => Coord::new(0, 1),
            Heading::Left => Coord::new(-1, 0),
            Heading::Right => Coord::new(1, 0),
        }
    }

    /// Length of `extent` measured along this heading.
    #[must_use]
    pub fn span(self, extent: Extent) -> i32 {
        match self {
            Heading::Up | Heading::Down => i32::from(extent.height),
            Heading::Left | Heading::Right => i32::from(extent.width),
        }
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Heading::Up => "up",
            Heading::Down => "down",
            Heading::Left => "left",
            Heading::Right => "right",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_negative_coordinates() {
        let c = Coord::new(-1, -11).wrap(10, 10);
        assert_eq!(c, Coord::new(9, 9));
    }

    #[test]
    fn test_rect_offset_is_row_major() {
        let r = Rect::new(Coord::new(2, 3), Extent::new(3, 2));
        let cells: Vec<_> = r.cells().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], Coord::new(2, 3));
        assert_eq!(cells[2], Coord::new(4, 3));
        assert_eq!(cells[3], Coord::new(2, 4));
    }

    #[test]
    fn test_index_of_across_seam() {
        let r = Rect::new(Coord::new(8, 0), Extent::new(4, 1));
        assert_eq!(r.index_of(Coord::new(9, 0), 10, 10), Some(1));
        assert_eq!(r.index_of(Coord::new(1, 0), 10, 10), Some(3));
        assert_eq!(r.index_of(Coord::new(2, 0), 10, 10), None);
    }

    #[test]
    fn test_index_of_far_out_of_range_coord() {
        let r = Rect::new(Coord::new(8, 0), Extent::new(1, 1));
        // i32::MIN folds to column 2 on a width-10 torus, not column 8.
        assert_eq!(r.index_of(Coord::new(i32::MIN, 0), 10, 10), None);
        assert_eq!(r.index_of(Coord::new(i32::MIN + 6, 0), 10, 10), Some(0));
        assert_eq!(r.index_of(Coord::new(i32::MAX, 0), 10, 10), None);
    }

    #[test]
    fn test_extent_from_coord_rejects_non_positive() {
        assert_eq!(Extent::from_coord(Coord::new(3, 1)), Some(Extent::new(3, 1)));
        assert_eq!(Extent::from_coord(Coord::ZERO), None);
        assert_eq!(Extent::from_coord(Coord::new(-2, 4)), None);
    }
}
