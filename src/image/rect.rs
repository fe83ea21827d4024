use std::{cmp, fmt};

use embedded_graphics::prelude::*;

/// An axis-aligned rectangle.
///
/// This rectangle type uses (signed) integer coordinates and is meant to be used with the
/// [`crate::image`] module.
///
/// Rectangles are allowed to have zero height and/or width.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub(crate) rect: embedded_graphics::primitives::Rectangle,
}

impl Rect {
    /// Creates a rectangle extending downwards and right from a point.
    #[inline]
    pub fn from_top_left(top_left_x: i32, top_left_y: i32, width: u32, height: u32) -> Self {
        Self {
            rect: embedded_graphics::primitives::Rectangle {
                top_left: Point {
                    x: top_left_x,
                    y: top_left_y,
                },
                size: Size { width, height },
            },
        }
    }

    /// Creates a rectangle from two opposing corner points.
    ///
    /// Both corners are *included* in the rectangle, so passing the same point twice yields a 1x1
    /// rectangle. The corners may be passed in any order.
    pub fn from_corners(a: (i32, i32), b: (i32, i32)) -> Self {
        Self::span_inner(
            cmp::min(a.0, b.0),
            cmp::min(a.1, b.1),
            cmp::max(a.0, b.0),
            cmp::max(a.1, b.1),
        )
    }

    /// Computes the (axis-aligned) bounding rectangle that encompasses `points`.
    ///
    /// Like [`Rect::from_corners`], the extreme points are included, so the rectangle is one pixel
    /// wider and taller than the coordinate difference.
    ///
    /// Returns `None` if `points` is an empty iterator.
    pub fn bounding<I: IntoIterator<Item = (i32, i32)>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();

        let (x, y) = iter.next()?;
        let (mut x_min, mut x_max, mut y_min, mut y_max) = (x, x, y, y);

        for (x, y) in iter {
            x_min = cmp::min(x_min, x);
            x_max = cmp::max(x_max, x);
            y_min = cmp::min(y_min, y);
            y_max = cmp::max(y_max, y);
        }

        Some(Self::span_inner(x_min, y_min, x_max, y_max))
    }

    fn span_inner(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Self {
        Self::from_top_left(
            x_min,
            y_min,
            x_max.abs_diff(x_min) + 1,
            y_max.abs_diff(y_min) + 1,
        )
    }

    /// Returns the X coordinate of the left side of the rectangle.
    #[inline]
    pub fn x(&self) -> i32 {
        self.rect.top_left.x
    }

    /// Returns the Y coordinate of the top side of the rectangle.
    #[inline]
    pub fn y(&self) -> i32 {
        self.rect.top_left.y
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.rect.size.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.rect.size.height
    }

    pub fn center(&self) -> (i32, i32) {
        (
            self.x() + (self.width() / 2) as i32,
            self.y() + (self.height() / 2) as i32,
        )
    }

    #[must_use]
    pub fn move_by(&self, x: i32, y: i32) -> Rect {
        Rect::from_top_left(self.x() + x, self.y() + y, self.width(), self.height())
    }

    /// Returns whether `self` contains `other`.
    ///
    /// Every rectangle contains itself. A zero-sized `other` is contained if its position lies
    /// within or on the border of `self`.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        self.x() <= other.x()
            && self.y() <= other.y()
            && i64::from(self.x()) + i64::from(self.width())
                >= i64::from(other.x()) + i64::from(other.width())
            && i64::from(self.y()) + i64::from(self.height())
                >= i64::from(other.y()) + i64::from(other.height())
    }
}

impl fmt::Debug for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x, y, w, h) = (self.x(), self.y(), self.width(), self.height());
        let bx = i64::from(x) + i64::from(w);
        let by = i64::from(y) + i64::from(h);
        write!(f, "Rect @ ({x},{y})-({bx},{by})/{w}x{h}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_rect() {
        let outer = Rect::from_top_left(-8, -8, 16, 16);
        assert!(outer.contains_rect(&outer));
        assert!(outer.contains_rect(&Rect::from_top_left(-8, -8, 15, 15)));
        assert!(outer.contains_rect(&Rect::from_top_left(-7, -7, 15, 15)));
        assert!(!outer.contains_rect(&Rect::from_top_left(-7, -8, 16, 16)));
        assert!(!outer.contains_rect(&Rect::from_top_left(-8, -8, 17, 16)));
        assert!(!outer.contains_rect(&Rect::from_top_left(-9, -8, 10, 10)));
        assert!(outer.contains_rect(&Rect::from_top_left(8, 8, 0, 0)));
    }

    #[test]
    fn test_bounding() {
        assert_eq!(
            Rect::bounding([(0, 0), (1, 1), (-1, -1)]).unwrap(),
            Rect::from_corners((-1, -1), (1, 1)),
        );
        assert_eq!(
            Rect::bounding([(1, 1), (2, 2)]).unwrap(),
            Rect::from_top_left(1, 1, 2, 2),
        );
        assert_eq!(Rect::bounding(Vec::<(i32, i32)>::new()), None);
    }

    #[test]
    fn test_corners_any_order() {
        assert_eq!(
            Rect::from_corners((4, 0), (0, 9)),
            Rect::from_top_left(0, 0, 5, 10),
        );
        assert_eq!(Rect::from_top_left(8, 8, 5, 4).center(), (10, 10));
    }
}
