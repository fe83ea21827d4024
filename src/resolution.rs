//! Types for representing image resolutions.

use std::fmt;

use crate::image::Rect;

/// Resolution (`width x height`) of a frame or image.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    width: u32,
    height: u32,
}

impl Resolution {
    /// Creates a new [`Resolution`] of `width x height`.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns the width of this [`Resolution`].
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of this [`Resolution`].
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns a [`Rect`] positioned at `(0, 0)` that covers this resolution.
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_top_left(0, 0, self.width, self.height)
    }

    /// Scales both dimensions by `factor`, rounding to the nearest pixel.
    pub fn scale(&self, factor: f32) -> Resolution {
        let width = (self.width as f32 * factor).round() as u32;
        let height = (self.height as f32 * factor).round() as u32;
        Resolution::new(width, height)
    }
}

impl From<(u32, u32)> for Resolution {
    #[inline]
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Resolution::new(1920, 1080).to_string(), "1920x1080");
        assert_eq!(format!("{:?}", Resolution::new(3, 4)), "3x4");
    }

    #[test]
    fn test_scale() {
        assert_eq!(Resolution::new(1920, 1080).scale(0.5), Resolution::new(960, 540));
        assert_eq!(Resolution::new(3, 3).scale(0.5), Resolution::new(2, 2));
        assert_eq!(Resolution::new(640, 480).scale(1.0), Resolution::new(640, 480));
    }

    #[test]
    fn test_rect() {
        let rect = Resolution::new(16, 9).rect();
        assert_eq!(rect, Rect::from_top_left(0, 0, 16, 9));
    }
}
