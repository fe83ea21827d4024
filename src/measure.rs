//! Planar distance and angle measurements between landmarks.
//!
//! All functions take integer pixel points in image coordinates (Y pointing down) and accept
//! anything convertible to `(i32, i32)`, including [`LandmarkPoint`].
//!
//! [`LandmarkPoint`]: crate::landmark::LandmarkPoint

type Point = (i32, i32);

/// Euclidean distance between two points, with the segment's endpoints and midpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distance {
    length: f64,
    start: Point,
    end: Point,
    midpoint: Point,
}

impl Distance {
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    /// Returns the integer midpoint of the segment, with coordinates rounded towards negative
    /// infinity.
    pub fn midpoint(&self) -> Point {
        self.midpoint
    }
}

/// Measures the planar distance between `p1` and `p2`.
pub fn distance(p1: impl Into<Point>, p2: impl Into<Point>) -> Distance {
    let (start, end) = (p1.into(), p2.into());
    let dx = f64::from(end.0) - f64::from(start.0);
    let dy = f64::from(end.1) - f64::from(start.1);
    Distance {
        length: dx.hypot(dy),
        start,
        end,
        midpoint: (midpoint(start.0, end.0), midpoint(start.1, end.1)),
    }
}

fn midpoint(a: i32, b: i32) -> i32 {
    // The mean of two `i32`s always fits back into an `i32`.
    (i64::from(a) + i64::from(b)).div_euclid(2) as i32
}

/// An angle at a vertex, in degrees, together with the three points it was measured from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Angle {
    degrees: f64,
    points: [Point; 3],
}

impl Angle {
    /// Returns the angle in degrees, in range `[0, 360)`.
    pub fn degrees(&self) -> f64 {
        self.degrees
    }

    /// Returns the `[p1, vertex, p3]` points the angle was measured from.
    pub fn points(&self) -> [Point; 3] {
        self.points
    }

    /// Returns the vertex point.
    pub fn vertex(&self) -> Point {
        self.points[1]
    }

    /// Shorthand for [`angle_in_range`] on this angle.
    pub fn in_range(&self, target: f64, tolerance: f64) -> bool {
        angle_in_range(self.degrees, target, tolerance)
    }
}

/// Measures the angle at `p2` from the arm `p2 -> p1` to the arm `p2 -> p3`.
///
/// The angle is the difference of the arms' directions (`atan2(p3 - p2) - atan2(p1 - p2)`),
/// normalized to `[0, 360)`. Since image Y points down, a positive result turns clockwise on
/// screen. Swapping `p1` and `p3` yields `360 - angle` (or 0 for a straight-through angle).
///
/// If `p1` or `p3` coincides with `p2`, the corresponding direction is 0 as defined by `atan2`.
pub fn angle(p1: impl Into<Point>, p2: impl Into<Point>, p3: impl Into<Point>) -> Angle {
    let points = [p1.into(), p2.into(), p3.into()];
    let [(x1, y1), (x2, y2), (x3, y3)] = points.map(|(x, y)| (f64::from(x), f64::from(y)));

    let mut degrees = ((y3 - y2).atan2(x3 - x2) - (y1 - y2).atan2(x1 - x2)).to_degrees();
    if degrees < 0.0 {
        degrees += 360.0;
    }
    if degrees >= 360.0 {
        degrees -= 360.0;
    }
    Angle { degrees, points }
}

/// Returns whether `measured` lies strictly within `tolerance` degrees of `target`.
///
/// This is a plain interval test: it does not wrap around 0/360, so a measurement of 5 degrees is
/// not considered close to a target of 355 degrees.
pub fn angle_in_range(measured: f64, target: f64, tolerance: f64) -> bool {
    target - tolerance < measured && measured < target + tolerance
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::landmark::LandmarkPoint;

    #[test]
    fn pythagorean_distance() {
        let d = distance((0, 0), (3, 4));
        assert_eq!(d.length(), 5.0);
        assert_eq!(d.midpoint(), (1, 2));
        assert_eq!(d.start(), (0, 0));
        assert_eq!(d.end(), (3, 4));
    }

    #[test]
    fn distance_properties() {
        let a = LandmarkPoint::new(-7, 12, 99);
        let b = LandmarkPoint::new(31, -5, -4);
        assert_eq!(distance(a, b).length(), distance(b, a).length());
        assert_eq!(distance(a, a).length(), 0.0);
        assert_eq!(distance(a, a).midpoint(), a.xy());

        // Midpoint rounds towards negative infinity.
        assert_eq!(distance((-3, 0), (0, 1)).midpoint(), (-2, 0));
    }

    #[test]
    fn extreme_coordinates() {
        let d = distance((i32::MAX, 0), (i32::MAX - 2, 0));
        assert_eq!(d.midpoint(), (i32::MAX - 1, 0));
        assert_eq!(d.length(), 2.0);

        let d = distance((i32::MIN, i32::MIN), (i32::MAX, i32::MAX));
        assert_eq!(d.midpoint(), (-1, -1));
        assert_relative_eq!(d.length(), f64::from(u32::MAX) * 2f64.sqrt());

        let a = angle((i32::MAX, 0), (i32::MIN, 0), (i32::MIN, i32::MAX));
        assert_relative_eq!(a.degrees(), 90.0);
    }

    #[test]
    fn right_angle() {
        let a = angle((1, 0), (0, 0), (0, 1));
        assert_relative_eq!(a.degrees(), 90.0);
        assert_eq!(a.vertex(), (0, 0));
        assert_relative_eq!(angle((0, 1), (0, 0), (1, 0)).degrees(), 270.0);
        assert_relative_eq!(angle((-1, 0), (0, 0), (1, 0)).degrees(), 180.0);
        assert_eq!(angle((1, 0), (0, 0), (2, 0)).degrees(), 0.0);
    }

    #[test]
    fn degenerate_arms() {
        // atan2(0, 0) is 0, so the coincident arm points along +X.
        assert_relative_eq!(angle((0, 0), (0, 0), (0, 5)).degrees(), 90.0);
        assert_eq!(angle((3, 3), (3, 3), (3, 3)).degrees(), 0.0);
    }

    #[test]
    fn range_check_does_not_wrap() {
        assert!(!angle_in_range(5.0, 350.0, 20.0));
        assert!(angle_in_range(350.0, 355.0, 15.0));
        assert!(angle((1, 0), (0, 0), (0, 1)).in_range(90.0, 10.0));
        // Bounds are exclusive.
        assert!(!angle_in_range(100.0, 90.0, 10.0));
        assert!(!angle_in_range(80.0, 90.0, 10.0));
    }

    #[test]
    fn random_angles_in_range() {
        let mut rng = fastrand::Rng::with_seed(0x5157);
        for _ in 0..1000 {
            let mut point = || (rng.i32(-1000..1000), rng.i32(-1000..1000));
            let (p1, p2, p3) = (point(), point(), point());
            let deg = angle(p1, p2, p3).degrees();
            assert!((0.0..360.0).contains(&deg), "{p1:?} {p2:?} {p3:?} -> {deg}");

            let d = distance(p1, p3);
            assert!(d.length() >= 0.0);
            assert_eq!(d.length(), distance(p3, p1).length());
        }
    }
}
