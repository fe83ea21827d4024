//! Contour extraction and shape filtering.
//!
//! [`ContourFilter::find`] extracts the outer contours of all foreground regions (nonzero pixels)
//! of a preprocessed single-channel image, for example a thresholded or edge-detected frame, and
//! filters them by enclosed area and by the number of corners of their simplified polygon.
//!
//! ```
//! use image::{GrayImage, Luma};
//! use sightline::contour::ContourFilter;
//!
//! let mut mask = GrayImage::new(100, 100);
//! for y in 10..=50 {
//!     for x in 10..=60 {
//!         mask.put_pixel(x, y, Luma([255]));
//!     }
//! }
//!
//! let rectangles = ContourFilter::default().with_corners(4).find(&mask);
//! assert_eq!(rectangles.len(), 1);
//! assert_eq!(rectangles[0].area(), 2000.0);
//! ```

use image::GrayImage;
use imageproc::contours::{self, BorderType};

use crate::{bbox::BoundingBox, image::Rect};

type Point = (i32, i32);

/// Fraction of the contour perimeter used as the polygon simplification tolerance.
const APPROX_EPSILON: f64 = 0.02;

/// A closed contour that passed a [`ContourFilter`].
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    points: Vec<Point>,
    polygon: Vec<Point>,
    area: f64,
    bbox: BoundingBox,
}

impl Contour {
    /// Returns the traced border points.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Returns the simplified polygon. Its length is the corner count.
    pub fn polygon(&self) -> &[Point] {
        &self.polygon
    }

    pub fn corners(&self) -> usize {
        self.polygon.len()
    }

    /// Returns the area enclosed by the traced border.
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Returns the bounding box of the simplified polygon.
    ///
    /// Unlike entity boxes, this box includes its extreme pixels: a polygon spanning `x = 10..=60`
    /// has a width of 51.
    pub fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }

    pub fn center(&self) -> (i32, i32) {
        self.bbox.center()
    }
}

/// Filters contours by area and shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContourFilter {
    min_area: f64,
    corners: usize,
    sort: bool,
}

impl Default for ContourFilter {
    fn default() -> Self {
        Self {
            min_area: 1000.0,
            corners: 0,
            sort: true,
        }
    }
}

impl ContourFilter {
    /// Sets the area a contour has to *exceed* to be kept.
    #[must_use]
    pub fn with_min_area(mut self, min_area: f64) -> Self {
        self.min_area = min_area;
        self
    }

    /// Keeps only contours whose simplified polygon has exactly `corners` corners.
    ///
    /// 0 disables this check.
    #[must_use]
    pub fn with_corners(mut self, corners: usize) -> Self {
        self.corners = corners;
        self
    }

    /// Sets whether the result is ordered by decreasing area.
    ///
    /// Contours with equal area keep the order in which they were found.
    #[must_use]
    pub fn with_sort(mut self, sort: bool) -> Self {
        self.sort = sort;
        self
    }

    pub fn min_area(&self) -> f64 {
        self.min_area
    }

    pub fn corners(&self) -> usize {
        self.corners
    }

    pub fn sort(&self) -> bool {
        self.sort
    }

    /// Extracts the outer contours of `image` and filters them.
    pub fn find(&self, image: &GrayImage) -> Vec<Contour> {
        self.filter(external_contours(image))
    }

    /// Filters already extracted closed contours, given in discovery order.
    pub fn filter<I>(&self, raw: I) -> Vec<Contour>
    where
        I: IntoIterator<Item = Vec<Point>>,
    {
        let mut total = 0;
        let mut found = Vec::new();
        for points in raw {
            total += 1;
            let area = contour_area(&points);
            if area <= self.min_area {
                continue;
            }

            let epsilon = APPROX_EPSILON * arc_length(&points);
            let polygon = approximate_polygon(&points, epsilon);
            if self.corners != 0 && polygon.len() != self.corners {
                continue;
            }

            let Some(rect) = Rect::bounding(polygon.iter().copied()) else {
                continue;
            };
            found.push(Contour {
                points,
                polygon,
                area,
                bbox: rect.into(),
            });
        }

        if self.sort {
            // `sort_by` is stable, so equal areas keep discovery order.
            found.sort_by(|a, b| b.area.total_cmp(&a.area));
        }
        log::debug!("kept {} of {} contours ({:?})", found.len(), total, self);
        found
    }
}

/// Traces the outer borders of all foreground regions of `image`.
///
/// Borders of holes, and regions nested inside holes of other regions, are skipped.
pub fn external_contours(image: &GrayImage) -> Vec<Vec<Point>> {
    contours::find_contours::<i32>(image)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .map(|c| c.points.into_iter().map(|p| (p.x, p.y)).collect())
        .collect()
}

/// Computes the area enclosed by a closed polygon using the shoelace formula.
///
/// The result does not depend on the orientation of the polygon.
pub fn contour_area(points: &[Point]) -> f64 {
    let twice: i128 = closed_edges(points)
        .map(|((x0, y0), (x1, y1))| {
            i128::from(x0) * i128::from(y1) - i128::from(x1) * i128::from(y0)
        })
        .sum();
    twice.abs() as f64 / 2.0
}

/// Computes the perimeter of a closed polygon.
pub fn arc_length(points: &[Point]) -> f64 {
    closed_edges(points)
        .map(|((x0, y0), (x1, y1))| {
            (f64::from(x1) - f64::from(x0)).hypot(f64::from(y1) - f64::from(y0))
        })
        .sum()
}

fn closed_edges(points: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
    points
        .iter()
        .copied()
        .zip(points.iter().copied().cycle().skip(1))
}

/// Simplifies a closed polygon with the Douglas-Peucker algorithm.
///
/// Points deviating less than `epsilon` from the simplified outline are removed. The polygon is
/// split at the first point and the point farthest away from it, and both halves are simplified
/// separately. The first point is always kept.
pub fn approximate_polygon(points: &[Point], epsilon: f64) -> Vec<Point> {
    let Some(&first) = points.first() else {
        return Vec::new();
    };
    if points.len() <= 2 {
        return points.to_vec();
    }

    let dist_sq = |(x, y): Point| {
        let (dx, dy) = (
            u128::from(x.abs_diff(first.0)),
            u128::from(y.abs_diff(first.1)),
        );
        dx * dx + dy * dy
    };
    let mut far = 0;
    for (i, &p) in points.iter().enumerate() {
        if dist_sq(p) > dist_sq(points[far]) {
            far = i;
        }
    }
    if far == 0 {
        return vec![first];
    }

    let mut out = vec![first];
    douglas_peucker(&points[..=far], epsilon, &mut out);
    let back = points[far..]
        .iter()
        .copied()
        .chain([first])
        .collect::<Vec<_>>();
    douglas_peucker(&back, epsilon, &mut out);
    // The second half ends where the first one started.
    out.pop();
    out
}

/// Appends the simplified version of `points` to `out`, excluding `points[0]`.
fn douglas_peucker(points: &[Point], epsilon: f64, out: &mut Vec<Point>) {
    if points.len() < 3 {
        out.extend(points.iter().skip(1));
        return;
    }

    let (start, end) = (points[0], points[points.len() - 1]);
    let mut max_dist = 0.0;
    let mut max_idx = 0;
    for (i, &p) in points.iter().enumerate().take(points.len() - 1).skip(1) {
        let dist = perpendicular_distance(p, start, end);
        if dist > max_dist {
            max_dist = dist;
            max_idx = i;
        }
    }

    if max_dist > epsilon {
        douglas_peucker(&points[..=max_idx], epsilon, out);
        douglas_peucker(&points[max_idx..], epsilon, out);
    } else {
        out.push(end);
    }
}

fn perpendicular_distance(p: Point, start: Point, end: Point) -> f64 {
    let (px, py) = (f64::from(p.0), f64::from(p.1));
    let (x0, y0) = (f64::from(start.0), f64::from(start.1));
    let (x1, y1) = (f64::from(end.0), f64::from(end.1));
    let (dx, dy) = (x1 - x0, y1 - y0);
    let len = dx.hypot(dy);
    if len == 0.0 {
        return (px - x0).hypot(py - y0);
    }
    (dy * px - dx * py + x1 * y0 - y1 * x0).abs() / len
}
