//! Bounding box synthesis.
//!
//! Every entity type has its own anchor policy:
//!
//! - Hands span the minimum and maximum of all of their landmarks
//!   ([`BoundingBox::enclosing`]).
//! - Poses are anchored on shoulder or wrist landmarks horizontally and on a head and a foot
//!   landmark vertically, then padded by half the shoulder width ([`BoundingBox::around_pose`]).
//! - Faces reuse the relative box reported by the detection model, rescaled to pixels
//!   ([`BoundingBox::from_relative`]).
//!
//! [`EntityKind`] and [`synthesize`] dispatch between the policies.

use std::fmt;

use crate::{
    image::Rect,
    landmark::Landmarks,
    pose::PoseLandmarkIdx,
    resolution::Resolution,
    Error, Result,
};

/// An axis-aligned box in pixel coordinates.
///
/// Width and height are never negative. Boxes are recomputed from their entity on every call and
/// are not clipped to the frame: they may extend past its edges.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
}

impl BoundingBox {
    /// Creates a box from its top left corner and size.
    #[inline]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates the box that spans from `(x0, y0)` to `(x1, y1)`.
    ///
    /// The size is the plain coordinate difference (`|x1 - x0|`), so a box spanning a single
    /// point has zero width and height. The corners may be passed in any order.
    pub fn from_extents(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            x: x0.min(x1),
            y: y0.min(y1),
            width: x0.abs_diff(x1),
            height: y0.abs_diff(y1),
        }
    }

    /// Computes the box spanning the minimum and maximum coordinates of `points`.
    ///
    /// Returns `None` if `points` is empty.
    pub fn from_points<I: IntoIterator<Item = (i32, i32)>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let (x, y) = iter.next()?;
        let (mut x_min, mut x_max, mut y_min, mut y_max) = (x, x, y, y);
        for (x, y) in iter {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
        Some(Self::from_extents(x_min, y_min, x_max, y_max))
    }

    /// Hand policy: the box spanning all landmarks of the entity.
    ///
    /// Returns [`Error::EmptyDetection`] if `landmarks` is empty.
    pub fn enclosing(landmarks: &Landmarks) -> Result<Self> {
        Self::from_points(landmarks.iter().map(|lm| lm.xy()))
            .ok_or(Error::EmptyDetection { entity: "landmark" })
    }

    /// Pose policy.
    ///
    /// Horizontally, the box spans from the right to the left shoulder, or from the right to the
    /// left wrist if `include_extremities` is set. Vertically, it spans from the inner corner of
    /// the left eye to the left heel. Both extents are then grown on each side by half the shoulder
    /// width. Coordinates saturate at the `i32` limits.
    ///
    /// Returns [`Error::MissingLandmark`] if the heel landmark is not part of `landmarks`.
    pub fn around_pose(landmarks: &Landmarks, include_extremities: bool) -> Result<Self> {
        use PoseLandmarkIdx::*;

        landmarks.require(LeftHeel as usize + 1)?;
        let lm = |idx: PoseLandmarkIdx| landmarks[idx as usize];

        let pad = (lm(RightShoulder).x().abs_diff(lm(LeftShoulder).x()) / 2) as i32;
        let (left, right) = if include_extremities {
            (lm(RightWrist), lm(LeftWrist))
        } else {
            (lm(RightShoulder), lm(LeftShoulder))
        };

        let x0 = left.x().saturating_sub(pad);
        let x1 = right.x().saturating_add(pad);
        let y0 = lm(LeftEyeInner).y().saturating_sub(pad);
        let y1 = lm(LeftHeel).y().saturating_add(pad);
        let bbox = Self::from_extents(x0, y0, x1, y1);
        log::trace!("pose bbox: pad={pad} extremities={include_extremities} -> {bbox:?}");
        Ok(bbox)
    }

    /// Face policy: rescales a relative box reported by a detector to a `res`-sized frame.
    ///
    /// Coordinates are truncated towards zero, not clamped to the frame. Negative relative sizes
    /// are treated as zero.
    pub fn from_relative(rel: RelativeBox, res: Resolution) -> Self {
        let (w, h) = (res.width() as f32, res.height() as f32);
        Self {
            x: (rel.xmin * w) as i32,
            y: (rel.ymin * h) as i32,
            width: (rel.width * w).max(0.0) as u32,
            height: (rel.height * h).max(0.0) as u32,
        }
    }

    /// Returns the X coordinate of the left side of the box.
    #[inline]
    pub fn x(&self) -> i32 {
        self.x
    }

    /// Returns the Y coordinate of the top side of the box.
    #[inline]
    pub fn y(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the X coordinate of the right side of the box.
    #[inline]
    pub fn right(&self) -> i32 {
        self.x.saturating_add_unsigned(self.width)
    }

    /// Returns the Y coordinate of the bottom side of the box.
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add_unsigned(self.height)
    }

    /// Returns the center point, rounding half sizes down.
    pub fn center(&self) -> (i32, i32) {
        (
            self.x.saturating_add_unsigned(self.width / 2),
            self.y.saturating_add_unsigned(self.height / 2),
        )
    }

    /// Returns the box as an `(x, y, width, height)` tuple.
    pub fn to_xywh(&self) -> (i32, i32, u32, u32) {
        (self.x, self.y, self.width, self.height)
    }

    /// Converts this box to a [`Rect`] for drawing.
    pub fn rect(&self) -> Rect {
        Rect::from_top_left(self.x, self.y, self.width, self.height)
    }
}

impl From<Rect> for BoundingBox {
    fn from(rect: Rect) -> Self {
        Self::new(rect.x(), rect.y(), rect.width(), rect.height())
    }
}

impl fmt::Debug for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (cx, cy) = self.center();
        write!(
            f,
            "BoundingBox @ ({},{})/{}x{} center=({cx},{cy})",
            self.x, self.y, self.width, self.height,
        )
    }
}

/// A box in relative `[0, 1]` frame coordinates, as reported by a face detector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RelativeBox {
    pub xmin: f32,
    pub ymin: f32,
    pub width: f32,
    pub height: f32,
}

impl RelativeBox {
    pub fn new(xmin: f32, ymin: f32, width: f32, height: f32) -> Self {
        Self {
            xmin,
            ymin,
            width,
            height,
        }
    }
}

/// Selects the bounding box policy used by [`synthesize`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityKind {
    Hand,
    Pose { include_extremities: bool },
    /// Faces carry their own box; the landmarks are ignored.
    Face(RelativeBox),
}

/// Computes the bounding box of an entity of the given `kind`.
///
/// `landmarks` must already be in pixel coordinates of a `res`-sized frame.
pub fn synthesize(kind: EntityKind, landmarks: &Landmarks, res: Resolution) -> Result<BoundingBox> {
    match kind {
        EntityKind::Hand => BoundingBox::enclosing(landmarks),
        EntityKind::Pose {
            include_extremities,
        } => BoundingBox::around_pose(landmarks, include_extremities),
        EntityKind::Face(rel) => Ok(BoundingBox::from_relative(rel, res)),
    }
}

#[cfg(test)]
mod tests {
    use crate::landmark::LandmarkPoint;

    use super::*;

    fn pose_landmarks(overrides: &[(PoseLandmarkIdx, (i32, i32))]) -> Landmarks {
        let mut points = vec![LandmarkPoint::new(0, 0, 0); 33];
        for (idx, (x, y)) in overrides {
            points[*idx as usize] = LandmarkPoint::new(*x, *y, 0);
        }
        Landmarks::new(points)
    }

    #[test]
    fn hand_extents() {
        let landmarks = Landmarks::new([
            LandmarkPoint::new(10, 50, 0),
            LandmarkPoint::new(50, 20, 0),
            LandmarkPoint::new(30, 80, 0),
            LandmarkPoint::new(25, 40, 0),
        ]);
        let bbox = BoundingBox::enclosing(&landmarks).unwrap();
        assert_eq!(bbox.to_xywh(), (10, 20, 40, 60));
        assert_eq!(bbox.center(), (30, 50));
    }

    #[test]
    fn hand_empty() {
        assert_eq!(
            BoundingBox::enclosing(&Landmarks::default()),
            Err(Error::EmptyDetection { entity: "landmark" }),
        );
    }

    #[test]
    fn center_rounds_down() {
        let bbox = BoundingBox::from_extents(-5, -5, 0, 2);
        assert_eq!(bbox.to_xywh(), (-5, -5, 5, 7));
        assert_eq!(bbox.center(), (-3, -2));
    }

    #[test]
    fn extents_any_order() {
        assert_eq!(
            BoundingBox::from_extents(10, 20, 0, 0),
            BoundingBox::from_extents(0, 0, 10, 20),
        );
    }

    #[test]
    fn pose_shoulders() {
        use PoseLandmarkIdx::*;
        let landmarks = pose_landmarks(&[
            (RightShoulder, (100, 150)),
            (LeftShoulder, (160, 150)),
            (RightWrist, (60, 250)),
            (LeftWrist, (210, 250)),
            (LeftEyeInner, (130, 80)),
            (LeftHeel, (140, 400)),
        ]);

        // pad = |100 - 160| / 2 = 30
        let bbox = BoundingBox::around_pose(&landmarks, false).unwrap();
        assert_eq!(bbox.to_xywh(), (70, 50, 120, 380));
        assert_eq!(bbox.center(), (130, 240));

        let bbox = BoundingBox::around_pose(&landmarks, true).unwrap();
        assert_eq!(bbox.to_xywh(), (30, 50, 210, 380));
    }

    #[test]
    fn pose_odd_shoulder_width() {
        use PoseLandmarkIdx::*;
        let landmarks = pose_landmarks(&[
            (RightShoulder, (100, 0)),
            (LeftShoulder, (107, 0)),
            (LeftEyeInner, (0, 10)),
            (LeftHeel, (0, 20)),
        ]);
        // pad = 7 / 2 = 3
        let bbox = BoundingBox::around_pose(&landmarks, false).unwrap();
        assert_eq!(bbox.to_xywh(), (97, 7, 13, 16));
    }

    #[test]
    fn pose_saturates_at_coordinate_limits() {
        use PoseLandmarkIdx::*;
        let landmarks = pose_landmarks(&[
            (RightShoulder, (i32::MIN + 10, 0)),
            (LeftShoulder, (i32::MAX - 10, 0)),
            (LeftEyeInner, (0, -100)),
            (LeftHeel, (0, 100)),
        ]);
        let bbox = BoundingBox::around_pose(&landmarks, false).unwrap();
        assert_eq!(bbox.to_xywh(), (i32::MIN, i32::MIN, u32::MAX, u32::MAX));
        assert_eq!((bbox.right(), bbox.bottom()), (i32::MAX, i32::MAX));
        assert_eq!(bbox.center(), (-1, -1));
    }

    #[test]
    fn pose_missing_landmarks() {
        let landmarks = Landmarks::new(vec![LandmarkPoint::default(); 29]);
        assert_eq!(
            BoundingBox::around_pose(&landmarks, false),
            Err(Error::MissingLandmark { index: 29, len: 29 }),
        );
        let landmarks = Landmarks::new(vec![LandmarkPoint::default(); 30]);
        assert!(BoundingBox::around_pose(&landmarks, true).is_ok());
    }

    #[test]
    fn face_not_clamped() {
        let res = Resolution::new(200, 100);
        let bbox = BoundingBox::from_relative(RelativeBox::new(-0.1, 0.5, 0.5, 0.75), res);
        assert_eq!(bbox.to_xywh(), (-20, 50, 100, 75));
        assert!(bbox.bottom() > res.height() as i32);
    }

    #[test]
    fn dispatch() {
        let res = Resolution::new(100, 100);
        let landmarks = Landmarks::new([LandmarkPoint::new(1, 2, 0), LandmarkPoint::new(3, 5, 0)]);
        assert_eq!(
            synthesize(EntityKind::Hand, &landmarks, res).unwrap(),
            BoundingBox::new(1, 2, 2, 3),
        );
        assert!(matches!(
            synthesize(
                EntityKind::Pose {
                    include_extremities: false
                },
                &landmarks,
                res
            ),
            Err(Error::MissingLandmark { .. })
        ));
        assert_eq!(
            synthesize(
                EntityKind::Face(RelativeBox::new(0.1, 0.2, 0.3, 0.4)),
                &landmarks,
                res
            )
            .unwrap(),
            BoundingBox::new(10, 20, 30, 40),
        );
    }

    #[test]
    fn invariants_hold_for_random_points() {
        let mut rng = fastrand::Rng::with_seed(0x5eed);
        for _ in 0..200 {
            let points = (0..21)
                .map(|_| LandmarkPoint::new(rng.i32(-500..500), rng.i32(-500..500), 0))
                .collect::<Landmarks>();
            let bbox = BoundingBox::enclosing(&points).unwrap();
            let (cx, cy) = bbox.center();
            assert_eq!(cx, bbox.x() + (bbox.width() / 2) as i32);
            assert_eq!(cy, bbox.y() + (bbox.height() / 2) as i32);
            for lm in points.iter() {
                assert!(bbox.x() <= lm.x() && lm.x() <= bbox.right());
                assert!(bbox.y() <= lm.y() && lm.y() <= bbox.bottom());
            }
        }
    }
}
