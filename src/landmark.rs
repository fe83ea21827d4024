//! Pixel-space landmarks.
//!
//! Landmark models report positions in *relative* coordinates: X and Y in range `[0, 1]` across the
//! frame, and an unbounded Z component proportional to depth. [`LandmarkPoint::from_normalized`]
//! and [`Landmarks::from_normalized`] map those into integer pixel coordinates of a frame with a
//! given [`Resolution`].

use std::ops::Index;

use crate::{resolution::Resolution, Error, Result};

/// A single landmark in pixel coordinates.
///
/// `z` is scaled by the frame width, like `x`, so that it is roughly comparable to the planar
/// coordinates. It can be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LandmarkPoint {
    x: i32,
    y: i32,
    z: i32,
}

impl LandmarkPoint {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Converts a relative `[x, y, z]` position into pixel coordinates of a `res`-sized frame.
    ///
    /// Coordinates are truncated towards zero. Relative coordinates outside of `[0, 1]` are not
    /// clamped and will result in points outside of the frame.
    pub fn from_normalized(pos: [f32; 3], res: Resolution) -> Self {
        let (w, h) = (res.width() as f32, res.height() as f32);
        Self {
            x: (pos[0] * w) as i32,
            y: (pos[1] * h) as i32,
            z: (pos[2] * w) as i32,
        }
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn z(&self) -> i32 {
        self.z
    }

    /// Returns the planar `(x, y)` position of this landmark.
    #[inline]
    pub fn xy(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

impl From<LandmarkPoint> for (i32, i32) {
    #[inline]
    fn from(lm: LandmarkPoint) -> Self {
        lm.xy()
    }
}

/// An ordered set of pixel-space landmarks belonging to one entity.
///
/// The meaning of each index is fixed by the entity's topology (21 points for hands, 33 for
/// poses, 468 for face meshes). The collection itself does not enforce a length; operations that
/// need a specific landmark check for it and return [`Error::MissingLandmark`] otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Landmarks {
    points: Box<[LandmarkPoint]>,
}

impl Landmarks {
    /// Creates a landmark set from pixel-space points.
    pub fn new<I: IntoIterator<Item = LandmarkPoint>>(points: I) -> Self {
        Self {
            points: points.into_iter().collect(),
        }
    }

    /// Normalizes relative `[x, y, z]` positions into a pixel-space landmark set.
    pub fn from_normalized<I>(positions: I, res: Resolution) -> Self
    where
        I: IntoIterator<Item = [f32; 3]>,
    {
        let landmarks = Self::new(
            positions
                .into_iter()
                .map(|pos| LandmarkPoint::from_normalized(pos, res)),
        );
        log::trace!("normalized {} landmarks to {}", landmarks.len(), res);
        landmarks
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the landmark at `index`, or [`Error::MissingLandmark`] if there is none.
    pub fn get(&self, index: usize) -> Result<LandmarkPoint> {
        self.points
            .get(index)
            .copied()
            .ok_or(Error::MissingLandmark {
                index,
                len: self.len(),
            })
    }

    /// Ensures that the landmark set contains at least `len` landmarks.
    pub fn require(&self, len: usize) -> Result<()> {
        if self.len() < len {
            return Err(Error::MissingLandmark {
                index: len - 1,
                len: self.len(),
            });
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = LandmarkPoint> + Clone + '_ {
        self.points.iter().copied()
    }

    pub fn points(&self) -> &[LandmarkPoint] {
        &self.points
    }
}

impl Index<usize> for Landmarks {
    type Output = LandmarkPoint;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

impl FromIterator<LandmarkPoint> for Landmarks {
    fn from_iter<T: IntoIterator<Item = LandmarkPoint>>(iter: T) -> Self {
        Self::new(iter)
    }
}
