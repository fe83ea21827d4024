//! Face detections and face meshes.
//!
//! Two kinds of face entities exist: [`FaceDetection`]s come from a face *detector* and carry a
//! relative bounding box, a confidence score and a handful of keypoints. [`FaceMesh`]es come from a
//! face *landmark* model and carry the dense 468-point mesh.

use std::{fmt, str::FromStr};

use crate::{
    bbox::{BoundingBox, RelativeBox},
    landmark::{LandmarkPoint, Landmarks},
    measure::{self, Distance},
    resolution::Resolution,
    Error, Result,
};

/// Keypoints reported alongside a face detection.
///
/// "Left" and "Right" are from the PoV of the depicted person.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceKeypoint {
    RightEye = 0,
    LeftEye = 1,
    NoseTip = 2,
    MouthCenter = 3,
    RightEarTragion = 4,
    LeftEarTragion = 5,
}

/// Confidence tier of a [`FaceDetection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precision {
    Low,
    Medium,
    High,
}

impl Precision {
    pub fn from_score(score: f32) -> Self {
        if score > 0.85 {
            Precision::High
        } else if score > 0.70 {
            Precision::Medium
        } else {
            Precision::Low
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Precision::Low => "Low Precision",
            Precision::Medium => "Medium Precision",
            Precision::High => "High Precision",
        })
    }
}

/// One face reported by a face detector for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceDetection {
    relative: RelativeBox,
    score: f32,
    keypoints: Vec<[f32; 2]>,
    resolution: Resolution,
}

impl FaceDetection {
    /// Creates a face detection from the detector's relative box and score for a frame of size
    /// `res`.
    pub fn new(relative: RelativeBox, score: f32, res: Resolution) -> Self {
        Self {
            relative,
            score,
            keypoints: Vec::new(),
            resolution: res,
        }
    }

    /// Attaches relative keypoint positions, in [`FaceKeypoint`] order.
    #[must_use]
    pub fn with_keypoints<I: IntoIterator<Item = [f32; 2]>>(mut self, keypoints: I) -> Self {
        self.keypoints = keypoints.into_iter().collect();
        self
    }

    /// Returns the detection confidence in range 0.0 to 1.0.
    pub fn score(&self) -> f32 {
        self.score
    }

    pub fn precision(&self) -> Precision {
        Precision::from_score(self.score)
    }

    pub fn relative_box(&self) -> RelativeBox {
        self.relative
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Returns the face's bounding box in pixel coordinates.
    ///
    /// The box is the detector's relative box scaled to the frame; it is not clipped and may
    /// extend past the frame edges.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_relative(self.relative, self.resolution)
    }

    /// Returns the relative position of a keypoint as reported by the detector, if present.
    pub fn relative_keypoint(&self, keypoint: FaceKeypoint) -> Option<[f32; 2]> {
        self.keypoints.get(keypoint as usize).copied()
    }

    /// Returns the pixel position of a keypoint, or [`Error::MissingLandmark`] if the detector did
    /// not report it.
    pub fn keypoint(&self, keypoint: FaceKeypoint) -> Result<(i32, i32)> {
        let [x, y] = self
            .relative_keypoint(keypoint)
            .ok_or(Error::MissingLandmark {
                index: keypoint as usize,
                len: self.keypoints.len(),
            })?;
        Ok(LandmarkPoint::from_normalized([x, y, 0.0], self.resolution).xy())
    }
}

/// Number of landmarks in the face mesh topology.
pub const NUM_MESH_LANDMARKS: usize = 468;

/// Assigns a name to certain important face mesh landmark indices.
///
/// "Left" and "Right" are relative to the input image, not from the PoV of the depicted person.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceMeshIdx {
    MouthLeft = 78,
    MouthRight = 308,
    MouthTop = 13,
    MouthBottom = 14,
    LeftEyeLeftCorner = 33,
    LeftEyeRightCorner = 133,
    LeftEyeTop = 159,
    LeftEyeBottom = 145,
    RightEyeLeftCorner = 362,
    RightEyeRightCorner = 263,
    RightEyeTop = 386,
    RightEyeBottom = 374,
}

/// Polylines through the face mesh that outline the face oval, lips, eyes and eyebrows.
///
/// Each entry lists mesh landmark indices in drawing order.
pub const MESH_CONTOURS: &[&[usize]] = &[
    // Face oval, closed.
    &[
        10, 338, 297, 332, 284, 251, 389, 356, 454, 323, 361, 288, 397, 365, 379, 378, 400, 377,
        152, 148, 176, 149, 150, 136, 172, 58, 132, 93, 234, 127, 162, 21, 54, 103, 67, 109, 10,
    ],
    // Lips, outer and inner.
    &[61, 146, 91, 181, 84, 17, 314, 405, 321, 375, 291],
    &[61, 185, 40, 39, 37, 0, 267, 269, 270, 409, 291],
    &[78, 95, 88, 178, 87, 14, 317, 402, 318, 324, 308],
    &[78, 191, 80, 81, 82, 13, 312, 311, 310, 415, 308],
    // Eyes, lower and upper lid.
    &[263, 249, 390, 373, 374, 380, 381, 382, 362],
    &[263, 466, 388, 387, 386, 385, 384, 398, 362],
    &[33, 7, 163, 144, 145, 153, 154, 155, 133],
    &[33, 246, 161, 160, 159, 158, 157, 173, 133],
    // Eyebrows, lower and upper edge.
    &[276, 283, 282, 295, 285],
    &[300, 293, 334, 296, 336],
    &[46, 53, 52, 65, 55],
    &[70, 63, 105, 66, 107],
];

/// A dense face mesh for one face in one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceMesh {
    landmarks: Landmarks,
}

impl FaceMesh {
    pub fn new(landmarks: Landmarks) -> Self {
        Self { landmarks }
    }

    pub fn from_normalized<I>(positions: I, res: Resolution) -> Self
    where
        I: IntoIterator<Item = [f32; 3]>,
    {
        Self::new(Landmarks::from_normalized(positions, res))
    }

    pub fn landmarks(&self) -> &Landmarks {
        &self.landmarks
    }

    pub fn landmark(&self, idx: FaceMeshIdx) -> Result<LandmarkPoint> {
        self.landmarks.get(idx as usize)
    }

    /// Computes the box spanning all mesh landmarks.
    pub fn bounding_box(&self) -> Result<BoundingBox> {
        BoundingBox::enclosing(&self.landmarks)
    }

    /// Measures the planar distance between two mesh landmarks.
    pub fn distance(&self, a: FaceMeshIdx, b: FaceMeshIdx) -> Result<Distance> {
        Ok(measure::distance(self.landmark(a)?, self.landmark(b)?))
    }
}

/// How a face detection is visualized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaceStyle {
    /// Corner brackets around the bounding box.
    #[default]
    Corners,
    /// A circle around the box center with a leader line towards the top left corner.
    Circle,
}

impl FaceStyle {
    /// Maps the legacy numeric display modes (`1` and `2`) to a style.
    pub fn from_mode(mode: u8) -> Result<Self> {
        match mode {
            1 => Ok(FaceStyle::Corners),
            2 => Ok(FaceStyle::Circle),
            _ => Err(Error::invalid_parameter("face style", mode)),
        }
    }
}

impl FromStr for FaceStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "corners" | "1" => Ok(FaceStyle::Corners),
            "circle" | "2" => Ok(FaceStyle::Circle),
            _ => Err(Error::invalid_parameter("face style", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bbox_from_relative() {
        let face = FaceDetection::new(
            RelativeBox::new(0.25, 0.5, 0.5, 0.25),
            0.93,
            Resolution::new(640, 480),
        );
        let bbox = face.bounding_box();
        assert_eq!(bbox.to_xywh(), (160, 240, 320, 120));
        assert_eq!(bbox.center(), (320, 300));
        assert_eq!(face.precision(), Precision::High);
    }

    #[test]
    fn keypoints() {
        let face = FaceDetection::new(RelativeBox::default(), 0.5, Resolution::new(200, 100))
            .with_keypoints([[0.25, 0.5], [0.75, 0.5]]);
        assert_eq!(face.keypoint(FaceKeypoint::LeftEye).unwrap(), (150, 50));
        assert_eq!(
            face.keypoint(FaceKeypoint::NoseTip),
            Err(Error::MissingLandmark { index: 2, len: 2 })
        );
        assert_eq!(face.relative_keypoint(FaceKeypoint::RightEye), Some([0.25, 0.5]));
        assert_eq!(face.relative_keypoint(FaceKeypoint::MouthCenter), None);
    }

    #[test]
    fn mesh_contours_cover_named_landmarks() {
        let indices = MESH_CONTOURS.iter().flat_map(|c| c.iter().copied());
        assert!(indices.clone().all(|i| i < NUM_MESH_LANDMARKS));
        for idx in [
            FaceMeshIdx::MouthLeft,
            FaceMeshIdx::MouthTop,
            FaceMeshIdx::LeftEyeLeftCorner,
            FaceMeshIdx::RightEyeBottom,
        ] {
            assert!(indices.clone().any(|i| i == idx as usize), "{idx:?}");
        }
        // The face oval is closed.
        assert_eq!(MESH_CONTOURS[0].first(), MESH_CONTOURS[0].last());
    }

    #[test]
    fn precision_tiers() {
        assert_eq!(Precision::from_score(0.86), Precision::High);
        assert_eq!(Precision::from_score(0.85), Precision::Medium);
        assert_eq!(Precision::from_score(0.71), Precision::Medium);
        assert_eq!(Precision::from_score(0.70), Precision::Low);
        assert_eq!(Precision::High.to_string(), "High Precision");
    }

    #[test]
    fn style_selection() {
        assert_eq!(FaceStyle::from_mode(1), Ok(FaceStyle::Corners));
        assert_eq!(FaceStyle::from_mode(2), Ok(FaceStyle::Circle));
        assert_eq!(
            FaceStyle::from_mode(3),
            Err(Error::InvalidParameter {
                name: "face style",
                value: "3".into()
            })
        );
        assert_eq!("Circle".parse(), Ok(FaceStyle::Circle));
        assert_eq!(" corners ".parse(), Ok(FaceStyle::Corners));
        assert!("square".parse::<FaceStyle>().is_err());
    }

    #[test]
    fn mesh_eye_width() {
        let mut points = vec![LandmarkPoint::default(); NUM_MESH_LANDMARKS];
        points[FaceMeshIdx::LeftEyeLeftCorner as usize] = LandmarkPoint::new(10, 20, 0);
        points[FaceMeshIdx::LeftEyeRightCorner as usize] = LandmarkPoint::new(40, 60, 0);
        let mesh = FaceMesh::new(Landmarks::new(points));
        let d = mesh
            .distance(FaceMeshIdx::LeftEyeLeftCorner, FaceMeshIdx::LeftEyeRightCorner)
            .unwrap();
        assert_eq!(d.length(), 50.0);
        assert_eq!(mesh.bounding_box().unwrap().to_xywh(), (0, 0, 40, 60));
    }
}
