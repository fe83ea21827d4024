//! Body pose entities.

use crate::{
    bbox::BoundingBox,
    config::PoseOptions,
    landmark::{LandmarkPoint, Landmarks},
    measure::{self, Angle, Distance},
    resolution::Resolution,
    Result,
};

/// Number of landmarks in the pose topology.
pub const NUM_LANDMARKS: usize = 33;

/// Pose landmark indices.
///
/// "Left" and "Right" are from the PoV of the depicted person.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoseLandmarkIdx {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

/// Pairs of landmarks that make up the pose skeleton.
pub const CONNECTIVITY: &[(PoseLandmarkIdx, PoseLandmarkIdx)] = {
    use PoseLandmarkIdx::*;
    &[
        // Face:
        (Nose, LeftEyeInner),
        (LeftEyeInner, LeftEye),
        (LeftEye, LeftEyeOuter),
        (LeftEyeOuter, LeftEar),
        (Nose, RightEyeInner),
        (RightEyeInner, RightEye),
        (RightEye, RightEyeOuter),
        (RightEyeOuter, RightEar),
        (MouthLeft, MouthRight),
        // Torso:
        (LeftShoulder, RightShoulder),
        (LeftShoulder, LeftHip),
        (RightShoulder, RightHip),
        (LeftHip, RightHip),
        // Arms and hands:
        (LeftShoulder, LeftElbow),
        (LeftElbow, LeftWrist),
        (LeftWrist, LeftPinky),
        (LeftWrist, LeftIndex),
        (LeftWrist, LeftThumb),
        (LeftPinky, LeftIndex),
        (RightShoulder, RightElbow),
        (RightElbow, RightWrist),
        (RightWrist, RightPinky),
        (RightWrist, RightIndex),
        (RightWrist, RightThumb),
        (RightPinky, RightIndex),
        // Legs and feet:
        (LeftHip, LeftKnee),
        (LeftKnee, LeftAnkle),
        (LeftAnkle, LeftHeel),
        (LeftAnkle, LeftFootIndex),
        (LeftHeel, LeftFootIndex),
        (RightHip, RightKnee),
        (RightKnee, RightAnkle),
        (RightAnkle, RightHeel),
        (RightAnkle, RightFootIndex),
        (RightHeel, RightFootIndex),
    ]
};

/// One detected body pose in one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pose {
    landmarks: Landmarks,
}

impl Pose {
    pub fn new(landmarks: Landmarks) -> Self {
        Self { landmarks }
    }

    /// Creates a pose from the landmark model's relative output.
    pub fn from_normalized<I>(positions: I, res: Resolution) -> Self
    where
        I: IntoIterator<Item = [f32; 3]>,
    {
        Self::new(Landmarks::from_normalized(positions, res))
    }

    pub fn landmarks(&self) -> &Landmarks {
        &self.landmarks
    }

    pub fn landmark(&self, idx: PoseLandmarkIdx) -> Result<LandmarkPoint> {
        self.landmarks.get(idx as usize)
    }

    /// Computes the bounding box of the body, see [`BoundingBox::around_pose`].
    pub fn bounding_box(&self, options: &PoseOptions) -> Result<BoundingBox> {
        BoundingBox::around_pose(&self.landmarks, options.include_extremities())
    }

    /// Measures the planar distance between two landmarks.
    pub fn distance(&self, a: PoseLandmarkIdx, b: PoseLandmarkIdx) -> Result<Distance> {
        Ok(measure::distance(self.landmark(a)?, self.landmark(b)?))
    }

    /// Measures the angle at `vertex` between the arms towards `a` and `b`.
    ///
    /// See [`measure::angle`] for the orientation convention.
    pub fn angle(
        &self,
        a: PoseLandmarkIdx,
        vertex: PoseLandmarkIdx,
        b: PoseLandmarkIdx,
    ) -> Result<Angle> {
        Ok(measure::angle(
            self.landmark(a)?,
            self.landmark(vertex)?,
            self.landmark(b)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::Error;
    use PoseLandmarkIdx::*;

    fn arm_pose() -> Pose {
        let mut points = vec![LandmarkPoint::default(); NUM_LANDMARKS];
        points[RightShoulder as usize] = LandmarkPoint::new(100, 100, 0);
        points[RightElbow as usize] = LandmarkPoint::new(100, 200, 0);
        points[RightWrist as usize] = LandmarkPoint::new(200, 200, 0);
        points[LeftShoulder as usize] = LandmarkPoint::new(160, 100, 0);
        points[LeftWrist as usize] = LandmarkPoint::new(180, 220, 0);
        points[LeftEyeInner as usize] = LandmarkPoint::new(130, 40, 0);
        points[LeftHeel as usize] = LandmarkPoint::new(140, 500, 0);
        Pose::new(Landmarks::new(points))
    }

    #[test]
    fn elbow_angle() {
        let pose = arm_pose();
        // Shoulder is straight up from the elbow, wrist to the right.
        let angle = pose.angle(RightShoulder, RightElbow, RightWrist).unwrap();
        assert_relative_eq!(angle.degrees(), 90.0);
        let angle = pose.angle(RightWrist, RightElbow, RightShoulder).unwrap();
        assert_relative_eq!(angle.degrees(), 270.0);
    }

    #[test]
    fn forearm_length() {
        let d = arm_pose().distance(RightElbow, RightWrist).unwrap();
        assert_eq!(d.length(), 100.0);
        assert_eq!(d.midpoint(), (150, 200));
    }

    #[test]
    fn bbox_modes() {
        let pose = arm_pose();
        let narrow = pose.bounding_box(&PoseOptions::default()).unwrap();
        let wide = pose
            .bounding_box(&PoseOptions::default().with_include_extremities(true))
            .unwrap();
        assert_eq!(narrow.to_xywh(), (70, 10, 120, 520));
        assert_eq!(wide.to_xywh(), (170, 10, 40, 520));
        assert_eq!(narrow.y(), wide.y());
    }

    #[test]
    fn truncated_topology() {
        let pose = Pose::from_normalized([[0.5, 0.5, 0.0]; 12], Resolution::new(10, 10));
        assert_eq!(
            pose.bounding_box(&PoseOptions::default()),
            Err(Error::MissingLandmark { index: 29, len: 12 })
        );
        assert!(matches!(
            pose.angle(LeftShoulder, LeftElbow, LeftWrist),
            Err(Error::MissingLandmark { index: 13, .. })
        ));
    }

    #[test]
    fn skeleton_spans_all_landmarks() {
        let mut seen = [false; NUM_LANDMARKS];
        for &(a, b) in CONNECTIVITY {
            assert_ne!(a, b);
            seen[a as usize] = true;
            seen[b as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
