//! Hand entities and finger state classification.

use std::{fmt, str::FromStr};

use crate::{
    bbox::BoundingBox,
    config::HandOptions,
    landmark::{LandmarkPoint, Landmarks},
    measure::{self, Distance},
    resolution::Resolution,
    Error, Result,
};

/// Number of landmarks in the hand topology.
pub const NUM_LANDMARKS: usize = 21;

/// Which hand is depicted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    /// Returns the opposite hand.
    ///
    /// Landmark models usually assume a mirrored (selfie) camera image. Un-mirrored input reports
    /// the wrong hand, which this corrects.
    #[must_use]
    pub fn mirrored(self) -> Self {
        match self {
            Handedness::Left => Handedness::Right,
            Handedness::Right => Handedness::Left,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Handedness::Left => "Left",
            Handedness::Right => "Right",
        }
    }
}

impl FromStr for Handedness {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Left" | "left" => Ok(Handedness::Left),
            "Right" | "right" => Ok(Handedness::Right),
            _ => Err(Error::invalid_parameter("handedness", s)),
        }
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Hand landmark indices.
///
/// - **CMC**: [Carpometacarpal joint], the lowest joint of the thumb, located near the wrist.
/// - **MCP**: [Metacarpophalangeal joint], the lower joint forming the knuckles near the palm of
///   the hand.
/// - **IP**: Interphalangeal joint, the upper joint of the thumb.
/// - **PIP**: Proximal Interphalangeal joint, the joint between the MCP and DIP.
/// - **DIP**: Distal Interphalangeal joint, the highest joint of a finger.
/// - **Tip**: This landmark is just placed on the tip of the finger, above the DIP.
///
/// [Carpometacarpal joint]: https://en.wikipedia.org/wiki/Carpometacarpal_joint
/// [Metacarpophalangeal joint]: https://en.wikipedia.org/wiki/Metacarpophalangeal_joint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandLandmarkIdx {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexFingerMcp,
    IndexFingerPip,
    IndexFingerDip,
    IndexFingerTip,
    MiddleFingerMcp,
    MiddleFingerPip,
    MiddleFingerDip,
    MiddleFingerTip,
    RingFingerMcp,
    RingFingerPip,
    RingFingerDip,
    RingFingerTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

/// Pairs of landmarks that make up the hand skeleton.
pub const CONNECTIVITY: &[(HandLandmarkIdx, HandLandmarkIdx)] = {
    use HandLandmarkIdx::*;
    &[
        // Palm outline:
        (Wrist, ThumbCmc),
        (ThumbCmc, IndexFingerMcp),
        (IndexFingerMcp, MiddleFingerMcp),
        (MiddleFingerMcp, RingFingerMcp),
        (RingFingerMcp, PinkyMcp),
        (PinkyMcp, Wrist),
        // Digits:
        (ThumbCmc, ThumbMcp),
        (ThumbMcp, ThumbIp),
        (ThumbIp, ThumbTip),
        (IndexFingerMcp, IndexFingerPip),
        (IndexFingerPip, IndexFingerDip),
        (IndexFingerDip, IndexFingerTip),
        (MiddleFingerMcp, MiddleFingerPip),
        (MiddleFingerPip, MiddleFingerDip),
        (MiddleFingerDip, MiddleFingerTip),
        (RingFingerMcp, RingFingerPip),
        (RingFingerPip, RingFingerDip),
        (RingFingerDip, RingFingerTip),
        (PinkyMcp, PinkyPip),
        (PinkyPip, PinkyDip),
        (PinkyDip, PinkyTip),
    ]
};

/// A single digit of a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    /// Returns the landmark placed on the tip of this finger.
    pub fn tip(self) -> HandLandmarkIdx {
        match self {
            Finger::Thumb => HandLandmarkIdx::ThumbTip,
            Finger::Index => HandLandmarkIdx::IndexFingerTip,
            Finger::Middle => HandLandmarkIdx::MiddleFingerTip,
            Finger::Ring => HandLandmarkIdx::RingFingerTip,
            Finger::Pinky => HandLandmarkIdx::PinkyTip,
        }
    }
}

/// One detected hand in one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hand {
    landmarks: Landmarks,
    handedness: Handedness,
}

impl Hand {
    /// Creates a hand from pixel-space landmarks and its (already corrected) handedness.
    pub fn new(landmarks: Landmarks, handedness: Handedness) -> Self {
        Self {
            landmarks,
            handedness,
        }
    }

    /// Creates a hand from the landmark model's raw output.
    ///
    /// `positions` are relative landmark coordinates, `label` is the model's handedness label
    /// (`"Left"` or `"Right"`). If [`HandOptions::flip_handedness`] is set, the label is swapped.
    pub fn from_normalized<I>(
        positions: I,
        label: &str,
        res: Resolution,
        options: &HandOptions,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = [f32; 3]>,
    {
        let mut handedness = label.parse::<Handedness>()?;
        if options.flip_handedness() {
            handedness = handedness.mirrored();
        }
        Ok(Self::new(
            Landmarks::from_normalized(positions, res),
            handedness,
        ))
    }

    pub fn landmarks(&self) -> &Landmarks {
        &self.landmarks
    }

    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    pub fn landmark(&self, idx: HandLandmarkIdx) -> Result<LandmarkPoint> {
        self.landmarks.get(idx as usize)
    }

    /// Computes the bounding box spanning all landmarks of this hand.
    pub fn bounding_box(&self) -> Result<BoundingBox> {
        BoundingBox::enclosing(&self.landmarks)
    }

    /// Classifies each finger as extended or folded.
    pub fn fingers_up(&self) -> Result<FingerState> {
        FingerState::classify(self)
    }

    /// Measures the planar distance between two landmarks of this hand.
    pub fn distance(&self, a: HandLandmarkIdx, b: HandLandmarkIdx) -> Result<Distance> {
        Ok(measure::distance(self.landmark(a)?, self.landmark(b)?))
    }
}

/// Extended/folded state of the five fingers of a hand, in [`Finger::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FingerState([bool; 5]);

impl FingerState {
    /// Classifies the fingers of `hand`.
    ///
    /// The thumb counts as extended when its tip lies further outward horizontally than the
    /// joint below it, where "outward" depends on the handedness (image X grows to the right).
    /// The other fingers count as extended when their tip is higher up in the image than their PIP
    /// joint.
    ///
    /// Fails with [`Error::EmptyDetection`] if the hand has no landmarks, and with
    /// [`Error::MissingLandmark`] if the hand topology is incomplete.
    pub fn classify(hand: &Hand) -> Result<Self> {
        let landmarks = hand.landmarks();
        if landmarks.is_empty() {
            return Err(Error::EmptyDetection { entity: "hand" });
        }
        landmarks.require(NUM_LANDMARKS)?;

        let mut state = [false; 5];
        for (finger, extended) in Finger::ALL.into_iter().zip(&mut state) {
            let tip_idx = finger.tip() as usize;
            let tip = landmarks[tip_idx];
            *extended = match finger {
                Finger::Thumb => {
                    let joint = landmarks[tip_idx - 1];
                    match hand.handedness() {
                        Handedness::Right => tip.x() > joint.x(),
                        Handedness::Left => tip.x() < joint.x(),
                    }
                }
                _ => tip.y() < landmarks[tip_idx - 2].y(),
            };
        }

        let state = Self(state);
        log::trace!("{} hand fingers: {:?}", hand.handedness(), state.to_bits());
        Ok(state)
    }

    pub fn is_extended(&self, finger: Finger) -> bool {
        self.0[finger as usize]
    }

    /// Returns the number of extended fingers.
    pub fn count(&self) -> usize {
        self.0.iter().filter(|up| **up).count()
    }

    /// Returns the state as `[thumb, index, middle, ring, pinky]`, with `1` meaning extended.
    pub fn to_bits(&self) -> [u8; 5] {
        self.0.map(u8::from)
    }
}

/// All hands detected in a single frame.
#[derive(Debug, Clone, Default)]
pub struct HandDetections {
    hands: Vec<Hand>,
}

impl HandDetections {
    pub fn new(hands: Vec<Hand>) -> Self {
        Self { hands }
    }

    pub fn len(&self) -> usize {
        self.hands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hand> + '_ {
        self.hands.iter()
    }

    /// Returns the hand at `index`, or [`Error::EmptyDetection`] if fewer hands were detected.
    pub fn get(&self, index: usize) -> Result<&Hand> {
        self.hands
            .get(index)
            .ok_or(Error::EmptyDetection { entity: "hand" })
    }

    /// Returns the first detected hand with the given handedness.
    pub fn find(&self, handedness: Handedness) -> Result<&Hand> {
        self.hands
            .iter()
            .find(|hand| hand.handedness() == handedness)
            .ok_or(Error::EmptyDetection { entity: "hand" })
    }

    /// Classifies the fingers of the hand at `index`.
    pub fn fingers_up(&self, index: usize) -> Result<FingerState> {
        self.get(index)?.fingers_up()
    }
}

impl FromIterator<Hand> for HandDetections {
    fn from_iter<T: IntoIterator<Item = Hand>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// An upright hand with all fingers extended, palm facing the camera.
    fn open_hand(handedness: Handedness) -> Vec<LandmarkPoint> {
        use HandLandmarkIdx::*;

        let mut points = vec![LandmarkPoint::new(100, 200, 0); NUM_LANDMARKS];
        let mut set = |idx: HandLandmarkIdx, x, y| points[idx as usize] = LandmarkPoint::new(x, y, 0);
        // The thumb points outwards: to the right for a right hand, left otherwise.
        let dir = match handedness {
            Handedness::Right => 1,
            Handedness::Left => -1,
        };
        set(ThumbCmc, 100 + dir * 20, 190);
        set(ThumbMcp, 100 + dir * 35, 175);
        set(ThumbIp, 100 + dir * 50, 160);
        set(ThumbTip, 100 + dir * 65, 150);
        for (i, mcp) in [IndexFingerMcp, MiddleFingerMcp, RingFingerMcp, PinkyMcp]
            .into_iter()
            .enumerate()
        {
            let x = 80 + i as i32 * 15;
            let base = mcp as usize;
            points[base] = LandmarkPoint::new(x, 150, 0);
            points[base + 1] = LandmarkPoint::new(x, 120, 0);
            points[base + 2] = LandmarkPoint::new(x, 100, 0);
            points[base + 3] = LandmarkPoint::new(x, 80, 0);
        }
        points
    }

    fn fold(points: &mut [LandmarkPoint], finger: Finger) {
        let tip = finger.tip() as usize;
        let joint = points[tip - 2];
        points[tip] = LandmarkPoint::new(joint.x(), joint.y() + 10, 0);
    }

    #[test]
    fn all_extended() {
        for handedness in [Handedness::Left, Handedness::Right] {
            let hand = Hand::new(Landmarks::new(open_hand(handedness)), handedness);
            let state = hand.fingers_up().unwrap();
            assert_eq!(state.to_bits(), [1, 1, 1, 1, 1], "{handedness}");
            assert_eq!(state.count(), 5);
        }
    }

    #[test]
    fn thumb_depends_on_handedness() {
        // A right hand's landmarks labeled as left: the thumb now points "inwards".
        let hand = Hand::new(
            Landmarks::new(open_hand(Handedness::Right)),
            Handedness::Left,
        );
        assert_eq!(hand.fingers_up().unwrap().to_bits(), [0, 1, 1, 1, 1]);
    }

    #[test]
    fn folded_fingers() {
        let mut points = open_hand(Handedness::Right);
        fold(&mut points, Finger::Index);
        fold(&mut points, Finger::Ring);
        let hand = Hand::new(Landmarks::new(points), Handedness::Right);
        let state = FingerState::classify(&hand).unwrap();
        assert_eq!(state.to_bits(), [1, 0, 1, 0, 1]);
        assert!(!state.is_extended(Finger::Index));
        assert!(state.is_extended(Finger::Pinky));
        assert_eq!(state.count(), 3);
    }

    #[test]
    fn empty_and_incomplete() {
        let hand = Hand::new(Landmarks::default(), Handedness::Left);
        assert_eq!(
            hand.fingers_up(),
            Err(Error::EmptyDetection { entity: "hand" })
        );

        let hand = Hand::new(
            Landmarks::new(vec![LandmarkPoint::default(); 9]),
            Handedness::Left,
        );
        assert_eq!(
            hand.fingers_up(),
            Err(Error::MissingLandmark { index: 20, len: 9 })
        );
    }

    #[test]
    fn detections() {
        let detections = HandDetections::default();
        assert_eq!(
            detections.fingers_up(0),
            Err(Error::EmptyDetection { entity: "hand" })
        );

        let detections: HandDetections = [
            Hand::new(Landmarks::new(open_hand(Handedness::Left)), Handedness::Left),
            Hand::new(
                Landmarks::new(open_hand(Handedness::Right)),
                Handedness::Right,
            ),
        ]
        .into_iter()
        .collect();
        assert_eq!(detections.len(), 2);
        assert_eq!(detections.fingers_up(1).unwrap().count(), 5);
        assert_eq!(
            detections.find(Handedness::Right).unwrap().handedness(),
            Handedness::Right
        );
        assert!(detections.get(2).is_err());
    }

    #[test]
    fn from_model_output() {
        let res = Resolution::new(100, 100);
        let positions = [[0.5, 0.5, 0.0]; NUM_LANDMARKS];

        let hand = Hand::from_normalized(positions, "Right", res, &HandOptions::default()).unwrap();
        assert_eq!(hand.handedness(), Handedness::Left);
        assert_eq!(hand.landmark(HandLandmarkIdx::Wrist).unwrap().xy(), (50, 50));

        let options = HandOptions::default().with_flip_handedness(false);
        let hand = Hand::from_normalized(positions, "Right", res, &options).unwrap();
        assert_eq!(hand.handedness(), Handedness::Right);

        assert!(matches!(
            Hand::from_normalized(positions, "Both", res, &options),
            Err(Error::InvalidParameter { .. })
        ));
    }

    #[test]
    fn fingertip_distance() {
        let hand = Hand::new(
            Landmarks::new(open_hand(Handedness::Right)),
            Handedness::Right,
        );
        let d = hand
            .distance(HandLandmarkIdx::IndexFingerTip, HandLandmarkIdx::PinkyTip)
            .unwrap();
        assert_eq!(d.length(), 45.0);
        assert_eq!(d.midpoint(), (102, 80));
    }

    #[test]
    fn output_is_binary() {
        let mut rng = fastrand::Rng::with_seed(21);
        for _ in 0..100 {
            let points = (0..NUM_LANDMARKS)
                .map(|_| LandmarkPoint::new(rng.i32(0..640), rng.i32(0..480), 0))
                .collect::<Landmarks>();
            let hand = Hand::new(points, Handedness::Left);
            let bits = hand.fingers_up().unwrap().to_bits();
            assert!(bits.iter().all(|b| *b <= 1));
        }
    }
}
