//! Per-capability options.
//!
//! Every option struct implements [`Default`] and offers chained `with_*` setters, so callers
//! only spell out what they want to change:
//!
//! ```
//! use sightline::config::PoseOptions;
//!
//! let options = PoseOptions::default().with_include_extremities(true);
//! assert!(options.include_extremities());
//! ```

use std::env;

use crate::{face::FaceStyle, Error, Result};

/// Environment variable that overrides [`FaceOptions::style`] in [`FaceOptions::from_env`].
pub const FACE_STYLE_ENV: &str = "SIGHTLINE_FACE_STYLE";

/// Options for building [`Hand`](crate::hand::Hand)s from model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandOptions {
    flip_handedness: bool,
}

impl Default for HandOptions {
    fn default() -> Self {
        Self {
            flip_handedness: true,
        }
    }
}

impl HandOptions {
    /// Sets whether the model's handedness label is swapped.
    ///
    /// Landmark models label hands as they appear in the image. Frames from a front-facing camera
    /// are usually mirrored, so by default the label is swapped to name the hand from the
    /// depicted person's point of view.
    #[must_use]
    pub fn with_flip_handedness(mut self, flip: bool) -> Self {
        self.flip_handedness = flip;
        self
    }

    pub fn flip_handedness(&self) -> bool {
        self.flip_handedness
    }
}

/// Options for pose geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoseOptions {
    include_extremities: bool,
}

impl PoseOptions {
    /// Sets whether the pose bounding box spans the wrists instead of the shoulders.
    #[must_use]
    pub fn with_include_extremities(mut self, include: bool) -> Self {
        self.include_extremities = include;
        self
    }

    pub fn include_extremities(&self) -> bool {
        self.include_extremities
    }
}

/// Where the confidence score of a face detection is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScorePlacement {
    #[default]
    Hidden,
    /// Just inside the top left corner of the bounding box.
    Inside,
    /// Above the top left corner of the bounding box.
    Outside,
}

/// Options for face annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FaceOptions {
    style: FaceStyle,
    score: ScorePlacement,
    debug: bool,
}

impl FaceOptions {
    /// Creates the default options, with the style overridden by `SIGHTLINE_FACE_STYLE` if that
    /// variable is set.
    ///
    /// Returns [`Error::InvalidParameter`] if the variable holds an unknown style.
    pub fn from_env() -> Result<Self> {
        let mut options = Self::default();
        match env::var(FACE_STYLE_ENV) {
            Ok(style) => {
                options.style = style.parse()?;
                log::debug!("{FACE_STYLE_ENV}={style} -> {:?}", options.style);
            }
            Err(env::VarError::NotPresent) => {}
            Err(env::VarError::NotUnicode(raw)) => {
                return Err(Error::invalid_parameter(
                    FACE_STYLE_ENV,
                    raw.to_string_lossy(),
                ));
            }
        }
        Ok(options)
    }

    #[must_use]
    pub fn with_style(mut self, style: FaceStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_score(mut self, placement: ScorePlacement) -> Self {
        self.score = placement;
        self
    }

    /// Prints the raw detector output (relative box, eye keypoints and precision tier) inside the
    /// bounding box, and logs the detection at debug level.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn style(&self) -> FaceStyle {
        self.style
    }

    pub fn score(&self) -> ScorePlacement {
        self.score
    }

    pub fn debug(&self) -> bool {
        self.debug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        assert!(HandOptions::default().flip_handedness());
        assert!(!PoseOptions::default().include_extremities());
        let face = FaceOptions::default();
        assert_eq!(face.style(), FaceStyle::Corners);
        assert_eq!(face.score(), ScorePlacement::Hidden);
        assert!(!face.debug());
        assert!(face.with_debug(true).debug());
    }

    #[test]
    fn face_style_env() {
        // The only test touching this variable.
        env::set_var(FACE_STYLE_ENV, "circle");
        assert_eq!(FaceOptions::from_env().unwrap().style(), FaceStyle::Circle);

        env::set_var(FACE_STYLE_ENV, "3");
        assert_eq!(
            FaceOptions::from_env(),
            Err(Error::InvalidParameter {
                name: "face style",
                value: "3".into(),
            })
        );

        env::remove_var(FACE_STYLE_ENV);
        assert_eq!(FaceOptions::from_env(), Ok(FaceOptions::default()));
    }
}
