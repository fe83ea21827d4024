use std::fmt;

use crate::resolution::Resolution;

/// Errors returned by fallible geometry and compositing operations.
///
/// None of these are transient: retrying the same call with the same inputs fails the same way.
/// Callers decide whether to skip the frame or abort the stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// An unsupported mode or option value was passed to a selector.
    InvalidParameter {
        name: &'static str,
        value: String,
    },

    /// A landmark index required by the requested policy is not present in the landmark set.
    MissingLandmark { index: usize, len: usize },

    /// A derived computation was requested, but no corresponding entity was detected.
    EmptyDetection { entity: &'static str },

    /// A compositing rectangle at `offset` of size `size` does not fit into `target`.
    OutOfBounds {
        offset: (i32, i32),
        size: Resolution,
        target: Resolution,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn invalid_parameter(name: &'static str, value: impl fmt::Display) -> Self {
        Self::InvalidParameter {
            name,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidParameter { name, value } => {
                write!(f, "invalid value '{value}' for parameter '{name}'")
            }
            Error::MissingLandmark { index, len } => write!(
                f,
                "landmark {index} is required, but the landmark set only has {len} entries"
            ),
            Error::EmptyDetection { entity } => write!(f, "no {entity} detected in this frame"),
            Error::OutOfBounds {
                offset: (x, y),
                size,
                target,
            } => write!(
                f,
                "{size} image placed at ({x},{y}) does not fit into {target} image"
            ),
        }
    }
}

impl std::error::Error for Error {}
