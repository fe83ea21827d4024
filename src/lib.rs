//! Pixel-space geometry for body, hand and face landmarks.
//!
//! # Overview
//!
//! An external landmark model produces, per frame, zero or more *entities* (hands, faces, poses),
//! each an ordered list of landmarks in relative `[0, 1]` coordinates. This crate turns those into
//! pixel-space facts and annotations:
//!
//! - [`landmark`]: normalization of relative landmarks into [`landmark::LandmarkPoint`]s.
//! - [`bbox`]: bounding boxes with per-entity anchor policies.
//! - [`hand`], [`pose`], [`face`]: the entity types, their landmark topologies, and derived
//!   values like [`hand::FingerState`].
//! - [`measure`]: distances and three-point angles.
//! - [`image`]: an RGBA [`image::Image`] with views, drawing, alpha-mask compositing
//!   ([`image::overlay`]) and grid stacking.
//! - [`contour`]: contour extraction and shape filtering on preprocessed single-channel images.
//! - [`annotate`]: entity-level visualizations drawn onto a frame in place.
//!
//! Everything is synchronous and recomputed per call. Derived values always take the entity they
//! are derived from as an argument; nothing is cached between frames.
//!
//! # Coordinates
//!
//! All pixel coordinates use the image convention: X points right, Y points *down*, and `(0, 0)`
//! is the top left corner of the frame. Angles are measured in that coordinate system.
//!
//! # Environment Variables
//!
//! * `SIGHTLINE_FACE_STYLE`: Overrides the face annotation style picked up by
//!   [`config::FaceOptions::from_env`]. Allowed values are `corners` (or `1`) and `circle` (or
//!   `2`).
//! * `RUST_LOG`: Parsed by [`init_logger!`] on top of its defaults.

use log::LevelFilter;

pub mod annotate;
pub mod bbox;
pub mod config;
pub mod contour;
pub mod face;
pub mod hand;
pub mod image;
pub mod landmark;
pub mod measure;
pub mod pose;
pub mod resolution;
pub mod timer;

mod error;

pub use error::{Error, Result};

/// macro-use only, not part of public API.
#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    let log_level = if cfg!(debug_assertions) {
        LevelFilter::Trace
    } else {
        LevelFilter::Debug
    };
    env_logger::Builder::new()
        .filter(Some(calling_crate), log_level)
        .filter(Some(env!("CARGO_PKG_NAME")), log_level)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// If `cfg!(debug_assertions)` is enabled, the calling crate and this library will log at *trace*
/// level. Otherwise, they will log at *debug* level.
///
/// If a global logger is already registered, this macro will do nothing.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}
