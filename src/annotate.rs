//! Entity-level visualizations.
//!
//! Every function here draws onto the frame it is given, in place. Coordinates outside of the
//! frame are clipped. The drawn geometry is returned where it is computed along the way, so
//! callers don't have to derive it twice.

use itertools::Itertools;

use crate::{
    bbox::BoundingBox,
    config::{FaceOptions, PoseOptions, ScorePlacement},
    contour::Contour,
    face::{self, FaceDetection, FaceKeypoint, FaceMesh, FaceStyle},
    hand::{self, Hand},
    image::{self, AsImageViewMut, Color, ImageViewMut, Rect},
    measure::{Angle, Distance},
    pose::{self, Pose},
    Result,
};

/// Offset of labels and leader lines from the top left corner of a bounding box.
const LABEL_OFFSET: i32 = 30;

const FACE_CIRCLE_RADIUS: u32 = 64;

/// Draws the skeleton, landmarks, bounding box and handedness label of a hand.
///
/// # Errors
///
/// Fails with [`Error::EmptyDetection`] if the hand has no landmarks, and with
/// [`Error::MissingLandmark`] if its skeleton is incomplete.
///
/// [`Error::EmptyDetection`]: crate::Error::EmptyDetection
/// [`Error::MissingLandmark`]: crate::Error::MissingLandmark
pub fn draw_hand<I: AsImageViewMut>(image: &mut I, hand: &Hand) -> Result<BoundingBox> {
    draw_hand_impl(&mut image.as_view_mut(), hand)
}

fn draw_hand_impl(image: &mut ImageViewMut<'_>, hand: &Hand) -> Result<BoundingBox> {
    let bbox = hand.bounding_box()?;
    hand.landmarks().require(hand::NUM_LANDMARKS)?;

    for &(a, b) in hand::CONNECTIVITY {
        let (a_x, a_y) = hand.landmark(a)?.xy();
        let (b_x, b_y) = hand.landmark(b)?.xy();
        image::draw_line(image, a_x, a_y, b_x, b_y).color(Color::WHITE);
    }
    for lm in hand.landmarks().iter() {
        image::draw_marker(image, lm.x(), lm.y()).size(3);
    }

    image::draw_corner_rect(image, bbox.rect());
    image::draw_text(
        image,
        bbox.x() - LABEL_OFFSET,
        bbox.y() - LABEL_OFFSET,
        hand.handedness().label(),
    )
    .align_left()
    .align_bottom()
    .color(Color::AMBER);

    Ok(bbox)
}

/// Draws the skeleton and landmarks of a pose, its bounding box and a marker at the box center.
///
/// # Errors
///
/// Fails with [`Error::MissingLandmark`] if the pose does not have the full 33-landmark topology.
/// Nothing is drawn in that case.
///
/// [`Error::MissingLandmark`]: crate::Error::MissingLandmark
pub fn draw_pose<I: AsImageViewMut>(
    image: &mut I,
    pose: &Pose,
    options: &PoseOptions,
) -> Result<BoundingBox> {
    let image = &mut image.as_view_mut();
    let bbox = pose.bounding_box(options)?;
    pose.landmarks().require(pose::NUM_LANDMARKS)?;
    let (cx, cy) = bbox.center();

    for &(a, b) in pose::CONNECTIVITY {
        let (a_x, a_y) = pose.landmark(a)?.xy();
        let (b_x, b_y) = pose.landmark(b)?.xy();
        image::draw_line(image, a_x, a_y, b_x, b_y)
            .color(Color::WHITE)
            .stroke_width(2);
    }
    for lm in pose.landmarks().iter() {
        image::draw_marker(image, lm.x(), lm.y()).size(3);
    }

    image::draw_corner_rect(image, bbox.rect()).stroke_width(3);
    image::draw_circle(image, cx, cy, 2).filled();

    Ok(bbox)
}

/// Draws a face detection in the configured [`FaceStyle`], optionally labeled with its score.
///
/// With [`FaceOptions::with_debug`], the detector's raw output is listed inside the box as well.
pub fn draw_face<I: AsImageViewMut>(
    image: &mut I,
    face: &FaceDetection,
    options: &FaceOptions,
) -> BoundingBox {
    draw_face_impl(&mut image.as_view_mut(), face, options)
}

fn draw_face_impl(
    image: &mut ImageViewMut<'_>,
    face: &FaceDetection,
    options: &FaceOptions,
) -> BoundingBox {
    let bbox = face.bounding_box();
    let (x, y) = (bbox.x(), bbox.y());
    let (cx, cy) = bbox.center();

    match options.style() {
        FaceStyle::Corners => {
            image::draw_corner_rect(image, bbox.rect());
        }
        FaceStyle::Circle => {
            image::draw_line(image, cx - 45, cy - 45, x - LABEL_OFFSET, y - LABEL_OFFSET)
                .color(Color::AMBER);
            image::draw_circle(image, cx, cy, FACE_CIRCLE_RADIUS).color(Color::AMBER);
        }
    }

    let label = format!("{}% Accuracy", (face.score() * 100.0) as i32);
    match options.score() {
        ScorePlacement::Hidden => {}
        ScorePlacement::Inside => draw_info(image, x, y + 17, &label),
        ScorePlacement::Outside => {
            image::draw_line(image, x, y, x - LABEL_OFFSET, y - LABEL_OFFSET)
                .color(Color::AMBER);
            image::draw_rect(image, Rect::from_top_left(x - 145, y - 50, 115, 20))
                .color(Color::AMBER)
                .filled();
            image::draw_text(image, x - 140, y - 35, &label)
                .small()
                .align_left()
                .align_bottom()
                .color(Color::BLACK);
        }
    }

    if options.debug() {
        log::debug!("face detection: {face:?}");
        if options.score() != ScorePlacement::Inside {
            draw_info(image, x, y + 17, &label);
        }
        draw_face_debug(image, face, (x, y));
    }

    log::trace!("face {:?}, {}", bbox, face.precision());
    bbox
}

fn draw_face_debug(image: &mut ImageViewMut<'_>, face: &FaceDetection, (x, y): (i32, i32)) {
    let rel = face.relative_box();
    let mut lines = vec![
        (28, format!("Xmin: {:.4}", rel.xmin)),
        (38, format!("Ymin: {:.4}", rel.ymin)),
        (48, face.precision().to_string()),
        (58, format!("Width: {:.4}", rel.width)),
        (68, format!("Height: {:.4}", rel.height)),
    ];
    let eyes = [
        (78, FaceKeypoint::RightEye, "Right Eye"),
        (88, FaceKeypoint::LeftEye, "Left Eye"),
    ];
    for (dy, keypoint, name) in eyes {
        if let Some([kx, ky]) = face.relative_keypoint(keypoint) {
            lines.push((dy, format!("{name}: {kx:.4}, {ky:.4}")));
        }
    }

    for (dy, text) in &lines {
        draw_info(image, x, y + dy, text);
    }
}

/// Small gray text just inside the left edge of a box at `x`, with its bottom at `y`.
fn draw_info(image: &mut ImageViewMut<'_>, x: i32, y: i32, text: &str) {
    image::draw_text(image, x + 5, y, text)
        .small()
        .align_left()
        .align_bottom()
        .color(Color::GRAY);
}

/// Traces the face oval, lips, eyes and eyebrows of a face mesh in `color`.
///
/// # Errors
///
/// Fails with [`Error::MissingLandmark`] if the mesh does not have the full 468-landmark topology.
/// Nothing is drawn in that case.
///
/// [`Error::MissingLandmark`]: crate::Error::MissingLandmark
pub fn draw_face_mesh<I: AsImageViewMut>(
    image: &mut I,
    mesh: &FaceMesh,
    color: Color,
) -> Result<()> {
    let image = &mut image.as_view_mut();
    let landmarks = mesh.landmarks();
    landmarks.require(face::NUM_MESH_LANDMARKS)?;

    for contour in face::MESH_CONTOURS {
        for (&a, &b) in contour.iter().tuple_windows() {
            let (a_x, a_y) = landmarks[a].xy();
            let (b_x, b_y) = landmarks[b].xy();
            image::draw_line(image, a_x, a_y, b_x, b_y).color(color);
        }
    }
    Ok(())
}

/// Marks both endpoints and the midpoint of a distance measurement and connects the endpoints.
pub fn draw_distance<I: AsImageViewMut>(image: &mut I, distance: &Distance) {
    let image = &mut image.as_view_mut();
    let (x1, y1) = distance.start();
    let (x2, y2) = distance.end();
    let (cx, cy) = distance.midpoint();

    image::draw_line(image, x1, y1, x2, y2)
        .color(Color::MAGENTA)
        .stroke_width(3);
    image::draw_circle(image, x1, y1, 15).filled();
    image::draw_circle(image, x2, y2, 15).filled();
    image::draw_circle(image, cx, cy, 15)
        .color(Color::RED)
        .filled();
}

/// Draws both arms of an angle measurement and labels its vertex with the whole degrees.
pub fn draw_angle<I: AsImageViewMut>(image: &mut I, angle: &Angle) {
    let image = &mut image.as_view_mut();
    let [p1, p2, p3] = angle.points();

    for (x, y) in [p1, p3] {
        image::draw_line(image, x, y, p2.0, p2.1).color(Color::AMBER);
    }
    for (x, y) in [p1, p2, p3] {
        image::draw_circle(image, x, y, 10).filled();
        image::draw_circle(image, x, y, 15).stroke_width(2);
    }

    let label = (angle.degrees() as i32).to_string();
    image::draw_text(image, p2.0 - 50, p2.1 + 50, &label)
        .align_left()
        .align_bottom();
}

/// Outlines a contour, draws its bounding box and marks its center.
pub fn draw_contour<I: AsImageViewMut>(image: &mut I, contour: &Contour, color: Color) {
    let image = &mut image.as_view_mut();
    let points = contour.points();

    for (i, &(x0, y0)) in points.iter().enumerate() {
        let (x1, y1) = points[(i + 1) % points.len()];
        image::draw_line(image, x0, y0, x1, y1)
            .color(color)
            .stroke_width(3);
    }

    let (cx, cy) = contour.center();
    image::draw_rect(image, contour.bounding_box().rect())
        .color(color)
        .stroke_width(2);
    image::draw_circle(image, cx, cy, 5).color(color).filled();
}
