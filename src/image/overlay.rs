use itertools::izip;

use crate::{Error, Result};

use super::{AsImageView, Color, Image, Rect};

/// Composites `foreground` onto a copy of `background`, with its top left corner at `offset`.
///
/// The alpha channel of `foreground` is used as a binary-ish mask in the style of a bitwise
/// compositor: for every color channel, the result is
/// `(background & !alpha) | (foreground & alpha)`. An alpha of 255 copies the foreground color, an
/// alpha of 0 keeps the background color. The alpha channel of `background` is carried over
/// unchanged.
///
/// Neither input is modified. The returned [`Image`] has the size of `background`.
///
/// # Errors
///
/// Returns [`Error::OutOfBounds`] if `foreground` placed at `offset` does not lie completely
/// within `background`. Nothing is written in that case.
pub fn overlay<B: AsImageView, F: AsImageView>(
    background: &B,
    foreground: &F,
    offset: (i32, i32),
) -> Result<Image> {
    let (bg, fg) = (background.as_view(), foreground.as_view());
    let (x, y) = offset;
    let target = Rect::from_top_left(x, y, fg.width(), fg.height());
    if !bg.rect().contains_rect(&target) {
        return Err(Error::OutOfBounds {
            offset,
            size: fg.resolution(),
            target: bg.resolution(),
        });
    }

    // Two background-sized layers: the masked foreground color (zero elsewhere), and the inverted
    // mask (all ones elsewhere). Their alpha channels pass the background's alpha through.
    let res = bg.resolution();
    let mut color_layer = Image::filled(res, Color::NULL);
    let mut mask_layer = Image::filled(res, Color::WHITE);
    for fy in 0..fg.height() {
        for fx in 0..fg.width() {
            let Color([r, g, b, a]) = fg.get(fx, fy);
            let (lx, ly) = (x as u32 + fx, y as u32 + fy);
            color_layer.set(lx, ly, Color([r & a, g & a, b & a, 0]));
            mask_layer.set(lx, ly, Color([!a, !a, !a, 255]));
        }
    }

    let mut out = bg.to_image();
    for (dest, mask, color) in izip!(
        out.buf.iter_mut(),
        mask_layer.data().iter(),
        color_layer.data().iter()
    ) {
        *dest = (*dest & mask) | color;
    }

    log::trace!("overlaid {} image at ({x},{y}) onto {}", fg.resolution(), res);
    Ok(out)
}
