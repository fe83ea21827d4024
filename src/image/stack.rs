use crate::{Error, Result};

use super::{AsImageView, Color, Image, Rect};

/// Tiles `images` into a grid with `cols` columns.
///
/// Every cell has the size of the first image scaled by `scale`. Each image is stretched to fit
/// its cell, filling the grid row by row. Cells without an image in the last row are black. The
/// returned grid is fully opaque: the alpha channel of the sources is discarded.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] if `images` is empty, `cols` is 0, or `scale` is not a
/// positive, finite number.
pub fn stack_images<V: AsImageView>(images: &[V], cols: usize, scale: f32) -> Result<Image> {
    let first = images
        .first()
        .ok_or_else(|| Error::invalid_parameter("images", "[]"))?;
    if cols == 0 {
        return Err(Error::invalid_parameter("cols", cols));
    }
    if !(scale.is_finite() && scale > 0.0) {
        return Err(Error::invalid_parameter("scale", scale));
    }

    let cell = first.as_view().resolution().scale(scale);
    let rows = (images.len() + cols - 1) / cols;
    let mut grid = Image::filled(
        (cell.width() * cols as u32, cell.height() * rows as u32).into(),
        Color::BLACK,
    );
    log::trace!(
        "stacking {} images into {cols}x{rows} grid of {cell} cells",
        images.len()
    );

    for (i, image) in images.iter().enumerate() {
        let (col, row) = ((i % cols) as u32, (i / cols) as u32);
        let rect = Rect::from_top_left(
            (col * cell.width()) as i32,
            (row * cell.height()) as i32,
            cell.width(),
            cell.height(),
        );
        let src = image.as_view();
        grid.view_mut(rect).stretch_from(&src);
        let mut cell_view = grid.view_mut(rect);
        for y in 0..cell.height() {
            for x in 0..cell.width() {
                let color = cell_view.get(x, y);
                cell_view.set(x, y, color.with_alpha(255));
            }
        }
    }

    Ok(grid)
}
