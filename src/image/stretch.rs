use super::{ImageView, ImageViewMut};

/// A scaled copy of one image into another.
///
/// Returned by [`ImageViewMut::stretch_from`]. The copy is performed when this guard is dropped.
/// The source is scaled to the size of the destination using nearest neighbor sampling, and every
/// destination pixel, including its alpha channel, is overwritten.
pub struct Stretch<'a> {
    dest: ImageViewMut<'a>,
    src: ImageView<'a>,
}

impl<'a> Stretch<'a> {
    pub(super) fn new(dest: ImageViewMut<'a>, src: ImageView<'a>) -> Self {
        Self { dest, src }
    }
}

impl Drop for Stretch<'_> {
    fn drop(&mut self) {
        let (dest_w, dest_h) = (self.dest.width(), self.dest.height());
        let (src_w, src_h) = (self.src.width(), self.src.height());
        if src_w == 0 || src_h == 0 {
            return;
        }

        let sample = |dest: u32, dest_len: u32, src_len: u32| {
            ((dest as f32 + 0.5) / dest_len as f32 * src_len as f32) as u32
        };
        for dest_y in 0..dest_h {
            let src_y = sample(dest_y, dest_h, src_h);
            for dest_x in 0..dest_w {
                let src_x = sample(dest_x, dest_w, src_w);
                let color = self.src.get(src_x, src_y);
                self.dest.set(dest_x, dest_y, color);
            }
        }
    }
}
