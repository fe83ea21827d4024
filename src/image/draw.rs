use std::convert::Infallible;

use embedded_graphics::{
    draw_target::DrawTarget,
    mono_font::{
        ascii::{FONT_10X20, FONT_6X10},
        MonoTextStyle,
    },
    prelude::*,
    primitives::{Circle, Line, PrimitiveStyle, Rectangle},
    text::{self, Text, TextStyleBuilder},
};

use crate::image::{AsImageViewMut, Color, ImageViewMut, Rect};

/// Guard returned by [`draw_rect`]; draws the rectangle when dropped and allows customization.
pub struct DrawRect<'a> {
    image: ImageViewMut<'a>,
    rect: Rect,
    color: Color,
    stroke_width: u32,
    filled: bool,
}

impl DrawRect<'_> {
    /// Sets the rectangle's color.
    pub fn color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    /// Sets the rectangle's stroke width.
    ///
    /// By default, a stroke width of 1 is used.
    pub fn stroke_width(&mut self, width: u32) -> &mut Self {
        self.stroke_width = width;
        self
    }

    /// Fills the rectangle instead of drawing its outline.
    pub fn filled(&mut self) -> &mut Self {
        self.filled = true;
        self
    }
}

impl Drop for DrawRect<'_> {
    fn drop(&mut self) {
        let style = if self.filled {
            PrimitiveStyle::with_fill(self.color)
        } else {
            PrimitiveStyle::with_stroke(self.color, self.stroke_width)
        };
        draw(&mut self.image, self.rect.rect.into_styled(style));
    }
}

/// Guard returned by [`draw_corner_rect`]; draws the corner brackets when dropped and allows
/// customization.
pub struct DrawCornerRect<'a> {
    image: ImageViewMut<'a>,
    rect: Rect,
    color: Color,
    outline_color: Color,
    corner_length: u32,
    stroke_width: u32,
    outline_width: u32,
}

impl DrawCornerRect<'_> {
    /// Sets the color of the corner brackets and of the outline.
    pub fn color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self.outline_color = color;
        self
    }

    /// Sets the color of the outline only.
    pub fn outline_color(&mut self, color: Color) -> &mut Self {
        self.outline_color = color;
        self
    }

    /// Sets the length of each of the 8 corner strokes, measured from the corner.
    ///
    /// The default is 20 pixels.
    pub fn corner_length(&mut self, length: u32) -> &mut Self {
        self.corner_length = length;
        self
    }

    /// Sets the stroke width of the corner brackets.
    pub fn stroke_width(&mut self, width: u32) -> &mut Self {
        self.stroke_width = width;
        self
    }

    /// Additionally draws the full rectangle outline with the given stroke width.
    ///
    /// By default (width 0), no outline is drawn.
    pub fn outline(&mut self, width: u32) -> &mut Self {
        self.outline_width = width;
        self
    }
}

impl Drop for DrawCornerRect<'_> {
    fn drop(&mut self) {
        if self.outline_width != 0 {
            let style = PrimitiveStyle::with_stroke(self.outline_color, self.outline_width);
            draw(&mut self.image, self.rect.rect.into_styled(style));
        }

        // The far corners lie on `x + width` and `y + height`, one past the last pixel row and
        // column covered by the rectangle.
        let (x0, y0) = (self.rect.x(), self.rect.y());
        let (x1, y1) = (x0 + self.rect.width() as i32, y0 + self.rect.height() as i32);
        let len = self.corner_length as i32;
        let style = PrimitiveStyle::with_stroke(self.color, self.stroke_width);
        for (cx, cy, dx, dy) in [
            (x0, y0, len, len),
            (x1, y0, -len, len),
            (x0, y1, len, -len),
            (x1, y1, -len, -len),
        ] {
            let corner = Point::new(cx, cy);
            draw(
                &mut self.image,
                Line::new(corner, Point::new(cx + dx, cy)).into_styled(style),
            );
            draw(
                &mut self.image,
                Line::new(corner, Point::new(cx, cy + dy)).into_styled(style),
            );
        }
    }
}

/// Guard returned by [`draw_marker`]; draws the marker when dropped and allows customization.
pub struct DrawMarker<'a> {
    image: ImageViewMut<'a>,
    x: i32,
    y: i32,
    color: Color,
    size: u32,
}

impl<'a> DrawMarker<'a> {
    /// Sets the marker's color.
    pub fn color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    /// Sets the width and height of the marker.
    ///
    /// The default size is 5. The size must be *uneven* and *non-zero*. A size of 1 will result in
    /// a single pixel getting drawn.
    pub fn size(&mut self, size: u32) -> &mut Self {
        assert!(size != 0, "marker size must be greater than zero");
        assert!(size % 2 == 1, "marker size must be an uneven number");
        self.size = size;
        self
    }
}

impl Drop for DrawMarker<'_> {
    fn drop(&mut self) {
        let offset = ((self.size - 1) / 2) as i32;
        let diagonals = (-offset..=offset)
            .zip(-offset..=offset)
            .chain((-offset..=offset).rev().zip(-offset..=offset));
        let pixels = diagonals.map(|(xoff, yoff)| {
            Pixel(
                Point {
                    x: self.x + xoff,
                    y: self.y + yoff,
                },
                self.color,
            )
        });
        match Target(self.image.reborrow()).draw_iter(pixels) {
            Ok(()) => {}
            Err(infallible) => match infallible {},
        }
    }
}

/// Guard returned by [`draw_line`]; draws the line when dropped and allows customization.
pub struct DrawLine<'a> {
    image: ImageViewMut<'a>,
    start: Point,
    end: Point,
    color: Color,
    stroke_width: u32,
}

impl<'a> DrawLine<'a> {
    /// Sets the line's color.
    pub fn color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    /// Sets the line's stroke width.
    ///
    /// By default, a stroke width of 1 is used.
    pub fn stroke_width(&mut self, width: u32) -> &mut Self {
        self.stroke_width = width;
        self
    }
}

impl<'a> Drop for DrawLine<'a> {
    fn drop(&mut self) {
        let style = PrimitiveStyle::with_stroke(self.color, self.stroke_width);
        draw(
            &mut self.image,
            Line::new(self.start, self.end).into_styled(style),
        );
    }
}

/// Guard returned by [`draw_circle`]; draws the circle when dropped and allows customization.
pub struct DrawCircle<'a> {
    image: ImageViewMut<'a>,
    center: Point,
    radius: u32,
    color: Color,
    stroke_width: u32,
    filled: bool,
}

impl<'a> DrawCircle<'a> {
    /// Sets the circle's color.
    pub fn color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    /// Sets the stroke width of the circle's outline.
    ///
    /// By default, a stroke width of 1 is used.
    pub fn stroke_width(&mut self, width: u32) -> &mut Self {
        self.stroke_width = width;
        self
    }

    /// Fills the circle instead of drawing its outline.
    pub fn filled(&mut self) -> &mut Self {
        self.filled = true;
        self
    }
}

impl<'a> Drop for DrawCircle<'a> {
    fn drop(&mut self) {
        let style = if self.filled {
            PrimitiveStyle::with_fill(self.color)
        } else {
            PrimitiveStyle::with_stroke(self.color, self.stroke_width)
        };
        let circle = Circle::with_center(self.center, self.radius * 2 + 1);
        draw(&mut self.image, circle.into_styled(style));
    }
}

/// Guard returned by [`draw_text`]; draws the text when dropped and allows customization.
pub struct DrawText<'a> {
    image: ImageViewMut<'a>,
    x: i32,
    y: i32,
    text: &'a str,
    color: Color,
    small: bool,
    alignment: text::Alignment,
    baseline: text::Baseline,
}

impl<'a> DrawText<'a> {
    /// Sets the text color.
    pub fn color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    /// Uses a smaller font, suitable for secondary labels.
    pub fn small(&mut self) -> &mut Self {
        self.small = true;
        self
    }

    /// Aligns the top of the text with the `y` coordinate.
    pub fn align_top(&mut self) -> &mut Self {
        self.baseline = text::Baseline::Top;
        self
    }

    /// Aligns the bottom of the text with the `y` coordinate.
    pub fn align_bottom(&mut self) -> &mut Self {
        self.baseline = text::Baseline::Bottom;
        self
    }

    /// Aligns the left side of the text with the `x` coordinate.
    pub fn align_left(&mut self) -> &mut Self {
        self.alignment = text::Alignment::Left;
        self
    }

    /// Aligns the right side of the text with the `x` coordinate.
    pub fn align_right(&mut self) -> &mut Self {
        self.alignment = text::Alignment::Right;
        self
    }
}

impl<'a> Drop for DrawText<'a> {
    fn drop(&mut self) {
        let font = if self.small { &FONT_6X10 } else { &FONT_10X20 };
        let character_style = MonoTextStyle::new(font, self.color);
        let text_style = TextStyleBuilder::new()
            .alignment(self.alignment)
            .baseline(self.baseline)
            .build();
        draw(
            &mut self.image,
            Text::with_text_style(
                self.text,
                Point::new(self.x, self.y),
                character_style,
                text_style,
            ),
        );
    }
}

/// Draws a rectangle onto an image.
pub fn draw_rect<I: AsImageViewMut>(image: &mut I, rect: Rect) -> DrawRect<'_> {
    DrawRect {
        image: image.as_view_mut(),
        rect,
        color: Color::RED,
        stroke_width: 1,
        filled: false,
    }
}

/// Draws corner brackets around a rectangle onto an image.
///
/// Each corner gets a horizontal and a vertical stroke pointing along the rectangle's edges.
/// Optionally, the full outline can be drawn as well (see [`DrawCornerRect::outline`]).
pub fn draw_corner_rect<I: AsImageViewMut>(image: &mut I, rect: Rect) -> DrawCornerRect<'_> {
    DrawCornerRect {
        image: image.as_view_mut(),
        rect,
        color: Color::AMBER,
        outline_color: Color::AMBER,
        corner_length: 20,
        stroke_width: 1,
        outline_width: 0,
    }
}

/// Draws a marker onto an image.
///
/// This can be used to visualize shape landmarks or points of interest.
pub fn draw_marker<I: AsImageViewMut>(image: &mut I, x: i32, y: i32) -> DrawMarker<'_> {
    DrawMarker {
        image: image.as_view_mut(),
        x,
        y,
        color: Color::RED,
        size: 5,
    }
}

/// Draws a line onto an image.
pub fn draw_line<I: AsImageViewMut>(
    image: &mut I,
    start_x: i32,
    start_y: i32,
    end_x: i32,
    end_y: i32,
) -> DrawLine<'_> {
    DrawLine {
        image: image.as_view_mut(),
        start: Point::new(start_x, start_y),
        end: Point::new(end_x, end_y),
        color: Color::BLUE,
        stroke_width: 1,
    }
}

/// Draws a circle of radius `radius` around `(x, y)` onto an image.
///
/// A radius of 0 draws a single pixel.
pub fn draw_circle<I: AsImageViewMut>(image: &mut I, x: i32, y: i32, radius: u32) -> DrawCircle<'_> {
    DrawCircle {
        image: image.as_view_mut(),
        center: Point::new(x, y),
        radius,
        color: Color::MAGENTA,
        stroke_width: 1,
        filled: false,
    }
}

/// Draws a text string onto an image.
///
/// By default, the text is drawn centered horizontally and vertically around `x` and `y`.
pub fn draw_text<'a, I: AsImageViewMut>(
    image: &'a mut I,
    x: i32,
    y: i32,
    text: &'a str,
) -> DrawText<'a> {
    DrawText {
        image: image.as_view_mut(),
        x,
        y,
        text,
        color: Color::RED,
        small: false,
        alignment: text::Alignment::Center,
        baseline: text::Baseline::Middle,
    }
}

fn draw<D: Drawable<Color = Color>>(image: &mut ImageViewMut<'_>, drawable: D) {
    match drawable.draw(&mut Target(image.reborrow())) {
        Ok(_) => {}
        Err(infallible) => match infallible {},
    }
}

struct Target<'a>(ImageViewMut<'a>);

impl Dimensions for Target<'_> {
    fn bounding_box(&self) -> Rectangle {
        self.0.rect().rect
    }
}

impl DrawTarget for Target<'_> {
    type Color = Color;

    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            // Out-of-view writes are dropped by `set`.
            if let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) {
                self.0.set(x, y, color);
            }
        }

        Ok(())
    }
}
