//! Half-block image widget.
//!
//! Each terminal cell shows two vertically stacked pixels: `▀` with the top
//! pixel as foreground and the bottom pixel as background.

use image::{Rgb, RgbImage};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    widgets::Widget,
};

/// Draws an `RgbImage` scaled against a reference size.
///
/// The scale is chosen so an image of `reference` dimensions fits the area.
/// A larger image (zoomed in) is cropped around its centre; a smaller one is
/// centred with empty margins.
pub struct PixelView<'a> {
    image: &'a RgbImage,
    reference: (u32, u32),
}

impl<'a> PixelView<'a> {
    /// Fit `image` itself to the area.
    #[must_use]
    pub fn new(image: &'a RgbImage) -> Self {
        Self {
            image,
            reference: image.dimensions(),
        }
    }

    /// Scale as if an image of `width` x `height` were being fitted.
    #[must_use]
    pub fn reference(mut self, width: u32, height: u32) -> Self {
        self.reference = (width, height);
        self
    }
}

fn to_color(pixel: Rgb<u8>) -> Color {
    Color::Rgb(pixel[0], pixel[1], pixel[2])
}

impl Widget for PixelView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (ref_w, ref_h) = self.reference;
        let (img_w, img_h) = self.image.dimensions();
        if area.is_empty() || ref_w == 0 || ref_h == 0 || img_w == 0 || img_h == 0 {
            return;
        }

        // Virtual canvas: one column per cell, two rows per cell.
        let cols = f64::from(area.width);
        let rows = f64::from(area.height) * 2.0;
        let scale = (cols / f64::from(ref_w)).min(rows / f64::from(ref_h));

        let full_w = f64::from(img_w) * scale;
        let full_h = f64::from(img_h) * scale;
        let shown_w = full_w.min(cols).floor().max(1.0);
        let shown_h = full_h.min(rows).floor().max(1.0);

        let pad_x = ((cols - shown_w) / 2.0).floor() as u16;
        let pad_y = ((rows - shown_h) / 4.0).floor() as u16;
        let crop_x = (full_w - shown_w).max(0.0) / 2.0;
        let crop_y = (full_h - shown_h).max(0.0) / 2.0;

        let sample = |vx: f64, vy: f64| -> Rgb<u8> {
            let sx = (((vx + crop_x) / scale) as u32).min(img_w - 1);
            let sy = (((vy + crop_y) / scale) as u32).min(img_h - 1);
            *self.image.get_pixel(sx, sy)
        };

        let cell_rows = (shown_h / 2.0).ceil() as u16;
        for cy in 0..cell_rows {
            for cx in 0..shown_w as u16 {
                let x = area.x + pad_x + cx;
                let y = area.y + pad_y + cy;
                if x >= area.right() || y >= area.bottom() {
                    continue;
                }
                let vx = f64::from(cx);
                let top_y = f64::from(cy) * 2.0;
                let top = sample(vx, top_y);
                let bottom = (top_y + 1.0 < shown_h).then(|| sample(vx, top_y + 1.0));

                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_symbol("▀").set_fg(to_color(top));
                    match bottom {
                        Some(px) => cell.set_bg(to_color(px)),
                        None => cell.set_bg(Color::Reset),
                    };
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fills_cells_with_half_blocks() {
        let img = RgbImage::from_fn(4, 4, |_, y| if y < 2 { Rgb([255, 0, 0]) } else { Rgb([0, 0, 255]) });
        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        PixelView::new(&img).render(area, &mut buf);

        let top = &buf[(0, 0)];
        assert_eq!(top.symbol(), "▀");
        assert_eq!(top.fg, Color::Rgb(255, 0, 0));
        assert_eq!(top.bg, Color::Rgb(255, 0, 0));
        let bottom = &buf[(3, 1)];
        assert_eq!(bottom.fg, Color::Rgb(0, 0, 255));
    }

    #[test]
    fn test_smaller_image_is_centred() {
        let img = RgbImage::from_pixel(2, 2, Rgb([9, 9, 9]));
        let area = Rect::new(0, 0, 8, 4);
        let mut buf = Buffer::empty(area);
        PixelView::new(&img).reference(4, 4).render(area, &mut buf);

        assert_eq!(buf[(0, 0)].symbol(), " ");
        assert_eq!(buf[(2, 1)].fg, Color::Rgb(9, 9, 9));
    }
}
