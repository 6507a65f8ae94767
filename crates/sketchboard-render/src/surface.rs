//! Fixed-size raster surfaces.

use crate::color::SerializableColor;
use crate::stroke::{self, StrokeStyle};
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use kurbo::{BezPath, Point};

/// An owned RGBA8 pixel buffer.
///
/// Cloning copies every pixel, which is what shape previews rely on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    pixels: RgbaImage,
}

impl Surface {
    /// Create a fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
        }
    }

    /// Wrap an existing image buffer.
    pub fn from_image(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Color at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<SerializableColor> {
        self.pixels.get_pixel_checked(x, y).map(|px| (*px).into())
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        self.fill(SerializableColor::transparent());
    }

    pub fn fill(&mut self, color: SerializableColor) {
        let px = color.into();
        for p in self.pixels.pixels_mut() {
            *p = px;
        }
    }

    /// True when no pixel has any alpha.
    pub fn is_blank(&self) -> bool {
        self.pixels.pixels().all(|p| p.0[3] == 0)
    }

    /// Stroke an outline with the given pen.
    pub fn stroke_path(&mut self, path: &BezPath, style: &StrokeStyle) {
        stroke::stroke_path(&mut self.pixels, path, style);
    }

    /// Stroke one straight segment with round caps.
    pub fn stroke_line(&mut self, from: Point, to: Point, style: &StrokeStyle) {
        stroke::stroke_line(&mut self.pixels, from, to, style);
    }

    /// Composite `other` over this surface with its top-left at the origin.
    /// Pixels outside this surface are dropped.
    pub fn draw_surface(&mut self, other: &Surface) {
        imageops::overlay(&mut self.pixels, &other.pixels, 0, 0);
    }

    /// Copy a decoded image's pixels to the origin without blending.
    pub fn paste_image(&mut self, image: &DynamicImage) {
        imageops::replace(&mut self.pixels, &image.to_rgba8(), 0, 0);
    }

    /// Composite a decoded image scaled to `width` x `height` at the origin.
    pub fn draw_image_scaled(&mut self, image: &DynamicImage, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        let scaled = imageops::resize(&image.to_rgba8(), width, height, FilterType::Triangle);
        imageops::overlay(&mut self.pixels, &scaled, 0, 0);
    }

    /// Square preview of this surface, stretched like the layer grid shows it.
    pub fn thumbnail(&self, edge: u32) -> Surface {
        if self.width() == 0 || self.height() == 0 {
            return Surface::new(edge, edge);
        }
        Surface::from_image(imageops::resize(&self.pixels, edge, edge, FilterType::Triangle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_surface_is_blank() {
        let s = Surface::new(4, 3);
        assert_eq!(s.dimensions(), (4, 3));
        assert!(s.is_blank());
        assert_eq!(s.pixel(4, 0), None);
    }

    #[test]
    fn test_draw_surface_composites_over() {
        let mut bottom = Surface::new(4, 4);
        bottom.fill(SerializableColor::rgb(255, 0, 0));

        let mut top = Surface::new(2, 2);
        top.fill(SerializableColor::rgb(0, 0, 255));

        bottom.draw_surface(&top);
        assert_eq!(bottom.pixel(1, 1), Some(SerializableColor::rgb(0, 0, 255)));
        assert_eq!(bottom.pixel(3, 3), Some(SerializableColor::rgb(255, 0, 0)));
    }

    #[test]
    fn test_draw_larger_surface_is_clipped() {
        let mut small = Surface::new(2, 2);
        let mut big = Surface::new(10, 10);
        big.fill(SerializableColor::black());
        small.draw_surface(&big);
        assert_eq!(small.dimensions(), (2, 2));
        assert_eq!(small.pixel(1, 1), Some(SerializableColor::black()));
    }

    #[test]
    fn test_paste_copies_exact_pixels() {
        let mut src = Surface::new(2, 2);
        src.fill(SerializableColor::new(10, 20, 30, 77));
        let image = DynamicImage::ImageRgba8(src.image().clone());

        let mut dst = Surface::new(3, 3);
        dst.paste_image(&image);
        assert_eq!(dst.pixel(1, 1), Some(SerializableColor::new(10, 20, 30, 77)));
        assert_eq!(dst.pixel(2, 2), Some(SerializableColor::transparent()));
    }

    #[test]
    fn test_draw_image_scaled_covers_target() {
        let mut src = Surface::new(2, 2);
        src.fill(SerializableColor::rgb(0, 255, 0));
        let image = DynamicImage::ImageRgba8(src.into_image());

        let mut dst = Surface::new(10, 10);
        dst.draw_image_scaled(&image, 6, 6);
        let inside = dst.pixel(3, 3).unwrap();
        assert_eq!((inside.r, inside.g, inside.b), (0, 255, 0));
        assert_eq!(dst.pixel(8, 8), Some(SerializableColor::transparent()));
    }

    #[test]
    fn test_clear_resets_pixels() {
        let mut s = Surface::new(3, 3);
        s.fill(SerializableColor::white());
        assert!(!s.is_blank());
        s.clear();
        assert!(s.is_blank());
    }

    #[test]
    fn test_thumbnail_size() {
        let mut s = Surface::new(300, 150);
        s.fill(SerializableColor::black());
        let thumb = s.thumbnail(100);
        assert_eq!(thumb.dimensions(), (100, 100));
        let px = thumb.pixel(50, 50).unwrap();
        assert_eq!((px.r, px.g, px.b), (0, 0, 0));
        assert!(px.a > 250);
    }
}
