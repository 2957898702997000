//! Immutable RGB frame buffers

use image::{Rgb, RgbImage, RgbaImage};

use super::Region;
use crate::{color::Color, AnalysisError, Result};

/// A width x height grid of RGB samples, origin top-left.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pixels: RgbImage,
}

impl Frame {
    /// Wrap a decoded RGB image
    pub fn new(pixels: RgbImage) -> Self {
        Self { pixels }
    }

    /// Build a frame from a packed RGB byte buffer (3 bytes per pixel)
    pub fn from_rgb(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        let actual = data.len();
        RgbImage::from_raw(width, height, data)
            .map(Self::new)
            .ok_or_else(|| {
                AnalysisError::invalid_parameter(
                    "rgb buffer length",
                    format!("{} (expected {})", actual, expected),
                )
            })
    }

    /// Build a frame from a packed RGBA buffer, compositing over white
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        let actual = data.len();
        let rgba = RgbaImage::from_raw(width, height, data).ok_or_else(|| {
            AnalysisError::invalid_parameter(
                "rgba buffer length",
                format!("{} (expected {})", actual, expected),
            )
        })?;
        Ok(Self::flatten(&rgba))
    }

    /// Composite an RGBA image over a white background
    pub fn flatten(rgba: &RgbaImage) -> Self {
        let pixels = RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
            let [r, g, b, a] = rgba.get_pixel(x, y).0;
            let alpha = a as u32;
            let over_white = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
            Rgb([over_white(r), over_white(g), over_white(b)])
        });
        Self::new(pixels)
    }

    /// Frame of a single color
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self::new(RgbImage::from_pixel(width, height, color.into()))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Full-frame rectangle
    pub fn bounds(&self) -> Region {
        Region::new(0, 0, self.width(), self.height())
    }

    /// Color at (x, y). Panics outside the frame, like `RgbImage::get_pixel`.
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        (*self.pixels.get_pixel(x, y)).into()
    }

    /// Row-major iteration over the pixels of a region inside this frame.
    ///
    /// The region must already be clipped to the frame, see
    /// [`Region::clamp_to`].
    pub fn region_pixels<'a>(&'a self, region: &Region) -> impl Iterator<Item = Color> + 'a {
        let Region { x, y, width, height } = *region;
        (y..y + height).flat_map(move |row| (x..x + width).map(move |col| self.pixel(col, row)))
    }

    pub fn as_image(&self) -> &RgbImage {
        &self.pixels
    }

    pub fn into_image(self) -> RgbImage {
        self.pixels
    }
}

impl From<RgbImage> for Frame {
    fn from(pixels: RgbImage) -> Self {
        Self::new(pixels)
    }
}
