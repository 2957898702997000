//! Square canvas normalization and debug annotation
//!
//! Still images arrive at arbitrary sizes and aspect ratios. Before the
//! still region is placed they are redrawn onto a fixed square canvas: the
//! longer side fills the canvas, the shorter side is centered, and the rest
//! stays white.

use image::{imageops, imageops::FilterType, Rgb, RgbImage};
use imageproc::{drawing::draw_hollow_rect_mut, rect::Rect};
use log::debug;

use super::{Frame, Region};
use crate::{deadline::Deadline, AnalysisError, Result};

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const OUTLINE: Rgb<u8> = Rgb([0, 255, 0]);
const OUTLINE_WIDTH: i32 = 3;

/// Size of `width x height` scaled so its longer side equals `size`.
///
/// Neither side drops below one pixel.
pub fn fitted_size(width: u32, height: u32, size: u32) -> (u32, u32) {
    let scale = size as f64 / width.max(height) as f64;
    let fit = |side: u32| ((side as f64 * scale).round() as u32).clamp(1, size);
    (fit(width), fit(height))
}

/// Redraw `frame` centered on a white `size x size` canvas.
pub fn normalize_to_canvas(frame: &Frame, size: u32, deadline: &Deadline) -> Result<RgbImage> {
    if size == 0 {
        return Err(AnalysisError::invalid_parameter("canvas size", size));
    }
    if frame.is_empty() {
        return Err(AnalysisError::invalid_parameter(
            "frame size",
            format!("{}x{}", frame.width(), frame.height()),
        ));
    }

    let (width, height) = fitted_size(frame.width(), frame.height(), size);
    let resized = if (width, height) == (frame.width(), frame.height()) {
        frame.as_image().clone()
    } else {
        imageops::resize(frame.as_image(), width, height, FilterType::Triangle)
    };
    deadline.check("canvas resize")?;

    let mut canvas = RgbImage::from_pixel(size, size, BACKGROUND);
    let offset_x = (size - width) / 2;
    let offset_y = (size - height) / 2;
    imageops::overlay(&mut canvas, &resized, offset_x as i64, offset_y as i64);

    debug!(
        "Normalized {}x{} frame to {}x{} at +{}+{} on a {}px canvas",
        frame.width(),
        frame.height(),
        width,
        height,
        offset_x,
        offset_y,
        size
    );
    Ok(canvas)
}

/// Copy of `canvas` with `region` outlined by a 3px green border
/// centered on the region edge.
pub fn annotate_region(canvas: &RgbImage, region: Region) -> RgbImage {
    let mut annotated = canvas.clone();
    let half = OUTLINE_WIDTH / 2;
    for inset in -half..=half {
        let width = region.width as i64 - 2 * inset as i64;
        let height = region.height as i64 - 2 * inset as i64;
        if width <= 0 || height <= 0 {
            continue;
        }
        let rect = Rect::at(region.x as i32 + inset, region.y as i32 + inset)
            .of_size(width as u32, height as u32);
        draw_hollow_rect_mut(&mut annotated, rect, OUTLINE);
    }
    annotated
}
