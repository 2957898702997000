//! Encoded image loading
//!
//! Turns encoded photos (camera captures or uploaded files) into [`Frame`]s
//! for the still-image pipeline.
//!
//! ## Supported Formats
//!
//! Via the `image` crate: JPEG, PNG, WebP, BMP.
//!
//! ## Design
//!
//! The container format is detected from the content, not the file name, so
//! a mislabelled upload still decodes. Images with an alpha channel are
//! composited over white, matching how a browser canvas draws them onto a
//! white fill.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageReader};
use log::debug;

use crate::error::{AnalysisError, Result};
use crate::sampling::Frame;

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// JPEG image
    Jpeg,
    /// PNG image
    Png,
    /// WebP image
    WebP,
    /// BMP image
    Bmp,
}

impl ImageFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<ImageFormat> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "webp" => Some(ImageFormat::WebP),
            "bmp" => Some(ImageFormat::Bmp),
            _ => None,
        }
    }
}

/// Decode an in-memory encoded image into a frame
///
/// # Errors
///
/// Returns `AnalysisError::DecodeFailure` if the bytes are not a supported
/// image or are corrupt.
pub fn decode_frame(bytes: &[u8]) -> Result<Frame> {
    if bytes.is_empty() {
        return Err(AnalysisError::DecodeFailure {
            message: "empty image data".to_string(),
            source: None,
        });
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| AnalysisError::decode("Failed to read image header", e))?;
    if reader.format().is_none() {
        return Err(AnalysisError::DecodeFailure {
            message: "unrecognized image format".to_string(),
            source: None,
        });
    }

    let image = reader
        .decode()
        .map_err(|e| AnalysisError::decode("Failed to decode image", e))?;
    debug!(
        "Decoded {}x{} image ({:?})",
        image.width(),
        image.height(),
        image.color()
    );
    Ok(into_frame(image))
}

/// Load and decode an image file into a frame
///
/// # Errors
///
/// Returns `AnalysisError::DecodeFailure` if:
/// - The file cannot be read
/// - The content is not a supported image, whatever its extension
pub fn load_frame(path: &Path) -> Result<Frame> {
    if ImageFormat::from_extension(path).is_none() {
        debug!(
            "{} has no known image extension, detecting format from content",
            path.display()
        );
    }

    let bytes = std::fs::read(path).map_err(|e| {
        AnalysisError::decode(format!("Failed to open image file: {}", path.display()), e)
    })?;
    decode_frame(&bytes)
}

fn into_frame(image: DynamicImage) -> Frame {
    if image.color().has_alpha() {
        Frame::flatten(&image.to_rgba8())
    } else {
        Frame::new(image.into_rgb8())
    }
}

/// Get list of all supported file extensions
pub fn supported_extensions() -> &'static [&'static str] {
    &["jpg", "jpeg", "png", "webp", "bmp"]
}

/// Check if a file extension is supported
pub fn is_supported_extension(ext: &str) -> bool {
    let ext_lower = ext.to_lowercase();
    supported_extensions().contains(&ext_lower.as_str())
}
