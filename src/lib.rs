//! # Polish Match
//!
//! A Rust crate for identifying nail-polish swatches from camera frames and
//! photographs.
//!
//! This library samples a representative color and matches it against a
//! catalog of reference swatches along two paths:
//! - Live camera: a centered window averaged over recent frames, ranked by
//!   Euclidean RGB distance (see [`session`])
//! - Still photo: normalized onto a square canvas, contrast-enhanced, and
//!   reduced to a dominant color by weighted voting, then threshold-matched
//!
//! ## Example
//!
//! ```rust,no_run
//! use polish_match::{analyze_image_file, Catalog, StillImageConfig};
//! use std::path::Path;
//!
//! let catalog = Catalog::from_json_file(Path::new("catalog.json"))?;
//! let result = analyze_image_file(Path::new("photo.jpg"), &catalog, &StillImageConfig::default())?;
//! println!("{} ({:.0}%)", result.entry.name, result.similarity * 100.0);
//! # Ok::<(), polish_match::AnalysisError>(())
//! ```

use std::path::Path;

use image::RgbImage;
use log::info;

pub mod color;
pub mod config;
pub mod constants;
pub mod deadline;
pub mod error;
pub mod image_loader;
pub mod matching;
pub mod sampling;
pub mod session;

pub use color::{Color, ColorFamily, DominantColor};
pub use config::{EngineConfig, LiveSamplingConfig, StillImageConfig};
pub use deadline::Deadline;
pub use error::{AnalysisError, Result};
pub use matching::{Catalog, CatalogEntry, MatchResult, ThresholdMatch};
pub use sampling::{Frame, Region};
pub use session::{FrameSource, LiveSample, LiveSamplingController, SamplingSession, SessionState};

use color::{enhancement::enhance_image, DominantColorExtractor};
use matching::{best_match, threshold::still_similarity};
use sampling::{annotate_region, normalize_to_canvas, RegionSampler};

/// Intermediate images of one still-image analysis, for diagnostic display
#[derive(Debug, Clone)]
pub struct DebugOutput {
    /// Input redrawn on the square canvas
    pub canvas: RgbImage,
    /// Canvas after contrast enhancement
    pub enhanced: RgbImage,
    /// `canvas` with the sampled region outlined
    pub annotated: RgbImage,
    pub region: Region,
    pub dominant: DominantColor,
}

struct StillStages {
    canvas: RgbImage,
    enhanced: RgbImage,
    region: Region,
    dominant: DominantColor,
}

/// Match a decoded still image against the catalog
///
/// Runs canvas normalization, enhancement, dominant-color voting and the
/// threshold match under the configured time budget.
///
/// # Errors
///
/// Returns `AnalysisError` if:
/// - The catalog is empty
/// - The frame has no pixels
/// - Processing exceeds `config.timeout_ms` (checked between stages, see
///   [`analyze_encoded_image`])
pub fn analyze_image(
    frame: &Frame,
    catalog: &Catalog,
    config: &StillImageConfig,
) -> Result<ThresholdMatch> {
    let deadline = Deadline::after(config.timeout());
    analyze_with_deadline(frame, catalog, config, &deadline).map(|(result, _)| result)
}

/// Like [`analyze_image`], also returning the intermediate canvases
pub fn analyze_image_debug(
    frame: &Frame,
    catalog: &Catalog,
    config: &StillImageConfig,
) -> Result<(ThresholdMatch, DebugOutput)> {
    let deadline = Deadline::after(config.timeout());
    let (result, stages) = analyze_with_deadline(frame, catalog, config, &deadline)?;
    let annotated = annotate_region(&stages.canvas, stages.region);
    let debug = DebugOutput {
        canvas: stages.canvas,
        enhanced: stages.enhanced,
        annotated,
        region: stages.region,
        dominant: stages.dominant,
    };
    Ok((result, debug))
}

/// Decode an encoded image (JPEG, PNG, WebP, BMP) and match it.
///
/// Decoding counts against the time budget. The budget is checked between
/// stages (after decoding, after the canvas resize) and per row while
/// enhancing and voting. Decoding and resizing themselves are not
/// interrupted, so a very large input can run past `config.timeout_ms` by
/// up to their duration before `ProcessingTimeout` is returned.
pub fn analyze_encoded_image(
    bytes: &[u8],
    catalog: &Catalog,
    config: &StillImageConfig,
) -> Result<ThresholdMatch> {
    let deadline = Deadline::after(config.timeout());
    let frame = image_loader::decode_frame(bytes)?;
    deadline.check("decode")?;
    analyze_with_deadline(&frame, catalog, config, &deadline).map(|(result, _)| result)
}

/// Load an image file and match it
pub fn analyze_image_file(
    path: &Path,
    catalog: &Catalog,
    config: &StillImageConfig,
) -> Result<ThresholdMatch> {
    let deadline = Deadline::after(config.timeout());
    let frame = image_loader::load_frame(path)?;
    deadline.check("decode")?;
    let (result, _) = analyze_with_deadline(&frame, catalog, config, &deadline)?;
    info!(
        "{}: {} {} ({:.1}%)",
        path.display(),
        if result.found { "matched" } else { "closest" },
        result.entry.name,
        result.similarity * 100.0
    );
    Ok(result)
}

/// Similarity (0.0 to 1.0) between a still image and one catalog entry
///
/// # Errors
///
/// Returns `AnalysisError::CatalogEntryMissing` for an unknown `id`, before
/// any image processing.
pub fn similarity_to_entry(
    frame: &Frame,
    catalog: &Catalog,
    id: u64,
    config: &StillImageConfig,
) -> Result<f64> {
    let entry = catalog.get(id)?;
    let deadline = Deadline::after(config.timeout());
    let stages = run_still_pipeline(frame, config, &deadline)?;
    Ok(still_similarity(stages.dominant.color, entry.color))
}

fn analyze_with_deadline(
    frame: &Frame,
    catalog: &Catalog,
    config: &StillImageConfig,
    deadline: &Deadline,
) -> Result<(ThresholdMatch, StillStages)> {
    if catalog.is_empty() {
        return Err(AnalysisError::EmptyCatalog);
    }

    let stages = run_still_pipeline(frame, config, deadline)?;
    let result = best_match(stages.dominant.color, catalog, config.match_threshold)?;
    info!(
        "Dominant {} -> {} ({}) at {:.1}%, found: {}",
        stages.dominant.color.to_hex(),
        result.entry.name,
        result.entry.id,
        result.similarity * 100.0,
        result.found
    );
    Ok((result, stages))
}

fn run_still_pipeline(
    frame: &Frame,
    config: &StillImageConfig,
    deadline: &Deadline,
) -> Result<StillStages> {
    let canvas = normalize_to_canvas(frame, config.canvas_size, deadline)?;
    let enhanced = Frame::new(enhance_image(&canvas, &config.enhancement, deadline)?);

    let sample = RegionSampler::still(config.region).sample(&enhanced)?;
    let region = sample.region();
    let dominant = DominantColorExtractor::with_deadline(config.voting, *deadline).vote(&sample)?;
    deadline.check("dominant color")?;

    Ok(StillStages {
        canvas,
        enhanced: enhanced.into_image(),
        region,
        dominant,
    })
}
