//! Representative color extraction
//!
//! Reduces a sampled region to one color with one of two strategies:
//! - [`AveragingExtractor`]: per-frame channel mean, smoothed over a bounded
//!   history (live camera path)
//! - [`DominantColorExtractor`]: weighted vote over quantized color buckets,
//!   skipping near-white background (still image path)
//!
//! The strategies are independent; both implement [`ColorExtractor`].

use std::collections::HashMap;

use log::debug;

use super::{history::rounded_div, Color, ColorHistory};
use crate::{
    config::VotingConfig, deadline::Deadline, sampling::RegionSample, AnalysisError, Result,
};

/// Common interface of the extraction strategies
pub trait ColorExtractor {
    /// Reduce the sampled pixels to a single representative color
    fn extract(&mut self, sample: &RegionSample<'_>) -> Result<Color>;
}

/// Channel mean with temporal smoothing
#[derive(Debug, Clone)]
pub struct AveragingExtractor {
    history: ColorHistory,
}

impl AveragingExtractor {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            history: ColorHistory::new(history_capacity),
        }
    }

    pub fn history(&self) -> &ColorHistory {
        &self.history
    }

    /// Forget all smoothing state
    pub fn reset(&mut self) {
        self.history.clear();
    }

    /// Rounded channel mean of the sampled pixels, without touching history
    pub fn instantaneous(sample: &RegionSample<'_>) -> Result<Color> {
        let (mut r, mut g, mut b, mut count) = (0u64, 0u64, 0u64, 0u64);
        for pixel in sample.pixels() {
            r += pixel.r as u64;
            g += pixel.g as u64;
            b += pixel.b as u64;
            count += 1;
        }

        if count == 0 {
            return Err(AnalysisError::invalid_parameter("sample region", sample.region()));
        }

        Ok(Color::new(
            rounded_div(r, count),
            rounded_div(g, count),
            rounded_div(b, count),
        ))
    }

    /// Record an instantaneous color and return the smoothed output
    pub fn push(&mut self, instantaneous: Color) -> Color {
        self.history.push(instantaneous);
        // history is non-empty after a push
        self.history.mean().unwrap_or(instantaneous)
    }
}

impl ColorExtractor for AveragingExtractor {
    fn extract(&mut self, sample: &RegionSample<'_>) -> Result<Color> {
        let instantaneous = Self::instantaneous(sample)?;
        Ok(self.push(instantaneous))
    }
}

/// Outcome of dominant-color voting
#[derive(Debug, Clone, PartialEq)]
pub struct DominantColor {
    /// Winning bucket, or black when every pixel was background
    pub color: Color,
    /// Accumulated weight of the winning bucket
    pub weight: f64,
    /// Pixels that voted
    pub counted_pixels: u64,
    /// Pixels skipped as near-white background
    pub skipped_pixels: u64,
}

impl DominantColor {
    /// True when no pixel voted and `color` is the black sentinel
    pub fn is_empty(&self) -> bool {
        self.counted_pixels == 0
    }
}

/// Saturation-weighted vote over quantized colors
#[derive(Debug, Clone)]
pub struct DominantColorExtractor {
    config: VotingConfig,
    deadline: Deadline,
}

impl DominantColorExtractor {
    pub fn new(config: VotingConfig) -> Self {
        Self::with_deadline(config, Deadline::unbounded())
    }

    pub fn with_deadline(config: VotingConfig, deadline: Deadline) -> Self {
        Self { config, deadline }
    }

    /// Bucket width for a pixel of the given saturation
    pub fn bucket_width(&self, saturation: f64) -> u8 {
        if saturation > self.config.saturated_threshold {
            self.config.fine_bucket
        } else {
            self.config.coarse_bucket
        }
    }

    /// Snap each channel down to its bucket's lower edge
    pub fn quantize(&self, color: Color) -> Color {
        let width = self.bucket_width(color.saturation()).max(1);
        let snap = |channel: u8| (channel / width) * width;
        Color::new(snap(color.r), snap(color.g), snap(color.b))
    }

    /// Run the vote over the sampled pixels in row-major order.
    ///
    /// Ties go to the bucket first encountered in scan order.
    pub fn vote(&self, sample: &RegionSample<'_>) -> Result<DominantColor> {
        let mut order: Vec<(Color, f64)> = Vec::new();
        let mut index: HashMap<Color, usize> = HashMap::new();
        let mut counted = 0u64;
        let mut skipped = 0u64;

        for row in 0..sample.row_count() {
            self.deadline.check("dominant color voting")?;

            for pixel in sample.row(row) {
                if pixel.brightness() > self.config.background_brightness {
                    skipped += 1;
                    continue;
                }

                let saturation = pixel.saturation();
                let bucket = self.quantize(pixel);
                let slot = *index.entry(bucket).or_insert_with(|| {
                    order.push((bucket, 0.0));
                    order.len() - 1
                });
                order[slot].1 += 1.0 + saturation;
                counted += 1;
            }
        }

        let mut winner = DominantColor {
            color: Color::BLACK,
            weight: 0.0,
            counted_pixels: counted,
            skipped_pixels: skipped,
        };
        for (color, weight) in order.iter().copied() {
            if weight > winner.weight {
                winner.color = color;
                winner.weight = weight;
            }
        }

        debug!(
            "Dominant color {} (weight {:.1}) from {} buckets, {} pixels voted, {} skipped",
            winner.color,
            winner.weight,
            order.len(),
            counted,
            skipped
        );

        Ok(winner)
    }
}

impl ColorExtractor for DominantColorExtractor {
    fn extract(&mut self, sample: &RegionSample<'_>) -> Result<Color> {
        Ok(self.vote(sample)?.color)
    }
}
