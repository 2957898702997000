//! Configuration structures for the sampling and matching engine.
//!
//! This module defines all tunable parameters, organized by the two
//! pipelines: live camera sampling and still-image analysis.
//!
//! # Configuration Loading
//!
//! Configuration can be loaded from JSON files or constructed programmatically:
//!
//! ```no_run
//! use polish_match::EngineConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = EngineConfig::from_json_file(Path::new("config.json"))?;
//!
//! // Or use defaults
//! let config = EngineConfig::default();
//! # Ok::<(), polish_match::AnalysisError>(())
//! ```
//!
//! Every section is `#[serde(default)]`, so a file only needs to name the
//! values it overrides.
//!
//! # Configuration Sections
//!
//! - [`LiveSamplingConfig`]: window radius, smoothing depth, match count
//! - [`StillImageConfig`]: canvas, region, enhancement, voting, threshold, timeout

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{enhancement, live, still, voting};
use crate::{AnalysisError, Result};

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Live camera path
    pub live: LiveSamplingConfig,

    /// Still image path
    pub still: StillImageConfig,
}

/// Live camera sampling parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveSamplingConfig {
    /// Half-width of the sampling window in pixels
    pub radius: u32,

    /// Number of instantaneous colors averaged for smoothing
    pub history_capacity: usize,

    /// Ranked matches reported per tick
    pub max_matches: usize,
}

/// Still image analysis parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StillImageConfig {
    /// Side of the square normalization canvas in pixels
    pub canvas_size: u32,

    /// Sampling window placement on the canvas
    pub region: StillRegionConfig,

    /// Photographic pre-enhancement
    pub enhancement: EnhancementConfig,

    /// Dominant-color voting
    pub voting: VotingConfig,

    /// Similarity (0.0-1.0) a best match must exceed to be reported as found
    pub match_threshold: f64,

    /// Upper bound on one analysis in milliseconds
    pub timeout_ms: u64,
}

/// Fractional sampling window on the still-image canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StillRegionConfig {
    /// Window width as a fraction of the canvas width
    pub width_ratio: f64,

    /// Window height as a fraction of the canvas height
    pub height_ratio: f64,

    /// Vertical shift as a fraction of the canvas height (negative = up)
    pub vertical_offset_ratio: f64,
}

/// Saturation and contrast boost applied before voting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhancementConfig {
    /// Saturation multiplier, result capped at 1.0
    pub saturation_gain: f64,

    /// Lightness multiplier below mid-gray
    pub shadow_factor: f64,

    /// Lightness multiplier at or above mid-gray
    pub highlight_factor: f64,
}

/// Quantized dominant-color voting parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VotingConfig {
    /// Pixels brighter than this (channel mean) are skipped as background
    pub background_brightness: f64,

    /// Saturation strictly above this uses the fine bucket width
    pub saturated_threshold: f64,

    /// Bucket width for saturated pixels
    pub fine_bucket: u8,

    /// Bucket width for other pixels
    pub coarse_bucket: u8,
}

impl Default for LiveSamplingConfig {
    fn default() -> Self {
        Self {
            radius: live::RADIUS,
            history_capacity: live::HISTORY_CAPACITY,
            max_matches: live::MAX_MATCHES,
        }
    }
}

impl Default for StillImageConfig {
    fn default() -> Self {
        Self {
            canvas_size: still::CANVAS_SIZE,
            region: StillRegionConfig::default(),
            enhancement: EnhancementConfig::default(),
            voting: VotingConfig::default(),
            match_threshold: still::MATCH_THRESHOLD,
            timeout_ms: still::PROCESSING_TIMEOUT.as_millis() as u64,
        }
    }
}

impl Default for StillRegionConfig {
    fn default() -> Self {
        Self {
            width_ratio: still::REGION_WIDTH_RATIO,
            height_ratio: still::REGION_HEIGHT_RATIO,
            vertical_offset_ratio: still::REGION_VERTICAL_OFFSET_RATIO,
        }
    }
}

impl Default for EnhancementConfig {
    fn default() -> Self {
        Self {
            saturation_gain: enhancement::SATURATION_GAIN,
            shadow_factor: enhancement::SHADOW_FACTOR,
            highlight_factor: enhancement::HIGHLIGHT_FACTOR,
        }
    }
}

impl Default for VotingConfig {
    fn default() -> Self {
        Self {
            background_brightness: voting::BACKGROUND_BRIGHTNESS,
            saturated_threshold: voting::SATURATED_THRESHOLD,
            fine_bucket: voting::FINE_BUCKET,
            coarse_bucket: voting::COARSE_BUCKET,
        }
    }
}

impl StillImageConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl EngineConfig {
    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::invalid_parameter("config file", format!("{}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            AnalysisError::invalid_parameter("config file", format!("{}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AnalysisError::invalid_parameter("config", e))?;
        std::fs::write(path, json).map_err(|e| {
            AnalysisError::invalid_parameter("config file", format!("{}: {}", path.display(), e))
        })?;
        Ok(())
    }

    /// Reject values the pipelines cannot run with
    pub fn validate(&self) -> Result<()> {
        let live = &self.live;
        if live.radius == 0 {
            return Err(AnalysisError::invalid_parameter("live.radius", live.radius));
        }
        if live.history_capacity == 0 {
            return Err(AnalysisError::invalid_parameter(
                "live.history_capacity",
                live.history_capacity,
            ));
        }
        if live.max_matches == 0 {
            return Err(AnalysisError::invalid_parameter("live.max_matches", live.max_matches));
        }

        let still = &self.still;
        if still.canvas_size == 0 {
            return Err(AnalysisError::invalid_parameter("still.canvas_size", still.canvas_size));
        }
        for (name, ratio) in [
            ("still.region.width_ratio", still.region.width_ratio),
            ("still.region.height_ratio", still.region.height_ratio),
        ] {
            if !(ratio > 0.0 && ratio <= 1.0) {
                return Err(AnalysisError::invalid_parameter(name, ratio));
            }
        }
        if !(-0.5..=0.5).contains(&still.region.vertical_offset_ratio) {
            return Err(AnalysisError::invalid_parameter(
                "still.region.vertical_offset_ratio",
                still.region.vertical_offset_ratio,
            ));
        }
        if still.voting.fine_bucket == 0 {
            return Err(AnalysisError::invalid_parameter(
                "still.voting.fine_bucket",
                still.voting.fine_bucket,
            ));
        }
        if still.voting.coarse_bucket == 0 {
            return Err(AnalysisError::invalid_parameter(
                "still.voting.coarse_bucket",
                still.voting.coarse_bucket,
            ));
        }
        if !(0.0..=1.0).contains(&still.match_threshold) {
            return Err(AnalysisError::invalid_parameter(
                "still.match_threshold",
                still.match_threshold,
            ));
        }
        if still.timeout_ms == 0 {
            return Err(AnalysisError::invalid_parameter("still.timeout_ms", still.timeout_ms));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.live.radius, 70);
        assert_eq!(config.live.history_capacity, 10);
        assert_eq!(config.live.max_matches, 4);
        assert_eq!(config.still.canvas_size, 200);
        assert_eq!(config.still.match_threshold, 0.70);
        assert_eq!(config.still.timeout(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "live": { "radius": 40 }, "still": { "voting": { "fine_bucket": 4 } } }"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.live.radius, 40);
        assert_eq!(config.live.history_capacity, 10);
        assert_eq!(config.still.voting.fine_bucket, 4);
        assert_eq!(config.still.voting.coarse_bucket, 16);
        assert_eq!(config.still.region, StillRegionConfig::default());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = EngineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = EngineConfig::default();
        config.live.history_capacity = 0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.still.voting.coarse_bucket = 0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.still.region.width_ratio = 1.5;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.still.match_threshold = 1.2;
        assert!(config.validate().is_err());
    }
}
