//! Sampling and matching constants
//!
//! Compile-time defaults for the live and still-image pipelines. The
//! runtime [`crate::config::EngineConfig`] starts from these values.

/// Live camera sampling
pub mod live {
    /// Half-width of the live sampling window in pixels.
    /// The window is `2 * RADIUS` wide and `3 * RADIUS` tall.
    pub const RADIUS: u32 = 70;

    /// Number of instantaneous colors kept for temporal smoothing
    pub const HISTORY_CAPACITY: usize = 10;

    /// Number of ranked catalog matches reported per tick
    pub const MAX_MATCHES: usize = 4;
}

/// Still image (photo / upload) sampling
pub mod still {
    use std::time::Duration;

    /// Side of the square canvas images are normalized onto
    pub const CANVAS_SIZE: u32 = 200;

    /// Region width as a fraction of the canvas side
    pub const REGION_WIDTH_RATIO: f64 = 0.2;

    /// Region height as a fraction of the canvas side
    pub const REGION_HEIGHT_RATIO: f64 = 0.4;

    /// Vertical region shift as a fraction of the canvas side (negative = up)
    pub const REGION_VERTICAL_OFFSET_RATIO: f64 = -0.05;

    /// Minimum similarity (0.0-1.0) for a catalog entry to count as found
    pub const MATCH_THRESHOLD: f64 = 0.70;

    /// Upper bound on one still-image analysis
    pub const PROCESSING_TIMEOUT: Duration = Duration::from_secs(10);
}

/// Photographic pre-enhancement
pub mod enhancement {
    /// Saturation multiplier (result capped at 1.0)
    pub const SATURATION_GAIN: f64 = 2.0;

    /// Lightness multiplier applied below mid-gray
    pub const SHADOW_FACTOR: f64 = 0.7;

    /// Lightness multiplier applied at or above mid-gray
    pub const HIGHLIGHT_FACTOR: f64 = 1.3;
}

/// Dominant-color voting
pub mod voting {
    /// Mean channel brightness above which a pixel is treated as background
    pub const BACKGROUND_BRIGHTNESS: f64 = 250.0;

    /// Saturation strictly above this selects the fine bucket width
    pub const SATURATED_THRESHOLD: f64 = 0.5;

    /// Bucket width for saturated pixels
    pub const FINE_BUCKET: u8 = 8;

    /// Bucket width for near-neutral pixels
    pub const COARSE_BUCKET: u8 = 16;
}

/// Similarity scales
pub mod similarity {
    /// Largest Euclidean distance in 8-bit RGB space, `sqrt(3 * 255^2)`
    pub const MAX_RGB_DISTANCE: f64 = 441.672_955_930_063_7;

    /// Upper end of the live similarity scale
    pub const LIVE_SCALE: f64 = 100.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_distance_matches_formula() {
        let expected = (3.0_f64 * 255.0 * 255.0).sqrt();
        assert!((similarity::MAX_RGB_DISTANCE - expected).abs() < 1e-9);
    }

    #[test]
    fn test_bucket_ordering() {
        // Saturated pixels get the finer buckets
        assert!(voting::FINE_BUCKET < voting::COARSE_BUCKET);
        assert!(enhancement::SHADOW_FACTOR < 1.0);
        assert!(enhancement::HIGHLIGHT_FACTOR > 1.0);
    }

    #[test]
    fn test_region_fits_canvas() {
        let shift = still::REGION_VERTICAL_OFFSET_RATIO.abs();
        assert!(still::REGION_HEIGHT_RATIO / 2.0 + shift < 0.5);
        assert!(still::PROCESSING_TIMEOUT.as_millis() > 0);
    }
}
