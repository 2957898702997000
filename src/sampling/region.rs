//! Region-of-interest geometry and sampling
//!
//! Two placement policies are supported:
//! - Live: a tall `2r x 3r` window centered on the frame
//! - Still: a window sized as fractions of the (square) canvas, shifted
//!   vertically by a fraction of its side
//!
//! Placements that spill over the frame edge are clamped. A placement
//! that leaves no pixels after clamping fails with `OutOfBounds`.

use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

use super::Frame;
use crate::{color::Color, config::StillRegionConfig, AnalysisError, Result};

/// Axis-aligned rectangle inside a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Clip this region to a `frame_width x frame_height` frame
    pub fn clamp_to(&self, frame_width: u32, frame_height: u32) -> Result<Region> {
        clamp_placement(
            self.x as i64,
            self.y as i64,
            self.width as i64,
            self.height as i64,
            frame_width,
            frame_height,
        )
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// How the sampling window is placed on a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SamplingPolicy {
    /// Centered `2r x 3r` window for the live camera path
    Live { radius: u32 },
    /// Fractional window for the still-image canvas
    Still(StillRegionConfig),
    /// Caller-provided rectangle
    Fixed(Region),
}

impl SamplingPolicy {
    /// Compute the clamped region for a frame of the given size
    pub fn region_for(&self, frame_width: u32, frame_height: u32) -> Result<Region> {
        let (x, y, width, height) = self.placement(frame_width, frame_height);
        let region = clamp_placement(x, y, width, height, frame_width, frame_height)?;

        if was_clamped((x, y, width, height), region) {
            warn!(
                "Sampling window {}x{}{:+}{:+} clamped to {} for {}x{} frame",
                width, height, x, y, region, frame_width, frame_height
            );
        }

        Ok(region)
    }

    /// Unclamped placement as (x, y, width, height)
    fn placement(&self, frame_width: u32, frame_height: u32) -> (i64, i64, i64, i64) {
        let fw = frame_width as i64;
        let fh = frame_height as i64;

        match *self {
            SamplingPolicy::Live { radius } => {
                let r = radius as i64;
                let center_x = fw / 2;
                let center_y = fh / 2;
                (center_x - r, center_y - (3 * r) / 2, 2 * r, 3 * r)
            }
            SamplingPolicy::Still(ratios) => {
                let fw = frame_width as f64;
                let fh = frame_height as f64;
                let width = (fw * ratios.width_ratio).floor();
                let height = (fh * ratios.height_ratio).floor();
                let offset_y = (fh * ratios.vertical_offset_ratio).floor();
                let x = (fw / 2.0 - width / 2.0).floor();
                let y = (fh / 2.0 - height / 2.0 + offset_y).floor();
                (x as i64, y as i64, width as i64, height as i64)
            }
            SamplingPolicy::Fixed(region) => (
                region.x as i64,
                region.y as i64,
                region.width as i64,
                region.height as i64,
            ),
        }
    }
}

fn was_clamped((x, y, width, height): (i64, i64, i64, i64), region: Region) -> bool {
    region.x as i64 != x
        || region.y as i64 != y
        || region.width as i64 != width
        || region.height as i64 != height
}

fn clamp_placement(
    x: i64,
    y: i64,
    width: i64,
    height: i64,
    frame_width: u32,
    frame_height: u32,
) -> Result<Region> {
    let left = x.max(0);
    let top = y.max(0);
    let right = (x + width).min(frame_width as i64);
    let bottom = (y + height).min(frame_height as i64);

    if right <= left || bottom <= top {
        return Err(AnalysisError::OutOfBounds {
            x,
            y,
            width,
            height,
            frame_width,
            frame_height,
        });
    }

    Ok(Region::new(
        left as u32,
        top as u32,
        (right - left) as u32,
        (bottom - top) as u32,
    ))
}

/// Pixels of a frame inside a sampling region
#[derive(Debug, Clone, Copy)]
pub struct RegionSample<'a> {
    frame: &'a Frame,
    region: Region,
}

impl<'a> RegionSample<'a> {
    pub fn region(&self) -> Region {
        self.region
    }

    pub fn len(&self) -> u64 {
        self.region.area()
    }

    pub fn is_empty(&self) -> bool {
        self.region.is_degenerate()
    }

    /// Row-major (top-to-bottom, left-to-right) pixel iteration
    pub fn pixels(&self) -> impl Iterator<Item = Color> + 'a {
        self.frame.region_pixels(&self.region)
    }

    pub fn row_count(&self) -> u32 {
        self.region.height
    }

    /// Pixels of one region row, `index` counted from the region top.
    /// Lets long loops check a deadline between rows.
    pub fn row(&self, index: u32) -> impl Iterator<Item = Color> + 'a {
        let frame = self.frame;
        let Region { x, y, width, .. } = self.region;
        let row = y + index;
        (x..x + width).map(move |col| frame.pixel(col, row))
    }
}

/// Extracts the sampling region from frames according to a policy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionSampler {
    policy: SamplingPolicy,
}

impl RegionSampler {
    pub fn new(policy: SamplingPolicy) -> Self {
        Self { policy }
    }

    /// Live camera sampler with the given window radius
    pub fn live(radius: u32) -> Self {
        Self::new(SamplingPolicy::Live { radius })
    }

    /// Still-image sampler with the given fractional window
    pub fn still(ratios: StillRegionConfig) -> Self {
        Self::new(SamplingPolicy::Still(ratios))
    }

    pub fn policy(&self) -> SamplingPolicy {
        self.policy
    }

    /// Region this sampler would read from `frame`
    pub fn region_for(&self, frame: &Frame) -> Result<Region> {
        self.policy.region_for(frame.width(), frame.height())
    }

    /// Select the region's pixels from `frame`
    pub fn sample<'a>(&self, frame: &'a Frame) -> Result<RegionSample<'a>> {
        let region = self.region_for(frame)?;
        Ok(RegionSample { frame, region })
    }
}
