//! Frame and region sampling module
//!
//! Frames are immutable pixel grids. Regions select the window that color
//! extraction reads, placed by one of two policies: a tall window centered
//! on live camera frames, or a fractional window on the normalized square
//! canvas used for still images.

pub mod canvas;
pub mod frame;
pub mod region;

pub use canvas::{annotate_region, normalize_to_canvas};
pub use frame::Frame;
pub use region::{Region, RegionSample, RegionSampler, SamplingPolicy};
