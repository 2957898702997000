//! Color representation and extraction module
//!
//! This module holds the RGB color type, the smoothing history, the
//! photographic pre-enhancement and the two extraction strategies.

pub mod analysis;
pub mod conversion;
pub mod enhancement;
pub mod history;

pub use analysis::{AveragingExtractor, ColorExtractor, DominantColor, DominantColorExtractor};
pub use conversion::{Color, ColorFamily};
pub use history::ColorHistory;
