//! Catalog matching module
//!
//! This module holds the reference catalog and the two similarity models:
//! Euclidean nearest-match ranking for live sampling and normalized
//! mean-difference threshold matching for still images.

pub mod catalog;
pub mod ranking;
pub mod threshold;

pub use catalog::{Catalog, CatalogEntry};
pub use ranking::{rank_matches, MatchResult};
pub use threshold::{best_match, similarity_to, ThresholdMatch};
