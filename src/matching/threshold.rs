//! Threshold match (still image path)
//!
//! Compares colors by mean absolute channel difference, normalized to
//! [0, 1], and reports the single closest entry together with whether it
//! clears the acceptance threshold. This scale is separate from
//! and not comparable with the 0-100 Euclidean scale in [`super::ranking`].

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::{Catalog, CatalogEntry};
use crate::{color::Color, AnalysisError, Result};

/// Closest catalog entry for a still image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdMatch {
    /// Whether `similarity` exceeds the threshold
    pub found: bool,
    /// 0.0 (opposite) to 1.0 (identical)
    pub similarity: f64,
    /// Closest entry, reported even when not found
    pub entry: CatalogEntry,
    /// Color extracted from the image
    pub extracted: Color,
}

/// `mean(|dr|, |dg|, |db|) / 255`, in [0, 1]
pub fn normalized_difference(a: Color, b: Color) -> f64 {
    let diff = |x: u8, y: u8| (x as f64 - y as f64).abs() / 255.0;
    (diff(a.r, b.r) + diff(a.g, b.g) + diff(a.b, b.b)) / 3.0
}

/// `1 - normalized_difference`
pub fn still_similarity(a: Color, b: Color) -> f64 {
    1.0 - normalized_difference(a, b)
}

/// Similarity between `color` and the catalog entry with `id`
pub fn similarity_to(color: Color, catalog: &Catalog, id: u64) -> Result<f64> {
    let entry = catalog.get(id)?;
    Ok(still_similarity(color, entry.color))
}

/// Find the most similar entry; ties go to the earliest in catalog order.
///
/// `found` is true iff the best similarity is strictly above `threshold`.
pub fn best_match(color: Color, catalog: &Catalog, threshold: f64) -> Result<ThresholdMatch> {
    let mut best: Option<(&CatalogEntry, f64)> = None;
    for entry in catalog {
        let similarity = still_similarity(color, entry.color);
        debug!("{} ({}): {:.1}%", entry.name, entry.id, similarity * 100.0);
        match best {
            Some((_, best_similarity)) if similarity <= best_similarity => {}
            _ => best = Some((entry, similarity)),
        }
    }
    let (best, best_similarity) = best.ok_or(AnalysisError::EmptyCatalog)?;

    let found = best_similarity > threshold;
    if !found {
        warn!(
            "Closest entry {} ({}) at {:.1}% is below the {:.0}% threshold",
            best.name,
            best.id,
            best_similarity * 100.0,
            threshold * 100.0
        );
    }

    Ok(ThresholdMatch {
        found,
        similarity: best_similarity,
        entry: best.clone(),
        extracted: color,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::catalog::tests::entry;

    #[test]
    fn test_identical_is_one() {
        let c = Color::new(33, 66, 99);
        assert_eq!(normalized_difference(c, c), 0.0);
        assert_eq!(still_similarity(c, c), 1.0);
    }

    #[test]
    fn test_black_white_is_zero() {
        assert_eq!(normalized_difference(Color::BLACK, Color::WHITE), 1.0);
        assert_eq!(still_similarity(Color::BLACK, Color::WHITE), 0.0);
    }

    #[test]
    fn test_close_gray_is_found() {
        let catalog = Catalog::new(vec![
            entry(1, "red", Color::new(200, 10, 10)),
            entry(2, "gray", Color::new(105, 102, 98)),
        ])
        .unwrap();
        let result = best_match(Color::new(100, 100, 100), &catalog, 0.70).unwrap();

        assert!(result.found);
        assert_eq!(result.entry.id, 2);
        // (5 + 2 + 2) / 3 / 255
        let difference = normalized_difference(Color::new(100, 100, 100), result.entry.color);
        assert!((difference - 9.0 / 765.0).abs() < 1e-12);
        assert!((result.similarity - 0.988).abs() < 0.001);
    }

    #[test]
    fn test_miss_still_reports_closest() {
        let catalog = Catalog::new(vec![
            entry(1, "white", Color::WHITE),
            entry(2, "light", Color::new(200, 200, 200)),
        ])
        .unwrap();
        let result = best_match(Color::BLACK, &catalog, 0.70).unwrap();
        assert!(!result.found);
        assert_eq!(result.entry.id, 2);
        assert!(result.similarity < 0.70);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // a similarity equal to the threshold is not enough
        let d = (255.0_f64 * 0.3) as u8;
        let catalog = Catalog::new(vec![entry(1, "x", Color::new(d, d, d))]).unwrap();
        let exact = still_similarity(Color::BLACK, Color::new(d, d, d));
        let result = best_match(Color::BLACK, &catalog, exact).unwrap();
        assert!(!result.found);
    }

    #[test]
    fn test_ties_go_to_first() {
        let catalog = Catalog::new(vec![
            entry(1, "first", Color::new(50, 50, 50)),
            entry(2, "second", Color::new(50, 50, 50)),
        ])
        .unwrap();
        let result = best_match(Color::new(60, 60, 60), &catalog, 0.70).unwrap();
        assert_eq!(result.entry.id, 1);
    }

    #[test]
    fn test_empty_catalog_is_error() {
        assert!(matches!(
            best_match(Color::WHITE, &Catalog::default(), 0.70),
            Err(AnalysisError::EmptyCatalog)
        ));
    }

    #[test]
    fn test_similarity_to_by_id() {
        let catalog = Catalog::new(vec![entry(7, "x", Color::new(0, 0, 255))]).unwrap();
        assert_eq!(similarity_to(Color::new(0, 0, 255), &catalog, 7).unwrap(), 1.0);
        assert!(matches!(
            similarity_to(Color::WHITE, &catalog, 8),
            Err(AnalysisError::CatalogEntryMissing { id: 8 })
        ));
    }
}
