//! Nearest-match ranking (live path)
//!
//! Scores every catalog entry by Euclidean distance in RGB space and maps
//! the distance onto a 0-100 similarity scale:
//!
//! `similarity = clamp(0, 100, (441.673 - distance) / 441.673 * 100)`

use serde::{Deserialize, Serialize};

use super::{Catalog, CatalogEntry};
use crate::{
    color::Color,
    constants::similarity::{LIVE_SCALE, MAX_RGB_DISTANCE},
};

/// A catalog entry scored against an extracted color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub entry: CatalogEntry,
    /// Euclidean RGB distance
    pub distance: f64,
    /// 0 (opposite corners of the RGB cube) to 100 (identical)
    pub similarity: f64,
}

/// Euclidean distance between two colors in RGB space
pub fn euclidean_distance(a: Color, b: Color) -> f64 {
    let dr = a.r as f64 - b.r as f64;
    let dg = a.g as f64 - b.g as f64;
    let db = a.b as f64 - b.b as f64;
    (dr * dr + dg * dg + db * db).sqrt()
}

/// Similarity on the 0-100 live scale for a given distance
pub fn live_similarity(distance: f64) -> f64 {
    ((MAX_RGB_DISTANCE - distance) / MAX_RGB_DISTANCE * LIVE_SCALE).clamp(0.0, LIVE_SCALE)
}

/// Score one entry
pub fn score(color: Color, entry: &CatalogEntry) -> MatchResult {
    let distance = euclidean_distance(color, entry.color);
    MatchResult {
        entry: entry.clone(),
        distance,
        similarity: live_similarity(distance),
    }
}

/// Rank the whole catalog by descending similarity and keep the best `limit`.
///
/// Entries with equal similarity keep catalog order.
pub fn rank_matches(color: Color, catalog: &Catalog, limit: usize) -> Vec<MatchResult> {
    let mut scored: Vec<MatchResult> = catalog.iter().map(|entry| score(color, entry)).collect();
    // stable: ties stay in catalog order
    scored.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    scored.truncate(limit);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::catalog::tests::entry;

    #[test]
    fn test_identical_color_scores_100() {
        let result = score(Color::new(12, 34, 56), &entry(1, "a", Color::new(12, 34, 56)));
        assert_eq!(result.distance, 0.0);
        assert_eq!(result.similarity, 100.0);
    }

    #[test]
    fn test_black_white_scores_zero() {
        let result = score(Color::BLACK, &entry(1, "white", Color::WHITE));
        assert!((result.distance - MAX_RGB_DISTANCE).abs() < 1e-9);
        assert!(result.similarity.abs() < 1e-9);
        assert!(result.similarity >= 0.0);
    }

    #[test]
    fn test_near_black_picks_black() {
        let catalog = Catalog::new(vec![
            entry(1, "black", Color::BLACK),
            entry(2, "white", Color::WHITE),
        ])
        .unwrap();
        let ranked = rank_matches(Color::new(10, 10, 10), &catalog, 4);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].entry.id, 1);
        assert!(ranked[0].similarity > 90.0);
        assert!(ranked[0].similarity > ranked[1].similarity);
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let catalog = Catalog::new(vec![
            entry(10, "far", Color::new(0, 0, 255)),
            entry(20, "twin a", Color::new(200, 0, 0)),
            entry(30, "twin b", Color::new(200, 0, 0)),
        ])
        .unwrap();
        let ranked = rank_matches(Color::new(210, 0, 0), &catalog, 4);
        let ids: Vec<u64> = ranked.iter().map(|m| m.entry.id).collect();
        assert_eq!(ids, vec![20, 30, 10]);
    }

    #[test]
    fn test_limit_truncates() {
        let entries = (0..10u8)
            .map(|i| entry(i as u64, "step", Color::new(i * 20, 0, 0)))
            .collect();
        let catalog = Catalog::new(entries).unwrap();
        let ranked = rank_matches(Color::new(95, 0, 0), &catalog, 4);

        assert_eq!(ranked.len(), 4);
        let ids: Vec<u64> = ranked.iter().map(|m| m.entry.id).collect();
        // 100 (d=5), 80 (d=15), 120 (d=25), 60 (d=35)
        assert_eq!(ids, vec![5, 4, 6, 3]);
    }

    #[test]
    fn test_ranking_is_deterministic() {
        let entries = (0..20u8)
            .map(|i| entry(i as u64, "grid", Color::new(i * 13, 255 - i * 11, i * 7)))
            .collect();
        let catalog = Catalog::new(entries).unwrap();
        let color = Color::new(77, 140, 33);
        let first = serde_json::to_string(&rank_matches(color, &catalog, 4)).unwrap();
        for _ in 0..5 {
            assert_eq!(serde_json::to_string(&rank_matches(color, &catalog, 4)).unwrap(), first);
        }
    }

    #[test]
    fn test_empty_catalog_yields_nothing() {
        assert!(rank_matches(Color::WHITE, &Catalog::default(), 4).is_empty());
    }
}
