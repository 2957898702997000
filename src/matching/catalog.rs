//! Reference color catalog
//!
//! The catalog is loaded once and shared read-only by every matcher.
//! Entries keep their file order, which matchers use to break ties.

use std::collections::HashSet;
use std::path::Path;

use log::info;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{color::Color, AnalysisError, Result};

/// One reference swatch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Unique, stable identifier (product code)
    pub id: u64,
    pub name: String,
    pub brand: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub collection: Option<String>,
    /// Finish or texture, e.g. "cremoso" or "metal like"
    #[serde(default, deserialize_with = "empty_as_none")]
    pub feature: Option<String>,
    /// Coverage level as labelled by the brand
    #[serde(default)]
    pub level: String,
    pub color: Color,
}

fn empty_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Ordered, immutable list of catalog entries with unique ids
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.id) {
                return Err(AnalysisError::invalid_parameter("catalog id", entry.id));
            }
        }
        Ok(Self { entries })
    }

    /// Parse a JSON array of entries
    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(json)
            .map_err(|e| AnalysisError::catalog_load("invalid catalog JSON", e))?;
        Self::new(entries)
    }

    /// Load a JSON catalog file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::catalog_load(format!("cannot read {}", path.display()), e)
        })?;
        let catalog = Self::from_json_str(&content)?;
        info!("Loaded {} catalog entries from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CatalogEntry> {
        self.entries.iter()
    }

    /// Look up an entry by id
    pub fn get(&self, id: u64) -> Result<&CatalogEntry> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .ok_or(AnalysisError::CatalogEntryMissing { id })
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CatalogEntry;
    type IntoIter = std::slice::Iter<'a, CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn entry(id: u64, name: &str, color: Color) -> CatalogEntry {
        CatalogEntry {
            id,
            name: name.to_string(),
            brand: "test".to_string(),
            collection: None,
            feature: None,
            level: "alto".to_string(),
            color,
        }
    }

    #[test]
    fn test_parse_catalog_format() {
        let json = r##"[
            {
                "id": 954478,
                "name": "Verniz Extra Brilho",
                "feature": "cobertura espelhada",
                "brand": "impala",
                "collection": "",
                "level": "medio",
                "color": "rgb(218 203 229)"
            },
            {
                "id": 7417045429,
                "name": "Black to Black",
                "brand": "sally-hansen",
                "collection": "INSTA-DRI",
                "level": "alto",
                "color": "#000000"
            }
        ]"##;
        let catalog = Catalog::from_json_str(json).unwrap();
        assert_eq!(catalog.len(), 2);

        let first = &catalog.entries()[0];
        assert_eq!(first.color, Color::new(218, 203, 229));
        assert_eq!(first.collection, None);
        assert_eq!(first.feature.as_deref(), Some("cobertura espelhada"));

        let second = catalog.get(7417045429).unwrap();
        assert_eq!(second.color, Color::BLACK);
        assert_eq!(second.feature, None);
        assert_eq!(second.collection.as_deref(), Some("INSTA-DRI"));
    }

    #[test]
    fn test_missing_entry() {
        let catalog = Catalog::new(vec![entry(1, "one", Color::WHITE)]).unwrap();
        match catalog.get(2) {
            Err(AnalysisError::CatalogEntryMissing { id }) => assert_eq!(id, 2),
            other => panic!("Expected CatalogEntryMissing, got: {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = Catalog::new(vec![
            entry(1, "one", Color::WHITE),
            entry(1, "again", Color::BLACK),
        ]);
        assert!(matches!(result, Err(AnalysisError::InvalidParameter { .. })));
    }

    #[test]
    fn test_bad_color_is_load_error() {
        let json = r#"[{ "id": 1, "name": "x", "brand": "y", "color": "rgb(1 2)" }]"#;
        assert!(matches!(
            Catalog::from_json_str(json),
            Err(AnalysisError::CatalogLoad { .. })
        ));
    }

    #[test]
    fn test_serializes_as_array() {
        let catalog = Catalog::new(vec![entry(5, "five", Color::new(1, 2, 3))]).unwrap();
        let json = serde_json::to_string(&catalog).unwrap();
        assert!(json.starts_with('['));
        let back = Catalog::from_json_str(&json).unwrap();
        assert_eq!(back, catalog);
    }
}
