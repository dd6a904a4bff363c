//! Cross-sell recommendation lookup
//!
//! A static, immutable table keyed by exact (case-sensitive) product name.
//! The table is injected into the session so that deployments and tests can
//! swap it without touching the reconciliation logic.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use super::error::TableError;

/// A suggested product and where to find it in the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationEntry {
    pub name: String,
    pub floor: u32,
    pub row: u32,
    #[serde(default)]
    pub brands: Vec<String>,
}

impl RecommendationEntry {
    pub fn new(name: &str, floor: u32, row: u32, brands: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            floor,
            row,
            brands: brands.iter().map(|b| b.to_string()).collect(),
        }
    }
}

/// Recommendations currently on display
pub type RecommendationSet = Vec<RecommendationEntry>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationTable {
    entries: HashMap<String, RecommendationSet>,
}

impl RecommendationTable {
    pub fn new(entries: HashMap<String, RecommendationSet>) -> Self {
        Self { entries }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// The table shipped with the kiosk
    pub fn builtin() -> Self {
        let rows = [
            ("Bread", RecommendationEntry::new("Jam", 1, 3, &["Brand A", "Brand B"])),
            ("Ponds Cream", RecommendationEntry::new("Fogg Scent", 2, 1, &["Brand F"])),
            ("Fogg Scent", RecommendationEntry::new("Ponds Cream", 2, 1, &["Brand L"])),
            ("Eta Dishwash", RecommendationEntry::new("Sponges", 3, 1, &["Brand O"])),
            ("Water Bottle", RecommendationEntry::new("Tiffin Box", 4, 1, &["Brand S"])),
            ("Surf Excel", RecommendationEntry::new("Eta Dishwash", 5, 1, &["Brand W"])),
        ];

        let entries = rows
            .into_iter()
            .map(|(product, entry)| (product.to_string(), vec![entry]))
            .collect();
        Self { entries }
    }

    /// Parse a TOML table of the form `[["Product Name"]] name = .. floor = .. row = .. brands = [..]`
    pub fn from_toml_str(contents: &str, origin: &str) -> Result<Self, TableError> {
        toml::from_str::<HashMap<String, RecommendationSet>>(contents)
            .map(Self::new)
            .map_err(|e| TableError::Parse {
                path: origin.to_string(),
                message: e.to_string(),
            })
    }

    pub async fn load(path: &Path) -> Result<Self, TableError> {
        let display = path.display().to_string();
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| TableError::Io {
                path: display.clone(),
                source,
            })?;
        let table = Self::from_toml_str(&contents, &display)?;
        log::debug!(
            "Loaded {} recommendation entries from {}",
            table.len(),
            display
        );
        Ok(table)
    }

    /// Exact-match lookup. `None` when the product has no entry.
    pub fn lookup(&self, product_name: &str) -> Option<&RecommendationSet> {
        self.entries.get(product_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
