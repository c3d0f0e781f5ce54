//! The catalog index: bangumi id → position in the dataset.
//!
//! Built once at startup from the full dataset and never mutated afterwards,
//! so request handlers share it through an `Arc` without any locking.

use std::collections::HashMap;
use std::num::ParseIntError;

use crate::dataset::Item;

/// Name of the site whose ids the catalog is keyed by.
pub const BANGUMI_SITE: &str = "bangumi";

/// Reasons the index cannot be built. All of them are fatal: serving with a
/// partially built index would silently answer `null` for entries that exist.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("entry {position} has a bangumi site without an id")]
    MissingSiteId { position: usize },

    #[error("entry {position} has a non-numeric bangumi id {id:?}: {source}")]
    InvalidSiteId {
        position: usize,
        id: String,
        source: ParseIntError,
    },
}

/// The immutable dataset together with its bangumi id index.
#[derive(Debug)]
pub struct Catalog {
    items: Vec<Item>,
    index: HashMap<i64, usize>,
}

impl Catalog {
    /// Indexes `items` by the id of their first `bangumi` site reference.
    ///
    /// Entries without a bangumi reference are kept in the dataset but are not
    /// reachable by id. When two entries claim the same id the later one wins.
    pub fn build(items: Vec<Item>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            let Some(site) = item.site(BANGUMI_SITE) else {
                continue;
            };
            let raw = site
                .id
                .as_deref()
                .ok_or(CatalogError::MissingSiteId { position })?;
            let id = raw
                .trim()
                .parse::<i64>()
                .map_err(|source| CatalogError::InvalidSiteId {
                    position,
                    id: raw.to_owned(),
                    source,
                })?;
            index.insert(id, position);
        }
        Ok(Self { items, index })
    }

    pub fn position(&self, id: i64) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn get(&self, id: i64) -> Option<&Item> {
        self.position(id).map(|position| &self.items[position])
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct ids reachable through the index.
    pub fn indexed(&self) -> usize {
        self.index.len()
    }
}
