//! Immutable snapshots of the dataset collection.
//!
//! Loading a dataset never mutates a collection in place. `with_rows` builds the
//! next snapshot from the latest one, so two loads finishing in either order
//! both end up in the final collection.

use std::sync::Arc;

use crate::record::Record;
use crate::registry::{DatasetConfig, RowsByDataset};

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub source: String,
    pub name: String,
    /// `None` until loaded
    pub rows: Option<Arc<[Record]>>,
}

impl Dataset {
    pub fn is_loaded(&self) -> bool {
        self.rows.is_some()
    }
}

/// Ordered mapping from dataset key to dataset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DatasetCollection {
    entries: Vec<(String, Dataset)>,
}

impl DatasetCollection {
    /// Every registry entry, unloaded.
    pub fn from_registry(configs: &[DatasetConfig]) -> Self {
        Self {
            entries: configs
                .iter()
                .map(|c| {
                    (
                        c.key.clone(),
                        Dataset {
                            source: c.source.clone(),
                            name: c.name.clone(),
                            rows: None,
                        },
                    )
                })
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Dataset> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, dataset)| dataset)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Dataset)> {
        self.entries.iter().map(|(k, d)| (k.as_str(), d))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn loaded_count(&self) -> usize {
        self.entries.iter().filter(|(_, d)| d.is_loaded()).count()
    }

    /// The next snapshot, with `rows` attached to `key` and every other entry
    /// unchanged. `None` when the key is unknown.
    pub fn with_rows(&self, key: &str, rows: Arc<[Record]>) -> Option<Self> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        let mut next = self.clone();
        next.entries[index].1.rows = Some(rows);
        Some(next)
    }

    /// Key to optional rows, in registry order (cross-view input).
    pub fn rows_by_dataset(&self) -> RowsByDataset {
        self.entries
            .iter()
            .map(|(k, d)| (k.clone(), d.rows.clone()))
            .collect()
    }
}
