// 🗂️ Metadata Extractor - Filterable categories and their value domains
// Category order = first appearance across the record set.
// Value domains are always sorted.

use crate::collation::Collator;
use crate::item::CalendarItem;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

// ============================================================================
// METADATA CATEGORY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataCategory {
    pub name: String,
    /// Distinct stringified values, sorted ascending
    pub values: Vec<String>,
}

impl MetadataCategory {
    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
}

// ============================================================================
// METADATA INDEX
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MetadataIndex {
    categories: Vec<MetadataCategory>,
}

impl MetadataIndex {
    pub fn categories(&self) -> &[MetadataCategory] {
        &self.categories
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&MetadataCategory> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// No filters available
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// An item's non-null values, in category order
    pub fn metadata_tuple(&self, item: &CalendarItem) -> Vec<String> {
        self.categories
            .iter()
            .filter_map(|c| item.metadata_value(&c.name))
            .collect()
    }
}

// ============================================================================
// EXTRACTOR
// ============================================================================

pub struct MetadataExtractor {
    collator: Collator,
}

impl MetadataExtractor {
    pub fn new(collator: Collator) -> Self {
        MetadataExtractor { collator }
    }

    pub fn extract(&self, items: &[CalendarItem]) -> MetadataIndex {
        let mut order: Vec<String> = Vec::new();
        let mut seen: HashMap<String, HashSet<String>> = HashMap::new();

        for item in items {
            for (key, value) in item.metadata_entries() {
                let values = seen.entry(key.to_string()).or_insert_with(|| {
                    order.push(key.to_string());
                    HashSet::new()
                });
                values.insert(value);
            }
        }

        let categories = order
            .into_iter()
            .map(|name| {
                let mut values: Vec<String> = seen.remove(&name).unwrap_or_default().into_iter().collect();
                values.sort_by(|a, b| self.collator.compare(a, b));
                MetadataCategory { name, values }
            })
            .collect::<Vec<_>>();

        debug!(categories = categories.len(), items = items.len(), "extracted metadata");

        MetadataIndex { categories }
    }
}

impl Default for MetadataExtractor {
    fn default() -> Self {
        Self::new(Collator::lexicographic())
    }
}

// ============================================================================
// TESTS
// ============================================================================
