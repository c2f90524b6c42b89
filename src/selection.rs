// ☑️ Selection - Per-category checkbox state and its storage keys
// The engine never touches storage; it only names keys and parses values.

use crate::filter::PeriodMode;
use crate::metadata::{MetadataCategory, MetadataIndex};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

/// Selected values of one metadata category, in selection order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategorySelection {
    pub category: String,
    /// Every value the category can take, sorted
    domain: Vec<String>,
    selected: Vec<String>,
}

impl CategorySelection {
    pub fn new(category: impl Into<String>, domain: Vec<String>) -> Self {
        CategorySelection {
            category: category.into(),
            domain,
            selected: Vec::new(),
        }
    }

    pub fn for_category(category: &MetadataCategory) -> Self {
        Self::new(category.name.clone(), category.values.clone())
    }

    /// Restore from a stored JSON array, keeping only values still in the domain
    pub fn hydrate(category: &MetadataCategory, stored: &str) -> Self {
        let mut selection = Self::for_category(category);

        match serde_json::from_str::<Vec<String>>(stored) {
            Ok(values) => {
                let before = values.len();
                for value in values {
                    if category.contains(&value) && !selection.is_selected(&value) {
                        selection.selected.push(value);
                    }
                }
                if selection.selected.len() < before {
                    warn!(
                        category = %selection.category,
                        dropped = before - selection.selected.len(),
                        "stored selections no longer in domain"
                    );
                }
            }
            Err(e) => {
                warn!(category = %selection.category, error = %e, "failed to load stored selection");
            }
        }

        selection
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    pub fn is_selected(&self, value: &str) -> bool {
        self.selected.iter().any(|v| v == value)
    }

    /// Check or uncheck one value
    pub fn toggle(&self, value: &str, checked: bool) -> Self {
        let mut next = self.clone();
        if checked {
            if !next.is_selected(value) {
                next.selected.push(value.to_string());
            }
        } else {
            next.selected.retain(|v| v != value);
        }
        next
    }

    /// Select exactly this value
    pub fn select_only(&self, value: &str) -> Self {
        let mut next = self.clone();
        next.selected = vec![value.to_string()];
        next
    }

    /// All selected → none; otherwise → the whole domain
    pub fn toggle_all(&self) -> Self {
        let mut next = self.clone();
        let all_selected = self.domain.iter().all(|v| self.is_selected(v));
        next.selected = if all_selected { Vec::new() } else { self.domain.clone() };
        next
    }

    /// JSON array for the storage collaborator
    pub fn to_stored(&self) -> String {
        serde_json::Value::from(self.selected.clone()).to_string()
    }
}

// ============================================================================
// STORAGE KEYS
// ============================================================================

/// Page path → key fragment: runs of `/` and whitespace become `-`, edges trimmed
fn sanitize_path(namespace: &str) -> String {
    let mut out = String::with_capacity(namespace.len());
    let mut in_run = false;
    for c in namespace.chars() {
        if c == '/' || c.is_whitespace() {
            if !in_run {
                out.push('-');
                in_run = true;
            }
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out.trim_matches('-').to_string()
}

/// Category label → key fragment: lowercased, each whitespace run becomes `-`.
/// Edges are kept, so " Team " and "Team" name different groups.
fn sanitize_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut in_run = false;
    for c in label.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_run {
                out.push('-');
                in_run = true;
            }
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

/// Storage key for one category's checkbox group
pub fn storage_key(namespace: &str, category: &str) -> String {
    format!("checkbox-group-{}-{}", sanitize_path(namespace), sanitize_label(category))
}

/// Storage key for the period-mode radio group
pub fn period_mode_storage_key(namespace: &str) -> String {
    format!("period-filter-{}", sanitize_path(namespace))
}

/// Every key the storage collaborator needs for one page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageKeys {
    pub period_mode: String,
    /// category name → checkbox-group key
    pub categories: BTreeMap<String, String>,
}

impl StorageKeys {
    pub fn new(namespace: &str, index: &MetadataIndex) -> Self {
        StorageKeys {
            period_mode: period_mode_storage_key(namespace),
            categories: index
                .names()
                .map(|name| (name.to_string(), storage_key(namespace, name)))
                .collect(),
        }
    }
}

/// Stored period mode; unknown or missing values fall back to `All`
pub fn hydrate_period_mode(stored: Option<&str>) -> PeriodMode {
    stored.and_then(PeriodMode::from_stored).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain() -> Vec<String> {
        vec!["A".to_string(), "B".to_string(), "C".to_string()]
    }

    fn team() -> MetadataCategory {
        MetadataCategory { name: "team".to_string(), values: domain() }
    }

    #[test]
    fn test_toggle_and_select_only() {
        let selection = CategorySelection::new("team", domain())
            .toggle("A", true)
            .toggle("C", true)
            .toggle("A", false);
        assert_eq!(selection.selected(), ["C"]);

        let only = selection.toggle("B", true).select_only("A");
        assert_eq!(only.selected(), ["A"]);
    }

    #[test]
    fn test_toggle_all() {
        let partial = CategorySelection::new("team", domain()).toggle("B", true);
        let all = partial.toggle_all();
        assert_eq!(all.selected(), domain().as_slice());

        let none = all.toggle_all();
        assert!(none.selected().is_empty());
    }

    #[test]
    fn test_hydrate_keeps_only_known_values() {
        let selection = CategorySelection::hydrate(&team(), r#"["B","Z","B"]"#);
        assert_eq!(selection.selected(), ["B"]);
    }

    #[test]
    fn test_hydrate_bad_json_is_empty() {
        let selection = CategorySelection::hydrate(&team(), "not json");
        assert!(selection.selected().is_empty());
    }

    #[test]
    fn test_stored_round_trip() {
        let selection = CategorySelection::for_category(&team()).toggle("C", true).toggle("A", true);
        let restored = CategorySelection::hydrate(&team(), &selection.to_stored());
        assert_eq!(restored.selected(), ["C", "A"]);
    }

    #[test]
    fn test_storage_keys() {
        assert_eq!(storage_key("/team/calendar/", "Team Name"), "checkbox-group-team-calendar-team-name");
        assert_eq!(storage_key("", "room"), "checkbox-group--room");
        assert_eq!(period_mode_storage_key("/a  b//c"), "period-filter-a-b-c");
    }

    #[test]
    fn test_label_edge_whitespace_kept() {
        assert_eq!(storage_key("/cal", " Team "), "checkbox-group-cal--team-");
        assert_eq!(storage_key("/cal", "Team\t \nName"), "checkbox-group-cal-team-name");
        assert_ne!(storage_key("/cal", " Team "), storage_key("/cal", "Team"));
    }

    #[test]
    fn test_storage_keys_for_index() {
        use crate::collation::Collator;
        use crate::item::CalendarItem;
        use crate::metadata::MetadataExtractor;

        let items = vec![
            CalendarItem::event(1, 1, [("team", "A"), ("Meeting Room", "2")]),
            CalendarItem::event(2, 1, [("team", "B")]),
        ];
        let index = MetadataExtractor::new(Collator::default()).extract(&items);

        let keys = StorageKeys::new("/team/cal", &index);
        assert_eq!(keys.period_mode, "period-filter-team-cal");
        assert_eq!(keys.categories.len(), 2);
        assert_eq!(keys.categories["team"], "checkbox-group-team-cal-team");
        assert_eq!(keys.categories["Meeting Room"], "checkbox-group-team-cal-meeting-room");
    }

    #[test]
    fn test_hydrate_period_mode() {
        assert_eq!(hydrate_period_mode(Some("active")), PeriodMode::Active);
        assert_eq!(hydrate_period_mode(Some("weekly")), PeriodMode::All);
        assert_eq!(hydrate_period_mode(None), PeriodMode::All);
    }
}
