// 🧭 Period Grouper - Periods bucketed by their leading category

use crate::collation::Collator;
use crate::item::CalendarItem;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Group name used when a period has no value for the grouping key
pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodGroup {
    pub category_name: String,
    pub periods: Vec<CalendarItem>,
}

pub struct PeriodGrouper<'a> {
    collator: &'a Collator,
    uncategorized_label: &'a str,
}

impl<'a> PeriodGrouper<'a> {
    pub fn new(collator: &'a Collator) -> Self {
        PeriodGrouper {
            collator,
            uncategorized_label: UNCATEGORIZED,
        }
    }

    /// Builder: name for the catch-all group
    pub fn with_uncategorized_label(mut self, label: &'a str) -> Self {
        self.uncategorized_label = label;
        self
    }

    /// Group `periods`. The grouping key and the sort keys come from
    /// `all_periods` so they stay put while filters change.
    pub fn group(&self, periods: &[CalendarItem], all_periods: &[CalendarItem]) -> Vec<PeriodGroup> {
        let grouping_key = grouping_key(all_periods);
        let sort_keys = sort_keys(all_periods);

        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut groups: Vec<PeriodGroup> = Vec::new();

        for period in periods {
            let category_name = grouping_key
                .and_then(|key| period.metadata_value(key))
                .unwrap_or_else(|| self.uncategorized_label.to_string());

            match positions.get(&category_name) {
                Some(&pos) => groups[pos].periods.push(period.clone()),
                None => {
                    positions.insert(category_name.clone(), groups.len());
                    groups.push(PeriodGroup {
                        category_name,
                        periods: vec![period.clone()],
                    });
                }
            }
        }

        groups.sort_by(|a, b| self.collator.compare(&a.category_name, &b.category_name));
        for group in &mut groups {
            group.periods.sort_by(|a, b| {
                for key in &sort_keys {
                    let left = a.metadata_value(key).unwrap_or_default();
                    let right = b.metadata_value(key).unwrap_or_default();
                    let ordering = self.collator.compare(&left, &right);
                    if ordering.is_ne() {
                        return ordering;
                    }
                }
                std::cmp::Ordering::Equal
            });
        }

        debug!(periods = periods.len(), groups = groups.len(), "grouped periods");
        groups
    }
}

/// First metadata key of the first period, if any
fn grouping_key(periods: &[CalendarItem]) -> Option<&str> {
    periods.first().and_then(|p| p.metadata_keys().next())
}

/// Every metadata key across the periods, alphabetically
fn sort_keys(periods: &[CalendarItem]) -> Vec<&str> {
    periods
        .iter()
        .flat_map(|p| p.metadata_keys())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
