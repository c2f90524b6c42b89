// 📆 Date Grouper - Events bucketed by (month, day), ordered from "today"

use crate::arithmetic::days_from_reference;
use crate::collation::Collator;
use crate::error::Result;
use crate::item::CalendarItem;
use crate::metadata::MetadataIndex;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateGroup {
    pub month: u32,
    pub day: u32,
    /// Signed distance from the reference date; negative = recently past
    pub days_from_reference: i64,
    pub items: Vec<CalendarItem>,
}

pub struct DateGrouper<'a> {
    index: &'a MetadataIndex,
    collator: &'a Collator,
    past_window_days: i64,
}

impl<'a> DateGrouper<'a> {
    pub fn new(index: &'a MetadataIndex, collator: &'a Collator, past_window_days: i64) -> Self {
        DateGrouper {
            index,
            collator,
            past_window_days,
        }
    }

    /// Group events by start date and order the groups chronologically
    pub fn group(&self, events: &[CalendarItem], reference: NaiveDate) -> Result<Vec<DateGroup>> {
        let mut positions: HashMap<(u32, u32), usize> = HashMap::new();
        let mut buckets: Vec<((u32, u32), Vec<&CalendarItem>)> = Vec::new();

        for event in events {
            let key = (event.start_month, event.start_day);
            match positions.get(&key) {
                Some(&pos) => buckets[pos].1.push(event),
                None => {
                    positions.insert(key, buckets.len());
                    buckets.push((key, vec![event]));
                }
            }
        }

        let mut groups = Vec::with_capacity(buckets.len());
        for ((month, day), items) in buckets {
            groups.push(DateGroup {
                month,
                day,
                days_from_reference: days_from_reference(month, day, reference, self.past_window_days)?,
                items: self.sort_items(items),
            });
        }

        groups.sort_by_key(|g| g.days_from_reference);

        debug!(events = events.len(), groups = groups.len(), "grouped events by date");
        Ok(groups)
    }

    /// Stable sort on metadata tuples
    fn sort_items(&self, items: Vec<&CalendarItem>) -> Vec<CalendarItem> {
        let mut keyed: Vec<(Vec<String>, &CalendarItem)> = items
            .into_iter()
            .map(|item| (self.index.metadata_tuple(item), item))
            .collect();

        keyed.sort_by(|(a, _), (b, _)| self.collator.compare_tuples(a, b));
        keyed.into_iter().map(|(_, item)| item.clone()).collect()
    }
}
