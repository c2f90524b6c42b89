// 🏷️ Item Classifier - Events vs Periods
// Every raw record lands on exactly one side, relative order kept.

use crate::error::Result;
use crate::item::{CalendarItem, ItemKind, RawRecord};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Classified {
    pub events: Vec<CalendarItem>,
    pub periods: Vec<CalendarItem>,
}

impl Classified {
    pub fn len(&self) -> usize {
        self.events.len() + self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct ItemClassifier;

impl ItemClassifier {
    /// Validate and partition raw records
    ///
    /// Fails on the first malformed record; nothing is coerced.
    pub fn classify(records: &[RawRecord]) -> Result<Classified> {
        Ok(Self::partition(&Self::validate(records)?))
    }

    /// Validate raw records, keeping input order
    pub fn validate(records: &[RawRecord]) -> Result<Vec<CalendarItem>> {
        records
            .iter()
            .enumerate()
            .map(|(index, raw)| CalendarItem::from_raw(index, raw))
            .collect()
    }

    /// Partition already-validated items
    pub fn partition(items: &[CalendarItem]) -> Classified {
        let (periods, events): (Vec<_>, Vec<_>) = items
            .iter()
            .cloned()
            .partition(|item| item.kind() == ItemKind::Period);

        debug!(events = events.len(), periods = periods.len(), "classified calendar items");

        Classified { events, periods }
    }
}
