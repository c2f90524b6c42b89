// 🔎 Filter Engine - Metadata selections and period activity
// FilterState is a value: every change produces a new one, never a patch.

use crate::arithmetic::annual_date;
use crate::error::{CalendarError, Result};
use crate::item::{CalendarItem, DateRange};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::{debug, warn};

/// category → allowed values
pub type MetadataSelections = BTreeMap<String, Vec<String>>;

// ============================================================================
// PERIOD MODE
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodMode {
    /// Every period, regardless of date
    #[default]
    All,
    /// Only periods covering the reference date
    Active,
}

impl PeriodMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodMode::All => "all",
            PeriodMode::Active => "active",
        }
    }

    /// Accept a persisted value; anything but "all"/"active" is rejected
    pub fn from_stored(value: &str) -> Option<Self> {
        value.parse().ok()
    }
}

impl FromStr for PeriodMode {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "all" => Ok(PeriodMode::All),
            "active" => Ok(PeriodMode::Active),
            other => Err(CalendarError::InvalidFilterState(format!(
                "unknown period mode '{}'",
                other
            ))),
        }
    }
}

// ============================================================================
// FILTER CHANGE NOTIFICATIONS
// ============================================================================

/// A filter-change notification from the controls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FilterChange {
    Metadata {
        selections: MetadataSelections,
    },
    /// `value` stays a raw string: unknown modes are ignored, not rejected
    #[serde(alias = "periods")]
    PeriodMode {
        value: String,
    },
}

// ============================================================================
// FILTER STATE
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    pub metadata_selections: MetadataSelections,
    pub period_mode: PeriodMode,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hydrate from a persisted snapshot, falling back to the empty state
    pub fn from_snapshot(snapshot: &str) -> Self {
        match serde_json::from_str::<FilterState>(snapshot) {
            Ok(state) => state,
            Err(e) => {
                warn!(error = %e, "unparsable filter state snapshot, using defaults");
                FilterState::default()
            }
        }
    }

    pub fn to_snapshot(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| CalendarError::InvalidFilterState(e.to_string()))
    }

    /// Next state after a notification. The touched slice is replaced wholesale.
    pub fn apply(&self, change: &FilterChange) -> FilterState {
        match change {
            FilterChange::Metadata { selections } => FilterState {
                metadata_selections: selections.clone(),
                period_mode: self.period_mode,
            },
            FilterChange::PeriodMode { value } => match value.parse::<PeriodMode>() {
                Ok(period_mode) => FilterState {
                    metadata_selections: self.metadata_selections.clone(),
                    period_mode,
                },
                Err(_) => {
                    warn!(value = %value, "ignoring unknown period mode");
                    self.clone()
                }
            },
        }
    }

    /// Selections with one category's allowed values replaced
    pub fn with_category_selection(&self, category: &str, values: Vec<String>) -> FilterState {
        let mut selections = self.metadata_selections.clone();
        selections.insert(category.to_string(), values);
        FilterState {
            metadata_selections: selections,
            period_mode: self.period_mode,
        }
    }

    /// True when no category constrains anything
    pub fn is_unconstrained(&self) -> bool {
        self.metadata_selections.values().all(Vec::is_empty)
    }
}

// ============================================================================
// PREDICATES
// ============================================================================

/// Every constrained category must hold one of its allowed values.
/// Empty selections constrain nothing.
pub fn matches_metadata(item: &CalendarItem, selections: &MetadataSelections) -> bool {
    selections
        .iter()
        .filter(|(_, allowed)| !allowed.is_empty())
        .all(|(category, allowed)| match item.metadata_value(category) {
            Some(value) => allowed.iter().any(|a| *a == value),
            None => false,
        })
}

/// Whether `reference` lies inside the range, both ends inclusive.
///
/// A range whose end precedes its start runs into the next year, so in
/// January it is still covered by the occurrence that began last December.
pub fn is_range_active(range: &DateRange, reference: NaiveDate) -> Result<bool> {
    let year = reference.year();
    let start = annual_date(year, range.start_month, range.start_day)?;
    let end = annual_date(year, range.end_month, range.end_day)?;

    // Wrap is decided on the raw (month, day) pairs: rolled-over days such
    // as Feb 29 in a common year can land on or past the start date.
    if range.spans_year_boundary() {
        return Ok(start <= reference || reference <= end);
    }

    Ok(start <= reference && reference <= end)
}

/// Period-mode predicate. Items without an end date always pass.
pub fn matches_period_mode(item: &CalendarItem, mode: PeriodMode, reference: NaiveDate) -> Result<bool> {
    match (mode, item.date_range()) {
        (PeriodMode::All, _) | (_, None) => Ok(true),
        (PeriodMode::Active, Some(range)) => is_range_active(&range, reference),
    }
}

// ============================================================================
// FILTER ENGINE
// ============================================================================

pub struct FilterEngine<'a> {
    state: &'a FilterState,
}

impl<'a> FilterEngine<'a> {
    pub fn new(state: &'a FilterState) -> Self {
        FilterEngine { state }
    }

    /// Events: metadata predicate only
    pub fn filter_events(&self, events: &[CalendarItem]) -> Vec<CalendarItem> {
        if self.state.is_unconstrained() {
            return events.to_vec();
        }

        let kept: Vec<CalendarItem> = events
            .iter()
            .filter(|e| matches_metadata(e, &self.state.metadata_selections))
            .cloned()
            .collect();

        debug!(before = events.len(), after = kept.len(), "filtered events");
        kept
    }

    /// Periods: metadata predicate, then period mode
    pub fn filter_periods(&self, periods: &[CalendarItem], reference: NaiveDate) -> Result<Vec<CalendarItem>> {
        let mut kept = Vec::new();
        for period in periods {
            if !matches_metadata(period, &self.state.metadata_selections) {
                continue;
            }
            if matches_period_mode(period, self.state.period_mode, reference)? {
                kept.push(period.clone());
            }
        }

        debug!(
            before = periods.len(),
            after = kept.len(),
            mode = self.state.period_mode.as_str(),
            "filtered periods"
        );
        Ok(kept)
    }
}

// ============================================================================
// TESTS
// ============================================================================
