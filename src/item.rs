// 📅 Calendar Items - Raw records in, validated items out
// Structural fields are typed; everything else is open metadata.

use crate::error::{CalendarError, Result};
use serde::Serialize;
use serde_json::{Map, Value};

/// A record exactly as the caller supplied it (key order preserved)
pub type RawRecord = Map<String, Value>;

// ============================================================================
// RESERVED KEYS
// ============================================================================

pub const START_MONTH: &str = "start_month";
pub const START_DAY: &str = "start_day";
pub const END_MONTH: &str = "end_month";
pub const END_DAY: &str = "end_day";
pub const LABEL: &str = "label";
pub const DESCRIPTION: &str = "description";

/// Keys that are never metadata categories
pub const RESERVED_KEYS: [&str; 6] = [START_MONTH, START_DAY, END_MONTH, END_DAY, LABEL, DESCRIPTION];

pub fn is_reserved_key(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// Stringify a scalar metadata value. Null yields None.
pub fn stringify_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

// ============================================================================
// ITEM KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// Single date, no end
    Event,
    /// Date range: both end_month and end_day present
    Period,
}

// ============================================================================
// DATE RANGE
// ============================================================================

/// Start and end of a period, handed to the date-label formatter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start_month: u32,
    pub start_day: u32,
    pub end_month: u32,
    pub end_day: u32,
}

impl DateRange {
    /// "January 5-12" rather than "January 28 - February 3"
    pub fn same_month(&self) -> bool {
        self.start_month == self.end_month
    }

    /// End falls before start within one year, so the range runs into the next
    pub fn spans_year_boundary(&self) -> bool {
        (self.end_month, self.end_day) < (self.start_month, self.start_day)
    }
}

// ============================================================================
// CALENDAR ITEM
// ============================================================================

/// Validated calendar record
///
/// Serializes back to the flat shape it was read from, so the rendering
/// layer sees the same keys the caller supplied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarItem {
    pub start_month: u32,
    pub start_day: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_month: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_day: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Non-reserved keys in first-appearance order. Null values are kept:
    /// the key is present even though it carries nothing filterable.
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl CalendarItem {
    /// Validate a raw record. `index` is its position in the input, for error reporting.
    pub fn from_raw(index: usize, raw: &RawRecord) -> Result<Self> {
        let start_month = required_number(index, raw, START_MONTH, 12)?;
        let start_day = required_number(index, raw, START_DAY, 31)?;
        let end_month = optional_number(index, raw, END_MONTH, 12)?;
        let end_day = optional_number(index, raw, END_DAY, 31)?;

        let metadata = raw
            .iter()
            .filter(|(key, _)| !is_reserved_key(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(CalendarItem {
            start_month,
            start_day,
            end_month,
            end_day,
            label: raw.get(LABEL).and_then(stringify_value),
            description: raw.get(DESCRIPTION).and_then(stringify_value),
            metadata,
        })
    }

    /// Build an event from a date and metadata pairs
    pub fn event<K, V>(month: u32, day: u32, metadata: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        CalendarItem {
            start_month: month,
            start_day: day,
            end_month: None,
            end_day: None,
            label: None,
            description: None,
            metadata: metadata
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Builder: turn into a period ending at (month, day)
    pub fn ending(mut self, month: u32, day: u32) -> Self {
        self.end_month = Some(month);
        self.end_day = Some(day);
        self
    }

    /// Builder: add label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn kind(&self) -> ItemKind {
        if self.end_month.is_some() && self.end_day.is_some() {
            ItemKind::Period
        } else {
            ItemKind::Event
        }
    }

    pub fn is_period(&self) -> bool {
        self.kind() == ItemKind::Period
    }

    /// Stringified value for a metadata key, None when missing or null
    pub fn metadata_value(&self, key: &str) -> Option<String> {
        self.metadata.get(key).and_then(stringify_value)
    }

    /// Metadata keys in record order, including null-valued ones
    pub fn metadata_keys(&self) -> impl Iterator<Item = &str> {
        self.metadata.keys().map(String::as_str)
    }

    /// Non-null metadata (key, value) pairs in record order
    pub fn metadata_entries(&self) -> impl Iterator<Item = (&str, String)> {
        self.metadata
            .iter()
            .filter_map(|(key, value)| stringify_value(value).map(|v| (key.as_str(), v)))
    }

    pub fn date_range(&self) -> Option<DateRange> {
        match (self.end_month, self.end_day) {
            (Some(end_month), Some(end_day)) => Some(DateRange {
                start_month: self.start_month,
                start_day: self.start_day,
                end_month,
                end_day,
            }),
            _ => None,
        }
    }
}

// ============================================================================
// FIELD VALIDATION
// ============================================================================

/// Integer JSON numbers, or decimal-digit strings (CSV input)
fn parse_number(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn checked_number(index: usize, field: &str, value: &Value, max: u32) -> Result<u32> {
    let number = parse_number(value).ok_or_else(|| {
        CalendarError::invalid_record(index, field, format!("must be an integer, got {}", value))
    })?;

    if number < 1 || number > i64::from(max) {
        return Err(CalendarError::invalid_record(
            index,
            field,
            format!("must be between 1 and {}, got {}", max, number),
        ));
    }

    Ok(number as u32)
}

fn required_number(index: usize, raw: &RawRecord, field: &str, max: u32) -> Result<u32> {
    match raw.get(field) {
        None | Some(Value::Null) => Err(CalendarError::invalid_record(index, field, "is missing")),
        Some(value) => checked_number(index, field, value, max),
    }
}

fn optional_number(index: usize, raw: &RawRecord, field: &str, max: u32) -> Result<Option<u32>> {
    match raw.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => checked_number(index, field, value, max).map(Some),
    }
}

// ============================================================================
// TESTS
// ============================================================================
