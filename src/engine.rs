// 🔁 Calendar Engine - Pure reducer from (records, filters, today, locale) to a view
// recompute(state, input) never patches: it hands back a new state.

use crate::classifier::{Classified, ItemClassifier};
use crate::config::{CalendarConfig, Labels};
use crate::date_group::DateGrouper;
use crate::error::Result;
use crate::filter::{FilterChange, FilterEngine, FilterState};
use crate::item::{CalendarItem, RawRecord};
use crate::metadata::{MetadataExtractor, MetadataIndex};
use crate::period_group::{PeriodGroup, PeriodGrouper};
use crate::projector::{RenderItem, RenderProjector};
use crate::selection::StorageKeys;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

// ============================================================================
// INPUTS
// ============================================================================

/// Everything that can change the engine's state
#[derive(Debug, Clone, PartialEq)]
pub enum CalendarInput {
    /// Replace the record set wholesale
    SetRecords(Vec<RawRecord>),
    FilterChanged(FilterChange),
    SetLocale(Option<String>),
    SetReferenceDate(NaiveDate),
    /// Persisted FilterState snapshot; unparsable input yields the empty state
    HydrateFilterState(String),
}

// ============================================================================
// STATE
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarState {
    /// Validated records in input order
    items: Vec<CalendarItem>,
    metadata: MetadataIndex,
    filter_state: FilterState,
    reference_date: NaiveDate,
    config: CalendarConfig,
}

impl CalendarState {
    /// Empty calendar
    pub fn new(reference_date: NaiveDate, config: CalendarConfig) -> Self {
        CalendarState {
            items: Vec::new(),
            metadata: MetadataIndex::default(),
            filter_state: FilterState::default(),
            reference_date,
            config,
        }
    }

    pub fn with_records(records: &[RawRecord], reference_date: NaiveDate, config: CalendarConfig) -> Result<Self> {
        Self::new(reference_date, config).load(records)
    }

    fn load(&self, records: &[RawRecord]) -> Result<Self> {
        let mut next = self.clone();
        next.items = ItemClassifier::validate(records)?;
        next.metadata = next.extract_metadata();
        Ok(next)
    }

    fn extract_metadata(&self) -> MetadataIndex {
        MetadataExtractor::new(self.config.collator()).extract(&self.items)
    }

    pub fn items(&self) -> &[CalendarItem] {
        &self.items
    }

    pub fn classified(&self) -> Classified {
        ItemClassifier::partition(&self.items)
    }

    pub fn metadata(&self) -> &MetadataIndex {
        &self.metadata
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.filter_state
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    pub fn config(&self) -> &CalendarConfig {
        &self.config
    }

    /// Derive the render view from the current state
    pub fn view(&self) -> Result<CalendarView> {
        let collator = self.config.collator();
        let filters = FilterEngine::new(&self.filter_state);

        let classified = self.classified();

        let events = filters.filter_events(&classified.events);
        let periods = filters.filter_periods(&classified.periods, self.reference_date)?;

        let date_groups = DateGrouper::new(&self.metadata, &collator, self.config.past_window_days)
            .group(&events, self.reference_date)?;
        let render_items = RenderProjector::project(&date_groups, self.reference_date)?;

        let period_groups = PeriodGrouper::new(&collator)
            .with_uncategorized_label(&self.config.uncategorized_label)
            .group(&periods, &classified.periods);

        debug!(
            render_items = render_items.len(),
            period_groups = period_groups.len(),
            reference_date = %self.reference_date,
            "computed calendar view"
        );

        Ok(CalendarView {
            reference_date: self.reference_date,
            locale: self.config.locale.clone(),
            labels: self.config.labels.clone(),
            filter_state: self.filter_state.clone(),
            metadata: self.metadata.clone(),
            storage_keys: StorageKeys::new(&self.config.storage_namespace, &self.metadata),
            render_items,
            period_groups,
        })
    }
}

// ============================================================================
// REDUCER
// ============================================================================

/// Apply one input to a state, returning the next state
///
/// On error the previous state is untouched and remains valid.
pub fn recompute(state: &CalendarState, input: CalendarInput) -> Result<CalendarState> {
    match input {
        CalendarInput::SetRecords(records) => state.load(&records),
        CalendarInput::FilterChanged(change) => {
            let mut next = state.clone();
            next.filter_state = state.filter_state.apply(&change);
            Ok(next)
        }
        CalendarInput::SetLocale(locale) => {
            let mut next = state.clone();
            next.config.locale = locale;
            next.metadata = next.extract_metadata();
            Ok(next)
        }
        CalendarInput::SetReferenceDate(date) => {
            let mut next = state.clone();
            next.reference_date = date;
            Ok(next)
        }
        CalendarInput::HydrateFilterState(snapshot) => {
            let mut next = state.clone();
            next.filter_state = FilterState::from_snapshot(&snapshot);
            Ok(next)
        }
    }
}

// ============================================================================
// VIEW
// ============================================================================

/// What the rendering layer consumes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarView {
    pub reference_date: NaiveDate,
    pub locale: Option<String>,
    pub labels: Labels,
    pub filter_state: FilterState,
    pub metadata: MetadataIndex,
    /// Where the controls persist their selections
    pub storage_keys: StorageKeys,
    pub render_items: Vec<RenderItem>,
    pub period_groups: Vec<PeriodGroup>,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arithmetic::iso_week_number;
    use crate::collation::CollationMode;
    use crate::error::CalendarError;
    use crate::filter::{MetadataSelections, PeriodMode};
    use serde_json::{json, Value};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn records(value: Value) -> Vec<RawRecord> {
        serde_json::from_value(value).unwrap()
    }

    fn teams(items: &[CalendarItem]) -> Vec<String> {
        items.iter().map(|i| i.metadata_value("team").unwrap()).collect()
    }

    fn team_selection(values: &[&str]) -> FilterChange {
        let mut selections = MetadataSelections::new();
        selections.insert("team".into(), values.iter().map(|v| v.to_string()).collect());
        FilterChange::Metadata { selections }
    }

    #[test]
    fn test_end_to_end_scenario() {
        let input = records(json!([
            {"start_month": 1, "start_day": 5, "team": "B"},
            {"start_month": 1, "start_day": 5, "team": "A"},
            {"start_month": 2, "start_day": 1, "team": "A"}
        ]));
        let today = date(2024, 1, 1);

        let state = CalendarState::with_records(&input, today, CalendarConfig::default()).unwrap();
        let view = state.view().unwrap();

        let w = iso_week_number(1, 5, today).unwrap();
        let w2 = iso_week_number(2, 1, today).unwrap();
        assert_eq!(view.render_items.len(), 6);
        assert_eq!(view.render_items[0], RenderItem::MonthHeader { month: 1 });
        assert_eq!(view.render_items[1], RenderItem::WeekHeader { week_number: w });
        match &view.render_items[2] {
            RenderItem::DateGroupEntry { month, day, items, .. } => {
                assert_eq!((*month, *day), (1, 5));
                assert_eq!(teams(items), vec!["A", "B"]);
            }
            other => panic!("expected date group, got {other:?}"),
        }
        assert_eq!(view.render_items[3], RenderItem::MonthHeader { month: 2 });
        assert_eq!(view.render_items[4], RenderItem::WeekHeader { week_number: w2 });
        match &view.render_items[5] {
            RenderItem::DateGroupEntry { month, day, items, .. } => {
                assert_eq!((*month, *day), (2, 1));
                assert_eq!(teams(items), vec!["A"]);
            }
            other => panic!("expected date group, got {other:?}"),
        }
        assert!(view.period_groups.is_empty());
    }

    #[test]
    fn test_metadata_filter_change() {
        let input = records(json!([
            {"start_month": 1, "start_day": 5, "team": "A"},
            {"start_month": 1, "start_day": 5, "team": "B"},
            {"start_month": 2, "start_day": 1, "team": "B"}
        ]));
        let state = CalendarState::with_records(&input, date(2024, 1, 1), CalendarConfig::default()).unwrap();

        let next = recompute(&state, CalendarInput::FilterChanged(team_selection(&["A"]))).unwrap();
        let view = next.view().unwrap();

        let entries: Vec<_> = view.render_items.iter().filter(|i| !i.is_header()).collect();
        assert_eq!(entries.len(), 1);

        // Old state is a separate value
        assert!(state.filter_state().metadata_selections.is_empty());
        assert_eq!(state.view().unwrap().render_items.len(), 6);
    }

    #[test]
    fn test_period_mode_and_groups() {
        let input = records(json!([
            {"start_month": 12, "start_day": 20, "end_month": 1, "end_day": 10, "season": "winter", "team": "B"},
            {"start_month": 6, "start_day": 1, "end_month": 8, "end_day": 31, "season": "summer", "team": "A"},
            {"start_month": 12, "start_day": 1, "end_month": 2, "end_day": 28, "season": "winter", "team": "A"},
            {"start_month": 3, "start_day": 1, "team": "A"}
        ]));
        let state = CalendarState::with_records(&input, date(2025, 1, 3), CalendarConfig::default()).unwrap();

        let view = state.view().unwrap();
        let names: Vec<_> = view.period_groups.iter().map(|g| g.category_name.as_str()).collect();
        assert_eq!(names, vec!["summer", "winter"]);
        assert_eq!(teams(&view.period_groups[1].periods), vec!["A", "B"]);

        let active = recompute(
            &state,
            CalendarInput::FilterChanged(FilterChange::PeriodMode { value: "active".into() }),
        )
        .unwrap();
        let view = active.view().unwrap();
        let names: Vec<_> = view.period_groups.iter().map(|g| g.category_name.as_str()).collect();
        assert_eq!(names, vec!["winter"]);
        assert_eq!(view.period_groups[0].periods.len(), 2);
        assert_eq!(active.filter_state().period_mode, PeriodMode::Active);
    }

    #[test]
    fn test_invalid_records_keep_previous_state() {
        let input = records(json!([{"start_month": 1, "start_day": 5, "team": "A"}]));
        let state = CalendarState::with_records(&input, date(2024, 1, 1), CalendarConfig::default()).unwrap();

        let bad = records(json!([{"start_month": 0, "start_day": 5}]));
        let err = recompute(&state, CalendarInput::SetRecords(bad)).unwrap_err();

        assert!(matches!(err, CalendarError::InvalidRecord { index: 0, .. }));
        assert_eq!(state.items().len(), 1);
    }

    #[test]
    fn test_hydrate_filter_state() {
        let state = CalendarState::new(date(2024, 1, 1), CalendarConfig::default());

        let hydrated = recompute(
            &state,
            CalendarInput::HydrateFilterState(r#"{"metadataSelections":{"team":["A"]},"periodMode":"active"}"#.into()),
        )
        .unwrap();
        assert_eq!(hydrated.filter_state().period_mode, PeriodMode::Active);

        let broken = recompute(&hydrated, CalendarInput::HydrateFilterState("{{{".into())).unwrap();
        assert_eq!(broken.filter_state(), &FilterState::default());
    }

    #[test]
    fn test_reference_date_drives_order() {
        let input = records(json!([
            {"start_month": 1, "start_day": 10, "team": "A"},
            {"start_month": 7, "start_day": 1, "team": "A"}
        ]));
        let state = CalendarState::with_records(&input, date(2024, 1, 1), CalendarConfig::default()).unwrap();
        let later = recompute(&state, CalendarInput::SetReferenceDate(date(2024, 6, 1))).unwrap();

        let first_month = |view: &CalendarView| match view.render_items[0] {
            RenderItem::MonthHeader { month } => month,
            _ => 0,
        };
        assert_eq!(first_month(&state.view().unwrap()), 1);
        assert_eq!(first_month(&later.view().unwrap()), 7);
    }

    #[test]
    fn test_set_locale_resorts_domains() {
        let input = records(json!([
            {"start_month": 1, "start_day": 1, "team": "beta"},
            {"start_month": 1, "start_day": 2, "team": "Alpha"},
            {"start_month": 1, "start_day": 3, "team": "alpha"}
        ]));
        let config = CalendarConfig {
            collation: CollationMode::Locale,
            ..CalendarConfig::default()
        };
        let state = CalendarState::with_records(&input, date(2024, 1, 1), config).unwrap();
        let next = recompute(&state, CalendarInput::SetLocale(Some("de-DE".into()))).unwrap();

        assert_eq!(next.view().unwrap().locale.as_deref(), Some("de-DE"));
        assert_eq!(next.metadata().get("team").unwrap().values, vec!["Alpha", "alpha", "beta"]);
    }

    #[test]
    fn test_view_serializes() {
        let input = records(json!([{"start_month": 1, "start_day": 5, "team": "A"}]));
        let state = CalendarState::with_records(&input, date(2024, 1, 1), CalendarConfig::default()).unwrap();

        let value = serde_json::to_value(state.view().unwrap()).unwrap();

        assert_eq!(value["referenceDate"], "2024-01-01");
        assert_eq!(value["metadata"][0]["name"], "team");
        assert_eq!(value["renderItems"][2]["items"][0]["team"], "A");
        assert_eq!(value["filterState"]["periodMode"], "all");
        assert_eq!(value["storageKeys"]["periodMode"], "period-filter-");
    }

    #[test]
    fn test_view_storage_keys_follow_namespace() {
        let input = records(json!([
            {"start_month": 1, "start_day": 5, "team": "A"},
            {"start_month": 3, "start_day": 1, "end_month": 3, "end_day": 9, "Meeting Room": "2"}
        ]));
        let config = CalendarConfig::from_json(r#"{"storage_namespace": "/team/cal"}"#).unwrap();
        let state = CalendarState::with_records(&input, date(2024, 1, 1), config).unwrap();

        let keys = state.view().unwrap().storage_keys;

        assert_eq!(keys.period_mode, "period-filter-team-cal");
        assert_eq!(keys.categories["team"], "checkbox-group-team-cal-team");
        assert_eq!(keys.categories["Meeting Room"], "checkbox-group-team-cal-meeting-room");
    }
}
