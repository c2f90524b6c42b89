// Year Calendar - Core Library
// Calendar data engine: classify, extract, filter, group, project

pub mod error;
pub mod item;
pub mod arithmetic;
pub mod collation;
pub mod classifier;
pub mod metadata;
pub mod filter;
pub mod date_group;
pub mod period_group;
pub mod projector;
pub mod selection;
pub mod config;
pub mod engine;
pub mod loader;      // CLI-side collaborator, not used by the engine

// Re-export commonly used types
pub use error::{CalendarError, Result};
pub use item::{
    CalendarItem, DateRange, ItemKind, RawRecord, RESERVED_KEYS,
    is_reserved_key,
};
pub use arithmetic::{
    annual_date, days_from_reference, iso_week_number, next_occurrence, datetime_attribute,
};
pub use collation::{Collator, CollationMode};
pub use classifier::{Classified, ItemClassifier};
pub use metadata::{MetadataCategory, MetadataExtractor, MetadataIndex};
pub use filter::{
    FilterChange, FilterEngine, FilterState, MetadataSelections, PeriodMode,
    matches_metadata, matches_period_mode, is_range_active,
};
pub use date_group::{DateGroup, DateGrouper};
pub use period_group::{PeriodGroup, PeriodGrouper, UNCATEGORIZED};
pub use projector::{RenderItem, RenderProjector};
pub use selection::{
    CategorySelection, StorageKeys, storage_key, period_mode_storage_key, hydrate_period_mode,
};
pub use config::{CalendarConfig, Labels};
pub use engine::{CalendarInput, CalendarState, CalendarView, recompute};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
