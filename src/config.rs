// ⚙️ Calendar Configuration - Loaded from JSON, every field defaulted

use crate::collation::{CollationMode, Collator};
use crate::period_group::UNCATEGORIZED;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ============================================================================
// LABELS
// ============================================================================

/// UI strings passed through to the rendering layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub filters_all: String,
    pub periods: String,
    pub periods_all: String,
    pub periods_active: String,
    pub week: String,
}

impl Default for Labels {
    fn default() -> Self {
        Labels {
            filters_all: "All".to_string(),
            periods: "Periods".to_string(),
            periods_all: "All".to_string(),
            periods_active: "Active".to_string(),
            week: "Week".to_string(),
        }
    }
}

// ============================================================================
// CALENDAR CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// How many elapsed days still count as "recently past" (0 = roll over at once)
    pub past_window_days: i64,

    pub collation: CollationMode,

    /// BCP-47 tag, opaque to the engine
    pub locale: Option<String>,

    pub uncategorized_label: String,

    /// Page path used to derive persisted-selection keys
    pub storage_namespace: String,

    pub labels: Labels,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        CalendarConfig {
            past_window_days: 0,
            collation: CollationMode::default(),
            locale: None,
            uncategorized_label: UNCATEGORIZED.to_string(),
            storage_namespace: String::new(),
            labels: Labels::default(),
        }
    }
}

impl CalendarConfig {
    /// Load config from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: CalendarConfig =
            serde_json::from_str(content).context("Failed to parse config JSON")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.past_window_days < 0 {
            bail!("past_window_days must not be negative, got {}", self.past_window_days);
        }
        Ok(())
    }

    pub fn collator(&self) -> Collator {
        Collator::new(self.collation, self.locale.clone())
    }
}
