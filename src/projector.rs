// 🧱 Render Projector - Sorted date groups → flat render instructions
// Headers follow the chronological sequence, not calendar month order.

use crate::arithmetic::{datetime_attribute, iso_week_number};
use crate::date_group::DateGroup;
use crate::error::Result;
use crate::item::CalendarItem;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RenderItem {
    MonthHeader {
        month: u32,
    },
    WeekHeader {
        #[serde(rename = "weekNumber")]
        week_number: u32,
    },
    #[serde(rename = "date-group")]
    DateGroupEntry {
        month: u32,
        day: u32,
        /// `MM-DD`, for machine-readable time elements
        datetime: String,
        items: Vec<CalendarItem>,
    },
}

impl RenderItem {
    pub fn is_header(&self) -> bool {
        !matches!(self, RenderItem::DateGroupEntry { .. })
    }
}

pub struct RenderProjector;

impl RenderProjector {
    /// Interleave month and week headers with the date groups
    pub fn project(groups: &[DateGroup], reference: NaiveDate) -> Result<Vec<RenderItem>> {
        let mut render_items = Vec::with_capacity(groups.len() * 3);
        let mut previous: Option<(u32, u32)> = None;

        for group in groups {
            let week = iso_week_number(group.month, group.day, reference)?;

            match previous {
                None => {
                    render_items.push(RenderItem::MonthHeader { month: group.month });
                    render_items.push(RenderItem::WeekHeader { week_number: week });
                }
                Some((prev_month, prev_week)) => {
                    if group.month != prev_month {
                        render_items.push(RenderItem::MonthHeader { month: group.month });
                    }
                    if week != prev_week {
                        render_items.push(RenderItem::WeekHeader { week_number: week });
                    }
                }
            }

            render_items.push(RenderItem::DateGroupEntry {
                month: group.month,
                day: group.day,
                datetime: datetime_attribute(group.month, group.day),
                items: group.items.clone(),
            });
            previous = Some((group.month, week));
        }

        debug!(groups = groups.len(), render_items = render_items.len(), "projected render items");
        Ok(render_items)
    }
}
