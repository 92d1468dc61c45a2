use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::calendar::{end_of_week, start_of_week};
use crate::error::{HeatmapError, Result};

/// Per-day adherence scores keyed by ISO date (`YYYY-MM-DD`). Missing days read as 0.
pub type DailyScoreMap = BTreeMap<String, f64>;

pub const ISO_DATE: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Requested window length. Advisory only; the grid is built from `start` and `end`.
    pub days: u32,
}

impl TimeRange {
    pub fn new(start: NaiveDate, end: NaiveDate, days: u32) -> Self {
        Self { start, end, days }
    }

    /// Parses both ends and rejects dates whose Monday/Sunday week padding
    /// would leave the representable calendar.
    pub fn parse(start: &str, end: &str, days: u32) -> Result<Self> {
        let start_date = parse_calendar_date("start", start)?;
        if start_of_week(start_date).is_none() {
            return Err(HeatmapError::invalid_range("start", start));
        }
        let end_date = parse_calendar_date("end", end)?;
        if end_of_week(end_date).is_none() {
            return Err(HeatmapError::invalid_range("end", end));
        }

        Ok(Self {
            start: start_date,
            end: end_date,
            days,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

/// Accepts a bare `YYYY-MM-DD` date or an ISO-8601 datetime, dropping the time of day.
pub fn parse_calendar_date(field: &'static str, value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, ISO_DATE) {
        return Ok(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(datetime.date_naive());
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(datetime.date());
    }

    Err(HeatmapError::invalid_range(field, value))
}

pub fn iso_key(date: NaiveDate) -> String {
    date.format(ISO_DATE).to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub value: f64,
    pub day: u32,
    /// 0-based month, January = 0.
    pub month: u32,
    pub year: i32,
    /// 0 = Sunday .. 6 = Saturday.
    pub day_of_week: u32,
    pub is_in_range: bool,
}

/// Seven consecutive days, Monday at index 0 and Sunday at index 6.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Week {
    pub cells: [CalendarCell; 7],
}

impl Week {
    pub fn monday(&self) -> NaiveDate {
        self.cells[0].date
    }

    pub fn sunday(&self) -> NaiveDate {
        self.cells[6].date
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthLabel {
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub start_week: usize,
    pub end_week: usize,
    pub span: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct HeatmapGrid {
    pub weeks: Vec<Week>,
    pub months: Vec<MonthLabel>,
}

impl HeatmapGrid {
    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    pub fn cells(&self) -> impl Iterator<Item = &CalendarCell> {
        self.weeks.iter().flat_map(|week| week.cells.iter())
    }

    pub fn in_range_cells(&self) -> impl Iterator<Item = &CalendarCell> {
        self.cells().filter(|cell| cell.is_in_range)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdherenceStatistics {
    pub overall_adherence: f64,
    pub average_score: f64,
    pub total_days: u32,
    pub completed_days: u32,
    pub missed_days: u32,
    pub skipped_days: u32,
    pub journal_entries: u32,
    pub longest_streak: u32,
    pub current_streak: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTimeRange {
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub days: u32,
}

impl RawTimeRange {
    pub fn parse(&self) -> Result<TimeRange> {
        TimeRange::parse(&self.start, &self.end, self.days)
    }
}

/// The document the upstream API returns for one heatmap request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapPayload {
    #[serde(default)]
    pub data: DailyScoreMap,
    #[serde(default)]
    pub statistics: Option<AdherenceStatistics>,
    pub time_range: RawTimeRange,
}
