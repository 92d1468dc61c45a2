use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{iso_key, CalendarCell, DailyScoreMap, HeatmapGrid, MonthLabel, TimeRange, Week};

pub trait MonthNameFormatter {
    /// `month` is 1-based, January = 1.
    fn short_name(&self, month: u32) -> String;
}

const GERMAN_SHORT: [&str; 12] = [
    "Jan.", "Feb.", "März", "Apr.", "Mai", "Juni", "Juli", "Aug.", "Sept.", "Okt.", "Nov.", "Dez.",
];

const ENGLISH_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct GermanShortMonths;

impl MonthNameFormatter for GermanShortMonths {
    fn short_name(&self, month: u32) -> String {
        GERMAN_SHORT[(month.clamp(1, 12) - 1) as usize].to_string()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishShortMonths;

impl MonthNameFormatter for EnglishShortMonths {
    fn short_name(&self, month: u32) -> String {
        ENGLISH_SHORT[(month.clamp(1, 12) - 1) as usize].to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthLocale {
    #[default]
    De,
    En,
}

impl MonthLocale {
    pub fn formatter(self) -> Box<dyn MonthNameFormatter> {
        match self {
            Self::De => Box::new(GermanShortMonths),
            Self::En => Box::new(EnglishShortMonths),
        }
    }
}

/// Monday on or before `date`, or `None` when that falls before the earliest
/// representable date.
pub fn start_of_week(date: NaiveDate) -> Option<NaiveDate> {
    let days_to_monday = match date.weekday() {
        Weekday::Sun => 6,
        other => other.num_days_from_sunday() - 1,
    };
    date.checked_sub_signed(Duration::days(days_to_monday as i64))
}

/// Sunday on or after `date`, or `None` past the latest representable date.
pub fn end_of_week(date: NaiveDate) -> Option<NaiveDate> {
    let days_to_sunday = match date.weekday() {
        Weekday::Sun => 0,
        other => 7 - other.num_days_from_sunday(),
    };
    date.checked_add_signed(Duration::days(days_to_sunday as i64))
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn last_of_month(month_start: NaiveDate) -> NaiveDate {
    month_start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(month_start)
}

fn week_index(date: NaiveDate, grid_start: NaiveDate) -> i64 {
    (date - grid_start).num_days().div_euclid(7)
}

fn build_cell(date: NaiveDate, scores: &DailyScoreMap, range: &TimeRange) -> CalendarCell {
    CalendarCell {
        date,
        value: scores.get(&iso_key(date)).copied().unwrap_or(0.0),
        day: date.day(),
        month: date.month0(),
        year: date.year(),
        day_of_week: date.weekday().num_days_from_sunday(),
        is_in_range: range.contains(date),
    }
}

fn build_week(week_start: NaiveDate, scores: &DailyScoreMap, range: &TimeRange) -> Option<Week> {
    let mut dates = [week_start; 7];
    for (offset, slot) in dates.iter_mut().enumerate().skip(1) {
        *slot = week_start.checked_add_signed(Duration::days(offset as i64))?;
    }
    Some(Week {
        cells: dates.map(|date| build_cell(date, scores, range)),
    })
}

/// Lays `scores` out as Monday-first weeks covering `range`, plus the month
/// header row aligned to week columns. An inverted range, or one whose padding
/// weeks fall outside the representable calendar, yields an empty grid.
pub fn build_grid(
    scores: &DailyScoreMap,
    range: &TimeRange,
    month_names: &dyn MonthNameFormatter,
) -> HeatmapGrid {
    if range.is_empty() {
        return HeatmapGrid::default();
    }

    let (Some(grid_start), Some(grid_end)) = (start_of_week(range.start), end_of_week(range.end))
    else {
        return HeatmapGrid::default();
    };

    let weeks: Vec<Week> = (0..)
        .map_while(|i: i64| grid_start.checked_add_signed(Duration::days(7 * i)))
        .take_while(|week_start| *week_start <= grid_end)
        .map_while(|week_start| build_week(week_start, scores, range))
        .collect();

    let months = month_labels(grid_start, grid_end, weeks.len(), month_names);

    HeatmapGrid { weeks, months }
}

/// Same as [`build_grid`] for ISO date strings straight from the payload.
pub fn build_grid_from_iso(
    scores: &DailyScoreMap,
    start: &str,
    end: &str,
    days: u32,
    month_names: &dyn MonthNameFormatter,
) -> Result<HeatmapGrid> {
    let range = TimeRange::parse(start, end, days)?;
    Ok(build_grid(scores, &range, month_names))
}

// Week indices are clamped to the grid before the span is taken, so a month
// overhanging the first or last column only counts the columns it shows in.
fn month_labels(
    grid_start: NaiveDate,
    grid_end: NaiveDate,
    week_count: usize,
    month_names: &dyn MonthNameFormatter,
) -> Vec<MonthLabel> {
    if week_count == 0 {
        return Vec::new();
    }
    let last_week = (week_count - 1) as i64;

    let first = first_of_month(grid_start);
    (0..)
        .map_while(|i| first.checked_add_months(Months::new(i)))
        .take_while(|month_start| *month_start <= grid_end)
        .map(|month_start| {
            let month_end = last_of_month(month_start);
            let start_week = week_index(month_start, grid_start).max(0);
            let end_week = week_index(month_end, grid_start).min(last_week);
            let span = (end_week - start_week + 1).max(1);

            MonthLabel {
                name: month_names.short_name(month_start.month()),
                start: month_start,
                end: month_end,
                start_week: start_week as usize,
                end_week: end_week as usize,
                span: span as usize,
            }
        })
        .collect()
}
