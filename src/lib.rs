//! Calendar bucketing and adherence grading for a contribution-style
//! adherence heatmap.
//!
//! [`calendar::build_grid`] lays per-day scores out as Monday-first weeks
//! with a month header overlay; [`grade`] maps scores to tiers and aggregate
//! percentages to letter grades. Both are pure and allocate fresh output.

pub mod calendar;
pub mod config;
pub mod error;
pub mod grade;
pub mod ingest;
pub mod models;
pub mod report;
pub mod stats;

pub use calendar::{build_grid, build_grid_from_iso, MonthLocale, MonthNameFormatter};
pub use error::HeatmapError;
pub use grade::{color_of, description_of, grade_of, tier_of, AdherenceTier, Grade};
pub use models::{CalendarCell, DailyScoreMap, HeatmapGrid, MonthLabel, TimeRange, Week};
