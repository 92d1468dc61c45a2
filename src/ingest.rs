use std::fs;
use std::io::Read;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use tracing::{debug, warn};

use crate::calendar::start_of_week;
use crate::error::{HeatmapError, Result};
use crate::models::{iso_key, parse_calendar_date, DailyScoreMap, HeatmapPayload, TimeRange};

pub const MAX_SCORE: f64 = 5.0;

pub fn load_payload(path: &Path) -> Result<HeatmapPayload> {
    let content = fs::read_to_string(path).map_err(|source| HeatmapError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let payload: HeatmapPayload = serde_json::from_str(&content)?;
    debug!(
        path = %path.display(),
        days = payload.data.len(),
        has_statistics = payload.statistics.is_some(),
        "loaded heatmap payload"
    );
    Ok(payload)
}

pub fn import_csv(path: &Path) -> Result<DailyScoreMap> {
    let file = fs::File::open(path).map_err(|source| HeatmapError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let scores = read_scores(file)?;
    debug!(path = %path.display(), days = scores.len(), "imported daily scores");
    Ok(scores)
}

/// Reads `date,score` rows. Dates are normalized to `YYYY-MM-DD`; a repeated
/// date keeps the last row.
pub fn read_scores<R: Read>(input: R) -> Result<DailyScoreMap> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        date: String,
        score: f64,
    }

    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);
    let mut scores = DailyScoreMap::new();

    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result?;
        let line = index + 2;
        let date = parse_calendar_date("date", &row.date).map_err(|_| HeatmapError::InvalidRow {
            row: line,
            value: row.date.clone(),
        })?;

        if !(0.0..=MAX_SCORE).contains(&row.score) {
            warn!(row = line, date = %date, score = row.score, "score outside 0..=5 kept as-is");
        }

        if scores.insert(iso_key(date), row.score).is_some() {
            debug!(row = line, date = %date, "duplicate date, later row wins");
        }
    }

    Ok(scores)
}

/// The `days`-long window ending on `end` inclusive. Fails when the window
/// (or its Monday padding) reaches before the earliest representable date.
pub fn range_ending(end: NaiveDate, days: u32) -> Result<TimeRange> {
    let days = days.max(1);
    let start = end
        .checked_sub_signed(Duration::days(days as i64 - 1))
        .filter(|start| start_of_week(*start).is_some())
        .ok_or_else(|| HeatmapError::invalid_range("days", days.to_string()))?;
    Ok(TimeRange::new(start, end, days))
}

/// Explicit `start..=end` window. Without `days` the inclusive span is recorded,
/// saturating at `u32::MAX`; inverted windows record 0.
pub fn range_between(start: NaiveDate, end: NaiveDate, days: Option<u32>) -> TimeRange {
    let days = days.unwrap_or_else(|| {
        let span = (end - start).num_days() + 1;
        if span <= 0 {
            0
        } else {
            u32::try_from(span).unwrap_or(u32::MAX)
        }
    });
    TimeRange::new(start, end, days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn reads_scores_and_keeps_last_duplicate() {
        let csv = "date,score\n2024-06-03,4.5\n2024-06-04T09:30:00Z,2\n2024-06-03,3.0\n";
        let scores = read_scores(csv.as_bytes()).unwrap();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores.get("2024-06-03"), Some(&3.0));
        assert_eq!(scores.get("2024-06-04"), Some(&2.0));
    }

    #[test]
    fn reports_row_number_for_bad_dates() {
        let csv = "date,score\n2024-06-03,4.5\nyesterday,1\n";
        let err = read_scores(csv.as_bytes()).unwrap_err();
        match err {
            HeatmapError::InvalidRow { row, value } => {
                assert_eq!(row, 3);
                assert_eq!(value, "yesterday");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_non_numeric_scores() {
        let csv = "date,score\n2024-06-03,lots\n";
        assert!(matches!(read_scores(csv.as_bytes()), Err(HeatmapError::Csv(_))));
    }

    #[test]
    fn window_ends_on_given_day() {
        let range = range_ending(date(2024, 6, 30), 30).unwrap();
        assert_eq!(range.start, date(2024, 6, 1));
        assert_eq!(range.end, date(2024, 6, 30));
        assert_eq!(range.days, 30);

        let single = range_ending(date(2024, 6, 30), 0).unwrap();
        assert_eq!(single.start, single.end);
        assert_eq!(single.days, 1);
    }

    #[test]
    fn oversized_window_is_an_invalid_range() {
        match range_ending(date(2024, 6, 30), u32::MAX).unwrap_err() {
            HeatmapError::InvalidRange { field, value } => {
                assert_eq!(field, "days");
                assert_eq!(value, u32::MAX.to_string());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn explicit_window_records_saturating_span() {
        assert_eq!(range_between(date(2024, 6, 1), date(2024, 6, 30), None).days, 30);
        assert_eq!(range_between(date(2024, 6, 1), date(2024, 6, 30), Some(90)).days, 90);
        assert_eq!(range_between(date(2024, 6, 30), date(2024, 6, 1), None).days, 0);

        let huge = range_between(NaiveDate::MIN, NaiveDate::MAX, None);
        assert_eq!(huge.days, u32::MAX);
        assert_eq!(huge.start, NaiveDate::MIN);
    }

    #[test]
    fn loads_payload_and_csv_from_disk() {
        let dir = tempfile::tempdir().unwrap();

        let payload_path = dir.path().join("payload.json");
        let mut file = fs::File::create(&payload_path).unwrap();
        write!(
            file,
            r#"{{"data": {{"2024-06-03": 4.5}}, "timeRange": {{"start": "2024-06-03", "end": "2024-06-04", "days": 2}}}}"#
        )
        .unwrap();
        let payload = load_payload(&payload_path).unwrap();
        assert!(payload.statistics.is_none());
        assert_eq!(payload.time_range.parse().unwrap().end, date(2024, 6, 4));

        let csv_path = dir.path().join("scores.csv");
        fs::write(&csv_path, "date,score\n2024-06-03,1.5\n").unwrap();
        assert_eq!(import_csv(&csv_path).unwrap().get("2024-06-03"), Some(&1.5));

        let missing = dir.path().join("missing.csv");
        assert!(matches!(import_csv(&missing), Err(HeatmapError::Io { .. })));
    }
}
