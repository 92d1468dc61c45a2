use crate::models::{iso_key, AdherenceStatistics, DailyScoreMap, TimeRange};

/// Derives window statistics from raw scores when the upstream payload carries none.
/// Skipped days and journal entries are only known upstream and stay 0.
pub fn summarize(scores: &DailyScoreMap, range: &TimeRange) -> AdherenceStatistics {
    if range.is_empty() {
        return AdherenceStatistics::default();
    }

    let values: Vec<f64> = range
        .start
        .iter_days()
        .take_while(|date| *date <= range.end)
        .map(|date| scores.get(&iso_key(date)).copied().unwrap_or(0.0))
        .collect();

    let total_days = values.len() as u32;
    let completed_days = values.iter().filter(|v| **v > 0.0).count() as u32;
    let average_score = values.iter().sum::<f64>() / values.len() as f64;

    let mut longest_streak = 0u32;
    let mut run = 0u32;
    for value in &values {
        if *value > 0.0 {
            run += 1;
            longest_streak = longest_streak.max(run);
        } else {
            run = 0;
        }
    }

    AdherenceStatistics {
        overall_adherence: average_score / 5.0 * 100.0,
        average_score,
        total_days,
        completed_days,
        missed_days: total_days - completed_days,
        skipped_days: 0,
        journal_entries: 0,
        longest_streak,
        current_streak: run,
    }
}
