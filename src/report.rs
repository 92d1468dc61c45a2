use std::fmt::Write;

use colored::Colorize;

use crate::grade::{grade_of, tier_of, AdherenceTier};
use crate::models::{AdherenceStatistics, CalendarCell, HeatmapGrid, TimeRange};

const WEEKDAY_LABELS: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];
const CELL_WIDTH: usize = 2;
const LABEL_WIDTH: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct MonthSummary {
    pub name: String,
    pub days: usize,
    pub average_score: f64,
    pub tier: AdherenceTier,
}

pub fn summarize_by_month(grid: &HeatmapGrid) -> Vec<MonthSummary> {
    grid.months
        .iter()
        .filter_map(|month| {
            let values: Vec<f64> = grid
                .in_range_cells()
                .filter(|cell| month.start <= cell.date && cell.date <= month.end)
                .map(|cell| cell.value)
                .collect();
            if values.is_empty() {
                return None;
            }
            let average_score = values.iter().sum::<f64>() / values.len() as f64;
            Some(MonthSummary {
                name: month.name.clone(),
                days: values.len(),
                average_score,
                tier: tier_of(average_score),
            })
        })
        .collect()
}

fn glyph(cell: &CalendarCell, colorize: bool) -> String {
    if !cell.is_in_range {
        return " ".repeat(CELL_WIDTH);
    }
    let tier = tier_of(cell.value);
    if colorize {
        let (r, g, b) = tier.color().rgb;
        format!("{} ", "■".truecolor(r, g, b))
    } else {
        format!("{} ", tier.ordinal())
    }
}

fn month_header(grid: &HeatmapGrid) -> String {
    let mut header: Vec<char> = vec![' '; LABEL_WIDTH + grid.weeks.len() * CELL_WIDTH];
    let mut cursor = 0;

    for month in &grid.months {
        let column = LABEL_WIDTH + month.start_week * CELL_WIDTH;
        if column < cursor {
            continue;
        }
        let name: Vec<char> = month.name.chars().collect();
        if column + name.len() > header.len() {
            header.resize(column + name.len(), ' ');
        }
        header[column..column + name.len()].copy_from_slice(&name);
        cursor = column + name.len() + 1;
    }

    header.into_iter().collect::<String>().trim_end().to_string()
}

/// Contribution-graph rendering: month names over their first column, then one
/// row per weekday. Plain mode prints the tier ordinal (0-5) per day.
pub fn render_heatmap(grid: &HeatmapGrid, colorize: bool) -> String {
    let mut output = String::new();
    if grid.is_empty() {
        let _ = writeln!(output, "No days in this window.");
        return output;
    }

    let _ = writeln!(output, "{}", month_header(grid));
    for (row, label) in WEEKDAY_LABELS.iter().enumerate() {
        let mut line = format!("{:<width$}", label, width = LABEL_WIDTH);
        for week in &grid.weeks {
            line.push_str(&glyph(&week.cells[row], colorize));
        }
        let _ = writeln!(output, "{}", line.trim_end());
    }

    let legend: Vec<String> = AdherenceTier::ALL
        .iter()
        .map(|tier| {
            if colorize {
                let (r, g, b) = tier.color().rgb;
                "■".truecolor(r, g, b).to_string()
            } else {
                tier.ordinal().to_string()
            }
        })
        .collect();
    let _ = writeln!(
        output,
        "{:width$}less {} more",
        "",
        legend.join(" "),
        width = LABEL_WIDTH
    );

    output
}

pub fn build_report(range: &TimeRange, stats: &AdherenceStatistics, grid: &HeatmapGrid) -> String {
    let months = summarize_by_month(grid);
    let mut output = String::new();

    let _ = writeln!(output, "# Adherence Report");
    let _ = writeln!(
        output,
        "Window {} to {} ({} days requested)",
        range.start, range.end, range.days
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Summary");
    let _ = writeln!(
        output,
        "- Overall adherence: {:.1}% (grade {})",
        stats.overall_adherence,
        grade_of(stats.overall_adherence)
    );
    let _ = writeln!(
        output,
        "- Average score: {:.2} ({})",
        stats.average_score,
        tier_of(stats.average_score).description()
    );
    let _ = writeln!(
        output,
        "- Completed days: {} of {}",
        stats.completed_days, stats.total_days
    );
    let _ = writeln!(
        output,
        "- Missed days: {}, skipped days: {}",
        stats.missed_days, stats.skipped_days
    );
    let _ = writeln!(output, "- Journal entries: {}", stats.journal_entries);
    let _ = writeln!(
        output,
        "- Longest streak: {} days, current streak: {} days",
        stats.longest_streak, stats.current_streak
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Months");
    if months.is_empty() {
        let _ = writeln!(output, "No days recorded for this window.");
    } else {
        for month in &months {
            let _ = writeln!(
                output,
                "- {}: {:.2} average over {} days ({})",
                month.name, month.average_score, month.days, month.tier
            );
        }
    }

    let mut best: Vec<&CalendarCell> = grid.in_range_cells().filter(|c| c.value > 0.0).collect();
    best.sort_by(|a, b| {
        b.value
            .partial_cmp(&a.value)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.date.cmp(&b.date))
    });

    let _ = writeln!(output);
    let _ = writeln!(output, "## Best Days");
    if best.is_empty() {
        let _ = writeln!(output, "No scored days in this window.");
    } else {
        for cell in best.iter().take(5) {
            let _ = writeln!(
                output,
                "- {}: {:.1} ({})",
                cell.date,
                cell.value,
                tier_of(cell.value).description()
            );
        }
    }

    output
}
