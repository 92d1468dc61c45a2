use std::path::PathBuf;

use adherence_heatmap::calendar::build_grid;
use adherence_heatmap::config::{self, HeatmapConfig, CONFIG_FILE};
use adherence_heatmap::grade::{grade_of, tier_of, Grade};
use adherence_heatmap::models::{
    parse_calendar_date, AdherenceStatistics, DailyScoreMap, HeatmapGrid, TimeRange,
};
use adherence_heatmap::{ingest, report, stats};
use anyhow::Context;
use chrono::Local;
use clap::{ArgGroup, Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "adherence-heatmap")]
#[command(about = "Adherence heatmap, statistics and grades for daily protocol scores", long_about = None)]
struct Cli {
    /// Path to a heatmap.toml (defaults to ./heatmap.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
#[command(group(
    ArgGroup::new("source")
        .args(["input", "csv"])
        .required(true)
        .multiple(false)
))]
struct SourceArgs {
    /// JSON payload with data, statistics and timeRange
    #[arg(long)]
    input: Option<PathBuf>,
    /// CSV file with date,score rows
    #[arg(long)]
    csv: Option<PathBuf>,
    /// First day of the window (CSV only)
    #[arg(long)]
    start: Option<String>,
    /// Last day of the window (CSV only, defaults to today)
    #[arg(long)]
    end: Option<String>,
    /// Window length in days when --start is not given (CSV only)
    #[arg(long)]
    days: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw the heatmap in the terminal
    Render {
        #[command(flatten)]
        source: SourceArgs,
        /// Print the grid, statistics and grade as JSON instead
        #[arg(long)]
        json: bool,
        #[arg(long)]
        no_color: bool,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Letter grade for an adherence percentage
    Grade {
        #[arg(allow_negative_numbers = true)]
        percentage: f64,
    },
    /// Tier and description for a daily score
    Tier {
        #[arg(allow_negative_numbers = true)]
        score: f64,
    },
    /// Write a default heatmap.toml to the current directory
    Init,
}

struct Window {
    scores: DailyScoreMap,
    range: TimeRange,
    statistics: AdherenceStatistics,
}

#[derive(Serialize)]
struct RenderOutput<'a> {
    grid: &'a HeatmapGrid,
    statistics: &'a AdherenceStatistics,
    grade: Grade,
}

fn load_window(source: &SourceArgs, config: &HeatmapConfig) -> anyhow::Result<Window> {
    if let Some(path) = &source.input {
        let payload = ingest::load_payload(path)
            .with_context(|| format!("failed to load payload {}", path.display()))?;
        let range = payload.time_range.parse()?;
        let statistics = match payload.statistics {
            Some(statistics) => statistics,
            None => stats::summarize(&payload.data, &range),
        };
        return Ok(Window {
            scores: payload.data,
            range,
            statistics,
        });
    }

    let path = source
        .csv
        .as_ref()
        .context("either --input or --csv is required")?;
    let scores = ingest::import_csv(path)
        .with_context(|| format!("failed to import scores from {}", path.display()))?;

    let end = match &source.end {
        Some(value) => parse_calendar_date("end", value)?,
        None => Local::now().date_naive(),
    };
    let range = match &source.start {
        Some(value) => {
            let start = parse_calendar_date("start", value)?;
            ingest::range_between(start, end, source.days)
        }
        None => ingest::range_ending(end, source.days.unwrap_or(config.range.default_days))?,
    };
    if range.is_empty() {
        warn!(start = %range.start, end = %range.end, "window starts after it ends");
    }

    let statistics = stats::summarize(&scores, &range);
    Ok(Window {
        scores,
        range,
        statistics,
    })
}

fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Render {
            source,
            json,
            no_color,
        } => {
            let config = config::load_config(cli.config.as_deref(), &cwd)?;
            let window = load_window(&source, &config)?;
            let month_names = config.display.locale.formatter();
            let grid = build_grid(&window.scores, &window.range, month_names.as_ref());
            info!(weeks = grid.weeks.len(), months = grid.months.len(), "built grid");

            if json {
                let output = RenderOutput {
                    grid: &grid,
                    statistics: &window.statistics,
                    grade: grade_of(window.statistics.overall_adherence),
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print!("{}", report::render_heatmap(&grid, config.display.color && !no_color));
                println!(
                    "Overall adherence {:.1}% (grade {})",
                    window.statistics.overall_adherence,
                    grade_of(window.statistics.overall_adherence)
                );
            }
        }
        Commands::Report { source, out } => {
            let config = config::load_config(cli.config.as_deref(), &cwd)?;
            let window = load_window(&source, &config)?;
            let month_names = config.display.locale.formatter();
            let grid = build_grid(&window.scores, &window.range, month_names.as_ref());
            let report = report::build_report(&window.range, &window.statistics, &grid);
            std::fs::write(&out, report)
                .with_context(|| format!("failed writing {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Grade { percentage } => {
            println!("{}", grade_of(percentage));
        }
        Commands::Tier { score } => {
            let tier = tier_of(score);
            println!("{} ({}) {}", tier, tier.color().hex, tier.description());
        }
        Commands::Init => {
            // Runs without loading any config, so a missing or malformed one does not block it.
            if cli.config.is_some() {
                warn!("--config is ignored by `init`; writing ./{}", CONFIG_FILE);
            }
            let path = config::init_config(&cwd)?;
            println!("Created {}.", path.display());
        }
    }

    Ok(())
}
