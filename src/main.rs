// Year Calendar - CLI
// Loads records, applies config and persisted filters, prints the view.

use anyhow::{Context, Result};
use chrono::{Local, Month, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use year_calendar::loader::load_records;
use year_calendar::{
    recompute, CalendarConfig, CalendarInput, CalendarState, CalendarView, RenderItem,
};

#[derive(Parser)]
#[command(name = "year-calendar", version, about = "Yearly calendar of recurring events and periods")]
struct Args {
    /// Log pipeline stages to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the calendar view
    Render(RenderArgs),
    /// List metadata categories and their values
    Metadata {
        /// JSON array or CSV file of records
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[derive(Parser)]
struct RenderArgs {
    /// JSON array or CSV file of records
    #[arg(short, long)]
    input: PathBuf,

    /// Reference date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Calendar config (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Persisted filter state snapshot (JSON)
    #[arg(long)]
    filter_state: Option<PathBuf>,

    /// BCP-47 locale tag, overrides the config
    #[arg(long)]
    locale: Option<String>,

    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Render(render) => run_render(render),
        Command::Metadata { input } => run_metadata(input),
    }
}

fn run_render(args: RenderArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => CalendarConfig::from_file(path)?,
        None => CalendarConfig::default(),
    };
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let records = load_records(&args.input)?;

    let mut state = CalendarState::with_records(&records, today, config)
        .with_context(|| format!("Invalid records in {}", args.input.display()))?;

    if let Some(locale) = args.locale {
        state = recompute(&state, CalendarInput::SetLocale(Some(locale)))?;
    }

    if let Some(path) = &args.filter_state {
        let snapshot = fs::read_to_string(path)
            .with_context(|| format!("Failed to read filter state: {}", path.display()))?;
        state = recompute(&state, CalendarInput::HydrateFilterState(snapshot))?;
    }

    let view = state.view()?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
        OutputFormat::Text => print!("{}", render_text(&view)),
    }

    Ok(())
}

fn run_metadata(input: PathBuf) -> Result<()> {
    let records = load_records(&input)?;
    let today = Local::now().date_naive();
    let state = CalendarState::with_records(&records, today, CalendarConfig::default())
        .with_context(|| format!("Invalid records in {}", input.display()))?;

    if state.metadata().is_empty() {
        println!("No filters available");
        return Ok(());
    }

    for category in state.metadata().categories() {
        println!("{}: {}", category.name, category.values.join(", "));
    }

    Ok(())
}

fn month_name(month: u32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name().to_string())
        .unwrap_or_else(|| month.to_string())
}

/// Plain-text outline of the view (English month names)
fn render_text(view: &CalendarView) -> String {
    let mut out = String::new();

    for item in &view.render_items {
        match item {
            RenderItem::MonthHeader { month } => {
                out.push_str(&format!("\n{}\n", month_name(*month)));
            }
            RenderItem::WeekHeader { week_number } => {
                out.push_str(&format!("  {} {}\n", view.labels.week, week_number));
            }
            RenderItem::DateGroupEntry { datetime, items, .. } => {
                for entry in items {
                    let values: Vec<String> = entry.metadata_entries().map(|(_, v)| v).collect();
                    out.push_str(&format!(
                        "    {}  {}  [{}]\n",
                        datetime,
                        entry.label.as_deref().unwrap_or(""),
                        values.join(" • ")
                    ));
                }
            }
        }
    }

    if !view.period_groups.is_empty() {
        out.push_str(&format!("\n{}\n", view.labels.periods));
        for group in &view.period_groups {
            out.push_str(&format!("  {}\n", group.category_name));
            for period in &group.periods {
                if let Some(range) = period.date_range() {
                    out.push_str(&format!(
                        "    {:02}-{:02} - {:02}-{:02}  {}\n",
                        range.start_month,
                        range.start_day,
                        range.end_month,
                        range.end_day,
                        period.description.as_deref().unwrap_or("")
                    ));
                }
            }
        }
    }

    out
}
