//! CLI entry point for building the Medicare Advantage panel tables.
//!
//! Provides subcommands for loading plan/enrollment, service area and
//! penetration extracts over a range of months, and for merging a year's
//! MA and MA-PD premium tables.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use ma_panel::{
    DataLayout, Period,
    config::DATA_DIR_ENV,
    loaders::{RangeLoad, load_month, load_month_pen, load_month_sa, load_range},
    output::{to_json, write_table},
    premiums::{mapd_clean_merge, read_ma_premiums, read_mapd_premiums},
    summary::{PanelSummary, TableSummary},
};
use serde::Serialize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "ma_panel")]
#[command(about = "Build tidy Medicare Advantage panel tables from CMS extracts", long_about = None)]
struct Cli {
    /// Root of the extracted data
    #[arg(long, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    /// JSON file overriding the directory layout
    #[arg(long)]
    layout: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RangeArgs {
    /// Years to load: 2015, 2015..2016 or 2015..=2016 (inclusive)
    #[arg(long)]
    years: String,

    /// Months to load, e.g. 01,02,03 (defaults to all twelve)
    #[arg(long, value_delimiter = ',')]
    months: Vec<String>,

    /// CSV file to write
    #[arg(short, long)]
    output: PathBuf,

    /// Gzip compress the output
    #[arg(long, default_value_t = false)]
    gzip: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Contract info left-joined with enrollment, one table per range of months
    Enrollment(RangeArgs),
    /// County service areas
    ServiceArea(RangeArgs),
    /// State/county MA penetration
    Penetration(RangeArgs),
    /// Merge a year's MA-only and MA-PD premium tables
    Premiums {
        /// MA-only landscape premium CSV
        #[arg(long)]
        ma: PathBuf,

        /// MA-PD landscape premium CSV
        #[arg(long)]
        mapd: PathBuf,

        #[arg(long)]
        year: i32,

        /// CSV file to write
        #[arg(short, long)]
        output: PathBuf,

        /// Gzip compress the output
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/ma_panel.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("ma_panel.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let layout = resolve_layout(cli.data_dir, cli.layout.as_deref())?;
    info!(root = %layout.root.display(), "Using data layout");

    match cli.command {
        Commands::Enrollment(args) => {
            let periods = periods(&args)?;
            let load = load_range(&periods, |p| load_month(&layout, p))?;
            let panel = PanelSummary::from_panel(&load.rows);
            info!(
                distinct_plans = panel.distinct_plans,
                match_pct = panel.match_pct(),
                "Plan/enrollment panel"
            );
            let summary = export("enrollment", &load, &args)?.with_panel(panel);
            println!("{}", to_json(&summary)?);
        }
        Commands::ServiceArea(args) => {
            let periods = periods(&args)?;
            let load = load_range(&periods, |p| load_month_sa(&layout, p))?;
            println!("{}", to_json(&export("service_area", &load, &args)?)?);
        }
        Commands::Penetration(args) => {
            let periods = periods(&args)?;
            let load = load_range(&periods, |p| load_month_pen(&layout, p))?;
            println!("{}", to_json(&export("penetration", &load, &args)?)?);
        }
        Commands::Premiums {
            ma,
            mapd,
            year,
            output,
            gzip,
        } => {
            let ma_rows = read_ma_premiums(&ma)
                .with_context(|| format!("reading MA premiums from {}", ma.display()))?;
            let mapd_rows = read_mapd_premiums(&mapd)
                .with_context(|| format!("reading MA-PD premiums from {}", mapd.display()))?;

            let merged = mapd_clean_merge(&ma_rows, &mapd_rows, year);
            write_table(&output, &merged, gzip)?;
            println!("{}", to_json(&TableSummary::from_rows("plan_premiums", &merged)?)?);
        }
    }

    Ok(())
}

/// `--data-dir` wins over the layout file's root, which wins over the default.
fn resolve_layout(data_dir: Option<PathBuf>, layout_file: Option<&Path>) -> Result<DataLayout> {
    let layout = match layout_file {
        Some(path) => DataLayout::load(path)
            .with_context(|| format!("loading layout from {}", path.display()))?,
        None => DataLayout::default(),
    };
    Ok(match data_dir {
        Some(dir) => layout.with_root(dir),
        None => layout,
    })
}

fn periods(args: &RangeArgs) -> Result<Vec<Period>> {
    let years = Period::parse_years(&args.years)?;

    let months: Vec<u32> = if args.months.is_empty() {
        (1..=12).collect()
    } else {
        args.months
            .iter()
            .map(|m| {
                m.trim()
                    .parse::<u32>()
                    .with_context(|| format!("month {m:?} is not a number"))
            })
            .collect::<Result<_>>()?
    };

    Ok(Period::range(&years, &months)?)
}

/// Writes the loaded rows and returns their summary.
fn export<T: Serialize>(table: &str, load: &RangeLoad<T>, args: &RangeArgs) -> Result<TableSummary> {
    anyhow::ensure!(
        !load.loaded.is_empty(),
        "no {table} files found for years {}",
        args.years
    );
    write_table(&args.output, &load.rows, args.gzip)?;
    Ok(TableSummary::from_rows(table, &load.rows)?.with_periods(&load.loaded, &load.skipped))
}
