use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use corona_charts::{Client, DateRange, DeriveError, Metric, SeriesOptions};
use corona_charts::{filter, search, series, viz};
use std::path::{Path, PathBuf};
use std::process::Command as Process;

#[derive(Parser, Debug)]
#[command(
    name = "corona",
    version,
    about = "Fetch regional pandemic case counts & plot daily/cumulative charts"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plot line charts for the given regions.
    Plot(PlotArgs),
    /// Look up region ids by label substring.
    Search(SearchArgs),
}

#[derive(Args, Debug)]
struct PlotArgs {
    /// Region ids to plot (e.g., DE FR or DE-BY), one color each.
    #[arg(required = true)]
    regions: Vec<String>,
    /// Cumulative metric to derive series from.
    #[arg(short, long, value_enum, default_value = "confirmed")]
    metric: Metric,
    /// Include the daily new-cases line.
    #[arg(long, default_value_t = false)]
    daily: bool,
    /// Include the raw cumulative line (default when --daily is not set).
    #[arg(long, default_value_t = false)]
    cumulative: bool,
    /// Rolling-average window in days (0 disables, e.g. 7 for weekly smoothing).
    #[arg(long, default_value_t = 0)]
    ave: usize,
    /// Normalize daily numbers to 100k population.
    #[arg(long, default_value_t = false)]
    per100k: bool,
    /// First date to include (YYYYMMDD, inclusive).
    #[arg(long)]
    from: Option<u32>,
    /// Last date to include (YYYYMMDD, inclusive).
    #[arg(long)]
    to: Option<u32>,
    /// Width of the chart (default 1000).
    #[arg(long, default_value_t = 1000)]
    width: u32,
    /// Height of the chart (default 500).
    #[arg(long, default_value_t = 500)]
    height: u32,
    /// Write the chart as PNG to this path.
    #[arg(long)]
    png: Option<PathBuf>,
    /// Write the chart as SVG to this path.
    #[arg(long)]
    svg: Option<PathBuf>,
    /// Open the written chart in the system viewer.
    #[arg(long, default_value_t = false)]
    show: bool,
    /// Override the feed URL.
    #[arg(long)]
    url: Option<String>,
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Label substrings to look up, each evaluated independently.
    #[arg(required = true)]
    queries: Vec<String>,
    /// First date to include (YYYYMMDD, inclusive).
    #[arg(long)]
    from: Option<u32>,
    /// Last date to include (YYYYMMDD, inclusive).
    #[arg(long)]
    to: Option<u32>,
    /// Override the feed URL.
    #[arg(long)]
    url: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Plot(args) => cmd_plot(args),
        Command::Search(args) => cmd_search(args),
    }
}

fn make_client(url: Option<String>) -> Client {
    url.map(Client::new).unwrap_or_default()
}

fn cmd_plot(args: PlotArgs) -> Result<()> {
    if args.png.is_none() && args.svg.is_none() {
        anyhow::bail!("nothing to do: pass --png and/or --svg");
    }

    let dataset = make_client(args.url).fetch()?;
    let range = DateRange {
        start: args.from,
        end: args.to,
    };
    let filtered = filter::filter_rows(&dataset, &args.regions, &range);

    let opts = SeriesOptions {
        daily: args.daily,
        average_window: args.ave,
        // Without --daily the chart falls back to the cumulative line so
        // there is always something to plot.
        cumulative: args.cumulative || !args.daily,
        per_capita: args.per100k,
    };

    let mut lines = Vec::new();
    for (idx, id) in args.regions.iter().enumerate() {
        let rows = filter::rows_for_region(&filtered, id);
        if rows.is_empty() {
            log::debug!("no rows for region {}", id);
            continue;
        }
        match series::derive(&rows, args.metric, &opts) {
            Ok(derived) => lines.extend(series::to_lines(&derived, args.metric, &opts, idx)),
            Err(e @ DeriveError::MissingPopulation { .. }) => {
                log::warn!("skipping region: {}", e);
            }
            Err(e) => return Err(e.into()),
        }
    }

    let title = viz::chart_title(&args.regions, &filtered, args.metric, args.per100k);
    let meta = viz::ChartMeta::new(title, args.width, args.height);

    for path in [args.png.as_ref(), args.svg.as_ref()].into_iter().flatten() {
        viz::render(&lines, &meta, path)?;
        eprintln!("Wrote chart to {}", path.display());
    }

    if args.show {
        // Prefer the markup output when both were written.
        if let Some(path) = args.svg.as_ref().or(args.png.as_ref()) {
            open_in_viewer(path)?;
        }
    }

    Ok(())
}

fn cmd_search(args: SearchArgs) -> Result<()> {
    let dataset = make_client(args.url).fetch()?;
    let range = DateRange {
        start: args.from,
        end: args.to,
    };
    let rows = if range.is_unbounded() {
        dataset
    } else {
        filter::filter_rows(&dataset, &[], &range)
    };

    let matches = search::search_all(&rows, &args.queries);
    if matches.is_empty() {
        eprintln!("no matching regions");
        return Ok(());
    }
    for m in matches {
        println!("{}\t{} ({})", m.id, m.label, m.label_en);
    }
    Ok(())
}

#[cfg(target_os = "macos")]
const OPENER: &str = "open";
#[cfg(target_os = "windows")]
const OPENER: &str = "explorer";
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const OPENER: &str = "xdg-open";

fn open_in_viewer(path: &Path) -> Result<()> {
    Process::new(OPENER)
        .arg(path)
        .status()
        .with_context(|| format!("open {} with {}", path.display(), OPENER))?;
    Ok(())
}
