//! signalbars CLI: chart, curve and predict commands.
//!
//! Commands:
//! - `chart`: signals (text or files) → OHLCV candles
//! - `curve`: signals → `{time, price}` line, synthesizing prices if needed
//! - `predict`: random-walk price path, optionally as candles
//!
//! Data goes to stdout (or `--out` artifacts); logs go to stderr.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{NaiveDateTime, Timelike};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use signalbars_core::data::timestamp::parse_timestamp;
use signalbars_core::{Interval, PredictRequest};
use signalbars_runner::{
    export_json, export_series_csv, run_batch, run_curve, run_predict, save_artifacts, ChartJob,
    CurveJob, PipelineConfig, PredictJob, RunReport, Series, SignalSource, EMPTY_MESSAGE,
};

#[derive(Parser)]
#[command(
    name = "signalbars",
    about = "signalbars: trading signals to candles, curves and simulated paths"
)]
struct Cli {
    /// Pipeline config (TOML). Flags override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More logging on stderr (-v info, -vv debug). RUST_LOG wins when set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
    Summary,
}

#[derive(clap::Args)]
struct InputArgs {
    /// Signal files (.csv, or .xls/.xlsx/.xlsm/.xlsb/.ods).
    files: Vec<PathBuf>,

    /// Signal lines passed inline.
    #[arg(long, conflicts_with = "text_file")]
    text: Option<String>,

    /// File of signal lines; `-` reads stdin.
    #[arg(long)]
    text_file: Option<PathBuf>,
}

#[derive(clap::Args)]
struct OutputArgs {
    /// Output format on stdout.
    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,

    /// Write report.json and the series CSV into this directory instead.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate signals into OHLCV candles.
    Chart {
        #[command(flatten)]
        input: InputArgs,

        /// Candle interval: 5m, 15m, 30m or 4h. Defaults to the config value (30m).
        #[arg(long)]
        interval: Option<Interval>,

        /// Synthesize prices from buy/sell steps when the input has none.
        #[arg(long)]
        start_price: Option<f64>,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Build a price line from signals.
    Curve {
        #[command(flatten)]
        input: InputArgs,

        /// Price the synthesized curve starts from.
        #[arg(long)]
        start_price: f64,

        /// Percentage move per signal. Defaults to the config value (1.0).
        #[arg(long)]
        step_pct: Option<f64>,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Generate a random-walk price path.
    Predict {
        /// Start price; `0,01` and `$1.5` are accepted.
        #[arg(long)]
        price: String,

        /// Number of points (whole number, at least 1).
        #[arg(long)]
        points: String,

        /// Minutes between points (whole number).
        #[arg(long)]
        gap: String,

        /// Volatility in percent per step. Empty means the default (2).
        #[arg(long, default_value = "")]
        vol: String,

        /// First timestamp (e.g. "2024-01-01 10:00"). Defaults to now.
        #[arg(long)]
        start: Option<String>,

        /// Emit candles at this interval from synthetic trades instead of the line.
        #[arg(long)]
        candles: Option<Interval>,

        /// Master seed for reproducible paths.
        #[arg(long)]
        seed: Option<u64>,

        #[command(flatten)]
        output: OutputArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    };

    match cli.command {
        Commands::Chart {
            input,
            interval,
            start_price,
            output,
        } => run_chart_cmd(&config, input, interval, start_price, &output),
        Commands::Curve {
            input,
            start_price,
            step_pct,
            output,
        } => {
            if let Some(step) = step_pct {
                config.curve.step_pct = step;
            }
            run_curve_cmd(&config, input, start_price, &output)
        }
        Commands::Predict {
            price,
            points,
            gap,
            vol,
            start,
            candles,
            seed,
            output,
        } => {
            if seed.is_some() {
                config.seed = seed;
            }
            let request = PredictRequest::from_inputs(&price, &points, &gap, &vol)?;
            let start_time = match start {
                Some(s) => parse_timestamp(&s).with_context(|| format!("invalid --start '{s}'"))?,
                None => now(),
            };
            let job = PredictJob {
                request,
                start_time,
                candles,
            };
            let report = run_predict(&job, &config)?;
            emit(&report, &output, None)
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn now() -> NaiveDateTime {
    let now = chrono::Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

fn sources(input: InputArgs) -> Result<Vec<SignalSource>> {
    let mut sources = Vec::new();
    if let Some(text) = input.text {
        sources.push(SignalSource::Text(text));
    }
    if let Some(path) = input.text_file {
        sources.push(SignalSource::Text(read_text(&path)?));
    }
    sources.extend(input.files.into_iter().map(SignalSource::File));
    if sources.is_empty() {
        bail!("no input: pass signal files, --text or --text-file");
    }
    Ok(sources)
}

fn read_text(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read signals from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn run_chart_cmd(
    config: &PipelineConfig,
    input: InputArgs,
    interval: Option<Interval>,
    start_price: Option<f64>,
    output: &OutputArgs,
) -> Result<()> {
    let jobs: Vec<ChartJob> = sources(input)?
        .into_iter()
        .map(|source| ChartJob {
            source,
            interval,
            start_price,
        })
        .collect();

    let batch = jobs.len() > 1;
    let mut failures = 0usize;
    for (i, result) in run_batch(&jobs, config).into_iter().enumerate() {
        match result {
            Ok(report) => emit(&report, output, batch.then_some(i))?,
            Err(e) => {
                failures += 1;
                warn!(source = %jobs[i].source, error = %e, "chart job failed");
                eprintln!("Error for {}: {e}", jobs[i].source);
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} inputs failed", jobs.len());
    }
    Ok(())
}

fn run_curve_cmd(
    config: &PipelineConfig,
    input: InputArgs,
    start_price: f64,
    output: &OutputArgs,
) -> Result<()> {
    let mut sources = sources(input)?;
    if sources.len() > 1 {
        bail!("curve takes exactly one input");
    }
    let job = CurveJob {
        source: sources.remove(0),
        start_price,
    };
    let report = run_curve(&job, config)?;
    emit(&report, output, None)
}

/// Print or save one report. `index` numbers the artifact directories of a
/// batch run.
fn emit(report: &RunReport, output: &OutputArgs, index: Option<usize>) -> Result<()> {
    if let Some(dir) = &output.out {
        let dir = match index {
            Some(i) => dir.join(format!("run-{}", i + 1)),
            None => dir.clone(),
        };
        let paths = save_artifacts(report, &dir)?;
        for path in paths {
            println!("Wrote {}", path.display());
        }
        if report.is_empty() {
            println!("{EMPTY_MESSAGE}: {}", report.source);
        }
        return Ok(());
    }

    if report.is_empty() && !matches!(output.format, Format::Json) {
        println!("{EMPTY_MESSAGE}: {}", report.source);
        return Ok(());
    }

    match output.format {
        Format::Csv => print!("{}", export_series_csv(&report.series)?),
        Format::Json => println!("{}", export_json(report)?),
        Format::Summary => print_summary(report),
    }
    Ok(())
}

fn print_summary(report: &RunReport) {
    println!();
    println!("=== {} ===", report.source);
    println!("Series:         {} ({} rows)", report.series.kind(), report.series.len());
    if let Some(interval) = report.interval {
        println!("Interval:       {interval}");
    }
    println!("Events:         {}", report.event_count);
    println!("Dataset hash:   {}", report.dataset_hash);
    if let Some(seed) = report.seed {
        println!("Seed:           {seed}");
    }
    if let Series::Candles(candles) = &report.series {
        if let (Some(first), Some(last)) = (candles.first(), candles.last()) {
            let high = candles.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
            let low = candles.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
            let volume: f64 = candles.iter().map(|c| c.volume).sum();
            println!();
            println!("--- Candles ---");
            println!("Period:         {} to {}", first.time, last.time);
            println!("Open / Close:   {} / {}", first.open, last.close);
            println!("High / Low:     {high} / {low}");
            println!("Volume:         {volume:.2}");
        }
    }
    if let Series::Line(points) = &report.series {
        if let (Some(first), Some(last)) = (points.first(), points.last()) {
            println!();
            println!("--- Line ---");
            println!("Period:         {} to {}", first.time, last.time);
            println!("Start / End:    {} / {}", first.price, last.price);
        }
    }
}
