use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;

use socialplot::config::ConfigFile;
use socialplot::runtime::{self, RunOptions};
use socialplot::{telemetry, ChartKind, OutputFormat};

#[derive(Parser, Debug)]
#[command(name = "socialplot")]
#[command(about = "Render boxplot, grouped bar and line charts of social media likes from CSV", long_about = None)]
struct Args {
    /// JSON file overriding chart defaults (titles, columns, layout, ...)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding the input CSV files
    #[arg(long, default_value = ".", value_name = "DIR")]
    data_dir: PathBuf,

    /// Directory the charts are written to
    #[arg(long, default_value = ".", value_name = "DIR")]
    out_dir: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Svg)]
    format: OutputFormat,

    /// Only render these charts (repeatable); all three by default
    #[arg(long = "chart", value_enum, value_name = "KIND")]
    charts: Vec<ChartKind>,
}

fn main() -> Result<()> {
    telemetry::init_default_tracing();
    let args = Args::parse();

    let config_file = match &args.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };

    let kinds: Vec<ChartKind> = if args.charts.is_empty() {
        ChartKind::ALL.to_vec()
    } else {
        args.charts.clone()
    };
    let charts: Vec<_> = kinds.iter().map(|&k| config_file.resolve(k)).collect();

    let options = RunOptions {
        data_dir: args.data_dir,
        out_dir: args.out_dir,
        format: args.format,
    };

    let outcomes = runtime::run_all(&charts, &options);
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    if failed == outcomes.len() {
        bail!("All {} chart(s) failed", failed);
    }

    Ok(())
}
