// Per-chart pipeline: load -> build -> paint -> write

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{error, info, info_span};

use crate::compiler::{build_boxplot, build_grouped_bar, build_line_chart};
use crate::config::ChartConfig;
use crate::csv_reader::{self, CsvData};
use crate::data;
use crate::graph;
use crate::ir::Scene;
use crate::{ChartKind, OutputFormat};

/// Where inputs come from and where outputs go
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub data_dir: PathBuf,
    pub out_dir: PathBuf,
    pub format: OutputFormat,
}

/// Result of one chart pipeline
#[derive(Debug)]
pub struct ChartOutcome {
    pub kind: ChartKind,
    pub result: Result<PathBuf>,
}

/// Turn a loaded table into a scene for `config.kind`
pub fn build_scene(csv: &CsvData, config: &ChartConfig) -> Result<Scene> {
    let scene = match config.kind {
        ChartKind::Boxplot => build_boxplot(&data::boxplot_rows(csv, &config.columns)?, config),
        ChartKind::GroupedBar => build_grouped_bar(&data::grouped_bar_rows(csv, &config.columns)?, config),
        ChartKind::Line => build_line_chart(&data::line_rows(csv, &config.columns)?, config),
    };
    Ok(scene)
}

/// Output path for a chart
pub fn output_path(config: &ChartConfig, options: &RunOptions) -> PathBuf {
    options
        .out_dir
        .join(format!("{}.{}", config.output, options.format.extension()))
}

/// Run one chart end to end and return the written file
pub fn run_chart(config: &ChartConfig, options: &RunOptions) -> Result<PathBuf> {
    let input = options.data_dir.join(&config.input);
    let csv = csv_reader::load_csv(&input)?;
    let scene = build_scene(&csv, config).with_context(|| format!("Failed to build {} chart", config.kind))?;
    let bytes = graph::render(&scene, options.format)
        .with_context(|| format!("Failed to render {} chart", config.kind))?;

    let out = output_path(config, options);
    write_output(&out, &bytes)?;
    Ok(out)
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create '{}'", parent.display()))?;
        }
    }
    std::fs::write(path, bytes).with_context(|| format!("Failed to write '{}'", path.display()))
}

/// Run every chart independently. A failing chart is logged and does not
/// stop the others.
pub fn run_all(charts: &[ChartConfig], options: &RunOptions) -> Vec<ChartOutcome> {
    charts
        .iter()
        .map(|config| {
            let _span = info_span!("chart", kind = %config.kind).entered();
            let result = run_chart(config, options);
            match &result {
                Ok(path) => info!(path = %path.display(), "chart written"),
                Err(err) => error!(error = format!("{:#}", err), "chart failed"),
            }
            ChartOutcome { kind: config.kind, result }
        })
        .collect()
}
