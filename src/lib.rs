// Library exports for socialplot

pub mod color;
pub mod compiler;
pub mod config;
pub mod csv_reader;
pub mod curve;
pub mod data;
pub mod graph;
pub mod guides;
pub mod ir;
pub mod runtime;
pub mod scale;
pub mod stats;
pub mod telemetry;

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three charts this crate knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Side-by-side boxplot
    Boxplot,
    /// Grouped (dodged) bar chart
    #[serde(rename = "bar")]
    #[value(name = "bar")]
    GroupedBar,
    /// Natural-spline line chart
    Line,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Boxplot, ChartKind::GroupedBar, ChartKind::Line];
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChartKind::Boxplot => "boxplot",
            ChartKind::GroupedBar => "bar",
            ChartKind::Line => "line",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[serde(rename = "svg")]
    #[default]
    Svg,
    #[serde(rename = "png")]
    Png,
    /// The scene itself, for an external renderer
    #[serde(rename = "json")]
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
            OutputFormat::Json => "json",
        }
    }
}
