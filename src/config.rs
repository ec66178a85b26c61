// Per-chart defaults with optional JSON overrides

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::color::{default_palette, Color};
use crate::ChartKind;

/// Outer margins around the plot area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Margin {
    pub const fn new(top: u32, right: u32, bottom: u32, left: u32) -> Self {
        Margin { top, right, bottom, left }
    }
}

/// Canvas size plus margins. Builders work in plot-area coordinates
/// (origin at the top-left corner of the inner rectangle).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub margin: Margin,
}

impl Layout {
    pub fn inner_width(&self) -> f64 {
        self.width.saturating_sub(self.margin.left.saturating_add(self.margin.right)) as f64
    }

    pub fn inner_height(&self) -> f64 {
        self.height.saturating_sub(self.margin.top.saturating_add(self.margin.bottom)) as f64
    }

    /// Translation from plot-area coordinates to canvas coordinates
    pub fn origin(&self) -> (f64, f64) {
        (self.margin.left as f64, self.margin.top as f64)
    }
}

/// Which CSV columns feed a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Columns {
    /// Categorical column placed on the x axis
    pub category: String,
    /// Second categorical column (grouped bar chart only)
    #[serde(default)]
    pub subcategory: Option<String>,
    /// Numeric column placed on the y axis
    pub value: String,
}

/// Fully resolved configuration for one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    pub kind: ChartKind,
    /// Input file name, resolved against the data directory
    pub input: String,
    /// Output file stem, the extension comes from the output format
    pub output: String,
    pub layout: Layout,
    pub columns: Columns,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Band padding of the x scale
    pub padding: f64,
    /// Band padding of the inner (dodge) scale
    pub inner_padding: f64,
    /// Multiplier applied to the value maximum
    pub headroom: f64,
    pub palette: Vec<Color>,
    pub bar_opacity: f64,
    pub hover_opacity: f64,
}

impl ChartConfig {
    /// Built-in defaults for a chart kind
    pub fn defaults(kind: ChartKind) -> Self {
        match kind {
            ChartKind::Boxplot => ChartConfig {
                kind,
                input: "socialMedia.csv".to_string(),
                output: "boxplot".to_string(),
                layout: Layout { width: 800, height: 500, margin: Margin::new(40, 30, 70, 70) },
                columns: Columns {
                    category: "AgeGroup".to_string(),
                    subcategory: None,
                    value: "Likes".to_string(),
                },
                title: "Distribution of Likes by Age Group".to_string(),
                x_label: "Age Group".to_string(),
                y_label: "Number of Likes".to_string(),
                padding: 0.3,
                inner_padding: 0.0,
                headroom: 1.0,
                palette: default_palette(),
                bar_opacity: 1.0,
                hover_opacity: 1.0,
            },
            ChartKind::GroupedBar => ChartConfig {
                kind,
                input: "socialMediaAvg.csv".to_string(),
                output: "barplot".to_string(),
                layout: Layout { width: 900, height: 500, margin: Margin::new(40, 180, 70, 70) },
                columns: Columns {
                    category: "Platform".to_string(),
                    subcategory: Some("PostType".to_string()),
                    value: "AvgLikes".to_string(),
                },
                title: "Average Likes by Platform and Post Type".to_string(),
                x_label: "Platform".to_string(),
                y_label: "Average Number of Likes".to_string(),
                padding: 0.2,
                inner_padding: 0.05,
                headroom: 1.1,
                palette: default_palette(),
                bar_opacity: 0.8,
                hover_opacity: 1.0,
            },
            ChartKind::Line => ChartConfig {
                kind,
                input: "socialMediaTime.csv".to_string(),
                output: "lineplot".to_string(),
                layout: Layout { width: 900, height: 500, margin: Margin::new(40, 30, 100, 70) },
                columns: Columns {
                    category: "Date".to_string(),
                    subcategory: None,
                    value: "AvgLikes".to_string(),
                },
                title: "Average Likes Over Time".to_string(),
                x_label: "Date".to_string(),
                y_label: "Average Number of Likes".to_string(),
                padding: 0.1,
                inner_padding: 0.0,
                headroom: 1.1,
                palette: default_palette(),
                bar_opacity: 1.0,
                hover_opacity: 1.0,
            },
        }
    }

    fn apply(&mut self, o: &ChartOverrides) {
        if let Some(ref v) = o.input {
            self.input = v.clone();
        }
        if let Some(ref v) = o.output {
            self.output = v.clone();
        }
        if let Some(v) = o.width {
            self.layout.width = v;
        }
        if let Some(v) = o.height {
            self.layout.height = v;
        }
        if let Some(v) = o.margin {
            self.layout.margin = v;
        }
        if let Some(ref v) = o.columns {
            self.columns = v.clone();
        }
        if let Some(ref v) = o.title {
            self.title = v.clone();
        }
        if let Some(ref v) = o.x_label {
            self.x_label = v.clone();
        }
        if let Some(ref v) = o.y_label {
            self.y_label = v.clone();
        }
        if let Some(v) = o.padding {
            self.padding = v;
        }
        if let Some(v) = o.inner_padding {
            self.inner_padding = v;
        }
        if let Some(v) = o.headroom {
            self.headroom = v;
        }
        if let Some(ref v) = o.palette {
            if !v.is_empty() {
                self.palette = v.clone();
            }
        }
        if let Some(v) = o.bar_opacity {
            self.bar_opacity = v;
        }
        if let Some(v) = o.hover_opacity {
            self.hover_opacity = v;
        }
    }
}

/// Partial chart configuration as written in the JSON file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartOverrides {
    pub input: Option<String>,
    pub output: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub margin: Option<Margin>,
    pub columns: Option<Columns>,
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub padding: Option<f64>,
    pub inner_padding: Option<f64>,
    pub headroom: Option<f64>,
    pub palette: Option<Vec<Color>>,
    pub bar_opacity: Option<f64>,
    pub hover_opacity: Option<f64>,
}

/// Top-level JSON configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub boxplot: ChartOverrides,
    pub bar: ChartOverrides,
    pub line: ChartOverrides,
}

impl ConfigFile {
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).context("Invalid configuration JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config '{}'", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("In config '{}'", path.display()))
    }

    fn overrides(&self, kind: ChartKind) -> &ChartOverrides {
        match kind {
            ChartKind::Boxplot => &self.boxplot,
            ChartKind::GroupedBar => &self.bar,
            ChartKind::Line => &self.line,
        }
    }

    /// Defaults for `kind` with this file's overrides applied
    pub fn resolve(&self, kind: ChartKind) -> ChartConfig {
        let mut config = ChartConfig::defaults(kind);
        config.apply(self.overrides(kind));
        config
    }
}
