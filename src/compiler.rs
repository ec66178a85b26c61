use tracing::debug;

use crate::color::{Color, BOX_FILL, LINE_STROKE};
use crate::config::ChartConfig;
use crate::curve::natural_spline;
use crate::data::{finite_max, BoxplotRow, Dataset, GroupedBarRow, LineRow};
use crate::guides::{bottom_axis, left_axis, titles, BandAxisStyle};
use crate::ir::{
    svg_path_data, Baseline, DrawPrimitive, Interaction, RectStyle, Scene, StrokeStyle, TextAnchor,
    TextStyle,
};
use crate::scale::{BandScale, LinearScale, OrdinalScale};
use crate::stats::{summarize_by, FiveNumberSummary};

const Y_TICKS: usize = 10;
const LEGEND_OFFSET: f64 = 20.0;
const LEGEND_ROW: f64 = 25.0;
const LEGEND_SWATCH: f64 = 15.0;
const MARKER_RADIUS: f64 = 5.0;

fn empty_scene(config: &ChartConfig) -> Scene {
    Scene {
        kind: config.kind,
        width: config.layout.width,
        height: config.layout.height,
        origin: config.layout.origin(),
        guides: Vec::new(),
        marks: Vec::new(),
        legend: Vec::new(),
    }
}

// =============================================================================
// Boxplot
// =============================================================================

/// Computed geometry for a single box, expressed as primitive shapes
#[derive(Debug, Clone, PartialEq)]
pub struct BoxGeometry {
    pub whisker: DrawPrimitive,
    pub body: DrawPrimitive,
    pub median: DrawPrimitive,
}

/// Place one summary inside its band.
///
/// The whisker runs from the true minimum to the true maximum; there are no
/// outlier fences.
pub fn box_geometry(x: f64, bandwidth: f64, summary: &FiveNumberSummary, y: &LinearScale) -> BoxGeometry {
    let center = x + bandwidth / 2.0;
    let top = y.map(summary.q3);
    let bottom = y.map(summary.q1);
    let median = y.map(summary.median);

    BoxGeometry {
        whisker: DrawPrimitive::line(
            (center, y.map(summary.min)),
            (center, y.map(summary.max)),
            StrokeStyle::new(Color::BLACK, 1.5),
        ),
        body: DrawPrimitive::rect(
            x,
            top,
            bandwidth,
            bottom - top,
            RectStyle {
                fill: Some(BOX_FILL),
                stroke: Some(StrokeStyle::new(Color::BLACK, 1.5)),
                opacity: 1.0,
            },
        ),
        median: DrawPrimitive::line(
            (x, median),
            (x + bandwidth, median),
            StrokeStyle::new(Color::BLACK, 2.0),
        ),
    }
}

/// Whisker, box and median line for every summarized category, in z-order
pub fn boxplot_marks(
    summaries: &[(String, FiveNumberSummary)],
    x: &BandScale,
    y: &LinearScale,
) -> Vec<DrawPrimitive> {
    let mut marks = Vec::with_capacity(summaries.len() * 3);
    for (category, summary) in summaries {
        let Some(left) = x.position(category) else { continue };
        let geom = box_geometry(left, x.bandwidth(), summary, y);
        marks.push(geom.whisker);
        marks.push(geom.body);
        marks.push(geom.median);
    }
    marks
}

/// Side-by-side boxplot of `value` per `category`
pub fn build_boxplot(data: &Dataset<BoxplotRow>, config: &ChartConfig) -> Scene {
    let w = config.layout.inner_width();
    let h = config.layout.inner_height();

    let x = BandScale::from_values(data.iter().map(|r| r.category.as_str()), (0.0, w), config.padding);
    let y = LinearScale::zero_based(finite_max(data.iter().map(|r| r.value)), config.headroom, (h, 0.0));
    let summaries = summarize_by(data.rows(), |r| r.category.as_str(), |r| r.value);

    debug!(
        rows = data.len(),
        categories = x.len(),
        summarized = summaries.len(),
        "built boxplot"
    );

    let mut scene = empty_scene(config);
    scene.guides.extend(bottom_axis(&x, w, h, BandAxisStyle::default()));
    scene.guides.extend(left_axis(&y, Y_TICKS));
    scene.guides.extend(titles(config, 50.0));
    scene.marks = boxplot_marks(&summaries, &x, &y);
    scene
}

// =============================================================================
// Grouped bar chart
// =============================================================================

/// Scales shared by the grouped bar marks and legend
#[derive(Debug, Clone)]
pub struct GroupedScales {
    pub outer: BandScale,
    pub inner: BandScale,
    pub y: LinearScale,
    pub color: OrdinalScale,
}

impl GroupedScales {
    pub fn new(data: &Dataset<GroupedBarRow>, config: &ChartConfig) -> Self {
        let w = config.layout.inner_width();
        let h = config.layout.inner_height();
        let outer = BandScale::from_values(data.iter().map(|r| r.outer.as_str()), (0.0, w), config.padding);
        let inner = BandScale::from_values(
            data.iter().map(|r| r.inner.as_str()),
            (0.0, outer.bandwidth()),
            config.inner_padding,
        );
        let y = LinearScale::zero_based(finite_max(data.iter().map(|r| r.value)), config.headroom, (h, 0.0));
        let color = OrdinalScale::new(inner.domain().to_vec(), config.palette.clone());
        GroupedScales { outer, inner, y, color }
    }
}

/// One rectangle per row, dodged inside its outer band
pub fn grouped_bar_marks(
    data: &Dataset<GroupedBarRow>,
    scales: &GroupedScales,
    baseline: f64,
    config: &ChartConfig,
) -> Vec<DrawPrimitive> {
    let mut marks = Vec::with_capacity(data.len());
    for row in data {
        if !row.value.is_finite() {
            continue;
        }
        let (Some(outer_x), Some(inner_x)) = (scales.outer.position(&row.outer), scales.inner.position(&row.inner))
        else {
            continue;
        };
        let Some(fill) = scales.color.color(&row.inner) else { continue };

        let top = scales.y.map(row.value);
        // Negative values hang below the baseline instead of getting a negative height
        let (y, height) = if top <= baseline { (top, baseline - top) } else { (baseline, top - baseline) };

        marks.push(DrawPrimitive::Rect {
            x: outer_x + inner_x,
            y,
            width: scales.inner.bandwidth(),
            height,
            style: RectStyle { fill: Some(fill), stroke: None, opacity: config.bar_opacity },
            interaction: Some(Interaction { hover_opacity: config.hover_opacity }),
        });
    }
    marks
}

/// Colour swatch and label per inner category, stacked vertically at `x`
pub fn legend_marks(color: &OrdinalScale, x: f64) -> Vec<DrawPrimitive> {
    let label_style = TextStyle::new(12.0)
        .anchor(TextAnchor::Start)
        .baseline(Baseline::Middle);

    let mut out = Vec::with_capacity(color.domain().len() * 2);
    for (i, category) in color.domain().iter().enumerate() {
        let Some(fill) = color.color(category) else { continue };
        let y = i as f64 * LEGEND_ROW;
        out.push(DrawPrimitive::rect(x, y, LEGEND_SWATCH, LEGEND_SWATCH, RectStyle::filled(fill)));
        out.push(DrawPrimitive::text((x + 20.0, y + 12.0), category.clone(), label_style));
    }
    out
}

/// Bars of `value` per outer category, dodged by inner category
pub fn build_grouped_bar(data: &Dataset<GroupedBarRow>, config: &ChartConfig) -> Scene {
    let w = config.layout.inner_width();
    let h = config.layout.inner_height();
    let scales = GroupedScales::new(data, config);

    let mut scene = empty_scene(config);
    scene.guides.extend(bottom_axis(&scales.outer, w, h, BandAxisStyle::default()));
    scene.guides.extend(left_axis(&scales.y, Y_TICKS));
    scene.guides.extend(titles(config, 50.0));
    scene.marks = grouped_bar_marks(data, &scales, h, config);
    scene.legend = legend_marks(&scales.color, w + LEGEND_OFFSET);

    debug!(
        rows = data.len(),
        outer = scales.outer.len(),
        inner = scales.inner.len(),
        bars = scene.marks.len(),
        "built grouped bar chart"
    );
    scene
}

// =============================================================================
// Line chart
// =============================================================================

/// Smoothed path through the band centres plus one marker per point
pub fn line_marks(data: &Dataset<LineRow>, x: &BandScale, y: &LinearScale) -> Vec<DrawPrimitive> {
    let points: Vec<(f64, f64)> = data
        .iter()
        .filter(|r| r.value.is_finite())
        .filter_map(|r| Some((x.center(&r.x)?, y.map(r.value))))
        .collect();

    let mut marks = Vec::with_capacity(points.len() + 1);
    let segments = natural_spline(&points);
    if !segments.is_empty() {
        debug!(d = %svg_path_data(&segments), "line path");
        marks.push(DrawPrimitive::Path { segments, style: StrokeStyle::new(LINE_STROKE, 3.0) });
    }
    marks.extend(points.into_iter().map(|center| DrawPrimitive::Circle {
        center,
        radius: MARKER_RADIUS,
        fill: LINE_STROKE,
    }));
    marks
}

/// Natural-spline line chart of `value` over the ordered x categories
pub fn build_line_chart(data: &Dataset<LineRow>, config: &ChartConfig) -> Scene {
    let w = config.layout.inner_width();
    let h = config.layout.inner_height();
    let x = BandScale::from_values(data.iter().map(|r| r.x.as_str()), (0.0, w), config.padding);
    let y = LinearScale::zero_based(finite_max(data.iter().map(|r| r.value)), config.headroom, (h, 0.0));

    let mut scene = empty_scene(config);
    scene.guides.extend(bottom_axis(&x, w, h, BandAxisStyle { font_size: 10.0, rotation: -45.0 }));
    scene.guides.extend(left_axis(&y, Y_TICKS));
    scene.guides.extend(titles(config, 80.0));
    scene.marks = line_marks(data, &x, &y);

    debug!(rows = data.len(), points = x.len(), "built line chart");
    scene
}
