use serde::Serialize;

use crate::color::Color;
use crate::ChartKind;

// =============================================================================
// Styles
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f64,
}

impl StrokeStyle {
    pub fn new(color: Color, width: f64) -> Self {
        StrokeStyle { color, width }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RectStyle {
    pub fill: Option<Color>,
    pub stroke: Option<StrokeStyle>,
    /// Baseline opacity in `[0, 1]`
    pub opacity: f64,
}

impl RectStyle {
    pub fn filled(fill: Color) -> Self {
        RectStyle { fill: Some(fill), stroke: None, opacity: 1.0 }
    }
}

/// Hover feedback for interactive renderers. Static renderers ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Interaction {
    pub hover_opacity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Baseline {
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextStyle {
    pub size: f64,
    pub color: Color,
    pub anchor: TextAnchor,
    pub baseline: Baseline,
    pub bold: bool,
    /// Rotation in degrees, clockwise
    pub rotation: f64,
}

impl TextStyle {
    pub fn new(size: f64) -> Self {
        TextStyle {
            size,
            color: Color::BLACK,
            anchor: TextAnchor::Middle,
            baseline: Baseline::Bottom,
            bold: false,
            rotation: 0.0,
        }
    }

    pub fn anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn baseline(mut self, baseline: Baseline) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn rotated(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }
}

// =============================================================================
// Primitives
// =============================================================================

/// One piece of a path outline, in plot-area pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathSegment {
    MoveTo((f64, f64)),
    LineTo((f64, f64)),
    CubicTo {
        c1: (f64, f64),
        c2: (f64, f64),
        to: (f64, f64),
    },
}

impl PathSegment {
    /// The on-curve point this segment ends at
    pub fn end(&self) -> (f64, f64) {
        match *self {
            PathSegment::MoveTo(p) | PathSegment::LineTo(p) => p,
            PathSegment::CubicTo { to, .. } => to,
        }
    }
}

/// Render an outline as SVG path data (`M x,y C ...`)
pub fn svg_path_data(segments: &[PathSegment]) -> String {
    let mut d = String::new();
    for seg in segments {
        if !d.is_empty() {
            d.push(' ');
        }
        match *seg {
            PathSegment::MoveTo((x, y)) => d.push_str(&format!("M{},{}", x, y)),
            PathSegment::LineTo((x, y)) => d.push_str(&format!("L{},{}", x, y)),
            PathSegment::CubicTo { c1, c2, to } => d.push_str(&format!(
                "C{},{},{},{},{},{}",
                c1.0, c1.1, c2.0, c2.1, to.0, to.1
            )),
        }
    }
    d
}

/// A resolved shape. Coordinates are plot-area pixels (y grows downward).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DrawPrimitive {
    Line {
        from: (f64, f64),
        to: (f64, f64),
        style: StrokeStyle,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        style: RectStyle,
        #[serde(skip_serializing_if = "Option::is_none")]
        interaction: Option<Interaction>,
    },
    Circle {
        center: (f64, f64),
        radius: f64,
        fill: Color,
    },
    Path {
        segments: Vec<PathSegment>,
        style: StrokeStyle,
    },
    Text {
        position: (f64, f64),
        content: String,
        style: TextStyle,
    },
}

impl DrawPrimitive {
    pub fn line(from: (f64, f64), to: (f64, f64), style: StrokeStyle) -> Self {
        DrawPrimitive::Line { from, to, style }
    }

    pub fn rect(x: f64, y: f64, width: f64, height: f64, style: RectStyle) -> Self {
        DrawPrimitive::Rect { x, y, width, height, style, interaction: None }
    }

    pub fn text(position: (f64, f64), content: impl Into<String>, style: TextStyle) -> Self {
        DrawPrimitive::Text { position, content: content.into(), style }
    }

    pub fn is_rect(&self) -> bool {
        matches!(self, DrawPrimitive::Rect { .. })
    }
}

// =============================================================================
// Scene
// =============================================================================

/// Everything a renderer needs to paint one chart.
///
/// Layers are painted in order: guides, marks, legend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub kind: ChartKind,
    pub width: u32,
    pub height: u32,
    /// Canvas position of the plot-area origin
    pub origin: (f64, f64),
    /// Axes and titles
    pub guides: Vec<DrawPrimitive>,
    /// Data-driven shapes
    pub marks: Vec<DrawPrimitive>,
    pub legend: Vec<DrawPrimitive>,
}

impl Scene {
    pub fn primitives(&self) -> impl Iterator<Item = &DrawPrimitive> {
        self.guides.iter().chain(&self.marks).chain(&self.legend)
    }
}
