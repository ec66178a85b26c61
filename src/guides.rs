// Axes and titles as ordinary draw primitives

use crate::color::Color;
use crate::config::ChartConfig;
use crate::ir::{Baseline, DrawPrimitive, StrokeStyle, TextAnchor, TextStyle};
use crate::scale::{BandScale, LinearScale};

const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;
const AXIS_STROKE: f64 = 1.0;

/// Tick labels on the category axis
#[derive(Debug, Clone, Copy)]
pub struct BandAxisStyle {
    pub font_size: f64,
    /// Clockwise label rotation in degrees; rotated labels are end-anchored
    pub rotation: f64,
}

impl Default for BandAxisStyle {
    fn default() -> Self {
        BandAxisStyle { font_size: 12.0, rotation: 0.0 }
    }
}

/// Format a tick value the way axis labels read: integers with thousands
/// separators, fractions with no trailing zeros.
pub fn format_tick(value: f64) -> String {
    if value == value.trunc() && value.abs() < 1e15 {
        let n = value as i64;
        let digits = n.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        if n < 0 {
            format!("-{}", grouped)
        } else {
            grouped
        }
    } else {
        let s = format!("{:.6}", value);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Horizontal category axis along `y = baseline`
pub fn bottom_axis(scale: &BandScale, width: f64, baseline: f64, style: BandAxisStyle) -> Vec<DrawPrimitive> {
    let stroke = StrokeStyle::new(Color::BLACK, AXIS_STROKE);
    let mut out = vec![DrawPrimitive::line((0.0, baseline), (width, baseline), stroke)];

    let label_style = if style.rotation == 0.0 {
        TextStyle::new(style.font_size).baseline(Baseline::Top)
    } else {
        TextStyle::new(style.font_size)
            .anchor(TextAnchor::End)
            .baseline(Baseline::Middle)
            .rotated(style.rotation)
    };

    for category in scale.domain() {
        let Some(x) = scale.center(category) else { continue };
        out.push(DrawPrimitive::line((x, baseline), (x, baseline + TICK_SIZE), stroke));
        out.push(DrawPrimitive::text(
            (x, baseline + TICK_SIZE + TICK_PADDING),
            category.clone(),
            label_style,
        ));
    }
    out
}

/// Vertical value axis along `x = 0`
pub fn left_axis(scale: &LinearScale, tick_count: usize) -> Vec<DrawPrimitive> {
    let stroke = StrokeStyle::new(Color::BLACK, AXIS_STROKE);
    let (r0, r1) = scale.range();
    let mut out = vec![DrawPrimitive::line((0.0, r0), (0.0, r1), stroke)];

    let label_style = TextStyle::new(10.0)
        .anchor(TextAnchor::End)
        .baseline(Baseline::Middle);

    for value in scale.ticks(tick_count) {
        let y = scale.map(value);
        out.push(DrawPrimitive::line((-TICK_SIZE, y), (0.0, y), stroke));
        out.push(DrawPrimitive::text(
            (-(TICK_SIZE + TICK_PADDING), y),
            format_tick(value),
            label_style,
        ));
    }
    out
}

/// Chart title plus both axis titles. `x_title_gap` is the distance of the
/// x-axis title below the plot area.
pub fn titles(config: &ChartConfig, x_title_gap: f64) -> Vec<DrawPrimitive> {
    let w = config.layout.inner_width();
    let h = config.layout.inner_height();
    vec![
        DrawPrimitive::text((w / 2.0, -10.0), config.title.clone(), TextStyle::new(16.0).bold()),
        DrawPrimitive::text((w / 2.0, h + x_title_gap), config.x_label.clone(), TextStyle::new(14.0)),
        DrawPrimitive::text(
            (-50.0, h / 2.0),
            config.y_label.clone(),
            TextStyle::new(14.0).rotated(-90.0),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChartKind;

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(0.0), "0");
        assert_eq!(format_tick(250.0), "250");
        assert_eq!(format_tick(1000.0), "1,000");
        assert_eq!(format_tick(-1234567.0), "-1,234,567");
        assert_eq!(format_tick(0.2), "0.2");
        assert_eq!(format_tick(2.5), "2.5");
    }

    #[test]
    fn test_bottom_axis_ticks_at_band_centres() {
        let scale = BandScale::new(vec!["a".into(), "b".into()], (0.0, 200.0), 0.0);
        let prims = bottom_axis(&scale, 200.0, 300.0, BandAxisStyle::default());
        // domain line + (tick, label) per category
        assert_eq!(prims.len(), 5);
        assert_eq!(prims[1], DrawPrimitive::line((50.0, 300.0), (50.0, 306.0), StrokeStyle::new(Color::BLACK, 1.0)));
        let DrawPrimitive::Text { content, .. } = &prims[4] else { panic!("expected label") };
        assert_eq!(content, "b");
    }

    #[test]
    fn test_left_axis_labels() {
        let scale = LinearScale::new((0.0, 100.0), (400.0, 0.0));
        let prims = left_axis(&scale, 5);
        let labels: Vec<&str> = prims
            .iter()
            .filter_map(|p| match p {
                DrawPrimitive::Text { content, .. } => Some(content.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec!["0", "20", "40", "60", "80", "100"]);
    }

    #[test]
    fn test_titles_positions() {
        let config = ChartConfig::defaults(ChartKind::Boxplot);
        let prims = titles(&config, 50.0);
        let DrawPrimitive::Text { position, style, .. } = &prims[0] else { panic!() };
        assert_eq!(*position, (350.0, -10.0));
        assert!(style.bold);
        let DrawPrimitive::Text { style, .. } = &prims[2] else { panic!() };
        assert_eq!(style.rotation, -90.0);
    }
}
