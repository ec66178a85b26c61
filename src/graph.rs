// Scene painter: plotters SVG/bitmap backends, or the scene as JSON

use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontStyle, FontTransform};

use crate::curve::flatten;
use crate::ir::{Baseline, DrawPrimitive, RectStyle, Scene, TextAnchor, TextStyle as PrimitiveTextStyle};
use crate::OutputFormat;

/// Straight segments used to approximate each cubic of a path
const CURVE_STEPS: usize = 24;
const FONT_FAMILY: &str = "sans-serif";

/// Render a scene into the bytes of the requested format
pub fn render(scene: &Scene, format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Svg => render_svg(scene).map(String::into_bytes),
        OutputFormat::Png => render_png(scene),
        OutputFormat::Json => serde_json::to_vec_pretty(scene).context("Failed to serialize scene"),
    }
}

/// Paint a scene as an SVG document
pub fn render_svg(scene: &Scene) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (scene.width, scene.height)).into_drawing_area();
        paint(&root, scene)?;
        root.present().context("Failed to present drawing")?;
    }
    Ok(svg)
}

/// Paint a scene into an RGB buffer and encode it as PNG
pub fn render_png(scene: &Scene) -> Result<Vec<u8>> {
    let mut buffer = vec![0u8; (scene.width as usize) * (scene.height as usize) * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (scene.width, scene.height)).into_drawing_area();
        paint(&root, scene)?;
        root.present().context("Failed to present drawing")?;
    }

    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(&buffer, scene.width, scene.height, image::ColorType::Rgb8)
            .context("Failed to encode PNG")?;
    }
    Ok(png_bytes)
}

fn paint<DB>(root: &DrawingArea<DB, Shift>, scene: &Scene) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).context("Failed to fill background")?;
    let origin = scene.origin;
    for primitive in scene.primitives() {
        paint_primitive(root, origin, primitive)?;
    }
    Ok(())
}

fn px(origin: (f64, f64), p: (f64, f64)) -> (i32, i32) {
    ((origin.0 + p.0).round() as i32, (origin.1 + p.1).round() as i32)
}

fn stroke_px(width: f64) -> u32 {
    width.round().max(1.0) as u32
}

fn paint_primitive<DB>(root: &DrawingArea<DB, Shift>, origin: (f64, f64), primitive: &DrawPrimitive) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    match primitive {
        DrawPrimitive::Line { from, to, style } => {
            let color = RGBColor::from(style.color);
            root.draw(&PathElement::new(
                vec![px(origin, *from), px(origin, *to)],
                color.stroke_width(stroke_px(style.width)),
            ))
            .context("Failed to draw line")?;
        }
        DrawPrimitive::Rect { x, y, width, height, style, .. } => {
            paint_rect(root, origin, (*x, *y, *width, *height), style)?;
        }
        DrawPrimitive::Circle { center, radius, fill } => {
            let color = RGBColor::from(*fill);
            root.draw(&Circle::new(px(origin, *center), radius.round() as i32, color.filled()))
                .context("Failed to draw circle")?;
        }
        DrawPrimitive::Path { segments, style } => {
            let points: Vec<(i32, i32)> = flatten(segments, CURVE_STEPS)
                .into_iter()
                .map(|p| px(origin, p))
                .collect();
            // A lone MoveTo has nothing to stroke
            if points.len() > 1 {
                let color = RGBColor::from(style.color);
                root.draw(&PathElement::new(points, color.stroke_width(stroke_px(style.width))))
                    .context("Failed to draw path")?;
            }
        }
        DrawPrimitive::Text { position, content, style } => {
            if !content.is_empty() {
                root.draw(&Text::new(content.clone(), px(origin, *position), text_style(style)))
                    .context("Failed to draw text")?;
            }
        }
    }
    Ok(())
}

fn paint_rect<DB>(
    root: &DrawingArea<DB, Shift>,
    origin: (f64, f64),
    (x, y, w, h): (f64, f64, f64, f64),
    style: &RectStyle,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let corners = [px(origin, (x, y)), px(origin, (x + w, y + h))];
    let opacity = style.opacity.clamp(0.0, 1.0);

    if let Some(fill) = style.fill {
        let color = RGBColor::from(fill).mix(opacity);
        root.draw(&Rectangle::new(corners, color.filled()))
            .context("Failed to draw rect")?;
    }
    if let Some(stroke) = style.stroke {
        let color = RGBColor::from(stroke.color).mix(opacity);
        root.draw(&Rectangle::new(corners, color.stroke_width(stroke_px(stroke.width))))
            .context("Failed to draw rect outline")?;
    }
    Ok(())
}

/// Snap a rotation to the quarter turns the backends support.
/// Ties go toward no rotation.
fn font_transform(degrees: f64) -> FontTransform {
    let quarter = (degrees / 90.0).abs();
    let turns = (if quarter.fract() == 0.5 { quarter.floor() } else { quarter.round() }) as i64;
    let turns = if degrees < 0.0 { (4 - turns % 4) % 4 } else { turns % 4 };
    match turns {
        1 => FontTransform::Rotate90,
        2 => FontTransform::Rotate180,
        3 => FontTransform::Rotate270,
        _ => FontTransform::None,
    }
}

fn text_style(style: &PrimitiveTextStyle) -> TextStyle<'static> {
    let font = (FONT_FAMILY, style.size)
        .into_font()
        .style(if style.bold { FontStyle::Bold } else { FontStyle::Normal })
        .transform(font_transform(style.rotation));

    let h_pos = match style.anchor {
        TextAnchor::Start => HPos::Left,
        TextAnchor::Middle => HPos::Center,
        TextAnchor::End => HPos::Right,
    };
    let v_pos = match style.baseline {
        Baseline::Top => VPos::Top,
        Baseline::Middle => VPos::Center,
        Baseline::Bottom => VPos::Bottom,
    };

    font.color(&RGBColor::from(style.color)).pos(Pos::new(h_pos, v_pos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::ir::{PathSegment, StrokeStyle};
    use crate::ChartKind;

    fn make_scene(marks: Vec<DrawPrimitive>) -> Scene {
        Scene {
            kind: ChartKind::Line,
            width: 200,
            height: 100,
            origin: (10.0, 10.0),
            guides: vec![],
            marks,
            legend: vec![],
        }
    }

    #[test]
    fn test_font_transform_snapping() {
        assert!(matches!(font_transform(0.0), FontTransform::None));
        assert!(matches!(font_transform(-45.0), FontTransform::None));
        assert!(matches!(font_transform(-90.0), FontTransform::Rotate270));
        assert!(matches!(font_transform(90.0), FontTransform::Rotate90));
        assert!(matches!(font_transform(180.0), FontTransform::Rotate180));
    }

    #[test]
    fn test_render_svg_contains_shapes() {
        let scene = make_scene(vec![
            DrawPrimitive::rect(0.0, 0.0, 50.0, 20.0, RectStyle::filled(Color::rgb(0x1f, 0x77, 0xb4))),
            DrawPrimitive::Circle { center: (30.0, 30.0), radius: 5.0, fill: Color::BLACK },
            DrawPrimitive::Path {
                segments: crate::curve::natural_spline(&[(0.0, 0.0), (20.0, 40.0), (40.0, 10.0)]),
                style: StrokeStyle::new(Color::rgb(0xe7, 0x4c, 0x3c), 3.0),
            },
        ]);
        let svg = render_svg(&scene).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("<rect"));
        assert!(svg.contains("<circle"));
        assert!(svg.contains("<polyline"));
        assert!(svg.to_uppercase().contains("#1F77B4"));
    }

    #[test]
    fn test_single_point_path_is_skipped() {
        let scene = make_scene(vec![DrawPrimitive::Path {
            segments: vec![PathSegment::MoveTo((5.0, 5.0))],
            style: StrokeStyle::new(Color::BLACK, 1.0),
        }]);
        let svg = render_svg(&scene).unwrap();
        assert!(!svg.contains("<polyline"));
    }

    #[test]
    fn test_render_json() {
        let scene = make_scene(vec![DrawPrimitive::Circle { center: (1.0, 2.0), radius: 5.0, fill: Color::BLACK }]);
        let bytes = render(&scene, OutputFormat::Json).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(v["kind"], "line");
        assert_eq!(v["marks"][0]["type"], "circle");
        assert_eq!(v["origin"][0], 10.0);
    }
}
