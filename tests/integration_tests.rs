use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use approx::assert_relative_eq;
use socialplot::config::{ChartConfig, ConfigFile};
use socialplot::csv_reader::load_csv;
use socialplot::ir::{DrawPrimitive, Scene};
use socialplot::runtime::{build_scene, run_all, RunOptions};
use socialplot::{graph, ChartKind, OutputFormat};

fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("test")
}

fn fixture_scene(kind: ChartKind) -> Scene {
    let config = ChartConfig::defaults(kind);
    let csv = load_csv(&fixture_dir().join(&config.input)).expect("Failed to read fixture CSV");
    build_scene(&csv, &config).expect("Failed to build scene")
}

/// Run the socialplot binary with the given arguments
fn run_socialplot(args: &[&str]) -> Result<String, String> {
    let output = Command::new(env!("CARGO_BIN_EXE_socialplot"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .map_err(|e| format!("Failed to spawn process: {}", e))?;

    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    if output.status.success() {
        Ok(stderr)
    } else {
        Err(stderr)
    }
}

/// Check if bytes are a valid PNG
fn is_valid_png(bytes: &[u8]) -> bool {
    bytes.len() > 8 && bytes[0..8] == [137, 80, 78, 71, 13, 10, 26, 10]
}

fn rects(primitives: &[DrawPrimitive]) -> Vec<&DrawPrimitive> {
    primitives.iter().filter(|p| p.is_rect()).collect()
}

fn texts(primitives: &[DrawPrimitive]) -> Vec<&str> {
    primitives
        .iter()
        .filter_map(|p| match p {
            DrawPrimitive::Text { content, .. } => Some(content.as_str()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_boxplot_from_fixture() {
    let scene = fixture_scene(ChartKind::Boxplot);
    assert_eq!((scene.width, scene.height), (800, 500));
    assert_eq!(scene.origin, (70.0, 40.0));

    // Whisker, box, median per age group
    assert_eq!(scene.marks.len(), 9);
    assert_eq!(rects(&scene.marks).len(), 3);

    let labels = texts(&scene.guides);
    for group in ["18-24", "25-34", "35-44"] {
        assert!(labels.contains(&group), "missing axis label {}", group);
    }
    assert!(labels.contains(&"Distribution of Likes by Age Group"));
}

#[test]
fn test_boxplot_whisker_spans_full_height_at_max() {
    let scene = fixture_scene(ChartKind::Boxplot);
    // 18-24 holds the overall maximum (210); with no headroom it maps to y = 0
    match &scene.marks[0] {
        DrawPrimitive::Line { from, to, .. } => {
            assert_relative_eq!(from.0, to.0);
            assert_relative_eq!(from.1.min(to.1), 0.0, epsilon = 1e-9);
        }
        other => panic!("expected whisker line, got {:?}", other),
    }
}

#[test]
fn test_grouped_bar_from_fixture() {
    let scene = fixture_scene(ChartKind::GroupedBar);
    let bars = rects(&scene.marks);
    assert_eq!(bars.len(), 9);

    for bar in &bars {
        if let DrawPrimitive::Rect { height, style, interaction, .. } = bar {
            assert!(*height >= 0.0);
            assert_relative_eq!(style.opacity, 0.8);
            assert!(interaction.is_some());
        }
    }

    // Swatch and label per post type, first-seen order
    assert_eq!(scene.legend.len(), 6);
    assert_eq!(texts(&scene.legend), vec!["Image", "Link", "Video"]);
}

#[test]
fn test_line_chart_from_fixture() {
    let scene = fixture_scene(ChartKind::Line);
    let paths = scene
        .marks
        .iter()
        .filter(|p| matches!(p, DrawPrimitive::Path { .. }))
        .count();
    let circles = scene
        .marks
        .iter()
        .filter(|p| matches!(p, DrawPrimitive::Circle { .. }))
        .count();
    assert_eq!(paths, 1);
    assert_eq!(circles, 7);
}

#[test]
fn test_config_override_changes_title_only() {
    let file = ConfigFile::from_json_str(r#"{"line": {"title": "Likes per Day"}}"#).unwrap();
    let config = file.resolve(ChartKind::Line);
    let csv = load_csv(&fixture_dir().join(&config.input)).unwrap();
    let scene = build_scene(&csv, &config).unwrap();

    assert!(texts(&scene.guides).contains(&"Likes per Day"));
    assert_eq!(config.layout, ChartConfig::defaults(ChartKind::Line).layout);
}

#[test]
fn test_render_formats() {
    let scene = fixture_scene(ChartKind::GroupedBar);

    let svg = String::from_utf8(graph::render(&scene, OutputFormat::Svg).unwrap()).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("Average Likes by Platform and Post Type"));

    let json = graph::render(&scene, OutputFormat::Json).unwrap();
    let v: serde_json::Value = serde_json::from_slice(&json).unwrap();
    assert_eq!(v["kind"], "bar");
    assert_eq!(v["legend"].as_array().unwrap().len(), 6);
}

#[test]
fn test_render_png_without_text() {
    let mut scene = fixture_scene(ChartKind::Boxplot);
    // Text needs system fonts on the bitmap backend
    scene.guides.retain(|p| !matches!(p, DrawPrimitive::Text { .. }));
    let png = graph::render(&scene, OutputFormat::Png).unwrap();
    assert!(is_valid_png(&png), "Output is not a valid PNG");
}

#[test]
fn test_run_all_writes_every_chart() {
    let out = tempfile::tempdir().unwrap();
    let options = RunOptions {
        data_dir: fixture_dir(),
        out_dir: out.path().to_path_buf(),
        format: OutputFormat::Svg,
    };
    let charts: Vec<_> = ChartKind::ALL.iter().map(|&k| ChartConfig::defaults(k)).collect();
    let outcomes = run_all(&charts, &options);

    assert!(outcomes.iter().all(|o| o.result.is_ok()));
    for name in ["boxplot.svg", "barplot.svg", "lineplot.svg"] {
        assert!(out.path().join(name).exists(), "{} not written", name);
    }
}

#[test]
fn test_end_to_end_binary_writes_three_svgs() {
    let out = tempfile::tempdir().unwrap();
    let data_dir = fixture_dir();
    let result = run_socialplot(&[
        "--data-dir",
        data_dir.to_str().unwrap(),
        "--out-dir",
        out.path().to_str().unwrap(),
    ]);
    assert!(result.is_ok(), "Failed: {:?}", result.err());

    for name in ["boxplot.svg", "barplot.svg", "lineplot.svg"] {
        let svg = fs::read_to_string(out.path().join(name)).unwrap();
        assert!(svg.contains("<svg"));
    }
}

#[test]
fn test_end_to_end_single_chart_json() {
    let out = tempfile::tempdir().unwrap();
    let data_dir = fixture_dir();
    let result = run_socialplot(&[
        "--data-dir",
        data_dir.to_str().unwrap(),
        "--out-dir",
        out.path().to_str().unwrap(),
        "--format",
        "json",
        "--chart",
        "line",
    ]);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(out.path().join("lineplot.json").exists());
    assert!(!out.path().join("boxplot.json").exists());
}

#[test]
fn test_end_to_end_partial_failure_still_succeeds() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    fs::copy(fixture_dir().join("socialMediaTime.csv"), data.path().join("socialMediaTime.csv")).unwrap();

    let result = run_socialplot(&[
        "--data-dir",
        data.path().to_str().unwrap(),
        "--out-dir",
        out.path().to_str().unwrap(),
    ]);
    let stderr = result.expect("one chart succeeding should exit cleanly");
    assert!(stderr.contains("chart failed"));
    assert!(out.path().join("lineplot.svg").exists());
}

#[test]
fn test_end_to_end_all_failures_exit_nonzero() {
    let empty = tempfile::tempdir().unwrap();
    let result = run_socialplot(&[
        "--data-dir",
        empty.path().to_str().unwrap(),
        "--out-dir",
        empty.path().to_str().unwrap(),
    ]);
    assert!(result.is_err());
}

#[test]
fn test_bad_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, r#"{"pie": {}}"#).unwrap();

    let result = run_socialplot(&["--config", config.to_str().unwrap(), "--data-dir", dir.path().to_str().unwrap()]);
    let err = result.unwrap_err();
    assert!(err.contains("config"));
}
