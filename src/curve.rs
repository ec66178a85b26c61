// Natural cubic spline through every point, emitted as Bezier segments

use crate::ir::PathSegment;

/// Bézier control points `(c1, c2)` for each of the `n - 1` segments of a
/// natural spline through `knots`. Requires at least 3 knots.
fn control_points(knots: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = knots.len() - 1;
    let mut a = vec![0.0; n];
    let mut b = vec![0.0; n];
    let mut r = vec![0.0; n];

    // Tridiagonal system for the first control point of every segment
    a[0] = 0.0;
    b[0] = 2.0;
    r[0] = knots[0] + 2.0 * knots[1];
    for i in 1..n - 1 {
        a[i] = 1.0;
        b[i] = 4.0;
        r[i] = 4.0 * knots[i] + 2.0 * knots[i + 1];
    }
    a[n - 1] = 2.0;
    b[n - 1] = 7.0;
    r[n - 1] = 8.0 * knots[n - 1] + knots[n];

    // Thomas algorithm: forward sweep, back substitution
    for i in 1..n {
        let m = a[i] / b[i - 1];
        b[i] -= m;
        r[i] -= m * r[i - 1];
    }
    a[n - 1] = r[n - 1] / b[n - 1];
    for i in (0..n - 1).rev() {
        a[i] = (r[i] - a[i + 1]) / b[i];
    }

    b[n - 1] = (knots[n] + a[n - 1]) / 2.0;
    for i in 0..n - 1 {
        b[i] = 2.0 * knots[i + 1] - a[i + 1];
    }

    (a, b)
}

/// Path segments of a natural cubic spline through `points`.
///
/// * no points: empty path
/// * one point: a lone `MoveTo` (nothing visible)
/// * two points: a straight `LineTo`
pub fn natural_spline(points: &[(f64, f64)]) -> Vec<PathSegment> {
    let Some(&first) = points.first() else {
        return Vec::new();
    };

    let mut segments = vec![PathSegment::MoveTo(first)];
    match points.len() {
        1 => {}
        2 => segments.push(PathSegment::LineTo(points[1])),
        _ => {
            let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
            let ys: Vec<f64> = points.iter().map(|p| p.1).collect();
            let (x1, x2) = control_points(&xs);
            let (y1, y2) = control_points(&ys);
            for i in 0..points.len() - 1 {
                segments.push(PathSegment::CubicTo {
                    c1: (x1[i], y1[i]),
                    c2: (x2[i], y2[i]),
                    to: points[i + 1],
                });
            }
        }
    }
    segments
}

/// Evaluate a cubic Bézier at parameter `t`
pub fn cubic_point(from: (f64, f64), c1: (f64, f64), c2: (f64, f64), to: (f64, f64), t: f64) -> (f64, f64) {
    let u = 1.0 - t;
    let w0 = u * u * u;
    let w1 = 3.0 * u * u * t;
    let w2 = 3.0 * u * t * t;
    let w3 = t * t * t;
    (
        w0 * from.0 + w1 * c1.0 + w2 * c2.0 + w3 * to.0,
        w0 * from.1 + w1 * c1.1 + w2 * c2.1 + w3 * to.1,
    )
}

/// Approximate a path with straight segments, `steps` per cubic.
/// Every on-curve point of the input is kept exactly.
pub fn flatten(segments: &[PathSegment], steps: usize) -> Vec<(f64, f64)> {
    let steps = steps.max(1);
    let mut out = Vec::new();
    let mut current = None;
    for seg in segments {
        match *seg {
            PathSegment::MoveTo(p) | PathSegment::LineTo(p) => {
                out.push(p);
                current = Some(p);
            }
            PathSegment::CubicTo { c1, c2, to } => {
                let from = current.unwrap_or(to);
                for k in 1..steps {
                    out.push(cubic_point(from, c1, c2, to, k as f64 / steps as f64));
                }
                out.push(to);
                current = Some(to);
            }
        }
    }
    out
}
