// Band, linear and ordinal scales from data space to plot-area pixels

use std::collections::HashMap;

use crate::color::Color;
use crate::data::unique_in_order;

const MAX_PADDING: f64 = 0.999;

/// Categorical scale dividing a pixel range into equal, padded bands.
///
/// With `n` categories over a range of width `w`, every category owns a
/// slot of `step = w / n` pixels. The band itself is `step * (1 - padding)`
/// wide and is centred in its slot, so half of the padding sits on each
/// side of every band.
#[derive(Debug, Clone)]
pub struct BandScale {
    domain: Vec<String>,
    index: HashMap<String, usize>,
    range: (f64, f64),
    padding: f64,
}

impl BandScale {
    /// Build a band scale. Duplicate categories keep their first position.
    pub fn new(domain: Vec<String>, range: (f64, f64), padding: f64) -> Self {
        let domain = unique_in_order(domain.iter().map(String::as_str));
        let index = domain
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
        let padding = if padding.is_finite() { padding.clamp(0.0, MAX_PADDING) } else { 0.0 };
        BandScale { domain, index, range, padding }
    }

    /// Build from category values in first-occurrence order
    pub fn from_values<'a, I>(values: I, range: (f64, f64), padding: f64) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self::new(unique_in_order(values), range, padding)
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    pub fn len(&self) -> usize {
        self.domain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domain.is_empty()
    }

    pub fn padding(&self) -> f64 {
        self.padding
    }

    /// Width of one category slot (band plus its padding)
    pub fn step(&self) -> f64 {
        if self.domain.is_empty() {
            0.0
        } else {
            (self.range.1 - self.range.0) / self.domain.len() as f64
        }
    }

    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding)
    }

    /// Start offset of the band for `category`
    pub fn position(&self, category: &str) -> Option<f64> {
        let i = *self.index.get(category)?;
        let step = self.step();
        Some(self.range.0 + i as f64 * step + step * self.padding / 2.0)
    }

    /// Centre of the band for `category`
    pub fn center(&self, category: &str) -> Option<f64> {
        self.position(category).map(|p| p + self.bandwidth() / 2.0)
    }
}

/// Continuous linear scale. Y scales are built with an inverted range
/// (`[height, 0]`) because pixel y grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        LinearScale { domain, range }
    }

    /// Domain `[0, max * headroom]`. A missing maximum gives an empty `[0, 0]`
    /// domain, which maps everything to the range midpoint.
    pub fn zero_based(max: Option<f64>, headroom: f64, range: (f64, f64)) -> Self {
        let top = max.map(|m| m * headroom).filter(|t| t.is_finite()).unwrap_or(0.0);
        Self::new((0.0, top), range)
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// True when the domain has zero width or is not finite
    pub fn is_degenerate(&self) -> bool {
        let (d0, d1) = self.domain;
        !(d0.is_finite() && d1.is_finite()) || d0 == d1
    }

    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if self.is_degenerate() {
            return (r0 + r1) / 2.0;
        }
        let t = (value - d0) / (d1 - d0);
        if t == 1.0 {
            r1
        } else {
            r0 + t * (r1 - r0)
        }
    }

    /// Roughly `count` evenly spaced round values (1, 2 or 5 times a power
    /// of ten) inside the domain, ascending.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (d0, d1) = self.domain;
        if self.is_degenerate() {
            return if d0.is_finite() { vec![d0] } else { Vec::new() };
        }
        let (lo, hi) = if d0 < d1 { (d0, d1) } else { (d1, d0) };
        let count = count.max(1) as f64;

        let raw = (hi - lo) / count;
        let power = raw.log10().floor();
        let error = raw / 10f64.powf(power);
        let factor = if error >= 50f64.sqrt() {
            10.0
        } else if error >= 10f64.sqrt() {
            5.0
        } else if error >= 2f64.sqrt() {
            2.0
        } else {
            1.0
        };

        // Work in integer multiples so 0.1 steps don't accumulate drift
        if power < 0.0 {
            let inv = 10f64.powf(-power) / factor;
            let mut i1 = (lo * inv).round();
            let mut i2 = (hi * inv).round();
            if i1 / inv < lo {
                i1 += 1.0;
            }
            if i2 / inv > hi {
                i2 -= 1.0;
            }
            let n = (i2 - i1).max(-1.0) as i64;
            (0..=n).map(|k| (i1 + k as f64) / inv).collect()
        } else {
            let step = 10f64.powf(power) * factor;
            let mut i1 = (lo / step).round();
            let mut i2 = (hi / step).round();
            if i1 * step < lo {
                i1 += 1.0;
            }
            if i2 * step > hi {
                i2 -= 1.0;
            }
            let n = (i2 - i1).max(-1.0) as i64;
            (0..=n).map(|k| (i1 + k as f64) * step).collect()
        }
    }
}

/// Categorical color scale: the i-th category gets `palette[i % len]`.
#[derive(Debug, Clone)]
pub struct OrdinalScale {
    index: HashMap<String, usize>,
    domain: Vec<String>,
    palette: Vec<Color>,
}

impl OrdinalScale {
    pub fn new(domain: Vec<String>, palette: Vec<Color>) -> Self {
        let domain = unique_in_order(domain.iter().map(String::as_str));
        let index = domain
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
        OrdinalScale { index, domain, palette }
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    pub fn color(&self, category: &str) -> Option<Color> {
        if self.palette.is_empty() {
            return None;
        }
        let i = *self.index.get(category)?;
        Some(self.palette[i % self.palette.len()])
    }
}
