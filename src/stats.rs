use serde::Serialize;
use std::collections::HashMap;

/// Min, quartiles, median and max of one group.
///
/// Quartiles use linear interpolation between closest ranks
/// (`rank = p * (n - 1)`, the R-7 / spreadsheet method).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl FiveNumberSummary {
    /// Summarize a sample. Non-finite values are ignored; returns `None`
    /// when nothing is left.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);
        Some(Self::from_sorted(&sorted))
    }

    /// Summarize an ascending, non-empty, all-finite slice
    fn from_sorted(sorted: &[f64]) -> Self {
        FiveNumberSummary {
            min: sorted[0],
            q1: quantile_sorted(sorted, 0.25),
            median: quantile_sorted(sorted, 0.5),
            q3: quantile_sorted(sorted, 0.75),
            max: sorted[sorted.len() - 1],
        }
    }
}

/// Quantile of ascending data by linear interpolation at `p * (n - 1)`.
/// Returns NaN for empty input.
pub fn quantile_sorted(sorted_data: &[f64], p: f64) -> f64 {
    let n = sorted_data.len();
    if n == 0 {
        return f64::NAN;
    }
    if n == 1 {
        return sorted_data[0];
    }

    let rank = p.clamp(0.0, 1.0) * (n - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = rank.ceil() as usize;

    if lower_idx == upper_idx {
        sorted_data[lower_idx]
    } else {
        let weight = rank - lower_idx as f64;
        sorted_data[lower_idx] * (1.0 - weight) + sorted_data[upper_idx] * weight
    }
}

/// Group `rows` by `key` and summarize `value` per group.
///
/// Groups come out in first-encountered order. A group whose values are all
/// non-finite has no summary and is dropped.
pub fn summarize_by<'a, R, K, V>(rows: &'a [R], key: K, value: V) -> Vec<(String, FiveNumberSummary)>
where
    K: Fn(&'a R) -> &'a str,
    V: Fn(&R) -> f64,
{
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<f64>> = HashMap::new();

    for row in rows {
        let k = key(row);
        let entry = groups.entry(k).or_insert_with(|| {
            order.push(k);
            Vec::new()
        });
        entry.push(value(row));
    }

    order
        .into_iter()
        .filter_map(|k| {
            let summary = FiveNumberSummary::from_values(&groups[k])?;
            Some((k.to_string(), summary))
        })
        .collect()
}
