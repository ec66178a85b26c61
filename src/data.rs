use anyhow::{anyhow, Result};
use serde::Serialize;
use tracing::warn;

use crate::config::Columns;
use crate::csv_reader::CsvData;

/// One `{category, value}` record of the boxplot input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxplotRow {
    pub category: String,
    pub value: f64,
}

/// One `{outer, inner, value}` record of the grouped bar input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedBarRow {
    pub outer: String,
    pub inner: String,
    pub value: f64,
}

/// One `{x, value}` record of the line chart input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineRow {
    pub x: String,
    pub value: f64,
}

/// Rows in file order. Not deduplicated.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset<R> {
    rows: Vec<R>,
}

impl<R> Dataset<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.rows.iter()
    }
}

impl<R> From<Vec<R>> for Dataset<R> {
    fn from(rows: Vec<R>) -> Self {
        Self::new(rows)
    }
}

impl<'a, R> IntoIterator for &'a Dataset<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Unique values in first-occurrence order
pub fn unique_in_order<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for v in values {
        if seen.insert(v) {
            out.push(v.to_string());
        }
    }
    out
}

/// Largest finite value, `None` if there is none
pub fn finite_max<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
}

/// Coerce a numeric cell. Anything that is not a finite number becomes NaN.
pub fn coerce_number(cell: &str) -> f64 {
    cell.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(f64::NAN)
}

fn find_col_index(data: &CsvData, name: &str) -> Result<usize> {
    data.column_index(name)
        .ok_or_else(|| anyhow!("Column '{}' not found (available: {})", name, data.headers.join(", ")))
}

fn value_cell(data: &CsvData, row_idx: usize, col: usize, col_name: &str) -> f64 {
    let cell = data.rows[row_idx].get(col).map(String::as_str).unwrap_or("");
    let value = coerce_number(cell);
    if value.is_nan() {
        warn!(
            row = row_idx + 1,
            column = col_name,
            cell,
            "non-numeric value, row excluded from aggregation"
        );
    }
    value
}

fn text_cell(data: &CsvData, row_idx: usize, col: usize) -> String {
    data.rows[row_idx].get(col).cloned().unwrap_or_default()
}

/// Extract `{category, value}` rows
pub fn boxplot_rows(data: &CsvData, columns: &Columns) -> Result<Dataset<BoxplotRow>> {
    if data.headers.is_empty() {
        return Ok(Dataset::new(Vec::new()));
    }
    let cat = find_col_index(data, &columns.category)?;
    let val = find_col_index(data, &columns.value)?;

    Ok((0..data.rows.len())
        .map(|i| BoxplotRow {
            category: text_cell(data, i, cat),
            value: value_cell(data, i, val, &columns.value),
        })
        .collect::<Vec<_>>()
        .into())
}

/// Extract `{outer, inner, value}` rows
pub fn grouped_bar_rows(data: &CsvData, columns: &Columns) -> Result<Dataset<GroupedBarRow>> {
    if data.headers.is_empty() {
        return Ok(Dataset::new(Vec::new()));
    }
    let sub = columns
        .subcategory
        .as_deref()
        .ok_or_else(|| anyhow!("Grouped bar chart needs a subcategory column"))?;
    let outer = find_col_index(data, &columns.category)?;
    let inner = find_col_index(data, sub)?;
    let val = find_col_index(data, &columns.value)?;

    Ok((0..data.rows.len())
        .map(|i| GroupedBarRow {
            outer: text_cell(data, i, outer),
            inner: text_cell(data, i, inner),
            value: value_cell(data, i, val, &columns.value),
        })
        .collect::<Vec<_>>()
        .into())
}

/// Extract `{x, value}` rows
pub fn line_rows(data: &CsvData, columns: &Columns) -> Result<Dataset<LineRow>> {
    if data.headers.is_empty() {
        return Ok(Dataset::new(Vec::new()));
    }
    let x = find_col_index(data, &columns.category)?;
    let val = find_col_index(data, &columns.value)?;

    Ok((0..data.rows.len())
        .map(|i| LineRow {
            x: text_cell(data, i, x),
            value: value_cell(data, i, val, &columns.value),
        })
        .collect::<Vec<_>>()
        .into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_csv_data(headers: Vec<&str>, rows: Vec<Vec<&str>>) -> CsvData {
        CsvData {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    fn cols(category: &str, sub: Option<&str>, value: &str) -> Columns {
        Columns {
            category: category.to_string(),
            subcategory: sub.map(str::to_string),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(" 42 "), 42.0);
        assert_eq!(coerce_number("1e3"), 1000.0);
        assert!(coerce_number("").is_nan());
        assert!(coerce_number("abc").is_nan());
        assert!(coerce_number("inf").is_nan());
    }

    #[test]
    fn test_boxplot_rows_keep_file_order_and_nan() {
        let csv = make_csv_data(
            vec!["AgeGroup", "Likes"],
            vec![vec!["18-25", "10"], vec!["26-35", "oops"], vec!["18-25", "30"]],
        );
        let ds = boxplot_rows(&csv, &cols("agegroup", None, "likes")).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.rows()[0].category, "18-25");
        assert!(ds.rows()[1].value.is_nan());
        assert_eq!(ds.rows()[2].value, 30.0);
    }

    #[test]
    fn test_grouped_rows() {
        let csv = make_csv_data(
            vec!["Platform", "PostType", "AvgLikes"],
            vec![vec!["Instagram", "Image", "120.5"], vec!["Twitter", "Video", "80"]],
        );
        let ds = grouped_bar_rows(&csv, &cols("Platform", Some("PostType"), "AvgLikes")).unwrap();
        assert_eq!(
            ds.rows()[0],
            GroupedBarRow { outer: "Instagram".into(), inner: "Image".into(), value: 120.5 }
        );
    }

    #[test]
    fn test_headerless_input_is_empty_dataset() {
        let csv = make_csv_data(vec![], vec![]);
        assert!(boxplot_rows(&csv, &cols("AgeGroup", None, "Likes")).unwrap().is_empty());
        assert!(grouped_bar_rows(&csv, &cols("Platform", Some("PostType"), "AvgLikes"))
            .unwrap()
            .is_empty());
        assert!(line_rows(&csv, &cols("Date", None, "AvgLikes")).unwrap().is_empty());
    }

    #[test]
    fn test_grouped_rows_need_subcategory() {
        let csv = make_csv_data(vec!["Platform", "AvgLikes"], vec![]);
        assert!(grouped_bar_rows(&csv, &cols("Platform", None, "AvgLikes")).is_err());
    }

    #[test]
    fn test_missing_column() {
        let csv = make_csv_data(vec!["Date", "Likes"], vec![vec!["3/1", "1"]]);
        let err = line_rows(&csv, &cols("Date", None, "AvgLikes")).unwrap_err();
        assert!(err.to_string().contains("AvgLikes"));
    }

    #[test]
    fn test_unique_in_order() {
        let v = unique_in_order(["b", "a", "b", "c", "a"]);
        assert_eq!(v, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_finite_max() {
        assert_eq!(finite_max([1.0, f64::NAN, 3.0, 2.0]), Some(3.0));
        assert_eq!(finite_max([f64::NAN]), None);
        assert_eq!(finite_max(Vec::<f64>::new()), None);
    }
}
