use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Number of attempts made by [`load_csv`] before giving up.
pub const LOAD_ATTEMPTS: usize = 2;

/// Raw delimited table: one header row plus string cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvData {
    /// Find a column by name (ASCII case-insensitive)
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.eq_ignore_ascii_case(name))
    }
}

/// Parse CSV text from any reader. The first record is the header row.
pub fn read_csv<R: Read>(reader: R) -> Result<CsvData> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .context("Failed to read CSV header row")?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read CSV record {}", idx + 1))?;
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        // Short rows are padded so column lookups never go out of bounds
        row.resize(headers.len().max(row.len()), String::new());
        rows.push(row);
    }

    Ok(CsvData { headers, rows })
}

/// Read a CSV file from disk
pub fn read_csv_file(path: &Path) -> Result<CsvData> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open '{}'", path.display()))?;
    read_csv(file).with_context(|| format!("Failed to parse '{}'", path.display()))
}

/// Load a CSV file, retrying once before reporting failure.
pub fn load_csv(path: &Path) -> Result<CsvData> {
    load_with_retry(path, LOAD_ATTEMPTS, read_csv_file)
}

pub(crate) fn load_with_retry<F>(path: &Path, attempts: usize, mut load: F) -> Result<CsvData>
where
    F: FnMut(&Path) -> Result<CsvData>,
{
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match load(path) {
            Ok(data) => {
                debug!(path = %path.display(), rows = data.rows.len(), attempt, "loaded csv");
                return Ok(data);
            }
            Err(err) if attempt < attempts => {
                warn!(path = %path.display(), attempt, error = %err, "csv load failed, retrying");
                attempt += 1;
            }
            Err(err) => {
                return Err(err.context(format!(
                    "Giving up on '{}' after {} attempts",
                    path.display(),
                    attempts
                )));
            }
        }
    }
}
