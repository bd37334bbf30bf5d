use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{bail, Context, Result};
use flate2::read::GzDecoder;
use uplift_core::{Column, DataFrame};

/// Open a file for reading, decompressing it if the name ends in `.gz`.
pub(crate) fn open_input(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("gz")) {
        Ok(Box::new(GzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}

/// Load a CSV file (optionally gzipped) with a header row.
pub fn read_csv(path: &Path) -> Result<DataFrame> {
    let frame = from_reader(open_input(path)?)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::info!(
        "Loaded {}: {} rows, {} columns",
        path.display(),
        frame.n_rows(),
        frame.n_columns()
    );
    Ok(frame)
}

/// Parse in-memory CSV text with a header row.
pub fn parse_csv(csv_data: &str) -> Result<DataFrame> {
    from_reader(csv_data.as_bytes())
}

fn from_reader<R: Read>(input: R) -> Result<DataFrame> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        bail!("CSV has no header row");
    }

    let mut seen = HashSet::new();
    for h in &headers {
        if !seen.insert(h.as_str()) {
            bail!("Duplicate column '{}'", h);
        }
    }

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (row, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Malformed CSV record {}", row + 1))?;
        for (col, values) in cells.iter_mut().enumerate() {
            values.push(record.get(col).unwrap_or("").trim().to_string());
        }
    }

    let mut frame = DataFrame::new();
    for (name, values) in headers.into_iter().zip(cells) {
        frame.insert_column(name, infer_column(values))?;
    }
    Ok(frame)
}

/// Numeric when every cell parses as a number, text otherwise.
fn infer_column(values: Vec<String>) -> Column {
    let parsed: Option<Vec<f64>> = values.iter().map(|v| v.parse::<f64>().ok()).collect();
    match parsed {
        Some(numbers) => Column::Numeric(numbers),
        None => Column::Text(values),
    }
}

/// Write `frame` as CSV with a header row.
pub fn write_csv(frame: &DataFrame, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer.write_record(frame.column_names())?;

    let columns: Vec<&Column> = frame.columns().map(|(_, c)| c).collect();
    for row in 0..frame.n_rows() {
        let record: Vec<String> = columns
            .iter()
            .map(|c| c.display(row).unwrap_or_default())
            .collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;

    tracing::info!("Wrote {} rows to {}", frame.n_rows(), path.display());
    Ok(())
}
