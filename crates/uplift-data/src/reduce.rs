//! Down-sampling of large (gzipped) CSV datasets to a leading fraction of rows.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use uplift_core::UpliftError;

use crate::csv_io::open_input;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReduceStats {
    /// Data rows in the input, header excluded
    pub total_rows: usize,
    /// Data rows written to the output
    pub kept_rows: usize,
}

/// Copy the header and the first `max(1, floor(total * fraction))` rows of
/// `input` into an uncompressed CSV at `output`.
///
/// The input is read twice: once to count rows, once to copy them.
pub fn reduce_csv(input: &Path, output: &Path, fraction: f64) -> Result<ReduceStats> {
    if !(fraction > 0.0 && fraction <= 1.0) {
        return Err(UpliftError::InvalidData(format!(
            "fraction must be in (0, 1], got {fraction}"
        ))
        .into());
    }

    let total_rows = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(open_input(input)?)
        .byte_records()
        .try_fold(0usize, |n, r| r.map(|_| n + 1))
        .with_context(|| format!("Failed to count rows in {}", input.display()))?;

    let lines_to_keep = ((total_rows as f64 * fraction).floor() as usize).max(1);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(open_input(input)?);
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    let header = reader.byte_headers()?.clone();
    writer.write_byte_record(&header)?;

    let mut kept_rows = 0;
    for record in reader.byte_records().take(lines_to_keep) {
        writer.write_byte_record(&record?)?;
        kept_rows += 1;
    }
    writer.flush()?;

    tracing::info!(
        "Reduced {} -> {}: kept {} of {} rows",
        input.display(),
        output.display(),
        kept_rows,
        total_rows
    );

    Ok(ReduceStats {
        total_rows,
        kept_rows,
    })
}

/// A file path and its size on disk, `None` if it could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSize {
    pub path: PathBuf,
    pub bytes: Option<u64>,
}

impl fmt::Display for FileSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bytes {
            Some(bytes) => write!(f, "{}: {}", self.path.display(), format_bytes(bytes)),
            None => write!(f, "{}: not found", self.path.display()),
        }
    }
}

pub fn file_sizes<P: AsRef<Path>>(paths: &[P]) -> Vec<FileSize> {
    paths
        .iter()
        .map(|p| {
            let path = p.as_ref();
            FileSize {
                path: path.to_path_buf(),
                bytes: std::fs::metadata(path).ok().map(|m| m.len()),
            }
        })
        .collect()
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut size = bytes as f64 / 1024.0;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", size, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn write_gz(path: &Path, rows: usize) {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        writeln!(encoder, "client_id,treatment,target").unwrap();
        for i in 0..rows {
            writeln!(encoder, "c{},{},{}", i, i % 2, (i / 2) % 2).unwrap();
        }
        std::fs::write(path, encoder.finish().unwrap()).unwrap();
    }

    #[test]
    fn test_reduce_keeps_leading_rows() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("train.csv.gz");
        let output = dir.path().join("small_train.csv");
        write_gz(&input, 100);

        let stats = reduce_csv(&input, &output, 0.1).unwrap();
        assert_eq!(stats, ReduceStats { total_rows: 100, kept_rows: 10 });

        let text = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[0], "client_id,treatment,target");
        assert_eq!(lines[1], "c0,0,0");
        assert_eq!(lines[10], "c9,1,0");
    }

    #[test]
    fn test_reduce_keeps_at_least_one_row() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("tiny.csv.gz");
        let output = dir.path().join("tiny.csv");
        write_gz(&input, 5);

        let stats = reduce_csv(&input, &output, 0.01).unwrap();
        assert_eq!(stats.kept_rows, 1);
    }

    #[test]
    fn test_reduce_rejects_bad_fraction() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("x.csv.gz");
        write_gz(&input, 5);

        for fraction in [0.0, -0.5, 1.5, f64::NAN] {
            let err = reduce_csv(&input, &dir.path().join("y.csv"), fraction).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<UpliftError>(),
                Some(UpliftError::InvalidData(_))
            ));
        }
    }

    #[test]
    fn test_file_sizes() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("a.csv");
        std::fs::write(&present, b"abc").unwrap();
        let missing = dir.path().join("b.csv");

        let sizes = file_sizes(&[&present, &missing]);
        assert_eq!(sizes[0].bytes, Some(3));
        assert_eq!(sizes[1].bytes, None);
        assert!(sizes[1].to_string().ends_with("not found"));
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
    }
}
