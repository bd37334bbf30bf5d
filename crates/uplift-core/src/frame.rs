//! Column-oriented table used as the input to uplift evaluation.
//!
//! Columns are looked up by name once, up front; after `to_records` the
//! rest of the pipeline works on strongly typed `Record`s.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::{ColumnMapping, Record, Result, UpliftError};

/// A single named column's cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Column {
    Numeric(Vec<f64>),
    Text(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cell `row` rendered as a string.
    pub fn display(&self, row: usize) -> Option<String> {
        match self {
            Column::Numeric(v) => v.get(row).map(|x| x.to_string()),
            Column::Text(v) => v.get(row).cloned(),
        }
    }

    /// View the column as numbers, parsing text cells if needed.
    pub fn to_numeric(&self, name: &str) -> Result<Cow<'_, [f64]>> {
        match self {
            Column::Numeric(v) => Ok(Cow::Borrowed(v.as_slice())),
            Column::Text(v) => v
                .iter()
                .enumerate()
                .map(|(row, cell)| {
                    cell.trim().parse::<f64>().map_err(|_| {
                        UpliftError::InvalidData(format!(
                            "column '{name}' row {row}: '{cell}' is not a number"
                        ))
                    })
                })
                .collect::<Result<Vec<f64>>>()
                .map(Cow::Owned),
        }
    }
}

impl From<Vec<f64>> for Column {
    fn from(values: Vec<f64>) -> Self {
        Column::Numeric(values)
    }
}

impl From<Vec<String>> for Column {
    fn from(values: Vec<String>) -> Self {
        Column::Text(values)
    }
}

impl From<Vec<&str>> for Column {
    fn from(values: Vec<&str>) -> Self {
        Column::Text(values.into_iter().map(str::to_string).collect())
    }
}

/// Ordered collection of equal-length named columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFrame")]
pub struct DataFrame {
    columns: Vec<(String, Column)>,
}

/// Unchecked wire form; lengths are validated when converting.
#[derive(Deserialize)]
struct RawFrame {
    columns: Vec<(String, Column)>,
}

impl TryFrom<RawFrame> for DataFrame {
    type Error = UpliftError;

    fn try_from(raw: RawFrame) -> Result<Self> {
        let mut frame = DataFrame::new();
        for (name, column) in raw.columns {
            if frame.has_column(&name) {
                return Err(UpliftError::InvalidData(format!("duplicate column '{name}'")));
            }
            frame.insert_column(name, column)?;
        }
        Ok(frame)
    }
}

impl DataFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of `insert_column`.
    pub fn with_column(mut self, name: impl Into<String>, column: impl Into<Column>) -> Result<Self> {
        self.insert_column(name, column)?;
        Ok(self)
    }

    /// Add a column, or replace the existing one with the same name in place.
    pub fn insert_column(&mut self, name: impl Into<String>, column: impl Into<Column>) -> Result<()> {
        let name = name.into();
        let column = column.into();

        if let Some((existing, _)) = self.columns.iter().find(|(n, _)| *n != name) {
            let expected = self.n_rows();
            if column.len() != expected {
                return Err(UpliftError::InvalidData(format!(
                    "column '{name}' has {} rows, expected {expected} (as '{existing}')",
                    column.len()
                )));
            }
        }

        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = column,
            None => self.columns.push((name, column)),
        }
        Ok(())
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
            .ok_or_else(|| UpliftError::MissingColumn(name.to_string()))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|(n, _)| n == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.columns.iter().map(|(n, c)| (n.as_str(), c))
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map(|(_, c)| c.len()).unwrap_or(0)
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn numeric(&self, name: &str) -> Result<Cow<'_, [f64]>> {
        self.column(name)?.to_numeric(name)
    }

    /// Extract typed records. Every mapped column must be present before
    /// any row is read.
    pub fn to_records(&self, mapping: &ColumnMapping) -> Result<Vec<Record>> {
        for name in mapping.required() {
            if !self.has_column(name) {
                return Err(UpliftError::MissingColumn(name.to_string()));
            }
        }

        let treatment = self.column(&mapping.treatment)?;
        let outcome = self.column(&mapping.outcome)?;
        let uplift = self.numeric(&mapping.uplift)?;

        (0..self.n_rows())
            .map(|row| {
                let t = binary_cell(treatment, &mapping.treatment, row)?;
                let o = binary_cell(outcome, &mapping.outcome, row)?;
                let score = *uplift.get(row).ok_or_else(|| short_column(&mapping.uplift, row))?;
                if !score.is_finite() {
                    return Err(UpliftError::InvalidData(format!(
                        "column '{}' row {row}: uplift score must be finite",
                        mapping.uplift
                    )));
                }
                Record::new(t, o, score)
            })
            .collect()
    }
}

fn short_column(name: &str, row: usize) -> UpliftError {
    UpliftError::InvalidData(format!("column '{name}' has no row {row}"))
}

/// Coerce one cell to 0/1.
fn binary_cell(column: &Column, name: &str, row: usize) -> Result<u8> {
    let invalid = |cell: &str| {
        UpliftError::InvalidData(format!(
            "column '{name}' row {row}: '{cell}' is not a 0/1 indicator"
        ))
    };

    match column {
        Column::Numeric(v) => {
            let x = *v.get(row).ok_or_else(|| short_column(name, row))?;
            if x == 0.0 {
                Ok(0)
            } else if x == 1.0 {
                Ok(1)
            } else {
                Err(invalid(&x.to_string()))
            }
        }
        Column::Text(v) => {
            let cell = v.get(row).ok_or_else(|| short_column(name, row))?.trim();
            if cell.eq_ignore_ascii_case("true") {
                return Ok(1);
            }
            if cell.eq_ignore_ascii_case("false") {
                return Ok(0);
            }
            match cell.parse::<f64>() {
                Ok(x) if x == 0.0 => Ok(0),
                Ok(x) if x == 1.0 => Ok(1),
                _ => Err(invalid(cell)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        DataFrame::new()
            .with_column("treatment", vec![1.0, 0.0, 1.0])
            .unwrap()
            .with_column("outcome", vec!["1", "false", "0"])
            .unwrap()
            .with_column("predicted_uplift", vec![0.3, -0.1, 0.7])
            .unwrap()
    }

    #[test]
    fn test_to_records() {
        let records = sample().to_records(&ColumnMapping::default()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].treatment(), 1);
        assert_eq!(records[0].outcome(), 1);
        assert_eq!(records[1].outcome(), 0);
        assert_eq!(records[2].uplift_score(), 0.7);
    }

    #[test]
    fn test_missing_column_checked_first() {
        // The outcome column is absent and the treatment column holds garbage:
        // the missing column must be reported, not the bad cell.
        let frame = DataFrame::new()
            .with_column("treatment", vec!["x", "y"])
            .unwrap()
            .with_column("predicted_uplift", vec![0.1, 0.2])
            .unwrap();
        let err = frame.to_records(&ColumnMapping::default()).unwrap_err();
        assert_eq!(err, UpliftError::MissingColumn("outcome".to_string()));
    }

    #[test]
    fn test_non_binary_indicator_rejected() {
        let frame = sample()
            .with_column("treatment", vec![1.0, 2.0, 0.0])
            .unwrap();
        let err = frame.to_records(&ColumnMapping::default()).unwrap_err();
        assert!(matches!(err, UpliftError::InvalidData(msg) if msg.contains("row 1")));
    }

    #[test]
    fn test_nan_uplift_rejected() {
        let frame = sample()
            .with_column("predicted_uplift", vec![0.1, f64::NAN, 0.2])
            .unwrap();
        assert!(matches!(
            frame.to_records(&ColumnMapping::default()),
            Err(UpliftError::InvalidData(_))
        ));
    }

    #[test]
    fn test_deserialize_rejects_unequal_lengths() {
        let json = r#"{"columns":[
            ["treatment",{"Numeric":[1,0,1]}],
            ["outcome",{"Numeric":[1,0,0]}],
            ["predicted_uplift",{"Numeric":[0.5]}]
        ]}"#;
        let err = serde_json::from_str::<DataFrame>(json).unwrap_err();
        assert!(err.to_string().contains("predicted_uplift"));
    }

    #[test]
    fn test_deserialize_round_trip() {
        let frame = sample();
        let json = serde_json::to_string(&frame).unwrap();
        let back: DataFrame = serde_json::from_str(&json).unwrap();
        assert_eq!(back, frame);
        assert_eq!(back.to_records(&ColumnMapping::default()).unwrap().len(), 3);
    }

    #[test]
    fn test_length_mismatch() {
        let err = sample().with_column("extra", vec![1.0]).unwrap_err();
        assert!(matches!(err, UpliftError::InvalidData(_)));
    }

    #[test]
    fn test_replace_column_keeps_order() {
        let frame = sample().with_column("outcome", vec![0.0, 0.0, 0.0]).unwrap();
        assert_eq!(frame.column_names(), vec!["treatment", "outcome", "predicted_uplift"]);
        assert_eq!(frame.numeric("outcome").unwrap().as_ref(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_text_column_to_numeric() {
        let frame = DataFrame::new().with_column("x", vec!["1.5", " 2 "]).unwrap();
        assert_eq!(frame.numeric("x").unwrap().as_ref(), &[1.5, 2.0]);

        let bad = DataFrame::new().with_column("x", vec!["a"]).unwrap();
        assert!(matches!(bad.numeric("x"), Err(UpliftError::InvalidData(_))));
        assert!(matches!(bad.numeric("y"), Err(UpliftError::MissingColumn(_))));
    }
}
