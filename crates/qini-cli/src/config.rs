use anyhow::{bail, Context, Result};
use qini_analysis::{QiniCurveBuilder, TrailingBin};
use serde::{Deserialize, Serialize};
use std::env;
use uplift_core::ColumnMapping;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QiniConfig {
    pub n_bins: usize,                 // 10
    pub treatment_col: String,         // "treatment"
    pub outcome_col: String,           // "outcome"
    pub uplift_col: String,            // "predicted_uplift"
    pub include_final_bin: bool,       // false: drop rows past the last full bin
}

impl QiniConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            n_bins: lookup("QINI_N_BINS")
                .unwrap_or_else(|| "10".to_string())
                .parse()
                .context("QINI_N_BINS must be a positive integer")?,
            treatment_col: lookup("QINI_TREATMENT_COL")
                .unwrap_or_else(|| "treatment".to_string()),
            outcome_col: lookup("QINI_OUTCOME_COL")
                .unwrap_or_else(|| "outcome".to_string()),
            uplift_col: lookup("QINI_UPLIFT_COL")
                .unwrap_or_else(|| "predicted_uplift".to_string()),
            include_final_bin: lookup("QINI_INCLUDE_FINAL_BIN")
                .unwrap_or_else(|| "false".to_string())
                .parse()
                .context("QINI_INCLUDE_FINAL_BIN must be true or false")?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_bins == 0 {
            bail!("n_bins must be greater than 0");
        }
        for (name, col) in [
            ("treatment", &self.treatment_col),
            ("outcome", &self.outcome_col),
            ("uplift", &self.uplift_col),
        ] {
            if col.trim().is_empty() {
                bail!("{} column name must not be empty", name);
            }
        }
        Ok(())
    }

    pub fn mapping(&self) -> ColumnMapping {
        ColumnMapping::new(&self.treatment_col, &self.outcome_col, &self.uplift_col)
    }

    pub fn builder(&self) -> QiniCurveBuilder {
        let policy = if self.include_final_bin {
            TrailingBin::IncludeFinal
        } else {
            TrailingBin::Drop
        };
        QiniCurveBuilder::new(self.n_bins).with_trailing_bin(policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = QiniConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.n_bins, 10);
        assert_eq!(config.mapping(), ColumnMapping::default());
        assert_eq!(config.builder().trailing_bin, TrailingBin::Drop);
    }

    #[test]
    fn test_overrides() {
        let config = QiniConfig::from_lookup(lookup(&[
            ("QINI_N_BINS", "20"),
            ("QINI_UPLIFT_COL", "score"),
            ("QINI_INCLUDE_FINAL_BIN", "true"),
        ]))
        .unwrap();
        assert_eq!(config.n_bins, 20);
        assert_eq!(config.mapping().uplift, "score");
        assert_eq!(config.builder().trailing_bin, TrailingBin::IncludeFinal);
    }

    #[test]
    fn test_invalid_values() {
        assert!(QiniConfig::from_lookup(lookup(&[("QINI_N_BINS", "0")])).is_err());
        assert!(QiniConfig::from_lookup(lookup(&[("QINI_N_BINS", "ten")])).is_err());
        assert!(QiniConfig::from_lookup(lookup(&[("QINI_OUTCOME_COL", " ")])).is_err());
    }
}
