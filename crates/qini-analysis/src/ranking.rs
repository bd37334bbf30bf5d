use std::cmp::Ordering;

use uplift_core::{ColumnMapping, DataFrame, RankedRecord, Record, Result};

/// Records ordered by predicted uplift, highest first, ranked 1..=N.
///
/// The sort is stable: records with equal scores keep their input order,
/// so identical input always yields identical ranks.
#[derive(Debug, Clone, Default)]
pub struct RankedPopulation {
    records: Vec<RankedRecord>,
}

impl RankedPopulation {
    pub fn from_records(records: &[Record]) -> Self {
        let mut sorted: Vec<Record> = records.to_vec();
        sorted.sort_by(|a, b| {
            b.uplift_score()
                .partial_cmp(&a.uplift_score())
                .unwrap_or(Ordering::Equal)
        });

        let records = sorted
            .into_iter()
            .enumerate()
            .map(|(i, record)| RankedRecord { rank: i + 1, record })
            .collect();

        Self { records }
    }

    /// Validate the mapped columns, then rank.
    pub fn from_frame(frame: &DataFrame, mapping: &ColumnMapping) -> Result<Self> {
        let records = frame.to_records(mapping)?;
        Ok(Self::from_records(&records))
    }

    pub fn records(&self) -> &[RankedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Size of the control group over the whole population.
    pub fn total_control(&self) -> usize {
        self.records.iter().filter(|r| r.record.is_control()).count()
    }

    pub fn total_treated(&self) -> usize {
        self.records.iter().filter(|r| r.record.is_treated()).count()
    }

    /// The `n` highest-ranked records.
    pub fn top(&self, n: usize) -> &[RankedRecord] {
        &self.records[..n.min(self.records.len())]
    }

    pub fn into_vec(self) -> Vec<RankedRecord> {
        self.records
    }
}
