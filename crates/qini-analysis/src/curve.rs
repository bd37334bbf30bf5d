//! Qini curve construction.
//!
//! The ranked population is cut at every multiple of `step = N / n_bins`
//! (integer division). At each cutoff the treated responses are compared
//! with the control response count rescaled to the number of treated
//! individuals in the cutoff:
//!
//! ```text
//! uplift(i) = treat_resp(i) - ctrl_resp(i) / total_control * treated(i)
//! ```
//!
//! `total_control` is taken over the whole population, not the cutoff.
//! Running counts are accumulated in one pass over the ranked records, so
//! each point costs O(1) regardless of the number of bins.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use uplift_core::{QiniCurve, QiniPoint, RankedRecord, Result, UpliftError};

use crate::ranking::RankedPopulation;

/// What to do with the rows past the last full multiple of the step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrailingBin {
    /// Leave them out; the curve ends at the last full multiple.
    #[default]
    Drop,
    /// Add one more point covering the whole population (fraction 1.0).
    IncludeFinal,
}

/// Builds a Qini curve from a ranked population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QiniCurveBuilder {
    pub n_bins: usize,
    pub trailing_bin: TrailingBin,
}

impl Default for QiniCurveBuilder {
    fn default() -> Self {
        Self {
            n_bins: 10,
            trailing_bin: TrailingBin::Drop,
        }
    }
}

impl QiniCurveBuilder {
    pub fn new(n_bins: usize) -> Self {
        Self {
            n_bins,
            ..Self::default()
        }
    }

    pub fn with_trailing_bin(mut self, policy: TrailingBin) -> Self {
        self.trailing_bin = policy;
        self
    }

    /// Cumulative row counts at which a point is emitted.
    pub fn cutoffs(&self, n_records: usize) -> Result<Vec<usize>> {
        if self.n_bins == 0 {
            return Err(UpliftError::InvalidData(
                "n_bins must be a positive integer".to_string(),
            ));
        }

        let step = n_records / self.n_bins;
        if step == 0 {
            return Err(UpliftError::InsufficientData(format!(
                "{} bins requested for {} records; no full bin can be formed",
                self.n_bins, n_records
            )));
        }

        let mut cutoffs: Vec<usize> = (step..=n_records).step_by(step).collect();

        if let Some(&last) = cutoffs.last() {
            if last < n_records {
                match self.trailing_bin {
                    TrailingBin::Drop => tracing::debug!(
                        "Dropping {} trailing rows past cutoff {}",
                        n_records - last,
                        last
                    ),
                    TrailingBin::IncludeFinal => cutoffs.push(n_records),
                }
            }
        }

        Ok(cutoffs)
    }

    pub fn build(&self, population: &RankedPopulation) -> Result<QiniCurve> {
        // Global reduction first; every cutoff below depends on it.
        let total_control = population.total_control();
        if total_control == 0 {
            return Err(UpliftError::InsufficientData(
                "no control records in the dataset".to_string(),
            ));
        }

        let n = population.len();
        let cutoffs = self.cutoffs(n)?;

        let tallies = running_tallies(population.records());
        let points: Vec<QiniPoint> = cutoffs
            .par_iter()
            .map(|&i| tallies[i].point(total_control, n))
            .collect();

        tracing::debug!(
            "Built Qini curve: {} points over {} records ({} control)",
            points.len(),
            n,
            total_control
        );

        Ok(QiniCurve::new(points))
    }
}

/// Response counts over a prefix of the ranked population.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Tally {
    rows: usize,
    treated: usize,
    treat_resp: f64,
    ctrl_resp: f64,
}

impl Tally {
    fn add(mut self, r: &RankedRecord) -> Self {
        self.rows += 1;
        let outcome = r.record.outcome() as f64;
        if r.record.is_treated() {
            self.treat_resp += outcome;
            self.treated += 1;
        } else if r.record.is_control() {
            self.ctrl_resp += outcome;
        }
        self
    }

    fn point(&self, total_control: usize, n_records: usize) -> QiniPoint {
        let ctrl_adjusted = (self.ctrl_resp / total_control as f64) * self.treated as f64;
        QiniPoint {
            population_fraction: self.rows as f64 / n_records as f64,
            uplift_value: self.treat_resp - ctrl_adjusted,
        }
    }
}

/// `tallies[i]` covers the first `i` records; index 0 is the empty prefix.
fn running_tallies(records: &[RankedRecord]) -> Vec<Tally> {
    let mut tallies = Vec::with_capacity(records.len() + 1);
    tallies.push(Tally::default());
    let mut acc = Tally::default();
    for r in records {
        acc = acc.add(r);
        tallies.push(acc);
    }
    tallies
}
