use serde::{Deserialize, Serialize};

use crate::{Result, UpliftError};

/// One individual of an uplift experiment.
///
/// Only `Record::new` (or deserialization, which goes through it) builds a
/// record, so indicators are always 0/1 and the score is always finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRecord")]
pub struct Record {
    /// 1 = treated, 0 = control
    treatment: u8,
    /// 1 = responded, 0 = did not respond
    outcome: u8,
    /// Model-predicted uplift (higher = more predicted incremental benefit)
    uplift_score: f64,
}

#[derive(Deserialize)]
struct RawRecord {
    treatment: u8,
    outcome: u8,
    uplift_score: f64,
}

impl TryFrom<RawRecord> for Record {
    type Error = UpliftError;

    fn try_from(raw: RawRecord) -> Result<Self> {
        Record::new(raw.treatment, raw.outcome, raw.uplift_score)
    }
}

impl Record {
    /// Build a record, rejecting non-binary indicators and non-finite scores.
    pub fn new(treatment: u8, outcome: u8, uplift_score: f64) -> Result<Self> {
        if treatment > 1 {
            return Err(UpliftError::InvalidData(format!(
                "treatment must be 0 or 1, got {treatment}"
            )));
        }
        if outcome > 1 {
            return Err(UpliftError::InvalidData(format!(
                "outcome must be 0 or 1, got {outcome}"
            )));
        }
        if !uplift_score.is_finite() {
            return Err(UpliftError::InvalidData(format!(
                "uplift score must be finite, got {uplift_score}"
            )));
        }
        Ok(Self {
            treatment,
            outcome,
            uplift_score,
        })
    }

    pub fn treatment(&self) -> u8 {
        self.treatment
    }

    pub fn outcome(&self) -> u8 {
        self.outcome
    }

    pub fn uplift_score(&self) -> f64 {
        self.uplift_score
    }

    pub fn is_treated(&self) -> bool {
        self.treatment == 1
    }

    pub fn is_control(&self) -> bool {
        self.treatment == 0
    }
}

/// A record tagged with its 1-based position in descending uplift order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedRecord {
    pub rank: usize,
    #[serde(flatten)]
    pub record: Record,
}

/// One point of a Qini curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QiniPoint {
    /// Cumulative share of the ranked population, in (0, 1]
    pub population_fraction: f64,
    /// Treated responses minus the control-adjusted baseline
    pub uplift_value: f64,
}

/// Ordered sequence of Qini points with strictly increasing population fractions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QiniCurve {
    points: Vec<QiniPoint>,
}

impl QiniCurve {
    pub fn new(points: Vec<QiniPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[QiniPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// X axis: cumulative population fractions.
    pub fn population_fractions(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.population_fraction).collect()
    }

    /// Y axis: incremental responses, parallel to `population_fractions`.
    pub fn uplift_values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.uplift_value).collect()
    }

    /// Largest uplift value on the curve, `None` for an empty curve.
    pub fn max_uplift(&self) -> Option<f64> {
        self.points
            .iter()
            .map(|p| p.uplift_value)
            .fold(None, |acc, v| match acc {
                Some(m) if m >= v => Some(m),
                _ => Some(v),
            })
    }

    pub fn into_points(self) -> Vec<QiniPoint> {
        self.points
    }
}

/// Which dataset columns hold the treatment flag, the outcome and the uplift score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub treatment: String,
    pub outcome: String,
    pub uplift: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            treatment: "treatment".to_string(),
            outcome: "outcome".to_string(),
            uplift: "predicted_uplift".to_string(),
        }
    }
}

impl ColumnMapping {
    pub fn new(
        treatment: impl Into<String>,
        outcome: impl Into<String>,
        uplift: impl Into<String>,
    ) -> Self {
        Self {
            treatment: treatment.into(),
            outcome: outcome.into(),
            uplift: uplift.into(),
        }
    }

    /// Required columns in validation order.
    pub fn required(&self) -> [&str; 3] {
        [&self.treatment, &self.outcome, &self.uplift]
    }
}
