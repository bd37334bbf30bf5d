//! Qini curve and Qini AUC for evaluating uplift model predictions.
//!
//! Individuals are ranked by predicted uplift, the ranking is cut into
//! cumulative population bins, and each bin's treated response count is
//! compared with a control-adjusted baseline. The area under the resulting
//! curve summarises how well the model separates persuadable individuals.

pub mod auc;
pub mod curve;
pub mod ranking;
pub mod report;

pub use auc::{calculate_qini_auc, trapezoid};
pub use curve::{QiniCurveBuilder, TrailingBin};
pub use ranking::RankedPopulation;
pub use report::{PlotSeries, QiniEvaluator, QiniReport};

use uplift_core::{ColumnMapping, DataFrame, QiniCurve, Record, Result};

/// Qini curve of `frame`, reading the columns named in `mapping`.
pub fn qini_curve(frame: &DataFrame, mapping: &ColumnMapping, n_bins: usize) -> Result<QiniCurve> {
    let population = RankedPopulation::from_frame(frame, mapping)?;
    QiniCurveBuilder::new(n_bins).build(&population)
}

pub fn qini_curve_from_records(records: &[Record], n_bins: usize) -> Result<QiniCurve> {
    QiniCurveBuilder::new(n_bins).build(&RankedPopulation::from_records(records))
}
