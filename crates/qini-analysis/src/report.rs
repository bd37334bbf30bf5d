//! Evaluation summary and plot-ready output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uplift_core::{ColumnMapping, DataFrame, QiniCurve, Record, Result, UpliftError};

use crate::auc::calculate_qini_auc;
use crate::curve::{QiniCurveBuilder, TrailingBin};
use crate::ranking::RankedPopulation;

/// Result of evaluating one uplift prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QiniReport {
    pub generated_at: DateTime<Utc>,
    pub n_records: usize,
    pub n_treated: usize,
    pub n_control: usize,
    pub n_bins: usize,
    pub trailing_bin: TrailingBin,
    pub points: QiniCurve,
    pub auc: f64,
}

impl QiniReport {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Curve, random-targeting baseline and the axes a chart needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSeries {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Proportion of population targeted
    pub x: Vec<f64>,
    /// Incremental responses
    pub y: Vec<f64>,
    /// Straight line from (0, 0) to (1, max(y))
    pub baseline: [(f64, f64); 2],
}

impl PlotSeries {
    pub fn from_curve(curve: &QiniCurve) -> Result<Self> {
        let max_uplift = curve.max_uplift().ok_or_else(|| {
            UpliftError::InsufficientData("cannot plot an empty Qini curve".to_string())
        })?;

        Ok(Self {
            title: "Qini Curve for Uplift Model".to_string(),
            x_label: "Proportion of Population Targeted".to_string(),
            y_label: "Incremental Responses (Uplift)".to_string(),
            x: curve.population_fractions(),
            y: curve.uplift_values(),
            baseline: [(0.0, 0.0), (1.0, max_uplift)],
        })
    }
}

/// Ranks, builds the curve and integrates it in one call.
#[derive(Debug, Clone, Default)]
pub struct QiniEvaluator {
    pub mapping: ColumnMapping,
    pub builder: QiniCurveBuilder,
}

impl QiniEvaluator {
    pub fn new(mapping: ColumnMapping, builder: QiniCurveBuilder) -> Self {
        Self { mapping, builder }
    }

    pub fn evaluate(&self, frame: &DataFrame) -> Result<QiniReport> {
        let population = RankedPopulation::from_frame(frame, &self.mapping)?;
        self.evaluate_population(&population)
    }

    pub fn evaluate_records(&self, records: &[Record]) -> Result<QiniReport> {
        self.evaluate_population(&RankedPopulation::from_records(records))
    }

    fn evaluate_population(&self, population: &RankedPopulation) -> Result<QiniReport> {
        let curve = self.builder.build(population)?;
        let auc = calculate_qini_auc(&curve);

        tracing::info!(
            "Qini evaluation: {} records, {} bins, {} points, AUC {:.4}",
            population.len(),
            self.builder.n_bins,
            curve.len(),
            auc
        );

        Ok(QiniReport {
            generated_at: Utc::now(),
            n_records: population.len(),
            n_treated: population.total_treated(),
            n_control: population.total_control(),
            n_bins: self.builder.n_bins,
            trailing_bin: self.builder.trailing_bin,
            points: curve,
            auc,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use uplift_core::QiniPoint;

    fn walkthrough_frame() -> DataFrame {
        DataFrame::new()
            .with_column("treatment", vec![1.0, 0.0, 1.0, 0.0])
            .unwrap()
            .with_column("outcome", vec![1.0, 0.0, 0.0, 1.0])
            .unwrap()
            .with_column("predicted_uplift", vec![0.9, 0.7, 0.5, 0.3])
            .unwrap()
    }

    #[test]
    fn test_evaluate_frame() {
        let evaluator = QiniEvaluator::new(ColumnMapping::default(), QiniCurveBuilder::new(2));
        let report = evaluator.evaluate(&walkthrough_frame()).unwrap();

        assert_eq!(report.n_records, 4);
        assert_eq!(report.n_treated, 2);
        assert_eq!(report.n_control, 2);
        assert_eq!(report.points.len(), 2);
        assert_relative_eq!(report.auc, 0.25);
    }

    #[test]
    fn test_missing_outcome_column() {
        let frame = DataFrame::new()
            .with_column("treatment", vec![1.0, 0.0])
            .unwrap()
            .with_column("predicted_uplift", vec![0.9, 0.7])
            .unwrap();
        let err = QiniEvaluator::default().evaluate(&frame).unwrap_err();
        assert_eq!(err, UpliftError::MissingColumn("outcome".to_string()));
    }

    #[test]
    fn test_report_serializes() {
        let evaluator = QiniEvaluator::new(ColumnMapping::default(), QiniCurveBuilder::new(2));
        let report = evaluator.evaluate(&walkthrough_frame()).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&report.to_json_pretty().unwrap()).unwrap();

        assert_eq!(json["n_records"], 4);
        assert_eq!(json["trailing_bin"], "Drop");
        assert_eq!(json["points"][0]["population_fraction"], 0.5);
    }

    #[test]
    fn test_plot_series_baseline() {
        let curve = QiniCurve::new(vec![
            QiniPoint { population_fraction: 0.5, uplift_value: 3.0 },
            QiniPoint { population_fraction: 1.0, uplift_value: 2.0 },
        ]);
        let series = PlotSeries::from_curve(&curve).unwrap();
        assert_eq!(series.x, vec![0.5, 1.0]);
        assert_eq!(series.y, vec![3.0, 2.0]);
        assert_eq!(series.baseline, [(0.0, 0.0), (1.0, 3.0)]);

        assert!(PlotSeries::from_curve(&QiniCurve::default()).is_err());
    }
}
