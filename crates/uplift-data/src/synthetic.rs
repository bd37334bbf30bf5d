use rand::distributions::{Bernoulli, Distribution};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use statrs::distribution::Normal;
use uplift_core::{ColumnMapping, DataFrame, Result, UpliftError};

/// Parameters of the simulated experiment. Treatment and outcome are
/// independent, so a model scored on this data should have no real uplift.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub size: usize,
    pub seed: u64,
    pub treatment_rate: f64,
    pub outcome_rate: f64,
    pub uplift_mean: f64,
    pub uplift_std_dev: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            size: 10_000,
            seed: 42,
            treatment_rate: 0.5,
            outcome_rate: 0.1,
            uplift_mean: 0.0,
            uplift_std_dev: 1.0,
        }
    }
}

impl SimulationConfig {
    /// Generate the dataset using the default column names.
    pub fn simulate(&self) -> Result<DataFrame> {
        let treatment_dist = bernoulli(self.treatment_rate, "treatment_rate")?;
        let outcome_dist = bernoulli(self.outcome_rate, "outcome_rate")?;
        let uplift_dist = Normal::new(self.uplift_mean, self.uplift_std_dev)
            .map_err(|e| UpliftError::InvalidData(format!("uplift distribution: {e}")))?;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let indicator = |hit: bool| if hit { 1.0 } else { 0.0 };

        let treatment: Vec<f64> = (0..self.size)
            .map(|_| indicator(treatment_dist.sample(&mut rng)))
            .collect();
        let outcome: Vec<f64> = (0..self.size)
            .map(|_| indicator(outcome_dist.sample(&mut rng)))
            .collect();
        let uplift: Vec<f64> = (0..self.size).map(|_| uplift_dist.sample(&mut rng)).collect();

        let mapping = ColumnMapping::default();
        DataFrame::new()
            .with_column(mapping.treatment, treatment)?
            .with_column(mapping.outcome, outcome)?
            .with_column(mapping.uplift, uplift)
    }
}

/// Demo dataset: treatment ~ Bernoulli(0.5), outcome ~ Bernoulli(0.1),
/// predicted_uplift ~ Normal(0, 1).
pub fn simulate_dataset(size: usize, seed: u64) -> Result<DataFrame> {
    SimulationConfig {
        size,
        seed,
        ..SimulationConfig::default()
    }
    .simulate()
}

fn bernoulli(p: f64, name: &str) -> Result<Bernoulli> {
    Bernoulli::new(p).map_err(|_| UpliftError::InvalidData(format!("{name} must be in [0, 1], got {p}")))
}
