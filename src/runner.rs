//! Scenario runner for batch and horizon-sweep projections
//!
//! Projections are pure, so independent scenarios run in parallel on the
//! rayon pool without any coordination.

use std::ops::RangeInclusive;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::projection::{Comparison, ProjectionEngine, Strategy};
use crate::scenario::{ScenarioInput, ScenarioParameters};

/// Outcome of one holding horizon in a sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepRow {
    pub horizon_years: u32,
    pub buy_future_value: f64,
    pub rent_future_value: f64,
    /// Buy minus Rent
    pub difference: f64,
    pub preferred: Strategy,
    pub buy_irr: Option<f64>,
}

impl SweepRow {
    fn from_comparison(horizon_years: u32, comparison: &Comparison) -> Self {
        Self {
            horizon_years,
            buy_future_value: comparison.buy.future_value,
            rent_future_value: comparison.rent.future_value,
            difference: comparison.difference(),
            preferred: comparison.preferred(),
            buy_irr: comparison.buy.irr(),
        }
    }
}

/// Runs comparisons for a base scenario and its variants
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(params);
/// let rows = runner.sweep_horizons(1..=30)?;
/// let breakeven = breakeven_horizon(&rows);
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    base: ScenarioParameters,
}

impl ScenarioRunner {
    pub fn new(base: ScenarioParameters) -> Self {
        Self { base }
    }

    /// Validate an input and build a runner around it
    pub fn from_input(input: ScenarioInput) -> Result<Self> {
        Ok(Self::new(ScenarioParameters::new(input)?))
    }

    pub fn base(&self) -> &ScenarioParameters {
        &self.base
    }

    /// Compare both strategies for the base scenario
    pub fn run(&self) -> Comparison {
        ProjectionEngine::new(self.base.clone()).compare()
    }

    /// Compare both strategies for the base scenario held over each horizon
    /// in `horizons`. Rows come back in ascending horizon order.
    pub fn sweep_horizons(&self, horizons: RangeInclusive<u32>) -> Result<Vec<SweepRow>> {
        log::info!(
            "sweeping {} horizons ({}..={} years)",
            horizons.clone().count(),
            horizons.start(),
            horizons.end()
        );

        horizons
            .into_par_iter()
            .map(|years| -> Result<SweepRow> {
                let params = self.base.with_horizon(years)?;
                let comparison = ProjectionEngine::new(params).compare();
                Ok(SweepRow::from_comparison(years, &comparison))
            })
            .collect()
    }

    /// Validate and compare many independent scenarios.
    /// One result per input, in input order.
    pub fn run_batch(inputs: &[ScenarioInput]) -> Vec<Result<Comparison>> {
        log::info!("running {} scenarios", inputs.len());

        inputs
            .par_iter()
            .map(|input| -> Result<Comparison> {
                let params = ScenarioParameters::new(input.clone())?;
                Ok(ProjectionEngine::new(params).compare())
            })
            .collect()
    }
}

/// First horizon at which buying is at least as good as renting
pub fn breakeven_horizon(rows: &[SweepRow]) -> Option<u32> {
    rows.iter()
        .find(|row| row.preferred == Strategy::Buy)
        .map(|row| row.horizon_years)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScenarioError;
    use approx::assert_relative_eq;

    fn reference_runner() -> ScenarioRunner {
        ScenarioRunner::from_input(ScenarioInput::default()).unwrap()
    }

    #[test]
    fn test_sweep_is_ordered_and_matches_single_runs() {
        let runner = reference_runner();
        let rows = runner.sweep_horizons(1..=10).unwrap();

        assert_eq!(rows.len(), 10);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.horizon_years, i as u32 + 1);
        }

        let eight = &rows[7];
        let direct = runner.run();
        assert_relative_eq!(eight.buy_future_value, direct.buy.future_value);
        assert_relative_eq!(eight.rent_future_value, direct.rent.future_value);
        assert_eq!(eight.preferred, Strategy::Buy);
    }

    #[test]
    fn test_sweep_rejects_zero_horizon() {
        let err = reference_runner().sweep_horizons(0..=3).unwrap_err();
        assert!(matches!(
            err,
            ScenarioError::InvalidParameter { field: "horizon_years", .. }
        ));
    }

    #[test]
    fn test_breakeven_horizon() {
        let row = |years, preferred| SweepRow {
            horizon_years: years,
            buy_future_value: 0.0,
            rent_future_value: 0.0,
            difference: 0.0,
            preferred,
            buy_irr: None,
        };
        let rows = vec![
            row(1, Strategy::Rent),
            row(2, Strategy::Rent),
            row(3, Strategy::Buy),
            row(4, Strategy::Buy),
        ];
        assert_eq!(breakeven_horizon(&rows), Some(3));
        assert_eq!(breakeven_horizon(&rows[..2]), None);
    }

    #[test]
    fn test_run_batch_keeps_order_and_reports_invalid_inputs() {
        let inputs = vec![
            ScenarioInput::default(),
            ScenarioInput {
                down_payment_fraction: 1.2,
                ..Default::default()
            },
            ScenarioInput {
                horizon_years: 4,
                ..Default::default()
            },
        ];

        let results = ScenarioRunner::run_batch(&inputs);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        let four_years = results[2].as_ref().unwrap();
        assert_eq!(four_years.rent.ledger.len(), 48);
    }
}
