//! Scenario input and validated parameter structures

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScenarioError};
use crate::projection::AmortizationSchedule;

const MONTHS_PER_YEAR: u32 = 12;

/// Longest loan term or holding horizon accepted, in years
pub const MAX_YEARS: u32 = 100;

fn default_house_price() -> f64 { 10_000_000.0 }
fn default_down_payment_fraction() -> f64 { 0.20 }
fn default_loan_interest_rate() -> f64 { 0.085 }
fn default_loan_term_years() -> u32 { 20 }
fn default_rental_start_month() -> u32 { 30 }
fn default_rental_income_at_start() -> f64 { 45_000.0 }
fn default_horizon_years() -> u32 { 8 }
fn default_appreciation_rate() -> f64 { 0.05 }
fn default_monthly_rent() -> f64 { 40_000.0 }
fn default_rent_escalation_rate() -> f64 { 0.03 }
fn default_savings_growth_rate() -> f64 { 0.15 }

/// Raw scenario input as supplied by a caller, config file or request body.
///
/// Every field defaults to the reference scenario, so a partial JSON document
/// only overrides what it names. Nothing is checked here; see
/// [`ScenarioParameters::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioInput {
    /// Purchase price of the house
    #[serde(default = "default_house_price")]
    pub house_price: f64,

    /// Fraction of the price paid up front (0.0 to 1.0)
    #[serde(default = "default_down_payment_fraction")]
    pub down_payment_fraction: f64,

    /// Annual loan interest rate (0.085 = 8.5%), compounded monthly
    #[serde(default = "default_loan_interest_rate")]
    pub loan_interest_rate: f64,

    #[serde(default = "default_loan_term_years")]
    pub loan_term_years: u32,

    /// Month index at which the purchased house starts earning rent
    #[serde(default = "default_rental_start_month")]
    pub rental_start_month: u32,

    /// Monthly rental income the house earns in year 1
    #[serde(default = "default_rental_income_at_start")]
    pub rental_income_at_start: f64,

    /// Holding horizon; the house is sold at the end of it
    #[serde(default = "default_horizon_years")]
    pub horizon_years: u32,

    /// Annual home appreciation rate, compounded annually
    #[serde(default = "default_appreciation_rate")]
    pub appreciation_rate: f64,

    /// Monthly rent paid in year 1 when renting
    #[serde(default = "default_monthly_rent")]
    pub monthly_rent: f64,

    /// Annual escalation applied to both rent paid and rental income
    #[serde(default = "default_rent_escalation_rate")]
    pub rent_escalation_rate: f64,

    /// Annual growth rate earned by invested savings
    #[serde(default = "default_savings_growth_rate")]
    pub savings_growth_rate: f64,
}

impl Default for ScenarioInput {
    fn default() -> Self {
        Self {
            house_price: default_house_price(),
            down_payment_fraction: default_down_payment_fraction(),
            loan_interest_rate: default_loan_interest_rate(),
            loan_term_years: default_loan_term_years(),
            rental_start_month: default_rental_start_month(),
            rental_income_at_start: default_rental_income_at_start(),
            horizon_years: default_horizon_years(),
            appreciation_rate: default_appreciation_rate(),
            monthly_rent: default_monthly_rent(),
            rent_escalation_rate: default_rent_escalation_rate(),
            savings_growth_rate: default_savings_growth_rate(),
        }
    }
}

/// Validated, immutable scenario parameters shared by both projections
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ScenarioParameters {
    input: ScenarioInput,
}

impl ScenarioParameters {
    /// Validate an input and freeze it.
    ///
    /// Fails on the first offending field rather than letting NaN or
    /// infinity leak into a ledger.
    pub fn new(input: ScenarioInput) -> Result<Self> {
        if !input.house_price.is_finite() || input.house_price <= 0.0 {
            return Err(ScenarioError::invalid(
                "house_price",
                format!("must be a positive amount, got {}", input.house_price),
            ));
        }

        if !(0.0..=1.0).contains(&input.down_payment_fraction) {
            return Err(ScenarioError::invalid(
                "down_payment_fraction",
                format!("must lie in [0, 1], got {}", input.down_payment_fraction),
            ));
        }

        check_rate("loan_interest_rate", input.loan_interest_rate)?;
        check_rate("appreciation_rate", input.appreciation_rate)?;
        check_rate("rent_escalation_rate", input.rent_escalation_rate)?;
        check_rate("savings_growth_rate", input.savings_growth_rate)?;

        check_years("loan_term_years", input.loan_term_years)?;
        check_years("horizon_years", input.horizon_years)?;

        check_amount("rental_income_at_start", input.rental_income_at_start)?;
        check_amount("monthly_rent", input.monthly_rent)?;

        let params = Self { input };

        let payment = params.amortization_schedule().payment();
        if !payment.is_finite() {
            return Err(ScenarioError::invalid(
                "loan_interest_rate",
                format!("level payment is not finite ({payment})"),
            ));
        }

        if params.rental_start_month() >= params.horizon_months() {
            log::warn!(
                "rental start month {} is at or beyond the {}-month horizon; \
                 no rental income will be earned",
                params.rental_start_month(),
                params.horizon_months()
            );
        }

        Ok(params)
    }

    /// Same scenario held for a different number of years
    pub fn with_horizon(&self, horizon_years: u32) -> Result<Self> {
        Self::new(ScenarioInput {
            horizon_years,
            ..self.input.clone()
        })
    }

    pub fn input(&self) -> &ScenarioInput {
        &self.input
    }

    pub fn house_price(&self) -> f64 {
        self.input.house_price
    }

    pub fn down_payment_fraction(&self) -> f64 {
        self.input.down_payment_fraction
    }

    pub fn loan_interest_rate(&self) -> f64 {
        self.input.loan_interest_rate
    }

    pub fn loan_term_years(&self) -> u32 {
        self.input.loan_term_years
    }

    pub fn rental_start_month(&self) -> u32 {
        self.input.rental_start_month
    }

    pub fn rental_income_at_start(&self) -> f64 {
        self.input.rental_income_at_start
    }

    pub fn horizon_years(&self) -> u32 {
        self.input.horizon_years
    }

    pub fn appreciation_rate(&self) -> f64 {
        self.input.appreciation_rate
    }

    pub fn monthly_rent(&self) -> f64 {
        self.input.monthly_rent
    }

    pub fn rent_escalation_rate(&self) -> f64 {
        self.input.rent_escalation_rate
    }

    pub fn savings_growth_rate(&self) -> f64 {
        self.input.savings_growth_rate
    }

    pub fn horizon_months(&self) -> u32 {
        self.input.horizon_years * MONTHS_PER_YEAR
    }

    pub fn loan_term_months(&self) -> u32 {
        self.input.loan_term_years * MONTHS_PER_YEAR
    }

    /// Cash paid up front at purchase
    pub fn down_payment(&self) -> f64 {
        self.input.down_payment_fraction * self.input.house_price
    }

    /// Amount borrowed: the part of the price not covered by the down payment
    pub fn loan_principal(&self) -> f64 {
        (1.0 - self.input.down_payment_fraction) * self.input.house_price
    }

    pub fn monthly_loan_rate(&self) -> f64 {
        self.input.loan_interest_rate / MONTHS_PER_YEAR as f64
    }

    pub fn amortization_schedule(&self) -> AmortizationSchedule {
        AmortizationSchedule::new(
            self.loan_principal(),
            self.monthly_loan_rate(),
            self.loan_term_months(),
        )
    }

    /// Annual step-up factor for rents in a given month.
    ///
    /// Flat within each 12-month block: months 0-11 get 1.0, months 12-23
    /// get (1 + escalation), and so on.
    pub fn escalation_factor(&self, month: u32) -> f64 {
        let years_elapsed = (month / MONTHS_PER_YEAR) as i32;
        (1.0 + self.input.rent_escalation_rate).powi(years_elapsed)
    }

    /// Rental income the owned house earns in a given month
    pub fn rental_income_in_month(&self, month: u32) -> f64 {
        self.input.rental_income_at_start * self.escalation_factor(month)
    }

    /// Rent a tenant pays in a given month
    pub fn rent_paid_in_month(&self, month: u32) -> f64 {
        self.input.monthly_rent * self.escalation_factor(month)
    }

    /// Factor carrying an amount received in `month` forward to the end of
    /// the horizon at the savings growth rate.
    ///
    /// Uses (horizon_months - month - 1) / 12 fractional years, so an amount
    /// received in the final month is discounted by one month.
    pub fn growth_factor_to_horizon(&self, month: u32) -> f64 {
        let remaining_months = self.horizon_months() as f64 - month as f64 - 1.0;
        (1.0 + self.input.savings_growth_rate).powf(remaining_months / MONTHS_PER_YEAR as f64)
    }

    /// House value at the end of the horizon, compounded annually
    pub fn sale_price(&self) -> f64 {
        self.input.house_price
            * (1.0 + self.input.appreciation_rate).powi(self.input.horizon_years as i32)
    }
}

impl TryFrom<ScenarioInput> for ScenarioParameters {
    type Error = ScenarioError;

    fn try_from(input: ScenarioInput) -> Result<Self> {
        Self::new(input)
    }
}

fn check_rate(field: &'static str, rate: f64) -> Result<()> {
    if !rate.is_finite() || rate < 0.0 {
        return Err(ScenarioError::invalid(
            field,
            format!("must be a non-negative fraction, got {rate}"),
        ));
    }
    Ok(())
}

fn check_years(field: &'static str, years: u32) -> Result<()> {
    if !(1..=MAX_YEARS).contains(&years) {
        return Err(ScenarioError::invalid(
            field,
            format!("must be between 1 and {MAX_YEARS} years, got {years}"),
        ));
    }
    Ok(())
}

fn check_amount(field: &'static str, amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(ScenarioError::invalid(
            field,
            format!("must be a non-negative amount, got {amount}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_is_reference_scenario() {
        let params = ScenarioParameters::new(ScenarioInput::default()).unwrap();
        assert_eq!(params.horizon_months(), 96);
        assert_eq!(params.loan_term_months(), 240);
        assert_relative_eq!(params.down_payment(), 2_000_000.0);
        assert_relative_eq!(params.loan_principal(), 8_000_000.0);
    }

    #[test]
    fn test_rejects_down_payment_out_of_range() {
        for fraction in [-0.1, 1.5, f64::NAN] {
            let input = ScenarioInput {
                down_payment_fraction: fraction,
                ..Default::default()
            };
            let err = ScenarioParameters::new(input).unwrap_err();
            assert!(matches!(
                err,
                ScenarioError::InvalidParameter { field: "down_payment_fraction", .. }
            ));
        }
    }

    #[test]
    fn test_rejects_negative_and_non_finite_rates() {
        let input = ScenarioInput {
            loan_interest_rate: -0.01,
            ..Default::default()
        };
        assert!(ScenarioParameters::new(input).is_err());

        let input = ScenarioInput {
            savings_growth_rate: f64::INFINITY,
            ..Default::default()
        };
        let err = ScenarioParameters::new(input).unwrap_err();
        assert!(err.to_string().contains("savings_growth_rate"));
    }

    #[test]
    fn test_rejects_zero_durations() {
        let input = ScenarioInput {
            horizon_years: 0,
            ..Default::default()
        };
        assert!(ScenarioParameters::new(input).is_err());

        let input = ScenarioInput {
            loan_term_years: 0,
            ..Default::default()
        };
        assert!(ScenarioParameters::new(input).is_err());
    }

    #[test]
    fn test_rejects_durations_beyond_cap() {
        for years in [MAX_YEARS + 1, 100_000_000, 400_000_000, u32::MAX] {
            let err = ScenarioParameters::new(ScenarioInput {
                horizon_years: years,
                ..Default::default()
            })
            .unwrap_err();
            assert!(matches!(
                err,
                ScenarioError::InvalidParameter { field: "horizon_years", .. }
            ));

            let err = ScenarioParameters::new(ScenarioInput {
                loan_term_years: years,
                ..Default::default()
            })
            .unwrap_err();
            assert!(matches!(
                err,
                ScenarioError::InvalidParameter { field: "loan_term_years", .. }
            ));
        }

        let longest = ScenarioParameters::new(ScenarioInput {
            horizon_years: MAX_YEARS,
            loan_term_years: MAX_YEARS,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(longest.horizon_months(), 1_200);
    }

    #[test]
    fn test_rejects_non_positive_price() {
        let input = ScenarioInput {
            house_price: 0.0,
            ..Default::default()
        };
        assert!(ScenarioParameters::new(input).is_err());
    }

    #[test]
    fn test_escalation_steps_every_twelve_months() {
        let params = ScenarioParameters::new(ScenarioInput::default()).unwrap();

        for month in 0..12 {
            assert_relative_eq!(params.escalation_factor(month), 1.0);
        }
        for month in 12..24 {
            assert_relative_eq!(params.escalation_factor(month), 1.03);
        }
        assert_relative_eq!(params.escalation_factor(24), 1.03 * 1.03);
        assert_relative_eq!(params.escalation_factor(36), 1.03_f64.powi(3));

        assert_relative_eq!(params.rental_income_in_month(11), 45_000.0);
        assert_relative_eq!(params.rental_income_in_month(12), 46_350.0);
        assert_relative_eq!(params.rent_paid_in_month(12), 41_200.0);
    }

    #[test]
    fn test_sale_price_compounds_annually() {
        let one_year = ScenarioParameters::new(ScenarioInput {
            horizon_years: 1,
            ..Default::default()
        })
        .unwrap();
        assert_relative_eq!(one_year.sale_price(), 10_500_000.0);

        let zero_growth = ScenarioParameters::new(ScenarioInput {
            appreciation_rate: 0.0,
            ..Default::default()
        })
        .unwrap();
        assert_relative_eq!(zero_growth.sale_price(), 10_000_000.0);
    }

    #[test]
    fn test_growth_factor_to_horizon() {
        let params = ScenarioParameters::new(ScenarioInput::default()).unwrap();
        // Month 83 leaves exactly one year to the 96-month horizon
        assert_relative_eq!(params.growth_factor_to_horizon(83), 1.15, max_relative = 1e-12);
        assert_relative_eq!(params.growth_factor_to_horizon(95), 1.0);
    }

    #[test]
    fn test_with_horizon_revalidates() {
        let params = ScenarioParameters::new(ScenarioInput::default()).unwrap();
        let longer = params.with_horizon(25).unwrap();
        assert_eq!(longer.horizon_months(), 300);
        assert_eq!(longer.house_price(), params.house_price());
        assert!(params.with_horizon(0).is_err());
    }
}
