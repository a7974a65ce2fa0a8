//! Core projection engine for the buy and rent strategies

use serde::{Deserialize, Serialize};

use super::cashflows::{CashflowLabel, ProjectionResult, Strategy};
use crate::scenario::ScenarioParameters;

/// Side-by-side outcome of both strategies for one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub buy: ProjectionResult,
    pub rent: ProjectionResult,
}

impl Comparison {
    /// Buy future value minus Rent future value
    pub fn difference(&self) -> f64 {
        self.buy.future_value - self.rent.future_value
    }

    /// Strategy with the larger future value; ties go to Buy
    pub fn preferred(&self) -> Strategy {
        if self.buy.future_value >= self.rent.future_value {
            Strategy::Buy
        } else {
            Strategy::Rent
        }
    }
}

/// Main projection engine
///
/// Holds one validated scenario. Every projection call builds a fresh
/// result; the engine itself never changes, so it can be shared across
/// threads freely.
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    params: ScenarioParameters,
}

impl ProjectionEngine {
    pub fn new(params: ScenarioParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ScenarioParameters {
        &self.params
    }

    /// Project buying on a mortgage, letting the house out from the rental
    /// start month and selling it at the end of the horizon.
    pub fn project_buy(&self) -> ProjectionResult {
        let params = &self.params;
        let mut result = ProjectionResult::new(Strategy::Buy);

        result.add_entry(0, -params.down_payment(), CashflowLabel::Downpayment);

        // Loan payments stop at the sale or when the loan is retired
        let schedule = params.amortization_schedule();
        let paid_through = params.horizon_months().min(params.loan_term_months());
        for period in 1..=paid_through {
            let payment = schedule.interest(period) + schedule.principal_portion(period);
            result.add_entry(period, -payment, CashflowLabel::LoanPayment);
        }

        let remaining_balance = schedule.balance_after(paid_through);
        let sale_price = params.sale_price();
        result.add_entry(
            paid_through + 1,
            -remaining_balance,
            CashflowLabel::RemainingLoanBalance,
        );
        result.add_entry(paid_through + 1, sale_price, CashflowLabel::SaleProceeds);
        let selling_profit = sale_price - remaining_balance;

        // Rental income runs up to, but not including, the final month
        let mut rental_future_value = 0.0;
        for month in params.rental_start_month()..params.horizon_months() {
            let income = params.rental_income_in_month(month);
            result.add_entry(month, income, CashflowLabel::RentIncome);
            rental_future_value += income * params.growth_factor_to_horizon(month);
        }

        result.future_value = selling_profit + rental_future_value;

        log::debug!(
            "buy projection: {} entries, balance at month {} = {:.2}, sale = {:.2}, FV = {:.2}",
            result.ledger.len(),
            paid_through,
            remaining_balance,
            sale_price,
            result.future_value
        );

        result
    }

    /// Project renting while investing the down payment and, every month,
    /// the loan payment that was not made less the rental income that was
    /// not earned.
    pub fn project_rent(&self) -> ProjectionResult {
        let params = &self.params;
        let mut result = ProjectionResult::new(Strategy::Rent);

        let horizon_growth =
            (1.0 + params.savings_growth_rate()).powi(params.horizon_years() as i32);
        let mut future_value = params.down_payment() * horizon_growth;

        // Level payment is the same every period; it is charged for the whole
        // horizon even when the loan term is shorter.
        let loan_payment = params.amortization_schedule().payment();

        let mut total_rent_paid = 0.0;
        for month in 1..=params.horizon_months() {
            total_rent_paid += params.rent_paid_in_month(month);
            let forgone_income = params.rental_income_in_month(month);

            let savings = loan_payment - forgone_income;
            future_value += savings * params.growth_factor_to_horizon(month);
            result.add_entry(month, savings, CashflowLabel::SavingsDelta);
        }

        result.future_value = future_value;
        result.total_rent_paid = Some(total_rent_paid);

        log::debug!(
            "rent projection: {} entries, monthly loan payment = {:.2}, FV = {:.2}",
            result.ledger.len(),
            loan_payment,
            result.future_value
        );

        result
    }

    /// Run both projections
    pub fn compare(&self) -> Comparison {
        Comparison {
            buy: self.project_buy(),
            rent: self.project_rent(),
        }
    }
}
