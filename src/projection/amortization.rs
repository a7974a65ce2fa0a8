//! Level-payment loan amortization
//!
//! Every period pays the same total amount; the interest share is charged
//! on the balance outstanding at the start of the period and the rest
//! retires principal. Balances are evaluated in closed form so there is no
//! per-period drift.

use serde::{Deserialize, Serialize};

/// One period of an amortization schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// Period index (1-indexed)
    pub period: u32,
    pub payment: f64,
    pub interest: f64,
    pub principal: f64,
    /// Outstanding balance after this period's payment
    pub balance: f64,
}

/// Level-payment schedule for a fixed-rate loan
#[derive(Debug, Clone, PartialEq)]
pub struct AmortizationSchedule {
    principal: f64,
    /// Per-period interest rate
    rate: f64,
    /// Term in periods
    term: u32,
    payment: f64,
}

impl AmortizationSchedule {
    /// Build a schedule for `principal` repaid over `term` periods at
    /// `rate` per period. Requires rate >= 0 and term >= 1.
    pub fn new(principal: f64, rate: f64, term: u32) -> Self {
        Self {
            principal,
            rate,
            term,
            payment: level_payment(principal, rate, term),
        }
    }

    pub fn principal(&self) -> f64 {
        self.principal
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn term(&self) -> u32 {
        self.term
    }

    /// Constant total payment per period
    pub fn payment(&self) -> f64 {
        self.payment
    }

    /// Interest share of the payment in `period` (1-indexed).
    /// Zero outside 1..=term.
    pub fn interest(&self, period: u32) -> f64 {
        if period == 0 || period > self.term {
            return 0.0;
        }
        self.scheduled_balance(period - 1) * self.rate
    }

    /// Principal share of the payment in `period` (1-indexed).
    /// Zero outside 1..=term.
    pub fn principal_portion(&self, period: u32) -> f64 {
        if period == 0 || period > self.term {
            return 0.0;
        }
        self.payment - self.interest(period)
    }

    /// Outstanding balance once `period` payments have been made.
    ///
    /// Within the term this is the original principal less every principal
    /// portion paid so far. At or past the term the loan is retired and the
    /// balance is exactly zero.
    pub fn balance_after(&self, period: u32) -> f64 {
        if period >= self.term {
            return 0.0;
        }
        let repaid: f64 = (1..=period).map(|k| self.principal_portion(k)).sum();
        self.principal - repaid
    }

    /// Interest paid over the whole term
    pub fn total_interest(&self) -> f64 {
        (1..=self.term).map(|k| self.interest(k)).sum()
    }

    /// Full schedule, one row per period
    pub fn rows(&self) -> Vec<AmortizationRow> {
        (1..=self.term)
            .map(|period| AmortizationRow {
                period,
                payment: self.payment,
                interest: self.interest(period),
                principal: self.principal_portion(period),
                balance: if period == self.term {
                    0.0
                } else {
                    self.scheduled_balance(period)
                },
            })
            .collect()
    }

    /// Closed-form balance after `k` payments:
    /// P(1+r)^k - A((1+r)^k - 1)/r, or P - kA when r = 0.
    fn scheduled_balance(&self, k: u32) -> f64 {
        if self.rate == 0.0 {
            return self.principal - self.payment * k as f64;
        }
        let growth_m1 = compound_m1(self.rate, k as f64);
        self.principal * (1.0 + growth_m1) - self.payment * growth_m1 / self.rate
    }
}

/// Annuity payment that retires `principal` in `term` equal payments
pub fn level_payment(principal: f64, rate: f64, term: u32) -> f64 {
    if rate == 0.0 {
        return principal / term as f64;
    }
    principal * rate / -compound_m1(rate, -(term as f64))
}

/// (1 + rate)^periods - 1 without cancellation for rates near zero
fn compound_m1(rate: f64, periods: f64) -> f64 {
    (periods * rate.ln_1p()).exp_m1()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn reference_loan() -> AmortizationSchedule {
        AmortizationSchedule::new(8_000_000.0, 0.085 / 12.0, 240)
    }

    #[test]
    fn test_zero_rate_payment() {
        let schedule = AmortizationSchedule::new(12_000.0, 0.0, 12);
        assert_eq!(schedule.payment(), 1_000.0);
        for period in 1..=12 {
            assert_eq!(schedule.interest(period), 0.0);
            assert_eq!(schedule.principal_portion(period), 1_000.0);
        }
        assert_abs_diff_eq!(schedule.balance_after(6), 6_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_reference_payment() {
        let schedule = reference_loan();
        assert_relative_eq!(schedule.payment(), 69_425.858_669_242_72, max_relative = 1e-12);
        // First month: 8.5%/12 on the full principal
        assert_relative_eq!(schedule.interest(1), 56_666.666_666_666_67, max_relative = 1e-12);
    }

    #[test]
    fn test_principal_portions_sum_to_principal() {
        let schedule = reference_loan();
        let repaid: f64 = (1..=240).map(|k| schedule.principal_portion(k)).sum();
        assert_relative_eq!(repaid, 8_000_000.0, max_relative = 1e-10);
    }

    #[test]
    fn test_tiny_rate_keeps_precision() {
        let schedule = AmortizationSchedule::new(8_000_000.0, 1e-13 / 12.0, 240);
        assert_relative_eq!(schedule.payment(), 8_000_000.0 / 240.0, max_relative = 1e-9);

        let repaid: f64 = (1..=240).map(|k| schedule.principal_portion(k)).sum();
        assert_relative_eq!(repaid, 8_000_000.0, max_relative = 1e-9);
        assert!(schedule.interest(1) > 0.0);
        assert_abs_diff_eq!(schedule.rows()[238].balance, schedule.payment(), epsilon = 1e-3);
    }

    #[test]
    fn test_balance_retired_at_term() {
        let schedule = reference_loan();
        assert_eq!(schedule.balance_after(240), 0.0);
        assert_eq!(schedule.balance_after(500), 0.0);
        assert_eq!(schedule.rows().last().unwrap().balance, 0.0);
    }

    #[test]
    fn test_balance_before_term() {
        let schedule = reference_loan();
        let repaid: f64 = (1..=96).map(|k| schedule.principal_portion(k)).sum();
        assert_relative_eq!(schedule.balance_after(96), 8_000_000.0 - repaid);
        assert_relative_eq!(schedule.balance_after(96), 6_254_268.786_276, max_relative = 1e-10);
        assert_eq!(schedule.balance_after(0), 8_000_000.0);
    }

    #[test]
    fn test_interest_declines_principal_grows() {
        let schedule = reference_loan();
        for period in 2..=240 {
            assert!(schedule.interest(period) < schedule.interest(period - 1));
            assert!(schedule.principal_portion(period) > schedule.principal_portion(period - 1));
        }
        assert_eq!(schedule.interest(0), 0.0);
        assert_eq!(schedule.interest(241), 0.0);
    }

    #[test]
    fn test_rows_match_accessors() {
        let schedule = reference_loan();
        let rows = schedule.rows();
        assert_eq!(rows.len(), 240);
        assert_eq!(rows[0].period, 1);
        assert_relative_eq!(rows[95].balance, schedule.balance_after(96), max_relative = 1e-9);
        assert_relative_eq!(
            schedule.total_interest(),
            schedule.payment() * 240.0 - 8_000_000.0,
            max_relative = 1e-10
        );
    }
}
