//! Cash-flow ledger structures for projections

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::irr::calculate_irr;

/// Housing strategy a projection describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// Buy on a mortgage, let the house out, sell at the horizon
    Buy,
    /// Rent and invest what the purchase would have cost
    Rent,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Buy => write!(f, "Buy"),
            Strategy::Rent => write!(f, "Rent"),
        }
    }
}

/// Category of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CashflowLabel {
    Downpayment,
    LoanPayment,
    RemainingLoanBalance,
    SaleProceeds,
    RentIncome,
    SavingsDelta,
}

impl CashflowLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CashflowLabel::Downpayment => "Downpayment",
            CashflowLabel::LoanPayment => "Loan Payment",
            CashflowLabel::RemainingLoanBalance => "Remaining Loan Balance",
            CashflowLabel::SaleProceeds => "Sale Proceeds",
            CashflowLabel::RentIncome => "Rent Income",
            CashflowLabel::SavingsDelta => "Savings (not paid as loan payment)",
        }
    }
}

impl fmt::Display for CashflowLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single signed cash flow. Negative amounts are outlays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashflowEntry {
    /// Month index (0 = purchase date)
    pub period: u32,
    pub amount: f64,
    pub label: CashflowLabel,
}

/// Complete projection result for one strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub strategy: Strategy,

    /// Net financial position at the end of the horizon
    pub future_value: f64,

    /// Entries in construction order; not necessarily sorted by period
    pub ledger: Vec<CashflowEntry>,

    /// Rent paid over the horizon (Rent strategy only, informational)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_rent_paid: Option<f64>,
}

impl ProjectionResult {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            future_value: 0.0,
            ledger: Vec::new(),
            total_rent_paid: None,
        }
    }

    /// Append a ledger entry
    pub fn add_entry(&mut self, period: u32, amount: f64, label: CashflowLabel) {
        self.ledger.push(CashflowEntry { period, amount, label });
    }

    /// Entries carrying a given label, in ledger order
    pub fn entries(&self, label: CashflowLabel) -> impl Iterator<Item = &CashflowEntry> + '_ {
        self.ledger.iter().filter(move |e| e.label == label)
    }

    /// Ledger amounts summed per period, dense from period 0 to the last
    /// period that appears in the ledger
    pub fn net_by_period(&self) -> Vec<f64> {
        let last = match self.ledger.iter().map(|e| e.period).max() {
            Some(p) => p as usize,
            None => return Vec::new(),
        };
        let mut net = vec![0.0; last + 1];
        for entry in &self.ledger {
            net[entry.period as usize] += entry.amount;
        }
        net
    }

    /// Annualized internal rate of return of the monthly net cash flows.
    /// None when the ledger never changes sign or no root is found.
    pub fn irr(&self) -> Option<f64> {
        calculate_irr(&self.net_by_period(), 12)
    }

    /// Get summary statistics
    pub fn summary(&self) -> LedgerSummary {
        let mut totals_by_label = BTreeMap::new();
        for entry in &self.ledger {
            *totals_by_label.entry(entry.label).or_insert(0.0) += entry.amount;
        }

        let total_inflows: f64 = self.ledger.iter().map(|e| e.amount).filter(|a| *a > 0.0).sum();
        let total_outflows: f64 = self.ledger.iter().map(|e| e.amount).filter(|a| *a < 0.0).sum();

        LedgerSummary {
            strategy: self.strategy,
            entry_count: self.ledger.len(),
            totals_by_label,
            total_inflows,
            total_outflows,
            net_cashflow: total_inflows + total_outflows,
            future_value: self.future_value,
        }
    }
}

/// Summary statistics for a projection ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub strategy: Strategy,
    pub entry_count: usize,
    pub totals_by_label: BTreeMap<CashflowLabel, f64>,
    pub total_inflows: f64,
    pub total_outflows: f64,
    /// Undiscounted sum of every entry
    pub net_cashflow: f64,
    pub future_value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> ProjectionResult {
        let mut result = ProjectionResult::new(Strategy::Buy);
        result.add_entry(0, -1_000.0, CashflowLabel::Downpayment);
        result.add_entry(1, -100.0, CashflowLabel::LoanPayment);
        result.add_entry(2, -100.0, CashflowLabel::LoanPayment);
        result.add_entry(3, -500.0, CashflowLabel::RemainingLoanBalance);
        result.add_entry(3, 2_000.0, CashflowLabel::SaleProceeds);
        result.add_entry(1, 50.0, CashflowLabel::RentIncome);
        result
    }

    #[test]
    fn test_net_by_period_aggregates_out_of_order_entries() {
        let net = sample().net_by_period();
        assert_eq!(net, vec![-1_000.0, -50.0, -100.0, 1_500.0]);
        assert!(ProjectionResult::new(Strategy::Rent).net_by_period().is_empty());
    }

    #[test]
    fn test_summary_totals() {
        let summary = sample().summary();
        assert_eq!(summary.entry_count, 6);
        assert_relative_eq!(summary.totals_by_label[&CashflowLabel::LoanPayment], -200.0);
        assert_relative_eq!(summary.total_inflows, 2_050.0);
        assert_relative_eq!(summary.total_outflows, -1_700.0);
        assert_relative_eq!(summary.net_cashflow, 350.0);
        assert!(!summary.totals_by_label.contains_key(&CashflowLabel::SavingsDelta));
    }

    #[test]
    fn test_entries_filter() {
        let result = sample();
        let periods: Vec<u32> = result
            .entries(CashflowLabel::LoanPayment)
            .map(|e| e.period)
            .collect();
        assert_eq!(periods, vec![1, 2]);
    }

    #[test]
    fn test_irr_requires_sign_change() {
        let mut result = ProjectionResult::new(Strategy::Rent);
        result.add_entry(1, 10.0, CashflowLabel::SavingsDelta);
        result.add_entry(2, 10.0, CashflowLabel::SavingsDelta);
        assert!(result.irr().is_none());
        assert!(sample().irr().is_some());
    }

    #[test]
    fn test_label_display() {
        assert_eq!(CashflowLabel::RemainingLoanBalance.to_string(), "Remaining Loan Balance");
        assert_eq!(Strategy::Rent.to_string(), "Rent");
    }
}
