//! Projection engine for the buy and rent strategies

mod amortization;
mod cashflows;
mod engine;
mod irr;

pub use amortization::{level_payment, AmortizationRow, AmortizationSchedule};
pub use cashflows::{CashflowEntry, CashflowLabel, LedgerSummary, ProjectionResult, Strategy};
pub use engine::{Comparison, ProjectionEngine};
pub use irr::calculate_irr;
