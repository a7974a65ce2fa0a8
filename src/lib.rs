//! Buy or Rent - cash-flow projection engine for housing decisions
//!
//! This library provides:
//! - Level-payment mortgage amortization
//! - Buy projection: down payment, loan payments, rental income, sale
//! - Rent projection: invested down payment and monthly savings
//! - Future-value comparison, ledger IRR and holding-horizon sweeps
//! - CSV export of ledgers and schedules

pub mod error;
pub mod projection;
pub mod report;
pub mod runner;
pub mod scenario;

// Re-export commonly used types
pub use error::{Result, ScenarioError};
pub use projection::{
    AmortizationSchedule, CashflowEntry, CashflowLabel, Comparison, ProjectionEngine,
    ProjectionResult, Strategy,
};
pub use runner::{breakeven_horizon, ScenarioRunner, SweepRow};
pub use scenario::{ScenarioInput, ScenarioParameters};
