//! CSV export of ledgers, amortization schedules and horizon sweeps

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::projection::{AmortizationSchedule, ProjectionResult};
use crate::runner::SweepRow;

#[derive(Serialize)]
struct LedgerRecord<'a> {
    #[serde(rename = "Period")]
    period: u32,
    #[serde(rename = "Amount")]
    amount: f64,
    #[serde(rename = "Label")]
    label: &'a str,
}

#[derive(Serialize)]
struct ScheduleRecord {
    #[serde(rename = "Period")]
    period: u32,
    #[serde(rename = "Payment")]
    payment: f64,
    #[serde(rename = "Interest")]
    interest: f64,
    #[serde(rename = "Principal")]
    principal: f64,
    #[serde(rename = "Balance")]
    balance: f64,
}

#[derive(Serialize)]
struct SweepRecord {
    #[serde(rename = "HorizonYears")]
    horizon_years: u32,
    #[serde(rename = "BuyFV")]
    buy_future_value: f64,
    #[serde(rename = "RentFV")]
    rent_future_value: f64,
    #[serde(rename = "Difference")]
    difference: f64,
    #[serde(rename = "Preferred")]
    preferred: String,
    /// Blank when the ledger has no IRR
    #[serde(rename = "BuyIRR")]
    buy_irr: Option<f64>,
}

/// Write a ledger in construction order
pub fn write_ledger<W: Write>(writer: W, result: &ProjectionResult) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for entry in &result.ledger {
        csv.serialize(LedgerRecord {
            period: entry.period,
            amount: entry.amount,
            label: entry.label.as_str(),
        })?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the full amortization schedule, one row per period
pub fn write_schedule<W: Write>(writer: W, schedule: &AmortizationSchedule) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for row in schedule.rows() {
        csv.serialize(ScheduleRecord {
            period: row.period,
            payment: row.payment,
            interest: row.interest,
            principal: row.principal,
            balance: row.balance,
        })?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_sweep<W: Write>(writer: W, rows: &[SweepRow]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for row in rows {
        csv.serialize(SweepRecord {
            horizon_years: row.horizon_years,
            buy_future_value: row.buy_future_value,
            rent_future_value: row.rent_future_value,
            difference: row.difference,
            preferred: row.preferred.to_string(),
            buy_irr: row.buy_irr,
        })?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_ledger_file(path: &Path, result: &ProjectionResult) -> Result<()> {
    write_ledger(File::create(path)?, result)
}

pub fn write_schedule_file(path: &Path, schedule: &AmortizationSchedule) -> Result<()> {
    write_schedule(File::create(path)?, schedule)
}

pub fn write_sweep_file(path: &Path, rows: &[SweepRow]) -> Result<()> {
    write_sweep(File::create(path)?, rows)
}
