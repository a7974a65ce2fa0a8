//! Internal Rate of Return (IRR) of a periodic cash-flow ledger
//!
//! Newton-Raphson on the periodic rate, falling back to bisection when the
//! derivative vanishes or the iteration does not settle.

const TOLERANCE: f64 = 1e-10;
const MAX_ITERATIONS: usize = 1000;
const MIN_PERIODIC_RATE: f64 = -0.99;
const MAX_PERIODIC_RATE: f64 = 10.0;

/// Annualized IRR of evenly spaced cash flows.
///
/// # Arguments
/// * `cashflows` - One net amount per period, starting at period 0
///   (positive = inflow, negative = outflow)
/// * `periods_per_year` - 12 for monthly ledgers
///
/// # Returns
/// Annual rate as a decimal (0.05 = 5%), or None when the flows never
/// change sign or no root lies in the search interval.
pub fn calculate_irr(cashflows: &[f64], periods_per_year: u32) -> Option<f64> {
    if cashflows.is_empty() {
        return None;
    }

    if cashflows.iter().all(|cf| cf.abs() < TOLERANCE) {
        return Some(0.0);
    }

    let has_inflow = cashflows.iter().any(|&cf| cf > TOLERANCE);
    let has_outflow = cashflows.iter().any(|&cf| cf < -TOLERANCE);
    if !has_inflow || !has_outflow {
        return None;
    }

    let periodic = newton_raphson(cashflows, periods_per_year)
        .or_else(|| bisection(cashflows))?;

    Some(annualize(periodic, periods_per_year))
}

fn annualize(periodic_rate: f64, periods_per_year: u32) -> f64 {
    (1.0 + periodic_rate).powi(periods_per_year as i32) - 1.0
}

fn newton_raphson(cashflows: &[f64], periods_per_year: u32) -> Option<f64> {
    // 5% annual as a starting point
    let mut rate = 0.05 / periods_per_year as f64;

    for _ in 0..MAX_ITERATIONS {
        let (npv, dnpv) = npv_and_derivative(cashflows, rate);
        if dnpv.abs() < 1e-20 {
            return None;
        }

        let next = (rate - npv / dnpv).clamp(MIN_PERIODIC_RATE, MAX_PERIODIC_RATE);
        if (next - rate).abs() < TOLERANCE {
            return Some(next);
        }
        rate = next;
    }

    None
}

fn bisection(cashflows: &[f64]) -> Option<f64> {
    let mut low = MIN_PERIODIC_RATE;
    let mut high = MAX_PERIODIC_RATE;
    let mut npv_low = npv(cashflows, low);

    if npv_low * npv(cashflows, high) > 0.0 {
        return None;
    }

    for _ in 0..MAX_ITERATIONS {
        let mid = (low + high) / 2.0;
        let npv_mid = npv(cashflows, mid);

        if npv_mid.abs() < TOLERANCE || (high - low) / 2.0 < TOLERANCE {
            return Some(mid);
        }

        if npv_mid * npv_low < 0.0 {
            high = mid;
        } else {
            low = mid;
            npv_low = npv_mid;
        }
    }

    None
}

/// NPV at a periodic rate and its derivative with respect to that rate
fn npv_and_derivative(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let mut value = 0.0;
    let mut derivative = 0.0;

    for (t, &cf) in cashflows.iter().enumerate() {
        let discount = (1.0 + rate).powi(t as i32);
        value += cf / discount;
        derivative -= t as f64 * cf / (discount * (1.0 + rate));
    }

    (value, derivative)
}

fn npv(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}
