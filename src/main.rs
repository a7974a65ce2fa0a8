//! Buy or Rent CLI
//!
//! Command-line interface for comparing buying a home against renting

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use buy_or_rent::{
    report, CashflowLabel, ProjectionEngine, ProjectionResult, ScenarioInput, ScenarioParameters,
};

/// Compare buying a house on a mortgage against renting and investing the difference
#[derive(Parser, Debug)]
#[command(name = "buy-or-rent", version, about)]
struct Cli {
    /// JSON scenario file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// House purchase price
    #[arg(long)]
    price: Option<f64>,

    /// Down payment as a fraction of the price (0.2 = 20%)
    #[arg(long)]
    down_payment: Option<f64>,

    /// Annual loan interest rate (0.085 = 8.5%)
    #[arg(long)]
    loan_rate: Option<f64>,

    #[arg(long)]
    loan_term_years: Option<u32>,

    /// Month index at which the house starts earning rent
    #[arg(long)]
    rental_start_month: Option<u32>,

    /// Monthly rental income the house earns in year 1
    #[arg(long)]
    rental_income: Option<f64>,

    /// Years until the house is sold
    #[arg(long)]
    horizon_years: Option<u32>,

    /// Annual home appreciation rate
    #[arg(long)]
    appreciation: Option<f64>,

    /// Monthly rent paid in year 1 when renting
    #[arg(long)]
    rent: Option<f64>,

    /// Annual rent escalation rate
    #[arg(long)]
    rent_escalation: Option<f64>,

    /// Annual growth rate of invested savings
    #[arg(long)]
    savings_growth: Option<f64>,

    /// Directory to write buy_ledger.csv, rent_ledger.csv and amortization.csv
    #[arg(long)]
    csv_dir: Option<PathBuf>,

    /// Ledger rows to print per strategy
    #[arg(long, default_value_t = 24)]
    rows: usize,

    /// Print the comparison as JSON instead of tables
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn scenario_input(&self) -> Result<ScenarioInput> {
        let mut input = match &self.config {
            Some(path) => ScenarioInput::from_json_file(path)
                .with_context(|| format!("reading scenario from {}", path.display()))?,
            None => ScenarioInput::default(),
        };

        if let Some(v) = self.price {
            input.house_price = v;
        }
        if let Some(v) = self.down_payment {
            input.down_payment_fraction = v;
        }
        if let Some(v) = self.loan_rate {
            input.loan_interest_rate = v;
        }
        if let Some(v) = self.loan_term_years {
            input.loan_term_years = v;
        }
        if let Some(v) = self.rental_start_month {
            input.rental_start_month = v;
        }
        if let Some(v) = self.rental_income {
            input.rental_income_at_start = v;
        }
        if let Some(v) = self.horizon_years {
            input.horizon_years = v;
        }
        if let Some(v) = self.appreciation {
            input.appreciation_rate = v;
        }
        if let Some(v) = self.rent {
            input.monthly_rent = v;
        }
        if let Some(v) = self.rent_escalation {
            input.rent_escalation_rate = v;
        }
        if let Some(v) = self.savings_growth {
            input.savings_growth_rate = v;
        }

        Ok(input)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let params = ScenarioParameters::new(cli.scenario_input()?).context("invalid scenario")?;
    let engine = ProjectionEngine::new(params);
    let comparison = engine.compare();

    if let Some(dir) = &cli.csv_dir {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        report::write_ledger_file(&dir.join("buy_ledger.csv"), &comparison.buy)?;
        report::write_ledger_file(&dir.join("rent_ledger.csv"), &comparison.rent)?;
        report::write_schedule_file(
            &dir.join("amortization.csv"),
            &engine.params().amortization_schedule(),
        )?;
        log::info!("ledgers written to {}", dir.display());
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&comparison)?);
        return Ok(());
    }

    print_scenario(engine.params());

    println!("Buying");
    print_ledger(&comparison.buy, cli.rows);
    println!("Renting");
    print_ledger(&comparison.rent, cli.rows);

    let buy = &comparison.buy;
    let rent = &comparison.rent;
    let buy_summary = buy.summary();

    println!("Summary:");
    println!("  Buy FV:        {:>16.2}", buy.future_value);
    println!("  Rent FV:       {:>16.2}", rent.future_value);
    println!("  Difference:    {:>16.2}", comparison.difference());
    println!("  Preferred:     {:>16}", comparison.preferred().to_string());
    match buy.irr() {
        Some(irr) => println!("  Buy IRR:       {:>15.4}%", irr * 100.0),
        None => println!("  Buy IRR:       {:>16}", "n/a"),
    }
    if let Some(total) = buy_summary.totals_by_label.get(&CashflowLabel::RentIncome) {
        println!("  Rent earned:   {:>16.2}", total);
    }
    if let Some(total) = rent.total_rent_paid {
        println!("  Rent paid:     {:>16.2}", total);
    }

    Ok(())
}

fn print_scenario(params: &ScenarioParameters) {
    println!("Buy or Rent v{}", env!("CARGO_PKG_VERSION"));
    println!("=================\n");
    println!("Scenario:");
    println!("  House price:        {:.2}", params.house_price());
    println!(
        "  Down payment:       {:.2} ({:.1}%)",
        params.down_payment(),
        params.down_payment_fraction() * 100.0
    );
    println!(
        "  Loan:               {:.2} at {:.3}% over {} years",
        params.loan_principal(),
        params.loan_interest_rate() * 100.0,
        params.loan_term_years()
    );
    println!("  Monthly payment:    {:.2}", params.amortization_schedule().payment());
    println!("  Horizon:            {} years", params.horizon_years());
    println!("  Appreciation:       {:.2}%", params.appreciation_rate() * 100.0);
    println!(
        "  Rental income:      {:.2} from month {}",
        params.rental_income_at_start(),
        params.rental_start_month()
    );
    println!("  Rent paid:          {:.2}", params.monthly_rent());
    println!("  Rent escalation:    {:.2}%", params.rent_escalation_rate() * 100.0);
    println!("  Savings growth:     {:.2}%", params.savings_growth_rate() * 100.0);
    println!();
}

fn print_ledger(result: &ProjectionResult, rows: usize) {
    println!("{:>6} {:>16}  {}", "Period", "Amount", "Label");
    println!("{}", "-".repeat(60));

    for entry in result.ledger.iter().take(rows) {
        println!("{:>6} {:>16.2}  {}", entry.period, entry.amount, entry.label);
    }

    if result.ledger.len() > rows {
        println!("... ({} more entries)", result.ledger.len() - rows);
    }
    println!();
}
