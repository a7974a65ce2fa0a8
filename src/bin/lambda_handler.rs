//! AWS Lambda handler for buy-versus-rent comparisons
//!
//! Accepts a (possibly partial) scenario as JSON and returns both future
//! values, the preferred strategy and, on request, the full ledgers and a
//! holding-horizon sweep.
//!
//! Supports Lambda Function URLs for direct HTTP access.

use std::time::Instant;

use buy_or_rent::scenario::MAX_YEARS;
use buy_or_rent::{
    breakeven_horizon, Comparison, ProjectionEngine, ProjectionResult, ScenarioInput,
    ScenarioParameters, ScenarioRunner, Strategy, SweepRow,
};
use lambda_http::http::response::Builder;
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use serde::{Deserialize, Serialize};

/// Input for one comparison
#[derive(Debug, Deserialize)]
pub struct ComparisonRequest {
    /// Scenario fields; anything omitted keeps the reference value
    #[serde(flatten)]
    pub scenario: ScenarioInput,

    /// Return both ledgers in the response
    #[serde(default)]
    pub include_ledgers: bool,

    /// Also sweep horizons 1..=N years
    #[serde(default)]
    pub sweep_max_years: Option<u32>,
}

/// Output from the comparison
#[derive(Debug, Serialize)]
pub struct ComparisonResponse {
    pub scenario: ScenarioInput,
    pub monthly_loan_payment: f64,
    pub buy_future_value: f64,
    pub rent_future_value: f64,
    pub difference: f64,
    pub preferred: Strategy,
    pub buy_irr_pct: Option<f64>,
    pub total_rent_paid: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buy_ledger: Option<ProjectionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rent_ledger: Option<ProjectionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sweep: Option<Vec<SweepRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakeven_years: Option<u32>,
    pub execution_time_ms: u64,
}

/// A request that cannot be answered, with the HTTP status to report
#[derive(Debug)]
struct RequestError {
    status: u16,
    message: String,
}

impl RequestError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: 400,
            message: message.into(),
        }
    }
}

/// Largest sweep a single request may ask for
const MAX_SWEEP_YEARS: u32 = MAX_YEARS;

/// Parse a request body, validate it and run the comparison
fn process_request(body: &str, start: Instant) -> Result<ComparisonResponse, RequestError> {
    let request: ComparisonRequest = serde_json::from_str(body)
        .map_err(|e| RequestError::bad_request(format!("Invalid JSON: {}", e)))?;

    if let Some(years) = request.sweep_max_years {
        if years > MAX_SWEEP_YEARS {
            return Err(RequestError::bad_request(format!(
                "sweep_max_years must not exceed {}",
                MAX_SWEEP_YEARS
            )));
        }
    }

    let params = ScenarioParameters::new(request.scenario.clone())
        .map_err(|e| RequestError::bad_request(e.to_string()))?;

    let comparison: Comparison = ProjectionEngine::new(params.clone()).compare();

    let sweep = match request.sweep_max_years {
        Some(max_years) => Some(
            ScenarioRunner::new(params.clone())
                .sweep_horizons(1..=max_years)
                .map_err(|e| RequestError::bad_request(e.to_string()))?,
        ),
        None => None,
    };
    let breakeven_years = sweep.as_deref().and_then(breakeven_horizon);

    let difference = comparison.difference();
    let preferred = comparison.preferred();
    let buy_irr_pct = comparison.buy.irr().map(|r| r * 100.0);
    let Comparison { buy, rent } = comparison;

    Ok(ComparisonResponse {
        scenario: params.input().clone(),
        monthly_loan_payment: params.amortization_schedule().payment(),
        buy_future_value: buy.future_value,
        rent_future_value: rent.future_value,
        difference,
        preferred,
        buy_irr_pct,
        total_rent_paid: rent.total_rent_paid,
        buy_ledger: request.include_ledgers.then_some(buy),
        rent_ledger: request.include_ledgers.then_some(rent),
        sweep,
        breakeven_years,
        execution_time_ms: start.elapsed().as_millis() as u64,
    })
}

fn cors(builder: Builder) -> Builder {
    builder
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
}

fn error_response(error: &RequestError) -> Result<Response<Body>, Error> {
    let body = serde_json::json!({ "error": error.message });
    Ok(cors(Response::builder())
        .status(error.status)
        .header("Content-Type", "application/json")
        .body(Body::Text(body.to_string()))?)
}

fn json_response(body: &ComparisonResponse) -> Result<Response<Body>, Error> {
    Ok(cors(Response::builder())
        .status(200)
        .header("Content-Type", "application/json")
        .body(Body::Text(serde_json::to_string(body)?))?)
}

/// Lambda handler function
async fn handler(event: Request) -> Result<Response<Body>, Error> {
    let start = Instant::now();

    // Handle CORS preflight
    if event.method().as_str() == "OPTIONS" {
        return Ok(cors(Response::builder()).status(200).body(Body::Empty)?);
    }

    let body_str = match event.body() {
        Body::Text(s) => s.clone(),
        Body::Binary(b) => String::from_utf8_lossy(b).to_string(),
        Body::Empty => "{}".to_string(),
    };

    match process_request(&body_str, start) {
        Ok(response) => {
            log::info!(
                "compared scenario: buy {:.2} vs rent {:.2} in {} ms",
                response.buy_future_value,
                response.rent_future_value,
                response.execution_time_ms
            );
            json_response(&response)
        }
        Err(error) => {
            log::warn!("rejected request: {}", error.message);
            error_response(&error)
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
