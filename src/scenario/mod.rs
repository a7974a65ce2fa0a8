//! Scenario parameters for the buy-versus-rent comparison

mod data;
pub mod loader;

pub use data::{ScenarioInput, ScenarioParameters, MAX_YEARS};
