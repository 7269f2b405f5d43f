//! Return on investment analysis
//!
//! Derives profitability, time-value and risk-adjusted metrics from a cost
//! stack and its cash flow series. Everything here is recomputed on demand.

mod analyzer;
mod risk;

pub use analyzer::{RoiAnalyzer, RoiInputs, RoiMetrics};
pub use risk::{estimate_risk_factor, ContractType, MAX_RISK_FACTOR};
