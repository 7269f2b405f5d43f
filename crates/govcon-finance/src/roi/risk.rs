//! Contract risk heuristics

use serde::{Deserialize, Serialize};

/// Upper bound for any risk factor fed to ROI analysis
pub const MAX_RISK_FACTOR: f64 = 0.5;

const BASE_RISK: f64 = 0.10;
const LONG_PERIOD_MONTHS: u32 = 24;
const LARGE_CONTRACT_VALUE: f64 = 5_000_000.0;

/// Government contract type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractType {
    /// Firm fixed price
    #[serde(rename = "FFP")]
    FirmFixedPrice,
    /// Time and materials
    #[serde(rename = "T&M")]
    TimeAndMaterials,
    /// Cost plus fixed fee
    #[serde(rename = "CPFF")]
    CostPlusFixedFee,
    /// Anything else
    #[serde(other)]
    Other,
}

impl std::fmt::Display for ContractType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContractType::FirmFixedPrice => write!(f, "FFP"),
            ContractType::TimeAndMaterials => write!(f, "T&M"),
            ContractType::CostPlusFixedFee => write!(f, "CPFF"),
            ContractType::Other => write!(f, "Other"),
        }
    }
}

/// Heuristic risk factor in `[0, 0.5]` from contract type, length and size.
///
/// Fixed-price work carries the cost overrun, T&M passes it to the customer;
/// long and large contracts add risk on top.
pub fn estimate_risk_factor(
    contract_type: ContractType,
    performance_period_months: u32,
    estimated_value: f64,
) -> f64 {
    let mut risk = BASE_RISK;

    match contract_type {
        ContractType::FirmFixedPrice => risk += 0.05,
        ContractType::TimeAndMaterials => risk -= 0.05,
        ContractType::CostPlusFixedFee | ContractType::Other => {}
    }

    if performance_period_months > LONG_PERIOD_MONTHS {
        risk += 0.10;
    }
    if estimated_value > LARGE_CONTRACT_VALUE {
        risk += 0.05;
    }

    risk.clamp(0.0, MAX_RISK_FACTOR)
}
