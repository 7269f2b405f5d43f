//! Raw budget parameters

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::CompanyRates;
use crate::error::{ensure_non_negative, FinanceResult};

/// Upper end of the range rates are expected to fall in
const EXPECTED_MAX_RATE: f64 = 500.0;

/// Budget parameters for one project budget version.
///
/// Rates are percentages (`30.0` means 30%). Amounts are in contract currency.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetInputs {
    /// Direct labor hours
    pub direct_labor_hours: f64,
    /// Blended direct labor rate per hour
    pub direct_labor_rate: f64,
    /// Indirect labor added to the labor pool as-is
    pub indirect_labor_cost: f64,
    /// Fringe benefits rate
    pub fringe_rate: f64,
    /// Overhead rate
    pub overhead_rate: f64,
    /// General & administrative rate
    pub ga_rate: f64,
    /// Fee rate
    pub fee_rate: f64,
    pub materials_cost: f64,
    pub equipment_cost: f64,
    pub travel_cost: f64,
    pub subcontractor_cost: f64,
    pub other_direct_costs: f64,
}

impl BudgetInputs {
    /// Labor-only inputs carrying the given company rates
    pub fn with_company_rates(hours: f64, rate: f64, rates: &CompanyRates) -> Self {
        Self {
            direct_labor_hours: hours,
            direct_labor_rate: rate,
            fringe_rate: rates.fringe_rate,
            overhead_rate: rates.overhead_rate,
            ga_rate: rates.ga_rate,
            fee_rate: rates.fee_rate,
            ..Default::default()
        }
    }

    /// Sum of the itemized other-direct-cost categories
    pub fn other_direct_total(&self) -> f64 {
        self.materials_cost
            + self.equipment_cost
            + self.travel_cost
            + self.subcontractor_cost
            + self.other_direct_costs
    }

    /// Reject negative or non-finite values
    pub fn validate(&self) -> FinanceResult<()> {
        ensure_non_negative("direct_labor_hours", self.direct_labor_hours)?;
        ensure_non_negative("direct_labor_rate", self.direct_labor_rate)?;
        ensure_non_negative("indirect_labor_cost", self.indirect_labor_cost)?;
        ensure_non_negative("materials_cost", self.materials_cost)?;
        ensure_non_negative("equipment_cost", self.equipment_cost)?;
        ensure_non_negative("travel_cost", self.travel_cost)?;
        ensure_non_negative("subcontractor_cost", self.subcontractor_cost)?;
        ensure_non_negative("other_direct_costs", self.other_direct_costs)?;

        for (name, rate) in self.rates() {
            ensure_non_negative(name, rate)?;
            if rate > EXPECTED_MAX_RATE {
                warn!(rate_name = name, rate, "Rate above expected range");
            }
        }

        Ok(())
    }

    fn rates(&self) -> [(&'static str, f64); 4] {
        [
            ("fringe_rate", self.fringe_rate),
            ("overhead_rate", self.overhead_rate),
            ("ga_rate", self.ga_rate),
            ("fee_rate", self.fee_rate),
        ]
    }
}
