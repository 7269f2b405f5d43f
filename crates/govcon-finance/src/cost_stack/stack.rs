//! Computed cost stack

use serde::Serialize;

use super::inputs::BudgetInputs;

/// Fully loaded cost and price breakdown derived from one [`BudgetInputs`] version.
///
/// Only [`super::CostStackCalculator`] constructs a stack; edits go through
/// [`super::CostStackCalculator::revise`], which returns a new version.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostStack {
    pub(super) version: u32,
    pub(super) inputs: BudgetInputs,
    pub(super) direct_labor_cost: f64,
    pub(super) fringe_cost: f64,
    pub(super) total_labor_cost: f64,
    pub(super) total_direct_cost: f64,
    pub(super) overhead_cost: f64,
    pub(super) ga_cost: f64,
    pub(super) total_indirect_cost: f64,
    pub(super) total_cost: f64,
    pub(super) fee_amount: f64,
    pub(super) total_price: f64,
}

impl CostStack {
    /// Budget version, starting at 1
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Inputs this stack was derived from
    pub fn inputs(&self) -> &BudgetInputs {
        &self.inputs
    }

    pub fn direct_labor_cost(&self) -> f64 {
        self.direct_labor_cost
    }

    pub fn fringe_cost(&self) -> f64 {
        self.fringe_cost
    }

    pub fn total_labor_cost(&self) -> f64 {
        self.total_labor_cost
    }

    pub fn total_direct_cost(&self) -> f64 {
        self.total_direct_cost
    }

    pub fn overhead_cost(&self) -> f64 {
        self.overhead_cost
    }

    pub fn ga_cost(&self) -> f64 {
        self.ga_cost
    }

    pub fn total_indirect_cost(&self) -> f64 {
        self.total_indirect_cost
    }

    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    pub fn fee_amount(&self) -> f64 {
        self.fee_amount
    }

    pub fn total_price(&self) -> f64 {
        self.total_price
    }

    /// Price minus cost
    pub fn gross_margin(&self) -> f64 {
        self.total_price - self.total_cost
    }

    /// Margin as a percentage of price, 0 when the price is 0
    pub fn margin_pct(&self) -> f64 {
        if self.total_price > 0.0 {
            self.gross_margin() / self.total_price * 100.0
        } else {
            0.0
        }
    }

    /// Fee as a fraction of cost, 0 when the cost is 0
    pub fn fee_ratio(&self) -> f64 {
        if self.total_cost > 0.0 {
            self.fee_amount / self.total_cost
        } else {
            0.0
        }
    }
}
