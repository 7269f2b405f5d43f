//! Cost cascade calculation

use tracing::{debug, info};

use super::inputs::BudgetInputs;
use super::stack::CostStack;
use crate::error::FinanceResult;

/// Converts budget inputs into a [`CostStack`]. Pure and stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct CostStackCalculator;

impl CostStackCalculator {
    /// Create a new calculator
    pub fn new() -> Self {
        Self
    }

    /// Compute version 1 of a cost stack
    pub fn calculate(&self, inputs: &BudgetInputs) -> FinanceResult<CostStack> {
        self.build(inputs, 1)
    }

    /// Apply `edit` to a copy of the stack's inputs and compute the next version.
    ///
    /// `previous` is left untouched.
    pub fn revise<F>(&self, previous: &CostStack, edit: F) -> FinanceResult<CostStack>
    where
        F: FnOnce(&mut BudgetInputs),
    {
        let mut inputs = *previous.inputs();
        edit(&mut inputs);
        self.build(&inputs, previous.version() + 1)
    }

    fn build(&self, inputs: &BudgetInputs, version: u32) -> FinanceResult<CostStack> {
        inputs.validate()?;

        let direct_labor_cost = inputs.direct_labor_hours * inputs.direct_labor_rate;
        let fringe_cost = direct_labor_cost * pct(inputs.fringe_rate);
        let total_labor_cost = direct_labor_cost + fringe_cost + inputs.indirect_labor_cost;
        let total_direct_cost = total_labor_cost + inputs.other_direct_total();

        let overhead_cost = total_direct_cost * pct(inputs.overhead_rate);
        let ga_cost = (total_direct_cost + overhead_cost) * pct(inputs.ga_rate);
        let total_indirect_cost = overhead_cost + ga_cost;
        let total_cost = total_direct_cost + total_indirect_cost;

        let fee_amount = total_cost * pct(inputs.fee_rate);
        let total_price = total_cost + fee_amount;

        debug!(
            direct_labor_cost,
            total_direct_cost, total_indirect_cost, "Cost cascade computed"
        );
        info!(version, total_cost, total_price, "Calculated cost stack");

        Ok(CostStack {
            version,
            inputs: *inputs,
            direct_labor_cost,
            fringe_cost,
            total_labor_cost,
            total_direct_cost,
            overhead_cost,
            ga_cost,
            total_indirect_cost,
            total_cost,
            fee_amount,
            total_price,
        })
    }
}

fn pct(rate: f64) -> f64 {
    rate / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scenario_a() -> BudgetInputs {
        BudgetInputs {
            direct_labor_hours: 1000.0,
            direct_labor_rate: 100.0,
            fringe_rate: 30.0,
            overhead_rate: 100.0,
            ga_rate: 15.0,
            fee_rate: 10.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_cascade_matches_reference_budget() {
        let stack = CostStackCalculator::new().calculate(&scenario_a()).unwrap();

        assert_relative_eq!(stack.direct_labor_cost(), 100_000.0, epsilon = 1e-6);
        assert_relative_eq!(stack.fringe_cost(), 30_000.0, epsilon = 1e-6);
        assert_relative_eq!(stack.total_labor_cost(), 130_000.0, epsilon = 1e-6);
        assert_relative_eq!(stack.total_direct_cost(), 130_000.0, epsilon = 1e-6);
        assert_relative_eq!(stack.overhead_cost(), 130_000.0, epsilon = 1e-6);
        assert_relative_eq!(stack.ga_cost(), 39_000.0, epsilon = 1e-6);
        assert_relative_eq!(stack.total_indirect_cost(), 169_000.0, epsilon = 1e-6);
        assert_relative_eq!(stack.total_cost(), 299_000.0, epsilon = 1e-6);
        assert_relative_eq!(stack.fee_amount(), 29_900.0, epsilon = 1e-6);
        assert_relative_eq!(stack.total_price(), 328_900.0, epsilon = 1e-6);
        assert_eq!(stack.version(), 1);
    }

    #[test]
    fn test_ga_base_includes_overhead() {
        let inputs = BudgetInputs {
            materials_cost: 1000.0,
            overhead_rate: 50.0,
            ga_rate: 10.0,
            ..Default::default()
        };
        let stack = CostStackCalculator::new().calculate(&inputs).unwrap();
        assert_relative_eq!(stack.overhead_cost(), 500.0);
        assert_relative_eq!(stack.ga_cost(), 150.0);
    }

    #[test]
    fn test_other_direct_costs_flow_into_direct_cost() {
        let inputs = BudgetInputs {
            indirect_labor_cost: 500.0,
            travel_cost: 250.0,
            subcontractor_cost: 1250.0,
            ..Default::default()
        };
        let stack = CostStackCalculator::new().calculate(&inputs).unwrap();
        assert_relative_eq!(stack.total_labor_cost(), 500.0);
        assert_relative_eq!(stack.total_direct_cost(), 2000.0);
        assert_relative_eq!(stack.total_cost(), 2000.0);
        assert_relative_eq!(stack.total_price(), 2000.0);
    }

    #[test]
    fn test_zero_hours_yields_zero_labor() {
        let inputs = BudgetInputs {
            direct_labor_hours: 0.0,
            ..scenario_a()
        };
        let stack = CostStackCalculator::new().calculate(&inputs).unwrap();
        assert_eq!(stack.direct_labor_cost(), 0.0);
        assert_eq!(stack.total_price(), 0.0);
        assert_eq!(stack.margin_pct(), 0.0);
        assert_eq!(stack.fee_ratio(), 0.0);
    }

    #[test]
    fn test_invalid_inputs_fail_without_result() {
        let inputs = BudgetInputs {
            direct_labor_rate: -100.0,
            ..scenario_a()
        };
        let err = CostStackCalculator::new().calculate(&inputs).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_identical_inputs_are_bit_identical() {
        let calculator = CostStackCalculator::new();
        let a = calculator.calculate(&scenario_a()).unwrap();
        let b = calculator.calculate(&scenario_a()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.total_price().to_bits(), b.total_price().to_bits());
    }

    #[test]
    fn test_revise_creates_new_version() {
        let calculator = CostStackCalculator::new();
        let original = calculator.calculate(&scenario_a()).unwrap();
        let revised = calculator
            .revise(&original, |inputs| inputs.fee_rate = 12.0)
            .unwrap();

        assert_eq!(original.version(), 1);
        assert_eq!(revised.version(), 2);
        assert_eq!(original.inputs().fee_rate, 10.0);
        assert_eq!(revised.inputs().fee_rate, 12.0);
        assert_eq!(original.total_cost(), revised.total_cost());
        assert!(revised.total_price() > original.total_price());
    }

    #[test]
    fn test_invalid_revision_keeps_previous() {
        let calculator = CostStackCalculator::new();
        let original = calculator.calculate(&scenario_a()).unwrap();
        let result = calculator.revise(&original, |inputs| inputs.travel_cost = -1.0);
        assert!(result.is_err());
        assert_eq!(original.inputs().travel_cost, 0.0);
    }

    #[test]
    fn test_margin_pct() {
        let stack = CostStackCalculator::new().calculate(&scenario_a()).unwrap();
        assert_relative_eq!(stack.margin_pct(), 29_900.0 / 328_900.0 * 100.0);
        assert_relative_eq!(stack.fee_ratio(), 0.10, epsilon = 1e-12);
    }
}
