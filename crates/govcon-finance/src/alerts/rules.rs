//! Alert rules

use super::alert::{Alert, AlertSeverity};
use crate::cash_flow::CashFlowSeries;
use crate::cost_stack::CostStack;

/// Computed values a rule inspects
#[derive(Debug, Clone, Copy)]
pub struct AlertContext<'a> {
    pub cost_stack: &'a CostStack,
    pub cash_flow: &'a CashFlowSeries,
}

/// A threshold rule evaluated on every alert pass.
///
/// Each rule reads one numeric parameter from its entry in the
/// [`super::ThresholdConfig`], falling back to `default_threshold`.
pub trait AlertRule: Send + Sync {
    /// Rule name, also the key in the threshold mapping
    fn name(&self) -> &str;

    /// Parameter name inside the rule's mapping entry
    fn parameter(&self) -> &str;

    /// Threshold used when the mapping has no entry for this rule
    fn default_threshold(&self) -> f64;

    /// Returns an alert candidate when the threshold is breached
    fn evaluate(&self, context: &AlertContext<'_>, threshold: f64) -> Option<Alert>;
}

/// Fires when the margin over price drops below `min_margin_pct`
#[derive(Debug, Clone, Copy, Default)]
pub struct LowMarginRule;

impl AlertRule for LowMarginRule {
    fn name(&self) -> &str {
        "low_margin"
    }

    fn parameter(&self) -> &str {
        "min_margin_pct"
    }

    fn default_threshold(&self) -> f64 {
        15.0
    }

    fn evaluate(&self, context: &AlertContext<'_>, threshold: f64) -> Option<Alert> {
        let margin_pct = context.cost_stack.margin_pct();
        if margin_pct >= threshold {
            return None;
        }

        Some(Alert::new(
            self.name(),
            AlertSeverity::High,
            "Low Profit Margin Warning",
            threshold,
            margin_pct,
            format!(
                "Project margin is only {:.1}%, below the {:.1}% minimum",
                margin_pct, threshold
            ),
            vec![
                "Review labor rates for competitiveness".to_string(),
                "Consider reducing indirect cost rates".to_string(),
                "Evaluate scope for potential reductions".to_string(),
            ],
        ))
    }
}

/// Fires when the peak cash requirement falls below `max_negative`
#[derive(Debug, Clone, Copy, Default)]
pub struct NegativeCashFlowRule;

impl AlertRule for NegativeCashFlowRule {
    fn name(&self) -> &str {
        "negative_cash_flow"
    }

    fn parameter(&self) -> &str {
        "max_negative"
    }

    fn default_threshold(&self) -> f64 {
        -100_000.0
    }

    fn evaluate(&self, context: &AlertContext<'_>, threshold: f64) -> Option<Alert> {
        let peak = context.cash_flow.peak_cash_requirement();
        if peak >= threshold {
            return None;
        }

        Some(Alert::new(
            self.name(),
            AlertSeverity::Medium,
            "Negative Cash Flow Alert",
            threshold,
            peak,
            format!(
                "Peak cash requirement of ${:.0} exceeds the ${:.0} limit",
                peak.abs(),
                threshold.abs()
            ),
            vec![
                "Arrange line of credit for cash flow gaps".to_string(),
                "Negotiate faster payment terms".to_string(),
                "Consider milestone-based payments".to_string(),
            ],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost_stack::{BudgetInputs, CostStackCalculator};

    fn stack(fee_rate: f64) -> CostStack {
        CostStackCalculator::new()
            .calculate(&BudgetInputs {
                direct_labor_hours: 100.0,
                direct_labor_rate: 100.0,
                fee_rate,
                ..Default::default()
            })
            .unwrap()
    }

    #[test]
    fn test_low_margin_boundary() {
        let stack = stack(25.0); // margin = 20%
        let series = CashFlowSeries::from_flows(&[(0.0, 1.0)]).unwrap();
        let context = AlertContext {
            cost_stack: &stack,
            cash_flow: &series,
        };
        assert!(LowMarginRule.evaluate(&context, 19.9).is_none());
        let alert = LowMarginRule.evaluate(&context, 20.5).unwrap();
        assert_eq!(alert.severity, AlertSeverity::High);
        assert_eq!(alert.rule, "low_margin");
        assert_eq!(alert.recommended_actions.len(), 3);
    }

    #[test]
    fn test_zero_price_margin_is_zero() {
        let empty = CostStackCalculator::new()
            .calculate(&BudgetInputs::default())
            .unwrap();
        let series = CashFlowSeries::from_flows(&[(0.0, 0.0)]).unwrap();
        let context = AlertContext {
            cost_stack: &empty,
            cash_flow: &series,
        };
        let alert = LowMarginRule.evaluate(&context, 15.0).unwrap();
        assert_eq!(alert.current_value, 0.0);
    }

    #[test]
    fn test_negative_cash_flow() {
        let stack = stack(10.0);
        let series = CashFlowSeries::from_flows(&[(0.0, 150_000.0), (200_000.0, 0.0)]).unwrap();
        let context = AlertContext {
            cost_stack: &stack,
            cash_flow: &series,
        };
        let alert = NegativeCashFlowRule
            .evaluate(&context, -100_000.0)
            .unwrap();
        assert_eq!(alert.severity, AlertSeverity::Medium);
        assert_eq!(alert.current_value, -150_000.0);
        assert!(NegativeCashFlowRule.evaluate(&context, -200_000.0).is_none());
    }
}
