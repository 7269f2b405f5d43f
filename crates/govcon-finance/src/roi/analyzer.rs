//! ROI metrics

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::risk::MAX_RISK_FACTOR;
use crate::cash_flow::CashFlowSeries;
use crate::config::EngineConfig;
use crate::cost_stack::CostStack;
use crate::error::{FinanceError, FinanceResult};

const IRR_MAX_ITERATIONS: usize = 200;
const IRR_TOLERANCE: f64 = 1e-10;
// Monthly rate search bracket
const IRR_LOWER_BOUND: f64 = -0.9;
const IRR_UPPER_BOUND: f64 = 10.0;

/// Per-project analysis inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoiInputs {
    pub performance_period_months: u32,
    /// Risk factor in `[0, 0.5]`
    pub risk_factor: f64,
    /// Overrides the analyzer's annual discount rate when set
    pub annual_discount_rate: Option<f64>,
}

impl RoiInputs {
    pub fn new(performance_period_months: u32, risk_factor: f64) -> Self {
        Self {
            performance_period_months,
            risk_factor,
            annual_discount_rate: None,
        }
    }

    pub fn with_discount_rate(mut self, annual_discount_rate: f64) -> Self {
        self.annual_discount_rate = Some(annual_discount_rate);
        self
    }

    pub fn validate(&self) -> FinanceResult<()> {
        if self.performance_period_months == 0 {
            return Err(FinanceError::invalid_input(
                "performance_period_months",
                "must be >= 1",
            ));
        }
        if !self.risk_factor.is_finite() || !(0.0..=MAX_RISK_FACTOR).contains(&self.risk_factor) {
            return Err(FinanceError::invalid_input(
                "risk_factor",
                format!("must be within [0, {}], got {}", MAX_RISK_FACTOR, self.risk_factor),
            ));
        }
        if let Some(rate) = self.annual_discount_rate {
            if !rate.is_finite() || rate <= -12.0 {
                return Err(FinanceError::invalid_input(
                    "annual_discount_rate",
                    format!("must be finite and > -12, got {}", rate),
                ));
            }
        }
        Ok(())
    }
}

/// Derived ROI metrics for one project
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoiMetrics {
    pub gross_profit: f64,
    /// Gross profit over total cost, percent
    pub roi_pct: f64,
    pub annualized_roi: f64,
    pub risk_adjusted_roi: f64,
    pub npv: f64,
    /// Ratio approximation `((Σ positive / Σ |negative|)^(1/len) − 1) × 12`.
    /// Not a true IRR; `None` when there are no negative net flows.
    pub irr_approx: Option<f64>,
    /// Annualized IRR solved by bisection, `None` without a sign change
    pub irr: Option<f64>,
    pub payback_period: Option<u32>,
    /// Return forgone on the labor tied up for the period
    pub opportunity_cost: f64,
    /// Gross profit over total price, percent
    pub margin_pct: f64,
    pub risk_factor: f64,
    pub performance_period_months: u32,
}

/// Computes [`RoiMetrics`] from a cost stack and cash flow series
#[derive(Debug, Clone, Copy)]
pub struct RoiAnalyzer {
    annual_discount_rate: f64,
    opportunity_margin: f64,
}

impl Default for RoiAnalyzer {
    fn default() -> Self {
        Self {
            annual_discount_rate: 0.10,
            opportunity_margin: 0.15,
        }
    }
}

impl RoiAnalyzer {
    pub fn new(annual_discount_rate: f64, opportunity_margin: f64) -> Self {
        Self {
            annual_discount_rate,
            opportunity_margin,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.annual_discount_rate, config.opportunity_margin)
    }

    pub fn analyze(
        &self,
        cost_stack: &CostStack,
        cash_flow: &CashFlowSeries,
        inputs: &RoiInputs,
    ) -> FinanceResult<RoiMetrics> {
        inputs.validate()?;

        let months = inputs.performance_period_months;
        let gross_profit = cost_stack.gross_margin();
        let roi_pct = guarded_ratio(gross_profit, cost_stack.total_cost()) * 100.0;
        let annualized_roi = roi_pct * (12.0 / months as f64);
        let risk_adjusted_roi = roi_pct * (1.0 - inputs.risk_factor);

        let monthly_rate = inputs
            .annual_discount_rate
            .unwrap_or(self.annual_discount_rate)
            / 12.0;
        let net_flows = cash_flow.net_flows();
        let npv = net_present_value(&net_flows, monthly_rate);
        let irr_approx = ratio_irr(&net_flows);
        let irr = solve_irr(&net_flows).map(|monthly| monthly * 12.0);

        let labor_tied_up =
            cost_stack.direct_labor_cost() + cost_stack.inputs().indirect_labor_cost;
        let opportunity_cost = labor_tied_up * self.opportunity_margin * (months as f64 / 12.0);

        debug!(npv, ?irr_approx, ?irr, opportunity_cost, "Time-value metrics");
        info!(roi_pct, annualized_roi, risk_adjusted_roi, "ROI analyzed");

        Ok(RoiMetrics {
            gross_profit,
            roi_pct,
            annualized_roi,
            risk_adjusted_roi,
            npv,
            irr_approx,
            irr,
            payback_period: cash_flow.payback_period(),
            opportunity_cost,
            margin_pct: cost_stack.margin_pct(),
            risk_factor: inputs.risk_factor,
            performance_period_months: months,
        })
    }
}

fn guarded_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// `Σ net(m) / (1 + r)^m` for months `m = 1..=N`
pub(crate) fn net_present_value(net_flows: &[f64], monthly_rate: f64) -> f64 {
    net_flows
        .iter()
        .enumerate()
        .map(|(i, net)| net / (1.0 + monthly_rate).powi(i as i32 + 1))
        .sum()
}

fn ratio_irr(net_flows: &[f64]) -> Option<f64> {
    let positive: f64 = net_flows.iter().filter(|n| **n > 0.0).sum();
    let negative: f64 = net_flows.iter().filter(|n| **n < 0.0).sum::<f64>().abs();

    if negative == 0.0 || net_flows.is_empty() {
        return None;
    }
    let periodic = (positive / negative).powf(1.0 / net_flows.len() as f64) - 1.0;
    Some(periodic * 12.0)
}

/// Monthly rate where NPV crosses zero
fn solve_irr(net_flows: &[f64]) -> Option<f64> {
    let has_positive = net_flows.iter().any(|n| *n > 0.0);
    let has_negative = net_flows.iter().any(|n| *n < 0.0);
    if !(has_positive && has_negative) {
        return None;
    }

    let mut lo = IRR_LOWER_BOUND;
    let mut hi = IRR_UPPER_BOUND;
    let mut npv_lo = net_present_value(net_flows, lo);
    let npv_hi = net_present_value(net_flows, hi);

    if !npv_lo.is_finite() || !npv_hi.is_finite() || npv_lo.signum() == npv_hi.signum() {
        return None;
    }

    for _ in 0..IRR_MAX_ITERATIONS {
        let mid = (lo + hi) / 2.0;
        let npv_mid = net_present_value(net_flows, mid);

        if npv_mid == 0.0 || (hi - lo) / 2.0 < IRR_TOLERANCE {
            return Some(mid);
        }
        if npv_mid.signum() == npv_lo.signum() {
            lo = mid;
            npv_lo = npv_mid;
        } else {
            hi = mid;
        }
    }

    Some((lo + hi) / 2.0)
}
