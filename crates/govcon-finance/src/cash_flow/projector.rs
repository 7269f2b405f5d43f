//! Cash flow projector

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::distribution::{monthly_weights, DistributionProfile};
use super::series::{CashFlowSeries, DEFAULT_COLLECTION_PERIOD_DAYS, DEFAULT_PAYMENT_TERMS_DAYS};
use crate::config::EngineConfig;
use crate::cost_stack::CostStack;
use crate::error::{ensure_non_negative, FinanceError, FinanceResult};

/// Parameters for one projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionParams {
    /// Cost to spread over the period
    pub total_cost: f64,
    /// Contract performance period, >= 1
    pub performance_period_months: u32,
    /// Billing markup over outflow, e.g. 0.10 bills 110% of cost
    pub inflow_markup: f64,
    /// Months with no inflow at the start of the period
    pub invoice_lag_months: u32,
}

impl ProjectionParams {
    /// Params with the default 10% markup and 2-month invoice lag
    pub fn new(total_cost: f64, performance_period_months: u32) -> Self {
        Self {
            total_cost,
            performance_period_months,
            inflow_markup: 0.10,
            invoice_lag_months: 2,
        }
    }

    /// Params taking markup and invoice lag from the engine configuration
    pub fn from_config(
        total_cost: f64,
        performance_period_months: u32,
        config: &EngineConfig,
    ) -> Self {
        Self {
            total_cost,
            performance_period_months,
            inflow_markup: config.inflow_markup,
            invoice_lag_months: config.invoice_lag_months,
        }
    }

    /// Params billing at the stack's own fee ratio
    pub fn from_cost_stack(stack: &CostStack, performance_period_months: u32) -> Self {
        Self {
            inflow_markup: stack.fee_ratio(),
            ..Self::new(stack.total_cost(), performance_period_months)
        }
    }

    pub fn with_markup(mut self, inflow_markup: f64) -> Self {
        self.inflow_markup = inflow_markup;
        self
    }

    pub fn with_invoice_lag(mut self, invoice_lag_months: u32) -> Self {
        self.invoice_lag_months = invoice_lag_months;
        self
    }

    /// Check value ranges
    pub fn validate(&self) -> FinanceResult<()> {
        ensure_non_negative("total_cost", self.total_cost)?;
        ensure_non_negative("inflow_markup", self.inflow_markup)?;
        if self.performance_period_months == 0 {
            return Err(FinanceError::invalid_input(
                "performance_period_months",
                "must be >= 1",
            ));
        }
        Ok(())
    }
}

/// Spreads cost over a timeline into inflow, outflow and cumulative series
#[derive(Debug, Clone)]
pub struct CashFlowProjector {
    distribution: DistributionProfile,
    exact_horizon_months: u32,
    tail_period_months: u32,
    payment_terms_days: u32,
    collection_period_days: u32,
}

impl Default for CashFlowProjector {
    fn default() -> Self {
        Self::new(DistributionProfile::SCurve)
    }
}

impl CashFlowProjector {
    /// Projector with a 24-month exact horizon and quarterly tail
    pub fn new(distribution: DistributionProfile) -> Self {
        Self {
            distribution,
            exact_horizon_months: 24,
            tail_period_months: 3,
            payment_terms_days: DEFAULT_PAYMENT_TERMS_DAYS,
            collection_period_days: DEFAULT_COLLECTION_PERIOD_DAYS,
        }
    }

    /// Projector shaped by the engine configuration
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            distribution: config.distribution,
            exact_horizon_months: config.exact_horizon_months.max(1),
            tail_period_months: config.tail_period_months.max(1),
            ..Self::new(config.distribution)
        }
    }

    /// Override the exact horizon and tail width
    pub fn with_horizon(mut self, exact_horizon_months: u32, tail_period_months: u32) -> Self {
        self.exact_horizon_months = exact_horizon_months.max(1);
        self.tail_period_months = tail_period_months.max(1);
        self
    }

    pub fn distribution(&self) -> DistributionProfile {
        self.distribution
    }

    /// Monthly outflows for the period; they sum to `total_cost`
    pub fn distribute(&self, total_cost: f64, months: u32) -> FinanceResult<Vec<f64>> {
        ProjectionParams::new(total_cost, months).validate()?;
        Ok(monthly_weights(self.distribution, months)
            .into_iter()
            .map(|w| w * total_cost)
            .collect())
    }

    /// Project a full cash flow series
    pub fn project(&self, params: &ProjectionParams) -> FinanceResult<CashFlowSeries> {
        params.validate()?;

        let outflows = self.distribute(params.total_cost, params.performance_period_months)?;
        let flows: Vec<(f64, f64)> = outflows
            .iter()
            .enumerate()
            .map(|(i, &outflow)| {
                let month = i as u32 + 1;
                let inflow = if month > params.invoice_lag_months {
                    outflow * (1.0 + params.inflow_markup)
                } else {
                    0.0
                };
                (inflow, outflow)
            })
            .collect();

        debug!(
            months = params.performance_period_months,
            distribution = %self.distribution,
            "Distributed cost over performance period"
        );

        let series =
            CashFlowSeries::build(&flows, self.exact_horizon_months, self.tail_period_months)?
                .with_payment_terms(self.payment_terms_days, self.collection_period_days);

        info!(
            total_cost = params.total_cost,
            months = params.performance_period_months,
            peak_cash_requirement = series.peak_cash_requirement(),
            payback_period = ?series.payback_period(),
            "Projected cash flow"
        );

        Ok(series)
    }
}
