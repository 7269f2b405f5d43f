//! Cash flow time series

use serde::Serialize;

use crate::error::{ensure_non_negative, FinanceError, FinanceResult};

/// Default days until an invoice is due
pub const DEFAULT_PAYMENT_TERMS_DAYS: u32 = 30;
/// Default average days to collect
pub const DEFAULT_COLLECTION_PERIOD_DAYS: u32 = 45;

/// One month of projected cash movement
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyFlow {
    /// Project month, 1-based
    pub month: u32,
    pub inflow: f64,
    pub outflow: f64,
    /// `inflow - outflow`
    pub net: f64,
    /// Running balance including this month
    pub cumulative: f64,
}

/// Several months beyond the exact horizon rolled into one record
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TailPeriod {
    /// First project month covered, inclusive
    pub start_month: u32,
    /// Last project month covered, inclusive
    pub end_month: u32,
    pub inflow: f64,
    pub outflow: f64,
    pub net: f64,
    /// Running balance at the end of the period
    pub cumulative: f64,
}

impl TailPeriod {
    /// Number of months covered
    pub fn len(&self) -> u32 {
        self.end_month - self.start_month + 1
    }

    /// Always false; a tail period covers at least one month
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Finite, fully materialized cash flow projection.
///
/// `cumulative(0)` is 0 and every record's cumulative equals the previous
/// record's cumulative plus its net. Months past the exact horizon are
/// presented as tail periods, but every derived figure (peak, payback,
/// totals, [`CashFlowSeries::expanded`]) reads the exact monthly records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashFlowSeries {
    months: Vec<MonthlyFlow>,
    tail: Vec<TailPeriod>,
    #[serde(skip)]
    monthly: Vec<MonthlyFlow>,
    peak_cash_requirement: f64,
    payback_period: Option<u32>,
    payment_terms_days: u32,
    collection_period_days: u32,
}

impl CashFlowSeries {
    /// Build an uncompacted series from `(inflow, outflow)` pairs, month 1 first
    pub fn from_flows(flows: &[(f64, f64)]) -> FinanceResult<Self> {
        let horizon = u32::try_from(flows.len()).map_err(|_| {
            FinanceError::invalid_input("flows", "too many months for a projection")
        })?;
        Self::build(flows, horizon.max(1), 1)
    }

    /// Build a series keeping `exact_horizon` exact months and bucketing the
    /// rest into periods of `tail_width` months.
    pub(crate) fn build(
        flows: &[(f64, f64)],
        exact_horizon: u32,
        tail_width: u32,
    ) -> FinanceResult<Self> {
        if flows.is_empty() {
            return Err(FinanceError::invalid_input(
                "flows",
                "a projection needs at least one month",
            ));
        }
        if exact_horizon == 0 || tail_width == 0 {
            return Err(FinanceError::invalid_input(
                "exact_horizon",
                "horizon and tail width must be >= 1",
            ));
        }
        for (inflow, outflow) in flows {
            ensure_non_negative("inflow", *inflow)?;
            ensure_non_negative("outflow", *outflow)?;
        }

        let mut cumulative = 0.0;
        let full: Vec<MonthlyFlow> = flows
            .iter()
            .enumerate()
            .map(|(i, &(inflow, outflow))| {
                let net = inflow - outflow;
                cumulative += net;
                MonthlyFlow {
                    month: i as u32 + 1,
                    inflow,
                    outflow,
                    net,
                    cumulative,
                }
            })
            .collect();

        let peak_cash_requirement = full
            .iter()
            .map(|m| m.cumulative)
            .fold(f64::INFINITY, f64::min);
        let payback_period = full.iter().find(|m| m.cumulative >= 0.0).map(|m| m.month);

        let split = (exact_horizon as usize).min(full.len());
        let months = full[..split].to_vec();
        let mut tail = Vec::new();
        for chunk in full[split..].chunks(tail_width as usize) {
            let (first, last) = match (chunk.first(), chunk.last()) {
                (Some(first), Some(last)) => (first, last),
                _ => continue,
            };
            let inflow: f64 = chunk.iter().map(|m| m.inflow).sum();
            let outflow: f64 = chunk.iter().map(|m| m.outflow).sum();
            tail.push(TailPeriod {
                start_month: first.month,
                end_month: last.month,
                inflow,
                outflow,
                net: inflow - outflow,
                cumulative: last.cumulative,
            });
        }

        Ok(Self {
            months,
            tail,
            monthly: full,
            peak_cash_requirement,
            payback_period,
            payment_terms_days: DEFAULT_PAYMENT_TERMS_DAYS,
            collection_period_days: DEFAULT_COLLECTION_PERIOD_DAYS,
        })
    }

    pub(crate) fn with_payment_terms(
        mut self,
        payment_terms_days: u32,
        collection_days: u32,
    ) -> Self {
        self.payment_terms_days = payment_terms_days;
        self.collection_period_days = collection_days;
        self
    }

    /// Exact per-month records
    pub fn months(&self) -> &[MonthlyFlow] {
        &self.months
    }

    /// Coarse records past the exact horizon
    pub fn tail(&self) -> &[TailPeriod] {
        &self.tail
    }

    /// Most negative cumulative balance over the full period
    pub fn peak_cash_requirement(&self) -> f64 {
        self.peak_cash_requirement
    }

    /// First month the cumulative balance is non-negative
    pub fn payback_period(&self) -> Option<u32> {
        self.payback_period
    }

    pub fn payment_terms_days(&self) -> u32 {
        self.payment_terms_days
    }

    pub fn collection_period_days(&self) -> u32 {
        self.collection_period_days
    }

    /// Total months covered, exact plus tail
    pub fn period_months(&self) -> u32 {
        self.monthly.len() as u32
    }

    pub fn total_inflow(&self) -> f64 {
        self.monthly.iter().map(|m| m.inflow).sum()
    }

    pub fn total_outflow(&self) -> f64 {
        self.monthly.iter().map(|m| m.outflow).sum()
    }

    /// Balance at the end of the last month
    pub fn closing_balance(&self) -> f64 {
        self.monthly.last().map(|m| m.cumulative).unwrap_or(0.0)
    }

    /// Cumulative balance after `month`; 0 for month 0, `None` past the end
    pub fn cumulative_at(&self, month: u32) -> Option<f64> {
        if month == 0 {
            return Some(0.0);
        }
        self.monthly.get(month as usize - 1).map(|m| m.cumulative)
    }

    /// Exact per-month records over the whole period, tail months included
    pub fn expanded(&self) -> Vec<MonthlyFlow> {
        self.monthly.clone()
    }

    /// Monthly net flows over the whole period
    pub fn net_flows(&self) -> Vec<f64> {
        self.monthly.iter().map(|m| m.net).collect()
    }
}
