//! Calendar-aligned portfolio aggregation

use chrono::{Months, NaiveDate};
use serde::Serialize;
use statistical::mean;
use std::collections::BTreeMap;
use tracing::{debug, info};

use super::position::{ProjectPosition, ProjectStatus};
use crate::error::{FinanceError, FinanceResult};

/// Portfolio totals for one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalendarMonthFlow {
    /// First day of the month
    pub month: NaiveDate,
    pub inflow: f64,
    pub outflow: f64,
    pub net: f64,
    pub cumulative: f64,
}

/// Portfolio-level cash position and rollups
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    /// Contiguous calendar months from the earliest to the latest project month
    pub calendar: Vec<CalendarMonthFlow>,
    /// Most negative aggregated cumulative balance, 0 for an empty portfolio
    pub peak_cash_requirement: f64,
    /// Funding needed to cover the peak, `max(0, -peak)`
    pub working_capital_requirement: f64,
    /// Calendar months with a positive aggregated net flow
    pub cash_positive_months: usize,
    /// Estimated value of projects still bidding
    pub total_pipeline_value: f64,
    /// Contract value of awarded and active projects
    pub active_contract_value: f64,
    pub project_count: usize,
    pub active_projects: usize,
    /// Mean margin over tracked projects, percent
    pub average_margin_pct: f64,
    /// Awarded or completed share of decided bids, percent
    pub win_rate_pct: f64,
}

/// Sums project cash flows by absolute calendar month.
///
/// Only bidding, awarded and active projects contribute to cash flow and the
/// value rollups; win rate looks at every position supplied.
#[derive(Debug, Clone, Copy, Default)]
pub struct PortfolioAggregator;

impl PortfolioAggregator {
    pub fn new() -> Self {
        Self
    }

    pub fn aggregate(&self, positions: &[ProjectPosition]) -> FinanceResult<PortfolioSummary> {
        for position in positions {
            position.validate()?;
        }

        let tracked: Vec<&ProjectPosition> =
            positions.iter().filter(|p| p.status.is_tracked()).collect();

        let calendar = build_calendar(&tracked)?;
        let peak_cash_requirement = calendar
            .iter()
            .map(|m| m.cumulative)
            .fold(None, |acc: Option<f64>, c| Some(acc.map_or(c, |a| a.min(c))))
            .unwrap_or(0.0);
        let cash_positive_months = calendar.iter().filter(|m| m.net > 0.0).count();

        let total_pipeline_value = tracked
            .iter()
            .filter(|p| p.status == ProjectStatus::Bidding)
            .map(|p| p.estimated_value)
            .sum();
        let active_contract_value = tracked
            .iter()
            .filter(|p| p.status.is_under_contract())
            .map(|p| p.booked_value())
            .sum();

        let margins: Vec<f64> = tracked.iter().map(|p| p.cost_stack.margin_pct()).collect();
        let average_margin_pct = if margins.is_empty() {
            0.0
        } else {
            mean(&margins)
        };

        let summary = PortfolioSummary {
            peak_cash_requirement,
            working_capital_requirement: (-peak_cash_requirement).max(0.0),
            cash_positive_months,
            total_pipeline_value,
            active_contract_value,
            project_count: tracked.len(),
            active_projects: tracked
                .iter()
                .filter(|p| p.status == ProjectStatus::Active)
                .count(),
            average_margin_pct,
            win_rate_pct: win_rate(positions),
            calendar,
        };

        info!(
            projects = summary.project_count,
            months = summary.calendar.len(),
            peak = summary.peak_cash_requirement,
            "Portfolio aggregated"
        );
        Ok(summary)
    }
}

fn build_calendar(positions: &[&ProjectPosition]) -> FinanceResult<Vec<CalendarMonthFlow>> {
    let mut totals: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();

    for position in positions {
        for flow in position.cash_flow.expanded() {
            let month = position.timeline.calendar_month(flow.month)?;
            let entry = totals.entry(month).or_insert((0.0, 0.0));
            entry.0 += flow.inflow;
            entry.1 += flow.outflow;
        }
    }

    let (first, last) = match (totals.keys().next(), totals.keys().next_back()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Ok(Vec::new()),
    };
    debug!(%first, %last, "Portfolio calendar range");

    let mut calendar = Vec::new();
    let mut cumulative = 0.0;
    let mut month = first;
    while month <= last {
        let (inflow, outflow) = totals.get(&month).copied().unwrap_or((0.0, 0.0));
        let net = inflow - outflow;
        cumulative += net;
        calendar.push(CalendarMonthFlow {
            month,
            inflow,
            outflow,
            net,
            cumulative,
        });
        month = month.checked_add_months(Months::new(1)).ok_or_else(|| {
            FinanceError::invalid_input("start_date", "calendar month out of range")
        })?;
    }

    Ok(calendar)
}

fn win_rate(positions: &[ProjectPosition]) -> f64 {
    let decided = positions
        .iter()
        .filter(|p| {
            matches!(
                p.status,
                ProjectStatus::Awarded | ProjectStatus::Completed | ProjectStatus::Cancelled
            )
        })
        .count();
    let wins = positions
        .iter()
        .filter(|p| matches!(p.status, ProjectStatus::Awarded | ProjectStatus::Completed))
        .count();

    if decided == 0 {
        0.0
    } else {
        wins as f64 / decided as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cash_flow::{CashFlowProjector, CashFlowSeries, ProjectionParams};
    use crate::cost_stack::{BudgetInputs, CostStackCalculator};
    use crate::portfolio::ProjectTimeline;
    use approx::assert_relative_eq;

    fn position(
        id: &str,
        status: ProjectStatus,
        start: (i32, u32),
        flows: &[(f64, f64)],
        fee_rate: f64,
    ) -> ProjectPosition {
        let cost_stack = CostStackCalculator::new()
            .calculate(&BudgetInputs {
                direct_labor_hours: 100.0,
                direct_labor_rate: 100.0,
                fee_rate,
                ..Default::default()
            })
            .unwrap();
        ProjectPosition {
            project_id: id.to_string(),
            name: format!("Project {}", id),
            status,
            estimated_value: 1_000_000.0,
            contract_value: None,
            timeline: ProjectTimeline::new(
                NaiveDate::from_ymd_opt(start.0, start.1, 1).unwrap(),
                flows.len() as u32,
            ),
            cost_stack,
            cash_flow: CashFlowSeries::from_flows(flows).unwrap(),
        }
    }

    #[test]
    fn test_empty_portfolio() {
        let summary = PortfolioAggregator::new().aggregate(&[]).unwrap();
        assert!(summary.calendar.is_empty());
        assert_eq!(summary.peak_cash_requirement, 0.0);
        assert_eq!(summary.working_capital_requirement, 0.0);
        assert_eq!(summary.average_margin_pct, 0.0);
        assert_eq!(summary.win_rate_pct, 0.0);
    }

    #[test]
    fn test_aligns_by_calendar_month() {
        let a_flows = [(0.0, 100.0), (250.0, 0.0)];
        let b_flows = [(0.0, 100.0), (150.0, 0.0)];
        let a = position("a", ProjectStatus::Active, (2024, 1), &a_flows, 10.0);
        let b = position("b", ProjectStatus::Active, (2024, 2), &b_flows, 10.0);
        let summary = PortfolioAggregator::new().aggregate(&[a, b]).unwrap();

        let nets: Vec<f64> = summary.calendar.iter().map(|m| m.net).collect();
        // Feb holds a's month 2 and b's month 1
        assert_eq!(nets, vec![-100.0, 150.0, 150.0]);
        assert_eq!(
            summary.calendar[1].month,
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );
        assert_eq!(summary.peak_cash_requirement, -100.0);
        assert_eq!(summary.working_capital_requirement, 100.0);
        assert_eq!(summary.cash_positive_months, 2);
    }

    #[test]
    fn test_gap_months_filled() {
        let a = position("a", ProjectStatus::Active, (2024, 1), &[(0.0, 10.0)], 10.0);
        let b = position("b", ProjectStatus::Awarded, (2024, 4), &[(30.0, 0.0)], 10.0);
        let summary = PortfolioAggregator::new().aggregate(&[a, b]).unwrap();
        assert_eq!(summary.calendar.len(), 4);
        assert_eq!(summary.calendar[2].net, 0.0);
        assert_eq!(summary.calendar[2].cumulative, -10.0);
        assert_eq!(summary.calendar[3].cumulative, 20.0);
    }

    #[test]
    fn test_rollups() {
        let mut awarded = position("a", ProjectStatus::Awarded, (2024, 1), &[(0.0, 1.0)], 25.0);
        awarded.contract_value = Some(900_000.0);
        let active = position("b", ProjectStatus::Active, (2024, 1), &[(0.0, 1.0)], 25.0);
        let bidding = position("c", ProjectStatus::Bidding, (2024, 1), &[(0.0, 1.0)], 25.0);
        let completed = position("d", ProjectStatus::Completed, (2023, 1), &[(5.0, 0.0)], 25.0);
        let cancelled = position("e", ProjectStatus::Cancelled, (2023, 1), &[(5.0, 0.0)], 25.0);

        let summary = PortfolioAggregator::new()
            .aggregate(&[awarded, active, bidding, completed, cancelled])
            .unwrap();

        assert_eq!(summary.project_count, 3);
        assert_eq!(summary.active_projects, 1);
        assert_relative_eq!(summary.total_pipeline_value, 1_000_000.0);
        assert_relative_eq!(summary.active_contract_value, 1_900_000.0);
        assert_relative_eq!(summary.average_margin_pct, 20.0, epsilon = 1e-9);
        // awarded + completed out of awarded, completed, cancelled
        assert_relative_eq!(summary.win_rate_pct, 200.0 / 3.0, epsilon = 1e-9);
        // completed and cancelled projects carry no cash flow
        assert_eq!(summary.calendar.len(), 1);
    }

    #[test]
    fn test_offsetting_projects_net_to_zero() {
        let flows = [(0.0, 40.0), (10.0, 20.0), (60.0, 0.0)];
        let mirrored: Vec<(f64, f64)> = flows.iter().map(|(i, o)| (*o, *i)).collect();
        let a = position("a", ProjectStatus::Active, (2025, 3), &flows, 10.0);
        let b = position("b", ProjectStatus::Active, (2025, 3), &mirrored, 10.0);

        let summary = PortfolioAggregator::new().aggregate(&[a, b]).unwrap();
        assert_eq!(summary.peak_cash_requirement, 0.0);
        assert_eq!(summary.cash_positive_months, 0);
    }

    #[test]
    fn test_single_project_keeps_project_peak_past_horizon() {
        let series = CashFlowProjector::default()
            .project(&ProjectionParams::new(299_000.0, 36).with_invoice_lag(29))
            .unwrap();
        assert!(!series.tail().is_empty());

        let mut long = position("a", ProjectStatus::Active, (2025, 1), &[(0.0, 1.0)], 10.0);
        long.timeline.performance_period_months = 36;
        long.cash_flow = series.clone();

        let summary = PortfolioAggregator::new().aggregate(&[long]).unwrap();
        assert_eq!(summary.calendar.len(), 36);
        assert_relative_eq!(
            summary.peak_cash_requirement,
            series.peak_cash_requirement(),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_invalid_position_rejected() {
        let mut bad = position("a", ProjectStatus::Active, (2024, 1), &[(0.0, 1.0)], 10.0);
        bad.estimated_value = -1.0;
        assert!(PortfolioAggregator::new().aggregate(&[bad]).is_err());
    }
}
