//! Project positions tracked in a portfolio

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::cash_flow::CashFlowSeries;
use crate::cost_stack::CostStack;
use crate::error::{ensure_non_negative, FinanceError, FinanceResult};

/// Project lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Prospect,
    Bidding,
    Awarded,
    Active,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    /// Statuses included in portfolio cash flow and rollups
    pub fn is_tracked(&self) -> bool {
        matches!(
            self,
            ProjectStatus::Bidding | ProjectStatus::Awarded | ProjectStatus::Active
        )
    }

    /// Statuses that hold a signed contract
    pub fn is_under_contract(&self) -> bool {
        matches!(self, ProjectStatus::Awarded | ProjectStatus::Active)
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectStatus::Prospect => write!(f, "prospect"),
            ProjectStatus::Bidding => write!(f, "bidding"),
            ProjectStatus::Awarded => write!(f, "awarded"),
            ProjectStatus::Active => write!(f, "active"),
            ProjectStatus::Completed => write!(f, "completed"),
            ProjectStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Calendar anchor of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectTimeline {
    pub start_date: NaiveDate,
    pub performance_period_months: u32,
}

impl ProjectTimeline {
    pub fn new(start_date: NaiveDate, performance_period_months: u32) -> Self {
        Self {
            start_date,
            performance_period_months,
        }
    }

    pub fn validate(&self) -> FinanceResult<()> {
        if self.performance_period_months == 0 {
            return Err(FinanceError::invalid_input(
                "performance_period_months",
                "must be >= 1",
            ));
        }
        Ok(())
    }

    /// First day of the calendar month holding project month `month` (1-based)
    pub fn calendar_month(&self, month: u32) -> FinanceResult<NaiveDate> {
        let anchor = self
            .start_date
            .with_day(1)
            .ok_or_else(|| FinanceError::invalid_input("start_date", "no first of month"))?;
        anchor
            .checked_add_months(Months::new(month.saturating_sub(1)))
            .ok_or_else(|| {
                FinanceError::invalid_input("start_date", "calendar month out of range")
            })
    }
}

/// One project as seen by the portfolio
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectPosition {
    pub project_id: String,
    pub name: String,
    pub status: ProjectStatus,
    pub estimated_value: f64,
    /// Awarded value; rollups fall back to `estimated_value` when absent
    pub contract_value: Option<f64>,
    pub timeline: ProjectTimeline,
    pub cost_stack: CostStack,
    pub cash_flow: CashFlowSeries,
}

impl ProjectPosition {
    pub fn validate(&self) -> FinanceResult<()> {
        self.timeline.validate()?;
        ensure_non_negative("estimated_value", self.estimated_value)?;
        if let Some(value) = self.contract_value {
            ensure_non_negative("contract_value", value)?;
        }
        Ok(())
    }

    /// Contract value, or the estimate when no contract value is known
    pub fn booked_value(&self) -> f64 {
        self.contract_value.unwrap_or(self.estimated_value)
    }
}
