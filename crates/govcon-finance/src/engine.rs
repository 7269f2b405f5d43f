//! Financial engine façade
//!
//! Runs the full per-project pipeline (cost stack, projection, alert
//! evaluation, ROI) and fans whole portfolios out across the rayon pool.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::alerts::{Alert, AlertRule, RiskAlertEngine};
use crate::cash_flow::{CashFlowProjector, ProjectionParams};
use crate::config::EngineConfig;
use crate::cost_stack::{BudgetInputs, CostStackCalculator};
use crate::error::{ensure_non_negative, FinanceResult};
use crate::portfolio::{
    PortfolioAggregator, PortfolioSummary, ProjectPosition, ProjectStatus, ProjectTimeline,
};
use crate::roi::{estimate_risk_factor, ContractType, RoiAnalyzer, RoiInputs, RoiMetrics};

/// Everything the engine needs to evaluate one project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRequest {
    pub project_id: String,
    pub name: String,
    pub status: ProjectStatus,
    pub contract_type: ContractType,
    pub estimated_value: f64,
    pub contract_value: Option<f64>,
    pub inputs: BudgetInputs,
    pub timeline: ProjectTimeline,
    /// Externally computed risk factor; estimated from the contract when absent
    pub risk_factor: Option<f64>,
    /// Per-project NPV discount rate; the engine default applies when absent
    #[serde(default)]
    pub annual_discount_rate: Option<f64>,
}

/// Result of evaluating one project
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectEvaluation {
    pub position: ProjectPosition,
    /// Alert candidates; storing them is up to the caller
    pub alerts: Vec<Alert>,
    pub roi: RoiMetrics,
}

/// Per-project evaluations plus the portfolio rollup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioReport {
    pub evaluations: Vec<ProjectEvaluation>,
    pub summary: PortfolioSummary,
}

/// Deterministic financial engine
#[derive(Debug)]
pub struct FinanceEngine {
    config: EngineConfig,
    calculator: CostStackCalculator,
    projector: CashFlowProjector,
    alerts: RiskAlertEngine,
    roi: RoiAnalyzer,
    aggregator: PortfolioAggregator,
}

impl FinanceEngine {
    /// Create a new engine with the built-in alert rules
    pub fn new(config: EngineConfig) -> FinanceResult<Self> {
        Self::with_alert_rules(config, Vec::new())
    }

    /// Create an engine with the built-in rules plus `extra_rules`.
    ///
    /// The configured thresholds are checked against the full rule set here,
    /// so an unknown rule or missing parameter fails construction.
    pub fn with_alert_rules(
        config: EngineConfig,
        extra_rules: Vec<Box<dyn AlertRule>>,
    ) -> FinanceResult<Self> {
        config.validate()?;

        let alerts = extra_rules
            .into_iter()
            .fold(RiskAlertEngine::new(), |engine, rule| engine.with_rule(rule));
        alerts.validate_thresholds(&config.thresholds)?;

        info!(
            distribution = %config.distribution,
            invoice_lag_months = config.invoice_lag_months,
            rules = alerts.rule_names().len(),
            "Finance engine initialized"
        );

        Ok(Self {
            calculator: CostStackCalculator::new(),
            projector: CashFlowProjector::from_config(&config),
            alerts,
            roi: RoiAnalyzer::from_config(&config),
            aggregator: PortfolioAggregator::new(),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Cost stack → projection → alerts → ROI for one project
    pub fn evaluate_project(&self, request: &ProjectRequest) -> FinanceResult<ProjectEvaluation> {
        request.timeline.validate()?;
        ensure_non_negative("estimated_value", request.estimated_value)?;
        if let Some(value) = request.contract_value {
            ensure_non_negative("contract_value", value)?;
        }

        let months = request.timeline.performance_period_months;
        let risk_factor = request.risk_factor.unwrap_or_else(|| {
            estimate_risk_factor(request.contract_type, months, request.estimated_value)
        });
        let mut roi_inputs = RoiInputs::new(months, risk_factor);
        if let Some(rate) = request.annual_discount_rate {
            roi_inputs = roi_inputs.with_discount_rate(rate);
        }
        roi_inputs.validate()?;

        let cost_stack = self.calculator.calculate(&request.inputs)?;
        let params =
            ProjectionParams::from_config(cost_stack.total_cost(), months, &self.config);
        let cash_flow = self.projector.project(&params)?;
        let alerts = self
            .alerts
            .evaluate(&cost_stack, &cash_flow, &self.config.thresholds)?;
        let roi = self.roi.analyze(&cost_stack, &cash_flow, &roi_inputs)?;

        debug!(
            project_id = %request.project_id,
            alerts = alerts.len(),
            risk_factor,
            "Project evaluated"
        );

        Ok(ProjectEvaluation {
            position: ProjectPosition {
                project_id: request.project_id.clone(),
                name: request.name.clone(),
                status: request.status,
                estimated_value: request.estimated_value,
                contract_value: request.contract_value,
                timeline: request.timeline,
                cost_stack,
                cash_flow,
            },
            alerts,
            roi,
        })
    }

    /// Evaluate every project in parallel, then aggregate.
    ///
    /// Fails as a whole if any single project fails.
    pub fn evaluate_portfolio(
        &self,
        requests: &[ProjectRequest],
    ) -> FinanceResult<PortfolioReport> {
        let evaluations = requests
            .par_iter()
            .map(|request| self.evaluate_project(request))
            .collect::<FinanceResult<Vec<_>>>()?;

        let positions: Vec<ProjectPosition> =
            evaluations.iter().map(|e| e.position.clone()).collect();
        let summary = self.aggregator.aggregate(&positions)?;

        info!(
            projects = evaluations.len(),
            alerts = evaluations.iter().map(|e| e.alerts.len()).sum::<usize>(),
            "Portfolio evaluated"
        );

        Ok(PortfolioReport {
            evaluations,
            summary,
        })
    }
}
