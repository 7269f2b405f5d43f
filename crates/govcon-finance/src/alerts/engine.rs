//! Stateless alert evaluation

use tracing::{debug, warn};

use super::alert::Alert;
use super::rules::{AlertContext, AlertRule, LowMarginRule, NegativeCashFlowRule};
use super::thresholds::ThresholdConfig;
use crate::cash_flow::CashFlowSeries;
use crate::cost_stack::CostStack;
use crate::error::{FinanceError, FinanceResult};

/// Evaluates registered rules against computed metrics.
///
/// Holds no alert state: the same inputs always produce the same candidate
/// set, and nothing is persisted or deduplicated here.
pub struct RiskAlertEngine {
    rules: Vec<Box<dyn AlertRule>>,
}

impl Default for RiskAlertEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RiskAlertEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiskAlertEngine")
            .field("rules", &self.rule_names())
            .finish()
    }
}

impl RiskAlertEngine {
    /// Engine with the built-in `low_margin` and `negative_cash_flow` rules
    pub fn new() -> Self {
        Self::empty()
            .with_rule(Box::new(LowMarginRule))
            .with_rule(Box::new(NegativeCashFlowRule))
    }

    /// Engine with no rules
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Register an additional rule
    pub fn with_rule(mut self, rule: Box<dyn AlertRule>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Evaluate every rule. An empty list is a valid outcome.
    pub fn evaluate(
        &self,
        cost_stack: &CostStack,
        cash_flow: &CashFlowSeries,
        thresholds: &ThresholdConfig,
    ) -> FinanceResult<Vec<Alert>> {
        self.validate_thresholds(thresholds)?;

        let context = AlertContext {
            cost_stack,
            cash_flow,
        };

        let mut alerts = Vec::new();
        for rule in &self.rules {
            let threshold = thresholds
                .get(rule.name(), rule.parameter())
                .unwrap_or_else(|| rule.default_threshold());

            match rule.evaluate(&context, threshold) {
                Some(alert) => {
                    warn!(
                        rule = rule.name(),
                        severity = %alert.severity,
                        threshold,
                        current_value = alert.current_value,
                        "Risk alert raised"
                    );
                    alerts.push(alert);
                }
                None => debug!(rule = rule.name(), threshold, "Rule passed"),
            }
        }

        Ok(alerts)
    }

    /// Reject threshold entries naming an unknown rule or missing its parameter
    pub fn validate_thresholds(&self, thresholds: &ThresholdConfig) -> FinanceResult<()> {
        thresholds.validate()?;

        for name in thresholds.rule_names() {
            let rule = self
                .rules
                .iter()
                .find(|r| r.name() == name)
                .ok_or_else(|| FinanceError::invalid_threshold(name, "unknown rule"))?;

            if thresholds.get(name, rule.parameter()).is_none() {
                return Err(FinanceError::invalid_threshold(
                    name,
                    format!("missing parameter {}", rule.parameter()),
                ));
            }
        }

        Ok(())
    }
}
