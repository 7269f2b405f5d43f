//! Threshold configuration for alert rules

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{FinanceError, FinanceResult};

/// Rule name → parameter name → threshold value.
///
/// Example:
///
/// ```json
/// {"low_margin": {"min_margin_pct": 15}, "negative_cash_flow": {"max_negative": -100000}}
/// ```
///
/// Rules missing from the mapping are evaluated against their default threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThresholdConfig {
    rules: BTreeMap<String, BTreeMap<String, f64>>,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self::empty()
            .with("low_margin", "min_margin_pct", 15.0)
            .with("negative_cash_flow", "max_negative", -100_000.0)
    }
}

impl ThresholdConfig {
    /// Mapping with no entries
    pub fn empty() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    /// Set one threshold
    pub fn with(mut self, rule: &str, parameter: &str, value: f64) -> Self {
        self.rules
            .entry(rule.to_string())
            .or_default()
            .insert(parameter.to_string(), value);
        self
    }

    /// Parse a caller mapping, rejecting anything that is not an object of
    /// objects of finite numbers
    pub fn from_json_value(value: &serde_json::Value) -> FinanceResult<Self> {
        let object = value.as_object().ok_or_else(|| {
            FinanceError::invalid_threshold("*", "threshold config must be an object")
        })?;

        let mut config = Self::empty();
        for (rule, params) in object {
            let params = params.as_object().ok_or_else(|| {
                FinanceError::invalid_threshold(rule, "rule entry must be an object")
            })?;
            if params.is_empty() {
                return Err(FinanceError::invalid_threshold(rule, "no parameters given"));
            }
            for (parameter, raw) in params {
                let value = raw.as_f64().ok_or_else(|| {
                    FinanceError::invalid_threshold(
                        rule,
                        format!("{} must be a number, got {}", parameter, raw),
                    )
                })?;
                config = config.with(rule, parameter, value);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Threshold for `rule`/`parameter`, if configured
    pub fn get(&self, rule: &str, parameter: &str) -> Option<f64> {
        self.rules.get(rule).and_then(|p| p.get(parameter)).copied()
    }

    /// Whether the mapping has an entry for `rule`
    pub fn contains_rule(&self, rule: &str) -> bool {
        self.rules.contains_key(rule)
    }

    /// Configured rule names
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Every value must be finite and every rule must have a parameter
    pub fn validate(&self) -> FinanceResult<()> {
        for (rule, params) in &self.rules {
            if params.is_empty() {
                return Err(FinanceError::invalid_threshold(rule, "no parameters given"));
            }
            for (parameter, value) in params {
                if !value.is_finite() {
                    return Err(FinanceError::invalid_threshold(
                        rule,
                        format!("{} must be finite", parameter),
                    ));
                }
            }
        }
        Ok(())
    }
}
