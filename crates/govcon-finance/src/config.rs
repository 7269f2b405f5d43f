//! Engine configuration

use serde::{Deserialize, Serialize};

use crate::alerts::ThresholdConfig;
use crate::cash_flow::DistributionProfile;
use crate::error::{FinanceError, FinanceResult};

/// Company-wide indirect rates, all expressed as percentages
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyRates {
    /// Fringe benefits rate applied to direct labor
    pub fringe_rate: f64,
    /// Overhead rate applied to total direct cost
    pub overhead_rate: f64,
    /// G&A rate applied to direct cost plus overhead
    pub ga_rate: f64,
    /// Fee applied to total cost
    pub fee_rate: f64,
}

impl Default for CompanyRates {
    fn default() -> Self {
        Self {
            fringe_rate: 30.0,
            overhead_rate: 100.0,
            ga_rate: 15.0,
            fee_rate: 10.0,
        }
    }
}

/// Financial engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Months between cost incurrence and first payment received
    pub invoice_lag_months: u32,
    /// Billing markup over monthly outflow once invoicing catches up
    pub inflow_markup: f64,
    /// Annual discount rate for NPV
    pub annual_discount_rate: f64,
    /// Months materialized as exact per-month records
    pub exact_horizon_months: u32,
    /// Width of each tail bucket beyond the exact horizon
    pub tail_period_months: u32,
    /// Cost spreading profile
    pub distribution: DistributionProfile,
    /// Company average margin used for opportunity cost
    pub opportunity_margin: f64,
    /// Default company rates
    pub company_rates: CompanyRates,
    /// Risk alert thresholds
    pub thresholds: ThresholdConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            invoice_lag_months: 2,
            inflow_markup: 0.10,
            annual_discount_rate: 0.10,
            exact_horizon_months: 24,
            tail_period_months: 3,
            distribution: DistributionProfile::SCurve,
            opportunity_margin: 0.15,
            company_rates: CompanyRates::default(),
            thresholds: ThresholdConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> FinanceResult<Self> {
        let config: EngineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON value
    pub fn from_json_value(value: serde_json::Value) -> FinanceResult<Self> {
        let config: EngineConfig = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> FinanceResult<()> {
        let finite_non_negative = [
            ("inflow_markup", self.inflow_markup),
            ("annual_discount_rate", self.annual_discount_rate),
            ("opportunity_margin", self.opportunity_margin),
            ("company_rates.fringe_rate", self.company_rates.fringe_rate),
            ("company_rates.overhead_rate", self.company_rates.overhead_rate),
            ("company_rates.ga_rate", self.company_rates.ga_rate),
            ("company_rates.fee_rate", self.company_rates.fee_rate),
        ];
        for (name, value) in finite_non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(FinanceError::ConfigurationError {
                    message: format!("{} must be a finite value >= 0, got {}", name, value),
                });
            }
        }

        if self.exact_horizon_months == 0 {
            return Err(FinanceError::ConfigurationError {
                message: "exact_horizon_months must be >= 1".to_string(),
            });
        }
        if self.tail_period_months == 0 {
            return Err(FinanceError::ConfigurationError {
                message: "tail_period_months must be >= 1".to_string(),
            });
        }

        self.thresholds.validate()
    }

    /// Monthly discount rate derived from the annual rate
    pub fn monthly_discount_rate(&self) -> f64 {
        self.annual_discount_rate / 12.0
    }
}
