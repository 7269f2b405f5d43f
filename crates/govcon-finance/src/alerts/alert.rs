//! Alert records and lifecycle

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{FinanceError, FinanceResult};

/// Alert severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertSeverity::Low => write!(f, "low"),
            AlertSeverity::Medium => write!(f, "medium"),
            AlertSeverity::High => write!(f, "high"),
            AlertSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Alert lifecycle state: active → acknowledged → resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Active,
    Acknowledged,
    Resolved,
}

impl std::fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertStatus::Active => write!(f, "active"),
            AlertStatus::Acknowledged => write!(f, "acknowledged"),
            AlertStatus::Resolved => write!(f, "resolved"),
        }
    }
}

/// Financial risk alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    /// Name of the rule that raised the alert
    pub rule: String,
    pub severity: AlertSeverity,
    pub title: String,
    pub threshold: f64,
    pub current_value: f64,
    /// `(current - threshold) / |threshold| * 100`, 0 for a zero threshold
    pub variance_pct: f64,
    pub message: String,
    pub recommended_actions: Vec<String>,
    pub status: AlertStatus,
    pub raised_at: DateTime<Utc>,
    pub acknowledged_by: Option<String>,
    pub acknowledged_at: Option<DateTime<Utc>>,
    pub action_taken: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Alert {
    /// New active alert
    pub fn new(
        rule: impl Into<String>,
        severity: AlertSeverity,
        title: impl Into<String>,
        threshold: f64,
        current_value: f64,
        message: impl Into<String>,
        recommended_actions: Vec<String>,
    ) -> Self {
        let variance_pct = if threshold != 0.0 {
            (current_value - threshold) / threshold.abs() * 100.0
        } else {
            0.0
        };

        Self {
            id: Uuid::new_v4(),
            rule: rule.into(),
            severity,
            title: title.into(),
            threshold,
            current_value,
            variance_pct,
            message: message.into(),
            recommended_actions,
            status: AlertStatus::Active,
            raised_at: Utc::now(),
            acknowledged_by: None,
            acknowledged_at: None,
            action_taken: None,
            resolved_at: None,
        }
    }

    /// Not yet resolved
    pub fn is_open(&self) -> bool {
        self.status != AlertStatus::Resolved
    }

    /// Whether two alerts describe the same finding, ignoring identity,
    /// timestamps and lifecycle state
    pub fn same_finding(&self, other: &Alert) -> bool {
        self.rule == other.rule
            && self.severity == other.severity
            && self.threshold == other.threshold
            && self.current_value == other.current_value
    }

    /// Active → Acknowledged
    pub fn acknowledge(
        &mut self,
        acknowledged_by: impl Into<String>,
        action_taken: Option<String>,
    ) -> FinanceResult<()> {
        if self.status != AlertStatus::Active {
            return Err(self.transition_error(AlertStatus::Acknowledged));
        }
        self.status = AlertStatus::Acknowledged;
        self.acknowledged_by = Some(acknowledged_by.into());
        self.acknowledged_at = Some(Utc::now());
        self.action_taken = action_taken;
        Ok(())
    }

    /// Active or Acknowledged → Resolved
    pub fn resolve(&mut self) -> FinanceResult<()> {
        if self.status == AlertStatus::Resolved {
            return Err(self.transition_error(AlertStatus::Resolved));
        }
        self.status = AlertStatus::Resolved;
        self.resolved_at = Some(Utc::now());
        Ok(())
    }

    fn transition_error(&self, to: AlertStatus) -> FinanceError {
        FinanceError::InvalidTransition {
            alert_id: self.id.to_string(),
            from: self.status.to_string(),
            to: to.to_string(),
        }
    }
}
