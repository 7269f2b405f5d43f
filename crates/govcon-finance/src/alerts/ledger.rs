//! In-memory alert store for callers

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use super::alert::{Alert, AlertSeverity, AlertStatus};
use crate::error::{FinanceError, FinanceResult};

#[derive(Debug, Clone)]
struct LedgerEntry {
    project_id: String,
    alert: Alert,
}

/// Caller-side alert store.
///
/// Keeps at most one open (active or acknowledged) alert per project and
/// rule; recording a candidate for a rule that already has an open alert is
/// a no-op. Cloning shares the underlying store.
#[derive(Debug, Clone, Default)]
pub struct AlertLedger {
    entries: Arc<DashMap<Uuid, LedgerEntry>>,
    /// (project, rule) -> id of its open alert, claimed before the entry lands
    open: Arc<DashMap<(String, String), Uuid>>,
}

impl AlertLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Store candidates for `project_id`, skipping rules that already have an
    /// open alert. Returns the ids that were inserted.
    pub fn record(&self, project_id: &str, candidates: Vec<Alert>) -> Vec<Uuid> {
        let mut inserted = Vec::new();

        for alert in candidates {
            let id = alert.id;
            match self.open.entry((project_id.to_string(), alert.rule.clone())) {
                Entry::Occupied(_) => {
                    debug!(project_id, rule = %alert.rule, "Open alert already recorded");
                    continue;
                }
                Entry::Vacant(slot) => {
                    slot.insert(id);
                }
            }
            self.entries.insert(
                id,
                LedgerEntry {
                    project_id: project_id.to_string(),
                    alert,
                },
            );
            inserted.push(id);
        }

        if !inserted.is_empty() {
            info!(project_id, count = inserted.len(), "Recorded alerts");
        }
        inserted
    }

    /// Look up an alert by id
    pub fn get(&self, alert_id: Uuid) -> FinanceResult<Alert> {
        self.entries
            .get(&alert_id)
            .map(|e| e.alert.clone())
            .ok_or_else(|| not_found(alert_id))
    }

    /// Acknowledge an active alert
    pub fn acknowledge(
        &self,
        alert_id: Uuid,
        acknowledged_by: &str,
        action_taken: Option<String>,
    ) -> FinanceResult<Alert> {
        let mut entry = self
            .entries
            .get_mut(&alert_id)
            .ok_or_else(|| not_found(alert_id))?;
        entry.alert.acknowledge(acknowledged_by, action_taken)?;
        info!(%alert_id, acknowledged_by, "Alert acknowledged");
        Ok(entry.alert.clone())
    }

    /// Resolve an open alert and release its (project, rule) slot
    pub fn resolve(&self, alert_id: Uuid) -> FinanceResult<Alert> {
        let (key, resolved) = {
            let mut entry = self
                .entries
                .get_mut(&alert_id)
                .ok_or_else(|| not_found(alert_id))?;
            entry.alert.resolve()?;
            (
                (entry.project_id.clone(), entry.alert.rule.clone()),
                entry.alert.clone(),
            )
        };
        // entries guard is released before touching the open index
        self.open.remove_if(&key, |_, open_id| *open_id == alert_id);
        info!(%alert_id, "Alert resolved");
        Ok(resolved)
    }

    /// Open alerts for one project, most severe first
    pub fn open_alerts(&self, project_id: &str) -> Vec<Alert> {
        let mut alerts: Vec<Alert> = self
            .entries
            .iter()
            .filter(|e| e.project_id == project_id && e.alert.is_open())
            .map(|e| e.alert.clone())
            .collect();
        alerts.sort_by(|a, b| b.severity.cmp(&a.severity).then(a.raised_at.cmp(&b.raised_at)));
        alerts
    }

    /// Number of alerts in `status` across all projects
    pub fn count_by_status(&self, status: AlertStatus) -> usize {
        self.entries.iter().filter(|e| e.alert.status == status).count()
    }

    /// Number of active alerts with the given severity
    pub fn active_count_by_severity(&self, severity: AlertSeverity) -> usize {
        self.entries
            .iter()
            .filter(|e| e.alert.status == AlertStatus::Active && e.alert.severity == severity)
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn not_found(alert_id: Uuid) -> FinanceError {
    FinanceError::AlertNotFound {
        alert_id: alert_id.to_string(),
    }
}
