//! Risk alerts module
//!
//! Evaluates a cost stack and cash flow series against caller-supplied
//! thresholds and emits alert candidates. Evaluation is stateless; storing,
//! deduplicating and transitioning alerts belongs to the caller, for which
//! [`AlertLedger`] provides an in-memory store.

mod alert;
mod engine;
mod ledger;
mod rules;
mod thresholds;

pub use alert::{Alert, AlertSeverity, AlertStatus};
pub use engine::RiskAlertEngine;
pub use ledger::AlertLedger;
pub use rules::{AlertContext, AlertRule, LowMarginRule, NegativeCashFlowRule};
pub use thresholds::ThresholdConfig;
