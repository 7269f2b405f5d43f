//! Advisory collaborator
//!
//! Produces narrative budget advice through an injected [`AdvisorClient`].
//! Advice is advisory text for the caller only; nothing here feeds back
//! into cost, cash flow, alert or ROI computation.

mod parser;
mod service;

pub use parser::{parse_budget_advice, AdviceParseError, BudgetAdvice, RateOptimizations};
pub use service::{AdvisorClient, AdvisoryService, IndustryBenchmarks};
