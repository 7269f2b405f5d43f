//! Financial modeling engine for government contract projects
//!
//! This crate provides deterministic financial analysis for:
//! - Cost stack build-up from direct labor through fee to total price
//! - S-curve cash flow projection with invoice lag
//! - Threshold-based risk alerts with a caller-side alert ledger
//! - ROI, NPV and IRR analysis
//! - Calendar-aligned portfolio aggregation
//! - Optional narrative advice through an injected advisor client

pub mod advisory;
pub mod alerts;
pub mod cash_flow;
pub mod config;
pub mod cost_stack;
pub mod engine;
pub mod error;
pub mod portfolio;
pub mod roi;

pub use error::{FinanceError, FinanceResult};

// Configuration
pub use config::{CompanyRates, EngineConfig};

// Cost stack
pub use cost_stack::{BudgetInputs, CostStack, CostStackCalculator};

// Cash flow
pub use cash_flow::{
    CashFlowProjector, CashFlowSeries, DistributionProfile, MonthlyFlow, ProjectionParams,
    TailPeriod,
};

// Risk alerts
pub use alerts::{
    Alert, AlertContext, AlertLedger, AlertRule, AlertSeverity, AlertStatus, RiskAlertEngine,
    ThresholdConfig,
};

// ROI
pub use roi::{estimate_risk_factor, ContractType, RoiAnalyzer, RoiInputs, RoiMetrics};

// Portfolio
pub use portfolio::{
    CalendarMonthFlow, PortfolioAggregator, PortfolioSummary, ProjectPosition, ProjectStatus,
    ProjectTimeline,
};

// Engine
pub use engine::{FinanceEngine, PortfolioReport, ProjectEvaluation, ProjectRequest};

// Advisory
pub use advisory::{
    parse_budget_advice, AdviceParseError, AdvisorClient, AdvisoryService, BudgetAdvice,
};
