//! Advisory client seam and service

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use super::parser::{parse_budget_advice, BudgetAdvice};
use crate::cash_flow::CashFlowSeries;
use crate::cost_stack::CostStack;
use crate::error::FinanceResult;

/// Text-completion backend for narrative advice.
///
/// Injected into [`AdvisoryService`]; implementations own transport,
/// timeouts and retries and should report outages as
/// [`crate::FinanceError::AdvisoryUnavailable`].
#[async_trait]
pub trait AdvisorClient: Send + Sync {
    /// Complete `prompt` under `system` instructions
    async fn complete(&self, system: &str, prompt: &str) -> FinanceResult<String>;
}

/// Industry reference points included in the prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryBenchmarks {
    pub average_overhead_rate: f64,
    pub average_ga_rate: f64,
    pub average_margin: f64,
}

impl Default for IndustryBenchmarks {
    fn default() -> Self {
        Self {
            average_overhead_rate: 120.0,
            average_ga_rate: 18.0,
            average_margin: 12.0,
        }
    }
}

const CFO_SYSTEM_PROMPT: &str = r#"You are an expert CFO specializing in government contracting
financials.

Analyze budgets for cost competitiveness, margin optimization, risk mitigation,
cash flow implications and compliance with government contracting standards.

Respond with JSON only:
{
    "optimizations": {"overhead_rate": 95.0, "ga_rate": 12.0, "fee_percentage": 8.5},
    "recommendations": ["..."],
    "risk_factors": ["..."],
    "confidence_score": 85
}"#;

/// Asks an [`AdvisorClient`] for budget advice on computed results
pub struct AdvisoryService<C: AdvisorClient> {
    client: C,
    benchmarks: IndustryBenchmarks,
}

impl<C: AdvisorClient> AdvisoryService<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            benchmarks: IndustryBenchmarks::default(),
        }
    }

    pub fn with_benchmarks(mut self, benchmarks: IndustryBenchmarks) -> Self {
        self.benchmarks = benchmarks;
        self
    }

    /// Prompt describing the budget and its cash position
    pub fn build_prompt(
        &self,
        cost_stack: &CostStack,
        cash_flow: &CashFlowSeries,
    ) -> FinanceResult<String> {
        let budget = serde_json::to_string_pretty(cost_stack)?;
        let cash = serde_json::to_string_pretty(&json!({
            "period_months": cash_flow.period_months(),
            "peak_cash_requirement": cash_flow.peak_cash_requirement(),
            "payback_period": cash_flow.payback_period(),
            "total_inflow": cash_flow.total_inflow(),
            "total_outflow": cash_flow.total_outflow(),
        }))?;
        let benchmarks = serde_json::to_string_pretty(&self.benchmarks)?;

        Ok(format!(
            "Analyze this government contract budget for optimization:\n\n\
             PROPOSED BUDGET: {}\n\nCASH FLOW: {}\n\nBENCHMARKS: {}\n\n\
             Margin is {:.1}% of price.",
            budget,
            cash,
            benchmarks,
            cost_stack.margin_pct()
        ))
    }

    pub async fn advise(
        &self,
        cost_stack: &CostStack,
        cash_flow: &CashFlowSeries,
    ) -> FinanceResult<BudgetAdvice> {
        let prompt = self.build_prompt(cost_stack, cash_flow)?;
        debug!(prompt_len = prompt.len(), "Requesting budget advice");

        let response = self.client.complete(CFO_SYSTEM_PROMPT, &prompt).await?;
        let advice = parse_budget_advice(&response)?;

        info!(
            recommendations = advice.recommendations.len(),
            confidence = advice.confidence_score,
            "Budget advice received"
        );
        Ok(advice)
    }
}
