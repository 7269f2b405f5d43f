//! Typed parsing of advisor responses

use serde::{Deserialize, Serialize};
use thiserror::Error;

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Why an advisor response could not be used
#[derive(Debug, Error)]
pub enum AdviceParseError {
    /// The response had no content
    #[error("advisor returned an empty response")]
    EmptyResponse,

    /// A ```json fence was opened but never closed
    #[error("unterminated json code fence")]
    UnterminatedFence,

    /// The payload is not JSON of the expected shape
    #[error("malformed advice payload: {source}")]
    InvalidJson {
        #[from]
        source: serde_json::Error,
    },

    /// Confidence must be a percentage
    #[error("confidence score {score} outside 0-100")]
    ConfidenceOutOfRange { score: f64 },
}

/// Rate changes the advisor proposes, all percentages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateOptimizations {
    pub overhead_rate: Option<f64>,
    pub ga_rate: Option<f64>,
    pub fee_percentage: Option<f64>,
}

/// Narrative budget advice. Never fed back into the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetAdvice {
    #[serde(default)]
    pub optimizations: RateOptimizations,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub risk_factors: Vec<String>,
    pub confidence_score: f64,
}

/// Parse a raw advisor response.
///
/// A ```json fenced block is unwrapped when present; otherwise the whole
/// response must be the JSON document.
pub fn parse_budget_advice(response: &str) -> Result<BudgetAdvice, AdviceParseError> {
    let payload = extract_payload(response)?;
    let advice: BudgetAdvice = serde_json::from_str(payload)?;

    if !advice.confidence_score.is_finite() || !(0.0..=100.0).contains(&advice.confidence_score)
    {
        return Err(AdviceParseError::ConfidenceOutOfRange {
            score: advice.confidence_score,
        });
    }
    Ok(advice)
}

fn extract_payload(response: &str) -> Result<&str, AdviceParseError> {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return Err(AdviceParseError::EmptyResponse);
    }

    match trimmed.find(JSON_FENCE) {
        Some(open) => {
            let body = &trimmed[open + JSON_FENCE.len()..];
            let close = body.find(FENCE).ok_or(AdviceParseError::UnterminatedFence)?;
            let payload = body[..close].trim();
            if payload.is_empty() {
                return Err(AdviceParseError::EmptyResponse);
            }
            Ok(payload)
        }
        None => Ok(trimmed),
    }
}
