//! Cost spreading profiles

use serde::{Deserialize, Serialize};

/// How total cost is spread across the performance period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionProfile {
    /// Slow start, heavy middle, slow finish
    #[default]
    SCurve,
    /// Equal share every month
    Uniform,
}

impl std::fmt::Display for DistributionProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DistributionProfile::SCurve => write!(f, "S-Curve"),
            DistributionProfile::Uniform => write!(f, "Uniform"),
        }
    }
}

/// Cumulative S-curve progress at `progress` in `[0, 1]`.
///
/// `2p²` up to the midpoint, `1 − 2(1 − p)²` after it.
pub fn s_curve_progress(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    if p <= 0.5 {
        2.0 * p * p
    } else {
        1.0 - 2.0 * (1.0 - p) * (1.0 - p)
    }
}

/// Per-month fractions of total cost for an `months`-long period.
///
/// The weights telescope to exactly `1.0` over the full period. Returns an
/// empty vector for `months == 0`.
pub fn monthly_weights(profile: DistributionProfile, months: u32) -> Vec<f64> {
    (1..=months)
        .map(|month| monthly_share(profile, month, months, 1.0))
        .collect()
}

/// Outflow for month `month` (1-based) of an `months`-long period
pub fn monthly_share(
    profile: DistributionProfile,
    month: u32,
    months: u32,
    total_cost: f64,
) -> f64 {
    if month == 0 || month > months {
        return 0.0;
    }
    let n = months as f64;
    let weight = match profile {
        DistributionProfile::SCurve => {
            s_curve_progress(month as f64 / n) - s_curve_progress((month - 1) as f64 / n)
        }
        DistributionProfile::Uniform => 1.0 / n,
    };
    weight * total_cost
}
