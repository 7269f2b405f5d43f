//! Cash flow projection module
//!
//! Spreads a project's total cost over its performance period, models the
//! receivables delay before billing catches up, and tracks the cumulative
//! cash position month by month.
//!
//! ## Module Structure
//!
//! - `distribution`: S-curve and uniform cost spreading
//! - `series`: monthly records, tail buckets and derived summary fields
//! - `projector`: projection parameters and the projector itself

mod distribution;
mod projector;
mod series;

pub use distribution::{monthly_share, monthly_weights, s_curve_progress, DistributionProfile};
pub use projector::{CashFlowProjector, ProjectionParams};
pub use series::{CashFlowSeries, MonthlyFlow, TailPeriod};
