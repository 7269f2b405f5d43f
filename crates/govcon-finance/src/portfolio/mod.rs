//! Portfolio aggregation module
//!
//! Anchors each project's cash flow series to its calendar start date and
//! sums inflow and outflow per absolute calendar month, so projects starting
//! in different months line up correctly.
//!
//! ## Module Structure
//!
//! - `position`: project status, timeline and the per-project position
//! - `aggregator`: calendar alignment and portfolio rollups

mod aggregator;
mod position;

pub use aggregator::{CalendarMonthFlow, PortfolioAggregator, PortfolioSummary};
pub use position::{ProjectPosition, ProjectStatus, ProjectTimeline};
