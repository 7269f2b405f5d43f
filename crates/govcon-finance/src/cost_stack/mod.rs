//! Cost stack module: budget inputs to a fully loaded cost and price
//!
//! The cascade runs direct labor → fringe → direct cost → overhead → G&A →
//! total cost → fee → total price. Every step's base includes the steps before
//! it, and G&A is applied to direct cost plus overhead.

mod calculator;
mod inputs;
mod stack;

pub use calculator::CostStackCalculator;
pub use inputs::BudgetInputs;
pub use stack::CostStack;
