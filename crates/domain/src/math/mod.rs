//! Risk sizing math: the deposit risk curve and EV-proportional allocation.

pub mod allocation;
pub mod risk_curve;

pub use allocation::{AllocationEntry, RiskAllocation, allocate_risk, split_budget};
pub use risk_curve::{RISK_BRACKETS, RiskBracket, risk_amount, risk_percent};
