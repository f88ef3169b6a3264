//! Weighted, pluggable scoring rules and the robot-anchored, force-reselectable
//! target selector.

mod config;
mod rules;
mod select_target;
mod selector;
mod update_state;

pub use config::SelectionConfig;
pub use rules::{IdentityRule, SelectionRule, TurretDistanceRule, TurretRotationDifferenceRule};
pub use select_target::select_target;
pub use selector::TargetSelector;
pub use update_state::UpdateState;
