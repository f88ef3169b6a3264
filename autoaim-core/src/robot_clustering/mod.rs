//! Variable-K online clustering of tracked plates into robot centers.

mod clusterer;
mod config;
mod grouper;
mod variable_k_means;

pub use clusterer::RobotClusterer;
pub use config::RobotClusteringConfig;
pub use grouper::{group_targets, GroupedCenter};
pub use variable_k_means::VariableKMeans;
