//! Business logic services.

pub mod analysis;
pub mod attack_sim;
pub mod compliance;
pub mod detector;
pub mod fixes;
pub mod risk;
pub mod scan;
