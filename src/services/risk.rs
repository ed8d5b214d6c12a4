//! Risk aggregation: severity tallies, the weighted risk score, and the
//! deployment gate.

use crate::models::scan::{Severity, VulnerabilityIssue};

/// Per-severity weights of the risk score formula.
#[derive(Debug, Clone, Copy)]
pub struct RiskWeights {
    pub critical: f64,
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            critical: 10.0,
            high: 5.0,
            medium: 2.0,
            low: 0.5,
        }
    }
}

/// Severity ceilings a scan must stay within to be deployment ready.
#[derive(Debug, Clone, Copy)]
pub struct DeploymentPolicy {
    pub max_critical: i32,
    pub max_high: i32,
}

impl Default for DeploymentPolicy {
    fn default() -> Self {
        Self {
            max_critical: 0,
            max_high: 2,
        }
    }
}

/// Issue counts per severity level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeverityCounts {
    pub critical: i32,
    pub high: i32,
    pub medium: i32,
    pub low: i32,
}

impl SeverityCounts {
    pub fn tally(issues: &[VulnerabilityIssue]) -> Self {
        let mut counts = Self::default();
        for issue in issues {
            match issue.severity {
                Severity::Critical => counts.critical += 1,
                Severity::High => counts.high += 1,
                Severity::Medium => counts.medium += 1,
                Severity::Low => counts.low += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> i32 {
        self.critical + self.high + self.medium + self.low
    }
}

/// Weighted risk score, capped at 100.
pub fn risk_score(counts: &SeverityCounts, weights: &RiskWeights) -> f64 {
    let raw = f64::from(counts.critical) * weights.critical
        + f64::from(counts.high) * weights.high
        + f64::from(counts.medium) * weights.medium
        + f64::from(counts.low) * weights.low;
    raw.min(100.0)
}

/// A scan is deployment ready when its counts stay within the policy ceilings.
pub fn deployment_ready(counts: &SeverityCounts, policy: &DeploymentPolicy) -> bool {
    counts.critical <= policy.max_critical && counts.high <= policy.max_high
}
