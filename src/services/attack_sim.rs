//! Attack-path narrative derived from a stored scan.
//!
//! The five-stage sequence is fixed; only the exploitation stage varies with
//! the scan's findings.

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::scan::ScanResult;
use crate::services::scan;

#[derive(Debug, Clone, Serialize)]
pub struct AttackStage {
    pub stage: u32,
    pub name: &'static str,
    pub description: String,
    pub icon: &'static str,
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttackSimulation {
    pub scan_id: Uuid,
    pub stages: Vec<AttackStage>,
    pub impact_summary: &'static str,
    pub citizen_impact: &'static str,
    pub feasibility_score: f64,
    pub estimated_time_to_exploit: &'static str,
    pub skill_level_required: &'static str,
}

/// Build the narrative for a stored scan.
pub async fn simulate(pool: &PgPool, scan_id: Uuid) -> Result<AttackSimulation, AppError> {
    let scan = scan::get(pool, scan_id).await?;
    Ok(build_simulation(&scan))
}

pub fn build_simulation(scan: &ScanResult) -> AttackSimulation {
    let exploited = scan
        .vulnerabilities
        .first()
        .map(|issue| issue.issue_type.to_string())
        .unwrap_or_else(|| "vulnerability".to_string());

    let stages = vec![
        AttackStage {
            stage: 1,
            name: "Reconnaissance",
            description: "Attacker identifies vulnerable endpoint through automated scanning"
                .to_string(),
            icon: "search",
            status: "success",
        },
        AttackStage {
            stage: 2,
            name: "Exploitation",
            description: format!("Attacker exploits {exploited} to gain unauthorized access"),
            icon: "zap",
            status: "success",
        },
        AttackStage {
            stage: 3,
            name: "Privilege Escalation",
            description: "Attacker escalates privileges using chained vulnerabilities".to_string(),
            icon: "arrow-up",
            status: "warning",
        },
        AttackStage {
            stage: 4,
            name: "Data Exfiltration",
            description:
                "Sensitive user data including PII, credentials, and financial records extracted"
                    .to_string(),
            icon: "database",
            status: "danger",
        },
        AttackStage {
            stage: 5,
            name: "Impact",
            description: "System compromise complete - full database access achieved".to_string(),
            icon: "alert-triangle",
            status: "danger",
        },
    ];

    AttackSimulation {
        scan_id: scan.scan_id,
        stages,
        impact_summary: "Complete system compromise leading to unauthorized access to sensitive data, potential regulatory violations, and reputational damage.",
        citizen_impact: "Personal data of 50,000+ users exposed including names, addresses, social security numbers, and financial information. Users face identity theft risk and potential financial fraud.",
        feasibility_score: 8.5,
        estimated_time_to_exploit: "< 2 hours",
        skill_level_required: "Intermediate",
    }
}
