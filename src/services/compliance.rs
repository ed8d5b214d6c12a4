//! Compliance reports derived from a stored scan: OWASP category mapping
//! plus ISO 27001, NIST CSF, and GDPR summaries.

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::scan::{RuleType, ScanResult};
use crate::services::scan;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct CategoryCheck {
    pub status: &'static str,
    pub issues: i32,
}

/// The five mapped OWASP categories, serialized under their report keys.
#[derive(Debug, Clone, Serialize)]
pub struct OwaspMapping {
    #[serde(rename = "A01_Broken_Access_Control")]
    pub a01_broken_access_control: CategoryCheck,
    #[serde(rename = "A02_Cryptographic_Failures")]
    pub a02_cryptographic_failures: CategoryCheck,
    #[serde(rename = "A03_Injection")]
    pub a03_injection: CategoryCheck,
    #[serde(rename = "A07_Auth_Failures")]
    pub a07_auth_failures: CategoryCheck,
    #[serde(rename = "A08_Data_Integrity_Failures")]
    pub a08_data_integrity_failures: CategoryCheck,
}

#[derive(Debug, Clone, Serialize)]
pub struct OwaspSummary {
    pub mapping: OwaspMapping,
    pub total_categories: u32,
    pub passed: u32,
    pub compliance_score: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Iso27001Report {
    pub score: i32,
    pub status: &'static str,
    pub controls_passed: i32,
    pub controls_total: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct NistReport {
    pub score: i32,
    pub status: &'static str,
    pub framework: &'static str,
    pub categories_met: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct GdprReport {
    pub compliant: bool,
    pub risk_level: &'static str,
    pub data_protection: &'static str,
    pub breach_notification_required: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComplianceReport {
    pub scan_id: Uuid,
    pub owasp: OwaspSummary,
    pub iso27001: Iso27001Report,
    pub nist: NistReport,
    pub gdpr: GdprReport,
}

/// Build the compliance report for a stored scan.
pub async fn report(pool: &PgPool, scan_id: Uuid) -> Result<ComplianceReport, AppError> {
    let scan = scan::get(pool, scan_id).await?;
    Ok(build_report(&scan))
}

pub fn build_report(scan: &ScanResult) -> ComplianceReport {
    let any_of = |types: &[RuleType]| {
        scan.vulnerabilities
            .iter()
            .any(|issue| types.contains(&issue.issue_type))
    };
    let warn_if = |flagged: bool| if flagged { "warn" } else { "pass" };
    let fail_if = |flagged: bool| if flagged { "fail" } else { "pass" };

    let mut mapping = OwaspMapping {
        a01_broken_access_control: CategoryCheck {
            status: warn_if(any_of(&[RuleType::MissingAuth])),
            issues: 0,
        },
        a02_cryptographic_failures: CategoryCheck {
            status: warn_if(any_of(&[RuleType::WeakCrypto])),
            issues: 0,
        },
        a03_injection: CategoryCheck {
            status: fail_if(any_of(&[
                RuleType::SqlInjection,
                RuleType::Xss,
                RuleType::CommandInjection,
            ])),
            issues: 0,
        },
        a07_auth_failures: CategoryCheck {
            status: fail_if(any_of(&[RuleType::HardcodedSecret])),
            issues: 0,
        },
        a08_data_integrity_failures: CategoryCheck {
            status: warn_if(any_of(&[RuleType::InsecureDeserialization])),
            issues: 0,
        },
    };

    for issue in &scan.vulnerabilities {
        match issue.issue_type {
            RuleType::MissingAuth | RuleType::PathTraversal => {
                mapping.a01_broken_access_control.issues += 1
            }
            RuleType::WeakCrypto => mapping.a02_cryptographic_failures.issues += 1,
            RuleType::SqlInjection | RuleType::Xss | RuleType::CommandInjection => {
                mapping.a03_injection.issues += 1
            }
            RuleType::HardcodedSecret => mapping.a07_auth_failures.issues += 1,
            RuleType::InsecureDeserialization => {
                mapping.a08_data_integrity_failures.issues += 1
            }
        }
    }

    let checks = [
        mapping.a01_broken_access_control,
        mapping.a02_cryptographic_failures,
        mapping.a03_injection,
        mapping.a07_auth_failures,
        mapping.a08_data_integrity_failures,
    ];
    let passed = checks.iter().filter(|check| check.status == "pass").count() as u32;
    let compliance_score = (f64::from(passed) / 5.0 * 100.0).round() as u32;

    let iso_score = (100 - (scan.critical_count * 15 + scan.high_count * 8)).max(0);
    let nist_score = (100 - (scan.critical_count * 12 + scan.high_count * 7)).max(0);
    let gdpr_compliant = scan.critical_count == 0 && scan.high_count <= 1;

    ComplianceReport {
        scan_id: scan.scan_id,
        owasp: OwaspSummary {
            mapping,
            total_categories: 5,
            passed,
            compliance_score,
        },
        iso27001: Iso27001Report {
            score: iso_score,
            status: if iso_score >= 80 { "compliant" } else { "non-compliant" },
            controls_passed: if iso_score >= 80 { 45 } else { 32 },
            controls_total: 50,
        },
        nist: NistReport {
            score: nist_score,
            status: if nist_score >= 75 { "compliant" } else { "non-compliant" },
            framework: "NIST CSF 2.0",
            categories_met: if nist_score >= 75 { 4 } else { 2 },
        },
        gdpr: GdprReport {
            compliant: gdpr_compliant,
            risk_level: if gdpr_compliant { "low" } else { "high" },
            data_protection: if gdpr_compliant { "adequate" } else { "inadequate" },
            breach_notification_required: !gdpr_compliant,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scan::{ScanProfile, Severity, VulnerabilityIssue};
    use chrono::Utc;

    fn issue(issue_type: RuleType, severity: Severity) -> VulnerabilityIssue {
        VulnerabilityIssue {
            id: format!("{issue_type}_x"),
            issue_type,
            severity,
            title: "t".to_string(),
            description: "d".to_string(),
            line_number: 1,
            code_snippet: "s".to_string(),
            ai_explanation: "e".to_string(),
            confidence_score: 0.92,
            policy_mappings: vec![],
            recommendation: "r".to_string(),
        }
    }

    fn scan_with(vulnerabilities: Vec<VulnerabilityIssue>) -> ScanResult {
        let counts = crate::services::risk::SeverityCounts::tally(&vulnerabilities);
        ScanResult {
            id: Uuid::new_v4(),
            scan_id: Uuid::new_v4(),
            created_at: Utc::now(),
            language: "python".to_string(),
            project_context: "test".to_string(),
            scan_profile: ScanProfile::Demo,
            total_issues: counts.total(),
            critical_count: counts.critical,
            high_count: counts.high,
            medium_count: counts.medium,
            low_count: counts.low,
            risk_score: 0.0,
            deployment_ready: false,
            vulnerabilities,
        }
    }

    #[test]
    fn injection_findings_fail_the_injection_category() {
        let report = build_report(&scan_with(vec![issue(
            RuleType::SqlInjection,
            Severity::Critical,
        )]));
        assert_eq!(report.owasp.mapping.a03_injection.status, "fail");
        assert_eq!(report.owasp.mapping.a03_injection.issues, 1);
        assert_eq!(report.owasp.passed, 4);
        assert_eq!(report.owasp.compliance_score, 80);
    }

    #[test]
    fn injection_category_passes_without_injection_findings() {
        let report = build_report(&scan_with(vec![issue(
            RuleType::WeakCrypto,
            Severity::Medium,
        )]));
        assert_eq!(report.owasp.mapping.a03_injection.status, "pass");
        assert_eq!(report.owasp.mapping.a02_cryptographic_failures.status, "warn");
        assert_eq!(report.owasp.mapping.a02_cryptographic_failures.issues, 1);
    }

    #[test]
    fn path_traversal_counts_against_access_control_without_flagging_it() {
        let report = build_report(&scan_with(vec![issue(
            RuleType::PathTraversal,
            Severity::High,
        )]));
        let a01 = report.owasp.mapping.a01_broken_access_control;
        assert_eq!(a01.status, "pass");
        assert_eq!(a01.issues, 1);
    }

    #[test]
    fn framework_scores_follow_the_counts() {
        let report = build_report(&scan_with(vec![
            issue(RuleType::SqlInjection, Severity::Critical),
            issue(RuleType::PathTraversal, Severity::High),
        ]));

        assert_eq!(report.iso27001.score, 77);
        assert_eq!(report.iso27001.status, "non-compliant");
        assert_eq!(report.iso27001.controls_passed, 32);
        assert_eq!(report.iso27001.controls_total, 50);

        assert_eq!(report.nist.score, 81);
        assert_eq!(report.nist.status, "compliant");
        assert_eq!(report.nist.categories_met, 4);
        assert_eq!(report.nist.framework, "NIST CSF 2.0");
    }

    #[test]
    fn framework_scores_never_go_negative() {
        let issues = (0..15)
            .map(|_| issue(RuleType::SqlInjection, Severity::Critical))
            .collect();
        let report = build_report(&scan_with(issues));
        assert_eq!(report.iso27001.score, 0);
        assert_eq!(report.nist.score, 0);
    }

    #[test]
    fn gdpr_gate_allows_at_most_one_high_and_no_critical() {
        let one_high = build_report(&scan_with(vec![issue(RuleType::Xss, Severity::High)]));
        assert!(one_high.gdpr.compliant);
        assert_eq!(one_high.gdpr.risk_level, "low");
        assert!(!one_high.gdpr.breach_notification_required);

        let two_high = build_report(&scan_with(vec![
            issue(RuleType::Xss, Severity::High),
            issue(RuleType::PathTraversal, Severity::High),
        ]));
        assert!(!two_high.gdpr.compliant);
        assert_eq!(two_high.gdpr.data_protection, "inadequate");
        assert!(two_high.gdpr.breach_notification_required);

        let one_critical = build_report(&scan_with(vec![issue(
            RuleType::HardcodedSecret,
            Severity::Critical,
        )]));
        assert!(!one_critical.gdpr.compliant);
    }

    #[test]
    fn clean_scan_passes_every_category() {
        let report = build_report(&scan_with(vec![]));
        assert_eq!(report.owasp.passed, 5);
        assert_eq!(report.owasp.compliance_score, 100);
        assert_eq!(report.owasp.total_categories, 5);
        assert_eq!(report.iso27001.score, 100);
        assert_eq!(report.nist.score, 100);
        assert!(report.gdpr.compliant);
    }
}
