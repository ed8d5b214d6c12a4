//! Scan orchestration: run the pattern matcher, enrich the findings, compute
//! the aggregate verdict, and persist the result.

use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm::ChatClient;
use crate::models::scan::{RawFinding, ScanRecord, ScanRequest, ScanResult, VulnerabilityIssue};
use crate::services::analysis::{Analysis, Analyzer, CannedAnalyzer, LlmAnalyzer};
use crate::services::detector;
use crate::services::risk::{self, DeploymentPolicy, RiskWeights, SeverityCounts};

/// Upper bound on findings enriched and persisted per scan. Matches beyond
/// this are dropped in detection order.
pub const MAX_ENRICHED_FINDINGS: usize = 15;

/// Demo scans get canned verdicts; every other profile goes to the model.
pub fn select_analyzer(
    request: &ScanRequest,
    chat: Arc<dyn ChatClient>,
) -> Box<dyn Analyzer> {
    if request.scan_profile.is_demo() {
        Box::new(CannedAnalyzer::default())
    } else {
        Box::new(LlmAnalyzer::new(chat))
    }
}

/// Run the full pipeline for one submission without touching storage.
pub async fn run_scan(request: &ScanRequest, analyzer: &dyn Analyzer) -> ScanResult {
    let scan_id = Uuid::new_v4();
    let findings = detector::detect(&request.code);

    let mut vulnerabilities = Vec::new();
    for finding in findings.into_iter().take(MAX_ENRICHED_FINDINGS) {
        let analysis = analyzer.analyze(&finding, &request.code).await;
        vulnerabilities.push(build_issue(finding, analysis));
    }

    let counts = SeverityCounts::tally(&vulnerabilities);
    let risk_score = risk::risk_score(&counts, &RiskWeights::default());
    let deployment_ready = risk::deployment_ready(&counts, &DeploymentPolicy::default());

    ScanResult {
        id: Uuid::new_v4(),
        scan_id,
        created_at: Utc::now(),
        language: request.language.clone(),
        project_context: request.project_context.clone(),
        scan_profile: request.scan_profile,
        total_issues: counts.total(),
        critical_count: counts.critical,
        high_count: counts.high,
        medium_count: counts.medium,
        low_count: counts.low,
        risk_score,
        deployment_ready,
        vulnerabilities,
    }
}

/// Scan, persist, and return the result.
pub async fn analyze(
    pool: &PgPool,
    chat: Arc<dyn ChatClient>,
    request: &ScanRequest,
) -> Result<ScanResult, AppError> {
    let analyzer = select_analyzer(request, chat);
    let result = run_scan(request, analyzer.as_ref()).await;
    insert(pool, &result).await?;
    tracing::info!(
        "Scan {} completed: {} issues, risk score {}",
        result.scan_id,
        result.total_issues,
        result.risk_score
    );
    Ok(result)
}

/// Fetch a stored scan by its public scan id.
pub async fn get(pool: &PgPool, scan_id: Uuid) -> Result<ScanResult, AppError> {
    let record = sqlx::query_as::<_, ScanRecord>(
        r#"
        SELECT id, scan_id, language, project_context, scan_profile, vulnerabilities,
               total_issues, critical_count, high_count, medium_count, low_count,
               risk_score, deployment_ready, created_at
        FROM scans
        WHERE scan_id = $1
        "#,
    )
    .bind(scan_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Scan {scan_id} not found")))?;

    record
        .into_result()
        .map_err(|err| AppError::Internal(format!("stored scan {scan_id} is corrupt: {err}")))
}

/// Issue ids carry the rule type as a prefix so the secure-fix lookup can
/// recover it later.
fn build_issue(finding: RawFinding, analysis: Analysis) -> VulnerabilityIssue {
    VulnerabilityIssue {
        id: format!("{}_{}", finding.rule_type, Uuid::new_v4()),
        issue_type: finding.rule_type,
        severity: finding.severity,
        title: finding.title,
        description: finding.owasp_category.clone(),
        line_number: finding.line_number,
        code_snippet: finding.code_snippet,
        ai_explanation: analysis.explanation,
        confidence_score: analysis.confidence,
        policy_mappings: vec![finding.owasp_category],
        recommendation: analysis.recommendation,
    }
}

async fn insert(pool: &PgPool, result: &ScanResult) -> Result<(), AppError> {
    let vulnerabilities = serde_json::to_value(&result.vulnerabilities)
        .map_err(|err| AppError::Internal(format!("failed to serialize findings: {err}")))?;

    sqlx::query(
        r#"
        INSERT INTO scans (id, scan_id, language, project_context, scan_profile,
                           vulnerabilities, total_issues, critical_count, high_count,
                           medium_count, low_count, risk_score, deployment_ready, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        "#,
    )
    .bind(result.id)
    .bind(result.scan_id)
    .bind(&result.language)
    .bind(&result.project_context)
    .bind(result.scan_profile.as_str())
    .bind(vulnerabilities)
    .bind(result.total_issues)
    .bind(result.critical_count)
    .bind(result.high_count)
    .bind(result.medium_count)
    .bind(result.low_count)
    .bind(result.risk_score)
    .bind(result.deployment_ready)
    .bind(result.created_at)
    .execute(pool)
    .await?;

    Ok(())
}
