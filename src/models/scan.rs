//! Scan models: severities, rule identifiers, request/result shapes, and the
//! stored row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Severity levels for detected issues, serialized capitalized ("Critical").
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Lenient parse used at the storage boundary: unrecognized labels map to
    /// Low so no stored finding ever drops out of the severity counts.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Critical" => Self::Critical,
            "High" => Self::High,
            "Medium" => Self::Medium,
            "Low" => Self::Low,
            _ => Self::Low,
        }
    }

    pub fn is_critical(&self) -> bool {
        matches!(self, Self::Critical)
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label(&label))
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Critical => write!(f, "Critical"),
            Self::High => write!(f, "High"),
            Self::Medium => write!(f, "Medium"),
            Self::Low => write!(f, "Low"),
        }
    }
}

/// Identifiers of the fixed detection rule set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleType {
    SqlInjection,
    Xss,
    HardcodedSecret,
    InsecureDeserialization,
    WeakCrypto,
    PathTraversal,
    CommandInjection,
    MissingAuth,
}

impl RuleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SqlInjection => "SQL_INJECTION",
            Self::Xss => "XSS",
            Self::HardcodedSecret => "HARDCODED_SECRET",
            Self::InsecureDeserialization => "INSECURE_DESERIALIZATION",
            Self::WeakCrypto => "WEAK_CRYPTO",
            Self::PathTraversal => "PATH_TRAVERSAL",
            Self::CommandInjection => "COMMAND_INJECTION",
            Self::MissingAuth => "MISSING_AUTH",
        }
    }
}

impl std::fmt::Display for RuleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scan mode selector. `demo` takes the canned enrichment path; every other
/// profile calls the external analyzer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScanProfile {
    #[serde(alias = "Demo")]
    Demo,
    #[serde(alias = "Fast")]
    Fast,
    #[serde(alias = "Deep")]
    Deep,
    #[serde(alias = "Compliance")]
    Compliance,
}

impl ScanProfile {
    pub fn is_demo(&self) -> bool {
        matches!(self, Self::Demo)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Demo => "demo",
            Self::Fast => "fast",
            Self::Deep => "deep",
            Self::Compliance => "compliance",
        }
    }

    /// Lenient parse for the stored profile label; the profile only selects
    /// behavior at submission time, so retrieval tolerates anything.
    pub fn from_label(label: &str) -> Self {
        match label.to_lowercase().as_str() {
            "fast" => Self::Fast,
            "deep" => Self::Deep,
            "compliance" => Self::Compliance,
            _ => Self::Demo,
        }
    }
}

/// A code submission for scanning. The filename is accepted for parity with
/// upload clients but not persisted.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ScanRequest {
    #[validate(length(min = 1, max = 262144, message = "code must be between 1 and 262144 characters"))]
    pub code: String,
    pub language: String,
    pub project_context: String,
    pub scan_profile: ScanProfile,
    #[serde(default = "default_filename")]
    pub filename: String,
}

fn default_filename() -> String {
    "uploaded_file".to_string()
}

/// A single (rule, pattern, line) match produced by the pattern matcher,
/// before enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFinding {
    pub rule_type: RuleType,
    pub severity: Severity,
    pub title: String,
    pub line_number: usize,
    pub code_snippet: String,
    pub owasp_category: String,
    pub pattern_matched: String,
}

/// An enriched finding as persisted and returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VulnerabilityIssue {
    pub id: String,
    #[serde(rename = "type")]
    pub issue_type: RuleType,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub line_number: usize,
    pub code_snippet: String,
    pub ai_explanation: String,
    pub confidence_score: f64,
    pub policy_mappings: Vec<String>,
    pub recommendation: String,
}

/// Aggregated result of one scan. Created once, persisted immediately, never
/// mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanResult {
    pub id: Uuid,
    pub scan_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub language: String,
    pub project_context: String,
    pub scan_profile: ScanProfile,
    pub total_issues: i32,
    pub critical_count: i32,
    pub high_count: i32,
    pub medium_count: i32,
    pub low_count: i32,
    pub risk_score: f64,
    pub deployment_ready: bool,
    pub vulnerabilities: Vec<VulnerabilityIssue>,
}

/// Database row for the scans table; findings live in a JSONB column.
#[derive(Debug, Clone, FromRow)]
pub struct ScanRecord {
    pub id: Uuid,
    pub scan_id: Uuid,
    pub language: String,
    pub project_context: String,
    pub scan_profile: String,
    pub vulnerabilities: serde_json::Value,
    pub total_issues: i32,
    pub critical_count: i32,
    pub high_count: i32,
    pub medium_count: i32,
    pub low_count: i32,
    pub risk_score: f64,
    pub deployment_ready: bool,
    pub created_at: DateTime<Utc>,
}

impl ScanRecord {
    /// Convert the stored row into the client-facing result. Severity labels
    /// in the JSONB findings go through the lenient parse.
    pub fn into_result(self) -> Result<ScanResult, serde_json::Error> {
        let vulnerabilities: Vec<VulnerabilityIssue> =
            serde_json::from_value(self.vulnerabilities)?;
        Ok(ScanResult {
            id: self.id,
            scan_id: self.scan_id,
            created_at: self.created_at,
            language: self.language,
            project_context: self.project_context,
            scan_profile: ScanProfile::from_label(&self.scan_profile),
            total_issues: self.total_issues,
            critical_count: self.critical_count,
            high_count: self.high_count,
            medium_count: self.medium_count,
            low_count: self.low_count,
            risk_score: self.risk_score,
            deployment_ready: self.deployment_ready,
            vulnerabilities,
        })
    }
}
