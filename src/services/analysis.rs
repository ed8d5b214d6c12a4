//! Vulnerability analysis: canned verdicts for demo scans, live
//! chat-completion verdicts for everything else.
//!
//! Both paths produce an [`Analysis`] and never fail the scan. When the
//! live path cannot reach the model it degrades to a placeholder verdict
//! with a lower confidence score instead of returning an error.

use std::sync::Arc;

use crate::llm::ChatClient;
use crate::models::scan::RawFinding;

const SYSTEM_PROMPT: &str = "You are a security expert analyzing code vulnerabilities. Provide clear, actionable explanations.";

const GENERIC_EXPLANATION: &str =
    "Security vulnerability detected that requires immediate attention.";
const GENERIC_RECOMMENDATION: &str = "Follow security best practices for this vulnerability type.";

const LIVE_RECOMMENDATION: &str = "Follow the remediation steps provided above.";
const DEGRADED_RECOMMENDATION: &str = "Manual review recommended.";

/// How much of the submitted source is forwarded as context to the model.
const CONTEXT_PREFIX_CHARS: usize = 500;

/// Confidence scores attached to each analysis path.
#[derive(Debug, Clone, Copy)]
pub struct ConfidencePolicy {
    pub canned_critical: f64,
    pub canned_default: f64,
    pub live: f64,
    pub degraded: f64,
}

impl Default for ConfidencePolicy {
    fn default() -> Self {
        Self {
            canned_critical: 0.92,
            canned_default: 0.85,
            live: 0.88,
            degraded: 0.75,
        }
    }
}

/// Enrichment attached to a raw finding.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub explanation: String,
    pub confidence: f64,
    pub recommendation: String,
}

/// Produces an [`Analysis`] for one finding. Implementations are infallible
/// from the caller's point of view.
#[async_trait::async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, finding: &RawFinding, code_context: &str) -> Analysis;
}

/// Pre-computed verdicts keyed by rule type. Used for demo scans so they
/// complete instantly and deterministically.
#[derive(Debug, Default)]
pub struct CannedAnalyzer {
    policy: ConfidencePolicy,
}

#[async_trait::async_trait]
impl Analyzer for CannedAnalyzer {
    async fn analyze(&self, finding: &RawFinding, _code_context: &str) -> Analysis {
        let rule = finding.rule_type.as_str();
        let confidence = if finding.severity.is_critical() {
            self.policy.canned_critical
        } else {
            self.policy.canned_default
        };
        Analysis {
            explanation: canned_explanation(rule).to_string(),
            confidence,
            recommendation: canned_recommendation(rule).to_string(),
        }
    }
}

fn canned_explanation(rule: &str) -> &'static str {
    match rule {
        "SQL_INJECTION" => "This code constructs SQL queries using string concatenation with user input, allowing attackers to inject malicious SQL commands. An attacker could extract sensitive data, modify records, or even drop entire tables.",
        "XSS" => "User-controlled data is rendered directly into HTML without sanitization. Attackers can inject malicious scripts that execute in victim browsers, stealing cookies, session tokens, or performing actions on behalf of users.",
        "HARDCODED_SECRET" => "Credentials are stored directly in source code, making them accessible to anyone with code access. If this code is committed to version control or deployed, the secrets are permanently exposed.",
        "INSECURE_DESERIALIZATION" => "Untrusted data is deserialized without validation, allowing attackers to execute arbitrary code by crafting malicious serialized objects.",
        "WEAK_CRYPTO" => "Deprecated cryptographic algorithms like MD5 or SHA1 are vulnerable to collision attacks. Modern systems should use SHA-256 or stronger algorithms.",
        "PATH_TRAVERSAL" => "File paths are constructed using unsanitized user input, allowing attackers to access files outside the intended directory using sequences like ../ to traverse the filesystem.",
        "COMMAND_INJECTION" => "User input is passed to system commands without sanitization, allowing attackers to execute arbitrary shell commands on the server.",
        "MISSING_AUTH" => "This endpoint lacks authentication, allowing unauthorized access to sensitive functionality or data.",
        _ => GENERIC_EXPLANATION,
    }
}

fn canned_recommendation(rule: &str) -> &'static str {
    match rule {
        "SQL_INJECTION" => "Use parameterized queries or ORM frameworks. Example: cursor.execute(\"SELECT * FROM users WHERE id = ?\", (user_id,))",
        "XSS" => "Always sanitize user input before rendering. Use frameworks that auto-escape by default, or use libraries like DOMPurify for client-side sanitization.",
        "HARDCODED_SECRET" => "Store credentials in environment variables or secure secret management systems like AWS Secrets Manager, HashiCorp Vault, or Azure Key Vault.",
        "INSECURE_DESERIALIZATION" => "Avoid deserializing untrusted data. If necessary, use safe formats like JSON and validate all input rigorously.",
        "WEAK_CRYPTO" => "Replace with secure algorithms: SHA-256 or SHA-3 for hashing, AES-256 for encryption, and use cryptographically secure random number generators.",
        "PATH_TRAVERSAL" => "Validate and sanitize all file paths. Use allowlists for permitted directories and reject paths containing ../ or absolute paths.",
        "COMMAND_INJECTION" => "Never pass user input directly to shell commands. Use safe APIs that don't invoke a shell, or strictly validate input against allowlists.",
        "MISSING_AUTH" => "Implement authentication middleware. Use JWT tokens, OAuth2, or session-based auth. Always verify user identity before processing requests.",
        _ => GENERIC_RECOMMENDATION,
    }
}

/// Sends each finding to the chat-completion service for a tailored verdict.
#[derive(Debug)]
pub struct LlmAnalyzer {
    chat: Arc<dyn ChatClient>,
    policy: ConfidencePolicy,
}

impl LlmAnalyzer {
    pub fn new(chat: Arc<dyn ChatClient>) -> Self {
        Self {
            chat,
            policy: ConfidencePolicy::default(),
        }
    }

    fn build_prompt(finding: &RawFinding, code_context: &str) -> String {
        let context: String = code_context.chars().take(CONTEXT_PREFIX_CHARS).collect();
        format!(
            "Analyze this security vulnerability:\n\n\
             Type: {}\n\
             Severity: {}\n\
             Code: {}\n\n\
             Context:\n\
             {}\n\n\
             Provide:\n\
             1. Clear explanation of the vulnerability (2-3 sentences)\n\
             2. Potential attack scenarios\n\
             3. Specific remediation steps\n\n\
             Be concise and practical.",
            finding.rule_type, finding.severity, finding.code_snippet, context
        )
    }
}

#[async_trait::async_trait]
impl Analyzer for LlmAnalyzer {
    async fn analyze(&self, finding: &RawFinding, code_context: &str) -> Analysis {
        let prompt = Self::build_prompt(finding, code_context);
        match self.chat.complete(SYSTEM_PROMPT, &prompt).await {
            Ok(explanation) => Analysis {
                explanation,
                confidence: self.policy.live,
                recommendation: LIVE_RECOMMENDATION.to_string(),
            },
            Err(err) => {
                tracing::error!("AI analysis failed for {}: {}", finding.rule_type, err);
                Analysis {
                    explanation: format!("Security issue detected: {}", finding.title),
                    confidence: self.policy.degraded,
                    recommendation: DEGRADED_RECOMMENDATION.to_string(),
                }
            }
        }
    }
}
