//! The fixed detection rule table.
//!
//! Single source of truth for each rule's severity and OWASP category tag;
//! nothing else may compute those. Patterns compile once on first use. A
//! pattern that fails to compile is a programming error and panics at
//! startup.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::models::scan::{RuleType, Severity};

/// One detection rule. Patterns are independent alternatives; any one of
/// them matching counts as a finding for this rule.
#[derive(Debug)]
pub struct Rule {
    pub rule_type: RuleType,
    pub patterns: Vec<CompiledPattern>,
    pub severity: Severity,
    pub owasp_category: &'static str,
    pub description: &'static str,
}

/// A compiled pattern together with its source text for reporting.
#[derive(Debug)]
pub struct CompiledPattern {
    pub source: &'static str,
    pub regex: Regex,
}

static RULES: Lazy<Vec<Rule>> = Lazy::new(build_rules);

/// The rule set in evaluation order.
pub fn table() -> &'static [Rule] {
    &RULES
}

fn build_rules() -> Vec<Rule> {
    vec![
        rule(
            RuleType::SqlInjection,
            &[
                r"execute\(.*\+",
                r"SELECT.*\+.*FROM",
                r#"SELECT.*\"\s*\+"#,
                r"WHERE.*\+",
                r"cursor\.execute\(.*%",
            ],
            Severity::Critical,
            "A03:2021 - Injection",
            "SQL Injection vulnerability detected",
        ),
        rule(
            RuleType::Xss,
            &[
                r"innerHTML\s*=",
                r"document\.write\(",
                r"eval\(",
                r"dangerouslySetInnerHTML",
            ],
            Severity::High,
            "A03:2021 - Injection",
            "Cross-Site Scripting (XSS) vulnerability detected",
        ),
        rule(
            RuleType::HardcodedSecret,
            &[
                r#"password\s*=\s*["\'][^"\']"#,
                r#"api[_-]?key\s*=\s*["\'][^"\']"#,
                r#"secret\s*=\s*["\'][^"\']"#,
                r#"token\s*=\s*["\'][^"\']"#,
            ],
            Severity::Critical,
            "A07:2021 - Identification and Authentication Failures",
            "Hardcoded credentials detected",
        ),
        rule(
            RuleType::InsecureDeserialization,
            &[r"pickle\.loads", r"yaml\.load\(", r"eval\(", r"exec\("],
            Severity::Critical,
            "A08:2021 - Software and Data Integrity Failures",
            "Insecure deserialization detected",
        ),
        rule(
            RuleType::WeakCrypto,
            &[r"MD5", r"SHA1", r"DES", r"random\.random\("],
            Severity::Medium,
            "A02:2021 - Cryptographic Failures",
            "Weak cryptographic algorithm detected",
        ),
        rule(
            RuleType::PathTraversal,
            &[r"open\(.*\+", r"os\.path\.join\(.*request", r"readFile\(.*\+"],
            Severity::High,
            "A01:2021 - Broken Access Control",
            "Path traversal vulnerability detected",
        ),
        rule(
            RuleType::CommandInjection,
            &[
                r"os\.system\(.*\+",
                r"subprocess\.call\(.*\+",
                r"exec\(.*shell",
            ],
            Severity::Critical,
            "A03:2021 - Injection",
            "Command injection vulnerability detected",
        ),
        rule(
            RuleType::MissingAuth,
            // Route registrations with no auth-decorator marker anywhere on
            // the line.
            &[r"app\.get\([^@]*\)[^@]*$"],
            Severity::High,
            "A01:2021 - Broken Access Control",
            "Missing authentication check detected",
        ),
    ]
}

fn rule(
    rule_type: RuleType,
    sources: &[&'static str],
    severity: Severity,
    owasp_category: &'static str,
    description: &'static str,
) -> Rule {
    Rule {
        rule_type,
        patterns: sources.iter().map(|&source| compile(source)).collect(),
        severity,
        owasp_category,
        description,
    }
}

fn compile(source: &'static str) -> CompiledPattern {
    let regex = RegexBuilder::new(source)
        .case_insensitive(true)
        .build()
        .unwrap_or_else(|e| panic!("rule pattern {source:?} failed to compile: {e}"));
    CompiledPattern { source, regex }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_builds_with_eight_rules_in_declared_order() {
        let rules = table();
        let order: Vec<RuleType> = rules.iter().map(|r| r.rule_type).collect();
        assert_eq!(
            order,
            vec![
                RuleType::SqlInjection,
                RuleType::Xss,
                RuleType::HardcodedSecret,
                RuleType::InsecureDeserialization,
                RuleType::WeakCrypto,
                RuleType::PathTraversal,
                RuleType::CommandInjection,
                RuleType::MissingAuth,
            ]
        );
    }

    #[test]
    fn every_rule_has_at_least_one_pattern() {
        for rule in table() {
            assert!(
                !rule.patterns.is_empty(),
                "{} has no patterns",
                rule.rule_type
            );
        }
    }

    #[test]
    fn severities_and_owasp_tags_come_from_the_table() {
        let rules = table();
        let sql = &rules[0];
        assert_eq!(sql.severity, Severity::Critical);
        assert_eq!(sql.owasp_category, "A03:2021 - Injection");

        let weak_crypto = rules
            .iter()
            .find(|r| r.rule_type == RuleType::WeakCrypto)
            .unwrap();
        assert_eq!(weak_crypto.severity, Severity::Medium);
        assert_eq!(
            weak_crypto.owasp_category,
            "A02:2021 - Cryptographic Failures"
        );
    }

    #[test]
    fn patterns_match_case_insensitively() {
        let weak_crypto = table()
            .iter()
            .find(|r| r.rule_type == RuleType::WeakCrypto)
            .unwrap();
        let md5 = &weak_crypto.patterns[0];
        assert!(md5.regex.is_match("digest = hashlib.md5(data)"));
        assert!(md5.regex.is_match("digest = MD5(data)"));
    }

    #[test]
    fn eval_is_both_xss_and_deserialization() {
        // The same pattern appears under two rules; a matching line yields a
        // finding for each.
        let has_eval = |t: RuleType| {
            table()
                .iter()
                .find(|r| r.rule_type == t)
                .unwrap()
                .patterns
                .iter()
                .any(|p| p.source == r"eval\(")
        };
        assert!(has_eval(RuleType::Xss));
        assert!(has_eval(RuleType::InsecureDeserialization));
    }

    #[test]
    fn missing_auth_requires_absence_of_decorator_marker() {
        let missing_auth = table()
            .iter()
            .find(|r| r.rule_type == RuleType::MissingAuth)
            .unwrap();
        let pattern = &missing_auth.patterns[0];
        assert!(pattern.regex.is_match("app.get('/admin/users', handler)"));
        assert!(!pattern.regex.is_match("app.get('/admin/users') @requires_auth"));
    }
}
