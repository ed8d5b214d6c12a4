//! Line-oriented pattern matching over the fixed rule table.

use crate::models::scan::RawFinding;
use crate::rules;

/// Scan the submitted source line by line against every rule pattern.
///
/// Iteration is rule-major (rule, then pattern, then line), so output is
/// grouped by rule type rather than line number. A line matching several
/// patterns yields one finding per match; nothing is deduplicated. The
/// declared language never selects rules, so it is not an input here.
pub fn detect(code: &str) -> Vec<RawFinding> {
    let lines: Vec<&str> = code.lines().collect();
    let mut findings = Vec::new();

    for rule in rules::table() {
        for pattern in &rule.patterns {
            for (idx, line) in lines.iter().enumerate() {
                if pattern.regex.is_match(line) {
                    findings.push(RawFinding {
                        rule_type: rule.rule_type,
                        severity: rule.severity,
                        title: rule.description.to_string(),
                        line_number: idx + 1,
                        code_snippet: line.trim().to_string(),
                        owasp_category: rule.owasp_category.to_string(),
                        pattern_matched: pattern.source.to_string(),
                    });
                }
            }
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scan::{RuleType, Severity};

    #[test]
    fn flags_sql_injection_with_exact_line_number() {
        let code = "# user lookup\nquery = \"SELECT * FROM users WHERE id = \" + user_id\n";
        let findings = detect(code);

        let sql: Vec<&RawFinding> = findings
            .iter()
            .filter(|f| f.rule_type == RuleType::SqlInjection)
            .collect();
        assert!(!sql.is_empty());
        for finding in &sql {
            assert_eq!(finding.line_number, 2);
            assert_eq!(finding.severity, Severity::Critical);
            assert_eq!(
                finding.code_snippet,
                "query = \"SELECT * FROM users WHERE id = \" + user_id"
            );
        }
    }

    #[test]
    fn clean_input_yields_no_findings() {
        let code = "fn add(a: u32, b: u32) -> u32 {\n    a + b\n}\n";
        assert!(detect(code).is_empty());
        assert!(detect("").is_empty());
    }

    #[test]
    fn output_is_rule_major_not_line_major() {
        // XSS on line 1, SQL injection on line 2. SQL injection comes first
        // in the table, so its finding leads despite the later line.
        let code = "element.innerHTML = payload\ncursor.execute(\"SELECT * FROM t WHERE id = \" + id)\n";
        let findings = detect(code);

        assert!(findings.len() >= 2);
        assert_eq!(findings[0].rule_type, RuleType::SqlInjection);
        assert_eq!(findings[0].line_number, 2);
        let xss_pos = findings
            .iter()
            .position(|f| f.rule_type == RuleType::Xss)
            .unwrap();
        assert!(xss_pos > 0);
    }

    #[test]
    fn one_line_can_match_multiple_rules() {
        let findings = detect("data = eval(payload)\n");
        let types: Vec<RuleType> = findings.iter().map(|f| f.rule_type).collect();
        assert!(types.contains(&RuleType::Xss));
        assert!(types.contains(&RuleType::InsecureDeserialization));
        for finding in &findings {
            assert_eq!(finding.line_number, 1);
        }
    }

    #[test]
    fn matching_is_case_insensitive() {
        let findings = detect("PASSWORD = 'hunter2'\n");
        assert!(findings
            .iter()
            .any(|f| f.rule_type == RuleType::HardcodedSecret));
    }

    #[test]
    fn snippet_is_trimmed() {
        let findings = detect("    token = \"abc123\"   \n");
        let secret = findings
            .iter()
            .find(|f| f.rule_type == RuleType::HardcodedSecret)
            .unwrap();
        assert_eq!(secret.code_snippet, "token = \"abc123\"");
    }

    #[test]
    fn finding_carries_rule_metadata() {
        let findings = detect("h = hashlib.md5(data)\n");
        let weak = findings
            .iter()
            .find(|f| f.rule_type == RuleType::WeakCrypto)
            .unwrap();
        assert_eq!(weak.severity, Severity::Medium);
        assert_eq!(weak.owasp_category, "A02:2021 - Cryptographic Failures");
        assert_eq!(weak.title, "Weak cryptographic algorithm detected");
        assert_eq!(weak.pattern_matched, r"MD5");
    }

    #[test]
    fn unauthenticated_route_is_flagged() {
        let findings = detect("app.get('/admin/users', (req, res) => {\n");
        assert!(findings
            .iter()
            .any(|f| f.rule_type == RuleType::MissingAuth));

        let guarded = detect("app.get('/admin/users') @requires_auth\n");
        assert!(!guarded
            .iter()
            .any(|f| f.rule_type == RuleType::MissingAuth));
    }
}
