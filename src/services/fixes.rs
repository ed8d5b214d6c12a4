//! Canned before/after fix templates, looked up by the rule-type prefix of
//! an issue id.

use serde::Serialize;

struct FixEntry {
    original: &'static str,
    fixed: &'static str,
    explanation: &'static str,
    prevents: &'static [&'static str],
}

const SQL_INJECTION_FIX: FixEntry = FixEntry {
    original: "cursor.execute(\"SELECT * FROM users WHERE id = \" + user_id)",
    fixed: "cursor.execute(\"SELECT * FROM users WHERE id = ?\", (user_id,))",
    explanation: "Replaced string concatenation with parameterized query. The database driver handles escaping, preventing SQL injection.",
    prevents: &["SQL Injection", "Data Exfiltration", "Authentication Bypass"],
};

const XSS_FIX: FixEntry = FixEntry {
    original: "element.innerHTML = userInput;",
    fixed: "element.textContent = userInput;\n// Or use DOMPurify: element.innerHTML = DOMPurify.sanitize(userInput);",
    explanation: "Use textContent for plain text or DOMPurify for HTML. This prevents script execution from user input.",
    prevents: &["Cross-Site Scripting", "Session Hijacking", "Cookie Theft"],
};

const HARDCODED_SECRET_FIX: FixEntry = FixEntry {
    original: "API_KEY = \"sk-1234567890abcdef\"",
    fixed: "import os\nAPI_KEY = os.environ.get('API_KEY')\nif not API_KEY:\n    raise ValueError('API_KEY not set')",
    explanation: "Load credentials from environment variables. Never commit secrets to version control.",
    prevents: &["Credential Exposure", "Unauthorized API Access", "Account Takeover"],
};

/// Fix template returned to clients, echoing the requested issue id.
#[derive(Debug, Clone, Serialize)]
pub struct SecureFix {
    pub vulnerability_id: String,
    pub original_code: &'static str,
    pub fixed_code: &'static str,
    pub explanation: &'static str,
    pub prevents_attacks: &'static [&'static str],
}

/// Issue ids look like `SQL_INJECTION_<uuid>`; everything before the final
/// underscore names the rule.
fn rule_prefix(vulnerability_id: &str) -> &str {
    match vulnerability_id.rsplit_once('_') {
        Some((prefix, _)) => prefix,
        None => vulnerability_id,
    }
}

/// Resolve the fix template for an issue id. Rule types without a template
/// fall back to the SQL injection fix.
pub fn lookup(vulnerability_id: &str) -> SecureFix {
    let fix = match rule_prefix(vulnerability_id) {
        "XSS" => &XSS_FIX,
        "HARDCODED_SECRET" => &HARDCODED_SECRET_FIX,
        _ => &SQL_INJECTION_FIX,
    };
    SecureFix {
        vulnerability_id: vulnerability_id.to_string(),
        original_code: fix.original,
        fixed_code: fix.fixed,
        explanation: fix.explanation,
        prevents_attacks: fix.prevents,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xss_prefix_selects_the_xss_template() {
        let fix = lookup("XSS_1f2e3d4c");
        assert_eq!(fix.vulnerability_id, "XSS_1f2e3d4c");
        assert!(fix.fixed_code.contains("textContent"));
        assert_eq!(
            fix.prevents_attacks,
            &["Cross-Site Scripting", "Session Hijacking", "Cookie Theft"]
        );
    }

    #[test]
    fn multi_segment_prefixes_survive_the_split() {
        let fix = lookup("HARDCODED_SECRET_9a8b7c6d");
        assert!(fix.fixed_code.contains("os.environ.get"));
        assert!(fix.explanation.contains("environment variables"));
    }

    #[test]
    fn unrecognized_prefix_falls_back_to_the_sql_template() {
        let fix = lookup("WEAK_CRYPTO_5e6f7a8b");
        assert!(fix.fixed_code.contains("parameterized") || fix.original_code.contains("cursor"));
        assert_eq!(fix.original_code, SQL_INJECTION_FIX.original);
    }

    #[test]
    fn id_without_underscores_falls_back_to_the_sql_template() {
        let fix = lookup("9a8b7c6d");
        assert_eq!(fix.vulnerability_id, "9a8b7c6d");
        assert_eq!(fix.original_code, SQL_INJECTION_FIX.original);
    }
}
