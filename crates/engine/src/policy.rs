use serde::Serialize;

/// Result of validating a policy number against an insurer's format rules.
#[derive(Debug, Clone, Serialize)]
pub struct PolicyValidation {
    /// Whether the number passes the format check.
    pub valid: bool,
    /// Masked rendition showing only the last four digits, when any digits
    /// were present.
    pub normalized: Option<String>,
    /// Hints the caller can show when the number is rejected.
    pub hints: Vec<String>,
}

/// Validate a policy number: at least six digits once separators are
/// stripped, normalized as `****<last4>`.
#[must_use]
pub fn validate_policy_number(policy_number: &str) -> PolicyValidation {
    let digits: String = policy_number
        .trim()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();

    let valid = digits.len() >= 6;
    let normalized = if digits.is_empty() {
        None
    } else {
        let last4_start = digits.len().saturating_sub(4);
        Some(format!("****{}", &digits[last4_start..]))
    };
    let hints = if valid {
        Vec::new()
    } else {
        vec!["Policy number too short".to_owned()]
    };

    PolicyValidation {
        valid,
        normalized,
        hints,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separated_number_is_masked_and_valid() {
        let result = validate_policy_number("ABC-123-456");
        assert!(result.valid);
        assert_eq!(result.normalized.as_deref(), Some("****3456"));
        assert!(result.hints.is_empty());
    }

    #[test]
    fn short_number_is_rejected_with_hint() {
        let result = validate_policy_number("12");
        assert!(!result.valid);
        assert_eq!(result.normalized.as_deref(), Some("****12"));
        assert_eq!(result.hints, vec!["Policy number too short".to_owned()]);
    }

    #[test]
    fn no_digits_yields_no_normalization() {
        let result = validate_policy_number("no-digits-here");
        assert!(!result.valid);
        assert!(result.normalized.is_none());
    }

    #[test]
    fn whitespace_is_trimmed() {
        let result = validate_policy_number("  987654  ");
        assert!(result.valid);
        assert_eq!(result.normalized.as_deref(), Some("****7654"));
    }

    #[test]
    fn exactly_six_digits_is_valid() {
        assert!(validate_policy_number("123456").valid);
        assert!(!validate_policy_number("12345").valid);
    }
}
