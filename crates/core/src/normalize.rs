//! Free-text entry normalization.
//!
//! Every free-text field (names, part descriptions, serials, faults) is
//! trimmed and uppercased at entry, matching how the original forms stored
//! data. Search stays case-insensitive on top of this so pre-normalization
//! records still match.

/// Trim and uppercase an entry value.
pub fn upper(s: &str) -> String {
    s.trim().to_uppercase()
}

/// Normalize an optional field, mapping blank input to `None`.
pub fn upper_opt(s: &Option<String>) -> Option<String> {
    s.as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_uppercase)
}

/// Whether a required field is effectively blank.
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upper_trims_and_uppercases() {
        assert_eq!(upper("  ram kumar "), "RAM KUMAR");
    }

    #[test]
    fn upper_opt_drops_blank_values() {
        assert_eq!(upper_opt(&Some("  ".to_string())), None);
        assert_eq!(upper_opt(&None), None);
        assert_eq!(upper_opt(&Some("mx-99".to_string())), Some("MX-99".into()));
    }
}
