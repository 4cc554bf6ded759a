//! Credential redaction
//!
//! Every error leaving the git layer passes through this single boundary,
//! which replaces any literal token substring with a fixed marker. A token
//! must never reach a caller through error text, whatever channel put it
//! there.

/// Marker substituted for the literal token value
pub const REDACTION_MARKER: &str = "REDACTED_TOKEN";

/// Replace every occurrence of the token in `text` with the marker
///
/// No-op when no token is configured or the token is empty.
pub fn scrub(text: &str, token: Option<&str>) -> String {
    match token {
        Some(token) if !token.is_empty() => text.replace(token, REDACTION_MARKER),
        _ => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrub_replaces_token() {
        let scrubbed = scrub(
            "there is something wrong with your token - faketoken",
            Some("faketoken"),
        );
        assert_eq!(
            scrubbed,
            "there is something wrong with your token - REDACTED_TOKEN"
        );
        assert!(!scrubbed.contains("faketoken"));
    }

    #[test]
    fn test_scrub_replaces_every_occurrence() {
        let scrubbed = scrub("abc123 then abc123 again", Some("abc123"));
        assert_eq!(scrubbed.matches(REDACTION_MARKER).count(), 2);
        assert!(!scrubbed.contains("abc123"));
    }

    #[test]
    fn test_scrub_without_token_is_identity() {
        assert_eq!(scrub("clone failed", None), "clone failed");
        assert_eq!(scrub("clone failed", Some("")), "clone failed");
    }
}
