// prompt-safety-rs/src/redact.rs
// Masks credentials and addresses before text reaches the logs.
// Never applied to content sent to the generation backend.

use once_cell::sync::Lazy;
use regex::Regex;

pub const REDACTED: &str = "***REDACTED***";
pub const MASKED_IP: &str = "XXX.XXX.XXX.XXX";

static SECRET_ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(password|token|secret|key)[\s:=]+\S+")
        .unwrap_or_else(|e| panic!("invalid secret pattern: {}", e))
});

static IPV4_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b")
        .unwrap_or_else(|e| panic!("invalid address pattern: {}", e))
});

/// `password: hunter2` becomes `password=***REDACTED***`, and every IPv4
/// literal becomes `XXX.XXX.XXX.XXX`.
pub fn redact(text: &str) -> String {
    let masked = SECRET_ASSIGNMENT.replace_all(text, format!("${{1}}={}", REDACTED).as_str());
    IPV4_LITERAL.replace_all(&masked, MASKED_IP).into_owned()
}

/// Redacted and cut to `max_chars` characters, for debug previews
pub fn preview(text: &str, max_chars: usize) -> String {
    let redacted = redact(text);
    match redacted.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &redacted[..cut]),
        None => redacted,
    }
}
