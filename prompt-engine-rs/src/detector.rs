// prompt-engine-rs/src/detector.rs
// Character-ratio language detection over the prose part of a message.

use shared_types_rs::Language;

const UKRAINIAN_ALPHABET: &str = "абвгґдеєжзиіїйклмнопрстуфхцчшщьюя";

/// Share of Ukrainian letters above which text is treated as Ukrainian
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Characters that mark a token as a machine identifier rather than a word
const IDENTIFIER_MARKS: &str = "-_./:=";

/// Classifies free text as Ukrainian or English.
///
/// Pure and deterministic. Identifier-like tokens (`CrashLoopBackOff`,
/// `my-app-7d8b`, `--grace-period=0`) are left out of the denominator so a
/// Ukrainian question about a Kubernetes status is still recognised. If the
/// text is nothing but identifiers, every non-whitespace character counts.
#[derive(Debug, Clone, Copy)]
pub struct LanguageDetector {
    threshold: f64,
}

impl Default for LanguageDetector {
    fn default() -> Self {
        Self { threshold: DEFAULT_THRESHOLD }
    }
}

impl LanguageDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn detect(&self, text: &str) -> Language {
        match ukrainian_ratio(text) {
            Some(ratio) if ratio > self.threshold => Language::Ukrainian,
            _ => Language::English,
        }
    }
}

/// `None` for empty or whitespace-only input
fn ukrainian_ratio(text: &str) -> Option<f64> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }

    let prose: Vec<&str> = tokens
        .iter()
        .copied()
        .filter(|t| !is_identifier(t))
        .collect();
    let counted = if prose.is_empty() { &tokens } else { &prose };

    let (mut ukrainian, mut total) = (0usize, 0usize);
    for c in counted.iter().flat_map(|t| t.chars()) {
        total += 1;
        if is_ukrainian_letter(c) {
            ukrainian += 1;
        }
    }
    Some(ukrainian as f64 / total as f64)
}

fn is_ukrainian_letter(c: char) -> bool {
    c.to_lowercase().any(|l| UKRAINIAN_ALPHABET.contains(l))
}

fn is_identifier(token: &str) -> bool {
    if token
        .chars()
        .any(|c| c.is_ascii_digit() || IDENTIFIER_MARKS.contains(c))
    {
        return true;
    }
    // lower followed by upper inside the token: CrashLoopBackOff, ImagePullBackOff
    let chars: Vec<char> = token.chars().collect();
    chars
        .windows(2)
        .any(|w| w[0].is_lowercase() && w[1].is_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Мій pod в CrashLoopBackOff", Language::Ukrainian ; "ukrainian with status identifier")]
    #[test_case("My pod is not starting", Language::English ; "plain english")]
    #[test_case("Чому мій под не запускається?", Language::Ukrainian ; "plain ukrainian")]
    #[test_case("", Language::English ; "empty")]
    #[test_case("   \n\t", Language::English ; "whitespace only")]
    #[test_case("CrashLoopBackOff", Language::English ; "identifier only")]
    #[test_case("ПОД НЕ ПРАЦЮЄ", Language::Ukrainian ; "uppercase ukrainian")]
    #[test_case("kubectl describe pod my-app-7d8b49557f-xyz показує OOMKilled", Language::English ; "mostly english tokens")]
    fn test_detect(text: &str, expected: Language) {
        assert_eq!(LanguageDetector::new().detect(text), expected);
    }

    #[test]
    fn test_detection_is_pure() {
        let detector = LanguageDetector::new();
        let text = "Сервіс недоступний після деплою";
        let first = detector.detect(text);
        for _ in 0..10 {
            assert_eq!(detector.detect(text), first);
        }
    }

    #[test]
    fn test_identifier_tokens() {
        assert!(is_identifier("CrashLoopBackOff"));
        assert!(is_identifier("--grace-period=0"));
        assert!(is_identifier("my-app-7d8b"));
        assert!(!is_identifier("Pending"));
        assert!(!is_identifier("под"));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // 3 of 10 letters are Ukrainian: exactly 0.3 stays English
        let detector = LanguageDetector::new();
        assert_eq!(detector.detect("абв abcdefg"), Language::English);
        assert_eq!(LanguageDetector::with_threshold(0.2).detect("абв abcdefg"), Language::Ukrainian);
    }
}
