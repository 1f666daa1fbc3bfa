//! Language gate for extracted documents.
//!
//! Classification runs on best-effort decoded bytes, not on structured PDF
//! text: binary PDF structure can dilute the Cyrillic ratio and exclude a
//! genuine Russian invoice. That imprecision is accepted and documented.

/// Share of non-whitespace characters that must be Russian letters for a
/// document to classify as Russian. Strictly greater-than.
const RUSSIAN_RATIO_THRESHOLD: f64 = 0.30;

/// Heuristic Russian-text classifier based on script character ratio.
///
/// Deterministic: the same input always yields the same decision.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptRatioClassifier;

impl ScriptRatioClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Decode document bytes and classify them.
    ///
    /// Total: undecodable input goes through the Latin-1 fallback and then
    /// simply fails the ratio test, so classification itself cannot error.
    pub fn classify_bytes(&self, bytes: &[u8]) -> bool {
        self.classify_text(&decode_lossy(bytes))
    }

    /// Classify already-decoded text.
    ///
    /// Returns false for text that is empty after trimming.
    pub fn classify_text(&self, text: &str) -> bool {
        let mut total = 0usize;
        let mut russian = 0usize;
        for c in text.chars() {
            if c.is_whitespace() {
                continue;
            }
            total += 1;
            if is_russian_letter(c) {
                russian += 1;
            }
        }
        if total == 0 {
            return false;
        }
        russian as f64 / total as f64 > RUSSIAN_RATIO_THRESHOLD
    }
}

/// Upper or lower case letter of the Russian alphabet, including ё/Ё.
fn is_russian_letter(c: char) -> bool {
    ('а'..='я').contains(&c) || ('А'..='Я').contains(&c) || c == 'ё' || c == 'Ё'
}

/// Decode document bytes as UTF-8, falling back to Latin-1 when the input
/// is not valid UTF-8.
///
/// Latin-1 maps every byte to its code point, so the fallback cannot fail
/// and nothing is dropped.
pub fn decode_lossy(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}
