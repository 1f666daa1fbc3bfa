//! Heuristic vendor and amount extraction from decoded invoice text.
//!
//! Both extractors are ordered strategy lists: patterns are tried in a
//! fixed priority order and the first match wins, even when a later pattern
//! (or a later position in the text) would produce a more plausible value.
//! In particular the amount is the leftmost number-like substring by
//! pattern priority, not necessarily the invoice total. That is preserved
//! behavior, not a bug to fix here.

use std::sync::LazyLock;

use regex::Regex;

/// Fallback vendor when no pattern matches. Never empty.
pub const UNKNOWN_VENDOR: &str = "Неизвестный поставщик";

/// Legal-entity markers, in priority order. A match for an earlier marker
/// wins over any later marker regardless of position in the text, and any
/// marker match wins over the upper-case-line heuristic.
static VENDOR_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // Limited liability company
        Regex::new(r"ООО\s+([^\n]+)").unwrap(),
        // Closed joint-stock company
        Regex::new(r"ЗАО\s+([^\n]+)").unwrap(),
        // Public joint-stock company
        Regex::new(r"ПАО\s+([^\n]+)").unwrap(),
        // Sole proprietor
        Regex::new(r"ИП\s+([^\n]+)").unwrap(),
    ]
});

/// Amount patterns, in priority order: grouped thousands with optional
/// two-digit comma fraction, plain digits with fraction, plain digits.
static AMOUNT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"\d{1,3}(?:\s?\d{3})*(?:,\d{2})?").unwrap(),
        Regex::new(r"\d+(?:,\d{2})?").unwrap(),
        Regex::new(r"\d+").unwrap(),
    ]
});

/// Fields pulled from one document.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFields {
    pub vendor: String,
    pub amount: Option<f64>,
}

/// Extract vendor and amount from full document text.
pub fn extract_fields(text: &str) -> ExtractedFields {
    ExtractedFields {
        vendor: extract_vendor(text),
        amount: extract_amount(text),
    }
}

/// Vendor name: first legal-entity marker match, then the first line that
/// is entirely upper-case or starts with an upper-case character, then the
/// unknown-vendor sentinel.
pub fn extract_vendor(text: &str) -> String {
    for pattern in VENDOR_PATTERNS.iter() {
        if let Some(captures) = pattern.captures(text) {
            return captures[1].trim().to_string();
        }
    }

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if is_all_upper(trimmed) || trimmed.chars().next().is_some_and(char::is_uppercase) {
            return trimmed.to_string();
        }
    }

    UNKNOWN_VENDOR.to_string()
}

/// Amount: first successful parse by pattern priority.
///
/// ASCII spaces are stripped and the comma decimal separator becomes a dot
/// before the `f64` parse. A parse failure falls through to the next
/// pattern rather than erroring.
pub fn extract_amount(text: &str) -> Option<f64> {
    for pattern in AMOUNT_PATTERNS.iter() {
        if let Some(found) = pattern.find(text) {
            let normalized = found.as_str().replace(' ', "").replace(',', ".");
            if let Ok(value) = normalized.parse::<f64>() {
                return Some(value);
            }
        }
    }
    None
}

/// True when the line has at least one cased character and no lower-case
/// character.
fn is_all_upper(s: &str) -> bool {
    s.chars().any(char::is_uppercase) && !s.chars().any(char::is_lowercase)
}
