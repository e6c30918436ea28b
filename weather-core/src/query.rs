use serde::{Deserialize, Serialize};

/// How a location string is sent to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryKind {
    /// Exactly five decimal digits, sent as `zip=<code>,<country>`.
    PostalCode,
    /// Anything else, sent as free text in `q`.
    PlaceName,
}

/// Classify a location string. Surrounding whitespace is ignored.
pub fn classify(input: &str) -> QueryKind {
    let s = input.trim();
    if s.len() == 5 && s.bytes().all(|b| b.is_ascii_digit()) {
        QueryKind::PostalCode
    } else {
        QueryKind::PlaceName
    }
}
