//! Parsing of the model's textual verdict
//!
//! The model is asked to answer `"<true|false>: reason, reason"`. Parsing is
//! lenient: anything that is not a literal `true` before the first colon is a
//! clean verdict, and a missing colon means no reasons.

use cringeguard_core::ClassificationResult;

/// Turn a verdict line into a [`ClassificationResult`]
pub fn parse_verdict(text: &str) -> ClassificationResult {
    let text = text.to_lowercase();
    let (verdict, reasons) = match text.split_once(':') {
        Some((verdict, reasons)) => (verdict.trim(), reasons.trim()),
        None => (text.trim(), ""),
    };

    let reasons = if reasons.is_empty() {
        Vec::new()
    } else {
        reasons.split(',').map(|r| r.trim().to_string()).collect()
    };

    ClassificationResult {
        is_cringe: verdict == "true",
        reasons,
    }
}
