//! Post text sanitization
//!
//! Text scraped from a feed is cleaned before it is used as a cache key or
//! sent to the model.

/// Drop `<` and `>`, drop control characters in U+0000..=U+001F and
/// U+007F..=U+009F, and trim surrounding whitespace.
///
/// Trimming runs last so whitespace uncovered by a stripped character goes
/// too; `sanitize(sanitize(x)) == sanitize(x)`.
pub fn sanitize(text: &str) -> String {
    let filtered: String = text
        .chars()
        .filter(|c| !matches!(c, '<' | '>') && !is_stripped_control(*c))
        .collect();
    filtered.trim().to_string()
}

fn is_stripped_control(c: char) -> bool {
    matches!(c, '\u{0000}'..='\u{001F}' | '\u{007F}'..='\u{009F}')
}
