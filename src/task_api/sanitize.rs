//! Action-item text sanitization.

/// Escape angle brackets and cap the result at `max_length` characters.
///
/// Escaping happens first, so the cap applies to the escaped text and may
/// cut an entity in half.
#[must_use]
pub fn sanitize_text(text: &str, max_length: usize) -> String {
    text.replace('<', "&lt;")
        .replace('>', "&gt;")
        .chars()
        .take(max_length)
        .collect()
}
