//! Bounding of oversized document text.

use std::borrow::Cow;

/// Marker inserted between the kept head and tail of a clamped document.
pub const TRUNCATION_MARKER: &str = "\n\n[…truncated…]\n\n";

/// Bound `text` to `ceiling` characters, keeping 70% of the ceiling from the start and 20% from
/// the end joined by [`TRUNCATION_MARKER`]. Text within the ceiling is returned unchanged.
pub fn clamp(text: &str, ceiling: usize) -> Cow<'_, str> {
    let total = text.chars().count();
    if total <= ceiling {
        return Cow::Borrowed(text);
    }

    let head_chars = ceiling * 7 / 10;
    let tail_chars = ceiling * 2 / 10;
    let head = truncate_chars(text, head_chars);
    let tail = &text[byte_offset(text, total - tail_chars)..];

    let mut clamped = String::with_capacity(head.len() + TRUNCATION_MARKER.len() + tail.len());
    clamped.push_str(head);
    clamped.push_str(TRUNCATION_MARKER);
    clamped.push_str(tail);
    tracing::debug!(original_chars = total, ceiling, "Clamped oversized document");
    Cow::Owned(clamped)
}

/// Longest prefix of `text` holding at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    &text[..byte_offset(text, max_chars)]
}

fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(offset, _)| offset)
        .unwrap_or(text.len())
}
