//! Sentence-aligned chunking of document text.
//!
//! Chunks are sized for the summarization engine's practical input limit. Each chunk targets
//! `chunk_size` characters, but the cut is moved to the last sentence end found within
//! `chunk_size + lookahead` characters so per-chunk summaries do not stop mid-thought:
//!
//! - A sentence end is `.`, `!`, or `?` immediately followed by a space.
//! - Without a sentence end in the window, the chunk is hard cut at `chunk_size`.
//! - A remainder that already fits in `chunk_size` becomes the final chunk as is.
//! - Whitespace-only chunks are dropped; every other character of the input lands in exactly one
//!   chunk, in order.

/// Split `text` into borrowed, sentence-aligned chunks.
///
/// A `chunk_size` of zero is treated as one so the scan always advances.
pub fn split_into_chunks(text: &str, chunk_size: usize, lookahead: usize) -> Vec<&str> {
    let chunk_size = chunk_size.max(1);
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let total = chars.len();
    let byte_at = |index: usize| chars.get(index).map_or(text.len(), |(offset, _)| *offset);

    let mut chunks = Vec::new();
    let mut offset = 0;
    while offset < total {
        let cut = if total - offset <= chunk_size {
            total
        } else {
            let window_end = (offset + chunk_size + lookahead).min(total);
            match last_sentence_end(&chars[offset..window_end]) {
                Some(position) => offset + position + 1,
                None => offset + chunk_size,
            }
        };

        let chunk = &text[byte_at(offset)..byte_at(cut)];
        if !chunk.trim().is_empty() {
            chunks.push(chunk);
        }
        offset = cut;
    }

    tracing::trace!(chunks = chunks.len(), chunk_size, lookahead, "Split text into chunks");
    chunks
}

/// Index of the rightmost terminator followed by a space, ignoring the window's first character.
fn last_sentence_end(window: &[(usize, char)]) -> Option<usize> {
    window
        .windows(2)
        .enumerate()
        .rev()
        .find(|(index, pair)| *index > 0 && is_terminator(pair[0].1) && pair[1].1 == ' ')
        .map(|(index, _)| index)
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}
