//! Deterministic extractive summaries used when the external engine is unavailable.
//!
//! Sentences are ranked by the document-wide frequency of their content words, the best ones are
//! put back in reading order, and the result is rendered as three bulleted sections
//! (`TL;DR`, `Key Points`, `Details`) that read coarse to fine.

use super::types::LengthPreset;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Returned verbatim when the input holds nothing but whitespace.
pub const NO_READABLE_TEXT: &str = "No readable text.";

const MIN_SENTENCE_CHARS: usize = 20;
const MAX_CANDIDATES: usize = 900;
const MIN_WORD_CHARS: usize = 3;
const BULLET: &str = "• ";

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "if", "then", "else", "for", "to", "of", "in", "on",
    "at", "by", "with", "is", "are", "was", "were", "be", "been", "it", "its", "as", "that",
    "this", "these", "those", "from", "we", "you", "your", "they", "their", "he", "she", "his",
    "her", "our", "us",
];

fn word_pattern() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"[a-z][a-z0-9'-]*").expect("word pattern is valid"))
}

/// Build the extractive fallback summary for `raw` at the requested length.
///
/// Never fails; empty or whitespace-only input yields [`NO_READABLE_TEXT`].
pub fn fallback_summary(raw: &str, preset: LengthPreset) -> String {
    let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        return NO_READABLE_TEXT.to_string();
    }

    let sentences: Vec<&str> = split_sentences(&text)
        .into_iter()
        .filter(|sentence| sentence.chars().count() > MIN_SENTENCE_CHARS)
        .take(MAX_CANDIDATES)
        .collect();
    let selected = select_sentences(&sentences, preset.sentence_target());
    tracing::debug!(
        candidates = sentences.len(),
        selected = selected.len(),
        preset = %preset,
        "Built extractive fallback summary"
    );
    render_sections(&selected)
}

/// Split normalized text where `.`, `!`, or `?` is followed by a space and then an ASCII
/// uppercase letter or digit.
fn split_sentences(text: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut sentences = Vec::new();
    let mut start = 0;

    for window in chars.windows(3) {
        let [(_, stop), (space_at, space), (next_at, next)] = [window[0], window[1], window[2]];
        if matches!(stop, '.' | '!' | '?')
            && space.is_whitespace()
            && (next.is_ascii_uppercase() || next.is_ascii_digit())
        {
            sentences.push(&text[start..space_at]);
            start = next_at;
        }
    }
    sentences.push(&text[start..]);
    sentences
}

fn content_words(sentence: &str) -> Vec<String> {
    let lower = sentence.to_lowercase();
    word_pattern()
        .find_iter(&lower)
        .map(|word| word.as_str().to_string())
        .collect()
}

fn is_content_word(word: &str) -> bool {
    word.len() >= MIN_WORD_CHARS && !STOP_WORDS.contains(&word)
}

/// Pick the `target` highest scoring sentences and return them in document order.
fn select_sentences<'a>(sentences: &[&'a str], target: usize) -> Vec<&'a str> {
    let words: Vec<Vec<String>> = sentences.iter().map(|s| content_words(s)).collect();

    let mut frequency: HashMap<&str, usize> = HashMap::new();
    for word in words.iter().flatten() {
        if is_content_word(word) {
            *frequency.entry(word.as_str()).or_default() += 1;
        }
    }

    let mut scored: Vec<(usize, usize)> = words
        .iter()
        .enumerate()
        .map(|(index, sentence_words)| {
            let score = sentence_words
                .iter()
                .map(|word| frequency.get(word.as_str()).copied().unwrap_or(0))
                .sum();
            (index, score)
        })
        .collect();
    // Stable: equal scores keep document order.
    scored.sort_by(|left, right| right.1.cmp(&left.1));

    let mut chosen: Vec<usize> = scored
        .into_iter()
        .take(target.min(sentences.len()))
        .map(|(index, _)| index)
        .collect();
    chosen.sort_unstable();
    chosen.into_iter().map(|index| sentences[index].trim()).collect()
}

fn render_sections(selected: &[&str]) -> String {
    let count = selected.len();
    let third = (count / 3).max(1);
    let first_end = third.min(count);
    let second_end = (third * 2).min(count);

    let sections = [
        ("TL;DR:", &selected[..first_end]),
        ("Key Points:", &selected[first_end..second_end]),
        ("Details:", &selected[second_end..]),
    ];

    let mut lines = Vec::with_capacity(count + 5);
    for (position, (header, sentences)) in sections.iter().enumerate() {
        if position > 0 {
            lines.push(String::new());
        }
        lines.push((*header).to_string());
        lines.extend(sentences.iter().map(|sentence| format!("{BULLET}{sentence}")));
    }
    lines.join("\n")
}
