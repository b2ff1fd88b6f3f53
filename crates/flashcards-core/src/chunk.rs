//! Word-window chunking of extracted document text.

/// Split `text` into consecutive groups of at most `max_words` words.
///
/// Words are separated by any whitespace and rejoined with single spaces, so
/// the concatenated chunks reproduce the whitespace-normalized word sequence.
/// Only the final chunk may be shorter. Empty or blank input yields no chunks.
/// A `max_words` of zero is treated as one.
pub fn split_text(text: &str, max_words: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(max_words.max(1))
        .map(|group| group.join(" "))
        .collect()
}
