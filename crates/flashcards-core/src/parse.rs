//! Extraction of `Q: ... A: ...` pairs from free-text completion replies.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::Flashcard;

/// Matches a question marker, the (lazy) question text and its answer marker.
/// The answer itself runs from the end of this match up to the next
/// newline-prefixed `Q:` or the end of input.
static QUESTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)Q:\s*(.*?)\s*A:\s*").expect("valid question regex"));

const NEXT_QUESTION: &str = "\nQ:";

/// Parse every question/answer pair in `raw`, in order of appearance.
///
/// Replies that do not follow the `Q:`/`A:` shape yield an empty list rather
/// than an error.
pub fn parse_flashcards(raw: &str) -> Vec<Flashcard> {
    let mut cards = Vec::new();
    let mut pos = 0;

    while pos < raw.len() {
        let Some(caps) = QUESTION_RE.captures_at(raw, pos) else {
            break;
        };
        let (Some(whole), Some(question)) = (caps.get(0), caps.get(1)) else {
            break;
        };

        let answer_start = whole.end();
        let rest = &raw[answer_start..];
        let answer_len = rest.find(NEXT_QUESTION).unwrap_or(rest.len());
        let answer = &rest[..answer_len];

        cards.push(Flashcard::new(question.as_str().trim(), answer.trim()));

        // An empty match cannot happen ("Q:" and "A:" are consumed), so this
        // always advances.
        pos = answer_start + answer_len;
    }

    cards
}
