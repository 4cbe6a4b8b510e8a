//! Scoring of free-text answers given during guided questioning.
//!
//! All functions here are pure: the same input always yields the same verdict.

use tracing::debug;

/// Phrases that mark an answer as "I don't know". Matched as substrings of the
/// normalized answer, so an answer that merely contains one still counts.
const NON_ANSWER_PHRASES: [&str; 14] = [
    "i don't know",
    "i dont know",
    "idk",
    "no idea",
    "not sure",
    "unsure",
    "i have no idea",
    "dont know",
    "cannot remember",
    "can't remember",
    "can't recall",
    "dont recall",
    "no clue",
    "n/a",
];

const HEDGE_MARKERS: [&str; 12] = [
    "maybe",
    "kind of",
    "kinda",
    "sort of",
    "stuff",
    "things",
    "something",
    "somehow",
    "whatever",
    "not really",
    "i guess",
    "probably",
];

const MIN_SUBSTANTIVE_CHARS: usize = 8;
const MIN_SUBSTANTIVE_WORDS: usize = 4;

/// Lowercases, collapses whitespace runs to a single space and trims.
#[must_use]
pub fn normalize(answer: &str) -> String {
    answer
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[must_use]
pub fn is_non_answer(answer: &str) -> bool {
    let normalized = normalize(answer);
    if normalized.is_empty() {
        return true;
    }
    if !normalized.chars().any(char::is_alphanumeric) {
        return true;
    }
    NON_ANSWER_PHRASES
        .iter()
        .any(|phrase| normalized == *phrase || normalized.contains(phrase))
}

/// Too short, too few words, or hedged.
///
/// On its own this does not flag every non-answer ("i don't know anything
/// about this topic" is long enough); use [`classify`] to get the combined
/// verdict.
#[must_use]
pub fn is_vague_answer(answer: &str) -> bool {
    let normalized = normalize(answer);
    if normalized.is_empty() {
        return true;
    }
    if normalized.chars().count() < MIN_SUBSTANTIVE_CHARS {
        return true;
    }
    if normalized.split(' ').filter(|w| !w.is_empty()).count() < MIN_SUBSTANTIVE_WORDS {
        return true;
    }
    HEDGE_MARKERS.iter().any(|marker| normalized.contains(marker))
}

/// Combined verdict on a single answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerQuality {
    NonAnswer,
    Vague,
    Substantive,
}

impl AnswerQuality {
    #[must_use]
    pub fn is_non_answer(self) -> bool {
        matches!(self, AnswerQuality::NonAnswer)
    }

    /// Non-answers always count as vague.
    #[must_use]
    pub fn is_vague(self) -> bool {
        matches!(self, AnswerQuality::NonAnswer | AnswerQuality::Vague)
    }
}

#[must_use]
pub fn classify(answer: &str) -> AnswerQuality {
    let quality = if is_non_answer(answer) {
        AnswerQuality::NonAnswer
    } else if is_vague_answer(answer) {
        AnswerQuality::Vague
    } else {
        AnswerQuality::Substantive
    };
    debug!(?quality, chars = answer.chars().count(), "classified answer");
    quality
}
