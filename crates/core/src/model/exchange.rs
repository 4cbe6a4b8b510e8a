use serde::{Deserialize, Serialize};

use crate::model::question::{QuestionCategory, QuestionItem};

/// Answer text recorded when the learner skips a question.
pub const SKIPPED_ANSWER: &str = "[Skipped]";

/// One question/answer pair in the guided conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub question: String,
    pub answer: String,
    pub category: QuestionCategory,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl Exchange {
    #[must_use]
    pub fn answered(item: &QuestionItem, answer: impl Into<String>, timestamp: i64) -> Self {
        Self {
            question: item.question.clone(),
            answer: answer.into(),
            category: item.category,
            timestamp,
        }
    }

    #[must_use]
    pub fn is_skipped(&self) -> bool {
        self.answer == SKIPPED_ANSWER
    }

    /// Wire shape sent to the question generator.
    #[must_use]
    pub fn history_entry(&self) -> HistoryEntry {
        HistoryEntry {
            question: self.question.clone(),
            answer: self.answer.clone(),
            category: self.category,
        }
    }
}

/// Timestamp-free view of an exchange, as passed to the question generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub question: String,
    pub answer: String,
    pub category: QuestionCategory,
}
