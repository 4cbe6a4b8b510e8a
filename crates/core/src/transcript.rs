use std::fmt;

use crate::ledger::ConversationLedger;
use crate::model::QuestionItem;

/// One question and the learner's answer to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub question: String,
    pub answer: String,
}

/// The learner's combined explanation, assembled from the guided conversation.
///
/// Rendered as one block per entry (bold question line, then the answer),
/// blocks separated by a blank line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    /// Builds a transcript from the ledger, plus the unanswered current
    /// question when a pending answer is supplied and that question is not
    /// already the last one logged.
    #[must_use]
    pub fn build(
        ledger: &ConversationLedger,
        current: Option<&QuestionItem>,
        pending_answer: Option<&str>,
    ) -> Self {
        let mut entries: Vec<TranscriptEntry> = ledger
            .iter()
            .map(|e| TranscriptEntry {
                question: e.question.clone(),
                answer: e.answer.clone(),
            })
            .collect();

        if let (Some(current), Some(pending)) = (current, pending_answer) {
            if ledger.last_question() != Some(current.question.as_str()) {
                entries.push(TranscriptEntry {
                    question: current.question.clone(),
                    answer: pending.trim().to_owned(),
                });
            }
        }

        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("\n\n")?;
            }
            write!(f, "**{}**\n{}", entry.question, entry.answer)?;
        }
        Ok(())
    }
}
