use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuestionError {
    #[error("unknown question category: {0}")]
    UnknownCategory(String),

    #[error("unknown learner level: {0}")]
    UnknownLevel(String),

    #[error("question text is empty")]
    EmptyQuestion,
}

//
// ─── CATEGORY ─────────────────────────────────────────────────────────────────
//

/// What a guided question is probing for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionCategory {
    Basic,
    Process,
    Example,
    Analogy,
    Application,
    FollowUp,
    Clarification,
}

impl QuestionCategory {
    pub const ALL: [QuestionCategory; 7] = [
        QuestionCategory::Basic,
        QuestionCategory::Process,
        QuestionCategory::Example,
        QuestionCategory::Analogy,
        QuestionCategory::Application,
        QuestionCategory::FollowUp,
        QuestionCategory::Clarification,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionCategory::Basic => "basic",
            QuestionCategory::Process => "process",
            QuestionCategory::Example => "example",
            QuestionCategory::Analogy => "analogy",
            QuestionCategory::Application => "application",
            QuestionCategory::FollowUp => "follow-up",
            QuestionCategory::Clarification => "clarification",
        }
    }
}

impl fmt::Display for QuestionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionCategory {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == wanted)
            .ok_or_else(|| QuestionError::UnknownCategory(s.to_owned()))
    }
}

fn default_category() -> QuestionCategory {
    QuestionCategory::FollowUp
}

//
// ─── QUESTION ITEM ────────────────────────────────────────────────────────────
//

/// A single guided question as produced by the tutor backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionItem {
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(default = "default_category")]
    pub category: QuestionCategory,
}

impl QuestionItem {
    /// Builds a question, rejecting blank text.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyQuestion` if `question` is blank.
    pub fn new(
        question: impl Into<String>,
        hint: Option<String>,
        category: QuestionCategory,
    ) -> Result<Self, QuestionError> {
        let question = question.into();
        if question.trim().is_empty() {
            return Err(QuestionError::EmptyQuestion);
        }
        Ok(Self {
            question,
            hint: hint.filter(|h| !h.trim().is_empty()),
            category,
        })
    }
}

//
// ─── PRACTICE ─────────────────────────────────────────────────────────────────
//

/// The kind of understanding a practice question checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PracticeKind {
    Conceptual,
    Application,
    Analogy,
    #[default]
    #[serde(other)]
    Explanation,
}

/// A standalone question for checking understanding of a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeQuestion {
    pub question: String,
    #[serde(rename = "type", default)]
    pub kind: PracticeKind,
}

//
// ─── LEVEL ────────────────────────────────────────────────────────────────────
//

/// Learner level the explanations and questions are pitched at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Level::Beginner),
            "intermediate" => Ok(Level::Intermediate),
            "advanced" => Ok(Level::Advanced),
            _ => Err(QuestionError::UnknownLevel(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trips_through_kebab_case() {
        let json = serde_json::to_string(&QuestionCategory::FollowUp).unwrap();
        assert_eq!(json, "\"follow-up\"");
        assert_eq!(
            "Follow-Up".parse::<QuestionCategory>().unwrap(),
            QuestionCategory::FollowUp
        );
    }

    #[test]
    fn unknown_category_is_rejected() {
        let err = "trivia".parse::<QuestionCategory>().unwrap_err();
        assert_eq!(err, QuestionError::UnknownCategory("trivia".into()));
        assert!(serde_json::from_str::<QuestionCategory>("\"trivia\"").is_err());
    }

    #[test]
    fn item_defaults_missing_fields() {
        let item: QuestionItem =
            serde_json::from_str(r#"{"question":"Why is the sky blue?"}"#).unwrap();
        assert_eq!(item.category, QuestionCategory::FollowUp);
        assert!(item.hint.is_none());
    }

    #[test]
    fn new_rejects_blank_question_and_drops_blank_hint() {
        assert_eq!(
            QuestionItem::new("  ", None, QuestionCategory::Basic).unwrap_err(),
            QuestionError::EmptyQuestion
        );
        let item =
            QuestionItem::new("What is it?", Some(" ".into()), QuestionCategory::Basic).unwrap();
        assert!(item.hint.is_none());
    }

    #[test]
    fn practice_kind_defaults_to_explanation() {
        let known: PracticeQuestion =
            serde_json::from_str(r#"{"question":"Why?","type":"analogy"}"#).unwrap();
        assert_eq!(known.kind, PracticeKind::Analogy);

        let odd: PracticeQuestion =
            serde_json::from_str(r#"{"question":"Why?","type":"essay"}"#).unwrap();
        assert_eq!(odd.kind, PracticeKind::Explanation);

        let missing: PracticeQuestion = serde_json::from_str(r#"{"question":"Why?"}"#).unwrap();
        assert_eq!(missing.kind, PracticeKind::Explanation);
    }

    #[test]
    fn level_parses_case_insensitively() {
        assert_eq!("Advanced".parse::<Level>().unwrap(), Level::Advanced);
        assert!("expert".parse::<Level>().is_err());
        assert_eq!(Level::default().to_string(), "beginner");
    }
}
