//! Parsing of model replies that are expected to carry JSON.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use feynman_core::model::{PracticeKind, PracticeQuestion, QuestionCategory, QuestionItem};

use crate::error::FetchError;
use crate::questions::NextQuestion;

/// Models often wrap JSON in a Markdown code fence.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

#[derive(Debug, Deserialize)]
struct QuestionReply {
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    hint: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

impl QuestionReply {
    /// `Ok(None)` when the reply carries no question text.
    fn into_item(self) -> Result<Option<QuestionItem>, String> {
        let Some(question) = self.question.filter(|q| !q.trim().is_empty()) else {
            return Ok(None);
        };
        let category = self.category.map_or(QuestionCategory::FollowUp, |raw| {
            raw.parse().unwrap_or_else(|_| {
                warn!(category = %raw, "unknown question category; treating as follow-up");
                QuestionCategory::FollowUp
            })
        });
        QuestionItem::new(question, self.hint, category)
            .map(Some)
            .map_err(|e| e.to_string())
    }
}

/// Parse the reply to an adaptive-question prompt.
///
/// `null`, an object without question text, or `{"nextQuestion": null}` mean the
/// topic is covered.
///
/// # Errors
///
/// Returns `FetchError::Malformed` if the reply is not the expected JSON.
pub fn parse_adaptive_reply(content: &str) -> Result<NextQuestion, FetchError> {
    let value: Value = serde_json::from_str(strip_code_fence(content))
        .map_err(|e| FetchError::Malformed(e.to_string()))?;

    let value = match value {
        Value::Object(mut map) if map.contains_key("nextQuestion") => {
            map.remove("nextQuestion").unwrap_or(Value::Null)
        }
        other => other,
    };
    if value.is_null() {
        return Ok(NextQuestion::EndOfTopic);
    }

    let reply: QuestionReply =
        serde_json::from_value(value).map_err(|e| FetchError::Malformed(e.to_string()))?;
    match reply.into_item().map_err(FetchError::Malformed)? {
        Some(item) => Ok(NextQuestion::Question(item)),
        None => Ok(NextQuestion::EndOfTopic),
    }
}

/// Parse a guided question batch, either a bare array or `{"questions": [...]}`.
///
/// Entries without question text are dropped; unknown categories become
/// follow-ups.
/// Returns `None` when nothing usable is left.
#[must_use]
pub fn parse_guided_questions(content: &str) -> Option<Vec<QuestionItem>> {
    let value: Value = serde_json::from_str(strip_code_fence(content)).ok()?;
    let array = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("questions") {
            Some(Value::Array(items)) => items,
            _ => return None,
        },
        _ => return None,
    };

    let items: Vec<QuestionItem> = array
        .into_iter()
        .filter_map(|v| serde_json::from_value::<QuestionReply>(v).ok())
        .filter_map(|reply| reply.into_item().ok().flatten())
        .collect();

    (!items.is_empty()).then_some(items)
}

/// Parse a practice question batch.
///
/// Accepts a bare array or `{"questions": [...]}`. Any other reply is kept as
/// a single `explanation` question holding the whole text.
#[must_use]
pub fn parse_practice_questions(content: &str) -> Vec<PracticeQuestion> {
    let parsed = serde_json::from_str::<Value>(strip_code_fence(content))
        .ok()
        .and_then(|value| match value {
            Value::Array(items) => Some(items),
            Value::Object(mut map) => match map.remove("questions") {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            },
            _ => None,
        })
        .map(|items| {
            items
                .into_iter()
                .filter_map(|v| serde_json::from_value::<PracticeQuestion>(v).ok())
                .filter(|q| !q.question.trim().is_empty())
                .collect::<Vec<_>>()
        });

    if let Some(items) = parsed {
        return items;
    }
    let text = content.trim();
    if text.is_empty() {
        return Vec::new();
    }
    vec![PracticeQuestion {
        question: text.to_owned(),
        kind: PracticeKind::Explanation,
    }]
}

/// Batch used when the model does not return parseable guided questions.
#[must_use]
pub fn fallback_guided_questions(topic: &str) -> Vec<QuestionItem> {
    vec![
        QuestionItem {
            question: format!("What is {topic} in the simplest terms possible?"),
            hint: Some("Think about how you would explain this to a 10-year-old.".into()),
            category: QuestionCategory::Basic,
        },
        QuestionItem {
            question: format!("Can you give me a real-world example of {topic}?"),
            hint: Some("Think of something you see or use in everyday life.".into()),
            category: QuestionCategory::Example,
        },
        QuestionItem {
            question: format!("What would happen if {topic} didn't exist?"),
            hint: Some("Consider the consequences or importance.".into()),
            category: QuestionCategory::Application,
        },
    ]
}
