use async_trait::async_trait;
use serde::Serialize;

use feynman_core::model::{HistoryEntry, Level, Persona, QuestionItem};

use crate::error::FetchError;

/// Everything the question generator needs to pick the next question.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptiveQuestionRequest {
    pub topic: String,
    pub level: Level,
    pub conversation_history: Vec<HistoryEntry>,
    pub current_answer: String,
    pub question_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character_context: Option<Persona>,
}

/// A successful reply from the question generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextQuestion {
    Question(QuestionItem),
    /// The generator judges the topic sufficiently covered.
    EndOfTopic,
}

/// Source of adaptive follow-up questions.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn next_question(
        &self,
        request: &AdaptiveQuestionRequest,
    ) -> Result<NextQuestion, FetchError>;
}
