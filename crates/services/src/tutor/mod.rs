pub mod prompts;
pub mod replies;

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use feynman_core::model::{Level, Persona, PracticeQuestion, QuestionItem};

use crate::error::{FetchError, TutorError};
use crate::questions::{AdaptiveQuestionRequest, NextQuestion, QuestionSource};
use prompts::ChatPrompt;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for an OpenAI-compatible chat completions API.
#[derive(Clone, Debug)]
pub struct TutorConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

impl TutorConfig {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Reads `FEYNMAN_AI_API_KEY` (or `OPENAI_API_KEY`), `FEYNMAN_AI_BASE_URL`,
    /// `FEYNMAN_AI_MODEL` and `FEYNMAN_AI_TIMEOUT_SECS`.
    ///
    /// Returns `None` when no API key is set.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("FEYNMAN_AI_API_KEY")
            .or_else(|_| env::var("OPENAI_API_KEY"))
            .ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url = env::var("FEYNMAN_AI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let model = env::var("FEYNMAN_AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
        let timeout_secs = env::var("FEYNMAN_AI_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Some(Self {
            base_url,
            api_key,
            model,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Tutor operations of a learning session besides question follow-ups.
#[async_trait]
pub trait Tutor: QuestionSource {
    async fn explain(
        &self,
        topic: &str,
        level: Level,
        persona: Option<&Persona>,
    ) -> Result<String, TutorError>;

    async fn guided_questions(
        &self,
        topic: &str,
        level: Level,
        persona: Option<&Persona>,
    ) -> Result<Vec<QuestionItem>, TutorError>;

    /// `count` standalone questions that check understanding of `topic`.
    async fn practice_questions(
        &self,
        topic: &str,
        level: Level,
        count: u8,
    ) -> Result<Vec<PracticeQuestion>, TutorError>;

    async fn identify_gaps(
        &self,
        topic: &str,
        explanation: &str,
        persona: Option<&Persona>,
    ) -> Result<String, TutorError>;

    async fn refine_explanation(
        &self,
        topic: &str,
        explanation: &str,
        audience: &str,
        persona: Option<&Persona>,
    ) -> Result<String, TutorError>;
}

/// Tutor backed by a chat completions endpoint.
#[derive(Clone)]
pub struct TutorClient {
    client: Client,
    config: Option<TutorConfig>,
}

impl TutorClient {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(TutorConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<TutorConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Send one prompt and return the trimmed reply text.
    ///
    /// # Errors
    ///
    /// Returns `TutorError` when the client is disabled, the request fails,
    /// or the response is empty.
    pub async fn complete(&self, prompt: &ChatPrompt) -> Result<String, TutorError> {
        let config = self.config.as_ref().ok_or(TutorError::Disabled)?;

        let url = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
        let payload = ChatRequest {
            model: config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompt.system.clone(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt.user.clone(),
                },
            ],
            max_tokens: prompt.max_tokens,
            temperature: prompt.temperature,
        };

        debug!(model = %config.model, max_tokens = prompt.max_tokens, "sending tutor prompt");
        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .timeout(config.timeout)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TutorError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(TutorError::EmptyResponse)?;

        Ok(content.trim().to_string())
    }
}

fn require(value: &str, what: &'static str) -> Result<(), TutorError> {
    if value.trim().is_empty() {
        return Err(TutorError::InvalidRequest(what));
    }
    Ok(())
}

#[async_trait]
impl Tutor for TutorClient {
    async fn explain(
        &self,
        topic: &str,
        level: Level,
        persona: Option<&Persona>,
    ) -> Result<String, TutorError> {
        require(topic, "topic is required")?;
        self.complete(&prompts::explanation(topic, level, persona))
            .await
    }

    async fn guided_questions(
        &self,
        topic: &str,
        level: Level,
        persona: Option<&Persona>,
    ) -> Result<Vec<QuestionItem>, TutorError> {
        require(topic, "topic is required")?;
        let reply = self
            .complete(&prompts::guided_questions(topic, level, persona))
            .await?;
        Ok(replies::parse_guided_questions(&reply).unwrap_or_else(|| {
            warn!(topic, "guided questions reply was not usable JSON; using fallback batch");
            replies::fallback_guided_questions(topic)
        }))
    }

    async fn practice_questions(
        &self,
        topic: &str,
        level: Level,
        count: u8,
    ) -> Result<Vec<PracticeQuestion>, TutorError> {
        require(topic, "topic is required")?;
        if count == 0 {
            return Err(TutorError::InvalidRequest("question count must be positive"));
        }
        let reply = self
            .complete(&prompts::practice_questions(topic, level, count))
            .await?;
        Ok(replies::parse_practice_questions(&reply))
    }

    async fn identify_gaps(
        &self,
        topic: &str,
        explanation: &str,
        persona: Option<&Persona>,
    ) -> Result<String, TutorError> {
        require(topic, "topic is required")?;
        require(explanation, "explanation is required")?;
        self.complete(&prompts::knowledge_gaps(topic, explanation, persona))
            .await
    }

    async fn refine_explanation(
        &self,
        topic: &str,
        explanation: &str,
        audience: &str,
        persona: Option<&Persona>,
    ) -> Result<String, TutorError> {
        require(topic, "topic is required")?;
        require(explanation, "explanation is required")?;
        self.complete(&prompts::refinement(topic, explanation, audience, persona))
            .await
    }
}

#[async_trait]
impl QuestionSource for TutorClient {
    async fn next_question(
        &self,
        request: &AdaptiveQuestionRequest,
    ) -> Result<NextQuestion, FetchError> {
        require(&request.topic, "topic is required")?;
        let reply = self.complete(&prompts::adaptive_question(request)).await?;
        replies::parse_adaptive_reply(&reply)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_client_reports_disabled() {
        let client = TutorClient::new(None);
        assert!(!client.enabled());
        let err = client
            .explain("Gravity", Level::Beginner, None)
            .await
            .unwrap_err();
        assert!(matches!(err, TutorError::Disabled));
    }

    #[tokio::test]
    async fn blank_topic_is_rejected_before_any_request() {
        let client = TutorClient::new(Some(TutorConfig::new("key")));
        let err = client
            .identify_gaps("  ", "something", None)
            .await
            .unwrap_err();
        assert!(matches!(err, TutorError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn zero_practice_questions_is_rejected() {
        let client = TutorClient::new(Some(TutorConfig::new("key")));
        let err = client
            .practice_questions("Gravity", Level::Beginner, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, TutorError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn disabled_question_source_is_a_fetch_error() {
        let client = TutorClient::new(None);
        let request = AdaptiveQuestionRequest {
            topic: "Gravity".into(),
            level: Level::Beginner,
            conversation_history: Vec::new(),
            current_answer: "It pulls things down".into(),
            question_count: 1,
            character_context: None,
        };
        let err = client.next_question(&request).await.unwrap_err();
        assert!(matches!(err, FetchError::Tutor(TutorError::Disabled)));
    }

    #[test]
    fn chat_request_serializes_both_messages() {
        let payload = ChatRequest {
            model: "m".into(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "s".into(),
                },
                ChatMessage {
                    role: "user",
                    content: "u".into(),
                },
            ],
            max_tokens: 10,
            temperature: 0.5,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["max_tokens"], 10);
    }
}
