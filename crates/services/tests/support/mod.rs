#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use feynman_core::model::{
    Level, Persona, PracticeKind, PracticeQuestion, QuestionCategory, QuestionItem,
};
use feynman_services::{
    AdaptiveQuestionRequest, FetchError, NextQuestion, QuestionSource, SpeechOptions, Speaker,
    Tutor, TutorError,
};

pub const DETAILED: &str = "Plants capture sunlight and turn water and carbon dioxide into sugar";
pub const DETAILED_2: &str = "The green chlorophyll in leaves absorbs red and blue light";

pub fn question(text: &str) -> QuestionItem {
    QuestionItem::new(text, Some(format!("hint for {text}")), QuestionCategory::Basic).unwrap()
}

#[derive(Debug, Clone)]
pub enum Reply {
    Ask(&'static str),
    End,
    Fail(&'static str),
}

/// Question source that plays back a fixed script and records every request.
#[derive(Default)]
pub struct ScriptedSource {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<AdaptiveQuestionRequest>>,
}

impl ScriptedSource {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always asks a numbered follow-up.
    pub fn endless() -> Self {
        Self::new(std::iter::repeat_n(Reply::Ask("Follow-up"), 32))
    }

    pub fn requests(&self) -> Vec<AdaptiveQuestionRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next_reply(&self, request: &AdaptiveQuestionRequest) -> Result<NextQuestion, FetchError> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self.replies.lock().unwrap().pop_front().unwrap_or(Reply::End);
        match reply {
            Reply::Ask(text) => Ok(NextQuestion::Question(question(&format!(
                "{text} {}",
                request.question_count + 1
            )))),
            Reply::End => Ok(NextQuestion::EndOfTopic),
            Reply::Fail(cause) => Err(FetchError::Unavailable(cause.into())),
        }
    }
}

#[async_trait]
impl QuestionSource for ScriptedSource {
    async fn next_question(
        &self,
        request: &AdaptiveQuestionRequest,
    ) -> Result<NextQuestion, FetchError> {
        self.next_reply(request)
    }
}

/// Tutor with canned text replies on top of a scripted question source.
pub struct FakeTutor {
    pub source: ScriptedSource,
    pub initial: Vec<QuestionItem>,
    pub gap_inputs: Mutex<Vec<String>>,
    pub personas_seen: Mutex<Vec<String>>,
}

impl FakeTutor {
    pub fn new(source: ScriptedSource) -> Self {
        Self {
            source,
            initial: vec![question("What is photosynthesis?"), question("Why green?")],
            gap_inputs: Mutex::new(Vec::new()),
            personas_seen: Mutex::new(Vec::new()),
        }
    }

    fn saw(&self, persona: Option<&Persona>) {
        if let Some(persona) = persona {
            self.personas_seen.lock().unwrap().push(persona.id.clone());
        }
    }
}

#[async_trait]
impl QuestionSource for FakeTutor {
    async fn next_question(
        &self,
        request: &AdaptiveQuestionRequest,
    ) -> Result<NextQuestion, FetchError> {
        self.saw(request.character_context.as_ref());
        self.source.next_question(request).await
    }
}

#[async_trait]
impl Tutor for FakeTutor {
    async fn explain(
        &self,
        topic: &str,
        _level: Level,
        persona: Option<&Persona>,
    ) -> Result<String, TutorError> {
        self.saw(persona);
        Ok(format!("{topic} is how plants eat light."))
    }

    async fn guided_questions(
        &self,
        _topic: &str,
        _level: Level,
        persona: Option<&Persona>,
    ) -> Result<Vec<QuestionItem>, TutorError> {
        self.saw(persona);
        Ok(self.initial.clone())
    }

    async fn practice_questions(
        &self,
        topic: &str,
        _level: Level,
        count: u8,
    ) -> Result<Vec<PracticeQuestion>, TutorError> {
        Ok((1..=count)
            .map(|n| PracticeQuestion {
                question: format!("{topic} practice {n}"),
                kind: PracticeKind::Conceptual,
            })
            .collect())
    }

    async fn identify_gaps(
        &self,
        _topic: &str,
        explanation: &str,
        persona: Option<&Persona>,
    ) -> Result<String, TutorError> {
        self.saw(persona);
        self.gap_inputs.lock().unwrap().push(explanation.to_owned());
        Ok("You skipped the light-independent reactions.".into())
    }

    async fn refine_explanation(
        &self,
        _topic: &str,
        explanation: &str,
        audience: &str,
        persona: Option<&Persona>,
    ) -> Result<String, TutorError> {
        self.saw(persona);
        Ok(format!("[{audience}] {}", explanation.lines().count()))
    }
}

/// Speaker that remembers what it was asked to say.
#[derive(Default)]
pub struct RecordingSpeaker {
    pub spoken: Mutex<Vec<String>>,
}

impl RecordingSpeaker {
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

impl Speaker for RecordingSpeaker {
    fn speak(&self, text: &str, _options: &SpeechOptions) {
        self.spoken.lock().unwrap().push(text.to_owned());
    }
}
