//! The four-step learning session: explain, guided questions, gaps, refine.

use std::sync::Arc;

use tracing::info;

use feynman_core::Clock;
use feynman_core::model::{Level, Persona, PracticeQuestion, QuestionItem};

use crate::controller::{AdaptiveQuestionController, Outcome, Phase, SessionContext};
use crate::error::{ControllerError, FlowError};
use crate::persona::PersonaSelection;
use crate::tutor::Tutor;
use crate::voice::{SpeechOptions, Speaker};

/// Audience used when refining unless the caller picks one.
pub const DEFAULT_AUDIENCE: &str = "general";

/// Practice batch size used unless the caller picks one.
pub const DEFAULT_PRACTICE_COUNT: u8 = 5;

const MANUAL_RESTART_NOTICE: &str = "Starting over from the first question.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStep {
    Explain,
    GuidedQuestions,
    Gaps,
    Refine,
}

impl FlowStep {
    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            FlowStep::Explain => 1,
            FlowStep::GuidedQuestions => 2,
            FlowStep::Gaps => 3,
            FlowStep::Refine => 4,
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            FlowStep::Explain => "Simple Explanation",
            FlowStep::GuidedQuestions => "Your Explanation",
            FlowStep::Gaps => "Identify Gaps",
            FlowStep::Refine => "Review",
        }
    }
}

/// One learner working through one topic.
///
/// Owns the question controller for step 2 and feeds the transcript it
/// produces into gap analysis. The selected guide is read on every tutor call,
/// so a change of guide applies from the next request on.
pub struct LearningSession {
    tutor: Arc<dyn Tutor>,
    speaker: Arc<dyn Speaker>,
    selection: PersonaSelection,
    topic: String,
    level: Level,
    step: FlowStep,
    auto_speak: bool,
    controller: AdaptiveQuestionController,
    explanation: Option<String>,
    user_explanation: Option<String>,
    gaps: Option<String>,
    refined: Option<String>,
}

impl LearningSession {
    /// # Errors
    ///
    /// Returns `FlowError::EmptyTopic` if `topic` is blank.
    pub fn new(
        tutor: Arc<dyn Tutor>,
        speaker: Arc<dyn Speaker>,
        selection: PersonaSelection,
        topic: impl Into<String>,
        level: Level,
        clock: Clock,
    ) -> Result<Self, FlowError> {
        let topic = topic.into().trim().to_owned();
        if topic.is_empty() {
            return Err(FlowError::EmptyTopic);
        }
        Ok(Self {
            tutor,
            speaker,
            selection,
            topic,
            level,
            step: FlowStep::Explain,
            auto_speak: true,
            controller: AdaptiveQuestionController::new(clock),
            explanation: None,
            user_explanation: None,
            gaps: None,
            refined: None,
        })
    }

    #[must_use]
    pub fn with_auto_speak(mut self, auto_speak: bool) -> Self {
        self.auto_speak = auto_speak;
        self
    }

    #[must_use]
    pub fn step(&self) -> FlowStep {
        self.step
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    #[must_use]
    pub fn controller(&self) -> &AdaptiveQuestionController {
        &self.controller
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    /// Transcript handed to gap analysis.
    #[must_use]
    pub fn user_explanation(&self) -> Option<&str> {
        self.user_explanation.as_deref()
    }

    #[must_use]
    pub fn gaps(&self) -> Option<&str> {
        self.gaps.as_deref()
    }

    #[must_use]
    pub fn refined(&self) -> Option<&str> {
        self.refined.as_deref()
    }

    fn persona(&self) -> Persona {
        self.selection.current()
    }

    fn expect_step(&self, expected: FlowStep) -> Result<(), FlowError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(FlowError::WrongStep {
                expected,
                actual: self.step,
            })
        }
    }

    fn say(&self, text: &str) {
        if self.auto_speak {
            let persona = self.persona();
            self.speaker.speak(text, &SpeechOptions::from(&persona.voice));
        }
    }

    fn announce_current_question(&self) {
        if let Some(question) = self.controller.current_question() {
            self.say(&question.question);
        }
    }

    /// Step 1: ask the tutor for a simple explanation.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::WrongStep` outside step 1, or the tutor's error.
    pub async fn explain(&mut self) -> Result<&str, FlowError> {
        self.expect_step(FlowStep::Explain)?;
        let persona = self.persona();
        let text = self
            .tutor
            .explain(&self.topic, self.level, Some(&persona))
            .await?;
        Ok(self.explanation.insert(text).as_str())
    }

    /// Move to step 2 with a fresh batch of guided questions.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::WrongStep` outside step 1, the tutor's error, or
    /// `ControllerError::InvalidInput` if the batch is empty.
    pub async fn begin_questions(&mut self) -> Result<&QuestionItem, FlowError> {
        self.expect_step(FlowStep::Explain)?;
        let persona = self.persona();
        let questions = self
            .tutor
            .guided_questions(&self.topic, self.level, Some(&persona))
            .await?;
        self.controller.start(
            SessionContext::new(self.topic.clone(), self.level, Some(persona)),
            questions,
        )?;
        self.step = FlowStep::GuidedQuestions;
        self.announce_current_question();
        self.controller
            .current_question()
            .ok_or(FlowError::Controller(ControllerError::NotStarted))
    }

    /// # Errors
    ///
    /// Returns `FlowError::WrongStep` outside step 2, or the controller's error.
    pub async fn answer(&mut self, text: &str) -> Result<Outcome, FlowError> {
        self.expect_step(FlowStep::GuidedQuestions)?;
        self.controller.set_persona(Some(self.persona()));
        let outcome = self
            .controller
            .submit_answer(self.tutor.as_ref(), text)
            .await?;
        self.after(outcome);
        Ok(outcome)
    }

    /// # Errors
    ///
    /// Returns `FlowError::WrongStep` outside step 2, or the controller's error.
    pub async fn skip(&mut self) -> Result<Outcome, FlowError> {
        self.expect_step(FlowStep::GuidedQuestions)?;
        self.controller.set_persona(Some(self.persona()));
        let outcome = self.controller.skip_question(self.tutor.as_ref()).await?;
        self.after(outcome);
        Ok(outcome)
    }

    fn after(&self, outcome: Outcome) {
        match outcome {
            Outcome::Continued => self.announce_current_question(),
            Outcome::Restarted { reason } => {
                self.say(reason.notice());
                self.announce_current_question();
            }
            Outcome::SessionEnded { .. } | Outcome::Stale => {}
        }
    }

    /// Go back to the first guided question at the learner's request.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::WrongStep` outside step 2.
    pub fn restart_questions(&mut self) -> Result<&QuestionItem, FlowError> {
        self.expect_step(FlowStep::GuidedQuestions)?;
        self.controller.restart(MANUAL_RESTART_NOTICE)?;
        self.announce_current_question();
        self.controller
            .current_question()
            .ok_or(FlowError::Controller(ControllerError::NotStarted))
    }

    /// Hint for the current question, voiced when auto-speak is on.
    #[must_use]
    pub fn reveal_hint(&self) -> Option<&str> {
        let hint = self.controller.current_question()?.hint.as_deref()?;
        self.say(hint);
        Some(hint)
    }

    /// Skip the guided questions and send the learner's own explanation
    /// straight to gap analysis.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::WrongStep` outside step 1, `EmptyExplanation` for
    /// blank text, or the tutor's error.
    pub async fn submit_explanation(&mut self, text: &str) -> Result<&str, FlowError> {
        self.expect_step(FlowStep::Explain)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(FlowError::EmptyExplanation);
        }
        self.analyze_gaps(text.to_owned()).await
    }

    /// Close step 2 and run gap analysis on the collected transcript.
    ///
    /// Only allowed once the controller is end-eligible or the question source
    /// has ended the conversation. `pending_answer` is any unsent text for the
    /// current question.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::WrongStep` outside step 2, `NotEndEligible` before
    /// enough questions were asked, `EmptyExplanation` if nothing was answered,
    /// or the tutor's error.
    pub async fn finish_questions(
        &mut self,
        pending_answer: Option<&str>,
    ) -> Result<&str, FlowError> {
        self.expect_step(FlowStep::GuidedQuestions)?;
        if !self.controller.end_eligible() && self.controller.phase() != Phase::Ended {
            return Err(FlowError::NotEndEligible);
        }
        let transcript = self.controller.end_session(pending_answer);
        if transcript.is_empty() {
            return Err(FlowError::EmptyExplanation);
        }
        info!(entries = transcript.entries().len(), "guided questions finished");
        self.analyze_gaps(transcript.render()).await
    }

    async fn analyze_gaps(&mut self, explanation: String) -> Result<&str, FlowError> {
        let persona = self.persona();
        let gaps = self
            .tutor
            .identify_gaps(&self.topic, &explanation, Some(&persona))
            .await?;
        self.user_explanation = Some(explanation);
        self.step = FlowStep::Gaps;
        Ok(self.gaps.insert(gaps).as_str())
    }

    /// Standalone practice questions on the topic. Available at any step.
    ///
    /// # Errors
    ///
    /// Returns the tutor's error.
    pub async fn practice_questions(&self, count: u8) -> Result<Vec<PracticeQuestion>, FlowError> {
        Ok(self
            .tutor
            .practice_questions(&self.topic, self.level, count)
            .await?)
    }

    /// Step 4: ask the tutor to refine the learner's explanation.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::WrongStep` outside step 3, or the tutor's error.
    pub async fn refine(&mut self, audience: &str) -> Result<&str, FlowError> {
        self.expect_step(FlowStep::Gaps)?;
        let explanation = self
            .user_explanation
            .clone()
            .ok_or(FlowError::EmptyExplanation)?;
        let persona = self.persona();
        let refined = self
            .tutor
            .refine_explanation(&self.topic, &explanation, audience, Some(&persona))
            .await?;
        self.step = FlowStep::Refine;
        Ok(self.refined.insert(refined).as_str())
    }
}
