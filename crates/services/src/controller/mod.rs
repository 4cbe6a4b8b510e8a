mod policy;
mod shared;

use std::fmt;

use tracing::{debug, info, warn};

use feynman_core::classifier::{self, AnswerQuality};
use feynman_core::model::{Epoch, Exchange, Level, Persona, QuestionItem, SKIPPED_ANSWER};
use feynman_core::{Clock, ConversationLedger, Transcript};

use crate::error::{ControllerError, FetchError};
use crate::questions::{AdaptiveQuestionRequest, NextQuestion, QuestionSource};

use policy::Tally;
pub use policy::{
    END_ELIGIBLE_AFTER, NON_ANSWER_LIMIT, NON_ANSWER_RESTART_NOTICE, RestartReason,
    VAGUE_MIN_ANSWERS, VAGUE_RATIO_LIMIT, VAGUE_RESTART_NOTICE,
};
pub use shared::SharedController;

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Where the guided conversation currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// `start` has not been called.
    Idle,
    AwaitingAnswer,
    /// A next-question request is outstanding; answers are rejected.
    FetchingNextQuestion,
    Ended,
}

/// Why the guided conversation stopped asking questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    TopicCovered,
    /// The question source failed; see `last_fetch_error`.
    FetchFailed,
}

/// Result of submitting or skipping an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continued,
    Restarted { reason: RestartReason },
    SessionEnded { reason: EndReason },
    /// The reply belonged to a conversation that has since been restarted.
    Stale,
}

/// Topic, level and persona a guided conversation runs under.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    pub topic: String,
    pub level: Level,
    pub persona: Option<Persona>,
}

impl SessionContext {
    #[must_use]
    pub fn new(topic: impl Into<String>, level: Level, persona: Option<Persona>) -> Self {
        Self {
            topic: topic.into(),
            level,
            persona,
        }
    }
}

/// A committed answer waiting on the next question.
///
/// Produced by `begin_submit`/`begin_skip`, consumed by `complete_fetch`.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingFetch {
    epoch: Epoch,
    request: AdaptiveQuestionRequest,
}

impl PendingFetch {
    #[must_use]
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    #[must_use]
    pub fn request(&self) -> &AdaptiveQuestionRequest {
        &self.request
    }
}

/// First half of an answer submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Restarted(RestartReason),
    Fetch(PendingFetch),
}

/// Observable copy of the controller state.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSnapshot {
    pub phase: Phase,
    pub current_question: Option<QuestionItem>,
    pub restart_notice: Option<String>,
    pub question_count: u32,
    pub end_eligible: bool,
    pub non_answer_count: u32,
    pub vague_count: u32,
    pub ledger: Vec<Exchange>,
    pub last_fetch_error: Option<String>,
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// State machine driving the guided question-and-answer loop.
///
/// Classifies each answer, decides between restarting, asking the question
/// source for a follow-up, and ending. Only one fetch may be outstanding at a
/// time; every `start`/`restart` opens a new epoch so replies to an abandoned
/// conversation are ignored.
pub struct AdaptiveQuestionController {
    clock: Clock,
    context: Option<SessionContext>,
    first_question: Option<QuestionItem>,
    current_question: Option<QuestionItem>,
    ledger: ConversationLedger,
    question_count: u32,
    non_answer_count: u32,
    vague_count: u32,
    restart_notice: Option<String>,
    end_eligible: bool,
    epoch: Epoch,
    phase: Phase,
    last_fetch_error: Option<String>,
}

impl AdaptiveQuestionController {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            context: None,
            first_question: None,
            current_question: None,
            ledger: ConversationLedger::new(),
            question_count: 0,
            non_answer_count: 0,
            vague_count: 0,
            restart_notice: None,
            end_eligible: false,
            epoch: Epoch::default(),
            phase: Phase::Idle,
            last_fetch_error: None,
        }
    }

    /// Begin a guided conversation with the first question of `initial_questions`.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::InvalidInput` if `initial_questions` is empty.
    pub fn start(
        &mut self,
        context: SessionContext,
        initial_questions: Vec<QuestionItem>,
    ) -> Result<(), ControllerError> {
        let first = initial_questions
            .into_iter()
            .next()
            .ok_or(ControllerError::InvalidInput)?;

        info!(topic = %context.topic, level = %context.level, "guided questions started");
        self.context = Some(context);
        self.first_question = Some(first);
        self.reset();
        self.restart_notice = None;
        Ok(())
    }

    /// Hard reset back to the first question, discarding the conversation so far.
    ///
    /// Allowed while a fetch is outstanding; its reply will come back stale.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::NotStarted` before `start`.
    pub fn restart(&mut self, reason: impl Into<String>) -> Result<(), ControllerError> {
        if self.first_question.is_none() {
            return Err(ControllerError::NotStarted);
        }
        self.restart_with_notice(reason.into());
        Ok(())
    }

    fn restart_with_notice(&mut self, notice: String) {
        info!(
            epoch = %self.epoch,
            discarded = self.ledger.len(),
            notice = %notice,
            "guided questions restarted"
        );
        self.reset();
        self.restart_notice = Some(notice);
    }

    fn reset(&mut self) {
        self.ledger.restart();
        self.non_answer_count = 0;
        self.vague_count = 0;
        self.question_count = 1;
        self.current_question.clone_from(&self.first_question);
        self.end_eligible = false;
        self.last_fetch_error = None;
        self.epoch = self.epoch.next();
        self.phase = Phase::AwaitingAnswer;
    }

    /// Classify and commit an answer to the current question.
    ///
    /// Either restarts the conversation or returns the request to send to the
    /// question source; pass the reply to [`Self::complete_fetch`].
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::EmptyAnswer` for blank input, and
    /// `NotStarted`/`FetchInFlight`/`Ended` when no answer is expected.
    pub fn begin_submit(&mut self, answer: &str) -> Result<Step, ControllerError> {
        self.ensure_awaiting()?;
        if classifier::normalize(answer).is_empty() {
            return Err(ControllerError::EmptyAnswer);
        }
        let quality = classifier::classify(answer);
        self.commit(answer, quality)
    }

    /// Skip the current question. Counts as a non-answer.
    ///
    /// # Errors
    ///
    /// Returns `NotStarted`/`FetchInFlight`/`Ended` when no answer is expected.
    pub fn begin_skip(&mut self) -> Result<Step, ControllerError> {
        self.ensure_awaiting()?;
        self.commit(SKIPPED_ANSWER, AnswerQuality::NonAnswer)
    }

    fn ensure_awaiting(&self) -> Result<(), ControllerError> {
        match self.phase {
            Phase::AwaitingAnswer => Ok(()),
            Phase::Idle => Err(ControllerError::NotStarted),
            Phase::FetchingNextQuestion => Err(ControllerError::FetchInFlight),
            Phase::Ended => Err(ControllerError::Ended),
        }
    }

    fn commit(&mut self, answer: &str, quality: AnswerQuality) -> Result<Step, ControllerError> {
        let tally = Tally::next(
            self.non_answer_count,
            self.vague_count,
            self.ledger.len(),
            quality.is_non_answer(),
            quality.is_vague(),
        );
        debug!(?quality, ?tally, "answer tallied");

        if let Some(reason) = tally.restart_reason() {
            self.restart_with_notice(reason.notice().to_owned());
            return Ok(Step::Restarted(reason));
        }

        let current = self
            .current_question
            .as_ref()
            .ok_or(ControllerError::NotStarted)?;
        let context = self.context.as_ref().ok_or(ControllerError::NotStarted)?;

        self.ledger
            .append(Exchange::answered(current, answer, self.clock.now_millis()));
        self.non_answer_count = tally.non_answers;
        self.vague_count = tally.vague;

        let request = AdaptiveQuestionRequest {
            topic: context.topic.clone(),
            level: context.level,
            conversation_history: self.ledger.history(),
            current_answer: answer.to_owned(),
            question_count: self.question_count,
            character_context: context.persona.clone(),
        };
        self.phase = Phase::FetchingNextQuestion;

        Ok(Step::Fetch(PendingFetch {
            epoch: self.epoch,
            request,
        }))
    }

    /// Apply the question source's reply to a pending fetch.
    ///
    /// Replies from an older epoch are dropped and reported as `Outcome::Stale`.
    /// A failed fetch ends the session; the ledger is kept.
    pub fn complete_fetch(
        &mut self,
        pending: PendingFetch,
        result: Result<NextQuestion, FetchError>,
    ) -> Outcome {
        if pending.epoch != self.epoch || self.phase != Phase::FetchingNextQuestion {
            debug!(
                reply_epoch = %pending.epoch,
                epoch = %self.epoch,
                "discarding stale question reply"
            );
            return Outcome::Stale;
        }

        match result {
            Ok(NextQuestion::Question(item)) => {
                self.current_question = Some(item);
                self.question_count = self.question_count.saturating_add(1);
                self.end_eligible = self.question_count >= END_ELIGIBLE_AFTER;
                self.phase = Phase::AwaitingAnswer;
                Outcome::Continued
            }
            Ok(NextQuestion::EndOfTopic) => {
                info!(answered = self.ledger.len(), "question source ended the topic");
                self.phase = Phase::Ended;
                Outcome::SessionEnded {
                    reason: EndReason::TopicCovered,
                }
            }
            Err(err) => {
                warn!(error = %err, answered = self.ledger.len(), "next question unavailable");
                self.last_fetch_error = Some(err.to_string());
                self.phase = Phase::Ended;
                Outcome::SessionEnded {
                    reason: EndReason::FetchFailed,
                }
            }
        }
    }

    /// Submit an answer and, unless it triggers a restart, fetch the next question.
    ///
    /// # Errors
    ///
    /// See [`Self::begin_submit`].
    pub async fn submit_answer<S>(
        &mut self,
        source: &S,
        answer: &str,
    ) -> Result<Outcome, ControllerError>
    where
        S: QuestionSource + ?Sized,
    {
        let step = self.begin_submit(answer)?;
        Ok(self.drive(source, step).await)
    }

    /// Skip the current question and, unless that triggers a restart, fetch the next one.
    ///
    /// # Errors
    ///
    /// See [`Self::begin_skip`].
    pub async fn skip_question<S>(&mut self, source: &S) -> Result<Outcome, ControllerError>
    where
        S: QuestionSource + ?Sized,
    {
        let step = self.begin_skip()?;
        Ok(self.drive(source, step).await)
    }

    async fn drive<S>(&mut self, source: &S, step: Step) -> Outcome
    where
        S: QuestionSource + ?Sized,
    {
        match step {
            Step::Restarted(reason) => Outcome::Restarted { reason },
            Step::Fetch(pending) => {
                let result = source.next_question(pending.request()).await;
                self.complete_fetch(pending, result)
            }
        }
    }

    /// Assemble the learner's combined explanation.
    ///
    /// `pending_answer` is the in-progress text for the current question, if the
    /// learner is finishing early. Does not change controller state.
    #[must_use]
    pub fn end_session(&self, pending_answer: Option<&str>) -> Transcript {
        Transcript::build(
            &self.ledger,
            self.current_question.as_ref(),
            pending_answer,
        )
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&QuestionItem> {
        self.current_question.as_ref()
    }

    #[must_use]
    pub fn ledger(&self) -> &ConversationLedger {
        &self.ledger
    }

    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    #[must_use]
    pub fn non_answer_count(&self) -> u32 {
        self.non_answer_count
    }

    #[must_use]
    pub fn vague_count(&self) -> u32 {
        self.vague_count
    }

    #[must_use]
    pub fn restart_notice(&self) -> Option<&str> {
        self.restart_notice.as_deref()
    }

    #[must_use]
    pub fn end_eligible(&self) -> bool {
        self.end_eligible
    }

    #[must_use]
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    #[must_use]
    pub fn last_fetch_error(&self) -> Option<&str> {
        self.last_fetch_error.as_deref()
    }

    #[must_use]
    pub fn context(&self) -> Option<&SessionContext> {
        self.context.as_ref()
    }

    /// Replace the persona used for subsequent question requests.
    pub fn set_persona(&mut self, persona: Option<Persona>) {
        if let Some(context) = self.context.as_mut() {
            context.persona = persona;
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            phase: self.phase,
            current_question: self.current_question.clone(),
            restart_notice: self.restart_notice.clone(),
            question_count: self.question_count,
            end_eligible: self.end_eligible,
            non_answer_count: self.non_answer_count,
            vague_count: self.vague_count,
            ledger: self.ledger.entries().to_vec(),
            last_fetch_error: self.last_fetch_error.clone(),
        }
    }
}

impl Default for AdaptiveQuestionController {
    fn default() -> Self {
        Self::new(Clock::default())
    }
}

impl fmt::Debug for AdaptiveQuestionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdaptiveQuestionController")
            .field("phase", &self.phase)
            .field("epoch", &self.epoch)
            .field("ledger_len", &self.ledger.len())
            .field("question_count", &self.question_count)
            .field("non_answer_count", &self.non_answer_count)
            .field("vague_count", &self.vague_count)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
