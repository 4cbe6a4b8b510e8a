//! Shared error types for the services crate.

use thiserror::Error;

use crate::flow::FlowStep;

/// Errors emitted by `TutorClient`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TutorError {
    #[error("tutor backend is not configured")]
    Disabled,
    #[error("invalid tutor request: {0}")]
    InvalidRequest(&'static str),
    #[error("tutor backend returned an empty response")]
    EmptyResponse,
    #[error("tutor request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Why the next adaptive question could not be obtained.
///
/// Distinct from a reply that says the topic is covered.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    #[error(transparent)]
    Tutor(#[from] TutorError),
    #[error("malformed question reply: {0}")]
    Malformed(String),
    #[error("question source unavailable: {0}")]
    Unavailable(String),
}

/// Errors emitted by `AdaptiveQuestionController`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ControllerError {
    #[error("at least one initial question is required")]
    InvalidInput,
    #[error("answer is empty")]
    EmptyAnswer,
    #[error("guided questions have not started")]
    NotStarted,
    #[error("a question request is already in flight")]
    FetchInFlight,
    #[error("guided questions have ended")]
    Ended,
}

/// Errors emitted by `LearningSession`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FlowError {
    #[error("topic is empty")]
    EmptyTopic,
    #[error("no explanation was collected")]
    EmptyExplanation,
    #[error("guided questions cannot be finished yet")]
    NotEndEligible,
    #[error("expected step {expected:?}, session is at {actual:?}")]
    WrongStep { expected: FlowStep, actual: FlowStep },
    #[error(transparent)]
    Tutor(#[from] TutorError),
    #[error(transparent)]
    Controller(#[from] ControllerError),
}
