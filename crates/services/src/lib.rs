#![forbid(unsafe_code)]

pub mod controller;
pub mod error;
pub mod flow;
pub mod persona;
pub mod questions;
pub mod tutor;
pub mod voice;

pub use feynman_core::Clock;

pub use controller::{
    AdaptiveQuestionController, ControllerSnapshot, EndReason, Outcome, PendingFetch, Phase,
    RestartReason, SessionContext, SharedController, Step,
};
pub use error::{ControllerError, FetchError, FlowError, TutorError};
pub use flow::{DEFAULT_AUDIENCE, DEFAULT_PRACTICE_COUNT, FlowStep, LearningSession};
pub use persona::{PersonaSelection, UnknownPersona};
pub use questions::{AdaptiveQuestionRequest, NextQuestion, QuestionSource};
pub use tutor::{Tutor, TutorClient, TutorConfig};
pub use voice::{NoopSpeaker, Speaker, SpeechOptions};
