mod exchange;
mod ids;
pub mod persona;
mod question;

pub use exchange::{Exchange, HistoryEntry, SKIPPED_ANSWER};
pub use ids::Epoch;
pub use persona::{Persona, VoiceSettings, default_persona, find_persona, historical_guides};
pub use question::{
    Level, PracticeKind, PracticeQuestion, QuestionCategory, QuestionError, QuestionItem,
};
