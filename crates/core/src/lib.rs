#![forbid(unsafe_code)]

pub mod classifier;
pub mod ledger;
pub mod model;
pub mod time;
pub mod transcript;

pub use classifier::AnswerQuality;
pub use ledger::ConversationLedger;
pub use time::Clock;
pub use transcript::{Transcript, TranscriptEntry};
