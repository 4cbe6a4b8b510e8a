/// Cumulative non-answers that force a restart.
pub const NON_ANSWER_LIMIT: u32 = 3;
/// Minimum answers before the vague ratio is considered.
pub const VAGUE_MIN_ANSWERS: u32 = 3;
/// Restart once strictly more than this share of answers is vague.
pub const VAGUE_RATIO_LIMIT: f64 = 0.5;
/// Question count from which the learner may finish early.
pub const END_ELIGIBLE_AFTER: u32 = 3;

pub const NON_ANSWER_RESTART_NOTICE: &str =
    "Let's reset this part and try again with more complete answers.";
pub const VAGUE_RESTART_NOTICE: &str =
    "Let's restart this section and aim for clearer, more specific answers.";

/// Why a guided conversation was reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartReason {
    TooManyNonAnswers,
    MostlyVague,
}

impl RestartReason {
    /// Banner text shown to the learner.
    #[must_use]
    pub fn notice(self) -> &'static str {
        match self {
            RestartReason::TooManyNonAnswers => NON_ANSWER_RESTART_NOTICE,
            RestartReason::MostlyVague => VAGUE_RESTART_NOTICE,
        }
    }
}

/// Counter values an answer would produce if it were accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Tally {
    pub non_answers: u32,
    pub vague: u32,
    pub total: u32,
}

impl Tally {
    pub(crate) fn next(
        non_answers: u32,
        vague: u32,
        answered: usize,
        is_non_answer: bool,
        is_vague: bool,
    ) -> Self {
        let answered = u32::try_from(answered).unwrap_or(u32::MAX);
        Self {
            non_answers: non_answers.saturating_add(u32::from(is_non_answer)),
            vague: vague.saturating_add(u32::from(is_vague)),
            total: answered.saturating_add(1),
        }
    }

    /// First matching rule wins: non-answers before vagueness.
    pub(crate) fn restart_reason(self) -> Option<RestartReason> {
        if self.non_answers >= NON_ANSWER_LIMIT {
            return Some(RestartReason::TooManyNonAnswers);
        }
        if self.total >= VAGUE_MIN_ANSWERS
            && f64::from(self.vague) / f64::from(self.total) > VAGUE_RATIO_LIMIT
        {
            return Some(RestartReason::MostlyVague);
        }
        None
    }
}
