use std::sync::Arc;

use tokio::sync::Mutex;

use feynman_core::Transcript;
use feynman_core::model::QuestionItem;

use super::{AdaptiveQuestionController, ControllerSnapshot, Outcome, SessionContext, Step};
use crate::error::ControllerError;
use crate::questions::QuestionSource;

/// Cloneable handle for driving one controller from several tasks.
///
/// Every state change goes through a single mutex. The question fetch runs
/// outside the lock, so a restart can land while it is outstanding; the
/// controller's epoch check then drops the late reply.
#[derive(Clone)]
pub struct SharedController {
    inner: Arc<Mutex<AdaptiveQuestionController>>,
    source: Arc<dyn QuestionSource>,
}

impl SharedController {
    #[must_use]
    pub fn new(controller: AdaptiveQuestionController, source: Arc<dyn QuestionSource>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(controller)),
            source,
        }
    }

    /// # Errors
    ///
    /// Returns `ControllerError::InvalidInput` if `initial_questions` is empty.
    pub async fn start(
        &self,
        context: SessionContext,
        initial_questions: Vec<QuestionItem>,
    ) -> Result<(), ControllerError> {
        self.inner.lock().await.start(context, initial_questions)
    }

    /// # Errors
    ///
    /// See `AdaptiveQuestionController::begin_submit`.
    pub async fn submit_answer(&self, answer: &str) -> Result<Outcome, ControllerError> {
        let step = self.inner.lock().await.begin_submit(answer)?;
        Ok(self.finish(step).await)
    }

    /// # Errors
    ///
    /// See `AdaptiveQuestionController::begin_skip`.
    pub async fn skip_question(&self) -> Result<Outcome, ControllerError> {
        let step = self.inner.lock().await.begin_skip()?;
        Ok(self.finish(step).await)
    }

    async fn finish(&self, step: Step) -> Outcome {
        match step {
            Step::Restarted(reason) => Outcome::Restarted { reason },
            Step::Fetch(pending) => {
                let result = self.source.next_question(pending.request()).await;
                self.inner.lock().await.complete_fetch(pending, result)
            }
        }
    }

    /// # Errors
    ///
    /// Returns `ControllerError::NotStarted` before `start`.
    pub async fn restart(&self, reason: impl Into<String>) -> Result<(), ControllerError> {
        self.inner.lock().await.restart(reason)
    }

    pub async fn end_session(&self, pending_answer: Option<&str>) -> Transcript {
        self.inner.lock().await.end_session(pending_answer)
    }

    pub async fn snapshot(&self) -> ControllerSnapshot {
        self.inner.lock().await.snapshot()
    }
}
