mod support;

use feynman_core::time::fixed_clock;
use feynman_core::model::{Level, SKIPPED_ANSWER, find_persona};
use feynman_services::{
    AdaptiveQuestionController, ControllerError, EndReason, Outcome, Phase, RestartReason,
    SessionContext,
};
use support::{DETAILED, DETAILED_2, Reply, ScriptedSource, question};

fn started() -> AdaptiveQuestionController {
    let mut controller = AdaptiveQuestionController::new(fixed_clock());
    controller
        .start(
            SessionContext::new("Photosynthesis", Level::Beginner, find_persona("marie_curie")),
            vec![question("What is photosynthesis?"), question("Why green?")],
        )
        .unwrap();
    controller
}

#[tokio::test]
async fn three_non_answers_restart_the_conversation() {
    let source = ScriptedSource::endless();
    let mut controller = started();

    assert_eq!(
        controller.submit_answer(&source, "idk").await.unwrap(),
        Outcome::Continued
    );
    assert_eq!(
        controller.submit_answer(&source, "I don't know").await.unwrap(),
        Outcome::Continued
    );
    assert_eq!(controller.non_answer_count(), 2);

    let outcome = controller.submit_answer(&source, "no idea").await.unwrap();
    assert_eq!(
        outcome,
        Outcome::Restarted {
            reason: RestartReason::TooManyNonAnswers
        }
    );
    assert!(controller.ledger().is_empty());
    assert_eq!(controller.non_answer_count(), 0);
    assert_eq!(controller.vague_count(), 0);
    assert_eq!(controller.question_count(), 1);
    assert_eq!(
        controller.current_question().unwrap().question,
        "What is photosynthesis?"
    );
    assert_eq!(
        controller.restart_notice(),
        Some(RestartReason::TooManyNonAnswers.notice())
    );
    // The third answer never reached the source.
    assert_eq!(source.requests().len(), 2);
}

#[tokio::test]
async fn mostly_vague_answers_restart_on_the_third() {
    let source = ScriptedSource::endless();
    let mut controller = started();

    for answer in ["maybe", "kind of"] {
        assert_eq!(
            controller.submit_answer(&source, answer).await.unwrap(),
            Outcome::Continued
        );
    }
    assert_eq!(controller.vague_count(), 2);
    assert_eq!(controller.non_answer_count(), 0);

    let outcome = controller.submit_answer(&source, "a bit").await.unwrap();
    assert_eq!(
        outcome,
        Outcome::Restarted {
            reason: RestartReason::MostlyVague
        }
    );
    assert_eq!(
        controller.restart_notice(),
        Some(RestartReason::MostlyVague.notice())
    );
    assert!(controller.ledger().is_empty());
}

#[tokio::test]
async fn one_non_answer_among_detailed_answers_keeps_going() {
    let source = ScriptedSource::endless();
    let mut controller = started();

    for answer in ["not sure", DETAILED, DETAILED_2] {
        assert_eq!(
            controller.submit_answer(&source, answer).await.unwrap(),
            Outcome::Continued
        );
    }

    assert_eq!(controller.ledger().len(), 3);
    assert_eq!(controller.non_answer_count(), 1);
    assert_eq!(controller.vague_count(), 1);
    assert_eq!(controller.question_count(), 4);
    assert!(controller.end_eligible());
    assert_eq!(controller.restart_notice(), None);
}

#[tokio::test]
async fn long_non_answer_also_counts_as_vague() {
    let source = ScriptedSource::endless();
    let mut controller = started();

    controller
        .submit_answer(&source, "Honestly I have no idea how any of that works")
        .await
        .unwrap();

    assert_eq!(controller.non_answer_count(), 1);
    assert_eq!(controller.vague_count(), 1);
}

#[tokio::test]
async fn three_skips_restart_as_non_answers() {
    let source = ScriptedSource::endless();
    let mut controller = started();

    controller.skip_question(&source).await.unwrap();
    controller.skip_question(&source).await.unwrap();
    assert_eq!(controller.ledger().entries()[0].answer, SKIPPED_ANSWER);
    assert!(controller.ledger().entries()[1].is_skipped());

    let outcome = controller.skip_question(&source).await.unwrap();
    assert_eq!(
        outcome,
        Outcome::Restarted {
            reason: RestartReason::TooManyNonAnswers
        }
    );
    assert!(controller.ledger().is_empty());
}

#[tokio::test]
async fn requests_carry_history_and_the_committed_answer() {
    let source = ScriptedSource::endless();
    let mut controller = started();

    controller.submit_answer(&source, DETAILED).await.unwrap();
    controller.submit_answer(&source, DETAILED_2).await.unwrap();

    let requests = source.requests();
    assert_eq!(requests.len(), 2);

    let first = &requests[0];
    assert_eq!(first.topic, "Photosynthesis");
    assert_eq!(first.question_count, 1);
    assert_eq!(first.current_answer, DETAILED);
    assert_eq!(first.conversation_history.len(), 1);
    assert_eq!(
        first.conversation_history[0].question,
        "What is photosynthesis?"
    );
    assert_eq!(
        first.character_context.as_ref().map(|p| p.id.as_str()),
        Some("marie_curie")
    );

    let second = &requests[1];
    assert_eq!(second.question_count, 2);
    assert_eq!(second.conversation_history.len(), 2);
    assert_eq!(second.conversation_history[1].question, "Follow-up 2");
}

#[tokio::test]
async fn end_of_topic_after_fourth_answer_ends_the_session() {
    let source = ScriptedSource::new([
        Reply::Ask("Follow-up"),
        Reply::Ask("Follow-up"),
        Reply::Ask("Follow-up"),
        Reply::End,
    ]);
    let mut controller = started();

    for answer in [DETAILED, DETAILED_2, DETAILED] {
        controller.submit_answer(&source, answer).await.unwrap();
    }
    let current = controller.current_question().cloned();

    let outcome = controller.submit_answer(&source, DETAILED_2).await.unwrap();
    assert_eq!(
        outcome,
        Outcome::SessionEnded {
            reason: EndReason::TopicCovered
        }
    );
    assert_eq!(controller.phase(), Phase::Ended);
    assert_eq!(controller.ledger().len(), 4);
    assert_eq!(controller.current_question().cloned(), current);

    let transcript = controller.end_session(None);
    assert_eq!(transcript.entries().len(), 4);

    assert_eq!(
        controller.submit_answer(&source, DETAILED).await.unwrap_err(),
        ControllerError::Ended
    );
}

#[tokio::test]
async fn failed_fetch_ends_the_session_and_keeps_the_ledger() {
    let source = ScriptedSource::new([Reply::Ask("Follow-up"), Reply::Fail("connection reset")]);
    let mut controller = started();

    controller.submit_answer(&source, DETAILED).await.unwrap();
    let outcome = controller.submit_answer(&source, DETAILED_2).await.unwrap();

    assert_eq!(
        outcome,
        Outcome::SessionEnded {
            reason: EndReason::FetchFailed
        }
    );
    assert_eq!(controller.ledger().len(), 2);
    assert!(
        controller
            .last_fetch_error()
            .is_some_and(|err| err.contains("connection reset"))
    );
}

#[tokio::test]
async fn finishing_early_includes_the_pending_answer() {
    let source = ScriptedSource::endless();
    let mut controller = started();

    controller.submit_answer(&source, DETAILED).await.unwrap();
    let transcript = controller.end_session(Some("  Chlorophyll is green  "));

    assert_eq!(transcript.entries().len(), 2);
    assert_eq!(transcript.entries()[1].question, "Follow-up 2");
    assert_eq!(transcript.entries()[1].answer, "Chlorophyll is green");
    assert_eq!(
        transcript.render(),
        format!(
            "**What is photosynthesis?**\n{DETAILED}\n\n**Follow-up 2**\nChlorophyll is green"
        )
    );

    // Pure: asking twice gives the same transcript.
    assert_eq!(
        controller.end_session(Some("  Chlorophyll is green  ")),
        transcript
    );
}
