use chrono::Utc;
use shared::domain::{GradeSubmissionId, WishId};

use super::*;

fn stored_wish(text: &str) -> Wish {
    Wish {
        id: WishId::generate(),
        wish: text.to_string(),
        created_at: Utc::now(),
    }
}

fn stored_grades(subjects: Vec<SubjectGrade>) -> GradeSubmission {
    GradeSubmission {
        id: GradeSubmissionId::generate(),
        subjects,
        created_at: Utc::now(),
    }
}

fn scheduled_timer(effects: &[Effect]) -> TimerId {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::ScheduleTransition { timer, after } => {
                assert_eq!(*after, REVEAL_DELAY);
                Some(*timer)
            }
            _ => None,
        })
        .expect("scheduled transition")
}

fn at_envelope() -> FlowController {
    let mut flow = FlowController::new();
    flow.handle(FlowEvent::PickAnswer(QuizChoice::Neutral))
        .expect("answer");
    flow.handle(FlowEvent::Continue).expect("continue");
    assert_eq!(flow.screen(), Screen::Envelope);
    flow
}

fn at_fairy() -> FlowController {
    let mut flow = at_envelope();
    let effects = flow.handle(FlowEvent::OpenEnvelope).expect("open");
    flow.handle(FlowEvent::TimerElapsed(scheduled_timer(&effects)))
        .expect("timer");
    flow.handle(FlowEvent::Continue).expect("continue");
    assert_eq!(flow.screen(), Screen::Fairy);
    flow
}

fn at_grade() -> FlowController {
    let mut flow = at_fairy();
    flow.handle(FlowEvent::EditWish("sehat selalu".into()))
        .expect("edit");
    flow.handle(FlowEvent::SubmitWish).expect("submit");
    flow.handle(FlowEvent::WishStored(stored_wish("sehat selalu")))
        .expect("stored");
    assert_eq!(flow.screen(), Screen::Grade);
    flow
}

fn fill_all_grades(flow: &mut FlowController, grade: LetterGrade) {
    for row in 0..flow.rows().len() {
        flow.handle(FlowEvent::SetGrade { row, grade })
            .expect("grade");
    }
}

#[test]
fn starts_on_quiz_with_unset_catalogue_rows() {
    let flow = FlowController::new();
    assert_eq!(flow.screen(), Screen::Quiz);
    assert_eq!(flow.rows().len(), SEMESTER_COURSES.len());
    assert!(flow.rows().iter().all(|row| row.grade.is_none()));
    assert!(!flow.is_busy());
}

#[test]
fn neutral_face_is_the_only_correct_answer() {
    for choice in QuizChoice::ALL {
        let mut flow = FlowController::new();
        flow.handle(FlowEvent::PickAnswer(choice)).expect("answer");
        let expected = if choice == QuizChoice::Neutral {
            Screen::Success
        } else {
            Screen::Error
        };
        assert_eq!(flow.screen(), expected, "choice {choice}");
    }
}

#[test]
fn wrong_answer_can_retry_indefinitely() {
    let mut flow = FlowController::new();
    for _ in 0..5 {
        flow.handle(FlowEvent::PickAnswer(QuizChoice::Winking))
            .expect("answer");
        assert_eq!(flow.screen(), Screen::Error);
        flow.handle(FlowEvent::Retry).expect("retry");
        assert_eq!(flow.screen(), Screen::Quiz);
    }
    flow.handle(FlowEvent::PickAnswer(QuizChoice::Neutral))
        .expect("answer");
    assert_eq!(flow.screen(), Screen::Success);
}

#[test]
fn out_of_order_events_are_rejected() {
    let mut flow = FlowController::new();
    let err = flow.handle(FlowEvent::Continue).expect_err("should fail");
    assert_eq!(
        err,
        FlowError::UnexpectedEvent {
            screen: Screen::Quiz,
            event: "continue",
        }
    );
    assert_eq!(flow.screen(), Screen::Quiz);

    let err = flow.handle(FlowEvent::SubmitWish).expect_err("should fail");
    assert!(matches!(err, FlowError::UnexpectedEvent { .. }));
}

#[test]
fn opening_envelope_starts_audio_and_delays_the_letter() {
    let mut flow = at_envelope();
    let effects = flow.handle(FlowEvent::OpenEnvelope).expect("open");
    assert_eq!(effects[0], Effect::StartAudio);
    let timer = scheduled_timer(&effects);
    assert!(flow.audio_playing());
    assert_eq!(flow.screen(), Screen::Envelope);

    let repeat = flow.handle(FlowEvent::OpenEnvelope).expect("open again");
    assert!(repeat.is_empty());

    flow.handle(FlowEvent::TimerElapsed(timer)).expect("timer");
    assert_eq!(flow.screen(), Screen::Letter);
    assert_eq!(flow.pending_timer(), None);
}

#[test]
fn stale_timers_are_ignored() {
    let mut flow = at_envelope();
    let effects = flow.handle(FlowEvent::OpenEnvelope).expect("open");
    let timer = scheduled_timer(&effects);
    flow.handle(FlowEvent::TimerElapsed(timer)).expect("timer");

    let effects = flow.handle(FlowEvent::TimerElapsed(timer)).expect("stale");
    assert!(effects.is_empty());
    assert_eq!(flow.screen(), Screen::Letter);
}

#[test]
fn blank_wish_is_blocked_with_inline_message() {
    let mut flow = at_fairy();
    for text in ["", "   ", "\n\t"] {
        flow.handle(FlowEvent::EditWish(text.into())).expect("edit");
        let effects = flow.handle(FlowEvent::SubmitWish).expect("submit");
        assert!(effects.is_empty());
        assert_eq!(flow.screen(), Screen::Fairy);
        assert_eq!(flow.validation_message(), Some(WISH_REQUIRED_MESSAGE));
        assert!(!flow.submission_in_flight());
    }

    flow.handle(FlowEvent::EditWish("semoga".into()))
        .expect("edit");
    assert_eq!(flow.validation_message(), None);
}

#[test]
fn wish_is_sent_as_typed_and_advances_on_acknowledgement() {
    let mut flow = at_fairy();
    flow.handle(FlowEvent::EditWish("  semoga lulus cumlaude ".into()))
        .expect("edit");
    let effects = flow.handle(FlowEvent::SubmitWish).expect("submit");
    assert_eq!(
        effects,
        vec![Effect::SubmitWish(CreateWishRequest {
            wish: "  semoga lulus cumlaude ".into(),
        })]
    );
    assert!(flow.submission_in_flight());

    let duplicate = flow.handle(FlowEvent::SubmitWish).expect("disabled");
    assert!(duplicate.is_empty());

    let effects = flow
        .handle(FlowEvent::WishStored(stored_wish("semoga lulus cumlaude")))
        .expect("stored");
    assert_eq!(effects, vec![Effect::Notify(WISH_ACCEPTED_NOTICE)]);
    assert_eq!(flow.screen(), Screen::Grade);
    assert!(!flow.submission_in_flight());
}

#[test]
fn failed_wish_write_keeps_user_on_fairy() {
    let mut flow = at_fairy();
    flow.handle(FlowEvent::EditWish("semoga".into()))
        .expect("edit");
    flow.handle(FlowEvent::SubmitWish).expect("submit");
    flow.handle(FlowEvent::SubmissionFailed("connection refused".into()))
        .expect("failure");
    assert_eq!(flow.screen(), Screen::Fairy);
    assert!(!flow.submission_in_flight());

    let effects = flow.handle(FlowEvent::SubmitWish).expect("resubmit");
    assert_eq!(effects.len(), 1);
}

#[test]
fn failed_grade_write_keeps_user_on_grade_without_popup() {
    let mut flow = at_grade();
    fill_all_grades(&mut flow, LetterGrade::B);
    flow.handle(FlowEvent::SubmitGrades).expect("submit");
    assert!(flow.submission_in_flight());

    let effects = flow
        .handle(FlowEvent::SubmissionFailed("connection refused".into()))
        .expect("failure");
    assert!(effects.is_empty());
    assert_eq!(flow.screen(), Screen::Grade);
    assert!(!flow.submission_in_flight());
    assert!(!flow.popup_visible());

    let effects = flow.handle(FlowEvent::SubmitGrades).expect("resubmit");
    assert!(matches!(effects.as_slice(), [Effect::SubmitGrades(_)]));
}

#[test]
fn teardown_during_write_clears_in_flight_flag() {
    let mut flow = at_fairy();
    flow.handle(FlowEvent::EditWish("semoga".into()))
        .expect("edit");
    flow.handle(FlowEvent::SubmitWish).expect("submit");
    assert!(flow.is_busy());

    flow.teardown();
    assert!(!flow.submission_in_flight());
    assert!(!flow.is_busy());
}

#[test]
fn acknowledgement_without_request_is_unexpected() {
    let mut flow = at_fairy();
    let err = flow
        .handle(FlowEvent::WishStored(stored_wish("ghost")))
        .expect_err("should fail");
    assert!(matches!(
        err,
        FlowError::UnexpectedEvent {
            screen: Screen::Fairy,
            event: "wish_stored",
        }
    ));
}

#[test]
fn incomplete_grade_table_is_blocked() {
    let mut flow = at_grade();
    let last = flow.rows().len() - 1;
    for row in 0..last {
        flow.handle(FlowEvent::SetGrade {
            row,
            grade: LetterGrade::A,
        })
        .expect("grade");
    }

    let effects = flow.handle(FlowEvent::SubmitGrades).expect("submit");
    assert!(effects.is_empty());
    assert_eq!(flow.screen(), Screen::Grade);
    assert_eq!(flow.validation_message(), Some(GRADES_INCOMPLETE_MESSAGE));

    flow.handle(FlowEvent::SetGrade {
        row: last,
        grade: LetterGrade::E,
    })
    .expect("grade");
    assert_eq!(flow.validation_message(), None);
}

#[test]
fn unknown_grade_row_is_an_error() {
    let mut flow = at_grade();
    let rows = flow.rows().len();
    let err = flow
        .handle(FlowEvent::SetGrade {
            row: rows,
            grade: LetterGrade::B,
        })
        .expect_err("should fail");
    assert_eq!(err, FlowError::UnknownRow { row: rows, rows });
}

#[test]
fn complete_grade_table_goes_through_popup_to_cake() {
    let mut flow = at_grade();
    fill_all_grades(&mut flow, LetterGrade::AB);
    flow.handle(FlowEvent::SetGrade {
        row: 0,
        grade: LetterGrade::A,
    })
    .expect("regrade");

    let effects = flow.handle(FlowEvent::SubmitGrades).expect("submit");
    let [Effect::SubmitGrades(request)] = effects.as_slice() else {
        panic!("expected a grade submission, got {effects:?}");
    };
    assert_eq!(request.subjects.len(), SEMESTER_COURSES.len());
    assert_eq!(request.subjects[0], SubjectGrade::new("Kriptografi", 3, LetterGrade::A));
    assert_eq!(request.subjects[6].sks, 100);
    assert_eq!(request.subjects[6].grade, "AB");

    flow.handle(FlowEvent::GradesStored(stored_grades(request.subjects.clone())))
        .expect("stored");
    assert!(flow.popup_visible());
    assert_eq!(flow.screen(), Screen::Grade);

    let err = flow
        .handle(FlowEvent::SetGrade {
            row: 0,
            grade: LetterGrade::B,
        })
        .expect_err("popup is modal");
    assert!(matches!(err, FlowError::UnexpectedEvent { .. }));

    flow.handle(FlowEvent::DismissPopup).expect("dismiss");
    assert!(!flow.popup_visible());
    assert_eq!(flow.screen(), Screen::Cake);
}

#[test]
fn final_screen_stops_audio_started_at_envelope() {
    let mut flow = at_grade();
    assert!(flow.audio_playing());
    fill_all_grades(&mut flow, LetterGrade::B);
    flow.handle(FlowEvent::SubmitGrades).expect("submit");
    flow.handle(FlowEvent::GradesStored(stored_grades(Vec::new())))
        .expect("stored");
    flow.handle(FlowEvent::DismissPopup).expect("dismiss");

    let effects = flow.handle(FlowEvent::BlowCandle).expect("blow");
    let timer = scheduled_timer(&effects);
    assert_eq!(flow.screen(), Screen::Cake);

    let effects = flow.handle(FlowEvent::TimerElapsed(timer)).expect("timer");
    assert_eq!(effects, vec![Effect::StopAudio]);
    assert_eq!(flow.screen(), Screen::Final);
    assert!(flow.screen().is_terminal());
    assert!(!flow.audio_playing());

    let err = flow.handle(FlowEvent::BlowCandle).expect_err("terminal");
    assert!(matches!(
        err,
        FlowError::UnexpectedEvent {
            screen: Screen::Final,
            ..
        }
    ));
}

#[test]
fn teardown_cancels_pending_timer_and_audio() {
    let mut flow = at_envelope();
    let effects = flow.handle(FlowEvent::OpenEnvelope).expect("open");
    let timer = scheduled_timer(&effects);

    let effects = flow.teardown();
    assert_eq!(effects, vec![Effect::CancelTimer(timer), Effect::StopAudio]);
    assert!(!flow.is_busy());
    assert!(flow.teardown().is_empty());
}

#[test]
fn custom_course_list_is_used_for_the_table() {
    let mut flow = FlowController::with_courses([Course {
        name: "Kalkulus",
        sks: 4,
    }]);
    assert_eq!(flow.rows().len(), 1);
    assert!(flow.handle(FlowEvent::Retry).is_err());
}
