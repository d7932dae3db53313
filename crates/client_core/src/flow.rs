//! Screen sequencing for a single session.
//!
//! [`FlowController`] is a synchronous reducer: it consumes [`FlowEvent`]s and
//! returns the [`Effect`]s a driver has to carry out (timers, network writes,
//! audio cues). It never sleeps or performs I/O itself; see
//! [`crate::session::FlowSession`] for the async side.

use std::{fmt, time::Duration};

use shared::{
    domain::LetterGrade,
    protocol::{
        CreateGradeSubmissionRequest, CreateWishRequest, GradeSubmission, SubjectGrade, Wish,
    },
};
use tracing::debug;

use crate::{
    catalogue::{
        Course, QuizChoice, GRADES_INCOMPLETE_MESSAGE, SEMESTER_COURSES, WISH_ACCEPTED_NOTICE,
        WISH_REQUIRED_MESSAGE,
    },
    error::FlowError,
};

/// Pause between opening the envelope / blowing the candle and the next screen.
pub const REVEAL_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Quiz,
    Error,
    Success,
    Envelope,
    Letter,
    Fairy,
    Grade,
    Cake,
    Final,
}

impl Screen {
    pub fn as_str(self) -> &'static str {
        match self {
            Screen::Quiz => "quiz",
            Screen::Error => "error",
            Screen::Success => "success",
            Screen::Envelope => "envelope",
            Screen::Letter => "letter",
            Screen::Fairy => "fairy",
            Screen::Grade => "grade",
            Screen::Cake => "cake",
            Screen::Final => "final",
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Screen::Final
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    PickAnswer(QuizChoice),
    Retry,
    Continue,
    OpenEnvelope,
    EditWish(String),
    SubmitWish,
    SetGrade { row: usize, grade: LetterGrade },
    SubmitGrades,
    DismissPopup,
    BlowCandle,
    TimerElapsed(TimerId),
    WishStored(Wish),
    GradesStored(GradeSubmission),
    SubmissionFailed(String),
}

impl FlowEvent {
    pub fn name(&self) -> &'static str {
        match self {
            FlowEvent::PickAnswer(_) => "pick_answer",
            FlowEvent::Retry => "retry",
            FlowEvent::Continue => "continue",
            FlowEvent::OpenEnvelope => "open_envelope",
            FlowEvent::EditWish(_) => "edit_wish",
            FlowEvent::SubmitWish => "submit_wish",
            FlowEvent::SetGrade { .. } => "set_grade",
            FlowEvent::SubmitGrades => "submit_grades",
            FlowEvent::DismissPopup => "dismiss_popup",
            FlowEvent::BlowCandle => "blow_candle",
            FlowEvent::TimerElapsed(_) => "timer_elapsed",
            FlowEvent::WishStored(_) => "wish_stored",
            FlowEvent::GradesStored(_) => "grades_stored",
            FlowEvent::SubmissionFailed(_) => "submission_failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ScheduleTransition { timer: TimerId, after: Duration },
    CancelTimer(TimerId),
    SubmitWish(CreateWishRequest),
    SubmitGrades(CreateGradeSubmissionRequest),
    StartAudio,
    StopAudio,
    Notify(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeRow {
    pub course: Course,
    pub grade: Option<LetterGrade>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingTransition {
    timer: TimerId,
    to: Screen,
}

#[derive(Debug, Clone)]
pub struct FlowController {
    screen: Screen,
    wish: String,
    rows: Vec<GradeRow>,
    validation: Option<&'static str>,
    submission_in_flight: bool,
    popup_visible: bool,
    audio_playing: bool,
    pending: Option<PendingTransition>,
    next_timer: u64,
}

impl Default for FlowController {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowController {
    pub fn new() -> Self {
        Self::with_courses(SEMESTER_COURSES)
    }

    pub fn with_courses(courses: impl IntoIterator<Item = Course>) -> Self {
        Self {
            screen: Screen::Quiz,
            wish: String::new(),
            rows: courses
                .into_iter()
                .map(|course| GradeRow {
                    course,
                    grade: None,
                })
                .collect(),
            validation: None,
            submission_in_flight: false,
            popup_visible: false,
            audio_playing: false,
            pending: None,
            next_timer: 0,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn wish(&self) -> &str {
        &self.wish
    }

    pub fn rows(&self) -> &[GradeRow] {
        &self.rows
    }

    /// Inline message left by the last rejected local submission.
    pub fn validation_message(&self) -> Option<&'static str> {
        self.validation
    }

    /// True while a write is outstanding; the submit control is disabled.
    pub fn submission_in_flight(&self) -> bool {
        self.submission_in_flight
    }

    pub fn popup_visible(&self) -> bool {
        self.popup_visible
    }

    pub fn audio_playing(&self) -> bool {
        self.audio_playing
    }

    pub fn pending_timer(&self) -> Option<TimerId> {
        self.pending.map(|pending| pending.timer)
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some() || self.submission_in_flight
    }

    pub fn handle(&mut self, event: FlowEvent) -> Result<Vec<Effect>, FlowError> {
        let mut effects = Vec::new();
        match (self.screen, event) {
            (_, FlowEvent::TimerElapsed(timer)) => match self.pending {
                Some(pending) if pending.timer == timer => {
                    self.pending = None;
                    self.enter(pending.to, &mut effects);
                }
                _ => debug!(?timer, "ignoring stale timer"),
            },

            (Screen::Quiz, FlowEvent::PickAnswer(choice)) => {
                let next = if choice.is_correct() {
                    Screen::Success
                } else {
                    Screen::Error
                };
                self.enter(next, &mut effects);
            }
            (Screen::Error, FlowEvent::Retry) => self.enter(Screen::Quiz, &mut effects),
            (Screen::Success, FlowEvent::Continue) => self.enter(Screen::Envelope, &mut effects),

            (Screen::Envelope, FlowEvent::OpenEnvelope) => {
                if self.pending.is_none() {
                    if !self.audio_playing {
                        self.audio_playing = true;
                        effects.push(Effect::StartAudio);
                    }
                    effects.push(self.schedule(Screen::Letter));
                }
            }
            (Screen::Letter, FlowEvent::Continue) => self.enter(Screen::Fairy, &mut effects),

            (Screen::Fairy, FlowEvent::EditWish(text)) => {
                if !text.trim().is_empty() {
                    self.validation = None;
                }
                self.wish = text;
            }
            (Screen::Fairy, FlowEvent::SubmitWish) => {
                if self.submission_in_flight {
                    return Ok(effects);
                }
                if self.wish.trim().is_empty() {
                    self.validation = Some(WISH_REQUIRED_MESSAGE);
                } else {
                    self.validation = None;
                    self.submission_in_flight = true;
                    effects.push(Effect::SubmitWish(CreateWishRequest {
                        wish: self.wish.clone(),
                    }));
                }
            }
            (Screen::Fairy, FlowEvent::WishStored(wish)) if self.submission_in_flight => {
                debug!(wish_id = %wish.id, "wish acknowledged");
                self.submission_in_flight = false;
                effects.push(Effect::Notify(WISH_ACCEPTED_NOTICE));
                self.enter(Screen::Grade, &mut effects);
            }

            (Screen::Grade, FlowEvent::SetGrade { row, grade }) if !self.popup_visible => {
                let rows = self.rows.len();
                let slot = self
                    .rows
                    .get_mut(row)
                    .ok_or(FlowError::UnknownRow { row, rows })?;
                slot.grade = Some(grade);
                if self.rows.iter().all(|row| row.grade.is_some()) {
                    self.validation = None;
                }
            }
            (Screen::Grade, FlowEvent::SubmitGrades) if !self.popup_visible => {
                if self.submission_in_flight {
                    return Ok(effects);
                }
                match self.completed_subjects() {
                    Some(subjects) => {
                        self.validation = None;
                        self.submission_in_flight = true;
                        effects.push(Effect::SubmitGrades(CreateGradeSubmissionRequest {
                            subjects,
                        }));
                    }
                    None => self.validation = Some(GRADES_INCOMPLETE_MESSAGE),
                }
            }
            (Screen::Grade, FlowEvent::GradesStored(submission)) if self.submission_in_flight => {
                debug!(submission_id = %submission.id, "grades acknowledged");
                self.submission_in_flight = false;
                self.popup_visible = true;
            }
            (Screen::Grade, FlowEvent::DismissPopup) if self.popup_visible => {
                self.popup_visible = false;
                self.enter(Screen::Cake, &mut effects);
            }

            (Screen::Fairy | Screen::Grade, FlowEvent::SubmissionFailed(reason))
                if self.submission_in_flight =>
            {
                debug!(%reason, screen = %self.screen, "submission failed; staying put");
                self.submission_in_flight = false;
            }

            (Screen::Cake, FlowEvent::BlowCandle) => {
                if self.pending.is_none() {
                    effects.push(self.schedule(Screen::Final));
                }
            }

            (screen, event) => {
                return Err(FlowError::UnexpectedEvent {
                    screen,
                    event: event.name(),
                });
            }
        }
        Ok(effects)
    }

    /// Effects needed to release everything a session still holds.
    pub fn teardown(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if let Some(pending) = self.pending.take() {
            effects.push(Effect::CancelTimer(pending.timer));
        }
        self.submission_in_flight = false;
        if self.audio_playing {
            self.audio_playing = false;
            effects.push(Effect::StopAudio);
        }
        effects
    }

    fn schedule(&mut self, to: Screen) -> Effect {
        self.next_timer += 1;
        let timer = TimerId(self.next_timer);
        self.pending = Some(PendingTransition { timer, to });
        Effect::ScheduleTransition {
            timer,
            after: REVEAL_DELAY,
        }
    }

    fn enter(&mut self, next: Screen, effects: &mut Vec<Effect>) {
        debug!(from = %self.screen, to = %next, "screen transition");
        self.screen = next;
        self.validation = None;
        if next == Screen::Final && self.audio_playing {
            self.audio_playing = false;
            effects.push(Effect::StopAudio);
        }
    }

    fn completed_subjects(&self) -> Option<Vec<SubjectGrade>> {
        self.rows
            .iter()
            .map(|row| {
                row.grade.map(|grade| {
                    SubjectGrade::new(row.course.name, i64::from(row.course.sks), grade)
                })
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "tests/flow_tests.rs"]
mod tests;
