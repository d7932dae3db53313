use client_core::{FlowController, FlowEvent, QuizChoice, Screen};
use shared::domain::LetterGrade;

const QUIZ_HINT: &str = "pilih 1, 2, atau 3 (atau ketik emojinya)";
const GRADE_HINT: &str = "format: `<no> <nilai>` dengan nilai A, AB, B, BC, C, D, atau E; `kirim` untuk lanjut";

/// Maps one line of user input to the events it stands for on the current
/// screen. `Err` carries a hint to print instead.
pub fn parse(flow: &FlowController, line: &str) -> Result<Vec<FlowEvent>, &'static str> {
    let trimmed = line.trim();
    let events = match flow.screen() {
        Screen::Quiz => vec![FlowEvent::PickAnswer(parse_choice(trimmed).ok_or(QUIZ_HINT)?)],
        Screen::Error => vec![FlowEvent::Retry],
        Screen::Success | Screen::Letter => vec![FlowEvent::Continue],
        Screen::Envelope => vec![FlowEvent::OpenEnvelope],
        Screen::Fairy => vec![FlowEvent::EditWish(line.to_string()), FlowEvent::SubmitWish],
        Screen::Grade if flow.popup_visible() => vec![FlowEvent::DismissPopup],
        Screen::Grade => vec![parse_grade_command(trimmed).ok_or(GRADE_HINT)?],
        Screen::Cake => vec![FlowEvent::BlowCandle],
        Screen::Final => Vec::new(),
    };
    Ok(events)
}

fn parse_choice(raw: &str) -> Option<QuizChoice> {
    match raw.parse::<usize>() {
        Ok(n) if (1..=QuizChoice::ALL.len()).contains(&n) => Some(QuizChoice::ALL[n - 1]),
        Ok(_) => None,
        Err(_) => QuizChoice::from_emoji(raw),
    }
}

fn parse_grade_command(raw: &str) -> Option<FlowEvent> {
    if raw.is_empty() || raw.eq_ignore_ascii_case("kirim") || raw.eq_ignore_ascii_case("submit") {
        return Some(FlowEvent::SubmitGrades);
    }

    let (row, grade) = raw.split_once(char::is_whitespace)?;
    let row = row.parse::<usize>().ok()?.checked_sub(1)?;
    let grade = grade.parse::<LetterGrade>().ok()?;
    Some(FlowEvent::SetGrade { row, grade })
}
